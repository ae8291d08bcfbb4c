//! Client for the remote pipe-closure analysis service.
//!
//! The service runs the hydraulic simulation, classifies nodes and renders
//! the maps; this crate only ships the request and unwraps the response
//! envelope. Frontends depend on the [`AnalysisBackend`] trait so tests and
//! workers can swap the transport.

pub mod envelope;
pub mod error;
pub mod http;
pub mod settings;

pub use envelope::{ANALYSIS_FAILED, interpret_response, unwrap_envelope};
pub use error::{ClientError, ClientResult};
pub use http::HttpAnalysisClient;
pub use settings::{ClientSettings, DEFAULT_API_BASE, DEFAULT_API_ORIGIN, DEFAULT_TIMEOUT};

use wn_core::{AnalysisRequest, AnalysisResult};

/// Anything able to run one analysis round trip.
///
/// One call is one request: implementations must not retry, cache, or
/// return partial results.
pub trait AnalysisBackend: Send + Sync {
    fn run_analysis(&self, request: &AnalysisRequest) -> ClientResult<AnalysisResult>;
}

impl<B: AnalysisBackend + ?Sized> AnalysisBackend for std::sync::Arc<B> {
    fn run_analysis(&self, request: &AnalysisRequest) -> ClientResult<AnalysisResult> {
        (**self).run_analysis(request)
    }
}
