//! wn-core: data model shared by the analysis client and the dashboard.
//!
//! Everything here mirrors the JSON contract of the remote pipe-closure
//! analysis service. Results are produced by the service only and are never
//! recomputed on this side.

pub mod config;
pub mod result;
pub mod status;

pub use config::{AnalysisConfig, AnalysisRequest, INP_EXTENSION, UploadedFile};
pub use result::{AnalysisResponse, AnalysisResult, NodeResult};
pub use status::NodeStatus;
