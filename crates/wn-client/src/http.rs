//! Blocking HTTP implementation of [`AnalysisBackend`].

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Instant;
use tracing::{debug, info, warn};
use wn_core::{AnalysisRequest, AnalysisResult};

use crate::AnalysisBackend;
use crate::envelope::interpret_response;
use crate::error::{ClientError, ClientResult};
use crate::settings::ClientSettings;

const ANALYZE_PATH: &str = "analyze";

/// Talks to `POST {base}/analyze`.
///
/// Blocks the calling thread for at most the configured timeout; GUI callers
/// run it on a worker thread.
pub struct HttpAnalysisClient {
    client: Client,
    settings: ClientSettings,
}

impl HttpAnalysisClient {
    pub fn new(settings: ClientSettings) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Client configured from `WN_API_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientSettings::from_env())
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn analyze_url(&self) -> String {
        self.settings.endpoint(ANALYZE_PATH)
    }
}

impl AnalysisBackend for HttpAnalysisClient {
    fn run_analysis(&self, request: &AnalysisRequest) -> ClientResult<AnalysisResult> {
        let url = self.analyze_url();
        debug!(
            %url,
            pipe = %request.pipe_to_close,
            inp_bytes = request.inp_content.len(),
            "sending analysis request"
        );

        let started = Instant::now();
        let response = self.client.post(&url).json(request).send().map_err(|e| {
            warn!(timeout = e.is_timeout(), error = %e, "analysis request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().map_err(ClientError::from)?;
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            body_bytes = body.len(),
            "analysis response received"
        );

        interpret_response(status.as_u16(), &body)
    }
}
