//! Dashboard controller: upload → configure → submit → display.
//!
//! [`Dashboard`] owns every piece of mutable session state. Frontends read
//! it through accessors and request changes through the transition methods
//! below; each method runs synchronously, so no locking is involved.
//!
//! A submission is split in two halves so the remote call can run off the
//! UI thread: [`Dashboard::begin_submit`] issues a [`PendingAnalysis`] and
//! raises the in-flight flag, [`Dashboard::complete_submit`] applies the
//! outcome and lowers it. [`Dashboard::submit_with`] chains both on the
//! caller's thread.

use std::io;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wn_client::{AnalysisBackend, ClientResult};
use wn_core::{AnalysisConfig, AnalysisRequest, AnalysisResult, UploadedFile};

use crate::config_form::ConfigHolder;
use crate::error::{AppError, ErrorNotice};
use crate::upload::{UploadHolder, UploadOutcome, UploadSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    /// No file loaded.
    Idle,
    /// File present, no result, nothing in flight.
    FileLoaded,
    /// Request submitted; further submissions are refused.
    InFlight,
    /// File and result present, nothing in flight.
    Resulted,
}

/// A result together with when and for which file it arrived.
#[derive(Debug, Clone)]
pub struct ReceivedResult {
    /// Submission that produced this result.
    pub submission: Uuid,
    pub result: AnalysisResult,
    pub filename: String,
    pub pipe_to_close: String,
    pub received_at: DateTime<Local>,
}

/// Ticket for a submission whose remote call has not resolved yet.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub id: Uuid,
    pub request: AnalysisRequest,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Started(PendingAnalysis),
    /// A submission is already in flight; nothing was dispatched.
    Busy,
    /// Refused before dispatch.
    Rejected(ErrorNotice),
}

/// Result of [`Dashboard::submit_with`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReport {
    Completed,
    Failed(ErrorNotice),
    Busy,
    Rejected(ErrorNotice),
}

#[derive(Debug, Clone)]
struct InFlight {
    id: Uuid,
    filename: String,
    pipe_to_close: String,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    upload: UploadHolder,
    config: ConfigHolder,
    result: Option<ReceivedResult>,
    in_flight: Option<InFlight>,
    error: Option<ErrorNotice>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard whose configuration starts from `config` instead of the defaults.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config: ConfigHolder::new(config),
            ..Self::default()
        }
    }

    pub fn state(&self) -> DashboardState {
        if self.in_flight.is_some() {
            DashboardState::InFlight
        } else if !self.upload.is_loaded() {
            DashboardState::Idle
        } else if self.result.is_some() {
            DashboardState::Resulted
        } else {
            DashboardState::FileLoaded
        }
    }

    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.upload.current()
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.config.current()
    }

    pub fn config_holder(&self) -> &ConfigHolder {
        &self.config
    }

    pub fn result(&self) -> Option<&ReceivedResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit control enabled: a file is loaded and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.upload.is_loaded() && self.in_flight.is_none()
    }

    /// Accept a file from either entry point.
    ///
    /// On success the previous result and error are discarded. A read
    /// failure sets the error and leaves the loaded file untouched.
    pub fn upload<F>(&mut self, source: UploadSource, filename: &str, read: F) -> UploadOutcome
    where
        F: FnOnce() -> io::Result<Vec<u8>>,
    {
        if self.in_flight.is_some() {
            debug!(filename, "upload ignored while an analysis is in flight");
            return UploadOutcome::Ignored;
        }

        match self.upload.accept(source, filename, read) {
            Ok(UploadOutcome::Accepted) => {
                info!(filename, "network file loaded");
                self.result = None;
                self.error = None;
                UploadOutcome::Accepted
            }
            Ok(UploadOutcome::Ignored) => UploadOutcome::Ignored,
            Err(err) => {
                warn!(filename, error = ?err, "failed to read uploaded file");
                self.error = Some(err.notice());
                UploadOutcome::Ignored
            }
        }
    }

    pub fn replace_config(&mut self, config: AnalysisConfig) {
        self.config.replace(config);
    }

    /// Start a submission.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.in_flight.is_some() {
            debug!("submit ignored: analysis already in flight");
            return SubmitOutcome::Busy;
        }

        let Some(file) = self.upload.current() else {
            let notice = AppError::NoFileUploaded.notice();
            self.result = None;
            self.error = Some(notice.clone());
            return SubmitOutcome::Rejected(notice);
        };

        let config = self.config.current();
        let request = AnalysisRequest::from_config(file, config);
        let id = Uuid::new_v4();

        info!(
            submission = %id,
            filename = file.filename(),
            pipe = %config.pipe_to_close,
            "analysis submitted"
        );

        self.in_flight = Some(InFlight {
            id,
            filename: file.filename().to_string(),
            pipe_to_close: config.pipe_to_close.clone(),
        });
        self.error = None;

        SubmitOutcome::Started(PendingAnalysis { id, request })
    }

    /// Apply the outcome of the submission `id`.
    ///
    /// Returns `false` when `id` is not the submission in flight (for
    /// example after a reset); the outcome is then dropped.
    pub fn complete_submit(&mut self, id: Uuid, outcome: ClientResult<AnalysisResult>) -> bool {
        let Some(in_flight) = self.in_flight.take_if(|f| f.id == id) else {
            debug!(submission = %id, "discarding outcome of a stale submission");
            return false;
        };

        match outcome {
            Ok(result) => {
                info!(
                    submission = %id,
                    nodes = result.all_nodes.len(),
                    top = result.top_impacted_nodes.len(),
                    "analysis completed"
                );
                self.result = Some(ReceivedResult {
                    submission: id,
                    result,
                    filename: in_flight.filename,
                    pipe_to_close: in_flight.pipe_to_close,
                    received_at: Local::now(),
                });
            }
            Err(err) => {
                let err = AppError::from(err);
                warn!(submission = %id, error = %err, "analysis failed");
                self.error = Some(err.notice());
            }
        }
        true
    }

    /// Begin, run against `backend`, and complete on the current thread.
    pub fn submit_with<B>(&mut self, backend: &B) -> SubmitReport
    where
        B: AnalysisBackend + ?Sized,
    {
        match self.begin_submit() {
            SubmitOutcome::Busy => SubmitReport::Busy,
            SubmitOutcome::Rejected(notice) => SubmitReport::Rejected(notice),
            SubmitOutcome::Started(pending) => {
                let outcome = backend.run_analysis(&pending.request);
                self.complete_submit(pending.id, outcome);
                match &self.error {
                    Some(notice) => SubmitReport::Failed(notice.clone()),
                    None => SubmitReport::Completed,
                }
            }
        }
    }

    /// Put a failure raised outside the controller into the message slot.
    pub fn report_error(&mut self, err: &AppError) {
        warn!(error = %err, "error reported");
        self.error = Some(ErrorNotice::from(err));
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Back to `Idle`: drop the file, the result, the error and any pending
    /// submission. The configuration is kept.
    pub fn reset(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(submission = %in_flight.id, "abandoning in-flight submission");
        }
        self.upload.clear();
        self.result = None;
        self.error = None;
    }
}
