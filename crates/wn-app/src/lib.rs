//! Shared application service layer for the pipe-closure dashboard.
//!
//! Both the CLI and the GUI drive the same [`Dashboard`] controller; this
//! crate holds the upload and configuration state, the submission state
//! machine and the result formatting.

pub mod config_form;
pub mod dashboard;
pub mod error;
pub mod presenter;
pub mod preset;
pub mod upload;

// Re-export key types for convenience
pub use config_form::{ConfigField, ConfigHolder, parse_decimal_field, parse_whole_field};
pub use dashboard::{
    Dashboard, DashboardState, PendingAnalysis, ReceivedResult, SubmitOutcome, SubmitReport,
};
pub use error::{AppError, AppResult, ErrorKind, ErrorNotice};
pub use presenter::{
    CSV_FILENAME, CSV_MIME, CsvExport, NODE_TABLE_HEADERS, NodeRow, Overlay, OverlayState,
    ResultsView, StatusStyle, SummaryMetric, decode_image, format_hours, format_node_value,
    format_summary, node_rows, summary_metrics, used_time_hours,
};
pub use preset::{load_preset, parse_preset, render_preset, save_preset};
pub use upload::{UploadHolder, UploadOutcome, UploadSource, file_name_of, has_inp_extension};
