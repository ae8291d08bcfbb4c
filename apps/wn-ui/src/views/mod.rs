pub mod config_view;
pub mod results_view;
pub mod upload_view;

pub use config_view::ConfigView;
pub use results_view::{ResultsAction, ResultsPanel};
pub use upload_view::{UploadAction, UploadView};
