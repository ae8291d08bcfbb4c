//! View models for the results panel.
//!
//! Nothing here computes domain values; it only picks what to show and
//! formats numbers for display.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;
use wn_core::{AnalysisResult, NodeResult, NodeStatus};

use crate::dashboard::{Dashboard, ReceivedResult};
use crate::error::{AppError, AppResult};

pub const CSV_FILENAME: &str = "analysis_results.csv";
pub const CSV_MIME: &str = "text/csv";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// What the results panel should render.
#[derive(Debug, Clone, Copy)]
pub enum ResultsView<'a> {
    Empty,
    Loading,
    Ready(&'a ReceivedResult),
}

impl<'a> ResultsView<'a> {
    pub fn of(dashboard: &'a Dashboard) -> Self {
        if dashboard.is_in_flight() {
            ResultsView::Loading
        } else if let Some(received) = dashboard.result() {
            ResultsView::Ready(received)
        } else {
            ResultsView::Empty
        }
    }
}

/// Display bucket for a node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusStyle {
    Ok,
    Warning,
    Severe,
    /// Anything the three known labels do not cover.
    Critical,
}

impl From<&NodeStatus> for StatusStyle {
    fn from(status: &NodeStatus) -> Self {
        match status {
            NodeStatus::Ok => StatusStyle::Ok,
            NodeStatus::Low => StatusStyle::Warning,
            NodeStatus::VeryLow => StatusStyle::Severe,
            NodeStatus::Other(_) => StatusStyle::Critical,
        }
    }
}

/// Map overlay that can be opened over the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    PressureMaps,
    ImpactMap,
}

impl Overlay {
    pub fn title(self) -> &'static str {
        match self {
            Overlay::PressureMaps => "Pressure Analysis Maps",
            Overlay::ImpactMap => "Service Impact Map",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            Overlay::PressureMaps => "Pressure Maps",
            Overlay::ImpactMap => "Impact Map",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            Overlay::PressureMaps => "pressure_maps",
            Overlay::ImpactMap => "impact_map",
        }
    }

    /// Image payload backing this overlay.
    pub fn payload(self, result: &AnalysisResult) -> &str {
        match self {
            Overlay::PressureMaps => &result.pressure_maps_image,
            Overlay::ImpactMap => &result.impact_map_image,
        }
    }
}

/// Which overlay, if any, is open. At most one at a time.
///
/// An overlay belongs to the result it was opened over; showing a
/// different result closes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    open: Option<Overlay>,
    shown: Option<Uuid>,
}

impl OverlayState {
    /// Record which result is on screen, closing the overlay when it changed.
    pub fn follow(&mut self, received: &ReceivedResult) {
        if self.shown != Some(received.submission) {
            self.shown = Some(received.submission);
            self.open = None;
        }
    }

    pub fn current(&self) -> Option<Overlay> {
        self.open
    }

    pub fn open(&mut self, overlay: Overlay) {
        self.open = Some(overlay);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Clicking outside the overlay content closes it.
    pub fn backdrop_clicked(&mut self) {
        self.close();
    }
}

/// `usedTime` in hours, unrounded.
pub fn used_time_hours(seconds: f64) -> f64 {
    seconds / SECONDS_PER_HOUR
}

pub fn format_hours(seconds: f64) -> String {
    format!("{} hours", used_time_hours(seconds))
}

/// Summary metrics use two decimals.
pub fn format_summary(value: f64) -> String {
    format!("{:.2}", value)
}

/// Per-node pressure and drop use one decimal.
pub fn format_node_value(value: f64) -> String {
    format!("{:.1}", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetric {
    pub label: &'static str,
    pub value: String,
}

pub fn summary_metrics(result: &AnalysisResult) -> Vec<SummaryMetric> {
    vec![
        SummaryMetric {
            label: "Time",
            value: format_hours(result.used_time),
        },
        SummaryMetric {
            label: "Mean Pressure Base",
            value: format!("{} m", format_summary(result.mean_pressure_base)),
        },
        SummaryMetric {
            label: "Mean Pressure Closed",
            value: format!("{} m", format_summary(result.mean_pressure_closed)),
        },
        SummaryMetric {
            label: "Mean Drop",
            value: format!("{} m", format_summary(result.mean_drop)),
        },
    ]
}

/// One formatted row of a node table.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub node_id: String,
    pub pressure_closed: String,
    pub drop: String,
    pub status: String,
    pub style: StatusStyle,
}

impl From<&NodeResult> for NodeRow {
    fn from(node: &NodeResult) -> Self {
        Self {
            node_id: node.node_id.clone(),
            pressure_closed: format!("{} m", format_node_value(node.pressure_closed_m)),
            drop: format!("{} m", format_node_value(node.drop_m)),
            status: node.status.to_string(),
            style: StatusStyle::from(&node.status),
        }
    }
}

pub const NODE_TABLE_HEADERS: [&str; 4] = ["Node ID", "Pressure Closed", "Drop", "Status"];

pub fn node_rows(nodes: &[NodeResult]) -> Vec<NodeRow> {
    nodes.iter().map(NodeRow::from).collect()
}

/// Downloadable CSV artifact packaged from the service's CSV text.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub mime: &'static str,
    pub contents: String,
}

impl CsvExport {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            filename: CSV_FILENAME,
            mime: CSV_MIME,
            contents: result.csv_data.clone(),
        }
    }

    /// Write into `dir` under the fixed filename.
    pub fn write_to_dir(&self, dir: &Path) -> AppResult<PathBuf> {
        let path = dir.join(self.filename);
        self.write_file(&path)?;
        Ok(path)
    }

    pub fn write_file(&self, path: &Path) -> AppResult<()> {
        std::fs::write(path, self.contents.as_bytes())?;
        Ok(())
    }
}

/// Decode an image payload, with or without a `data:*;base64,` prefix.
pub fn decode_image(payload: &str) -> AppResult<Vec<u8>> {
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (_, data) = rest
                .split_once(";base64,")
                .ok_or_else(|| AppError::Image("data URL is not base64 encoded".to_string()))?;
            data
        }
        None => payload,
    };

    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(AppError::Image("empty image payload".to_string()));
    }

    STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Image(e.to_string()))
}
