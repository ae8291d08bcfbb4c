//! Result payload returned by the analysis service.

use serde::{Deserialize, Serialize};

use crate::status::NodeStatus;

/// Outcome of the closure simulation at one network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub node_id: String,
    pub pressure_base_m: f64,
    pub pressure_closed_m: f64,
    pub drop_m: f64,
    pub pressure_base_bar: f64,
    pub pressure_closed_bar: f64,
    pub drop_bar: f64,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeResult {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }
}

/// Aggregate result of one analysis run.
///
/// `top_impacted_nodes` is ordered by descending impact and holds at most
/// the requested `topN` entries. Images are base64 PNG payloads, usually as
/// `data:image/png;base64,...` URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub used_time: f64,
    pub mean_pressure_base: f64,
    pub mean_pressure_closed: f64,
    pub mean_drop: f64,
    pub top_impacted_nodes: Vec<NodeResult>,
    pub all_nodes: Vec<NodeResult>,
    pub pressure_maps_image: String,
    pub impact_map_image: String,
    pub csv_data: String,
}

/// Success/error envelope wrapping every `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
