//! Service classification of a node's closed-pipe pressure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity label assigned by the analysis service.
///
/// The set is defined by the producer, so anything outside the three known
/// labels is kept verbatim in `Other` instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeStatus {
    /// `OK`
    Ok,
    /// `RENDAH` (low)
    Low,
    /// `SANGAT RENDAH` (very low)
    VeryLow,
    Other(String),
}

impl NodeStatus {
    pub const OK: &'static str = "OK";
    pub const LOW: &'static str = "RENDAH";
    pub const VERY_LOW: &'static str = "SANGAT RENDAH";

    pub fn as_str(&self) -> &str {
        match self {
            NodeStatus::Ok => Self::OK,
            NodeStatus::Low => Self::LOW,
            NodeStatus::VeryLow => Self::VERY_LOW,
            NodeStatus::Other(label) => label,
        }
    }
}

impl From<&str> for NodeStatus {
    fn from(label: &str) -> Self {
        match label {
            Self::OK => NodeStatus::Ok,
            Self::LOW => NodeStatus::Low,
            Self::VERY_LOW => NodeStatus::VeryLow,
            other => NodeStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            Self::OK => NodeStatus::Ok,
            Self::LOW => NodeStatus::Low,
            Self::VERY_LOW => NodeStatus::VeryLow,
            _ => NodeStatus::Other(label),
        }
    }
}

impl From<NodeStatus> for String {
    fn from(status: NodeStatus) -> Self {
        match status {
            NodeStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(NodeStatus::from("OK"), NodeStatus::Ok);
        assert_eq!(NodeStatus::from("ok"), NodeStatus::Other("ok".to_string()));
        assert_eq!(NodeStatus::from("SANGAT RENDAH"), NodeStatus::VeryLow);
    }

    #[test]
    fn unknown_label_survives_round_trip() {
        let status: NodeStatus = serde_json::from_str("\"MATI TOTAL\"").unwrap();
        assert_eq!(status, NodeStatus::Other("MATI TOTAL".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"MATI TOTAL\"");
    }
}
