//! Uploaded network file, analysis parameters and the request body.

use serde::{Deserialize, Serialize, Serializer};

/// File suffix accepted for network models (EPANET input files).
pub const INP_EXTENSION: &str = ".inp";

/// Network model file read fully into memory.
///
/// Content and filename only ever exist together; owners hold an
/// `Option<UploadedFile>` rather than two independent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    content: String,
    filename: String,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size of the raw text in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Parameters of a pipe-closure analysis as edited by the user.
///
/// Numeric fields are JSON numbers on the wire. A field edited into
/// non-numeric text holds NaN and is sent as `null`; `time_sec` and `top_n`
/// are sent as integers whenever they hold a finite whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub pipe_to_close: String,
    #[serde(serialize_with = "serialize_whole")]
    pub time_sec: f64,
    #[serde(serialize_with = "serialize_whole")]
    pub top_n: f64,
    pub ok_bar_min: f64,
    pub very_low_max: f64,
}

impl AnalysisConfig {
    pub const DEFAULT_PIPE: &'static str = "P1106";
    pub const DEFAULT_TIME_SEC: f64 = 3600.0;
    pub const DEFAULT_TOP_N: f64 = 20.0;
    pub const DEFAULT_OK_BAR_MIN: f64 = 3.0;
    pub const DEFAULT_VERY_LOW_MAX: f64 = 1.0;
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pipe_to_close: Self::DEFAULT_PIPE.to_string(),
            time_sec: Self::DEFAULT_TIME_SEC,
            top_n: Self::DEFAULT_TOP_N,
            ok_bar_min: Self::DEFAULT_OK_BAR_MIN,
            very_low_max: Self::DEFAULT_VERY_LOW_MAX,
        }
    }
}

/// Body of `POST {base}/analyze`.
///
/// Optional fields left as `None` are omitted so the service applies its own
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub inp_content: String,
    pub pipe_to_close: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_whole"
    )]
    pub time_sec: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_whole"
    )]
    pub top_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_bar_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub very_low_max: Option<f64>,
}

impl AnalysisRequest {
    /// Request carrying only the required fields.
    pub fn new(inp_content: impl Into<String>, pipe_to_close: impl Into<String>) -> Self {
        Self {
            inp_content: inp_content.into(),
            pipe_to_close: pipe_to_close.into(),
            time_sec: None,
            top_n: None,
            ok_bar_min: None,
            very_low_max: None,
        }
    }

    /// Request for `file` with every field of `config` set explicitly.
    pub fn from_config(file: &UploadedFile, config: &AnalysisConfig) -> Self {
        Self {
            inp_content: file.content().to_string(),
            pipe_to_close: config.pipe_to_close.clone(),
            time_sec: Some(config.time_sec),
            top_n: Some(config.top_n),
            ok_bar_min: Some(config.ok_bar_min),
            very_low_max: Some(config.very_low_max),
        }
    }
}

fn serialize_whole<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let v = *value;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        if v >= 0.0 {
            serializer.serialize_u64(v as u64)
        } else {
            serializer.serialize_i64(v as i64)
        }
    } else {
        // serde_json writes non-finite floats as null
        serializer.serialize_f64(v)
    }
}

fn serialize_opt_whole<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_whole(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_seed() {
        let config = AnalysisConfig::default();
        assert_eq!(config.pipe_to_close, "P1106");
        assert_eq!(config.time_sec, 3600.0);
        assert_eq!(config.top_n, 20.0);
        assert_eq!(config.ok_bar_min, 3.0);
        assert_eq!(config.very_low_max, 1.0);
    }

    #[test]
    fn whole_fields_serialize_as_integers() {
        let json = serde_json::to_string(&AnalysisConfig::default()).unwrap();
        assert!(json.contains("\"timeSec\":3600,"), "{json}");
        assert!(json.contains("\"topN\":20,"), "{json}");
        assert!(json.contains("\"okBarMin\":3.0"), "{json}");
    }

    #[test]
    fn nan_field_serializes_as_null() {
        let config = AnalysisConfig {
            top_n: f64::NAN,
            ..AnalysisConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["topN"].is_null());
    }

    #[test]
    fn unset_overrides_are_omitted() {
        let request = AnalysisRequest::new("[JUNCTIONS]", "P1");
        let value = serde_json::to_value(&request).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["inpContent"], "[JUNCTIONS]");
        assert_eq!(obj["pipeToClose"], "P1");
    }
}
