//! Holder for the analysis parameters being edited.

use wn_core::AnalysisConfig;

/// Editable fields of [`AnalysisConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    PipeToClose,
    TimeSec,
    TopN,
    OkBarMin,
    VeryLowMax,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::PipeToClose,
        ConfigField::TimeSec,
        ConfigField::TopN,
        ConfigField::OkBarMin,
        ConfigField::VeryLowMax,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::PipeToClose => "Pipe to Close",
            ConfigField::TimeSec => "Time (seconds)",
            ConfigField::TopN => "Top N Results",
            ConfigField::OkBarMin => "OK Threshold (bar)",
            ConfigField::VeryLowMax => "Very Low Max (bar)",
        }
    }

    /// Lower bound enforced by the input widget, if numeric.
    pub fn minimum(self) -> Option<f64> {
        match self {
            ConfigField::PipeToClose => None,
            ConfigField::TopN => Some(1.0),
            ConfigField::TimeSec | ConfigField::OkBarMin | ConfigField::VeryLowMax => Some(0.0),
        }
    }

    /// Step granularity of the input widget, if numeric.
    pub fn step(self) -> Option<f64> {
        match self {
            ConfigField::PipeToClose => None,
            ConfigField::TimeSec | ConfigField::TopN => Some(1.0),
            ConfigField::OkBarMin | ConfigField::VeryLowMax => Some(0.1),
        }
    }

    /// Apply the field's lower bound: a value below it becomes NaN, the
    /// same as text that does not parse.
    pub fn bounded(self, value: f64) -> f64 {
        match self.minimum() {
            Some(min) if value < min => f64::NAN,
            _ => value,
        }
    }

    pub fn is_whole(self) -> bool {
        matches!(self, ConfigField::TimeSec | ConfigField::TopN)
    }

    /// Current value of this field rendered as editable text.
    pub fn text(self, config: &AnalysisConfig) -> String {
        match self {
            ConfigField::PipeToClose => config.pipe_to_close.clone(),
            ConfigField::TimeSec => number_text(config.time_sec),
            ConfigField::TopN => number_text(config.top_n),
            ConfigField::OkBarMin => number_text(config.ok_bar_min),
            ConfigField::VeryLowMax => number_text(config.very_low_max),
        }
    }
}

/// Parse an integer field; anything unparseable becomes NaN.
///
/// A leading integer prefix is accepted the way numeric inputs do
/// (`"3600.7"` reads as `3600`).
pub fn parse_whole_field(text: &str) -> f64 {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<i64>().map(|v| v as f64).unwrap_or(f64::NAN)
}

/// Parse a decimal field; anything unparseable becomes NaN.
///
/// The whole text must be a finite number: `"2.5x"`, `"inf"` and `"NaN"`
/// all read as NaN, matching what a numeric input reports for them.
pub fn parse_decimal_field(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => f64::NAN,
    }
}

fn number_text(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Configuration seeded with defaults and replaced wholesale on every edit.
#[derive(Debug, Clone, Default)]
pub struct ConfigHolder {
    current: AnalysisConfig,
}

impl ConfigHolder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { current: config }
    }

    pub fn current(&self) -> &AnalysisConfig {
        &self.current
    }

    /// The only mutation: swap in a complete configuration.
    pub fn replace(&mut self, config: AnalysisConfig) {
        self.current = config;
    }

    /// Full copy of the current configuration with one field set from text.
    ///
    /// Numbers below the field's minimum are stored as NaN.
    pub fn with_field_text(&self, field: ConfigField, text: &str) -> AnalysisConfig {
        let mut next = self.current.clone();
        match field {
            ConfigField::PipeToClose => next.pipe_to_close = text.to_string(),
            ConfigField::TimeSec => next.time_sec = field.bounded(parse_whole_field(text)),
            ConfigField::TopN => next.top_n = field.bounded(parse_whole_field(text)),
            ConfigField::OkBarMin => next.ok_bar_min = field.bounded(parse_decimal_field(text)),
            ConfigField::VeryLowMax => {
                next.very_low_max = field.bounded(parse_decimal_field(text))
            }
        }
        next
    }
}
