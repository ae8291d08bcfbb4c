//! Analysis configuration presets stored as YAML.

use std::path::Path;

use wn_core::AnalysisConfig;

use crate::error::{AppError, AppResult};

/// Load a preset. Missing keys fall back to the defaults.
pub fn load_preset(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::PresetRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_preset(&content)
}

pub fn parse_preset(content: &str) -> AppResult<AnalysisConfig> {
    serde_yaml::from_str(content)
        .map_err(|e| AppError::Preset(format!("Failed to parse preset YAML: {}", e)))
}

/// Save a preset.
pub fn save_preset(path: &Path, config: &AnalysisConfig) -> AppResult<()> {
    let content = render_preset(config)?;

    std::fs::write(path, content).map_err(|e| AppError::PresetWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn render_preset(config: &AnalysisConfig) -> AppResult<String> {
    serde_yaml::to_string(config)
        .map_err(|e| AppError::Preset(format!("Failed to serialize preset: {}", e)))
}
