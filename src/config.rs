use crate::color::Color;
use crate::error::{ConfigError, ConfigResult};
use crate::fill::FillConfig;
use crate::geometry::hit_testing::SELECTION_HIT_SLOP;
use crate::history::DEFAULT_HISTORY_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIN_BRUSH_WIDTH: u32 = 1;
pub const MAX_BRUSH_WIDTH: u32 = 50;

/// How [`crate::DrawingSession::save`] produces its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Multiplier applied on top of the device pixel density
    pub scale: f32,
    pub file_name: String,
    /// Composite the background underlay into the exported image
    pub flatten_background: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            file_name: "sketch.png".to_owned(),
            flatten_background: false,
        }
    }
}

/// Tunables of a drawing session. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history_depth: usize,
    pub default_color: Color,
    pub default_brush_width: u32,
    pub fill: FillConfig,
    pub pick_switches_to_brush: bool,
    pub export: ExportConfig,
    /// Clear paints the background base color instead of transparency
    pub clear_to_background: bool,
    pub default_background: String,
    pub default_font_size: f32,
    pub default_font_family: String,
    pub selection_hit_slop: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            default_color: Color::DEFAULT,
            default_brush_width: 10,
            fill: FillConfig::default(),
            pick_switches_to_brush: true,
            export: ExportConfig::default(),
            clear_to_background: false,
            default_background: "canvas".to_owned(),
            default_font_size: 20.0,
            default_font_family: "Arial".to_owned(),
            selection_hit_slop: SELECTION_HIT_SLOP,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::info!("Loading session config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid("history_depth must be at least 1".into()));
        }
        if !(MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).contains(&self.default_brush_width) {
            return Err(ConfigError::Invalid(format!(
                "default_brush_width must be within {}..={}, got {}",
                MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH, self.default_brush_width
            )));
        }
        if !(self.export.scale.is_finite() && self.export.scale > 0.0) {
            return Err(ConfigError::Invalid(format!("export.scale must be positive, got {}", self.export.scale)));
        }
        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(ConfigError::Invalid("default_font_size must be positive".into()));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export.file_name must not be empty".into()));
        }
        if !(self.selection_hit_slop.is_finite() && self.selection_hit_slop >= 0.0) {
            return Err(ConfigError::Invalid("selection_hit_slop must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config = SessionConfig::from_json(r#"{ "history_depth": 5, "fill": { "tolerance": 0 } }"#)
            .expect("valid");
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.fill.tolerance, 0);
        assert!(!config.fill.fill_transparent);
        assert_eq!(config.default_color, Color::DEFAULT);
        assert_eq!(config.export.file_name, "sketch.png");
    }

    #[test]
    fn json_round_trip() {
        let config = SessionConfig::default();
        let json = config.to_json().expect("serialize");
        assert_eq!(SessionConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SessionConfig::from_json(r#"{ "default_color": "teal" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{ "default_brush_width": 80 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{ "export": { "scale": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
