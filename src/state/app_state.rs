use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::plot_interaction::PlotViewState;
use crate::state::theme::Theme;

pub const VERSION: &str = "0.1.0";

/// Display settings that survive a session save/load. Sample data is
/// built in and never part of a session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub version: String,
    pub theme: Theme,
    /// Draw the raw-sample markers under the smoothed curves.
    pub show_samples: bool,
    /// Draw the Pmax / Imp / Vmp markers and their labels.
    pub show_annotations: bool,
    pub show_data_table: bool,
    pub view: PlotViewState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            version: VERSION.to_string(),
            theme: Theme::default(),
            show_samples: true,
            show_annotations: true,
            show_data_table: false,
            view: PlotViewState::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a session. A restored view is kept as-is rather than refitted;
    /// sessions without one fit to the data on the next frame.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let has_view = value.get("view").is_some();
        let mut state: AppState = serde_json::from_value(value)?;
        if has_view {
            state.view.initialized = true;
            state.view.auto_fit = false;
        }
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Session saved to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let state = Self::from_json(&json)?;
        tracing::info!("Session loaded from {:?}", path);
        Ok(state)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurveError;

    #[test]
    fn test_session_round_trip() {
        let mut state = AppState::new();
        state.theme = Theme::Dark;
        state.show_samples = false;
        state.view.x_min = -0.25;
        state.view.y2_max = 1.9;

        let restored = AppState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored.theme, Theme::Dark);
        assert!(!restored.show_samples);
        assert!(restored.show_annotations);
        assert_eq!(restored.view.x_min, -0.25);
        assert_eq!(restored.view.y2_max, 1.9);
        assert!(restored.view.initialized);
        assert!(!restored.view.auto_fit);
    }

    #[test]
    fn test_partial_session_uses_defaults() {
        let restored = AppState::from_json(r#"{ "theme": "Dark" }"#).unwrap();
        assert_eq!(restored.theme, Theme::Dark);
        assert!(restored.show_samples);
        assert_eq!(restored.version, VERSION);
        assert!(restored.view.auto_fit);
        assert!(!restored.view.initialized);
    }

    #[test]
    fn test_bad_session_is_error() {
        assert!(matches!(
            AppState::from_json("not json"),
            Err(CurveError::Json(_))
        ));
    }
}
