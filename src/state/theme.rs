use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Colour of the current curve and its markers (#004aad).
pub const CURRENT_COLOR: Color32 = Color32::from_rgb(0x00, 0x4a, 0xad);
/// Colour of the power curve and its markers (#03aa59).
pub const POWER_COLOR: Color32 = Color32::from_rgb(0x03, 0xaa, 0x59);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Dashed grey gridlines.
    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 90),
            Theme::Light => Color32::from_rgba_premultiplied(128, 128, 128, 110),
        }
    }

    /// Fill of the operating-point markers and their annotation text.
    pub fn marker_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(235, 235, 235),
            Theme::Light => Color32::BLACK,
        }
    }

    /// Edge around operating-point markers.
    pub fn marker_edge(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::BLACK,
            Theme::Light => Color32::WHITE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
