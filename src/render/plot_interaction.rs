use serde::{Deserialize, Serialize};

use crate::state::sample_table::{Attribute, SampleTable};

/// Fractional padding added around the data when fitting the view.
const FIT_MARGIN: f64 = 0.05;

/// Which y-axis a value is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    /// Left axis, current in amps.
    Primary,
    /// Right axis, power in watts.
    Secondary,
}

impl From<Attribute> for YAxis {
    fn from(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Current => YAxis::Primary,
            Attribute::Power => YAxis::Secondary,
        }
    }
}

/// View state for the dual-axis chart. The x-axis is shared; each y-axis
/// keeps its own bounds, and pan/zoom moves both together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotViewState {
    pub x_min: f64,
    pub x_max: f64,
    pub y1_min: f64,
    pub y1_max: f64,
    pub y2_min: f64,
    pub y2_max: f64,
    /// Whether to auto-fit view to data on next frame
    #[serde(skip)]
    pub auto_fit: bool,
    #[serde(skip)]
    pub initialized: bool,
}

impl Default for PlotViewState {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y1_min: 0.0,
            y1_max: 1.0,
            y2_min: 0.0,
            y2_max: 1.0,
            auto_fit: true,
            initialized: false,
        }
    }
}

fn padded(min: f64, max: f64) -> Option<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let pad = (max - min) * FIT_MARGIN;
    let pad = if pad.abs() < 1e-15 { 0.5 } else { pad };
    Some((min - pad, max + pad))
}

fn finite_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

impl PlotViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit all three axes to the samples and their smoothed curves, with a
    /// 5% margin. The x range is widened to cover `x_ticks`.
    pub fn fit_to_data(
        &mut self,
        table: &SampleTable,
        current_curve: &[f64],
        power_curve: &[f64],
        x_ticks: &[f64],
    ) {
        let (x_lo, x_hi) = finite_range(table.samples().iter().map(|s| s.voltage));
        let (i_lo, i_hi) = finite_range(
            table
                .samples()
                .iter()
                .map(|s| s.current)
                .chain(current_curve.iter().copied()),
        );
        let (p_lo, p_hi) = finite_range(
            table
                .samples()
                .iter()
                .map(|s| s.power)
                .chain(power_curve.iter().copied()),
        );

        let (Some(x), Some(y1), Some(y2)) = (padded(x_lo, x_hi), padded(i_lo, i_hi), padded(p_lo, p_hi))
        else {
            return;
        };

        let (t_lo, t_hi) = finite_range(x_ticks.iter().copied());
        self.x_min = x.0.min(t_lo);
        self.x_max = x.1.max(t_hi);
        self.y1_min = y1.0;
        self.y1_max = y1.1;
        self.y2_min = y2.0;
        self.y2_max = y2.1;
        self.initialized = true;
    }

    fn y_bounds(&self, axis: YAxis) -> (f64, f64) {
        match axis {
            YAxis::Primary => (self.y1_min, self.y1_max),
            YAxis::Secondary => (self.y2_min, self.y2_max),
        }
    }

    /// Handle mouse input on the plot area for pan/zoom.
    pub fn handle_input(&mut self, response: &egui::Response, rect: egui::Rect) {
        // Pan: drag with primary mouse button
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            let dx = -(delta.x as f64) * (self.x_max - self.x_min) / rect.width() as f64;
            let dy1 = (delta.y as f64) * (self.y1_max - self.y1_min) / rect.height() as f64;
            let dy2 = (delta.y as f64) * (self.y2_max - self.y2_min) / rect.height() as f64;
            self.x_min += dx;
            self.x_max += dx;
            self.y1_min += dy1;
            self.y1_max += dy1;
            self.y2_min += dy2;
            self.y2_max += dy2;
        }

        // Zoom: scroll wheel, centered on mouse position
        let scroll_delta = response.ctx.input(|i| {
            if response.hovered() {
                i.smooth_scroll_delta.y
            } else {
                0.0
            }
        });

        if scroll_delta.abs() > 0.0 {
            let zoom_factor = 1.0 - (scroll_delta as f64) * 0.001;
            let zoom_factor = zoom_factor.clamp(0.5, 2.0);

            if let Some(mouse_pos) = response.hover_pos() {
                self.zoom_about(mouse_pos, rect, zoom_factor);
            }
        }

        // Double-click to auto-fit
        if response.double_clicked() {
            self.auto_fit = true;
        }
    }

    /// Scale all bounds by `factor` about the data point under `pos`.
    pub fn zoom_about(&mut self, pos: egui::Pos2, rect: egui::Rect, factor: f64) {
        let (cx, cy1) = self.screen_to_data(pos, rect, YAxis::Primary);
        let (_, cy2) = self.screen_to_data(pos, rect, YAxis::Secondary);
        self.x_min = cx + (self.x_min - cx) * factor;
        self.x_max = cx + (self.x_max - cx) * factor;
        self.y1_min = cy1 + (self.y1_min - cy1) * factor;
        self.y1_max = cy1 + (self.y1_max - cy1) * factor;
        self.y2_min = cy2 + (self.y2_min - cy2) * factor;
        self.y2_max = cy2 + (self.y2_max - cy2) * factor;
    }

    /// Convert screen position to data coordinates on the given y-axis.
    pub fn screen_to_data(&self, pos: egui::Pos2, rect: egui::Rect, axis: YAxis) -> (f64, f64) {
        let (y_min, y_max) = self.y_bounds(axis);
        let t_x = (pos.x - rect.left()) as f64 / rect.width() as f64;
        let t_y = 1.0 - (pos.y - rect.top()) as f64 / rect.height() as f64;
        let data_x = self.x_min + t_x * (self.x_max - self.x_min);
        let data_y = y_min + t_y * (y_max - y_min);
        (data_x, data_y)
    }

    /// Convert data coordinates on the given y-axis to a screen position.
    pub fn data_to_screen(&self, x: f64, y: f64, rect: egui::Rect, axis: YAxis) -> egui::Pos2 {
        let (y_min, y_max) = self.y_bounds(axis);
        let t_x = (x - self.x_min) / (self.x_max - self.x_min);
        let t_y = 1.0 - (y - y_min) / (y_max - y_min);
        egui::Pos2::new(
            rect.left() + (t_x as f32) * rect.width(),
            rect.top() + (t_y as f32) * rect.height(),
        )
    }
}

/// Fixed voltage ticks: `i / 10` for `i` in `0, 6, .., 42`.
pub fn voltage_ticks() -> Vec<f64> {
    (0..45).step_by(6).map(|i| i as f64 / 10.0).collect()
}

/// Compute nice grid line positions for an axis range.
/// Returns (value, is_major) pairs.
pub fn compute_grid_lines(min: f64, max: f64) -> Vec<(f64, bool)> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let raw_step = range / 8.0;
    let order = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / order;

    let nice_step = if normalized <= 1.0 {
        order
    } else if normalized <= 2.0 {
        2.0 * order
    } else if normalized <= 5.0 {
        5.0 * order
    } else {
        10.0 * order
    };

    let minor_step = nice_step / 5.0;

    let start = (min / minor_step).floor() as i64;
    let end = (max / minor_step).ceil() as i64;

    let mut lines = Vec::new();
    for i in start..=end {
        let val = i as f64 * minor_step;
        if val >= min && val <= max {
            let is_major = ((val / nice_step).round() * nice_step - val).abs() < nice_step * 0.01;
            lines.push((val, is_major));
        }
    }
    lines
}

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val.abs() >= 1e6 || (val != 0.0 && val.abs() < 1e-3) {
        format!("{val:.2e}")
    } else if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.6}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(100.0, 50.0), egui::Vec2::new(800.0, 400.0))
    }

    #[test]
    fn test_voltage_ticks() {
        let ticks = voltage_ticks();
        assert_eq!(ticks.len(), 8);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[1], 0.6);
        assert_eq!(ticks[7], 4.2);
    }

    #[test]
    fn test_fit_covers_samples_and_ticks() {
        let table = SampleTable::panel();
        let mut view = PlotViewState::new();
        view.fit_to_data(&table, &[0.8, 0.08], &[0.0, 1.575], &voltage_ticks());

        assert!(view.initialized);
        assert!((view.x_min - (0.0 - 3.75 * FIT_MARGIN)).abs() < 1e-12);
        assert_eq!(view.x_max, 4.2);
        assert!(view.y1_min < 0.08 && view.y1_max > 0.8);
        assert!(view.y2_min < 0.0 && view.y2_max > 1.575);
    }

    #[test]
    fn test_screen_round_trip_per_axis() {
        let mut view = PlotViewState::new();
        view.x_max = 4.0;
        view.y2_max = 2.0;
        let r = rect();

        let p = view.data_to_screen(2.0, 0.5, r, YAxis::Primary);
        assert!((p.x - 500.0).abs() < 1e-3);
        assert!((p.y - 250.0).abs() < 1e-3);

        // Same screen height means a different value on the power axis.
        let (_, power) = view.screen_to_data(p, r, YAxis::Secondary);
        assert!((power - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = PlotViewState::new();
        let r = rect();
        let anchor = egui::Pos2::new(300.0, 150.0);
        let before = view.screen_to_data(anchor, r, YAxis::Secondary);
        view.zoom_about(anchor, r, 0.5);
        let after = view.screen_to_data(anchor, r, YAxis::Secondary);

        assert!((before.0 - after.0).abs() < 1e-6);
        assert!((before.1 - after.1).abs() < 1e-6);
        assert!((view.x_max - view.x_min - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_grid_lines_and_labels() {
        let lines = compute_grid_lines(0.0, 8.0);
        let majors: Vec<f64> = lines.iter().filter(|(_, m)| *m).map(|(v, _)| *v).collect();
        assert_eq!(majors.len(), 9);
        assert_eq!(majors.first().copied(), Some(0.0));
        assert!(majors.iter().any(|v| (v - 3.0).abs() < 1e-9));
        assert!(compute_grid_lines(1.0, 1.0).is_empty());

        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(1.2), "1.2");
        assert_eq!(format_tick_value(0.6000000000000001), "0.6");
    }
}
