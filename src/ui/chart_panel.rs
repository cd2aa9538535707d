use crate::processing::extrema::OperatingPoint;
use crate::processing::hover::{HoverAxis, HoverTree};
use crate::render::plot_interaction::{self, PlotViewState, YAxis};
use crate::state::app_state::AppState;
use crate::state::chart_state::{ChartState, SortDirection};
use crate::state::sample_table::Attribute;
use crate::state::theme::{Theme, CURRENT_COLOR, POWER_COLOR};

/// Offset of an annotation label from its point, in data units.
const LABEL_OFFSET: f64 = 0.5;
/// Offset of the coordinate text below its point, in data units.
const COORD_OFFSET: f64 = 0.1;
/// Hover snap distance in screen pixels.
const HOVER_RADIUS: f64 = 12.0;

/// Actions that the chart panel can request from the parent.
pub enum ChartAction {
    None,
    CenterView,
    ExportCsv,
    ExportImageSave,
    ExportImageClipboard,
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Helper to create a selected/toggled toolbar button.
fn toolbar_toggle_btn(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(0.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
    };
    ui.add(btn)
}

/// Render the chart panel. Returns an action if the user clicked a button.
/// `panel_height` is the target total height for this panel.
pub fn show_chart_panel(
    chart: &mut ChartState,
    state: &mut AppState,
    ui: &mut egui::Ui,
    panel_height: f32,
) -> ChartAction {
    let mut action = ChartAction::None;

    let frame_resp = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
        // --- Toolbar row ---
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;

            let view_active = state.show_data_table;
            if toolbar_toggle_btn(ui, if view_active { "Graph View" } else { "Table View" }, view_active)
                .on_hover_text("Toggle between chart and sample table")
                .clicked()
            {
                state.show_data_table = !state.show_data_table;
            }

            ui.separator();

            if toolbar_btn(ui, "Fit View").on_hover_text("Auto-fit to data bounds").clicked() {
                action = ChartAction::CenterView;
            }
            if toolbar_toggle_btn(ui, "Samples", state.show_samples)
                .on_hover_text("Show raw sample markers")
                .clicked()
            {
                state.show_samples = !state.show_samples;
            }
            if toolbar_toggle_btn(ui, "Annotations", state.show_annotations)
                .on_hover_text("Show Pmax / Imp / Vmp markers")
                .clicked()
            {
                state.show_annotations = !state.show_annotations;
            }

            ui.separator();

            let export_popup_id = ui.make_persistent_id("export_popup");
            let export_btn_resp = toolbar_btn(ui, "Export").on_hover_text("Export data or image");
            if export_btn_resp.clicked() {
                ui.memory_mut(|m| m.toggle_popup(export_popup_id));
            }
            egui::popup_below_widget(ui, export_popup_id, &export_btn_resp, egui::PopupCloseBehavior::CloseOnClickOutside, |ui| {
                ui.set_min_width(160.0);
                if ui.button("Save as CSV").clicked() {
                    action = ChartAction::ExportCsv;
                    ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                }
                if ui.button("Save as Image").clicked() {
                    action = ChartAction::ExportImageSave;
                    ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                }
                if ui.button("Copy Image").clicked() {
                    action = ChartAction::ExportImageClipboard;
                    ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                }
            });
        });

        ui.add_space(4.0);

        // Overhead: frame inner margin (20) + toolbar (~32) + spacing + border.
        let plot_area_height = (panel_height - 70.0).max(200.0);

        if state.show_data_table {
            show_table_view(chart, ui);
        } else {
            show_plot(chart, state, ui, plot_area_height);
        }
    });
    chart.last_frame_rect = Some(frame_resp.response.rect);

    action
}

// ---------------------------------------------------------------------------
// Dual-axis plot
// ---------------------------------------------------------------------------

fn show_plot(chart: &ChartState, state: &mut AppState, ui: &mut egui::Ui, plot_area_height: f32) {
    if state.view.auto_fit || !state.view.initialized {
        state.view.fit_to_data(
            &chart.table,
            &chart.current_curve.value,
            &chart.power_curve.value,
            &chart.x_ticks,
        );
        state.view.auto_fit = false;
    }

    // --- Layout: title on top, current axis left, power axis right ---
    let left_margin = 80.0_f32;
    let right_margin = 80.0_f32;
    let bottom_margin = 50.0_f32;
    let top_margin = 40.0_f32;
    let plot_height = (plot_area_height - bottom_margin - top_margin).max(100.0);

    let total_height = plot_height + bottom_margin + top_margin;
    let available_width = ui.available_width();
    let total_rect = ui.allocate_space(egui::Vec2::new(available_width, total_height)).1;

    let plot_rect = egui::Rect::from_min_max(
        egui::Pos2::new(total_rect.left() + left_margin, total_rect.top() + top_margin),
        egui::Pos2::new(total_rect.right() - right_margin, total_rect.bottom() - bottom_margin),
    );

    let plot_id = egui::Id::new("pv_plot");
    let response = ui.interact(plot_rect, plot_id, egui::Sense::click_and_drag());
    state.view.handle_input(&response, plot_rect);

    let theme = state.theme;
    let pv = &state.view;
    let painter = ui.painter_at(total_rect);
    let plot_painter = painter.with_clip_rect(plot_rect);

    painter.rect_filled(plot_rect, 0.0, theme.plot_bg());

    let y1_grid = plot_interaction::compute_grid_lines(pv.y1_min, pv.y1_max);
    let y2_grid = plot_interaction::compute_grid_lines(pv.y2_min, pv.y2_max);

    draw_grid(&plot_painter, pv, plot_rect, &chart.x_ticks, &y1_grid, &y2_grid, &theme);

    // --- Smoothed curves and raw samples ---
    for (attribute, color) in [(Attribute::Current, CURRENT_COLOR), (Attribute::Power, POWER_COLOR)] {
        let axis = YAxis::from(attribute);
        let points: Vec<egui::Pos2> = chart
            .curve(attribute)
            .points()
            .filter(|(v, y)| v.is_finite() && y.is_finite())
            .map(|(v, y)| pv.data_to_screen(v, y, plot_rect, axis))
            .collect();
        plot_painter.add(egui::Shape::line(points, egui::Stroke::new(1.5, color)));

        if state.show_samples {
            for s in chart.table.samples() {
                let pos = pv.data_to_screen(s.voltage, attribute.of(s), plot_rect, axis);
                plot_painter.circle_filled(pos, 3.0, color);
            }
        }
    }

    if state.show_annotations {
        draw_annotations(&plot_painter, pv, plot_rect, chart, &theme);
    }

    draw_axes_and_labels(&painter, chart, pv, plot_rect, total_rect, &y1_grid, &y2_grid);
    draw_legend(&painter, plot_rect);

    if response.hovered() {
        if let Some(mouse_pos) = response.hover_pos() {
            draw_hover_tooltip(&painter, chart, pv, plot_rect, mouse_pos);
        }
    }
}

fn dashed(painter: &egui::Painter, a: egui::Pos2, b: egui::Pos2, stroke: egui::Stroke) {
    painter.extend(egui::Shape::dashed_line(&[a, b], stroke, 4.0, 3.0));
}

fn draw_grid(
    painter: &egui::Painter,
    pv: &PlotViewState,
    plot_rect: egui::Rect,
    x_ticks: &[f64],
    y1_grid: &[(f64, bool)],
    y2_grid: &[(f64, bool)],
    theme: &Theme,
) {
    let stroke = egui::Stroke::new(0.5, theme.grid_color());

    for &xval in x_ticks {
        let x = pv.data_to_screen(xval, pv.y1_min, plot_rect, YAxis::Primary).x;
        dashed(painter, egui::Pos2::new(x, plot_rect.top()), egui::Pos2::new(x, plot_rect.bottom()), stroke);
    }

    for (grid, axis) in [(y1_grid, YAxis::Primary), (y2_grid, YAxis::Secondary)] {
        for &(yval, is_major) in grid {
            if !is_major {
                continue;
            }
            let y = pv.data_to_screen(pv.x_min, yval, plot_rect, axis).y;
            dashed(painter, egui::Pos2::new(plot_rect.left(), y), egui::Pos2::new(plot_rect.right(), y), stroke);
        }
    }
}

// ---------------------------------------------------------------------------
// Operating-point annotations
// ---------------------------------------------------------------------------

/// One annotated marker: the point, where its label goes, and where its
/// coordinate text goes, all in data units on `axis`.
struct Annotation {
    axis: YAxis,
    point: (f64, f64),
    label: (&'static str, &'static str),
    label_at: (f64, f64),
    coords: String,
    coords_at: (f64, f64),
}

fn annotations(max_power: &OperatingPoint, max_current: &OperatingPoint) -> [Annotation; 3] {
    let (pv_v, pv_i, pv_p) = (max_power.voltage, max_power.current, max_power.power);
    let (mc_v, mc_i) = (max_current.voltage, max_current.current);
    [
        Annotation {
            axis: YAxis::Primary,
            point: (pv_v, pv_i),
            label: ("I", "mp"),
            label_at: (pv_v + LABEL_OFFSET, pv_i),
            coords: format!("({pv_v:.2}, {pv_i:.2})"),
            coords_at: (pv_v + LABEL_OFFSET, pv_i - COORD_OFFSET),
        },
        Annotation {
            axis: YAxis::Secondary,
            point: (pv_v, pv_p),
            label: ("P", "max"),
            label_at: (pv_v + LABEL_OFFSET, pv_p),
            coords: format!("({pv_v:.2}, {pv_p:.2})"),
            coords_at: (pv_v + LABEL_OFFSET, pv_p - COORD_OFFSET),
        },
        Annotation {
            axis: YAxis::Primary,
            point: (mc_v, mc_i),
            label: ("V", "mp"),
            label_at: (mc_v, mc_i + LABEL_OFFSET),
            coords: format!("({mc_v:.2}, {mc_i:.2})"),
            coords_at: (mc_v, mc_i - COORD_OFFSET),
        },
    ]
}

/// Keep a label anchor inside the plot so it stays readable after zooming.
fn clamp_into(pos: egui::Pos2, rect: egui::Rect, pad: f32) -> egui::Pos2 {
    egui::Pos2::new(
        pos.x.clamp(rect.left() + pad, (rect.right() - 4.0 * pad).max(rect.left() + pad)),
        pos.y.clamp(rect.top() + 2.0 * pad, (rect.bottom() - pad).max(rect.top() + 2.0 * pad)),
    )
}

/// Draw `base` with `sub` as a smaller, lowered suffix.
fn draw_subscript_label(
    painter: &egui::Painter,
    pos: egui::Pos2,
    (base, sub): (&str, &str),
    color: egui::Color32,
) {
    let base_rect = painter.text(
        pos,
        egui::Align2::LEFT_BOTTOM,
        base,
        egui::FontId::proportional(13.0),
        color,
    );
    painter.text(
        egui::Pos2::new(base_rect.right(), pos.y + 3.0),
        egui::Align2::LEFT_BOTTOM,
        sub,
        egui::FontId::proportional(9.0),
        color,
    );
}

fn draw_annotations(
    painter: &egui::Painter,
    pv: &PlotViewState,
    plot_rect: egui::Rect,
    chart: &ChartState,
    theme: &Theme,
) {
    let ink = theme.marker_color();
    let edge = theme.marker_edge();

    for ann in annotations(&chart.report.max_power, &chart.report.max_current) {
        let point = pv.data_to_screen(ann.point.0, ann.point.1, plot_rect, ann.axis);
        let label_pos = clamp_into(
            pv.data_to_screen(ann.label_at.0, ann.label_at.1, plot_rect, ann.axis),
            plot_rect,
            8.0,
        );
        let coords_pos = clamp_into(
            pv.data_to_screen(ann.coords_at.0, ann.coords_at.1, plot_rect, ann.axis),
            plot_rect,
            8.0,
        );

        // Arrow from the label to the point, trimmed 5% at each end.
        let span = point - label_pos;
        if span.length() > 1.0 {
            painter.arrow(label_pos + span * 0.05, span * 0.9, egui::Stroke::new(1.2, ink));
        }

        painter.circle(point, 4.0, ink, egui::Stroke::new(1.0, edge));
        draw_subscript_label(painter, label_pos, ann.label, ink);
        painter.text(
            coords_pos,
            egui::Align2::LEFT_BOTTOM,
            &ann.coords,
            egui::FontId::proportional(10.0),
            ink,
        );
    }
}

// ---------------------------------------------------------------------------
// Axes, title and legend
// ---------------------------------------------------------------------------

fn draw_rotated_label(
    painter: &egui::Painter,
    center: egui::Pos2,
    text: &str,
    color: egui::Color32,
) {
    let galley = painter.layout_no_wrap(text.to_string(), egui::FontId::proportional(13.0), color);
    let size = galley.size();
    // Rotating -90 degrees about the anchor makes the text run upward.
    let anchor = egui::Pos2::new(center.x - size.y / 2.0, center.y + size.x / 2.0);
    painter.add(
        egui::epaint::TextShape::new(anchor, galley, color)
            .with_angle(-std::f32::consts::FRAC_PI_2),
    );
}

fn draw_axes_and_labels(
    painter: &egui::Painter,
    chart: &ChartState,
    pv: &PlotViewState,
    plot_rect: egui::Rect,
    total_rect: egui::Rect,
    y1_grid: &[(f64, bool)],
    y2_grid: &[(f64, bool)],
) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.8);
    let tick_font = egui::FontId::proportional(11.0);

    painter.rect_stroke(plot_rect, 0.0, egui::Stroke::new(1.0, dim_color), egui::StrokeKind::Outside);

    // --- Title ---
    painter.text(
        egui::Pos2::new(plot_rect.center().x, total_rect.top() + 6.0),
        egui::Align2::CENTER_TOP,
        &chart.title,
        egui::FontId::proportional(16.0),
        text_color,
    );

    // --- X-axis ticks ---
    for &xval in &chart.x_ticks {
        let screen_x = pv.data_to_screen(xval, pv.y1_min, plot_rect, YAxis::Primary).x;
        if screen_x < plot_rect.left() || screen_x > plot_rect.right() {
            continue;
        }
        painter.line_segment(
            [egui::Pos2::new(screen_x, plot_rect.bottom()), egui::Pos2::new(screen_x, plot_rect.bottom() + 4.0)],
            egui::Stroke::new(1.0, dim_color),
        );
        painter.text(
            egui::Pos2::new(screen_x, plot_rect.bottom() + 6.0),
            egui::Align2::CENTER_TOP,
            plot_interaction::format_tick_value(xval),
            tick_font.clone(),
            dim_color,
        );
    }

    painter.text(
        egui::Pos2::new(plot_rect.center().x, total_rect.bottom() - 4.0),
        egui::Align2::CENTER_BOTTOM,
        "Voltage (V)",
        egui::FontId::proportional(13.0),
        text_color,
    );

    // --- Y-axis ticks: current on the left, power on the right ---
    for (grid, axis) in [(y1_grid, YAxis::Primary), (y2_grid, YAxis::Secondary)] {
        for &(yval, is_major) in grid {
            if !is_major {
                continue;
            }
            let screen_y = pv.data_to_screen(pv.x_min, yval, plot_rect, axis).y;
            if screen_y < plot_rect.top() || screen_y > plot_rect.bottom() {
                continue;
            }
            let label = plot_interaction::format_tick_value(yval);
            let (edge_x, tick_dx, align) = match axis {
                YAxis::Primary => (plot_rect.left(), -4.0, egui::Align2::RIGHT_CENTER),
                YAxis::Secondary => (plot_rect.right(), 4.0, egui::Align2::LEFT_CENTER),
            };
            painter.line_segment(
                [egui::Pos2::new(edge_x, screen_y), egui::Pos2::new(edge_x + tick_dx, screen_y)],
                egui::Stroke::new(1.0, dim_color),
            );
            painter.text(
                egui::Pos2::new(edge_x + tick_dx * 1.5, screen_y),
                align,
                label,
                tick_font.clone(),
                dim_color,
            );
        }
    }

    draw_rotated_label(
        painter,
        egui::Pos2::new(total_rect.left() + 12.0, plot_rect.center().y),
        "Current (I)",
        text_color,
    );
    draw_rotated_label(
        painter,
        egui::Pos2::new(total_rect.right() - 12.0, plot_rect.center().y),
        "Power (W)",
        text_color,
    );
}

fn draw_legend(painter: &egui::Painter, plot_rect: egui::Rect) {
    let text_color = painter.ctx().style().visuals.text_color();
    let bg_color = painter.ctx().style().visuals.window_fill;
    let font = egui::FontId::proportional(11.0);
    let entries = [(Attribute::Current, CURRENT_COLOR), (Attribute::Power, POWER_COLOR)];

    let max_width = entries
        .iter()
        .map(|(a, _)| painter.layout_no_wrap(a.label().to_string(), font.clone(), text_color).rect.width())
        .fold(0.0_f32, f32::max);

    let legend_width = max_width + 24.0; // line swatch + padding
    let legend_height = entries.len() as f32 * 16.0 + 8.0;
    let x = plot_rect.right() - 8.0;
    let mut y = plot_rect.top() + 8.0;

    let legend_rect = egui::Rect::from_min_size(
        egui::Pos2::new(x - legend_width - 4.0, y - 4.0),
        egui::Vec2::new(legend_width + 8.0, legend_height),
    );
    painter.rect_filled(legend_rect, 4.0, bg_color.gamma_multiply(0.85));
    painter.rect_stroke(legend_rect, 4.0, egui::Stroke::new(0.5, text_color.gamma_multiply(0.3)), egui::StrokeKind::Outside);

    for (attribute, color) in entries {
        painter.line_segment(
            [egui::Pos2::new(x - legend_width, y + 6.0), egui::Pos2::new(x - legend_width + 12.0, y + 6.0)],
            egui::Stroke::new(2.0, color),
        );
        painter.text(
            egui::Pos2::new(x - legend_width + 16.0, y + 6.0),
            egui::Align2::LEFT_CENTER,
            attribute.label(),
            font.clone(),
            text_color,
        );
        y += 16.0;
    }
}

// ---------------------------------------------------------------------------
// Hover tooltip
// ---------------------------------------------------------------------------

fn draw_hover_tooltip(
    painter: &egui::Painter,
    chart: &ChartState,
    pv: &PlotViewState,
    plot_rect: egui::Rect,
    mouse_pos: egui::Pos2,
) {
    let to_screen = |attribute: Attribute| -> Vec<[f64; 2]> {
        chart
            .table
            .samples()
            .iter()
            .map(|s| {
                let p = pv.data_to_screen(s.voltage, attribute.of(s), plot_rect, attribute.into());
                [p.x as f64, p.y as f64]
            })
            .collect()
    };
    let tree = HoverTree::build(&to_screen(Attribute::Current), &to_screen(Attribute::Power));

    let Some((idx, axis, dist)) = tree.nearest(mouse_pos.x as f64, mouse_pos.y as f64) else {
        return;
    };
    if dist > HOVER_RADIUS {
        return;
    }
    let Some(sample) = chart.table.samples().get(idx) else {
        return;
    };

    let (value, y_axis, color) = match axis {
        HoverAxis::Current => (sample.current, YAxis::Primary, CURRENT_COLOR),
        HoverAxis::Power => (sample.power, YAxis::Secondary, POWER_COLOR),
    };
    let pos = pv.data_to_screen(sample.voltage, value, plot_rect, y_axis);
    let text = format!(
        "V = {:.2} V, I = {:.2} A, P = {:.3} W",
        sample.voltage, sample.current, sample.power
    );

    // Draw highlight dot
    painter.circle_filled(pos, 5.0, color);
    painter.circle_stroke(pos, 5.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

    // Draw tooltip background + text
    let font = egui::FontId::proportional(11.0);
    let text_color = painter.ctx().style().visuals.text_color();
    let galley = painter.layout_no_wrap(text.clone(), font.clone(), text_color);
    let text_rect = galley.rect;
    let tooltip_pos = egui::Pos2::new(
        (pos.x + 10.0).min(plot_rect.right() - text_rect.width() - 8.0),
        pos.y - text_rect.height() - 8.0,
    );
    let bg_rect = egui::Rect::from_min_size(
        egui::Pos2::new(tooltip_pos.x - 4.0, tooltip_pos.y - 2.0),
        egui::Vec2::new(text_rect.width() + 8.0, text_rect.height() + 4.0),
    );

    let bg_color = painter.ctx().style().visuals.window_fill;
    painter.rect_filled(bg_rect, 3.0, bg_color.gamma_multiply(0.9));
    painter.rect_stroke(bg_rect, 3.0, egui::Stroke::new(0.5, color), egui::StrokeKind::Outside);
    painter.text(tooltip_pos, egui::Align2::LEFT_TOP, text, font, text_color);
}

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

fn cycle_sort(chart: &mut ChartState, col: usize) {
    chart.table_sort = match chart.table_sort {
        Some((c, SortDirection::Ascending)) if c == col => Some((col, SortDirection::Descending)),
        Some((c, SortDirection::Descending)) if c == col => None,
        _ => Some((col, SortDirection::Ascending)),
    };
}

/// Row order for the sample table under the given sort. Column 0 is
/// voltage, 1 current, 2 power.
fn sorted_rows(chart: &ChartState) -> Vec<usize> {
    let samples = chart.table.samples();
    let mut indices: Vec<usize> = (0..samples.len()).collect();
    if let Some((col, dir)) = chart.table_sort {
        let key = |i: usize| match col {
            0 => samples[i].voltage,
            1 => samples[i].current,
            _ => samples[i].power,
        };
        indices.sort_by(|&a, &b| {
            let cmp = key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal);
            match dir {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
    }
    indices
}

fn show_table_view(chart: &mut ChartState, ui: &mut egui::Ui) {
    use egui_extras::{Column, TableBuilder};

    let headers = ["Voltage (V)", "Current (A)", "Power (W)"];
    let rows = sorted_rows(chart);
    let current_sort = chart.table_sort;
    let max_power_idx = chart.report.max_power.index;
    let max_current_idx = chart.report.max_current.index;

    let clicked_col: std::cell::Cell<Option<usize>> = std::cell::Cell::new(None);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(110.0), headers.len())
        .column(Column::remainder().at_least(120.0))
        .min_scrolled_height(300.0)
        .header(20.0, |mut header| {
            for (col, label) in headers.iter().enumerate() {
                header.col(|ui| {
                    let arrow = match current_sort {
                        Some((c, SortDirection::Ascending)) if c == col => " ^",
                        Some((c, SortDirection::Descending)) if c == col => " v",
                        _ => "",
                    };
                    if ui.button(format!("{label}{arrow}")).clicked() {
                        clicked_col.set(Some(col));
                    }
                });
            }
            header.col(|ui| {
                ui.strong("Operating Point");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let idx = rows[row.index()];
                let s = chart.table.samples()[idx];
                for value in [s.voltage, s.current, s.power] {
                    row.col(|ui| {
                        ui.label(format!("{value:.3}"));
                    });
                }
                row.col(|ui| {
                    let mut marks = Vec::new();
                    if idx == max_power_idx {
                        marks.push("Pmax");
                    }
                    if idx == max_current_idx {
                        marks.push("Imp / Vmp");
                    }
                    ui.label(marks.join(", "));
                });
            });
        });

    if let Some(col) = clicked_col.get() {
        cycle_sort(chart, col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sample_table::SampleTable;

    #[test]
    fn test_annotation_placement() {
        let chart = ChartState::build(SampleTable::panel()).unwrap();
        let [imp, pmax, vmp] = annotations(&chart.report.max_power, &chart.report.max_current);

        assert_eq!(imp.axis, YAxis::Primary);
        assert_eq!(imp.point, (2.5, 0.63));
        assert_eq!(imp.label_at, (3.0, 0.63));
        assert_eq!(imp.coords, "(2.50, 0.63)");

        assert_eq!(pmax.axis, YAxis::Secondary);
        assert_eq!(pmax.coords, "(2.50, 1.57)");
        assert!((pmax.coords_at.1 - 1.475).abs() < 1e-12);

        assert_eq!(vmp.point, (0.0, 0.8));
        assert!((vmp.label_at.1 - 1.3).abs() < 1e-12);
        assert_eq!(vmp.coords, "(0.00, 0.80)");
    }

    #[test]
    fn test_table_sorting_cycles() {
        let mut chart = ChartState::build(SampleTable::panel()).unwrap();
        assert_eq!(sorted_rows(&chart), (0..9).collect::<Vec<_>>());

        cycle_sort(&mut chart, 2);
        let rows = sorted_rows(&chart);
        assert_eq!(rows[0], 0);
        assert_eq!(rows[8], 5);

        cycle_sort(&mut chart, 2);
        assert_eq!(sorted_rows(&chart)[0], 5);

        cycle_sort(&mut chart, 2);
        assert!(chart.table_sort.is_none());
    }

    #[test]
    fn test_clamp_keeps_labels_inside() {
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::Vec2::new(400.0, 200.0));
        let p = clamp_into(egui::Pos2::new(500.0, -50.0), rect, 8.0);
        assert!(rect.contains(p));
    }
}
