use std::sync::Arc;

use eframe::egui;

use crate::error::{CurveError, Result};
use crate::state::app_state::{AppState, VERSION};
use crate::state::chart_state::ChartState;
use crate::state::theme::Theme;
use crate::ui::chart_panel::{self, ChartAction};

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// The main pvcurve application.
pub struct PvCurveApp {
    pub state: AppState,
    pub chart: ChartState,
    /// An error message to display in the footer until dismissed.
    pub error_message: Option<String>,
    /// Whether to show the About window (hidden menu).
    pub show_about: bool,
    /// Pending screenshot action (save file or clipboard).
    pending_screenshot: Option<PendingScreenshot>,
}

impl PvCurveApp {
    pub fn new(cc: &eframe::CreationContext<'_>, chart: ChartState) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(20.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(state.theme.visuals());

        Self {
            state,
            chart,
            error_message: None,
            show_about: false,
            pending_screenshot: None,
        }
    }

    fn report_error(&mut self, what: &str, err: impl std::fmt::Display) {
        tracing::error!("{what}: {err}");
        self.error_message = Some(format!("{what}: {err}"));
    }

    /// Export the samples and smoothed curves to a CSV file via a save dialog.
    fn export_csv(&mut self) {
        let filename = format!("{}.csv", self.chart.title.replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&filename)
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };

        let result: Result<()> = std::fs::File::create(&path)
            .map_err(CurveError::from)
            .and_then(|file| self.chart.write_csv(file));
        match result {
            Ok(()) => tracing::info!("Exported CSV to {:?}", path),
            Err(e) => self.report_error("Failed to export CSV", e),
        }
    }

    fn save_session(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("session.pvcurve.json")
            .add_filter("pvcurve Session", &["json"])
            .save_file()
        {
            if let Err(e) = self.state.save(&path) {
                self.report_error("Failed to save session", e);
            }
        }
    }

    fn load_session(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("pvcurve Session", &["json"])
            .pick_file()
        {
            match AppState::load(&path) {
                Ok(loaded) => self.state = loaded,
                Err(e) => self.report_error("Failed to load session", e),
            }
        }
    }

    /// Crop a full-window screenshot to the chart panel and hand it to the
    /// pending action.
    fn handle_screenshot(&mut self, ctx: &egui::Context, color_image: Arc<egui::ColorImage>) {
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        let ppp = ctx.pixels_per_point();
        let full_w = color_image.width();
        let full_h = color_image.height();

        let (rgba, width, height) = if let Some(rect) = self.chart.last_frame_rect {
            let x0 = ((rect.left() * ppp) as usize).min(full_w);
            let y0 = ((rect.top() * ppp) as usize).min(full_h);
            let x1 = ((rect.right() * ppp).ceil() as usize).min(full_w);
            let y1 = ((rect.bottom() * ppp).ceil() as usize).min(full_h);
            let cw = x1.saturating_sub(x0);
            let ch = y1.saturating_sub(y0);
            let mut cropped = Vec::with_capacity(cw * ch * 4);
            for row in y0..y1 {
                for col in x0..x1 {
                    let c = color_image.pixels[row * full_w + col];
                    cropped.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
                }
            }
            (cropped, cw, ch)
        } else {
            let rgba: Vec<u8> = color_image
                .pixels
                .iter()
                .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
                .collect();
            (rgba, full_w, full_h)
        };

        match action {
            PendingScreenshot::SaveFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("pv_curve.png")
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    match save_png(&path, rgba, width, height) {
                        Ok(()) => tracing::info!("Saved chart image to {:?}", path),
                        Err(e) => self.report_error("Failed to save image", e),
                    }
                }
            }
            PendingScreenshot::Clipboard => match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    let img_data = arboard::ImageData {
                        width,
                        height,
                        bytes: std::borrow::Cow::Owned(rgba),
                    };
                    if let Err(e) = clipboard.set_image(img_data) {
                        self.report_error("Failed to copy to clipboard", e);
                    } else {
                        tracing::info!("Copied chart image to clipboard");
                    }
                }
                Err(e) => self.report_error("Failed to access clipboard", e),
            },
        }
    }
}

fn save_png(path: &std::path::Path, rgba: Vec<u8>, width: usize, height: usize) -> Result<()> {
    let img = image::RgbaImage::from_raw(width as u32, height as u32, rgba).ok_or_else(|| {
        CurveError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "screenshot buffer does not match its size",
        ))
    })?;
    img.save(path)?;
    Ok(())
}

impl eframe::App for PvCurveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Handle screenshot events from previous frame
        // ------------------------------------------------------------------
        if self.pending_screenshot.is_some() {
            let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
            ctx.input(|i| {
                for event in &i.raw.events {
                    if let egui::Event::Screenshot { image, .. } = event {
                        screenshot_image = Some(image.clone());
                    }
                }
            });
            if let Some(image) = screenshot_image {
                self.handle_screenshot(ctx, image);
            }
        }

        // --- Header panel ---
        let mut save_session = false;
        let mut load_session = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let heading_response = ui.heading("pvcurve");
                heading_response.context_menu(|ui| {
                    if ui.button("About pvcurve").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });

                ui.separator();

                if ui.button("Save Session").clicked() {
                    save_session = true;
                }
                if ui.button("Load Session").clicked() {
                    load_session = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.state.theme {
                        Theme::Dark => "Light Mode",
                        Theme::Light => "Dark Mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.state.theme = self.state.theme.toggle();
                        tracing::debug!(theme = self.state.theme.label(), "Theme changed");
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

        if save_session {
            self.save_session();
        }
        if load_session {
            self.load_session();
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let p = &self.chart.report.max_power;
                ui.label(
                    egui::RichText::new(format!(
                        "Pmax {:.3} W at {:.2} V  |  Imp {:.2} A  |  Vmp {:.2} V",
                        p.power,
                        p.voltage,
                        self.chart.report.imp(),
                        self.chart.report.vmp(),
                    ))
                    .weak(),
                );

                if let Some(msg) = &self.error_message {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                    if ui.small_button("dismiss").clicked() {
                        self.error_message = None;
                    }
                }
            });
        });

        // --- Central panel with the chart ---
        let mut action = ChartAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let panel_height = ui.available_height();
            action = chart_panel::show_chart_panel(&mut self.chart, &mut self.state, ui, panel_height);
        });

        match action {
            ChartAction::None => {}
            ChartAction::CenterView => {
                self.state.view.auto_fit = true;
            }
            ChartAction::ExportCsv => {
                self.export_csv();
            }
            ChartAction::ExportImageSave => {
                self.pending_screenshot = Some(PendingScreenshot::SaveFile);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            ChartAction::ExportImageClipboard => {
                self.pending_screenshot = Some(PendingScreenshot::Clipboard);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
        }

        // --- About window (hidden menu) ---
        if self.show_about {
            egui::Window::new("About pvcurve")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.heading("pvcurve");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Photovoltaic I-V and P-V curve viewer.");
                    ui.add_space(10.0);
                    ui.label("Drag to pan, scroll to zoom, double-click to fit.");
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
