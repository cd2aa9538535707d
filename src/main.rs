mod app;
mod error;
mod processing;
mod render;
mod state;
mod ui;

use app::PvCurveApp;
use eframe::egui;
use eframe::egui_wgpu;
use state::chart_state::{ChartState, CHART_TITLE};
use state::sample_table::{SampleTable, PANEL_CURRENT, PANEL_VOLTAGE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries only the operating-point report.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let chart = ChartState::build(SampleTable::from_pairs(&PANEL_VOLTAGE, &PANEL_CURRENT)?)?;
    print!("{}", chart.report);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(CHART_TITLE)
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([640.0, 420.0]),
        // Configure wgpu for driver stability on Windows.
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        CHART_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(PvCurveApp::new(cc, chart)))),
    )?;
    Ok(())
}
