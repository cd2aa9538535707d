use std::io::Write;

use crate::error::Result;
use crate::processing::extrema::CurveReport;
use crate::processing::spline::{self, SmoothedCurve, SMOOTH_POINTS};
use crate::render::plot_interaction;
use crate::state::sample_table::{Attribute, SampleTable};

pub const CHART_TITLE: &str = "Voltage vs. Current and Power";

/// Direction for table column sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Everything derived from the sample table that the chart draws.
/// Built once at startup; only the UI bookkeeping fields change afterwards.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub title: String,
    pub table: SampleTable,
    pub current_curve: SmoothedCurve,
    pub power_curve: SmoothedCurve,
    pub report: CurveReport,
    pub x_ticks: Vec<f64>,
    /// Table sort state: (column_index, sort_direction).
    /// None = original order, Some((col, direction)) = sorted.
    pub table_sort: Option<(usize, SortDirection)>,
    /// Screen rect of the chart panel (set each frame for screenshot cropping).
    pub last_frame_rect: Option<egui::Rect>,
}

impl ChartState {
    pub fn build(table: SampleTable) -> Result<Self> {
        let current_curve = spline::interpolate(&table, Attribute::Current, SMOOTH_POINTS)?;
        let power_curve = spline::interpolate(&table, Attribute::Power, SMOOTH_POINTS)?;
        let report = CurveReport::from_table(&table)
            .ok_or(crate::error::CurveError::TooFewSamples(table.len()))?;

        for point in [&report.max_power, &report.max_current] {
            tracing::info!(
                kind = point.kind.label(),
                voltage = point.voltage,
                current = point.current,
                power = point.power,
                "Located operating point"
            );
        }

        Ok(Self {
            title: CHART_TITLE.to_string(),
            table,
            current_curve,
            power_curve,
            report,
            x_ticks: plot_interaction::voltage_ticks(),
            table_sort: None,
            last_frame_rect: None,
        })
    }

    pub fn curve(&self, attribute: Attribute) -> &SmoothedCurve {
        match attribute {
            Attribute::Current => &self.current_curve,
            Attribute::Power => &self.power_curve,
        }
    }

    /// Write the samples, then the smoothed curves on their shared voltage
    /// grid, as two CSV sections separated by a blank record.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        wtr.write_record(["Voltage (V)", "Current (A)", "Power (W)"])?;
        for s in self.table.samples() {
            wtr.write_record(&[
                s.voltage.to_string(),
                s.current.to_string(),
                s.power.to_string(),
            ])?;
        }

        wtr.write_record([""])?;
        wtr.write_record([
            "Smoothed Voltage (V)",
            "Smoothed Current (A)",
            "Smoothed Power (W)",
        ])?;
        for ((v, i), p) in self
            .current_curve
            .voltage
            .iter()
            .zip(self.current_curve.value.iter())
            .zip(self.power_curve.value.iter())
        {
            wtr.write_record(&[v.to_string(), i.to_string(), p.to_string()])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_panel_chart() {
        let chart = ChartState::build(SampleTable::panel()).unwrap();
        assert_eq!(chart.title, "Voltage vs. Current and Power");
        assert_eq!(chart.current_curve.len(), SMOOTH_POINTS);
        assert_eq!(chart.power_curve.len(), SMOOTH_POINTS);
        assert_eq!(chart.current_curve.voltage, chart.power_curve.voltage);
        assert_eq!(chart.report.max_power.voltage, 2.5);
        assert_eq!(chart.x_ticks.len(), 8);
    }

    #[test]
    fn test_csv_export_layout() {
        let chart = ChartState::build(SampleTable::panel()).unwrap();
        let mut buf = Vec::new();
        chart.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Voltage (V),Current (A),Power (W)");
        assert_eq!(lines[6], "2.5,0.63,1.575");
        assert_eq!(lines[11], "Smoothed Voltage (V),Smoothed Current (A),Smoothed Power (W)");
        assert_eq!(lines.len(), 1 + 9 + 1 + 1 + SMOOTH_POINTS);
        assert!(lines[12].starts_with("0,0.8,"));
    }
}
