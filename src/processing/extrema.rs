use std::fmt;

use crate::state::sample_table::{Attribute, Sample, SampleTable};

/// Which extremum an operating point marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    MaxPower,
    MaxCurrent,
}

impl PointKind {
    pub fn label(&self) -> &'static str {
        match self {
            PointKind::MaxPower => "max power point",
            PointKind::MaxCurrent => "max current point",
        }
    }
}

/// A labelled sample picked out of the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub kind: PointKind,
    pub index: usize,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

impl OperatingPoint {
    fn from_sample(kind: PointKind, index: usize, sample: &Sample) -> Self {
        Self {
            kind,
            index,
            voltage: sample.voltage,
            current: sample.current,
            power: sample.power,
        }
    }
}

/// Index of the largest value. Ties keep the earliest index; NaN never wins.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

fn find_max(table: &SampleTable, attribute: Attribute, kind: PointKind) -> Option<OperatingPoint> {
    let idx = argmax(&table.values(attribute))?;
    table
        .samples()
        .get(idx)
        .map(|s| OperatingPoint::from_sample(kind, idx, s))
}

/// Sample with the greatest power.
pub fn find_max_power(table: &SampleTable) -> Option<OperatingPoint> {
    find_max(table, Attribute::Power, PointKind::MaxPower)
}

/// Sample with the greatest current. Its voltage is reported as Vmp and
/// its current as Imp.
pub fn find_max_current(table: &SampleTable) -> Option<OperatingPoint> {
    find_max(table, Attribute::Current, PointKind::MaxCurrent)
}

/// Both operating points for a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveReport {
    pub max_power: OperatingPoint,
    pub max_current: OperatingPoint,
}

impl CurveReport {
    pub fn from_table(table: &SampleTable) -> Option<Self> {
        Some(Self {
            max_power: find_max_power(table)?,
            max_current: find_max_current(table)?,
        })
    }

    /// Voltage reported as Vmp.
    pub fn vmp(&self) -> f64 {
        self.max_current.voltage
    }

    /// Current reported as Imp.
    pub fn imp(&self) -> f64 {
        self.max_current.current
    }
}

impl fmt::Display for CurveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.max_power;
        writeln!(
            f,
            "Pmax: {} W at Voltage: {} V, Current: {} A",
            p.power, p.voltage, p.current
        )?;
        writeln!(f, "Imp: {} A at Voltage: {} V", self.imp(), self.vmp())?;
        writeln!(f, "Vmp: {} V at Current: {} A", self.vmp(), self.imp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_power_point() {
        let p = find_max_power(&SampleTable::panel()).unwrap();
        assert_eq!(p.kind, PointKind::MaxPower);
        assert_eq!(p.index, 5);
        assert_eq!(p.voltage, 2.5);
        assert_eq!(p.current, 0.63);
        assert!((p.power - 1.575).abs() < 1e-12);
    }

    #[test]
    fn test_max_current_point() {
        let p = find_max_current(&SampleTable::panel()).unwrap();
        assert_eq!(p.kind, PointKind::MaxCurrent);
        assert_eq!(p.index, 0);
        assert_eq!(p.voltage, 0.0);
        assert_eq!(p.current, 0.8);
    }

    #[test]
    fn test_report_text() {
        let report = CurveReport::from_table(&SampleTable::panel()).unwrap();
        assert_eq!(
            report.to_string(),
            "Pmax: 1.575 W at Voltage: 2.5 V, Current: 0.63 A\n\
             Imp: 0.8 A at Voltage: 0 V\n\
             Vmp: 0 V at Current: 0.8 A\n"
        );
        assert_eq!(report.to_string().lines().count(), 3);
    }

    #[test]
    fn test_argmax_ties_keep_first() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_editing_one_sample_moves_extrema_only() {
        let table = SampleTable::panel();
        let edited = table.with_current(1, 0.95).unwrap();
        let report = CurveReport::from_table(&edited).unwrap();

        assert_eq!(report.max_current.index, 1);
        assert_eq!(report.vmp(), 0.5);
        assert_eq!(report.imp(), 0.95);
        // Power at 2.5 V is still the peak.
        assert_eq!(report.max_power.index, 5);

        let boosted = table.with_current(7, 0.6).unwrap();
        let p = find_max_power(&boosted).unwrap();
        assert_eq!(p.index, 7);
        assert!((p.power - 2.1).abs() < 1e-12);
        assert_eq!(find_max_current(&boosted).unwrap().index, 0);
    }
}
