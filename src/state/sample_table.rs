use crate::error::{CurveError, Result};

/// Panel voltages in volts, ascending.
pub const PANEL_VOLTAGE: [f64; 9] = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 3.75];

/// Panel currents in amps, one per entry of `PANEL_VOLTAGE`.
pub const PANEL_CURRENT: [f64; 9] = [0.8, 0.79, 0.78, 0.77, 0.73, 0.63, 0.48, 0.25, 0.08];

/// One measured point on the I-V curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

impl Sample {
    pub fn new(voltage: f64, current: f64) -> Self {
        Self {
            voltage,
            current,
            power: voltage * current,
        }
    }
}

/// Which per-sample quantity to read out of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Current,
    Power,
}

impl Attribute {
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Current => "Current",
            Attribute::Power => "Power",
        }
    }

    pub fn of(&self, sample: &Sample) -> f64 {
        match self {
            Attribute::Current => sample.current,
            Attribute::Power => sample.power,
        }
    }
}

/// Immutable, voltage-ordered sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    samples: Vec<Sample>,
}

impl SampleTable {
    /// Build a table from parallel voltage/current slices.
    /// Power is derived per sample; voltages must be finite and strictly increasing.
    pub fn from_pairs(voltages: &[f64], currents: &[f64]) -> Result<Self> {
        if voltages.len() != currents.len() {
            return Err(CurveError::LengthMismatch {
                voltages: voltages.len(),
                values: currents.len(),
            });
        }
        if voltages.len() < 2 {
            return Err(CurveError::TooFewSamples(voltages.len()));
        }
        for i in 1..voltages.len() {
            if !(voltages[i] > voltages[i - 1]) {
                return Err(CurveError::NonMonotonicVoltage(i));
            }
        }

        let samples = voltages
            .iter()
            .zip(currents.iter())
            .map(|(&v, &i)| Sample::new(v, i))
            .collect();
        Ok(Self { samples })
    }

    /// The built-in panel measurements.
    pub fn panel() -> Self {
        let samples = PANEL_VOLTAGE
            .iter()
            .zip(PANEL_CURRENT.iter())
            .map(|(&v, &i)| Sample::new(v, i))
            .collect();
        Self { samples }
    }

    /// Copy of this table with the current at `index` replaced.
    /// Returns `None` if `index` is out of range.
    pub fn with_current(&self, index: usize, current: f64) -> Option<Self> {
        let mut samples = self.samples.clone();
        let slot = samples.get_mut(index)?;
        *slot = Sample::new(slot.voltage, current);
        Some(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.voltage).collect()
    }

    pub fn values(&self, attribute: Attribute) -> Vec<f64> {
        self.samples.iter().map(|s| attribute.of(s)).collect()
    }

    /// (min, max) voltage. Tables always hold at least two samples.
    pub fn voltage_range(&self) -> (f64, f64) {
        let first = self.samples.first().map_or(0.0, |s| s.voltage);
        let last = self.samples.last().map_or(0.0, |s| s.voltage);
        (first, last)
    }
}

impl Default for SampleTable {
    fn default() -> Self {
        Self::panel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_is_voltage_times_current() {
        let table = SampleTable::panel();
        assert_eq!(table.len(), 9);
        for s in table.samples() {
            assert_eq!(s.power, s.voltage * s.current);
        }
        let expected = [0.0, 0.395, 0.78, 1.155, 1.46, 1.575, 1.44, 0.875, 0.3];
        for (p, e) in table.values(Attribute::Power).iter().zip(expected.iter()) {
            assert!((p - e).abs() < 1e-12, "power {p} != {e}");
        }
    }

    #[test]
    fn test_panel_matches_from_pairs() {
        let built = SampleTable::from_pairs(&PANEL_VOLTAGE, &PANEL_CURRENT).unwrap();
        assert_eq!(built, SampleTable::panel());
        assert_eq!(built.voltage_range(), (0.0, 3.75));
    }

    #[test]
    fn test_with_current_only_touches_one_sample() {
        let table = SampleTable::panel();
        let edited = table.with_current(3, 0.5).unwrap();

        for (i, (a, b)) in table.samples().iter().zip(edited.samples()).enumerate() {
            if i == 3 {
                assert_eq!(b.current, 0.5);
                assert_eq!(b.power, 1.5 * 0.5);
                assert_eq!(b.voltage, a.voltage);
            } else {
                assert_eq!(a, b);
            }
        }
        // The source table is untouched.
        assert_eq!(table, SampleTable::panel());
        assert!(table.with_current(9, 1.0).is_none());
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(matches!(
            SampleTable::from_pairs(&[0.0, 1.0], &[1.0]),
            Err(CurveError::LengthMismatch { voltages: 2, values: 1 })
        ));
        assert!(matches!(
            SampleTable::from_pairs(&[0.0], &[1.0]),
            Err(CurveError::TooFewSamples(1))
        ));
        assert!(matches!(
            SampleTable::from_pairs(&[0.0, 1.0, 1.0], &[1.0, 0.5, 0.2]),
            Err(CurveError::NonMonotonicVoltage(2))
        ));
        assert!(matches!(
            SampleTable::from_pairs(&[0.0, f64::NAN], &[1.0, 0.5]),
            Err(CurveError::NonMonotonicVoltage(1))
        ));
    }
}
