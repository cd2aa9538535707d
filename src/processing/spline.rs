//! Cubic spline interpolation for smoothing the measured I-V and P-V samples.
//!
//! The spline uses "not-a-knot" end conditions: the third derivative is
//! continuous across the second and second-to-last knots, so any cubic
//! polynomial is reproduced exactly. Tables with three knots fall back to
//! natural end conditions and two knots give a straight line.

use crate::error::{CurveError, Result};
use crate::state::sample_table::{Attribute, SampleTable};

/// Number of points in a smoothed curve.
pub const SMOOTH_POINTS: usize = 500;

#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Strictly increasing knots.
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot.
    y2s: Vec<f64>,
}

impl CubicSpline {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(CurveError::LengthMismatch {
                voltages: xs.len(),
                values: ys.len(),
            });
        }
        let n = xs.len();
        if n < 2 {
            return Err(CurveError::TooFewSamples(n));
        }
        for i in 1..n {
            if !(xs[i] > xs[i - 1]) {
                return Err(CurveError::NonMonotonicVoltage(i));
            }
        }

        let y2s = match n {
            2 => vec![0.0; 2],
            3 => natural_second_derivatives(xs, ys)?,
            _ => not_a_knot_second_derivatives(xs, ys)?,
        };

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            y2s,
        })
    }

    /// Evaluate the spline at `x`. Outside the knot range the boundary
    /// polynomial is extended.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let lo = self
            .xs
            .partition_point(|&v| v <= x)
            .saturating_sub(1)
            .min(n - 2);
        let hi = lo + 1;

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }
}

fn steps_and_slopes(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = ys
        .windows(2)
        .zip(h.iter())
        .map(|(w, hi)| (w[1] - w[0]) / hi)
        .collect();
    (h, d)
}

fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
    let n = xs.len();
    let (h, d) = steps_and_slopes(xs, ys);
    let k = n - 2;

    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];
    for r in 0..k {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = 6.0 * (d[i] - d[i - 1]);
    }

    let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;
    let mut y2s = Vec::with_capacity(n);
    y2s.push(0.0);
    y2s.extend(interior);
    y2s.push(0.0);
    Ok(y2s)
}

fn not_a_knot_second_derivatives(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
    let n = xs.len();
    let (h, d) = steps_and_slopes(xs, ys);
    let k = n - 2;

    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];
    for r in 0..k {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = 6.0 * (d[i] - d[i - 1]);
    }

    // Fold the end conditions into the first and last interior rows:
    //   y2[0]   = ((h0 + h1) y2[1] - h0 y2[2]) / h1
    //   y2[n-1] = ((ha + hb) y2[n-2] - hb y2[n-3]) / ha,  ha = h[n-3], hb = h[n-2]
    let (h0, h1) = (h[0], h[1]);
    diag[0] += h0 * (h0 + h1) / h1;
    sup[0] -= h0 * h0 / h1;
    sub[0] = 0.0;

    let (ha, hb) = (h[n - 3], h[n - 2]);
    diag[k - 1] += hb * (ha + hb) / ha;
    sub[k - 1] -= hb * hb / ha;
    sup[k - 1] = 0.0;

    let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;

    let first = ((h0 + h1) * interior[0] - h0 * interior[1]) / h1;
    let last = ((ha + hb) * interior[k - 1] - hb * interior[k - 2]) / ha;

    let mut y2s = Vec::with_capacity(n);
    y2s.push(first);
    y2s.extend(interior);
    y2s.push(last);
    Ok(y2s)
}

/// Thomas algorithm. `sub[0]` and `sup[len-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Result<Vec<f64>> {
    let k = diag.len();
    let mut c = vec![0.0; k];
    let mut r = vec![0.0; k];

    for row in 0..k {
        let (prev_c, prev_r) = if row == 0 { (0.0, 0.0) } else { (c[row - 1], r[row - 1]) };
        let lower = if row == 0 { 0.0 } else { sub[row] };
        let denom = diag[row] - lower * prev_c;
        if denom.abs() < 1e-300 || !denom.is_finite() {
            return Err(CurveError::SingularSystem(row));
        }
        c[row] = if row + 1 < k { sup[row] / denom } else { 0.0 };
        r[row] = (rhs[row] - lower * prev_r) / denom;
    }

    let mut out = vec![0.0; k];
    for row in (0..k).rev() {
        out[row] = if row + 1 < k { r[row] - c[row] * out[row + 1] } else { r[row] };
    }
    Ok(out)
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            out[count - 1] = end;
            out
        }
    }
}

/// A densely sampled interpolant of one attribute over the table's voltage range.
#[derive(Debug, Clone)]
pub struct SmoothedCurve {
    pub voltage: Vec<f64>,
    pub value: Vec<f64>,
}

impl SmoothedCurve {
    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.voltage.iter().copied().zip(self.value.iter().copied())
    }
}

/// Interpolate `attribute` across the table at `points` evenly spaced voltages.
pub fn interpolate(table: &SampleTable, attribute: Attribute, points: usize) -> Result<SmoothedCurve> {
    let spline = CubicSpline::new(&table.voltages(), &table.values(attribute))?;
    let (v_min, v_max) = table.voltage_range();
    let voltage = linspace(v_min, v_max, points);
    let value = voltage.iter().map(|&v| spline.evaluate(v)).collect();

    tracing::debug!(
        attribute = attribute.label(),
        points,
        "Interpolated smoothed curve"
    );

    Ok(SmoothedCurve { voltage, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_passes_through_panel_samples() {
        let table = SampleTable::panel();
        for attribute in [Attribute::Current, Attribute::Power] {
            let spline = CubicSpline::new(&table.voltages(), &table.values(attribute)).unwrap();
            for s in table.samples() {
                let expected = attribute.of(s);
                let got = spline.evaluate(s.voltage);
                assert!(
                    (got - expected).abs() < 1e-10,
                    "{}({}) = {} but expected {}",
                    attribute.label(),
                    s.voltage,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_smoothed_current_shape() {
        let table = SampleTable::panel();
        let curve = interpolate(&table, Attribute::Current, SMOOTH_POINTS).unwrap();

        assert_eq!(curve.len(), 500);
        assert_eq!(curve.value.len(), 500);
        assert_eq!(curve.voltage[0], 0.0);
        assert_eq!(curve.voltage[499], 3.75);
        assert!(curve.voltage.windows(2).all(|w| w[1] > w[0]));
        assert!((curve.value[0] - 0.8).abs() < 1e-12);
        assert!((curve.value[499] - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_not_a_knot_reproduces_cubic() {
        let f = |x: f64| x * x * x - 2.0 * x * x + 0.5 * x + 1.0;
        let xs = [0.0, 0.5, 1.0, 1.75, 2.5, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();

        for x in linspace(0.0, 3.0, 37) {
            assert!(
                (spline.evaluate(x) - f(x)).abs() < 1e-9,
                "spline({x}) = {} but cubic gives {}",
                spline.evaluate(x),
                f(x)
            );
        }
    }

    #[test]
    fn test_four_knots_is_single_cubic() {
        let f = |x: f64| 2.0 * x * x * x - x + 3.0;
        let xs = [-1.0, 0.0, 0.5, 2.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();
        assert!((spline.evaluate(1.25) - f(1.25)).abs() < 1e-9);
        assert!((spline.evaluate(-0.5) - f(-0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_short_tables() {
        let line = CubicSpline::new(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert!((line.evaluate(0.5) - 2.0).abs() < 1e-12);

        let three = CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!((three.evaluate(1.0) - 1.0).abs() < 1e-12);
        assert!(three.evaluate(0.5) > 0.5);

        assert!(matches!(
            CubicSpline::new(&[1.0], &[1.0]),
            Err(CurveError::TooFewSamples(1))
        ));
        assert!(matches!(
            CubicSpline::new(&[0.0, 2.0, 1.0], &[1.0, 1.0, 1.0]),
            Err(CurveError::NonMonotonicVoltage(2))
        ));
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, 3.75, 500);
        assert_eq!(v.len(), 500);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[499], 3.75);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }
}
