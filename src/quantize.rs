use crate::error::{GaugeError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueQuantizer {
    bound: f64,
    step: f64,
}

impl ValueQuantizer {
    /// `step <= 0` disables rounding and only clamps.
    pub fn new(bound: f64, step: f64) -> Self {
        Self { bound, step }
    }

    /// Clamp into `[-bound, bound]` and snap to the step grid. The bounds
    /// themselves are always reachable, even when they sit off the grid.
    pub fn quantize(&self, raw: f64) -> f64 {
        let clamped = raw.clamp(-self.bound, self.bound);
        if self.step <= 0.0 || clamped.abs() == self.bound {
            return clamped;
        }
        let snapped = (clamped / self.step).round() * self.step;
        let snapped = snapped.clamp(-self.bound, self.bound);
        // Keep -0.0 out of the readout.
        if snapped == 0.0 { 0.0 } else { snapped }
    }

    pub fn try_quantize(&self, raw: f64) -> Result<f64> {
        if !raw.is_finite() {
            return Err(GaugeError::ValueError { value: raw });
        }
        Ok(self.quantize(raw))
    }

    /// Grid key for a margin, used for exact-ish lookups keyed by value.
    pub fn key(&self, margin: f64) -> i64 {
        if self.step <= 0.0 {
            return (margin * 1e6).round() as i64;
        }
        (margin / self.step).round() as i64
    }
}
