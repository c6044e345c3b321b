use crate::{config::FrequencyRange, SweepError};

/// Relative slack when dividing `max` by an increment that is not exactly representable.
const DIVISION_SLACK: f64 = 1e-9;

/// Longest series a sweep will accept.
pub const MAX_SERIES_LEN: usize = 1_000_000;

/// Strictly increasing frequencies in Hz at which the duct is solved.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySeries {
  values: Vec<f64>,
}

impl FrequencySeries {
  /// Number of frequencies `floor(max / increment) + 1` generated by a range.
  pub fn series_len(range: &FrequencyRange) -> Result<usize, SweepError> {
    let FrequencyRange { increment, max, .. } = *range;
    if !(increment > 0.0 && increment.is_finite()) {
      return Err(SweepError::InvalidConfig(format!(
        "frequency increment must be positive, got {increment}"
      )));
    }
    if !(max >= 0.0 && max.is_finite()) {
      return Err(SweepError::InvalidConfig(format!(
        "maximum frequency must be non-negative, got {max}"
      )));
    }

    let nsteps = (max / increment * (1.0 + DIVISION_SLACK)).floor();
    if nsteps >= MAX_SERIES_LEN as f64 {
      return Err(SweepError::InvalidConfig(format!(
        "{max} Hz in steps of {increment} Hz exceeds {MAX_SERIES_LEN} frequencies"
      )));
    }
    Ok(nsteps as usize + 1)
  }

  /// The frequencies `n * increment` for `n = 1, ..., floor(max / increment) + 1`.
  ///
  /// The series always starts at `increment` and its last value may exceed
  /// `max` by up to one increment. `min` does not enter.
  pub fn from_range(range: &FrequencyRange) -> Result<Self, SweepError> {
    let len = Self::series_len(range)?;
    let values = (1..=len).map(|n| n as f64 * range.increment).collect();
    Ok(Self { values })
  }

  pub fn values(&self) -> &[f64] {
    &self.values
  }
  pub fn len(&self) -> usize {
    self.values.len()
  }
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
  pub fn max(&self) -> f64 {
    self.values.last().copied().unwrap_or(0.0)
  }
  pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
    self.values.iter().copied()
  }
}
