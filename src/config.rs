//! Run configuration of the sweep.
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides. The defaults describe the reference junction-of-cones setup.

use crate::{FrequencySeries, SweepError};

use helmholtz::{impedance, AcousticMedium, HelmholtzTags};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tetmesh::Tag;

/// Frequency range in Hz.
///
/// The sweep solves `n * increment` for `n = 1, ..., floor(max / increment) + 1`.
/// `min` is carried along but does not shift the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyRange {
  pub min: f64,
  pub increment: f64,
  pub max: f64,
}
impl Default for FrequencyRange {
  fn default() -> Self {
    Self {
      min: 0.1,
      increment: 5.0,
      max: 10000.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
  pub point: [f64; 3],
  /// Largest accepted distance between the probe point and its mesh vertex.
  pub tolerance: f64,
}
impl Default for ProbeConfig {
  fn default() -> Self {
    Self {
      point: [0.08, 0.0, 0.0],
      tolerance: 2.3,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
  pub region: Tag,
  pub inlet: Tag,
  pub lips: Tag,
  pub wall: Tag,
}
impl Default for TagConfig {
  fn default() -> Self {
    let tags = HelmholtzTags::default();
    Self {
      region: tags.region,
      inlet: tags.inlet,
      lips: tags.lips,
      wall: tags.wall,
    }
  }
}
impl From<TagConfig> for HelmholtzTags {
  fn from(tags: TagConfig) -> Self {
    Self {
      region: tags.region,
      inlet: tags.inlet,
      lips: tags.lips,
      wall: tags.wall,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
  pub speed_of_sound: f64,
  pub density: f64,
  /// Normal velocity on the inlet, real part. Negative is inward.
  pub inlet_velocity_real: f64,
  pub inlet_velocity_imag: f64,
  /// Area in the wave resistance `c * rho / area` of the walls.
  pub wall_reference_area: f64,
  pub wall_reactance: f64,
  /// Specific resistance of the lips radiation impedance.
  pub lips_resistance: f64,
  /// Specific reactance of the lips radiation impedance.
  pub lips_reactance: f64,
  pub frequencies: FrequencyRange,
  pub probe: ProbeConfig,
  pub tags: TagConfig,
}

impl Default for SweepConfig {
  fn default() -> Self {
    Self {
      speed_of_sound: 344.0,
      density: 1.115771,
      inlet_velocity_real: -1.0,
      inlet_velocity_imag: 0.0,
      // Wave resistance after Fleischer et al. (2018)
      wall_reference_area: 0.01,
      wall_reactance: 0.0,
      lips_resistance: 1.0 / 100.0,
      lips_reactance: 0.0,
      frequencies: FrequencyRange::default(),
      probe: ProbeConfig::default(),
      tags: TagConfig::default(),
    }
  }
}

impl SweepConfig {
  pub fn from_json_str(json: &str) -> Result<Self, SweepError> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, SweepError> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  pub fn medium(&self) -> AcousticMedium {
    AcousticMedium {
      speed_of_sound: self.speed_of_sound,
      density: self.density,
    }
  }

  pub fn inlet_velocity(&self) -> Complex64 {
    Complex64::new(self.inlet_velocity_real, self.inlet_velocity_imag)
  }

  pub fn wall_impedance(&self) -> Complex64 {
    Complex64::new(
      self.speed_of_sound * self.density / self.wall_reference_area,
      self.wall_reactance,
    )
  }

  pub fn lips_impedance(&self, frequency: f64) -> Complex64 {
    impedance::lips_impedance(
      frequency,
      self.density,
      self.lips_resistance,
      self.lips_reactance,
    )
  }

  pub fn validate(&self) -> Result<(), SweepError> {
    let invalid = |msg: String| Err(SweepError::InvalidConfig(msg));

    let positive = [
      ("speed_of_sound", self.speed_of_sound),
      ("density", self.density),
      ("wall_reference_area", self.wall_reference_area),
      ("frequencies.increment", self.frequencies.increment),
    ];
    for (name, value) in positive {
      if !(value.is_finite() && value > 0.0) {
        return invalid(format!("`{name}` must be positive and finite, got {value}"));
      }
    }

    let min = self.frequencies.min;
    if !(min.is_finite() && min >= 0.0) {
      return invalid(format!("minimum frequency must be non-negative, got {min}"));
    }
    FrequencySeries::series_len(&self.frequencies)?;
    if !(self.probe.tolerance >= 0.0) {
      return invalid(format!(
        "probe tolerance must be non-negative, got {}",
        self.probe.tolerance
      ));
    }
    if self.lips_resistance == 0.0 && self.lips_reactance == 0.0 {
      return invalid("lips impedance is zero at every frequency".to_string());
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn defaults_are_valid() {
    let config = SweepConfig::default();
    config.validate().unwrap();
    assert_relative_eq!(config.wall_impedance().re, 344.0 * 1.115771 / 0.01);
    assert_eq!(config.wall_impedance().im, 0.0);
    assert_eq!(config.inlet_velocity(), Complex64::new(-1.0, 0.0));
  }

  #[test]
  fn partial_json_keeps_defaults() {
    let config = SweepConfig::from_json_str(
      r#"{ "density": 1.2, "frequencies": { "max": 500.0 }, "probe": { "tolerance": 0.01 } }"#,
    )
    .unwrap();
    assert_eq!(config.density, 1.2);
    assert_eq!(config.frequencies.max, 500.0);
    assert_eq!(config.frequencies.increment, 5.0);
    assert_eq!(config.probe.point, [0.08, 0.0, 0.0]);
    assert_eq!(config.probe.tolerance, 0.01);
    assert_eq!(config.speed_of_sound, 344.0);
  }

  #[test]
  fn rejects_unknown_fields() {
    assert!(matches!(
      SweepConfig::from_json_str(r#"{ "denisty": 1.2 }"#),
      Err(SweepError::ConfigFormat(_))
    ));
  }

  #[test]
  fn rejects_invalid_values() {
    let bad = [
      r#"{ "speed_of_sound": 0.0 }"#,
      r#"{ "frequencies": { "increment": -5.0 } }"#,
      r#"{ "frequencies": { "min": -1.0 } }"#,
      r#"{ "frequencies": { "increment": 1e-9 } }"#,
      r#"{ "probe": { "tolerance": -1.0 } }"#,
      r#"{ "lips_resistance": 0.0, "lips_reactance": 0.0 }"#,
    ];
    for json in bad {
      assert!(
        matches!(SweepConfig::from_json_str(json), Err(SweepError::InvalidConfig(_))),
        "{json} should be rejected"
      );
    }
  }

  #[test]
  fn lips_impedance_uses_config() {
    let config = SweepConfig::default();
    let z = config.lips_impedance(1000.0);
    assert_eq!(z.re, 0.0);
    assert_relative_eq!(z.im, -std::f64::consts::TAU * 1000.0 * 1.115771 * 0.01);
  }
}
