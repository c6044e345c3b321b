//! Complex impedance boundary model.
//!
//! An impedance $Z$ relates pressure and normal particle velocity on a
//! boundary, $p = Z v_n$. In the real/imaginary split of the weak form it
//! contributes
//! $k c rho / |Z|^2 (Re(Z) (q_i p_r - q_r p_i) + Im(Z) (q_r p_r + q_i p_i))$.

use std::f64::consts::TAU;

use num_complex::Complex64;

/// Coefficients of the boundary term
/// `cross * (q_i p_r - q_r p_i) + direct * (q_r p_r + q_i p_i)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCoefficients {
  pub cross: f64,
  pub direct: f64,
}

impl BoundaryCoefficients {
  pub const RIGID: Self = Self {
    cross: 0.0,
    direct: 0.0,
  };
}

/// Weak form coefficients of an impedance boundary at wavenumber `k`.
///
/// A non-finite impedance is a rigid boundary and contributes nothing.
/// Returns `None` for a zero impedance, which has no admittance.
pub fn impedance_coefficients(
  impedance: Complex64,
  wavenumber: f64,
  speed_of_sound: f64,
  density: f64,
) -> Option<BoundaryCoefficients> {
  if !impedance.is_finite() {
    return Some(BoundaryCoefficients::RIGID);
  }
  let norm_sqr = impedance.norm_sqr();
  if norm_sqr == 0.0 {
    return None;
  }
  let scale = wavenumber * speed_of_sound * density / norm_sqr;
  Some(BoundaryCoefficients {
    cross: scale * impedance.re,
    direct: scale * impedance.im,
  })
}

/// Frequency dependent radiation impedance of the lips.
///
/// With $omega rho = 2 pi f rho$ the pair is
/// $(omega rho X, -omega rho R)$ for the specific resistance $R$ and reactance $X$.
pub fn lips_impedance(frequency: f64, density: f64, resistance: f64, reactance: f64) -> Complex64 {
  let omega_rho = TAU * frequency * density;
  Complex64::new(omega_rho * reactance, -omega_rho * resistance)
}

/// Particle velocity from pressure through an impedance, $u = p / Z$.
///
/// Zero for a non-finite impedance.
pub fn particle_velocity(pressure: Complex64, impedance: Complex64) -> Complex64 {
  if impedance.is_finite() {
    pressure / impedance
  } else {
    Complex64::new(0.0, 0.0)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn coefficients_follow_admittance_split() {
    let z = Complex64::new(3.0, -4.0);
    let (k, c, rho) = (2.0, 340.0, 1.2);
    let coeffs = impedance_coefficients(z, k, c, rho).unwrap();
    let scale = k * c * rho / 25.0;
    assert_relative_eq!(coeffs.cross, 3.0 * scale);
    assert_relative_eq!(coeffs.direct, -4.0 * scale);

    // Same as the real and imaginary parts of i k c rho / Z.
    let y = Complex64::new(0.0, k * c * rho) / z;
    assert_relative_eq!(coeffs.direct, y.re, epsilon = 1e-12);
    assert_relative_eq!(coeffs.cross, y.im, epsilon = 1e-12);
  }

  #[test]
  fn rigid_and_zero_impedance() {
    let rigid = Complex64::new(f64::INFINITY, 0.0);
    assert_eq!(
      impedance_coefficients(rigid, 1.0, 1.0, 1.0),
      Some(BoundaryCoefficients::RIGID)
    );
    assert_eq!(impedance_coefficients(Complex64::new(0.0, 0.0), 1.0, 1.0, 1.0), None);
  }

  #[test]
  fn lips_impedance_scales_with_frequency() {
    let rho = 1.115771;
    let z1 = lips_impedance(100.0, rho, 0.01, 0.0);
    let z2 = lips_impedance(200.0, rho, 0.01, 0.0);
    assert_eq!(z1.re, 0.0);
    assert_relative_eq!(z1.im, -TAU * 100.0 * rho * 0.01);
    assert_relative_eq!(z2.im, 2.0 * z1.im);

    let z = lips_impedance(100.0, rho, 0.0, 0.5);
    assert_relative_eq!(z.re, TAU * 100.0 * rho * 0.5);
    assert_eq!(z.im, 0.0);
  }

  #[test]
  fn resistance_sign_flips_imaginary_part() {
    let rho = 1.115771;
    let z = lips_impedance(750.0, rho, 0.01, 0.002);
    let flipped = lips_impedance(750.0, rho, -0.01, 0.002);
    assert_relative_eq!(flipped.im, -z.im);
    assert_relative_eq!(flipped.re, z.re);

    let k = TAU * 750.0 / 344.0;
    let coeffs = impedance_coefficients(z, k, 344.0, rho).unwrap();
    let flipped_coeffs = impedance_coefficients(flipped, k, 344.0, rho).unwrap();
    assert_relative_eq!(flipped_coeffs.direct, -coeffs.direct);
    assert_relative_eq!(flipped_coeffs.cross, coeffs.cross);
  }

  #[test]
  fn velocity_through_impedance() {
    let p = Complex64::new(2.0, 1.0);
    let z = Complex64::new(0.0, -2.0);
    let u = particle_velocity(p, z);
    assert_relative_eq!(u.re, -0.5);
    assert_relative_eq!(u.im, 1.0);
    assert_eq!(
      particle_velocity(p, Complex64::new(0.0, f64::NEG_INFINITY)),
      Complex64::new(0.0, 0.0)
    );
  }
}
