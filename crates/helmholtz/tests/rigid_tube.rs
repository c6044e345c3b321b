//! Rigid-walled duct driven by a normal velocity at the inlet, compared to the
//! plane wave standing-wave solution
//! $|p(x)| = rho c |cos(k (x - L))| / |sin(k L)|$.

use helmholtz::{AcousticMedium, FrequencyProblem, HelmholtzOperators, HelmholtzTags};
use num_complex::Complex64;
use tetmesh::{
  coords::Coord,
  gen::cuboid::{CuboidMesh, CuboidTags},
};

const LENGTH: f64 = 0.2;
const MEDIUM: AcousticMedium = AcousticMedium {
  speed_of_sound: 344.0,
  density: 1.115771,
};

fn rigid_problem(frequency: f64) -> FrequencyProblem {
  let rigid = Complex64::new(f64::INFINITY, 0.0);
  FrequencyProblem {
    frequency,
    medium: MEDIUM,
    wall_impedance: rigid,
    lips_impedance: rigid,
    inlet_velocity: Complex64::new(-1.0, 0.0),
  }
}

fn standing_wave_magnitude(frequency: f64, x: f64) -> f64 {
  let k = std::f64::consts::TAU * frequency / MEDIUM.speed_of_sound;
  MEDIUM.density * MEDIUM.speed_of_sound * (k * (x - LENGTH)).cos().abs() / (k * LENGTH).sin().abs()
}

fn max_relative_error(nboxes_axial: usize, frequency: f64) -> f64 {
  let mesh =
    CuboidMesh::new([LENGTH, 0.02, 0.02], [nboxes_axial, 1, 1]).to_tet_mesh(CuboidTags::default());
  let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
  let field = ops.solve(&rigid_problem(frequency)).unwrap();

  let mut max_err: f64 = 0.0;
  for x in [0.0, 0.5 * LENGTH, LENGTH] {
    let (idof, dist) = mesh.nearest_vertex(&Coord::new(x, 0.0, 0.0)).unwrap();
    assert!(dist < 1e-12);
    let numeric = field.at(idof).norm();
    let exact = standing_wave_magnitude(frequency, x);
    max_err = max_err.max((numeric - exact).abs() / exact);
  }
  max_err
}

#[test]
fn matches_standing_wave() {
  for frequency in [150.0, 300.0, 600.0] {
    let err = max_relative_error(40, frequency);
    assert!(err < 1e-2, "relative error {err} at {frequency} Hz");
  }
}

#[test]
fn error_shrinks_with_mesh_size() {
  let frequency = 600.0;
  let coarse = max_relative_error(10, frequency);
  let fine = max_relative_error(40, frequency);
  assert!(fine < coarse, "coarse={coarse}, fine={fine}");
}

#[test]
fn rigid_field_is_in_phase() {
  // Without losses the pressure is purely imaginary for a real inlet velocity.
  let mesh = CuboidMesh::new([LENGTH, 0.02, 0.02], [20, 1, 1]).to_tet_mesh(CuboidTags::default());
  let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
  let field = ops.solve(&rigid_problem(300.0)).unwrap();
  let imag_norm = field.imag.norm();
  assert!(field.real.norm() <= 1e-10 * imag_norm);
}
