//! Time-harmonic acoustic pressure in a duct, one frequency at a time.

use crate::{
  assemble::{self, GalMat, GalVec},
  impedance::{impedance_coefficients, BoundaryCoefficients},
  operators::{FacetMassElmat, LaplaceElmat, ScalarMassElmat, UnitFacetLoadElvec},
  DofIdx, SolveError,
};

use common::linalg::{nalgebra::CooMatrixExt, FaerLu};
use num_complex::Complex64;
use std::f64::consts::TAU;
use tetmesh::{Tag, TetMesh};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticMedium {
  pub speed_of_sound: f64,
  pub density: f64,
}

/// Subdomain and boundary markers used by the weak form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelmholtzTags {
  pub region: Tag,
  pub inlet: Tag,
  pub lips: Tag,
  pub wall: Tag,
}
impl Default for HelmholtzTags {
  fn default() -> Self {
    Self {
      region: 1,
      inlet: 1,
      lips: 2,
      wall: 3,
    }
  }
}

/// Data of the boundary value problem at a single frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyProblem {
  pub frequency: f64,
  pub medium: AcousticMedium,
  pub wall_impedance: Complex64,
  pub lips_impedance: Complex64,
  /// Normal velocity prescribed on the inlet.
  pub inlet_velocity: Complex64,
}

impl FrequencyProblem {
  pub fn wavenumber(&self) -> f64 {
    TAU * self.frequency / self.medium.speed_of_sound
  }
}

/// Nodal values of the complex pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureField {
  pub real: na::DVector<f64>,
  pub imag: na::DVector<f64>,
}

impl PressureField {
  pub fn ndofs(&self) -> usize {
    self.real.len()
  }
  pub fn at(&self, idof: DofIdx) -> Complex64 {
    Complex64::new(self.real[idof], self.imag[idof])
  }
  pub fn magnitude(&self) -> na::DVector<f64> {
    self.real.zip_map(&self.imag, |r, i| r.hypot(i))
  }
}

/// Frequency independent Galerkin operators of the duct.
///
/// Assembled once per mesh, combined per frequency into the block system.
pub struct HelmholtzOperators {
  tags: HelmholtzTags,
  laplace: GalMat,
  mass: GalMat,
  wall_mass: GalMat,
  lips_mass: GalMat,
  inlet_load: GalVec,
}

impl HelmholtzOperators {
  pub fn assemble(mesh: &TetMesh, tags: HelmholtzTags) -> Result<Self, SolveError> {
    for (icell, cell) in mesh.cells().iter().enumerate() {
      if cell.tag == tags.region && mesh.cell_coords(cell).difbarys().is_none() {
        return Err(SolveError::DegenerateCell { cell: icell });
      }
    }

    let laplace = assemble::assemble_galmat(mesh, tags.region, LaplaceElmat);
    let mass = assemble::assemble_galmat(mesh, tags.region, ScalarMassElmat);
    let wall_mass = assemble::assemble_facet_galmat(mesh, tags.wall, FacetMassElmat);
    let lips_mass = assemble::assemble_facet_galmat(mesh, tags.lips, FacetMassElmat);
    let inlet_load = assemble::assemble_facet_galvec(mesh, tags.inlet, UnitFacetLoadElvec);

    tracing::debug!(
      "assembled operators: nnz(laplace)={}, nnz(mass)={}",
      laplace.nnz(),
      mass.nnz()
    );

    Ok(Self {
      tags,
      laplace,
      mass,
      wall_mass,
      lips_mass,
      inlet_load,
    })
  }

  /// Number of DOFs of one scalar field.
  pub fn ndofs(&self) -> usize {
    self.laplace.nrows()
  }

  fn boundary_coefficients(
    &self,
    problem: &FrequencyProblem,
    impedance: Complex64,
    tag: Tag,
  ) -> Result<BoundaryCoefficients, SolveError> {
    let AcousticMedium {
      speed_of_sound,
      density,
    } = problem.medium;
    impedance_coefficients(impedance, problem.wavenumber(), speed_of_sound, density)
      .ok_or(SolveError::ZeroImpedance { tag })
  }

  /// Galerkin system for the unknowns $[p_r; p_i]$.
  ///
  /// Rows are the test functions $q_r$ followed by $q_i$.
  pub fn assemble_system(&self, problem: &FrequencyProblem) -> Result<(GalMat, GalVec), SolveError> {
    let k = problem.wavenumber();
    let k2 = k * k;

    let wall = self.boundary_coefficients(problem, problem.wall_impedance, self.tags.wall)?;
    let lips = self.boundary_coefficients(problem, problem.lips_impedance, self.tags.lips)?;

    let diagonal = GalMat::linear_combination(&[
      (1.0, &self.laplace),
      (-k2, &self.mass),
      (wall.direct, &self.wall_mass),
      (lips.direct, &self.lips_mass),
    ]);
    // (q_r, p_i) block
    let real_imag = GalMat::linear_combination(&[
      (-wall.cross, &self.wall_mass),
      (-lips.cross, &self.lips_mass),
    ]);
    // (q_i, p_r) block
    let imag_real = GalMat::linear_combination(&[
      (wall.cross, &self.wall_mass),
      (lips.cross, &self.lips_mass),
    ]);
    let galmat = GalMat::block(&[&[&diagonal, &real_imag], &[&imag_real, &diagonal]]);

    // Neumann data enters as +f_i on the q_r equation and -f_r on the q_i equation.
    let omega_rho = TAU * problem.frequency * problem.medium.density;
    let f_r = omega_rho * problem.inlet_velocity.re;
    let f_i = omega_rho * problem.inlet_velocity.im;
    let n = self.ndofs();
    let mut galvec = na::DVector::zeros(2 * n);
    galvec.rows_mut(0, n).copy_from(&(f_i * &self.inlet_load));
    galvec.rows_mut(n, n).copy_from(&(-f_r * &self.inlet_load));

    Ok((galmat, galvec))
  }

  pub fn solve(&self, problem: &FrequencyProblem) -> Result<PressureField, SolveError> {
    let (galmat, galvec) = self.assemble_system(problem)?;
    let galmat = nas::CsrMatrix::from(&galmat);
    let galsol = FaerLu::new(galmat)?.solve(&galvec);

    if galsol.iter().any(|v| !v.is_finite()) {
      return Err(SolveError::SingularSystem {
        frequency: problem.frequency,
      });
    }

    let n = self.ndofs();
    Ok(PressureField {
      real: galsol.rows(0, n).into_owned(),
      imag: galsol.rows(n, n).into_owned(),
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;
  use tetmesh::gen::cuboid::{CuboidMesh, CuboidTags};

  const MEDIUM: AcousticMedium = AcousticMedium {
    speed_of_sound: 344.0,
    density: 1.115771,
  };

  fn duct() -> TetMesh {
    CuboidMesh::new([0.1, 0.02, 0.02], [8, 2, 2]).to_tet_mesh(CuboidTags::default())
  }

  fn lossy_problem(frequency: f64) -> FrequencyProblem {
    FrequencyProblem {
      frequency,
      medium: MEDIUM,
      wall_impedance: Complex64::new(344.0 * 1.115771 / 0.01, 0.0),
      lips_impedance: crate::impedance::lips_impedance(frequency, 1.115771, 0.01, 0.0),
      inlet_velocity: Complex64::new(-1.0, 0.0),
    }
  }

  fn dense_block(galmat: &GalMat, n: usize, bi: usize, bj: usize) -> na::DMatrix<f64> {
    let dense = na::DMatrix::from(galmat);
    dense.view((bi * n, bj * n), (n, n)).into_owned()
  }

  #[test]
  fn block_structure_matches_weak_form() {
    let mesh = duct();
    let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
    let problem = lossy_problem(500.0);
    let (galmat, galvec) = ops.assemble_system(&problem).unwrap();
    let n = ops.ndofs();
    assert_eq!(galmat.nrows(), 2 * n);

    let rr = dense_block(&galmat, n, 0, 0);
    let ri = dense_block(&galmat, n, 0, 1);
    let ir = dense_block(&galmat, n, 1, 0);
    let ii = dense_block(&galmat, n, 1, 1);
    assert_relative_eq!(rr, ii, epsilon = 1e-12);
    assert_relative_eq!(ri, -ir.clone(), epsilon = 1e-12);

    // Recompute the coupling from the formula directly.
    let k = problem.wavenumber();
    let kcr = k * MEDIUM.speed_of_sound * MEDIUM.density;
    let zw = problem.wall_impedance;
    let zl = problem.lips_impedance;
    let wall_mass = na::DMatrix::from(&ops.wall_mass);
    let lips_mass = na::DMatrix::from(&ops.lips_mass);
    let expected_ir =
      kcr / zw.norm_sqr() * zw.re * &wall_mass + kcr / zl.norm_sqr() * zl.re * &lips_mass;
    assert_relative_eq!(ir, expected_ir, epsilon = 1e-9);

    let expected_rr = na::DMatrix::from(&ops.laplace) - k * k * na::DMatrix::from(&ops.mass)
      + kcr / zw.norm_sqr() * zw.im * &wall_mass
      + kcr / zl.norm_sqr() * zl.im * &lips_mass;
    assert_relative_eq!(rr, expected_rr, epsilon = 1e-9);

    // Real inlet velocity only excites the imaginary-part test equation.
    let omega_rho = TAU * 500.0 * MEDIUM.density;
    assert!(galvec.rows(0, n).iter().all(|&v| v == 0.0));
    let inlet_area = mesh.facet_measure(1);
    assert_relative_eq!(galvec.rows(n, n).sum(), omega_rho * inlet_area, epsilon = 1e-12);
  }

  #[test]
  fn zero_velocity_gives_zero_field() {
    let mesh = duct();
    let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
    for frequency in [100.0, 1500.0, 4000.0] {
      let problem = FrequencyProblem {
        inlet_velocity: Complex64::new(0.0, 0.0),
        ..lossy_problem(frequency)
      };
      let field = ops.solve(&problem).unwrap();
      assert!(field.real.iter().chain(field.imag.iter()).all(|&v| v == 0.0));
    }
  }

  #[test]
  fn solution_satisfies_system() {
    let mesh = duct();
    let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
    let problem = lossy_problem(1200.0);
    let field = ops.solve(&problem).unwrap();
    let (galmat, galvec) = ops.assemble_system(&problem).unwrap();

    let mut galsol = na::DVector::zeros(2 * field.ndofs());
    galsol.rows_mut(0, field.ndofs()).copy_from(&field.real);
    galsol.rows_mut(field.ndofs(), field.ndofs()).copy_from(&field.imag);
    let residual = &nas::CsrMatrix::from(&galmat) * &galsol - &galvec;
    assert!(residual.norm() <= 1e-8 * galvec.norm());
  }

  #[test]
  fn zero_wall_impedance_is_rejected() {
    let mesh = duct();
    let ops = HelmholtzOperators::assemble(&mesh, HelmholtzTags::default()).unwrap();
    let problem = FrequencyProblem {
      wall_impedance: Complex64::new(0.0, 0.0),
      ..lossy_problem(100.0)
    };
    assert!(matches!(
      ops.solve(&problem),
      Err(SolveError::ZeroImpedance { tag: 3 })
    ));
  }

  #[test]
  fn field_magnitude() {
    let field = PressureField {
      real: na::dvector![3.0, 0.0],
      imag: na::dvector![4.0, -2.0],
    };
    assert_eq!(field.magnitude(), na::dvector![5.0, 2.0]);
    assert_eq!(field.at(1), Complex64::new(0.0, -2.0));
  }
}
