//! Finite element solver for the complex Helmholtz equation on tagged
//! tetrahedral meshes, with impedance and normal velocity boundary conditions.
//!
//! The complex pressure $p = p_r + i p_i$ is discretized by a pair of real
//! P1 fields, giving a coupled real block system per frequency.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod impedance;
pub mod operators;
pub mod problem;

pub use problem::{
  AcousticMedium, FrequencyProblem, HelmholtzOperators, HelmholtzTags, PressureField,
};

use tetmesh::Tag;

pub type DofIdx = usize;

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
  #[error(transparent)]
  Factorization(#[from] common::linalg::FactorizationError),
  #[error("linear system is singular at {frequency} Hz")]
  SingularSystem { frequency: f64 },
  #[error("impedance on facet tag {tag} is zero")]
  ZeroImpedance { tag: Tag },
  #[error("cell {cell} is degenerate")]
  DegenerateCell { cell: usize },
}
