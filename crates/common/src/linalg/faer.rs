use ::faer::linalg::solvers::Solve;

use super::nalgebra::{CsrMatrix, Vector};

#[derive(Debug, thiserror::Error)]
#[error("sparse LU factorization failed: {0}")]
pub struct FactorizationError(String);

type SparseMatrixFaer = ::faer::sparse::SparseRowMat<usize, f64>;

pub fn nalgebra2faer(m: CsrMatrix) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (row_ptrs, col_indices, values) = m.disassemble();

  let symbolic =
    ::faer::sparse::SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptrs, None, col_indices);
  ::faer::sparse::SparseRowMat::new(symbolic, values)
}

/// Sparse LU factorization of a general square system matrix.
pub struct FaerLu {
  raw: ::faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  pub fn new(a: CsrMatrix) -> Result<Self, FactorizationError> {
    let raw = nalgebra2faer(a)
      .sp_lu()
      .map_err(|err| FactorizationError(format!("{err:?}")))?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &Vector) -> Vector {
    let b = ::faer::Col::from_fn(b.nrows(), |i| b[i]);
    let x = self.raw.solve(b);
    Vector::from_iterator(x.nrows(), x.iter().copied())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn lu_solves_nonsymmetric_system() {
    let a = na::dmatrix![
      4.0, -1.0, 0.0;
      2.0, 5.0, -1.0;
      0.0, 3.0, 6.0
    ];
    let x_exact = na::dvector![1.0, -2.0, 0.5];
    let b = &a * &x_exact;

    let csr = CsrMatrix::from(&a);
    let lu = FaerLu::new(csr).unwrap();
    let x = lu.solve(&b);

    for (xi, ei) in x.iter().zip(x_exact.iter()) {
      assert_relative_eq!(xi, ei, epsilon = 1e-12);
    }
    assert!((&a * &x - &b).norm() < 1e-12);
  }
}
