use itertools::Itertools;

use crate::util::{CumsumExt, IterAllEqExt};

pub type Vector = na::DVector<f64>;
pub type Matrix = na::DMatrix<f64>;
pub type CooMatrix = nas::CooMatrix<f64>;
pub type CsrMatrix = nas::CsrMatrix<f64>;

pub trait CooMatrixExt {
  fn linear_combination(terms: &[(f64, &Self)]) -> Self;
  fn block(block_grid: &[&[&Self]]) -> Self;
}

impl CooMatrixExt for CooMatrix {
  /// Sum of scaled matrices of equal shape, $sum_i c_i A_i$.
  ///
  /// Terms with a zero coefficient are skipped, duplicates are kept as
  /// triplets and summed on conversion to a compressed format.
  fn linear_combination(terms: &[(f64, &Self)]) -> Self {
    let (nrows, ncols) = terms
      .iter()
      .map(|(_, m)| (m.nrows(), m.ncols()))
      .all_eq()
      .expect("All terms of a linear combination must have the same shape.");

    let mut result = Self::new(nrows, ncols);
    for &(coeff, mat) in terms {
      if coeff == 0.0 {
        continue;
      }
      for (r, c, &v) in mat.triplet_iter() {
        result.push(r, c, coeff * v);
      }
    }
    result
  }

  /// Concatenates a matrix block grid row-wise and column-wise, automatically computing offsets.
  fn block(block_grid: &[&[&Self]]) -> Self {
    block_grid
      .iter()
      .map(|row| row.len())
      .all_eq()
      .expect("Each block row must contain the same number of matrices.");

    let mut row_offsets: Vec<usize> = block_grid
      .iter()
      .map(|row| {
        let nrows = row.first().map_or(0, |m| m.nrows());
        assert!(row.iter().all(|m| nrows == m.nrows()));
        nrows
      })
      .cumsum()
      .collect();
    let nrows_total = row_offsets.pop().unwrap_or(0);
    row_offsets.insert(0, 0);

    let mut col_offsets: Vec<usize> = block_grid
      .iter()
      .map(|row| row.iter().map(|mat| mat.ncols()).cumsum().collect_vec())
      .all_eq()
      .expect("Each row must have matrices at the same offsets.");
    let ncols_total = col_offsets.pop().unwrap_or(0);
    col_offsets.insert(0, 0);

    let mut result = Self::zeros(nrows_total, ncols_total);

    for (i, row) in block_grid.iter().enumerate() {
      for (j, block) in row.iter().enumerate() {
        let row_offset = row_offsets[i];
        let col_offset = col_offsets[j];

        for (r, c, &v) in block.triplet_iter() {
          result.push(row_offset + r, col_offset + c, v);
        }
      }
    }

    result
  }
}

pub fn assert_mat_eq(a: &Matrix, b: &Matrix, eps: Option<f64>) {
  let eps = eps.unwrap_or(10e-12);
  assert_eq!(a.shape(), b.shape(), "matrix shapes differ");
  let diff = (a - b).abs();
  let max = diff.max();
  assert!(max <= eps, "matrices differ by {max:e}:\n{a}\n{b}");
}
