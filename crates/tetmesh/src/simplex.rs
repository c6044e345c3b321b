use crate::coords::Coord;

use itertools::Itertools;

/// Coordinates of the four vertices of a tetrahedron.
#[derive(Debug, Clone)]
pub struct TetCoords {
  pub vertices: [Coord; 4],
}

impl TetCoords {
  pub fn new(vertices: [Coord; 4]) -> Self {
    Self { vertices }
  }

  /// Columns are the edge vectors $v_i - v_0$, $i = 1,2,3$.
  pub fn spanning_vectors(&self) -> na::Matrix3<f64> {
    let v0 = self.vertices[0];
    na::Matrix3::from_columns(&[
      self.vertices[1] - v0,
      self.vertices[2] - v0,
      self.vertices[3] - v0,
    ])
  }

  pub fn det(&self) -> f64 {
    self.spanning_vectors().determinant()
  }

  pub fn vol(&self) -> f64 {
    self.det().abs() / 6.0
  }

  /// Largest distance between any two vertices.
  pub fn diameter(&self) -> f64 {
    self
      .vertices
      .iter()
      .tuple_combinations()
      .map(|(a, b)| (b - a).norm())
      .fold(0.0, f64::max)
  }

  /// Gradients of the barycentric coordinate functions, one column per vertex.
  ///
  /// Returns `None` for a degenerate tetrahedron.
  pub fn difbarys(&self) -> Option<na::Matrix3x4<f64>> {
    // Rows of the inverse Jacobian are the gradients of lambda_1..lambda_3.
    let inv = self.spanning_vectors().try_inverse()?;
    let mut difbarys = na::Matrix3x4::zeros();
    for i in 0..3 {
      let grad = inv.row(i).transpose();
      difbarys.set_column(i + 1, &grad);
    }
    let grad0 = -(difbarys.column(1) + difbarys.column(2) + difbarys.column(3));
    difbarys.set_column(0, &grad0);
    Some(difbarys)
  }
}

/// Coordinates of the three vertices of a boundary triangle.
#[derive(Debug, Clone)]
pub struct TriangleCoords {
  pub vertices: [Coord; 3],
}

impl TriangleCoords {
  pub fn new(vertices: [Coord; 3]) -> Self {
    Self { vertices }
  }

  pub fn area(&self) -> f64 {
    let [a, b, c] = &self.vertices;
    0.5 * (b - a).cross(&(c - a)).norm()
  }
}
