use crate::VertexIdx;

pub type Coord = na::Vector3<f64>;

/// The coordinates of the vertices of the mesh, one column per vertex.
#[derive(Debug, Clone)]
pub struct MeshCoords {
  matrix: na::Matrix3xX<f64>,
}

impl MeshCoords {
  pub fn new(matrix: na::Matrix3xX<f64>) -> Self {
    Self { matrix }
  }
  pub fn from_points(points: &[Coord]) -> Self {
    Self::new(na::Matrix3xX::from_columns(points))
  }

  pub fn matrix(&self) -> &na::Matrix3xX<f64> {
    &self.matrix
  }

  pub fn nvertices(&self) -> usize {
    self.matrix.ncols()
  }

  pub fn coord(&self, ivertex: VertexIdx) -> Coord {
    self.matrix.column(ivertex).into_owned()
  }

  pub fn coord_iter(&self) -> impl Iterator<Item = Coord> + '_ {
    self.matrix.column_iter().map(|c| c.into_owned())
  }
}
