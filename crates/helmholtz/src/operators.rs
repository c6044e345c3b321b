use tetmesh::simplex::{TetCoords, TriangleCoords};

pub type ElMat = na::DMatrix<f64>;
pub type ElVec = na::DVector<f64>;

/// Element matrix provider on tetrahedral cells.
pub trait ElMatProvider: Sync {
  fn eval(&self, cell: &TetCoords) -> ElMat;
}

/// Element matrix provider on boundary triangles.
pub trait FacetElMatProvider: Sync {
  fn eval(&self, facet: &TriangleCoords) -> ElMat;
}

/// Element vector provider on boundary triangles.
pub trait FacetElVecProvider: Sync {
  fn eval(&self, facet: &TriangleCoords) -> ElVec;
}

/// Exact P1 mass matrix on a simplex of dimension `dim` with volume `vol`.
///
/// $M_(i j) = vol / ((d+1)(d+2)) (1 + delta_(i j))$
pub fn simplex_mass_elmat(dim: usize, vol: f64) -> ElMat {
  let ndofs = dim + 1;
  let v = vol / ((dim + 1) * (dim + 2)) as f64;
  let mut elmat = na::DMatrix::from_element(ndofs, ndofs, v);
  elmat.fill_diagonal(2.0 * v);
  elmat
}

/// Exact Element Matrix Provider for the Laplacian, $(grad p, grad q)_(L^2(K))$.
///
/// $A = vol(K) G^T G$, with $G$ the barycentric gradients.
pub struct LaplaceElmat;
impl ElMatProvider for LaplaceElmat {
  fn eval(&self, cell: &TetCoords) -> ElMat {
    match cell.difbarys() {
      Some(difbarys) => {
        let gram = difbarys.transpose() * difbarys;
        let mut elmat = na::DMatrix::zeros(4, 4);
        elmat.copy_from(&gram);
        cell.vol() * elmat
      }
      None => na::DMatrix::zeros(4, 4),
    }
  }
}

/// Exact Element Matrix Provider for the scalar mass bilinear form on cells.
pub struct ScalarMassElmat;
impl ElMatProvider for ScalarMassElmat {
  fn eval(&self, cell: &TetCoords) -> ElMat {
    simplex_mass_elmat(3, cell.vol())
  }
}

/// Boundary mass bilinear form $(p, q)_(L^2(F))$ on a facet.
pub struct FacetMassElmat;
impl FacetElMatProvider for FacetMassElmat {
  fn eval(&self, facet: &TriangleCoords) -> ElMat {
    simplex_mass_elmat(2, facet.area())
  }
}

/// Boundary load $(1, q)_(L^2(F))$ of a unit constant Neumann datum.
///
/// Exact for constant data.
pub struct UnitFacetLoadElvec;
impl FacetElVecProvider for UnitFacetLoadElvec {
  fn eval(&self, facet: &TriangleCoords) -> ElVec {
    na::DVector::from_element(3, facet.area() / 3.0)
  }
}
