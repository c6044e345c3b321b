use crate::operators::{ElMatProvider, FacetElMatProvider, FacetElVecProvider};

use itertools::Itertools;
use rayon::prelude::*;
use tetmesh::{Cell, Facet, Tag, TetMesh};

pub type GalMat = nas::CooMatrix<f64>;
pub type GalVec = na::DVector<f64>;

fn scatter_elmat<const N: usize>(
  vertices: &[usize; N],
  elmat: &na::DMatrix<f64>,
) -> Vec<(usize, usize, f64)> {
  let mut local_triplets = Vec::new();
  for (ilocal, &iglobal) in vertices.iter().enumerate() {
    for (jlocal, &jglobal) in vertices.iter().enumerate() {
      let val = elmat[(ilocal, jlocal)];
      if val != 0.0 {
        local_triplets.push((iglobal, jglobal, val));
      }
    }
  }
  local_triplets
}

fn triplets_to_galmat(ndofs: usize, triplets: Vec<(usize, usize, f64)>) -> GalMat {
  let (rows, cols, values) = triplets.into_iter().multiunzip();
  GalMat::try_from_triplets(ndofs, ndofs, rows, cols, values)
    .expect("Element DOFs are mesh vertices and therefore in bounds.")
}

/// Assembly algorithm for the Galerkin Matrix over the cells of a region.
pub fn assemble_galmat(mesh: &TetMesh, region: Tag, elmat: impl ElMatProvider) -> GalMat {
  let cells: Vec<&Cell> = mesh.cells_with_tag(region).collect();

  let triplets: Vec<(usize, usize, f64)> = cells
    .par_iter()
    .flat_map_iter(|cell| {
      let elmat = elmat.eval(&mesh.cell_coords(cell));
      scatter_elmat(&cell.vertices, &elmat)
    })
    .collect();

  triplets_to_galmat(mesh.nvertices(), triplets)
}

/// Assembly algorithm for a boundary Galerkin Matrix over the facets with a tag.
pub fn assemble_facet_galmat(mesh: &TetMesh, tag: Tag, elmat: impl FacetElMatProvider) -> GalMat {
  let facets: Vec<&Facet> = mesh.facets_with_tag(tag).collect();

  let triplets: Vec<(usize, usize, f64)> = facets
    .par_iter()
    .flat_map_iter(|facet| {
      let elmat = elmat.eval(&mesh.facet_coords(facet));
      scatter_elmat(&facet.vertices, &elmat)
    })
    .collect();

  triplets_to_galmat(mesh.nvertices(), triplets)
}

/// Assembly algorithm for a boundary Galerkin Vector over the facets with a tag.
pub fn assemble_facet_galvec(mesh: &TetMesh, tag: Tag, elvec: impl FacetElVecProvider) -> GalVec {
  let facets: Vec<&Facet> = mesh.facets_with_tag(tag).collect();

  let entries: Vec<(usize, f64)> = facets
    .par_iter()
    .flat_map_iter(|facet| {
      let elvec = elvec.eval(&mesh.facet_coords(facet));
      facet
        .vertices
        .iter()
        .zip(elvec.iter())
        .filter(|(_, &v)| v != 0.0)
        .map(|(&iglobal, &v)| (iglobal, v))
        .collect_vec()
    })
    .collect();

  let mut galvec = na::DVector::zeros(mesh.nvertices());
  for (irow, val) in entries {
    galvec[irow] += val;
  }
  galvec
}
