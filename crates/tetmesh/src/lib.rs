//! Tetrahedral Mesh with tagged regions and boundary facets.
//!
//! - Vertex coordinates in 3D.
//! - Tetrahedral cells carrying a volume region tag.
//! - Triangular boundary facets carrying a facet tag.
//! - Geometrical information (volumes, areas, element sizes, tagged measures).
//! - Gmsh import and VTK export.

extern crate nalgebra as na;

pub mod coords;
pub mod gen;
pub mod geometry;
pub mod io;
pub mod simplex;

use coords::MeshCoords;
use simplex::{TetCoords, TriangleCoords};

use indexmap::IndexSet;

pub type VertexIdx = usize;

/// Physical group tag, as assigned by the mesh generator.
pub type Tag = i32;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("failed to parse gmsh file: {0}")]
  MshParse(String),
  #[error("gmsh file has no `{0}` section")]
  MissingSection(&'static str),
  #[error("mesh contains no tetrahedra")]
  NoCells,
  #[error("element references unknown node tag {0}")]
  UnknownNode(u64),
  #[error("vertex {vertex} out of range for mesh with {nvertices} vertices")]
  VertexOutOfRange { vertex: VertexIdx, nvertices: usize },
  #[error("failed to export vtk file: {0}")]
  Vtk(String),
}

/// A simplex given by its vertex indices, together with its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedSimplex<const N: usize> {
  pub vertices: [VertexIdx; N],
  pub tag: Tag,
}
impl<const N: usize> TaggedSimplex<N> {
  pub fn new(vertices: [VertexIdx; N], tag: Tag) -> Self {
    Self { vertices, tag }
  }
}

pub type Cell = TaggedSimplex<4>;
pub type Facet = TaggedSimplex<3>;

/// Immutable tetrahedral mesh.
#[derive(Debug, Clone)]
pub struct TetMesh {
  coords: MeshCoords,
  cells: Vec<Cell>,
  facets: Vec<Facet>,
}

impl TetMesh {
  pub fn new(coords: MeshCoords, cells: Vec<Cell>, facets: Vec<Facet>) -> Result<Self, MeshError> {
    if cells.is_empty() {
      return Err(MeshError::NoCells);
    }
    let nvertices = coords.nvertices();
    let all_vertices = cells
      .iter()
      .flat_map(|c| c.vertices)
      .chain(facets.iter().flat_map(|f| f.vertices));
    for vertex in all_vertices {
      if vertex >= nvertices {
        return Err(MeshError::VertexOutOfRange { vertex, nvertices });
      }
    }
    Ok(Self {
      coords,
      cells,
      facets,
    })
  }

  pub fn coords(&self) -> &MeshCoords {
    &self.coords
  }
  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }
  pub fn facets(&self) -> &[Facet] {
    &self.facets
  }

  pub fn nvertices(&self) -> usize {
    self.coords.nvertices()
  }
  pub fn ncells(&self) -> usize {
    self.cells.len()
  }
  pub fn nfacets(&self) -> usize {
    self.facets.len()
  }

  pub fn cells_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Cell> {
    self.cells.iter().filter(move |c| c.tag == tag)
  }
  pub fn facets_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Facet> {
    self.facets.iter().filter(move |f| f.tag == tag)
  }

  /// Distinct region tags, in order of first appearance.
  pub fn region_tags(&self) -> IndexSet<Tag> {
    self.cells.iter().map(|c| c.tag).collect()
  }
  /// Distinct facet tags, in order of first appearance.
  pub fn facet_tags(&self) -> IndexSet<Tag> {
    self.facets.iter().map(|f| f.tag).collect()
  }

  pub fn cell_coords(&self, cell: &Cell) -> TetCoords {
    TetCoords::new(cell.vertices.map(|v| self.coords.coord(v)))
  }
  pub fn facet_coords(&self, facet: &Facet) -> TriangleCoords {
    TriangleCoords::new(facet.vertices.map(|v| self.coords.coord(v)))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn unit_tet() -> (MeshCoords, Vec<Cell>) {
    let coords = MeshCoords::from_points(&[
      na::Vector3::new(0.0, 0.0, 0.0),
      na::Vector3::new(1.0, 0.0, 0.0),
      na::Vector3::new(0.0, 1.0, 0.0),
      na::Vector3::new(0.0, 0.0, 1.0),
    ]);
    (coords, vec![Cell::new([0, 1, 2, 3], 1)])
  }

  #[test]
  fn rejects_empty_mesh() {
    let (coords, _) = unit_tet();
    assert!(matches!(
      TetMesh::new(coords, Vec::new(), Vec::new()),
      Err(MeshError::NoCells)
    ));
  }

  #[test]
  fn rejects_dangling_vertex() {
    let (coords, cells) = unit_tet();
    let facets = vec![Facet::new([0, 1, 7], 2)];
    assert!(matches!(
      TetMesh::new(coords, cells, facets),
      Err(MeshError::VertexOutOfRange {
        vertex: 7,
        nvertices: 4
      })
    ));
  }

  #[test]
  fn tag_sets() {
    let (coords, cells) = unit_tet();
    let facets = vec![
      Facet::new([0, 1, 2], 3),
      Facet::new([0, 1, 3], 1),
      Facet::new([0, 2, 3], 3),
    ];
    let mesh = TetMesh::new(coords, cells, facets).unwrap();
    assert_eq!(mesh.region_tags().into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(mesh.facet_tags().into_iter().collect::<Vec<_>>(), vec![3, 1]);
    assert_eq!(mesh.facets_with_tag(3).count(), 2);
  }
}
