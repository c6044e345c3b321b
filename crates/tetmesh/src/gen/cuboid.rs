use crate::{coords::MeshCoords, Cell, Facet, Tag, TetMesh, VertexIdx};

/// Kuhn triangulation of the unit box into 6 tetrahedra sharing the main diagonal.
///
/// Local box vertex `i + 2 * (j + 2 * k)` sits at offset `(i, j, k)`.
const KUHN_TETS: [[usize; 4]; 6] = [
  [0, 1, 3, 7],
  [0, 1, 5, 7],
  [0, 2, 3, 7],
  [0, 2, 6, 7],
  [0, 4, 5, 7],
  [0, 4, 6, 7],
];

/// Tags assigned by the cuboid generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuboidTags {
  pub region: Tag,
  /// Facets on the plane `x = 0`.
  pub inlet: Tag,
  /// Facets on the plane `x = lx`.
  pub outlet: Tag,
  /// All remaining boundary facets.
  pub wall: Tag,
}
impl Default for CuboidTags {
  fn default() -> Self {
    Self {
      region: 1,
      inlet: 1,
      outlet: 2,
      wall: 3,
    }
  }
}

/// Structured tetrahedral mesh of the box $[0, l_x] times [0, l_y] times [0, l_z]$,
/// a straight duct along the x-axis.
#[derive(Debug, Clone)]
pub struct CuboidMesh {
  lengths: [f64; 3],
  nboxes: [usize; 3],
}

impl CuboidMesh {
  pub fn new(lengths: [f64; 3], nboxes: [usize; 3]) -> Self {
    assert!(nboxes.iter().all(|&n| n > 0), "Need at least one box per axis.");
    assert!(lengths.iter().all(|&l| l > 0.0), "Side lengths must be positive.");
    Self { lengths, nboxes }
  }

  fn nvertices_axis(&self) -> [usize; 3] {
    self.nboxes.map(|n| n + 1)
  }
  pub fn nvertices(&self) -> usize {
    self.nvertices_axis().iter().product()
  }

  fn vertex_index(&self, cart: [usize; 3]) -> VertexIdx {
    let [nx, ny, _] = self.nvertices_axis();
    cart[0] + nx * (cart[1] + ny * cart[2])
  }

  fn box_vertices(&self, ibox: [usize; 3]) -> [VertexIdx; 8] {
    let mut verts = [0; 8];
    for (ilocal, vert) in verts.iter_mut().enumerate() {
      let offset = [ilocal & 1, (ilocal >> 1) & 1, (ilocal >> 2) & 1];
      *vert = self.vertex_index([0, 1, 2].map(|a| ibox[a] + offset[a]));
    }
    verts
  }

  pub fn compute_coords(&self) -> MeshCoords {
    let [nx, ny, nz] = self.nvertices_axis();
    let h = [0, 1, 2].map(|a| self.lengths[a] / self.nboxes[a] as f64);
    let mut matrix = na::Matrix3xX::zeros(self.nvertices());
    for k in 0..nz {
      for j in 0..ny {
        for i in 0..nx {
          let ivertex = self.vertex_index([i, j, k]);
          matrix[(0, ivertex)] = h[0] * i as f64;
          matrix[(1, ivertex)] = h[1] * j as f64;
          matrix[(2, ivertex)] = h[2] * k as f64;
        }
      }
    }
    MeshCoords::new(matrix)
  }

  fn box_iter(&self) -> impl Iterator<Item = [usize; 3]> {
    let [nx, ny, nz] = self.nboxes;
    (0..nz).flat_map(move |k| (0..ny).flat_map(move |j| (0..nx).map(move |i| [i, j, k])))
  }

  pub fn compute_cells(&self, tag: Tag) -> Vec<Cell> {
    self
      .box_iter()
      .flat_map(|ibox| {
        let verts = self.box_vertices(ibox);
        KUHN_TETS.map(|tet| Cell::new(tet.map(|l| verts[l]), tag))
      })
      .collect()
  }

  /// Boundary triangles, conforming with the Kuhn split.
  ///
  /// Each boundary quad with ascending local corners `a < b < c < d`
  /// is cut along the diagonal `a-d`.
  pub fn compute_boundary_facets(&self, tags: &CuboidTags) -> Vec<Facet> {
    let mut facets = Vec::new();
    for ibox in self.box_iter() {
      let verts = self.box_vertices(ibox);
      for axis in 0..3 {
        for side in 0..2 {
          let on_boundary = match side {
            0 => ibox[axis] == 0,
            _ => ibox[axis] == self.nboxes[axis] - 1,
          };
          if !on_boundary {
            continue;
          }
          let tag = match (axis, side) {
            (0, 0) => tags.inlet,
            (0, _) => tags.outlet,
            _ => tags.wall,
          };
          let corners: Vec<_> = (0..8).filter(|l| (l >> axis) & 1 == side).collect();
          let [a, b, c, d] = [0, 1, 2, 3].map(|i| verts[corners[i]]);
          facets.push(Facet::new([a, b, d], tag));
          facets.push(Facet::new([a, c, d], tag));
        }
      }
    }
    facets
  }

  pub fn to_tet_mesh(&self, tags: CuboidTags) -> TetMesh {
    let coords = self.compute_coords();
    let cells = self.compute_cells(tags.region);
    let facets = self.compute_boundary_facets(&tags);
    TetMesh::new(coords, cells, facets).expect("Generated cuboid mesh is valid.")
  }
}
