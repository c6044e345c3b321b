use crate::{coords::Coord, Tag, TetMesh, VertexIdx};

use common::util::SampleStats;

impl TetMesh {
  /// Diameter $h_K$ of every cell.
  pub fn cell_diameters(&self) -> Vec<f64> {
    self
      .cells()
      .iter()
      .map(|cell| self.cell_coords(cell).diameter())
      .collect()
  }

  /// Min, max, median and mean of the cell diameters.
  pub fn element_size_stats(&self) -> Option<SampleStats> {
    SampleStats::compute(&self.cell_diameters())
  }

  /// Volume of the cells carrying `tag`, $integral_(Omega_"tag") 1 dif x$.
  pub fn region_volume(&self, tag: Tag) -> f64 {
    self
      .cells_with_tag(tag)
      .map(|cell| self.cell_coords(cell).vol())
      .sum()
  }

  /// Area of the facets carrying `tag`, $integral_(Gamma_"tag") 1 dif s$.
  pub fn facet_measure(&self, tag: Tag) -> f64 {
    self
      .facets_with_tag(tag)
      .map(|facet| self.facet_coords(facet).area())
      .sum()
  }

  /// Closest vertex to `point` and its distance.
  ///
  /// Ties are resolved towards the smaller vertex index.
  pub fn nearest_vertex(&self, point: &Coord) -> Option<(VertexIdx, f64)> {
    self
      .coords()
      .coord_iter()
      .map(|coord| (coord - point).norm())
      .enumerate()
      .fold(None, |best, (ivertex, dist)| match best {
        Some((_, best_dist)) if best_dist <= dist => best,
        _ => Some((ivertex, dist)),
      })
  }
}
