use crate::SweepError;

use helmholtz::DofIdx;
use tetmesh::{coords::Coord, TetMesh};

/// Probe point snapped to its nearest mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedProbe {
  pub dof: DofIdx,
  /// Coordinate of the vertex the probe was snapped to.
  pub coord: Coord,
  pub distance: f64,
}

impl ResolvedProbe {
  /// Nearest vertex to `point`, which must lie within `tolerance`.
  pub fn resolve(mesh: &TetMesh, point: [f64; 3], tolerance: f64) -> Result<Self, SweepError> {
    let target = Coord::from(point);
    let out_of_tolerance = |distance| SweepError::ProbeOutOfTolerance {
      point,
      distance,
      tolerance,
    };

    let (dof, distance) = mesh
      .nearest_vertex(&target)
      .ok_or_else(|| out_of_tolerance(f64::INFINITY))?;
    if distance > tolerance {
      return Err(out_of_tolerance(distance));
    }

    Ok(Self {
      dof,
      coord: mesh.coords().coord(dof),
      distance,
    })
  }
}
