use helmholtz::SolveError;
use tetmesh::{MeshError, Tag};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
  #[error(transparent)]
  Mesh(#[from] MeshError),
  #[error(transparent)]
  Solve(#[from] SolveError),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("failed to read configuration: {0}")]
  ConfigFormat(#[from] serde_json::Error),
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  #[error("mesh has no {kind} tagged {tag}")]
  MissingTag { kind: &'static str, tag: Tag },
  #[error("no mesh vertex within {tolerance} of probe point {point:?} (nearest at {distance})")]
  ProbeOutOfTolerance {
    point: [f64; 3],
    distance: f64,
    tolerance: f64,
  },
}
