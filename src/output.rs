//! Result table and field export.

use crate::{ResultSink, SweepError, SweepResults};

use helmholtz::PressureField;
use itertools::Itertools;
use std::{
  fs::File,
  io::{BufWriter, Write},
  path::{Path, PathBuf},
};
use tetmesh::{
  io::vtk::{save_vtk, PointScalars},
  TetMesh,
};

/// Formats like the `%.18e` conversion: exponent with sign and at least two digits.
pub fn format_sci(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_string();
  }
  if value.is_infinite() {
    return if value > 0.0 { "inf" } else { "-inf" }.to_string();
  }
  let formatted = format!("{value:.18e}");
  match formatted.split_once('e') {
    Some((mantissa, exponent)) => {
      let exponent: i32 = exponent.parse().unwrap_or(0);
      let sign = if exponent < 0 { '-' } else { '+' };
      format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
    None => formatted,
  }
}

/// One row per frequency: frequency, `|u|`, `phase(u)`, `|p|`, `phase(p)`.
pub fn write_results<W: Write>(mut writer: W, results: &SweepResults) -> std::io::Result<()> {
  for row in results.rows() {
    let columns = [
      row.frequency,
      row.velocity_abs,
      row.velocity_phase,
      row.pressure_abs,
      row.pressure_phase,
    ];
    let line = columns.into_iter().map(format_sci).join(" ");
    writeln!(writer, "{line}")?;
  }
  writer.flush()
}

/// Rewrites the whole table file on every call.
#[derive(Debug, Clone)]
pub struct TextTableSink {
  path: PathBuf,
}

impl TextTableSink {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl ResultSink for TextTableSink {
  fn persist(&mut self, results: &SweepResults) -> Result<(), SweepError> {
    let file = File::create(&self.path)?;
    write_results(BufWriter::new(file), results)?;
    Ok(())
  }
}

/// Writes real part, imaginary part and magnitude of the pressure as point data.
pub fn save_pressure_vtk(
  mesh: &TetMesh,
  field: &PressureField,
  path: impl AsRef<Path>,
) -> Result<(), SweepError> {
  let magnitude = field.magnitude();
  let point_data = [
    PointScalars {
      name: "pressure_real",
      values: field.real.as_slice(),
    },
    PointScalars {
      name: "pressure_imag",
      values: field.imag.as_slice(),
    },
    PointScalars {
      name: "pressure_abs",
      values: magnitude.as_slice(),
    },
  ];
  save_vtk(mesh, &point_data, path)?;
  Ok(())
}
