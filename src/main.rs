use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

use tractfem::{
  output::{save_pressure_vtk, TextTableSink},
  FrequencySweep, SweepConfig, SweepError,
};

/// Acoustic transfer function of a vocal tract mesh by frequency sweep.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
  /// gmsh 4.1 mesh with volume and surface physical groups.
  #[arg(long)]
  mesh: PathBuf,
  /// JSON file overriding the default run constants.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Result table, rewritten after every frequency.
  #[arg(long, default_value = "tfFEM.txt")]
  output: PathBuf,
  /// VTK file receiving the field of the last frequency.
  #[arg(long, default_value = "simple_tube.vtk")]
  vtk: PathBuf,
}

fn run(args: &Args) -> Result<(), SweepError> {
  let config = match &args.config {
    Some(path) => SweepConfig::load(path)?,
    None => SweepConfig::default(),
  };
  let mesh = tetmesh::io::gmsh::load_gmsh_file(&args.mesh)?;
  tracing::info!(
    "loaded {} with {} vertices, {} cells, {} facets",
    args.mesh.display(),
    mesh.nvertices(),
    mesh.ncells(),
    mesh.nfacets()
  );

  let sweep = FrequencySweep::new(&mesh, config)?;
  let mut sink = TextTableSink::new(&args.output);
  let outcome = sweep.run(&mut sink)?;

  save_pressure_vtk(&mesh, &outcome.final_field, &args.vtk)?;
  tracing::info!(
    "wrote {} rows to {} and the {} Hz field to {}",
    outcome.results.len(),
    args.output.display(),
    outcome.final_frequency,
    args.vtk.display()
  );
  Ok(())
}

fn main() -> ExitCode {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let args = Args::parse();
  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      tracing::error!("{err}");
      ExitCode::FAILURE
    }
  }
}
