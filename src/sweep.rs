//! Sequential frequency loop: assemble, solve, sample, persist.

use crate::{FrequencySeries, ResolvedProbe, SweepConfig, SweepError};

use helmholtz::{
  impedance::particle_velocity, FrequencyProblem, HelmholtzOperators, HelmholtzTags, PressureField,
};
use num_complex::Complex64;
use tetmesh::TetMesh;

/// Observables at the probe for one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeObservation {
  pub frequency: f64,
  pub pressure_abs: f64,
  pub pressure_phase: f64,
  pub velocity_abs: f64,
  pub velocity_phase: f64,
}

impl ProbeObservation {
  pub fn new(frequency: f64, pressure: Complex64, velocity: Complex64) -> Self {
    Self {
      frequency,
      pressure_abs: pressure.norm(),
      pressure_phase: pressure.arg(),
      velocity_abs: velocity.norm(),
      velocity_phase: velocity.arg(),
    }
  }
}

/// Observations of all frequencies processed so far, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResults {
  pub frequencies: Vec<f64>,
  pub pressure_abs: Vec<f64>,
  pub pressure_phase: Vec<f64>,
  pub velocity_abs: Vec<f64>,
  pub velocity_phase: Vec<f64>,
}

impl SweepResults {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      frequencies: Vec::with_capacity(capacity),
      pressure_abs: Vec::with_capacity(capacity),
      pressure_phase: Vec::with_capacity(capacity),
      velocity_abs: Vec::with_capacity(capacity),
      velocity_phase: Vec::with_capacity(capacity),
    }
  }

  pub fn push(&mut self, obs: ProbeObservation) {
    self.frequencies.push(obs.frequency);
    self.pressure_abs.push(obs.pressure_abs);
    self.pressure_phase.push(obs.pressure_phase);
    self.velocity_abs.push(obs.velocity_abs);
    self.velocity_phase.push(obs.velocity_phase);
  }

  pub fn len(&self) -> usize {
    self.frequencies.len()
  }
  pub fn is_empty(&self) -> bool {
    self.frequencies.is_empty()
  }

  pub fn row(&self, irow: usize) -> ProbeObservation {
    ProbeObservation {
      frequency: self.frequencies[irow],
      pressure_abs: self.pressure_abs[irow],
      pressure_phase: self.pressure_phase[irow],
      velocity_abs: self.velocity_abs[irow],
      velocity_phase: self.velocity_phase[irow],
    }
  }
  pub fn rows(&self) -> impl ExactSizeIterator<Item = ProbeObservation> + '_ {
    (0..self.len()).map(|irow| self.row(irow))
  }
}

/// Receives the complete accumulator after every processed frequency.
pub trait ResultSink {
  fn persist(&mut self, results: &SweepResults) -> Result<(), SweepError>;
}

impl<F> ResultSink for F
where
  F: FnMut(&SweepResults) -> Result<(), SweepError>,
{
  fn persist(&mut self, results: &SweepResults) -> Result<(), SweepError> {
    self(results)
  }
}

#[derive(Debug)]
pub struct SweepOutcome {
  pub results: SweepResults,
  /// Field of the last processed frequency.
  pub final_field: PressureField,
  pub final_frequency: f64,
}

/// Everything fixed before the frequency loop starts.
pub struct FrequencySweep {
  config: SweepConfig,
  frequencies: FrequencySeries,
  operators: HelmholtzOperators,
  probe: ResolvedProbe,
}

impl FrequencySweep {
  pub fn new(mesh: &TetMesh, config: SweepConfig) -> Result<Self, SweepError> {
    config.validate()?;
    let frequencies = FrequencySeries::from_range(&config.frequencies)?;
    let tags = HelmholtzTags::from(config.tags);
    check_tags(mesh, &tags)?;

    if let Some(stats) = mesh.element_size_stats() {
      tracing::info!(
        "element size: min={:e} max={:e} median={:e} mean={:e}",
        stats.min,
        stats.max,
        stats.median,
        stats.mean
      );
    }
    tracing::info!("DOF = {}", 2 * mesh.nvertices());
    tracing::info!("alips = {:e}", mesh.facet_measure(tags.lips));
    tracing::info!("aglottis = {:e}", mesh.facet_measure(tags.inlet));
    tracing::info!("volume = {:e}", mesh.region_volume(tags.region));

    let operators = HelmholtzOperators::assemble(mesh, tags)?;
    let probe = ResolvedProbe::resolve(mesh, config.probe.point, config.probe.tolerance)?;
    tracing::info!(
      "probe {:?} snapped to vertex {} at [{}, {}, {}] (distance {:e})",
      config.probe.point,
      probe.dof,
      probe.coord.x,
      probe.coord.y,
      probe.coord.z,
      probe.distance
    );

    Ok(Self {
      config,
      frequencies,
      operators,
      probe,
    })
  }

  pub fn frequencies(&self) -> &FrequencySeries {
    &self.frequencies
  }
  pub fn probe(&self) -> &ResolvedProbe {
    &self.probe
  }
  pub fn ndofs(&self) -> usize {
    2 * self.operators.ndofs()
  }

  pub fn problem(&self, frequency: f64) -> FrequencyProblem {
    FrequencyProblem {
      frequency,
      medium: self.config.medium(),
      wall_impedance: self.config.wall_impedance(),
      lips_impedance: self.config.lips_impedance(frequency),
      inlet_velocity: self.config.inlet_velocity(),
    }
  }

  /// Solves a single frequency and samples the probe.
  pub fn solve_frequency(
    &self,
    frequency: f64,
  ) -> Result<(PressureField, ProbeObservation), SweepError> {
    let problem = self.problem(frequency);
    let field = self.operators.solve(&problem)?;
    let pressure = field.at(self.probe.dof);
    let velocity = particle_velocity(pressure, problem.lips_impedance);
    Ok((field, ProbeObservation::new(frequency, pressure, velocity)))
  }

  /// Runs all frequencies in increasing order.
  ///
  /// The sink sees every intermediate accumulator, so rows of completed
  /// frequencies are persisted even if a later frequency fails.
  pub fn run(&self, sink: &mut impl ResultSink) -> Result<SweepOutcome, SweepError> {
    self.run_with(sink, |frequency| self.solve_frequency(frequency))
  }

  /// Frequency loop with the per-frequency solve supplied by the caller.
  pub fn run_with<S>(&self, sink: &mut impl ResultSink, mut solve: S) -> Result<SweepOutcome, SweepError>
  where
    S: FnMut(f64) -> Result<(PressureField, ProbeObservation), SweepError>,
  {
    let fmax = self.frequencies.max();
    let mut results = SweepResults::with_capacity(self.frequencies.len());
    let mut last = None;

    for frequency in self.frequencies.iter() {
      let (field, obs) = solve(frequency)?;
      results.push(obs);
      sink.persist(&results)?;
      tracing::info!("Process {frequency} / {fmax}");
      last = Some((frequency, field));
    }

    let (final_frequency, final_field) =
      last.ok_or_else(|| SweepError::InvalidConfig("frequency series is empty".to_string()))?;
    Ok(SweepOutcome {
      results,
      final_field,
      final_frequency,
    })
  }
}

fn check_tags(mesh: &TetMesh, tags: &HelmholtzTags) -> Result<(), SweepError> {
  let region_tags = mesh.region_tags();
  let facet_tags = mesh.facet_tags();
  tracing::debug!("region tags {region_tags:?}, facet tags {facet_tags:?}");

  if !region_tags.contains(&tags.region) {
    return Err(SweepError::MissingTag {
      kind: "region",
      tag: tags.region,
    });
  }
  for tag in [tags.inlet, tags.lips, tags.wall] {
    if !facet_tags.contains(&tag) {
      return Err(SweepError::MissingTag { kind: "facet", tag });
    }
  }
  Ok(())
}
