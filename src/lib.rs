//! Frequency sweep of the acoustic transfer behaviour of a duct geometry
//! (glottis inlet, lips outlet, walls) with the finite element method.
//!
//! For each frequency the complex Helmholtz equation is solved on a tagged
//! tetrahedral mesh, the pressure is sampled at a probe point, and pressure
//! and particle velocity observables are accumulated and persisted.

pub mod config;
pub mod error;
pub mod frequency;
pub mod output;
pub mod probe;
pub mod sweep;

pub use config::SweepConfig;
pub use error::SweepError;
pub use frequency::FrequencySeries;
pub use probe::ResolvedProbe;
pub use sweep::{FrequencySweep, ProbeObservation, ResultSink, SweepOutcome, SweepResults};
