//! Fireworks algorithms (FWA) for bounded, derivative-free minimisation.
//!
//! Two variants share one iteration skeleton:
//! - [`Bbfwa`]: bare-bones FWA, a single firework exploding a pool of sparks
//!   with an adaptive amplitude.
//! - [`Lotfwa`]: loser-out tournament FWA, several fireworks with per-firework
//!   amplitudes, a guided mutation spark and restart of hopeless fireworks.
//!
//! Supported features:
//! - Box constraints (one lower/upper bound shared by all coordinates)
//! - Strict evaluation budget, counted per evaluated point
//! - Batched evaluation: every operator submits its points in one call
//! - Explicit seeding for reproducible runs
//! - Per-iteration callback with early stop and CSV recording
//!
//! ```
//! use fwa::{BbfwaBuilder, FireworksOptimizer, pointwise};
//! use ndarray::Array1;
//!
//! let sphere = pointwise(|x: &Array1<f64>| x.iter().map(|&xi| xi * xi).sum());
//! let report = BbfwaBuilder::new()
//!     .evaluator(sphere)
//!     .dim(2)
//!     .bounds(-10.0, 10.0)
//!     .max_eval(2000)
//!     .sp_size(50)
//!     .init_amp(4.0)
//!     .seed(1)
//!     .build()?
//!     .run()?;
//! assert!(report.nfev <= 2000);
//! # Ok::<(), fwa::FwaError>(())
//! ```

use std::fmt;
use std::time::Duration;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub mod amplitude;
pub mod budget;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod population;

pub mod explode;
pub mod guided_mutation;
pub mod init_random;
pub mod restart;
pub mod select_elite;

pub mod bbfwa;
mod driver;
pub mod fireworks;
pub mod lotfwa;

pub mod recorder;
pub mod run_recorded;

#[cfg(test)]
mod tests;

pub use bbfwa::{Bbfwa, BbfwaBuilder};
pub use budget::{EvaluationBudget, Termination};
pub use config::{BbfwaConfig, LotfwaConfig, ProblemConfig};
pub use error::{BoxError, FwaError, Result};
pub use evaluator::{Batch, Evaluator, Pointwise, batch, pointwise};
pub use fireworks::{bbfwa, lotfwa};
pub use lotfwa::{Lotfwa, LotfwaBuilder};
pub use population::Population;
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use restart::{flag_losers, should_restart};
pub use run_recorded::run_recorded;

/// Lifecycle of a run. `Terminated` has no way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
	/// Configured, population not sampled yet
	Initialized,
	/// Population evaluated, iterating
	Running,
	/// Stopped by a termination condition
	Terminated,
}

/// Information passed to the callback after each iteration
#[derive(Debug, Clone)]
pub struct FwaIntermediate {
	pub x: Array1<f64>,
	pub fun: f64,
	/// Amplitude of the best firework
	pub amplitude: f64,
	pub iter: usize,
	pub nfev: usize,
	/// Fireworks restarted during this iteration
	pub restarts: usize,
}

/// Action returned by callback
pub enum CallbackAction {
	Continue,
	Stop,
}

/// Per-iteration callback
pub type Callback = Box<dyn FnMut(&FwaIntermediate) -> CallbackAction>;

/// Snapshot of the single firework after one BBFWA iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
	pub x: Array1<f64>,
	pub fun: f64,
	pub amplitude: f64,
}

/// Result/Report of a fireworks run
#[derive(Clone)]
pub struct FwaReport {
	pub x: Array1<f64>,
	pub fun: f64,
	pub message: String,
	pub termination: Option<Termination>,
	pub nit: usize,
	pub nfev: usize,
	/// Total number of fireworks restarted (LoTFWA only)
	pub restarts: usize,
	/// Seed the run's random generator was created from
	pub seed: u64,
	pub elapsed: Duration,
	pub population: Array2<f64>,
	pub population_fitness: Array1<f64>,
	pub amplitudes: Array1<f64>,
	/// One entry per iteration (BBFWA only)
	pub trace: Vec<TraceEntry>,
}

impl fmt::Debug for FwaReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FwaReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field("restarts", &self.restarts)
			.field("seed", &self.seed)
			.field("elapsed", &self.elapsed)
			.field(
				"population",
				&format!("{}x{}", self.population.nrows(), self.population.ncols()),
			)
			.field("trace", &format!("len={}", self.trace.len()))
			.finish()
	}
}

/// Common driving interface of both variants.
pub trait FireworksOptimizer {
	/// Install a per-iteration callback, replacing any previous one
	fn set_callback(&mut self, callback: Callback);

	fn state(&self) -> RunState;

	/// Sample and evaluate the initial population. No-op once running.
	fn initialize(&mut self) -> Result<()>;

	/// Run one iteration, initializing first if needed.
	///
	/// Returns `Ok(false)` once the run is terminated.
	fn step(&mut self) -> Result<bool>;

	/// Current population, `None` before initialization
	fn population(&self) -> Option<&Population>;

	fn iterations(&self) -> usize;

	fn evaluations(&self) -> usize;

	/// Best point and fitness found so far
	fn best(&self) -> Option<(&Array1<f64>, f64)>;

	/// Report on the run so far
	fn report(&self) -> FwaReport;

	/// Iterate until termination and return the final report
	fn run(mut self) -> Result<FwaReport>
	where
		Self: Sized,
	{
		self.initialize()?;
		while self.step()? {}
		Ok(self.report())
	}
}
