//! Bare-bones fireworks algorithm.
//!
//! One firework explodes `sp_size` sparks per iteration within its dynamic
//! amplitude, moves to the best of itself and its sparks, and widens or
//! narrows its amplitude depending on whether that move was an improvement.

use ndarray::Array1;

use crate::amplitude::update_amplitudes;
use crate::config::{BbfwaConfig, ProblemConfig};
use crate::driver::Driver;
use crate::error::{FwaError, Result};
use crate::evaluator::{Evaluator, evaluate_checked};
use crate::explode::{SparkSet, explode};
use crate::population::Population;
use crate::select_elite::select_elite;
use crate::{Callback, CallbackAction, FireworksOptimizer, FwaIntermediate, FwaReport, RunState, TraceEntry};

/// Bare-bones FWA optimizer. Build it with [`BbfwaBuilder`].
pub struct Bbfwa<E> {
    driver: Driver<E>,
    config: BbfwaConfig,
    trace: Vec<TraceEntry>,
}

impl<E: Evaluator> Bbfwa<E> {
    pub fn config(&self) -> &BbfwaConfig {
        &self.config
    }

    pub fn problem(&self) -> &ProblemConfig {
        &self.driver.problem
    }

    /// Per-iteration snapshots of the firework
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    fn iterate(&mut self) -> Result<bool> {
        let sp_size = self.config.sp_size;
        if !self.driver.should_continue(sp_size) {
            return Ok(false);
        }
        let driver = &mut self.driver;
        let Some(pop) = driver.population.as_mut() else {
            return Ok(false);
        };
        let old_fits = pop.fitness.clone();

        let sparks = explode(pop, sp_size, &driver.problem, &mut driver.rng);
        let fitness = evaluate_checked(&mut driver.evaluator, &sparks, &mut driver.budget)?;
        let sparks = SparkSet::new(sparks, fitness, sp_size);

        select_elite(pop, &sparks, None);
        update_amplitudes(&mut pop.amplitudes, &old_fits, &pop.fitness);

        self.trace.push(TraceEntry {
            x: pop.position(0).to_owned(),
            fun: pop.fitness[0],
            amplitude: pop.amplitudes[0],
        });
        driver.complete_iteration(0);
        Ok(true)
    }
}

impl<E: Evaluator> FireworksOptimizer for Bbfwa<E> {
    fn set_callback(&mut self, callback: Callback) {
        self.driver.callback = Some(callback);
    }

    fn state(&self) -> RunState {
        self.driver.state
    }

    fn initialize(&mut self) -> Result<()> {
        let result = self.driver.initialize(1, self.config.init_amp);
        self.driver.guard(result)
    }

    fn step(&mut self) -> Result<bool> {
        self.initialize()?;
        let result = self.iterate();
        self.driver.guard(result)
    }

    fn population(&self) -> Option<&Population> {
        self.driver.population.as_ref()
    }

    fn iterations(&self) -> usize {
        self.driver.nit
    }

    fn evaluations(&self) -> usize {
        self.driver.budget.used()
    }

    fn best(&self) -> Option<(&Array1<f64>, f64)> {
        self.driver.best.as_ref().map(|(x, f)| (x, *f))
    }

    fn report(&self) -> FwaReport {
        self.driver.report(self.trace.clone())
    }
}

/// Fluent builder for [`Bbfwa`].
pub struct BbfwaBuilder<E> {
    evaluator: Option<E>,
    problem: ProblemConfig,
    config: BbfwaConfig,
    seed: Option<u64>,
    callback: Option<Callback>,
}

impl<E: Evaluator> Default for BbfwaBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> BbfwaBuilder<E> {
    pub fn new() -> Self {
        Self {
            evaluator: None,
            problem: ProblemConfig::default(),
            config: BbfwaConfig::default(),
            seed: None,
            callback: None,
        }
    }
    pub fn evaluator(mut self, v: E) -> Self {
        self.evaluator = Some(v);
        self
    }
    pub fn problem(mut self, v: ProblemConfig) -> Self {
        self.problem = v;
        self
    }
    pub fn config(mut self, v: BbfwaConfig) -> Self {
        self.config = v;
        self
    }
    pub fn dim(mut self, v: usize) -> Self {
        self.problem.dim = v;
        self
    }
    pub fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.problem.lower_bound = lower;
        self.problem.upper_bound = upper;
        self
    }
    pub fn max_iter(mut self, v: usize) -> Self {
        self.problem.max_iter = v;
        self
    }
    pub fn max_eval(mut self, v: usize) -> Self {
        self.problem.max_eval = v;
        self
    }
    pub fn sp_size(mut self, v: usize) -> Self {
        self.config.sp_size = v;
        self
    }
    pub fn init_amp(mut self, v: f64) -> Self {
        self.config.init_amp = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }
    pub fn callback(mut self, cb: Box<dyn FnMut(&FwaIntermediate) -> CallbackAction>) -> Self {
        self.callback = Some(cb);
        self
    }

    /// Validate the configuration and create the optimizer.
    ///
    /// Nothing is evaluated here; the population is sampled on the first
    /// `initialize`, `step` or `run`.
    pub fn build(self) -> Result<Bbfwa<E>> {
        let evaluator = self.evaluator.ok_or(FwaError::MissingEvaluator)?;
        self.problem.validate()?;
        self.config.validate()?;
        let max_iter = self.problem.max_iter;
        Ok(Bbfwa {
            driver: Driver::new("BBFWA", evaluator, self.problem, max_iter, self.seed, self.callback),
            config: self.config,
            trace: Vec::new(),
        })
    }
}
