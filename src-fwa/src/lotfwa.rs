//! Loser-out tournament fireworks algorithm.
//!
//! `fw_size` fireworks each explode `floor(sp_size / fw_size)` sparks with
//! their own amplitude. Every firework also emits one guided spark that moves
//! along the contrast between its best and worst sparks. After elitist
//! selection, fireworks that cannot catch the best one in the remaining
//! iterations are restarted from a uniform sample.
//!
//! The iteration cap is tightened to what the evaluation budget can pay for
//! at nominal cost: `min(max_iter, floor(max_eval / (sp_size + fw_size)))`.

use log::trace;
use ndarray::Array1;

use crate::amplitude::update_amplitudes;
use crate::config::{LotfwaConfig, ProblemConfig};
use crate::driver::Driver;
use crate::error::{FwaError, Result};
use crate::evaluator::{Evaluator, evaluate_checked};
use crate::explode::{SparkSet, explode};
use crate::guided_mutation::guided_mutation;
use crate::population::Population;
use crate::restart::{flag_losers, restart_losers};
use crate::select_elite::select_elite;
use crate::{Callback, CallbackAction, FireworksOptimizer, FwaIntermediate, FwaReport, RunState};

/// LoTFWA optimizer. Build it with [`LotfwaBuilder`].
pub struct Lotfwa<E> {
    driver: Driver<E>,
    config: LotfwaConfig,
}

impl<E: Evaluator> Lotfwa<E> {
    pub fn config(&self) -> &LotfwaConfig {
        &self.config
    }

    pub fn problem(&self) -> &ProblemConfig {
        &self.driver.problem
    }

    /// Iteration cap after budget derivation
    pub fn max_iter(&self) -> usize {
        self.driver.max_iter
    }

    /// Evaluations spent by one iteration without restarts
    pub fn iteration_cost(&self) -> usize {
        self.config.sparks_per_firework() * self.config.fw_size + self.config.fw_size
    }

    fn iterate(&mut self) -> Result<bool> {
        let cost = self.iteration_cost();
        if !self.driver.should_continue(cost) {
            return Ok(false);
        }
        let per_member = self.config.sparks_per_firework();
        let group_size = self.config.mutation_group_size();
        let init_amp = self.config.init_amp;

        let driver = &mut self.driver;
        let Some(pop) = driver.population.as_mut() else {
            return Ok(false);
        };
        let old_fits = pop.fitness.clone();

        // explosion
        let sparks = explode(pop, per_member, &driver.problem, &mut driver.rng);
        let fitness = evaluate_checked(&mut driver.evaluator, &sparks, &mut driver.budget)?;
        let sparks = SparkSet::new(sparks, fitness, per_member);

        // guided mutation
        let mutants = guided_mutation(pop, &sparks, group_size, &driver.problem, &mut driver.rng);
        let m_fits = evaluate_checked(&mut driver.evaluator, &mutants, &mut driver.budget)?;

        select_elite(pop, &sparks, Some((&mutants, &m_fits)));

        // loser elimination
        let remaining = driver.max_iter.saturating_sub(driver.nit);
        let flagged = flag_losers(&old_fits, &pop.fitness, remaining);
        if !flagged.is_empty() {
            trace!("iter {}: restart candidates {:?}", driver.nit + 1, flagged);
        }
        let restarted = restart_losers(
            pop,
            &flagged,
            &driver.problem,
            init_amp,
            &mut driver.evaluator,
            &mut driver.budget,
            &mut driver.rng,
        )?;

        update_amplitudes(&mut pop.amplitudes, &old_fits, &pop.fitness);

        driver.complete_iteration(restarted);
        Ok(true)
    }
}

impl<E: Evaluator> FireworksOptimizer for Lotfwa<E> {
    fn set_callback(&mut self, callback: Callback) {
        self.driver.callback = Some(callback);
    }

    fn state(&self) -> RunState {
        self.driver.state
    }

    fn initialize(&mut self) -> Result<()> {
        let result = self.driver.initialize(self.config.fw_size, self.config.init_amp);
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
        self.driver.report(Vec::new())
    }
}

/// Fluent builder for [`Lotfwa`].
pub struct LotfwaBuilder<E> {
    evaluator: Option<E>,
    problem: ProblemConfig,
    config: LotfwaConfig,
    seed: Option<u64>,
    callback: Option<Callback>,
}

impl<E: Evaluator> Default for LotfwaBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> LotfwaBuilder<E> {
    pub fn new() -> Self {
        Self {
            evaluator: None,
            problem: ProblemConfig::default(),
            config: LotfwaConfig::default(),
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
    pub fn config(mut self, v: LotfwaConfig) -> Self {
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
    pub fn fw_size(mut self, v: usize) -> Self {
        self.config.fw_size = v;
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
    pub fn gm_ratio(mut self, v: f64) -> Self {
        self.config.gm_ratio = v;
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

    /// Validate the configuration, derive the iteration cap and create the
    /// optimizer. Nothing is evaluated here.
    pub fn build(self) -> Result<Lotfwa<E>> {
        let evaluator = self.evaluator.ok_or(FwaError::MissingEvaluator)?;
        self.problem.validate()?;
        self.config.validate()?;
        if self.problem.max_eval < self.config.fw_size {
            return Err(FwaError::BudgetTooSmall {
                max_eval: self.problem.max_eval,
                population: self.config.fw_size,
            });
        }
        let max_iter = self.config.derived_max_iter(&self.problem);
        Ok(Lotfwa {
            driver: Driver::new("LoTFWA", evaluator, self.problem, max_iter, self.seed, self.callback),
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::pointwise;

    fn sphere(x: &Array1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    #[test]
    fn test_max_iter_is_derived_from_budget() {
        let opt = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .max_iter(10000)
            .max_eval(20000)
            .build()
            .unwrap();
        assert_eq!(opt.max_iter(), 65);
        assert_eq!(opt.iteration_cost(), 305);

        let opt = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .max_iter(3)
            .max_eval(20000)
            .build()
            .unwrap();
        assert_eq!(opt.max_iter(), 3);
    }

    #[test]
    fn test_invalid_gm_ratio_fails_before_evaluation() {
        let err = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .gm_ratio(0.75)
            .build()
            .err()
            .unwrap();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_budget_must_cover_initial_population() {
        let err = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .max_eval(4)
            .fw_size(5)
            .sp_size(50)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, FwaError::BudgetTooSmall { max_eval: 4, population: 5 }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_population_size_is_constant() {
        let mut opt = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .dim(4)
            .bounds(-20.0, 20.0)
            .max_eval(5000)
            .fw_size(4)
            .sp_size(40)
            .init_amp(10.0)
            .seed(17)
            .build()
            .unwrap();
        opt.initialize().unwrap();
        assert_eq!(opt.population().unwrap().len(), 4);
        while opt.step().unwrap() {
            let pop = opt.population().unwrap();
            assert_eq!(pop.len(), 4);
            assert_eq!(pop.amplitudes.len(), 4);
            assert!(pop.amplitudes.iter().all(|&a| a > 0.0));
        }
        assert_eq!(opt.state(), RunState::Terminated);
    }

    #[test]
    fn test_uneven_spark_split_counts_actual_evaluations() {
        // 50 sparks over 3 fireworks: 16 each, 48 explosion + 3 guided per iteration.
        let opt = LotfwaBuilder::new()
            .evaluator(pointwise(sphere))
            .max_iter(4)
            .max_eval(100_000)
            .fw_size(3)
            .sp_size(50)
            .gm_ratio(0.25)
            .seed(2)
            .build()
            .unwrap();
        let report = opt.run().unwrap();
        assert_eq!(report.nit, 4);
        assert_eq!(report.nfev, 3 + 4 * 51 + report.restarts);
        assert!(report.trace.is_empty());
    }
}
