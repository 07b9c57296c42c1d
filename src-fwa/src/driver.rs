//! Iteration skeleton shared by both variants.
//!
//! The driver owns everything that is not specific to a variant: the
//! evaluator, the random generator, the population, the counters, the best
//! solution and the lifecycle state. Variants borrow its fields to run their
//! operator pipeline and call [`Driver::complete_iteration`] at the end.

use std::time::Instant;

use log::{debug, info, trace, warn};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::budget::{EvaluationBudget, Termination, check_termination};
use crate::config::ProblemConfig;
use crate::error::{FwaError, Result};
use crate::evaluator::{Evaluator, evaluate_checked};
use crate::init_random::init_random;
use crate::population::Population;
use crate::{Callback, CallbackAction, FwaIntermediate, FwaReport, RunState, TraceEntry};

pub struct Driver<E> {
    pub(crate) name: &'static str,
    pub(crate) evaluator: E,
    pub(crate) problem: ProblemConfig,
    pub(crate) max_iter: usize,
    pub(crate) seed: u64,
    pub(crate) rng: StdRng,
    pub(crate) budget: EvaluationBudget,
    pub(crate) nit: usize,
    pub(crate) restarts: usize,
    pub(crate) state: RunState,
    pub(crate) population: Option<Population>,
    pub(crate) best: Option<(Array1<f64>, f64)>,
    pub(crate) callback: Option<Callback>,
    pub(crate) termination: Option<Termination>,
    failure: Option<String>,
    started: Option<Instant>,
}

impl<E: Evaluator> Driver<E> {
    pub(crate) fn new(
        name: &'static str,
        evaluator: E,
        problem: ProblemConfig,
        max_iter: usize,
        seed: Option<u64>,
        callback: Option<Callback>,
    ) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
        let budget = EvaluationBudget::new(problem.max_eval);
        Self {
            name,
            evaluator,
            problem,
            max_iter,
            seed,
            rng: StdRng::seed_from_u64(seed),
            budget,
            nit: 0,
            restarts: 0,
            state: RunState::Initialized,
            population: None,
            best: None,
            callback,
            termination: None,
            failure: None,
            started: None,
        }
    }

    /// Sample `size` fireworks uniformly and evaluate them in one batch.
    pub(crate) fn initialize(&mut self, size: usize, init_amp: f64) -> Result<()> {
        if self.state != RunState::Initialized {
            return Ok(());
        }
        info!(
            "{} init: {} fireworks, dim={}, bounds=[{}, {}], max_iter={}, max_eval={}, seed={}",
            self.name,
            size,
            self.problem.dim,
            self.problem.lower_bound,
            self.problem.upper_bound,
            self.max_iter,
            self.problem.max_eval,
            self.seed
        );
        self.started = Some(Instant::now());
        let positions = init_random(size, &self.problem, &mut self.rng);
        let fitness = evaluate_checked(&mut self.evaluator, &positions, &mut self.budget)?;
        let pop = Population::new(positions, fitness, init_amp);
        let (best_idx, best_f) = pop.best();
        self.best = Some((pop.position(best_idx).to_owned(), best_f));
        self.population = Some(pop);
        self.state = RunState::Running;
        debug!("{} iter {:4}  best_f={:.6e}  nfev={}", self.name, 0, best_f, self.budget.used());
        Ok(())
    }

    /// Termination check run before each iteration.
    ///
    /// Moves the run to `Terminated` and returns `false` when it must stop.
    pub(crate) fn should_continue(&mut self, iteration_cost: usize) -> bool {
        if self.state == RunState::Terminated {
            return false;
        }
        match check_termination(self.nit, self.max_iter, &self.budget, iteration_cost) {
            Some(reason) => {
                self.terminate(reason);
                false
            }
            None => true,
        }
    }

    fn terminate(&mut self, reason: Termination) {
        self.state = RunState::Terminated;
        self.termination = Some(reason);
        info!(
            "{} finished: {} (nit={}, nfev={}, best_f={:.6e})",
            self.name,
            reason,
            self.nit,
            self.budget.used(),
            self.best.as_ref().map_or(f64::NAN, |(_, f)| *f)
        );
    }

    /// Abort the run after a fatal evaluation error.
    ///
    /// A half-applied iteration is never resumed: the run moves to
    /// `Terminated` and the error text is kept for the report.
    pub(crate) fn fail(&mut self, err: &FwaError) {
        warn!("{} aborted after {} iterations: {}", self.name, self.nit, err);
        self.failure = Some(err.to_string());
        self.state = RunState::Terminated;
        self.termination = Some(Termination::EvaluationFailed);
    }

    /// Pass `result` through, aborting the run if it is an error.
    pub(crate) fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    /// Book-keeping at the end of an iteration: counters, best solution,
    /// logging and callback.
    pub(crate) fn complete_iteration(&mut self, restarted: usize) {
        self.nit += 1;
        self.restarts += restarted;

        let Some(pop) = self.population.as_ref() else {
            return;
        };
        let (best_idx, best_f) = pop.best();
        let best_x = pop.position(best_idx).to_owned();
        let amplitude = pop.amplitudes[best_idx];
        debug!(
            "{} iter {:4}  best_f={:.6e}  amp={:.3e}  nfev={}  restarts={}",
            self.name,
            self.nit,
            best_f,
            amplitude,
            self.budget.used(),
            restarted
        );
        if let Some(started) = self.started {
            trace!("{} iter {:4}  elapsed={:?}", self.name, self.nit, started.elapsed());
        }
        self.best = Some((best_x.clone(), best_f));

        let intermediate = FwaIntermediate {
            x: best_x,
            fun: best_f,
            amplitude,
            iter: self.nit,
            nfev: self.budget.used(),
            restarts: restarted,
        };
        let action = self.callback.as_mut().map(|cb| cb(&intermediate));
        if let Some(CallbackAction::Stop) = action {
            self.terminate(Termination::Callback);
        }
    }

    pub(crate) fn report(&self, trace: Vec<TraceEntry>) -> FwaReport {
        let (x, fun) = match &self.best {
            Some((x, f)) => (x.clone(), *f),
            None => (Array1::zeros(self.problem.dim), f64::INFINITY),
        };
        let (population, population_fitness, amplitudes) = match &self.population {
            Some(pop) => (pop.positions.clone(), pop.fitness.clone(), pop.amplitudes.clone()),
            None => Default::default(),
        };
        let message = match (self.termination, &self.failure) {
            (Some(reason), Some(failure)) => format!("{}: {}", reason, failure),
            (Some(reason), None) => reason.to_string(),
            (None, _) if self.state == RunState::Initialized => "Not started".to_string(),
            (None, _) => format!("Running after {} iterations", self.nit),
        };
        FwaReport {
            x,
            fun,
            message,
            termination: self.termination,
            nit: self.nit,
            nfev: self.budget.used(),
            restarts: self.restarts,
            seed: self.seed,
            elapsed: self.started.map(|t| t.elapsed()).unwrap_or_default(),
            population,
            population_fitness,
            amplitudes,
            trace,
        }
    }
}
