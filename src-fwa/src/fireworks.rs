use ndarray::Array1;

use crate::bbfwa::BbfwaBuilder;
use crate::config::{BbfwaConfig, LotfwaConfig, ProblemConfig};
use crate::error::Result;
use crate::evaluator::pointwise;
use crate::lotfwa::LotfwaBuilder;
use crate::{FireworksOptimizer, FwaReport};

/// Minimise `func` with the bare-bones FWA:
/// - `func`: objective function mapping x -> f(x)
/// - `problem`: dimension, bounds and budgets
/// - `config`: spark pool size and initial amplitude
/// - `seed`: random seed; `None` draws one and reports it
pub fn bbfwa<F>(func: F, problem: ProblemConfig, config: BbfwaConfig, seed: Option<u64>) -> Result<FwaReport>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let mut builder = BbfwaBuilder::new().evaluator(pointwise(func)).problem(problem).config(config);
    if let Some(s) = seed {
        builder = builder.seed(s);
    }
    builder.build()?.run()
}

/// Minimise `func` with LoTFWA; see [`bbfwa`] for the arguments.
pub fn lotfwa<F>(func: F, problem: ProblemConfig, config: LotfwaConfig, seed: Option<u64>) -> Result<FwaReport>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let mut builder = LotfwaBuilder::new().evaluator(pointwise(func)).problem(problem).config(config);
    if let Some(s) = seed {
        builder = builder.seed(s);
    }
    builder.build()?.run()
}
