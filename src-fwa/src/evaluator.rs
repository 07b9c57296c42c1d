use ndarray::{Array1, Array2};

use crate::budget::EvaluationBudget;
use crate::error::{BoxError, FwaError, Result};

/// Batched objective function.
///
/// `evaluate` receives one point per row and must return one fitness per row,
/// in the same order. Lower is better. Every operator submits its points in a
/// single call so an implementation is free to vectorise internally.
pub trait Evaluator {
    fn evaluate(&mut self, points: &Array2<f64>) -> std::result::Result<Array1<f64>, BoxError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &mut E {
    fn evaluate(&mut self, points: &Array2<f64>) -> std::result::Result<Array1<f64>, BoxError> {
        (**self).evaluate(points)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, points: &Array2<f64>) -> std::result::Result<Array1<f64>, BoxError> {
        (**self).evaluate(points)
    }
}

/// Adapts an infallible per-point objective `f(x) -> f64`.
#[derive(Debug, Clone)]
pub struct Pointwise<F> {
    func: F,
}

/// Wrap a per-point objective such as the functions in `fwa_testfunctions`
pub fn pointwise<F>(func: F) -> Pointwise<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    Pointwise { func }
}

impl<F> Evaluator for Pointwise<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    fn evaluate(&mut self, points: &Array2<f64>) -> std::result::Result<Array1<f64>, BoxError> {
        Ok(Array1::from_iter(points.rows().into_iter().map(|row| (self.func)(&row.to_owned()))))
    }
}

/// Adapts a fallible batch closure.
#[derive(Debug, Clone)]
pub struct Batch<F> {
    func: F,
}

/// Wrap a closure evaluating a whole batch of points at once
pub fn batch<F>(func: F) -> Batch<F>
where
    F: FnMut(&Array2<f64>) -> std::result::Result<Array1<f64>, BoxError>,
{
    Batch { func }
}

impl<F> Evaluator for Batch<F>
where
    F: FnMut(&Array2<f64>) -> std::result::Result<Array1<f64>, BoxError>,
{
    fn evaluate(&mut self, points: &Array2<f64>) -> std::result::Result<Array1<f64>, BoxError> {
        (self.func)(points)
    }
}

/// Evaluate `points`, enforce the evaluator contract and charge the budget.
///
/// The budget is charged with the number of rows submitted, once the evaluator
/// has answered; a failed call aborts the run so it is never charged.
pub(crate) fn evaluate_checked<E: Evaluator + ?Sized>(
    evaluator: &mut E,
    points: &Array2<f64>,
    budget: &mut EvaluationBudget,
) -> Result<Array1<f64>> {
    let expected = points.nrows();
    if expected == 0 {
        return Ok(Array1::zeros(0));
    }
    let fitness = evaluator.evaluate(points).map_err(FwaError::EvaluatorFailed)?;
    if fitness.len() != expected {
        return Err(FwaError::EvaluationLengthMismatch { expected, got: fitness.len() });
    }
    if let Some((index, &value)) = fitness.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(FwaError::NonFiniteFitness { index, value });
    }
    budget.charge(expected);
    Ok(fitness)
}
