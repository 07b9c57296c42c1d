use ndarray::Array2;
use rand::Rng;

use crate::config::ProblemConfig;

/// Uniform sample of `n` points over the full bound range.
pub(crate) fn init_random<R: Rng + ?Sized>(
    n: usize,
    problem: &ProblemConfig,
    rng: &mut R,
) -> Array2<f64> {
    let mut pop = Array2::<f64>::zeros((n, problem.dim));
    for x in pop.iter_mut() {
        *x = sample_uniform(problem, rng);
    }
    pop
}

/// One coordinate drawn from `[lower_bound, upper_bound)`
pub(crate) fn sample_uniform<R: Rng + ?Sized>(problem: &ProblemConfig, rng: &mut R) -> f64 {
    let u: f64 = rng.random::<f64>();
    problem.lower_bound + u * problem.span()
}
