use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use rand::Rng;

use crate::config::ProblemConfig;
use crate::init_random::sample_uniform;
use crate::population::Population;

/// Sparks of one iteration, grouped by the firework that produced them.
///
/// Rows `i * per_member .. (i + 1) * per_member` belong to firework `i`, in
/// generation order.
#[derive(Debug, Clone)]
pub struct SparkSet {
    pub sparks: Array2<f64>,
    pub fitness: Array1<f64>,
    per_member: usize,
}

impl SparkSet {
    pub fn new(sparks: Array2<f64>, fitness: Array1<f64>, per_member: usize) -> Self {
        debug_assert_eq!(sparks.nrows(), fitness.len());
        Self { sparks, fitness, per_member }
    }

    pub fn per_member(&self) -> usize {
        self.per_member
    }

    pub fn len(&self) -> usize {
        self.sparks.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn member_sparks(&self, i: usize) -> ArrayView2<'_, f64> {
        self.sparks.slice(s![i * self.per_member..(i + 1) * self.per_member, ..])
    }

    pub fn member_fitness(&self, i: usize) -> ArrayView1<'_, f64> {
        self.fitness.slice(s![i * self.per_member..(i + 1) * self.per_member])
    }
}

/// Generate `per_member` sparks around every firework.
///
/// Each coordinate is displaced by a uniform draw in `[-A, A]`, `A` being the
/// firework's own amplitude. Coordinates leaving the box are redrawn over the
/// whole range rather than clipped.
pub(crate) fn explode<R: Rng + ?Sized>(
    pop: &Population,
    per_member: usize,
    problem: &ProblemConfig,
    rng: &mut R,
) -> Array2<f64> {
    let dim = pop.dim();
    let mut sparks = Array2::<f64>::zeros((pop.len() * per_member, dim));
    for i in 0..pop.len() {
        let amp = pop.amplitudes[i];
        let center = pop.position(i);
        for k in 0..per_member {
            let mut spark = sparks.row_mut(i * per_member + k);
            for j in 0..dim {
                let u: f64 = rng.random::<f64>();
                let x = center[j] + amp * (2.0 * u - 1.0);
                spark[j] = map_into_bounds(x, problem, rng);
            }
        }
    }
    sparks
}

/// Keep `x` if it lies in `[lower_bound, upper_bound]`, otherwise redraw it.
pub(crate) fn map_into_bounds<R: Rng + ?Sized>(x: f64, problem: &ProblemConfig, rng: &mut R) -> f64 {
    if (problem.lower_bound..=problem.upper_bound).contains(&x) {
        x
    } else {
        sample_uniform(problem, rng)
    }
}
