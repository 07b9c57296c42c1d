use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use crate::config::ProblemConfig;
use crate::explode::{SparkSet, map_into_bounds};
use crate::population::Population;

/// One guided spark per firework.
///
/// For firework `i` its own sparks are ranked by fitness; the mean of the
/// `group_size` worst is subtracted from the mean of the `group_size` best and
/// the difference is added to the firework's position. Coordinates that land
/// outside the box follow the same redraw rule as explosion.
pub(crate) fn guided_mutation<R: Rng + ?Sized>(
    pop: &Population,
    sparks: &SparkSet,
    group_size: usize,
    problem: &ProblemConfig,
    rng: &mut R,
) -> Array2<f64> {
    let mut mutants = Array2::<f64>::zeros((pop.len(), pop.dim()));
    for i in 0..pop.len() {
        let delta = guide_vector(sparks.member_sparks(i), sparks.member_fitness(i), group_size);
        let center = pop.position(i);
        let mut mutant = mutants.row_mut(i);
        for j in 0..pop.dim() {
            mutant[j] = map_into_bounds(center[j] + delta[j], problem, rng);
        }
    }
    mutants
}

/// `mean(best group) - mean(worst group)`, coordinate-wise.
///
/// Ranking is a stable sort on fitness, so equal fitness keeps generation order.
pub(crate) fn guide_vector(
    sparks: ArrayView2<'_, f64>,
    fitness: ArrayView1<'_, f64>,
    group_size: usize,
) -> Array1<f64> {
    let n = fitness.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

    let mut delta = Array1::<f64>::zeros(sparks.ncols());
    if group_size == 0 || group_size > n {
        return delta;
    }
    let weight = 1.0 / group_size as f64;
    for &best in &order[..group_size] {
        delta.scaled_add(weight, &sparks.row(best));
    }
    for &worst in &order[n - group_size..] {
        delta.scaled_add(-weight, &sparks.row(worst));
    }
    delta
}
