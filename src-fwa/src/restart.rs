//! Loser elimination.
//!
//! A firework that improved this iteration is judged hopeless when even
//! repeating its latest improvement on every remaining iteration would not
//! bring it level with the current best. Such fireworks are thrown away and
//! resampled uniformly over the box.

use log::trace;
use ndarray::Array1;
use rand::Rng;

use crate::budget::EvaluationBudget;
use crate::config::ProblemConfig;
use crate::error::Result;
use crate::evaluator::{Evaluator, evaluate_checked};
use crate::init_random::init_random;
use crate::population::Population;

/// Restart predicate:
/// `improvement > 0 && improvement * remaining_iterations < new_fit - global_min`.
///
/// With `remaining_iterations == 0` any firework that improved but is not the
/// best gets restarted, however small its gap.
pub fn should_restart(old_fit: f64, new_fit: f64, remaining_iterations: usize, global_min: f64) -> bool {
    let improvement = old_fit - new_fit;
    improvement > 0.0 && improvement * (remaining_iterations as f64) < new_fit - global_min
}

/// Indices of the fireworks to restart, in population order.
pub fn flag_losers(old_fits: &Array1<f64>, new_fits: &Array1<f64>, remaining_iterations: usize) -> Vec<usize> {
    let global_min = new_fits.iter().copied().fold(f64::INFINITY, f64::min);
    old_fits
        .iter()
        .zip(new_fits.iter())
        .enumerate()
        .filter(|&(_, (&old, &new))| should_restart(old, new, remaining_iterations, global_min))
        .map(|(i, _)| i)
        .collect()
}

/// Resample and re-evaluate the flagged fireworks, resetting their amplitude.
///
/// Each restart costs one evaluation; flagged fireworks beyond what the budget
/// can still pay for are left untouched. Returns the number restarted.
pub(crate) fn restart_losers<E, R>(
    pop: &mut Population,
    flagged: &[usize],
    problem: &ProblemConfig,
    init_amp: f64,
    evaluator: &mut E,
    budget: &mut EvaluationBudget,
    rng: &mut R,
) -> Result<usize>
where
    E: Evaluator + ?Sized,
    R: Rng + ?Sized,
{
    let affordable = flagged.len().min(budget.remaining());
    if affordable < flagged.len() {
        trace!(
            "restart capped by budget: {} flagged, {} affordable",
            flagged.len(),
            affordable
        );
    }
    let chosen = &flagged[..affordable];
    if chosen.is_empty() {
        return Ok(0);
    }

    let samples = init_random(chosen.len(), problem, rng);
    let fits = evaluate_checked(evaluator, &samples, budget)?;
    for (k, &i) in chosen.iter().enumerate() {
        trace!("restart firework {}: {:.6e} -> {:.6e}", i, pop.fitness[i], fits[k]);
        pop.positions.row_mut(i).assign(&samples.row(k));
        pop.fitness[i] = fits[k];
        pop.amplitudes[i] = init_amp;
    }
    Ok(chosen.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::pointwise;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_should_restart_predicate() {
        // improved by 1, 10 iterations left, 20 behind the best -> hopeless
        assert!(should_restart(31.0, 30.0, 10, 10.0));
        // improved by 1, 10 iterations left, 5 behind the best -> keep
        assert!(!should_restart(16.0, 15.0, 10, 10.0));
        // no improvement never restarts
        assert!(!should_restart(30.0, 30.0, 10, 10.0));
        assert!(!should_restart(29.0, 30.0, 10, 10.0));
        // the best firework has no gap to close
        assert!(!should_restart(12.0, 10.0, 0, 10.0));
    }

    #[test]
    fn test_should_restart_with_no_iterations_left() {
        assert!(should_restart(10.0 + 1e-3, 10.0, 0, 10.0 - 1e-12));
    }

    #[test]
    fn test_should_restart_is_pure() {
        let first = should_restart(7.5, 7.0, 3, 1.0);
        for _ in 0..10 {
            assert_eq!(should_restart(7.5, 7.0, 3, 1.0), first);
        }
    }

    #[test]
    fn test_flag_losers() {
        let old = array![5.0, 31.0, 16.0, 40.0];
        let new = array![4.0, 30.0, 15.0, 40.0];
        // global min = 4; gaps 0, 26, 11, 36; improvements 1, 1, 1, 0
        assert_eq!(flag_losers(&old, &new, 20), vec![1]);
        assert_eq!(flag_losers(&old, &new, 5), vec![1, 2]);
    }

    #[test]
    fn test_restart_losers_resets_members() {
        let problem =
            ProblemConfig { dim: 2, lower_bound: -1.0, upper_bound: 1.0, ..ProblemConfig::default() };
        let mut pop = Population::new(array![[0.0, 0.0], [0.5, 0.5], [0.9, 0.9]], array![0.0, 0.5, 1.62], 0.01);
        let mut eval = pointwise(|x: &Array1<f64>| x.iter().map(|&xi| xi * xi).sum());
        let mut budget = EvaluationBudget::new(100);
        let mut rng = StdRng::seed_from_u64(4);

        let n = restart_losers(&mut pop, &[2], &problem, 0.7, &mut eval, &mut budget, &mut rng).unwrap();
        assert_eq!(n, 1);
        assert_eq!(budget.used(), 1);
        assert_eq!(pop.amplitudes.to_vec(), vec![0.01, 0.01, 0.7]);
        let x = pop.position(2);
        assert!((pop.fitness[2] - (x[0] * x[0] + x[1] * x[1])).abs() < 1e-12);
        assert_eq!(pop.position(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_restart_losers_respects_budget() {
        let problem = ProblemConfig { dim: 1, ..ProblemConfig::default() };
        let mut pop = Population::new(array![[1.0], [2.0], [3.0]], array![1.0, 2.0, 3.0], 1.0);
        let mut eval = pointwise(|x: &Array1<f64>| x[0].abs());
        let mut budget = EvaluationBudget::new(1);
        let mut rng = StdRng::seed_from_u64(4);

        let n = restart_losers(&mut pop, &[1, 2], &problem, 5.0, &mut eval, &mut budget, &mut rng).unwrap();
        assert_eq!(n, 1);
        assert_eq!(budget.used(), 1);
        assert_eq!(pop.amplitudes.to_vec(), vec![1.0, 5.0, 1.0]);
        assert_eq!(pop.position(2).to_vec(), vec![3.0]);
    }
}
