use ndarray::{Array1, Array2};

use crate::explode::SparkSet;
use crate::population::Population;

/// Elitist replacement, firework by firework.
///
/// Candidates are scanned in a fixed order: current position, its sparks in
/// generation order, then its guided spark. The first minimum wins, so a
/// firework only moves on a strict improvement and never gets worse.
pub(crate) fn select_elite(
    pop: &mut Population,
    sparks: &SparkSet,
    mutants: Option<(&Array2<f64>, &Array1<f64>)>,
) {
    for i in 0..pop.len() {
        let mut best_f = pop.fitness[i];
        let mut winner: Option<Array1<f64>> = None;

        let member_fitness = sparks.member_fitness(i);
        let mut best_spark = None;
        for (k, &f) in member_fitness.iter().enumerate() {
            if f < best_f {
                best_f = f;
                best_spark = Some(k);
            }
        }
        if let Some(k) = best_spark {
            winner = Some(sparks.member_sparks(i).row(k).to_owned());
        }

        if let Some((m_sparks, m_fits)) = mutants {
            if m_fits[i] < best_f {
                best_f = m_fits[i];
                winner = Some(m_sparks.row(i).to_owned());
            }
        }

        if let Some(x) = winner {
            pop.positions.row_mut(i).assign(&x);
            pop.fitness[i] = best_f;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn population() -> Population {
        Population::new(array![[0.0], [10.0]], array![5.0, 1.0], 1.0)
    }

    #[test]
    fn test_select_best_spark() {
        let mut pop = population();
        let sparks = SparkSet::new(array![[1.0], [2.0], [11.0], [12.0]], array![4.0, 3.0, 2.0, 1.5], 2);
        select_elite(&mut pop, &sparks, None);
        assert_eq!(pop.positions.column(0).to_vec(), vec![2.0, 10.0]);
        assert_eq!(pop.fitness.to_vec(), vec![3.0, 1.0]);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let mut pop = population();
        // Spark ties with the current position: the firework stays put.
        // Two sparks tie with each other: the earlier one wins.
        let sparks = SparkSet::new(array![[1.0], [2.0], [11.0], [12.0]], array![5.0, 5.0, 0.5, 0.5], 2);
        let mutants = array![[3.0], [13.0]];
        let m_fits = array![5.0, 0.5];
        select_elite(&mut pop, &sparks, Some((&mutants, &m_fits)));
        assert_eq!(pop.positions.column(0).to_vec(), vec![0.0, 11.0]);
        assert_eq!(pop.fitness.to_vec(), vec![5.0, 0.5]);
    }

    #[test]
    fn test_mutant_can_win() {
        let mut pop = population();
        let sparks = SparkSet::new(array![[1.0], [2.0], [11.0], [12.0]], array![4.0, 6.0, 3.0, 2.0], 2);
        let mutants = array![[-1.0], [9.0]];
        let m_fits = array![0.1, 7.0];
        select_elite(&mut pop, &sparks, Some((&mutants, &m_fits)));
        assert_eq!(pop.positions.column(0).to_vec(), vec![-1.0, 10.0]);
        assert_eq!(pop.fitness.to_vec(), vec![0.1, 1.0]);
    }
}
