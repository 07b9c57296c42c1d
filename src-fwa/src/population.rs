use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Fireworks maintained across iterations.
///
/// Row `i` of `positions`, `fitness[i]` and `amplitudes[i]` describe the same
/// firework. The number of rows never changes during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub positions: Array2<f64>,
    pub fitness: Array1<f64>,
    pub amplitudes: Array1<f64>,
}

impl Population {
    pub fn new(positions: Array2<f64>, fitness: Array1<f64>, init_amp: f64) -> Self {
        let amplitudes = Array1::from_elem(positions.nrows(), init_amp);
        Self { positions, fitness, amplitudes }
    }

    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim(&self) -> usize {
        self.positions.ncols()
    }

    pub fn position(&self, i: usize) -> ArrayView1<'_, f64> {
        self.positions.row(i)
    }

    /// Index and fitness of the best firework, first one on ties
    pub fn best(&self) -> (usize, f64) {
        argmin(&self.fitness)
    }
}

pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_best_prefers_first_on_ties() {
        let pop = Population::new(
            array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]],
            array![3.0, 1.0, 1.0],
            2.0,
        );
        assert_eq!(pop.best(), (1, 1.0));
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.dim(), 2);
        assert_eq!(pop.amplitudes.to_vec(), vec![2.0; 3]);
        assert_eq!(pop.position(2).to_vec(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_population_snapshot_json() {
        let pop = Population::new(array![[0.5, -1.0], [2.0, 3.0]], array![1.25, 13.0], 0.5);
        let json = serde_json::to_string(&pop).unwrap();
        let back: Population = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pop);
        assert_eq!(back.dim(), 2);
    }
}
