use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::{Callback, CallbackAction, FwaIntermediate};

/// Records optimization progress via the per-iteration callback
#[derive(Debug, Clone)]
pub struct OptimizationRecorder {
    /// Function name (used for CSV filename)
    function_name: String,
    /// Shared records storage
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
}

/// A single optimization iteration record
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    /// Iteration number
    pub iteration: usize,
    /// Best x found so far
    pub x: Vec<f64>,
    /// Best function result so far
    pub best_result: f64,
    /// Amplitude of the best firework
    pub amplitude: f64,
    /// Evaluations spent so far
    pub evaluations: usize,
    /// Whether this iteration improved the best known result
    pub is_improvement: bool,
}

fn lock(records: &Mutex<Vec<OptimizationRecord>>) -> MutexGuard<'_, Vec<OptimizationRecord>> {
    records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl OptimizationRecorder {
    /// Create a new optimization recorder for the given function
    pub fn new(function_name: impl Into<String>) -> Self {
        Self { function_name: function_name.into(), records: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Create a callback function that records optimization progress
    pub fn create_callback(&self) -> Callback {
        let records = self.records.clone();
        Box::new(move |intermediate: &FwaIntermediate| -> CallbackAction {
            let mut guard = lock(&records);
            let is_improvement = match guard.last() {
                Some(prev) => intermediate.fun < prev.best_result,
                None => true,
            };
            guard.push(OptimizationRecord {
                iteration: intermediate.iter,
                x: intermediate.x.to_vec(),
                best_result: intermediate.fun,
                amplitude: intermediate.amplitude,
                evaluations: intermediate.nfev,
                is_improvement,
            });
            CallbackAction::Continue
        })
    }

    /// Save all recorded iterations to `<output_dir>/<function_name>.csv`
    pub fn save_to_csv(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        create_dir_all(output_dir)?;
        let filename = output_dir.join(format!("{}.csv", self.function_name));
        let mut writer = csv::Writer::from_path(&filename)?;

        let records = lock(&self.records);
        let Some(first) = records.first() else {
            writer.flush()?;
            return Ok(filename);
        };

        let mut header = vec!["iteration".to_string()];
        header.extend((0..first.x.len()).map(|i| format!("x{}", i)));
        header.extend(["best_result", "amplitude", "evaluations", "is_improvement"].map(String::from));
        writer.write_record(&header)?;

        for record in records.iter() {
            let mut row = vec![record.iteration.to_string()];
            row.extend(record.x.iter().map(|xi| format!("{:.16}", xi)));
            row.push(format!("{:.16}", record.best_result));
            row.push(format!("{:.16}", record.amplitude));
            row.push(record.evaluations.to_string());
            row.push(record.is_improvement.to_string());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(filename)
    }

    /// Get a copy of all recorded iterations
    pub fn get_records(&self) -> Vec<OptimizationRecord> {
        lock(&self.records).clone()
    }

    pub fn num_iterations(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
    }

    /// Get the final best solution if any iterations were recorded
    pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
        lock(&self.records).last().map(|r| (r.x.clone(), r.best_result))
    }
}
