use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::{FireworksOptimizer, FwaReport, OptimizationRecorder};

/// Helper function for running a fireworks optimizer with recording.
///
/// Installs an [`OptimizationRecorder`] as the optimizer's callback, runs it
/// to termination and writes `<output_dir>/<function_name>.csv`.
pub fn run_recorded<O>(
    function_name: &str,
    mut optimizer: O,
    output_dir: impl AsRef<Path>,
) -> Result<(FwaReport, PathBuf)>
where
    O: FireworksOptimizer,
{
    let recorder = OptimizationRecorder::new(function_name);
    optimizer.set_callback(recorder.create_callback());

    let report = optimizer.run()?;
    let csv_path = recorder.save_to_csv(output_dir)?;

    Ok((report, csv_path))
}
