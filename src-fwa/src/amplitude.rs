use ndarray::Array1;

/// Factor applied to the amplitude after a successful iteration
pub const AMP_EXPAND: f64 = 1.2;
/// Factor applied to the amplitude otherwise
pub const AMP_CONTRACT: f64 = 0.9;
/// Minimum fitness decrease counted as a success
pub const IMPROVEMENT_TOL: f64 = 1e-8;

/// Dynamic explosion amplitude of one firework.
///
/// Expands when the firework improved by more than [`IMPROVEMENT_TOL`],
/// contracts otherwise. The result never drops to zero.
pub fn update_amplitude(amplitude: f64, old_fit: f64, new_fit: f64) -> f64 {
    let next = if new_fit < old_fit - IMPROVEMENT_TOL {
        amplitude * AMP_EXPAND
    } else {
        amplitude * AMP_CONTRACT
    };
    next.max(f64::MIN_POSITIVE)
}

/// Apply [`update_amplitude`] to every firework independently.
pub(crate) fn update_amplitudes(amplitudes: &mut Array1<f64>, old_fits: &Array1<f64>, new_fits: &Array1<f64>) {
    for ((amp, &old), &new) in amplitudes.iter_mut().zip(old_fits.iter()).zip(new_fits.iter()) {
        *amp = update_amplitude(*amp, old, new);
    }
}
