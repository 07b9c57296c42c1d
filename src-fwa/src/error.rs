//! Error types for the fireworks optimizers.
//!
//! Two families matter to callers: configuration errors, raised by the
//! builders before any evaluation happens, and evaluation errors, raised when
//! the objective breaks its contract mid-run. Both abort the run.

use thiserror::Error;

/// Boxed error returned by an [`Evaluator`](crate::Evaluator).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running a fireworks optimizer.
#[derive(Debug, Error)]
pub enum FwaError {
    /// No objective function was supplied to the builder.
    #[error("missing evaluator: an objective function must be supplied before build()")]
    MissingEvaluator,

    /// The search space has no dimensions.
    #[error("dimension must be positive, got {dim}")]
    InvalidDimension {
        /// The rejected dimension
        dim: usize,
    },

    /// Bounds are not finite or `lower >= upper`.
    #[error("invalid bounds: lower ({lower}) must be finite and < upper ({upper})")]
    InvalidBounds {
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// `max_iter` or `max_eval` is zero.
    #[error("{name} must be positive")]
    NonPositiveBudget {
        /// Name of the offending option
        name: &'static str,
    },

    /// The evaluation budget cannot pay for the initial population.
    #[error("max_eval ({max_eval}) is smaller than the initial population ({population})")]
    BudgetTooSmall {
        /// Configured evaluation cap
        max_eval: usize,
        /// Points evaluated at initialization
        population: usize,
    },

    /// Guided mutation ratio outside `(0, 0.5]`.
    #[error("invalid gm_ratio: {ratio} (must be in (0, 0.5])")]
    InvalidGuidedMutationRatio {
        /// The rejected ratio
        ratio: f64,
    },

    /// Initial amplitude is not a finite positive number.
    #[error("invalid init_amp: {amplitude} (must be finite and > 0)")]
    InvalidAmplitude {
        /// The rejected amplitude
        amplitude: f64,
    },

    /// The spark pool cannot give every firework at least one spark.
    #[error("invalid spark allocation: sp_size={sp_size}, fw_size={fw_size}")]
    InvalidSparkAllocation {
        /// Total sparks per iteration
        sp_size: usize,
        /// Number of fireworks
        fw_size: usize,
    },

    /// Guided mutation would average over an empty group of sparks.
    #[error(
        "guided mutation group is empty: {sparks_per_firework} sparks per firework with gm_ratio={gm_ratio}"
    )]
    EmptyMutationGroup {
        /// Sparks allocated to each firework
        sparks_per_firework: usize,
        /// Configured ratio
        gm_ratio: f64,
    },

    /// The evaluator itself reported a failure.
    #[error("evaluator failed: {0}")]
    EvaluatorFailed(#[source] BoxError),

    /// The evaluator returned a different number of values than points.
    #[error("evaluator returned {got} values for {expected} points")]
    EvaluationLengthMismatch {
        /// Number of points submitted
        expected: usize,
        /// Number of values returned
        got: usize,
    },

    /// The evaluator returned NaN or an infinity.
    #[error("evaluator returned non-finite fitness {value} for point {index}")]
    NonFiniteFitness {
        /// Row index of the offending point in the batch
        index: usize,
        /// The value returned
        value: f64,
    },

    /// Writing a recording failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialising a recording failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized `Result` type for fireworks operations.
pub type Result<T> = std::result::Result<T, FwaError>;

impl FwaError {
    /// Returns `true` if the error was raised while validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FwaError::MissingEvaluator
                | FwaError::InvalidDimension { .. }
                | FwaError::InvalidBounds { .. }
                | FwaError::NonPositiveBudget { .. }
                | FwaError::BudgetTooSmall { .. }
                | FwaError::InvalidGuidedMutationRatio { .. }
                | FwaError::InvalidAmplitude { .. }
                | FwaError::InvalidSparkAllocation { .. }
                | FwaError::EmptyMutationGroup { .. }
        )
    }

    /// Returns `true` if the evaluator broke its contract.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            FwaError::EvaluatorFailed(_)
                | FwaError::EvaluationLengthMismatch { .. }
                | FwaError::NonFiniteFitness { .. }
        )
    }
}
