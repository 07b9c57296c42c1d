//! Problem and method configuration.
//!
//! These are plain values: they can be built in code, deserialised from JSON
//! or YAML (every field has a default), and are validated once when an
//! optimizer is built.

use serde::{Deserialize, Serialize};

use crate::error::{FwaError, Result};

/// Search space and budgets shared by both variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    /// Number of coordinates per point
    pub dim: usize,
    /// Lower bound applied to every coordinate
    pub lower_bound: f64,
    /// Upper bound applied to every coordinate
    pub upper_bound: f64,
    /// Iteration cap
    pub max_iter: usize,
    /// Evaluation cap; the binding resource
    pub max_eval: usize,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self { dim: 2, lower_bound: -100.0, upper_bound: 100.0, max_iter: 10000, max_eval: 20000 }
    }
}

impl ProblemConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(FwaError::InvalidDimension { dim: self.dim });
        }
        if !self.lower_bound.is_finite()
            || !self.upper_bound.is_finite()
            || self.lower_bound >= self.upper_bound
        {
            return Err(FwaError::InvalidBounds { lower: self.lower_bound, upper: self.upper_bound });
        }
        if self.max_iter == 0 {
            return Err(FwaError::NonPositiveBudget { name: "max_iter" });
        }
        if self.max_eval == 0 {
            return Err(FwaError::NonPositiveBudget { name: "max_eval" });
        }
        Ok(())
    }

    pub(crate) fn span(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

fn validate_amplitude(init_amp: f64) -> Result<()> {
    if !init_amp.is_finite() || init_amp <= 0.0 {
        return Err(FwaError::InvalidAmplitude { amplitude: init_amp });
    }
    Ok(())
}

/// Method parameters of the minimal (single firework) variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BbfwaConfig {
    /// Sparks generated per iteration
    pub sp_size: usize,
    /// Initial explosion amplitude
    pub init_amp: f64,
}

impl Default for BbfwaConfig {
    fn default() -> Self {
        Self { sp_size: 200, init_amp: 200.0 }
    }
}

impl BbfwaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sp_size == 0 {
            return Err(FwaError::InvalidSparkAllocation { sp_size: self.sp_size, fw_size: 1 });
        }
        validate_amplitude(self.init_amp)
    }
}

/// Method parameters of the loser-out tournament variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotfwaConfig {
    /// Number of fireworks
    pub fw_size: usize,
    /// Sparks per iteration, split evenly across fireworks
    pub sp_size: usize,
    /// Initial explosion amplitude, also used when a firework restarts
    pub init_amp: f64,
    /// Fraction of a firework's sparks averaged on each side of guided mutation
    pub gm_ratio: f64,
}

impl Default for LotfwaConfig {
    fn default() -> Self {
        Self { fw_size: 5, sp_size: 300, init_amp: 200.0, gm_ratio: 0.2 }
    }
}

impl LotfwaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fw_size == 0 || self.sp_size < self.fw_size {
            return Err(FwaError::InvalidSparkAllocation {
                sp_size: self.sp_size,
                fw_size: self.fw_size,
            });
        }
        validate_amplitude(self.init_amp)?;
        if !(self.gm_ratio > 0.0 && self.gm_ratio <= 0.5) {
            return Err(FwaError::InvalidGuidedMutationRatio { ratio: self.gm_ratio });
        }
        if self.mutation_group_size() == 0 {
            return Err(FwaError::EmptyMutationGroup {
                sparks_per_firework: self.sparks_per_firework(),
                gm_ratio: self.gm_ratio,
            });
        }
        Ok(())
    }

    /// `floor(sp_size / fw_size)`
    pub fn sparks_per_firework(&self) -> usize {
        if self.fw_size == 0 { 0 } else { self.sp_size / self.fw_size }
    }

    /// `floor(sparks_per_firework * gm_ratio)`, the size of each averaged group
    pub fn mutation_group_size(&self) -> usize {
        (self.sparks_per_firework() as f64 * self.gm_ratio).floor() as usize
    }

    /// Iteration cap affordable at nominal cost:
    /// `min(max_iter, floor(max_eval / (sp_size + fw_size)))`.
    pub fn derived_max_iter(&self, problem: &ProblemConfig) -> usize {
        problem.max_iter.min(problem.max_eval / (self.sp_size + self.fw_size))
    }
}
