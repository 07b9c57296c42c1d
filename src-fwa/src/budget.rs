use std::fmt;

/// Run-scoped counter of objective-function evaluations.
///
/// The counter only moves through [`EvaluationBudget::charge`], which the
/// evaluation helper calls with the number of points actually submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationBudget {
    max_eval: usize,
    used: usize,
}

impl EvaluationBudget {
    pub fn new(max_eval: usize) -> Self {
        Self { max_eval, used: 0 }
    }

    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Evaluations consumed so far
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.max_eval.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max_eval
    }

    /// Whether `cost` more evaluations fit without overrunning `max_eval`
    pub fn can_afford(&self, cost: usize) -> bool {
        cost <= self.remaining()
    }

    pub(crate) fn charge(&mut self, n: usize) {
        self.used += n;
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `IterationCounter >= max_iter`
    MaxIterations(usize),
    /// `EvaluationBudget >= max_eval`
    MaxEvaluations(usize),
    /// The next iteration would overrun the evaluation budget
    InsufficientBudget { needed: usize, remaining: usize },
    /// The per-iteration callback asked to stop
    Callback,
    /// The evaluator broke its contract; the run was aborted
    EvaluationFailed,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::MaxIterations(n) => write!(f, "Maximum iterations reached: {}", n),
            Termination::MaxEvaluations(n) => write!(f, "Maximum evaluations reached: {}", n),
            Termination::InsufficientBudget { needed, remaining } => write!(
                f,
                "Evaluation budget exhausted: next iteration needs {} evaluations, {} remaining",
                needed, remaining
            ),
            Termination::Callback => write!(f, "Optimization stopped by callback"),
            Termination::EvaluationFailed => write!(f, "Optimization aborted"),
        }
    }
}

/// Termination check evaluated before each iteration.
///
/// `iteration_cost` is the nominal number of evaluations one iteration spends
/// (restarts excluded); an iteration that cannot pay for itself is not started.
pub(crate) fn check_termination(
    nit: usize,
    max_iter: usize,
    budget: &EvaluationBudget,
    iteration_cost: usize,
) -> Option<Termination> {
    if nit >= max_iter {
        return Some(Termination::MaxIterations(max_iter));
    }
    if budget.is_exhausted() {
        return Some(Termination::MaxEvaluations(budget.max_eval()));
    }
    if !budget.can_afford(iteration_cost) {
        return Some(Termination::InsufficientBudget {
            needed: iteration_cost,
            remaining: budget.remaining(),
        });
    }
    None
}
