use crate::core::{Assignment, Complexity, ParameterRange};
use serde::{Deserialize, Serialize};

/// Per-dimension window policy for the adaptive grid search.
///
/// The first window is `[start, start + window)` (clamped to the declared range); whenever
/// the best value sits on a window edge the window grows by `increment`, at most
/// `max_iterations` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearchPolicy {
    /// First value of the initial window, declared minimum when `None`.
    pub start: Option<i64>,
    pub window: i64,
    pub increment: i64,
    pub max_iterations: usize,
}

impl Default for GridSearchPolicy {
    fn default() -> Self {
        Self {
            start: None,
            window: 5,
            increment: 5,
            max_iterations: 1000,
        }
    }
}

impl GridSearchPolicy {
    pub fn new(window: i64, increment: i64) -> Self {
        Self {
            window,
            increment,
            ..Self::default()
        }
    }

    pub fn starting_at(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[derive(Clone, Debug)]
pub struct SolverResult {
    pub success: bool,
    pub complexity: Complexity,
    /// Best values of the searched dimensions, `None` when nothing was feasible.
    pub assignment: Option<Assignment>,
    pub sweeps: u32,
    pub message: String,
    pub cost_evals: usize,
    pub aborted_evals: usize,
    pub invalid_skipped: usize,
}

/// Callback interface for search progress
pub trait OptimizationCallback {
    fn on_evaluation(&mut self, _assignment: &Assignment, _complexity: &Complexity) {}

    /// Called whenever a strictly better assignment is found.
    fn on_improvement(&mut self, _assignment: &Assignment, _complexity: &Complexity) {}

    /// Called at the start of every sweep with the current windows.
    fn on_sweep(&mut self, _sweep: u32, _dimensions: &[String], _windows: &[ParameterRange]) {}

    /// Check if the search should stop early
    fn should_stop(&self) -> bool {
        false
    }
}

/// A discrete minimisation problem over named integer dimensions.
pub trait SearchProblem {
    /// Dimensions to search, in enumeration order.
    fn dimensions(&self) -> &[String];

    /// Values held fixed during the search (already resolved dependencies).
    fn fixed(&self) -> &Assignment;

    /// Range of `name` given a partial assignment of the fixed values and earlier dimensions.
    fn range(&self, name: &str, partial: &Assignment) -> ParameterRange;

    fn policy(&self, name: &str) -> GridSearchPolicy;

    fn recenter(&self, name: &str, provisional: &Assignment) -> Option<i64>;

    fn invalid(&self, assignment: &Assignment) -> bool;

    /// Lower bound on the time of `evaluate(assignment)`, on the same scale.
    fn lower_bound(&self, assignment: &Assignment) -> Option<f64>;

    fn evaluate(&self, assignment: &Assignment) -> Complexity;
}

/// Search strategy interface
pub trait Solver {
    fn name(&self) -> &str;

    fn solve(
        &self,
        problem: &dyn SearchProblem,
        callback: &mut dyn OptimizationCallback,
    ) -> SolverResult;
}
