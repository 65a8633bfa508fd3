use super::solvers::traits::OptimizationCallback;
use crate::core::{Assignment, Complexity, ParameterRange};
use log::{debug, trace};

/// Improvement record for tracking search progress
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub evaluation: usize,
    pub assignment: Assignment,
    pub complexity: Complexity,
}

/// Callback that logs search progress and enforces the evaluation limit.
pub struct LoggingCallback {
    algorithm: String,
    max_evaluations: Option<usize>,
    evaluations: usize,
    history: Vec<IterationResult>,
}

impl LoggingCallback {
    pub fn new(algorithm: &str, max_evaluations: Option<usize>) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            max_evaluations,
            evaluations: 0,
            history: Vec::new(),
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Every strict improvement, in the order found.
    pub fn history(&self) -> &[IterationResult] {
        &self.history
    }
}

impl OptimizationCallback for LoggingCallback {
    fn on_evaluation(&mut self, assignment: &Assignment, complexity: &Complexity) {
        self.evaluations += 1;
        trace!(
            "{}: eval {:5} {:?} -> time {:.4}, memory {:.4}",
            self.algorithm, self.evaluations, assignment, complexity.time, complexity.memory
        );
    }

    fn on_improvement(&mut self, assignment: &Assignment, complexity: &Complexity) {
        debug!(
            "{}: new best {:?} time {:.4} memory {:.4}",
            self.algorithm, assignment, complexity.time, complexity.memory
        );
        self.history.push(IterationResult {
            evaluation: self.evaluations,
            assignment: assignment.clone(),
            complexity: *complexity,
        });
    }

    fn on_sweep(&mut self, sweep: u32, dimensions: &[String], windows: &[ParameterRange]) {
        if windows.is_empty() {
            return;
        }
        let shown: Vec<String> = dimensions
            .iter()
            .zip(windows)
            .map(|(d, w)| format!("{} in {}", d, w))
            .collect();
        debug!("{}: sweep {} over {}", self.algorithm, sweep, shown.join(", "));
    }

    fn should_stop(&self) -> bool {
        self.max_evaluations
            .is_some_and(|limit| self.evaluations >= limit)
    }
}
