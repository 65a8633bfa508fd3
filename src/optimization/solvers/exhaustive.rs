use super::sweep::Sweep;
use super::traits::{OptimizationCallback, SearchProblem, Solver, SolverResult};

/// Scan every point of the declared (narrowed) ranges once.
#[derive(Clone, Debug, Default)]
pub struct ExhaustiveSearch;

impl ExhaustiveSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for ExhaustiveSearch {
    fn name(&self) -> &str {
        "Exhaustive"
    }

    fn solve(
        &self,
        problem: &dyn SearchProblem,
        callback: &mut dyn OptimizationCallback,
    ) -> SolverResult {
        let mut sweep = Sweep::new(problem);
        callback.on_sweep(0, problem.dimensions(), &[]);
        let message = if sweep.run(problem, None, callback) {
            "Stopped by callback"
        } else if sweep.best_assignment.is_some() {
            "Converged"
        } else {
            "No feasible assignment"
        };
        sweep.finish(1, message)
    }
}
