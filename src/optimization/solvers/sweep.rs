use super::traits::{OptimizationCallback, SearchProblem, SolverResult};
use crate::core::{Assignment, Complexity, ParameterRange};
use std::collections::HashSet;

/// Shared enumeration state: best so far plus the set of points already looked at, so
/// re-sweeps after widening only pay for new points.
pub(crate) struct Sweep {
    dimensions: Vec<String>,
    /// Ranges of each dimension given only the fixed values.
    pub bounds: Vec<ParameterRange>,
    pub best: Complexity,
    pub best_assignment: Option<Assignment>,
    /// Windows actually swept around the best assignment, after recentring.
    pub best_windows: Vec<ParameterRange>,
    current_windows: Vec<ParameterRange>,
    visited: HashSet<Vec<i64>>,
    pub cost_evals: usize,
    pub aborted_evals: usize,
    pub invalid_skipped: usize,
}

impl Sweep {
    pub fn new(problem: &dyn SearchProblem) -> Self {
        let dimensions = problem.dimensions().to_vec();
        let bounds: Vec<ParameterRange> =
            dimensions.iter().map(|d| problem.range(d, problem.fixed())).collect();
        Self {
            dimensions,
            best_windows: bounds.clone(),
            current_windows: bounds.clone(),
            bounds,
            best: Complexity::INFEASIBLE,
            best_assignment: None,
            visited: HashSet::new(),
            cost_evals: 0,
            aborted_evals: 0,
            invalid_skipped: 0,
        }
    }

    /// Enumerate the Cartesian product of the dimension ranges, each intersected with its
    /// window when given. A window with a recentring hint for the outer values is moved onto
    /// the hint first. Returns `true` if the callback asked to stop.
    pub fn run(
        &mut self,
        problem: &dyn SearchProblem,
        windows: Option<&[ParameterRange]>,
        callback: &mut dyn OptimizationCallback,
    ) -> bool {
        let mut partial = problem.fixed().clone();
        self.visit(problem, windows, 0, &mut partial, callback)
    }

    fn visit(
        &mut self,
        problem: &dyn SearchProblem,
        windows: Option<&[ParameterRange]>,
        depth: usize,
        partial: &mut Assignment,
        callback: &mut dyn OptimizationCallback,
    ) -> bool {
        if depth == self.dimensions.len() {
            return self.leaf(problem, partial, callback);
        }

        let name = self.dimensions[depth].clone();
        let mut range = problem.range(&name, partial);
        if let Some(windows) = windows {
            let window = match problem.recenter(&name, partial) {
                Some(centre) => recentred(windows[depth], centre, self.bounds[depth]),
                None => windows[depth],
            };
            self.current_windows[depth] = window;
            range = range.intersect(&window);
        }

        let mut stopped = false;
        for value in range.values() {
            partial.insert(name.clone(), value);
            if self.visit(problem, windows, depth + 1, partial, callback) {
                stopped = true;
                break;
            }
        }
        partial.shift_remove(&name);
        stopped
    }

    fn leaf(
        &mut self,
        problem: &dyn SearchProblem,
        assignment: &Assignment,
        callback: &mut dyn OptimizationCallback,
    ) -> bool {
        let key: Vec<i64> = self
            .dimensions
            .iter()
            .map(|d| assignment.get(d).copied().unwrap_or_default())
            .collect();
        if !self.visited.insert(key) {
            return false;
        }

        if problem.invalid(assignment) {
            self.invalid_skipped += 1;
            return false;
        }

        if let Some(bound) = problem.lower_bound(assignment) {
            if bound > self.best.time {
                self.aborted_evals += 1;
                return callback.should_stop();
            }
        }

        let complexity = problem.evaluate(assignment);
        self.cost_evals += 1;
        callback.on_evaluation(assignment, &complexity);

        if complexity.better_than(&self.best) {
            self.best = complexity;
            let found: Assignment = self
                .dimensions
                .iter()
                .filter_map(|d| assignment.get(d).map(|&v| (d.clone(), v)))
                .collect();
            callback.on_improvement(&found, &complexity);
            self.best_assignment = Some(found);
            self.best_windows.clone_from(&self.current_windows);
        }

        callback.should_stop()
    }

    pub fn finish(self, sweeps: u32, message: &str) -> SolverResult {
        let success = self.best.is_feasible() && self.best_assignment.is_some();
        SolverResult {
            success,
            complexity: if success {
                self.best
            } else {
                Complexity::INFEASIBLE
            },
            assignment: if success { self.best_assignment } else { None },
            sweeps,
            message: message.to_string(),
            cost_evals: self.cost_evals,
            aborted_evals: self.aborted_evals,
            invalid_skipped: self.invalid_skipped,
        }
    }
}

/// Move `window` so it is centred on `centre`, keeping its width where the bounds allow.
pub(crate) fn recentred(window: ParameterRange, centre: i64, bounds: ParameterRange) -> ParameterRange {
    let width = window.len() as i64;
    if width >= bounds.len() as i64 {
        return bounds;
    }
    let lo = (centre - width / 2).clamp(bounds.min, bounds.max - width);
    ParameterRange::new(lo, lo + width)
}
