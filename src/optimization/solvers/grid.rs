use super::sweep::Sweep;
use super::traits::{OptimizationCallback, SearchProblem, Solver, SolverResult};
use crate::core::{Assignment, ParameterRange};
use log::debug;

/// Adaptive window search.
///
/// Starts from a small window per dimension, sweeps the Cartesian product, and widens any
/// dimension whose best value lies on a window edge. Dimensions with a recentring hint move
/// their window onto the hint for every combination of outer values.
#[derive(Clone, Debug, Default)]
pub struct AdaptiveGridSearch;

impl AdaptiveGridSearch {
    pub fn new() -> Self {
        Self
    }

    fn initial_window(bounds: ParameterRange, start: Option<i64>, width: i64) -> ParameterRange {
        let start = start
            .unwrap_or(bounds.min)
            .clamp(bounds.min, (bounds.max - 1).max(bounds.min));
        ParameterRange::new(start, start.saturating_add(width.max(1))).intersect(&bounds)
    }
}

impl Solver for AdaptiveGridSearch {
    fn name(&self) -> &str {
        "AdaptiveGrid"
    }

    fn solve(
        &self,
        problem: &dyn SearchProblem,
        callback: &mut dyn OptimizationCallback,
    ) -> SolverResult {
        let dims = problem.dimensions().to_vec();
        let fixed = problem.fixed().clone();
        let mut sweep = Sweep::new(problem);

        let bounds = sweep.bounds.clone();
        if bounds.iter().any(ParameterRange::is_empty) {
            return sweep.finish(0, "Empty parameter range");
        }

        let policies: Vec<_> = dims.iter().map(|d| problem.policy(d)).collect();
        let mut windows: Vec<ParameterRange> = bounds
            .iter()
            .zip(&policies)
            .map(|(b, p)| Self::initial_window(*b, p.start, p.window))
            .collect();
        let mut widenings = vec![0usize; dims.len()];

        let mut sweeps = 0u32;
        let message = loop {
            callback.on_sweep(sweeps, &dims, &windows);
            let before = sweep.best;
            let stopped = sweep.run(problem, Some(&windows), callback);
            sweeps += 1;

            if stopped {
                break "Stopped by callback";
            }
            if sweeps > 1 && before.is_feasible() && !sweep.best.better_than(&before) {
                break "No improvement after widening";
            }

            let mut widened = false;
            match &sweep.best_assignment {
                Some(best) => {
                    let at = merged(&fixed, best);
                    for (i, dim) in dims.iter().enumerate() {
                        if widenings[i] >= policies[i].max_iterations {
                            continue;
                        }
                        let Some(&value) = best.get(dim) else { continue };
                        let effective = problem.range(dim, &at).intersect(&bounds[i]);
                        let swept = sweep.best_windows[i];
                        let step = policies[i].increment.max(1);
                        let before = windows[i];
                        if value == swept.max - 1 && swept.max < effective.max {
                            windows[i].max = (windows[i].max + step).min(bounds[i].max);
                        }
                        if value == swept.min && swept.min > effective.min {
                            windows[i].min = (windows[i].min - step).max(bounds[i].min);
                        }
                        if windows[i] != before {
                            widenings[i] += 1;
                            widened = true;
                        }
                    }
                }
                None => {
                    for i in 0..dims.len() {
                        if widenings[i] >= policies[i].max_iterations || windows[i] == bounds[i] {
                            continue;
                        }
                        let step = policies[i].increment.max(1);
                        windows[i] = ParameterRange::new(
                            (windows[i].min - step).max(bounds[i].min),
                            (windows[i].max + step).min(bounds[i].max),
                        );
                        widenings[i] += 1;
                        widened = true;
                    }
                }
            }

            if !widened {
                break if sweep.best_assignment.is_some() {
                    "Converged"
                } else {
                    "No feasible assignment"
                };
            }
            debug!("widening windows {:?} after sweep {}", windows, sweeps);
        };

        sweep.finish(sweeps, message)
    }
}

fn merged(fixed: &Assignment, values: &Assignment) -> Assignment {
    let mut out = fixed.clone();
    out.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
    out
}
