mod exhaustive;
mod grid;
mod sweep;
pub mod traits;

pub use exhaustive::ExhaustiveSearch;
pub use grid::AdaptiveGridSearch;
pub use traits::{GridSearchPolicy, OptimizationCallback, SearchProblem, Solver, SolverResult};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyChoice {
    /// Exhaustive for small spaces, adaptive grid otherwise.
    #[default]
    Auto,
    Grid,
    Exhaustive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: StrategyChoice,
    /// Hard cap on cost evaluations per group search.
    pub max_evaluations: Option<usize>,
    /// Largest declared space `Auto` still scans exhaustively.
    pub exhaustive_limit: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyChoice::Auto,
            max_evaluations: None,
            exhaustive_limit: 4096,
        }
    }
}

impl SearchConfig {
    pub fn with_strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }
}

/// Pick a search strategy for `problem`, returning it together with the reason.
pub fn select_solver(problem: &dyn SearchProblem, config: &SearchConfig) -> (Box<dyn Solver>, String) {
    let fixed = problem.fixed();
    let size = problem
        .dimensions()
        .iter()
        .map(|d| problem.range(d, fixed).len())
        .fold(1u64, |acc, len| acc.saturating_mul(len));

    match config.strategy {
        StrategyChoice::Grid => (
            Box::new(AdaptiveGridSearch::new()),
            "Configured: adaptive grid".to_string(),
        ),
        StrategyChoice::Exhaustive => (
            Box::new(ExhaustiveSearch::new()),
            "Configured: exhaustive".to_string(),
        ),
        StrategyChoice::Auto if size <= config.exhaustive_limit => (
            Box::new(ExhaustiveSearch::new()),
            format!("Auto: {} points → exhaustive", size),
        ),
        StrategyChoice::Auto => (
            Box::new(AdaptiveGridSearch::new()),
            format!(
                "Auto: {} dims, {} points → adaptive grid",
                problem.dimensions().len(),
                size
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Assignment, Complexity, ParameterRange};
    use std::cell::Cell;

    /// Two-dimensional bowl `|x - cx| + |y - cy|` with memory `x`. Optionally `x + y` odd is
    /// invalid and a lower bound of `|x - cx|` enables early abort.
    struct Bowl {
        dims: Vec<String>,
        fixed: Assignment,
        bounds: ParameterRange,
        centre: (i64, i64),
        use_bound: bool,
        skip_odd: bool,
        recenter_y: bool,
        /// Optimum `y` follows `2x`, with the matching hint.
        coupled: bool,
        evals: Cell<usize>,
    }

    impl Bowl {
        fn new(centre: (i64, i64)) -> Self {
            Self {
                dims: vec!["x".into(), "y".into()],
                fixed: Assignment::new(),
                bounds: ParameterRange::new(0, 100),
                centre,
                use_bound: false,
                skip_odd: false,
                recenter_y: false,
                coupled: false,
                evals: Cell::new(0),
            }
        }
    }

    impl SearchProblem for Bowl {
        fn dimensions(&self) -> &[String] {
            &self.dims
        }
        fn fixed(&self) -> &Assignment {
            &self.fixed
        }
        fn range(&self, _name: &str, _partial: &Assignment) -> ParameterRange {
            self.bounds
        }
        fn policy(&self, _name: &str) -> GridSearchPolicy {
            GridSearchPolicy::new(4, 4)
        }
        fn recenter(&self, name: &str, provisional: &Assignment) -> Option<i64> {
            if self.coupled && name == "y" {
                return provisional.get("x").map(|x| 2 * x);
            }
            (self.recenter_y && name == "y").then_some(self.centre.1)
        }
        fn invalid(&self, a: &Assignment) -> bool {
            self.skip_odd && (a["x"] + a["y"]) % 2 == 1
        }
        fn lower_bound(&self, a: &Assignment) -> Option<f64> {
            self.use_bound.then(|| (a["x"] - self.centre.0).abs() as f64)
        }
        fn evaluate(&self, a: &Assignment) -> Complexity {
            self.evals.set(self.evals.get() + 1);
            let t = if self.coupled {
                (a["x"] - self.centre.0).abs() + (a["y"] - 2 * a["x"]).abs()
            } else {
                (a["x"] - self.centre.0).abs() + (a["y"] - self.centre.1).abs()
            };
            Complexity::new(t as f64, a["x"] as f64)
        }
    }

    struct Counting(usize);

    impl OptimizationCallback for Counting {
        fn on_evaluation(&mut self, _a: &Assignment, _c: &Complexity) {
            self.0 += 1;
        }
    }

    #[test]
    fn exhaustive_finds_global_minimum() {
        let bowl = Bowl::new((37, 61));
        let result = ExhaustiveSearch.solve(&bowl, &mut Counting(0));
        assert!(result.success);
        let a = result.assignment.unwrap();
        assert_eq!((a["x"], a["y"]), (37, 61));
        assert_eq!(result.cost_evals, 100 * 100);
    }

    #[test]
    fn grid_widens_until_interior() {
        let bowl = Bowl::new((37, 61));
        let mut counter = Counting(0);
        let result = AdaptiveGridSearch.solve(&bowl, &mut counter);
        let a = result.assignment.unwrap();
        assert_eq!((a["x"], a["y"]), (37, 61));
        assert_eq!(result.complexity.time, 0.0);
        assert!(result.sweeps > 1);
        assert!(result.cost_evals < 100 * 100);
        assert_eq!(result.cost_evals, counter.0);
    }

    #[test]
    fn recentring_jumps_to_hint() {
        let mut bowl = Bowl::new((3, 80));
        bowl.recenter_y = true;
        let result = AdaptiveGridSearch.solve(&bowl, &mut Counting(0));
        let a = result.assignment.unwrap();
        assert_eq!((a["x"], a["y"]), (3, 80));
        assert!(result.cost_evals < 200);
    }

    #[test]
    fn recentring_follows_each_outer_value() {
        struct Points(Vec<(i64, i64)>);
        impl OptimizationCallback for Points {
            fn on_evaluation(&mut self, a: &Assignment, _c: &Complexity) {
                self.0.push((a["x"], a["y"]));
            }
        }

        let mut bowl = Bowl::new((30, 0));
        bowl.coupled = true;
        let mut points = Points(Vec::new());
        let result = AdaptiveGridSearch.solve(&bowl, &mut points);
        let a = result.assignment.unwrap();
        assert_eq!((a["x"], a["y"]), (30, 60));
        assert_eq!(result.complexity.time, 0.0);
        // Every x is swept with a y window around its own hint, clamped at y = 0.
        assert!(points.0.iter().all(|(x, y)| (y - 2 * x).abs() <= 3), "{:?}", points.0);
    }

    #[test]
    fn early_abort_skips_evaluations_without_changing_optimum() {
        let plain = Bowl::new((20, 20));
        let full = ExhaustiveSearch.solve(&plain, &mut Counting(0));

        let mut bounded = Bowl::new((20, 20));
        bounded.use_bound = true;
        let pruned = ExhaustiveSearch.solve(&bounded, &mut Counting(0));

        assert_eq!(full.assignment, pruned.assignment);
        assert!(pruned.aborted_evals > 0);
        assert_eq!(pruned.cost_evals + pruned.aborted_evals, full.cost_evals);
        assert_eq!(bounded.evals.get(), pruned.cost_evals);
    }

    #[test]
    fn invalid_points_are_skipped() {
        let mut bowl = Bowl::new((10, 11));
        bowl.skip_odd = true;
        let result = ExhaustiveSearch.solve(&bowl, &mut Counting(0));
        let a = result.assignment.unwrap();
        assert_eq!((a["x"] + a["y"]) % 2, 0);
        assert_eq!(result.complexity.time, 1.0);
        // Ties on time go to the lower memory (smaller x).
        assert_eq!(a["x"], 9);
        assert_eq!(result.invalid_skipped, 100 * 100 / 2);
    }

    #[test]
    fn empty_range_is_infeasible_not_an_error() {
        let mut bowl = Bowl::new((0, 0));
        bowl.bounds = ParameterRange::new(5, 5);
        let result = AdaptiveGridSearch.solve(&bowl, &mut Counting(0));
        assert!(!result.success);
        assert_eq!(result.assignment, None);
        assert_eq!(result.complexity, Complexity::INFEASIBLE);
        assert_eq!(result.cost_evals, 0);
    }

    #[test]
    fn auto_strategy_depends_on_space_size() {
        let mut bowl = Bowl::new((1, 1));
        let (solver, _) = select_solver(&bowl, &SearchConfig::default());
        assert_eq!(solver.name(), "AdaptiveGrid");

        bowl.bounds = ParameterRange::new(0, 10);
        let (solver, reason) = select_solver(&bowl, &SearchConfig::default());
        assert_eq!(solver.name(), "Exhaustive");
        assert!(reason.contains("100 points"));

        let config = SearchConfig::default().with_strategy(StrategyChoice::Grid);
        assert_eq!(select_solver(&bowl, &config).0.name(), "AdaptiveGrid");
    }
}
