use crypto_estimators::{
    sd_estimator, AlgorithmFamily, AlgorithmVariant, Assignment, Complexity, CostFunction,
    CostResult, Detail, Estimator, EstimatorConfig, EstimatorError, MemoryAccess, ParameterSpace,
    ParameterSpec, ProblemKind, ProblemModel, ProblemOptions, ReportOptions, SearchConfig,
    StrategyChoice,
};
use std::sync::Arc;

#[derive(Debug)]
struct Line;

impl ProblemKind for Line {
    fn name(&self) -> &str {
        "Line"
    }
}

/// `time = max(h, n - h)`, `memory = h`.
struct Balance;

impl CostFunction for Balance {
    fn name(&self) -> &str {
        "Balance"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::joint("h", "split")]
    }

    fn declare_space(
        &self,
        problem: &ProblemModel,
        space: &mut ParameterSpace,
        _full_domain: bool,
    ) -> crypto_estimators::Result<()> {
        let n = problem.parameter("n").unwrap_or(0.0) as i64;
        space.set_range("h", 0, n)
    }

    fn cost(&self, problem: &ProblemModel, assignment: &Assignment, _detail: Detail) -> CostResult {
        let n = problem.parameters()[0];
        let h = assignment["h"] as f64;
        CostResult::new(h.max(n - h), h)
    }
}

/// Like [`Balance`], but its asymptotic time `max(3h, n - h)` favours a smaller split.
struct Skewed;

impl CostFunction for Skewed {
    fn name(&self) -> &str {
        "Skewed"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        Balance.parameters()
    }

    fn declare_space(
        &self,
        problem: &ProblemModel,
        space: &mut ParameterSpace,
        full_domain: bool,
    ) -> crypto_estimators::Result<()> {
        Balance.declare_space(problem, space, full_domain)
    }

    fn cost(&self, problem: &ProblemModel, assignment: &Assignment, detail: Detail) -> CostResult {
        Balance.cost(problem, assignment, detail)
    }

    fn supports_tilde_o(&self) -> bool {
        true
    }

    fn tilde_o_cost(&self, problem: &ProblemModel, assignment: &Assignment) -> CostResult {
        let n = problem.parameters()[0];
        let h = assignment["h"] as f64;
        CostResult::new((3.0 * h).max(n - h), h)
    }
}

fn line(n: f64, config: &EstimatorConfig) -> ProblemModel {
    let params = [("n".to_string(), n)].into_iter().collect();
    ProblemModel::new(Line, params, config.problem_options()).unwrap()
}

fn balance(n: f64, config: &EstimatorConfig) -> AlgorithmVariant {
    AlgorithmVariant::new(Box::new(Balance), Arc::new(line(n, config)), config).unwrap()
}

#[test]
fn balanced_split_on_every_strategy() {
    for strategy in [StrategyChoice::Auto, StrategyChoice::Grid, StrategyChoice::Exhaustive] {
        let config = EstimatorConfig::default()
            .with_search(SearchConfig::default().with_strategy(strategy));
        let variant = balance(100.0, &config);
        assert_eq!(variant.parameter("h").unwrap(), Some(50), "{:?}", strategy);
        assert_eq!(variant.complexity(), Complexity::new(50.0, 50.0));
    }
}

#[test]
fn balanced_split_under_memory_bound() {
    let variant = balance(100.0, &EstimatorConfig::default().with_memory_bound(30.0));
    assert_eq!(variant.parameter("h").unwrap(), Some(30));
    assert_eq!(variant.time_complexity(), 70.0);

    let variant = balance(100.0, &EstimatorConfig::default().with_memory_bound(-1.0));
    assert_eq!(variant.parameter("h").unwrap(), None);
    assert_eq!(variant.complexity(), Complexity::INFEASIBLE);
}

#[test]
fn memory_access_penalty_shifts_the_optimum() {
    // A logarithmic penalty makes larger `h` slightly more expensive.
    let config = EstimatorConfig::default().with_memory_access(MemoryAccess::Logarithmic);
    let variant = balance(100.0, &config);
    let h = variant.parameter("h").unwrap().unwrap();
    assert!(h <= 50);
    assert!(variant.time_complexity() > 50.0);
}

#[test]
fn tilde_o_estimate_reports_its_own_optimum() {
    let config = EstimatorConfig::default();
    let family = AlgorithmFamily::new("Line").with(Skewed);
    let estimator = Estimator::new(line(100.0, &config), family, &config).unwrap();
    let skewed = estimator.algorithm("Skewed").unwrap();
    assert_eq!(skewed.parameter("h").unwrap(), Some(50));
    assert_eq!(skewed.tilde_o_parameters(false).unwrap()["h"], Some(25));

    let estimates = estimator.estimate_with(&ReportOptions::default().with_tilde_o());
    let row = &estimates["Skewed"];
    assert_eq!(row.estimate.parameters["h"], Some(50));
    let tilde_o = row.tilde_o_estimate.as_ref().unwrap();
    assert_eq!(tilde_o.parameters["h"], Some(25));
    assert_eq!((tilde_o.time, tilde_o.memory), (75.0, 25.0));
}

#[test]
fn prange_baseline() {
    let estimator = sd_estimator(100, 50, 10, &EstimatorConfig::default()).unwrap();
    let prange = estimator.algorithm("Prange").unwrap();
    assert_eq!(prange.parameter("r").unwrap(), Some(4));
    assert!((prange.memory_complexity() - 12.688).abs() < 1e-3);
    assert!((prange.time_complexity() - 28.292).abs() < 1e-3);
    assert!(prange.display_parameters(false).is_empty());
    assert_eq!(prange.display_parameters(true)["r"], Some(4));
}

#[test]
fn fastest_sd_algorithm() {
    let estimator = sd_estimator(100, 50, 10, &EstimatorConfig::default()).unwrap();
    assert_eq!(estimator.algorithm_names(), vec!["Prange", "Stern", "Dumer"]);
    let fastest = estimator.fastest_algorithm(false).unwrap();
    assert_eq!(fastest.name(), "Stern");
    for algorithm in estimator.algorithms() {
        assert!(fastest.time_complexity() <= algorithm.time_complexity());
    }
    // Only Prange has an asymptotic formula.
    assert_eq!(estimator.fastest_algorithm(true).unwrap().name(), "Prange");
}

#[test]
fn tight_memory_bound_changes_region_or_fails() {
    let config = EstimatorConfig::default().with_memory_bound(12.6);
    let estimator = sd_estimator(100, 50, 10, &config).unwrap();
    let prange = estimator.algorithm("Prange").unwrap();
    assert_eq!(prange.parameter("r").unwrap(), Some(3));
    assert!(prange.memory_complexity() <= 12.6);

    let config = EstimatorConfig::default().with_memory_bound(12.0);
    let estimator = sd_estimator(100, 50, 10, &config).unwrap();
    for algorithm in estimator.algorithms() {
        assert_eq!(algorithm.complexity(), Complexity::INFEASIBLE, "{}", algorithm.name());
        assert!(algorithm.diagnostics().is_empty());
    }
    assert!(estimator.fastest_algorithm(false).is_none());
    assert!(estimator.fastest_algorithm(true).is_none());
}

#[test]
fn fixed_parameters_skip_the_search() {
    let config = EstimatorConfig::default();
    let estimator = sd_estimator(100, 50, 10, &config).unwrap();
    let free = estimator.algorithm("Stern").unwrap();

    let problem = crypto_estimators::sd_problem(100, 50, 10, config.problem_options()).unwrap();
    let fixed: Assignment = [("p".to_string(), 2), ("l".to_string(), 6)].into_iter().collect();
    let pinned = AlgorithmVariant::new(
        Box::new(crypto_estimators::families::sd::Stern),
        Arc::new(problem),
        &config,
    )
    .unwrap()
    .with_fixed_parameters(&fixed)
    .unwrap();

    assert_eq!(pinned.parameter("p").unwrap(), Some(2));
    assert_eq!(pinned.parameter("l").unwrap(), Some(6));
    assert_eq!(pinned.search_report().evaluations, 0);
    assert!(pinned.time_complexity() >= free.time_complexity());
}

#[test]
fn out_of_range_fixed_value_is_rejected() {
    let config = EstimatorConfig::default();
    let problem = crypto_estimators::sd_problem(100, 50, 10, config.problem_options()).unwrap();
    let fixed: Assignment = [("p".to_string(), 500)].into_iter().collect();
    let err = AlgorithmVariant::new(
        Box::new(crypto_estimators::families::sd::Stern),
        Arc::new(problem),
        &config,
    )
    .unwrap()
    .with_fixed_parameters(&fixed)
    .unwrap_err();
    assert!(matches!(err, EstimatorError::InvalidRange { .. }));
}

#[test]
fn domain_errors_halt_construction() {
    let err = sd_estimator(100, 120, 10, &EstimatorConfig::default()).unwrap_err();
    assert!(matches!(err, EstimatorError::Domain { .. }));
    assert!(err.to_string().contains("k must satisfy"));

    let options = ProblemOptions::default().with_memory_bound(f64::NAN);
    assert!(crypto_estimators::sd_problem(100, 50, 10, options).is_err());
}
