use crypto_estimators::{
    if_estimator, sd_estimator, EstimatorConfig, EstimatorError, SearchConfig, StrategyChoice,
};
use proptest::prelude::*;

/// Small binary SD instances `(n, k, w)` with `0 < k < n` and `0 < w <= min(n - k, 15)`.
fn sd_instance() -> impl Strategy<Value = (u64, u64, u64)> {
    (20u64..90)
        .prop_flat_map(|n| (Just(n), 1..n))
        .prop_flat_map(|(n, k)| (Just(n), Just(k), 1..=(n - k).min(15)))
}

/// Instances large enough that `Auto` searches Stern and Dumer with the adaptive grid.
fn large_sd_instance() -> impl Strategy<Value = (u64, u64, u64)> {
    (800u64..1200)
        .prop_flat_map(|n| (Just(n), n / 3..2 * n / 3))
        .prop_flat_map(|(n, k)| (Just(n), Just(k), 20u64..80))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn feasible_exactly_when_every_parameter_is_defined(
        (n, k, w) in sd_instance(),
        bound in prop::option::of(8.0f64..30.0),
    ) {
        let mut config = EstimatorConfig::default();
        config.memory_bound = bound;
        let estimator = sd_estimator(n, k, w, &config).unwrap();
        for algorithm in estimator.algorithms() {
            let parameters = algorithm.optimal_parameters();
            let defined = parameters.values().all(Option::is_some);
            prop_assert_eq!(algorithm.is_feasible(), defined, "{} on {:?}", algorithm, parameters);
            if !algorithm.is_feasible() {
                prop_assert_eq!(algorithm.memory_complexity(), f64::INFINITY);
            }
        }
    }

    #[test]
    fn memory_bound_is_never_exceeded(
        (n, k, w) in sd_instance(),
        bound in 8.0f64..30.0,
    ) {
        let config = EstimatorConfig::default().with_memory_bound(bound);
        let estimator = sd_estimator(n, k, w, &config).unwrap();
        for algorithm in estimator.algorithms().iter().filter(|a| a.is_feasible()) {
            prop_assert!(algorithm.memory_complexity() <= bound);
        }
        if let Some(fastest) = estimator.fastest_algorithm(false) {
            prop_assert!(fastest.memory_complexity() <= bound);
            for algorithm in estimator.algorithms() {
                prop_assert!(fastest.time_complexity() <= algorithm.time_complexity());
            }
        }
    }

    #[test]
    fn relaxing_the_memory_bound_never_slows_prange(
        (n, k, w) in sd_instance(),
        tight in 6.0f64..20.0,
        slack in 0.0f64..10.0,
    ) {
        let time = |bound: f64| {
            let config = EstimatorConfig::default()
                .with_memory_bound(bound)
                .excluding(&["Stern", "Dumer"]);
            sd_estimator(n, k, w, &config).unwrap().algorithms()[0].time_complexity()
        };
        prop_assert!(time(tight + slack) <= time(tight));
    }

    #[test]
    fn relaxing_the_memory_bound_never_slows_the_sieves(
        n_bits in 64u64..4096,
        tight in 20.0f64..80.0,
        slack in 0.0f64..40.0,
    ) {
        let tight_estimator =
            if_estimator(n_bits, &EstimatorConfig::default().with_memory_bound(tight)).unwrap();
        let loose_estimator =
            if_estimator(n_bits, &EstimatorConfig::default().with_memory_bound(tight + slack)).unwrap();
        for (a, b) in tight_estimator.algorithms().iter().zip(loose_estimator.algorithms()) {
            prop_assert!(b.time_complexity() <= a.time_complexity());
        }
    }

    #[test]
    fn repeated_queries_reuse_the_search((n, k, w) in sd_instance()) {
        let estimator = sd_estimator(n, k, w, &EstimatorConfig::default()).unwrap();
        for algorithm in estimator.algorithms() {
            let first = algorithm.complexity();
            let parameters = algorithm.optimal_parameters();
            let report = algorithm.search_report();

            prop_assert_eq!(algorithm.complexity(), first);
            prop_assert_eq!(algorithm.time_complexity(), first.time);
            prop_assert_eq!(algorithm.optimal_parameters(), parameters);
            for name in algorithm.optimal_parameters().keys() {
                algorithm.parameter(name).unwrap();
            }
            let _ = algorithm.diagnostics();
            prop_assert_eq!(algorithm.search_report(), report);
        }
    }

    #[test]
    fn excluding_an_algorithm_leaves_the_others_untouched((n, k, w) in sd_instance()) {
        let all = sd_estimator(n, k, w, &EstimatorConfig::default()).unwrap();
        let some = sd_estimator(n, k, w, &EstimatorConfig::default().excluding(&["Stern"])).unwrap();

        prop_assert!(some.algorithm("Stern").is_none());
        prop_assert_eq!(some.algorithm_names(), vec!["Prange", "Dumer"]);
        for algorithm in some.algorithms() {
            let reference = all.algorithm(algorithm.name()).unwrap();
            prop_assert_eq!(algorithm.complexity(), reference.complexity());
            prop_assert_eq!(algorithm.optimal_parameters(), reference.optimal_parameters());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn splitting_algorithms_honour_and_profit_from_the_memory_bound(
        (n, k, w) in large_sd_instance(),
        tight in 25.0f64..60.0,
        slack in 0.0f64..20.0,
        grid in any::<bool>(),
    ) {
        let strategy = if grid { StrategyChoice::Grid } else { StrategyChoice::Auto };
        let estimator = |bound: f64| {
            let config = EstimatorConfig::default()
                .with_memory_bound(bound)
                .with_search(SearchConfig::default().with_strategy(strategy))
                .excluding(&["Prange"]);
            sd_estimator(n, k, w, &config).unwrap()
        };
        let tight_estimator = estimator(tight);
        let loose_estimator = estimator(tight + slack);

        for (a, b) in tight_estimator.algorithms().iter().zip(loose_estimator.algorithms()) {
            if a.is_feasible() {
                prop_assert!(a.memory_complexity() <= tight);
            }
            if b.is_feasible() {
                prop_assert!(b.memory_complexity() <= tight + slack);
            }
            prop_assert!(
                b.time_complexity() <= a.time_complexity(),
                "{} on ({}, {}, {}): {} at {} vs {} at {}",
                a.name(), n, k, w, b.time_complexity(), tight + slack, a.time_complexity(), tight
            );
        }

        if let Some(fastest) = loose_estimator.fastest_algorithm(false) {
            prop_assert!(fastest.memory_complexity() <= tight + slack);
            for algorithm in loose_estimator.algorithms() {
                prop_assert!(fastest.time_complexity() <= algorithm.time_complexity());
            }
        }
    }
}

#[test]
fn exclusions_are_unioned_with_family_defaults() {
    let estimator = if_estimator(1024, &EstimatorConfig::default()).unwrap();
    assert_eq!(estimator.excluded(), ["TrialDivision"]);
    assert_eq!(estimator.algorithm_names(), vec!["NFS", "QS"]);

    let estimator = if_estimator(1024, &EstimatorConfig::default().excluding(&["QS"])).unwrap();
    assert_eq!(estimator.excluded(), ["TrialDivision", "QS"]);
    assert_eq!(estimator.algorithm_names(), vec!["NFS"]);

    let config = EstimatorConfig::default()
        .including(&["TrialDivision"])
        .excluding(&["NFS"]);
    let estimator = if_estimator(1024, &config).unwrap();
    assert_eq!(estimator.algorithm_names(), vec!["QS", "TrialDivision"]);
}

#[test]
fn unknown_algorithm_names_are_rejected() {
    let err = sd_estimator(100, 50, 10, &EstimatorConfig::default().excluding(&["BJMM"])).unwrap_err();
    assert!(matches!(err, EstimatorError::Config(_)));
    assert!(err.to_string().contains("Prange, Stern, Dumer"));
}
