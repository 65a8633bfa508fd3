pub mod core;
pub mod estimator;
pub mod families;
pub mod optimization;

pub use crate::core::*;
pub use crate::estimator::{
    AlgorithmEstimate, AlgorithmFamily, AlgorithmVariant, Estimate, Estimator, EstimatorConfig,
    ReportOptions,
};
pub use crate::families::factoring::{if_estimator, if_problem};
pub use crate::families::sd::{sd_estimator, sd_problem, sd_problem_over};
pub use crate::optimization::{
    CostFunction, GridSearchPolicy, MemoryAccess, OptimalParameterResolver, ParameterContext,
    SearchConfig, StrategyChoice,
};
