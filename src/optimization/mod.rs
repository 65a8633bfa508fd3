pub mod callback;
pub mod cost;
pub mod problem;
pub mod resolver;
pub mod solvers;

pub use callback::LoggingCallback;
pub use cost::{CostFunction, ParameterContext};
pub use problem::{CostModel, CostSearch, MemoryAccess, Objective};
pub use resolver::{OptimalParameterResolver, SearchReport};
pub use solvers::{select_solver, SearchConfig, StrategyChoice};
pub use solvers::{AdaptiveGridSearch, ExhaustiveSearch, GridSearchPolicy, Solver, SolverResult};
