pub mod constraints;
pub mod error;
pub mod expression;
pub mod problem;
pub mod space;
pub mod types;

pub use constraints::{detect_cycles, validate_registry};
pub use error::{EstimatorError, Result};
pub use expression::CompiledExpression;
pub use problem::{ProblemKind, ProblemModel, ProblemOptions};
pub use space::{ParameterRange, ParameterSpace, RangeConstraint, Relation};
pub use types::*;
