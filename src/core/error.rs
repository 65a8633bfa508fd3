use thiserror::Error;

/// Crate-wide error type.
///
/// Infeasibility is deliberately absent: an algorithm without a feasible parameter
/// assignment reports `(+inf, +inf)` instead of failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    /// A problem instance violates one of its construction constraints.
    #[error("domain error: {constraint}")]
    Domain { constraint: String },

    /// The algorithm does not implement the requested metric.
    #[error("{algorithm} does not support {metric}")]
    Unsupported { algorithm: String, metric: String },

    #[error("unknown parameter '{name}' for {algorithm}")]
    UnknownParameter { algorithm: String, name: String },

    #[error("invalid range for '{name}': [{min}, {max})")]
    InvalidRange { name: String, min: i64, max: i64 },

    #[error("cyclic dependency: {0}")]
    CyclicDependency(String),

    #[error("expression error: {0}")]
    Expression(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EstimatorError {
    pub fn domain(constraint: impl Into<String>) -> Self {
        Self::Domain {
            constraint: constraint.into(),
        }
    }

    pub fn unsupported(algorithm: impl Into<String>, metric: impl Into<String>) -> Self {
        Self::Unsupported {
            algorithm: algorithm.into(),
            metric: metric.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<serde_json::Error> for EstimatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
