use crate::core::error::{EstimatorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Problem-specific closed forms attached to a [`ProblemModel`].
pub trait ProblemKind: fmt::Debug + Send + Sync {
    /// Short family name, e.g. `SD`.
    fn name(&self) -> &str;

    /// log2 of the expected number of solutions, `None` when the problem has no such notion.
    fn expected_solutions(&self, _parameters: &IndexMap<String, f64>) -> Option<f64> {
        None
    }

    /// log2 basic operations -> log2 bit operations.
    fn time_bits(&self, _parameters: &IndexMap<String, f64>, operations: f64) -> f64 {
        operations
    }

    /// log2 stored elements -> log2 bits.
    fn memory_bits(&self, _parameters: &IndexMap<String, f64>, elements: f64) -> f64 {
        elements
    }
}

/// Construction-time options shared by every problem family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemOptions {
    /// Upper bound on log2(memory); `None` means unbounded.
    pub memory_bound: Option<f64>,
    /// log2 of the number of solutions, overriding the derived value.
    pub nsolutions: Option<f64>,
}

impl ProblemOptions {
    pub fn with_memory_bound(mut self, bound: f64) -> Self {
        self.memory_bound = Some(bound);
        self
    }

    pub fn with_nsolutions(mut self, nsolutions: f64) -> Self {
        self.nsolutions = Some(nsolutions);
        self
    }
}

/// Immutable description of a problem instance.
///
/// Parameter order is part of the contract: [`ProblemModel::parameters`] returns values in
/// insertion order and cost functions destructure it positionally.
#[derive(Clone, Debug)]
pub struct ProblemModel {
    kind: Arc<dyn ProblemKind>,
    parameters: IndexMap<String, f64>,
    memory_bound: f64,
    expected_solutions: Option<f64>,
    nsolutions: f64,
}

impl ProblemModel {
    pub fn new<K>(kind: K, parameters: IndexMap<String, f64>, options: ProblemOptions) -> Result<Self>
    where
        K: ProblemKind + 'static,
    {
        for (name, value) in &parameters {
            if !value.is_finite() {
                return Err(EstimatorError::domain(format!(
                    "parameter {} must be finite, got {}",
                    name, value
                )));
            }
        }

        let memory_bound = options.memory_bound.unwrap_or(f64::INFINITY);
        if memory_bound.is_nan() {
            return Err(EstimatorError::domain("memory_bound must be a number"));
        }

        if let Some(n) = options.nsolutions {
            if !n.is_finite() {
                return Err(EstimatorError::domain("nsolutions must be finite"));
            }
        }

        let expected_solutions = kind.expected_solutions(&parameters);
        let nsolutions = options
            .nsolutions
            .or(expected_solutions)
            .map_or(0.0, |n| n.max(0.0));

        Ok(Self {
            kind: Arc::new(kind),
            parameters,
            memory_bound,
            expected_solutions,
            nsolutions,
        })
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Parameter values in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        self.parameters.values().copied().collect()
    }

    pub fn named_parameters(&self) -> &IndexMap<String, f64> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.keys().cloned().collect()
    }

    pub fn memory_bound(&self) -> f64 {
        self.memory_bound
    }

    pub fn expected_solutions(&self) -> Option<f64> {
        self.expected_solutions
    }

    /// log2 number of solutions, never negative.
    pub fn nsolutions(&self) -> f64 {
        self.nsolutions
    }

    pub fn time_bits(&self, operations: f64) -> f64 {
        if operations.is_infinite() {
            return operations;
        }
        self.kind.time_bits(&self.parameters, operations)
    }

    pub fn memory_bits(&self, elements: f64) -> f64 {
        if elements.is_infinite() {
            return elements;
        }
        self.kind.memory_bits(&self.parameters, elements)
    }
}

impl fmt::Display for ProblemModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.name())?;
        for (i, (name, value)) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}
