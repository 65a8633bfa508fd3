use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Concrete values for (a subset of) an algorithm's free parameters.
pub type Assignment = IndexMap<String, i64>;

/// A (time, memory) pair on the log2 scale. `(+inf, +inf)` marks infeasibility.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Complexity {
    pub time: f64,
    pub memory: f64,
}

impl Complexity {
    pub const INFEASIBLE: Complexity = Complexity {
        time: f64::INFINITY,
        memory: f64::INFINITY,
    };

    pub fn new(time: f64, memory: f64) -> Self {
        Self { time, memory }
    }

    pub fn is_feasible(&self) -> bool {
        self.time.is_finite()
    }

    /// Lexicographic order: time first, then memory. NaN sorts as infeasible.
    pub fn compare(&self, other: &Complexity) -> Ordering {
        let key = |c: &Complexity| {
            let t = if c.time.is_nan() { f64::INFINITY } else { c.time };
            let m = if c.memory.is_nan() { f64::INFINITY } else { c.memory };
            (t, m)
        };
        let (a, b) = (key(self), key(other));
        a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
    }

    pub fn better_than(&self, other: &Complexity) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// Intermediate sub-quantity exposed for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticValue {
    Scalar(f64),
    List(Vec<f64>),
}

pub type Diagnostics = IndexMap<String, DiagnosticValue>;

/// Whether a cost evaluation should also fill in its diagnostic breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detail {
    Summary,
    Diagnostics,
}

/// Result of one cost-function evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct CostResult {
    pub time: f64,
    pub memory: f64,
    pub diagnostics: Diagnostics,
}

impl CostResult {
    pub fn new(time: f64, memory: f64) -> Self {
        Self {
            time,
            memory,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn infeasible() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY)
    }

    pub fn with_diagnostic(mut self, name: &str, value: DiagnosticValue) -> Self {
        self.diagnostics.insert(name.to_string(), value);
        self
    }

    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.time, self.memory)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// Optimum follows directly from the problem (and the parameters it depends on).
    Independent,
    /// Searched together with the other members of `group`.
    Joint { group: String },
}

/// Registry entry describing one optimal parameter of an algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub depends_on: Vec<String>,
}

impl ParameterSpec {
    pub fn independent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParameterKind::Independent,
            depends_on: Vec::new(),
        }
    }

    pub fn joint(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParameterKind::Joint {
                group: group.to_string(),
            },
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, names: &[&str]) -> Self {
        self.depends_on = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn group(&self) -> Option<&str> {
        match &self.kind {
            ParameterKind::Joint { group } => Some(group),
            ParameterKind::Independent => None,
        }
    }
}
