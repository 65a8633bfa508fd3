use crate::core::{ProblemOptions, Result};
use crate::optimization::{MemoryAccess, SearchConfig};
use serde::{Deserialize, Serialize};

/// Options recognised by every estimator, built fresh for each construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Algorithm names to skip, on top of the family's default exclusions.
    pub excluded_algorithms: Vec<String>,
    /// Family members excluded by default that should run anyway.
    pub included_algorithms: Vec<String>,
    /// log2 of the memory ceiling; `None` is unbounded.
    pub memory_bound: Option<f64>,
    /// log2 number of solutions, overriding the problem's closed form.
    pub nsolutions: Option<f64>,
    /// Report bit complexities instead of basic operations / stored elements.
    pub bit_complexities: bool,
    pub memory_access: MemoryAccess,
    /// Search the whole domain of parameters whose default ranges are capped.
    pub full_domain: bool,
    pub search: SearchConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            excluded_algorithms: Vec::new(),
            included_algorithms: Vec::new(),
            memory_bound: None,
            nsolutions: None,
            bit_complexities: true,
            memory_access: MemoryAccess::Constant,
            full_domain: false,
            search: SearchConfig::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn excluding(mut self, names: &[&str]) -> Self {
        self.excluded_algorithms
            .extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn including(mut self, names: &[&str]) -> Self {
        self.included_algorithms
            .extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_memory_bound(mut self, bound: f64) -> Self {
        self.memory_bound = Some(bound);
        self
    }

    pub fn with_nsolutions(mut self, nsolutions: f64) -> Self {
        self.nsolutions = Some(nsolutions);
        self
    }

    pub fn with_bit_complexities(mut self, enabled: bool) -> Self {
        self.bit_complexities = enabled;
        self
    }

    pub fn with_memory_access(mut self, access: MemoryAccess) -> Self {
        self.memory_access = access;
        self
    }

    pub fn with_full_domain(mut self, enabled: bool) -> Self {
        self.full_domain = enabled;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn problem_options(&self) -> ProblemOptions {
        ProblemOptions {
            memory_bound: self.memory_bound,
            nsolutions: self.nsolutions,
        }
    }
}

/// Display options for [`crate::estimator::Estimator::report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub show_parameters: bool,
    /// Include parameters the algorithm marks as internal.
    pub show_all_parameters: bool,
    pub show_tilde_o_time: bool,
    pub show_quantum_complexity: bool,
    /// Decimal places of numeric cells.
    pub precision: usize,
    /// Cut digits instead of rounding.
    pub truncate: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_parameters: true,
            show_all_parameters: false,
            show_tilde_o_time: false,
            show_quantum_complexity: false,
            precision: 1,
            truncate: false,
        }
    }
}

impl ReportOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn with_tilde_o(mut self) -> Self {
        self.show_tilde_o_time = true;
        self
    }

    pub fn with_quantum(mut self) -> Self {
        self.show_quantum_complexity = true;
        self
    }

    pub fn with_all_parameters(mut self) -> Self {
        self.show_all_parameters = true;
        self
    }

    pub fn without_parameters(mut self) -> Self {
        self.show_parameters = false;
        self
    }
}
