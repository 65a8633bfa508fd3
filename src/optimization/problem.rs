use crate::core::*;
use crate::optimization::cost::CostFunction;
use crate::optimization::solvers::traits::{GridSearchPolicy, SearchProblem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cost of accessing memory, as an additive penalty on log2 time given log2 memory `m`.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryAccess {
    #[default]
    Constant,
    /// `log2(m)`
    Logarithmic,
    /// `m / 2`
    SquareRoot,
    /// `m / 3`
    CubeRoot,
    /// Expression in the variable `m`, e.g. `"m/4 + 1"`.
    Formula(String),
    #[serde(skip)]
    Function(fn(f64) -> f64),
}

impl fmt::Debug for MemoryAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "Constant"),
            Self::Logarithmic => write!(f, "Logarithmic"),
            Self::SquareRoot => write!(f, "SquareRoot"),
            Self::CubeRoot => write!(f, "CubeRoot"),
            Self::Formula(expr) => write!(f, "Formula({:?})", expr),
            Self::Function(_) => write!(f, "Function(..)"),
        }
    }
}

#[derive(Clone, Debug)]
enum AccessCost {
    Constant,
    Logarithmic,
    Divide(f64),
    Formula(CompiledExpression),
    Function(fn(f64) -> f64),
}

impl AccessCost {
    fn compile(access: &MemoryAccess) -> Result<Self> {
        Ok(match access {
            MemoryAccess::Constant => Self::Constant,
            MemoryAccess::Logarithmic => Self::Logarithmic,
            MemoryAccess::SquareRoot => Self::Divide(2.0),
            MemoryAccess::CubeRoot => Self::Divide(3.0),
            MemoryAccess::Formula(expr) => {
                Self::Formula(CompiledExpression::new(expr, &["m".to_string()])?)
            }
            MemoryAccess::Function(f) => Self::Function(*f),
        })
    }

    /// Penalty for log2 memory `m`; never negative, undefined values count as free.
    fn penalty(&self, m: f64) -> f64 {
        let value = match self {
            Self::Constant => 0.0,
            Self::Logarithmic if m > 0.0 => m.log2(),
            Self::Logarithmic => 0.0,
            Self::Divide(d) => m / d,
            Self::Formula(expr) => expr.evaluate(&[m]).unwrap_or(0.0),
            Self::Function(f) => f(m),
        };
        if value.is_nan() { 0.0 } else { value.max(0.0) }
    }
}

/// How raw cost-function output becomes a reported complexity: bit conversion, memory
/// access penalty and the memory bound.
#[derive(Clone, Debug)]
pub struct CostModel {
    bit_complexities: bool,
    access: AccessCost,
    memory_bound: f64,
}

impl CostModel {
    pub fn new(bit_complexities: bool, memory_access: &MemoryAccess, memory_bound: f64) -> Result<Self> {
        Ok(Self {
            bit_complexities,
            access: AccessCost::compile(memory_access)?,
            memory_bound,
        })
    }

    /// Raw counts, no penalty, no bound. Used for asymptotic estimates.
    pub fn asymptotic() -> Self {
        Self {
            bit_complexities: false,
            access: AccessCost::Constant,
            memory_bound: f64::INFINITY,
        }
    }

    pub fn bit_complexities(&self) -> bool {
        self.bit_complexities
    }

    pub fn memory_bound(&self) -> f64 {
        self.memory_bound
    }

    pub fn memory(&self, problem: &ProblemModel, raw_memory: f64) -> f64 {
        if self.bit_complexities {
            problem.memory_bits(raw_memory)
        } else {
            raw_memory
        }
    }

    /// Time part of the conversion only; monotone in `raw_time`.
    pub fn time(&self, problem: &ProblemModel, raw_time: f64) -> f64 {
        if self.bit_complexities {
            problem.time_bits(raw_time)
        } else {
            raw_time
        }
    }

    pub fn penalty(&self, memory: f64) -> f64 {
        self.access.penalty(memory)
    }

    /// Reported complexity of one evaluation. Exceeding the memory bound is infeasible.
    pub fn apply(&self, problem: &ProblemModel, raw: &CostResult) -> Complexity {
        if raw.time.is_nan() || raw.time.is_infinite() {
            return Complexity::INFEASIBLE;
        }
        let memory = self.memory(problem, raw.memory);
        if memory.is_nan() || memory > self.memory_bound {
            return Complexity::INFEASIBLE;
        }
        let time = self.time(problem, raw.time) + self.penalty(memory);
        Complexity::new(time, memory)
    }
}

/// Which cost of a [`CostFunction`] a search minimises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    Standard,
    TildeO,
}

impl Objective {
    pub fn evaluate(
        self,
        cost: &dyn CostFunction,
        problem: &ProblemModel,
        assignment: &Assignment,
        detail: Detail,
    ) -> CostResult {
        match self {
            Objective::Standard => cost.cost(problem, assignment, detail),
            Objective::TildeO => cost.tilde_o_cost(problem, assignment),
        }
    }
}

/// A joint parameter group of one algorithm, seen as a discrete search problem.
pub struct CostSearch<'a> {
    pub cost: &'a dyn CostFunction,
    pub problem: &'a ProblemModel,
    pub model: &'a CostModel,
    pub space: &'a ParameterSpace,
    pub objective: Objective,
    dimensions: Vec<String>,
    fixed: Assignment,
}

impl<'a> CostSearch<'a> {
    pub fn new(
        cost: &'a dyn CostFunction,
        problem: &'a ProblemModel,
        model: &'a CostModel,
        space: &'a ParameterSpace,
        objective: Objective,
        dimensions: Vec<String>,
        fixed: Assignment,
    ) -> Self {
        Self {
            cost,
            problem,
            model,
            space,
            objective,
            dimensions,
            fixed,
        }
    }
}

impl SearchProblem for CostSearch<'_> {
    fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    fn fixed(&self) -> &Assignment {
        &self.fixed
    }

    fn range(&self, name: &str, partial: &Assignment) -> ParameterRange {
        self.space
            .narrowed_range(self.problem, name, partial)
            .unwrap_or(ParameterRange::new(0, 0))
    }

    fn policy(&self, name: &str) -> GridSearchPolicy {
        self.cost.search_policy(name, self.problem)
    }

    fn recenter(&self, name: &str, provisional: &Assignment) -> Option<i64> {
        self.cost.recenter(name, provisional, self.problem)
    }

    fn invalid(&self, assignment: &Assignment) -> bool {
        self.cost.invalid(self.problem, assignment)
    }

    fn lower_bound(&self, assignment: &Assignment) -> Option<f64> {
        // Asymptotic costs have no matching bound.
        if self.objective == Objective::TildeO {
            return None;
        }
        self.cost
            .time_lower_bound(self.problem, assignment)
            .map(|t| self.model.time(self.problem, t))
    }

    fn evaluate(&self, assignment: &Assignment) -> Complexity {
        let raw = self
            .objective
            .evaluate(self.cost, self.problem, assignment, Detail::Summary);
        self.model.apply(self.problem, &raw)
    }
}
