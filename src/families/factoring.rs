//! Integer factoring of an `n`-bit RSA modulus.
//!
//! The sieves have no tunable parameters, so their estimators go straight from the problem to a
//! cost without any search.

use crate::core::*;
use crate::estimator::{AlgorithmFamily, Estimator, EstimatorConfig};
use crate::optimization::CostFunction;
use indexmap::IndexMap;
use std::f64::consts::LN_2;

#[derive(Debug)]
pub struct IntegerFactoring;

impl ProblemKind for IntegerFactoring {
    fn name(&self) -> &str {
        "IF"
    }

    /// One operation is a multiplication of `n`-bit integers.
    fn time_bits(&self, parameters: &IndexMap<String, f64>, operations: f64) -> f64 {
        operations + 2.0 * modulus_bits(parameters).log2()
    }

    fn memory_bits(&self, parameters: &IndexMap<String, f64>, elements: f64) -> f64 {
        elements + modulus_bits(parameters).log2()
    }
}

fn modulus_bits(parameters: &IndexMap<String, f64>) -> f64 {
    parameters.get("n").copied().unwrap_or(1.0)
}

fn bits(problem: &ProblemModel) -> Option<f64> {
    problem.parameter("n")
}

/// log2 of `L_N[a, c] = exp(c (ln N)^a (ln ln N)^(1-a))` for an `n`-bit `N`.
pub fn log2_l_notation(n_bits: f64, a: f64, c: f64) -> f64 {
    let ln_n = n_bits * LN_2;
    c * ln_n.powf(a) * ln_n.ln().powf(1.0 - a) / LN_2
}

/// General number field sieve, `L_N[1/3, (64/9)^(1/3)]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberFieldSieve;

impl NumberFieldSieve {
    fn time(n_bits: f64) -> f64 {
        log2_l_notation(n_bits, 1.0 / 3.0, (64.0f64 / 9.0).cbrt())
    }
}

impl CostFunction for NumberFieldSieve {
    fn name(&self) -> &str {
        "NFS"
    }

    /// The sparse linear algebra step stores about the square root of the sieving work.
    fn cost(&self, problem: &ProblemModel, _assignment: &Assignment, detail: Detail) -> CostResult {
        let Some(n) = bits(problem) else {
            return CostResult::infeasible();
        };
        let time = Self::time(n);
        let result = CostResult::new(time, time / 2.0);
        match detail {
            Detail::Summary => result,
            Detail::Diagnostics => result.with_diagnostic("l_notation", DiagnosticValue::Scalar(time)),
        }
    }

    fn supports_tilde_o(&self) -> bool {
        true
    }

    fn tilde_o_cost(&self, problem: &ProblemModel, assignment: &Assignment) -> CostResult {
        self.cost(problem, assignment, Detail::Summary)
    }
}

/// Quadratic sieve, `L_N[1/2, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadraticSieve;

impl CostFunction for QuadraticSieve {
    fn name(&self) -> &str {
        "QS"
    }

    fn cost(&self, problem: &ProblemModel, _assignment: &Assignment, _detail: Detail) -> CostResult {
        let Some(n) = bits(problem) else {
            return CostResult::infeasible();
        };
        let time = log2_l_notation(n, 0.5, 1.0);
        CostResult::new(time, time / 2.0)
    }

    fn supports_tilde_o(&self) -> bool {
        true
    }

    fn tilde_o_cost(&self, problem: &ProblemModel, assignment: &Assignment) -> CostResult {
        self.cost(problem, assignment, Detail::Summary)
    }
}

/// Division by every candidate up to `sqrt(N)`. Only useful as a baseline.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrialDivision;

impl CostFunction for TrialDivision {
    fn name(&self) -> &str {
        "TrialDivision"
    }

    fn cost(&self, problem: &ProblemModel, _assignment: &Assignment, _detail: Detail) -> CostResult {
        match bits(problem) {
            Some(n) => CostResult::new(n / 2.0, 0.0),
            None => CostResult::infeasible(),
        }
    }
}

pub fn if_problem(n_bits: u64, options: ProblemOptions) -> Result<ProblemModel> {
    if n_bits < 2 {
        return Err(EstimatorError::domain(format!(
            "modulus must have at least 2 bits, got {}",
            n_bits
        )));
    }
    let mut parameters = IndexMap::new();
    parameters.insert("n".to_string(), n_bits as f64);
    ProblemModel::new(IntegerFactoring, parameters, options)
}

pub fn family() -> AlgorithmFamily {
    AlgorithmFamily::new("IF")
        .with(NumberFieldSieve)
        .with(QuadraticSieve)
        .with(TrialDivision)
        .excluded_by_default("TrialDivision")
}

pub fn if_estimator(n_bits: u64, config: &EstimatorConfig) -> Result<Estimator> {
    let problem = if_problem(n_bits, config.problem_options())?;
    Estimator::new(problem, family(), config)
}
