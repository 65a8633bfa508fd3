//! Syndrome decoding: find `e` of weight `w` with `He = s` for a random `(n - k) x n` parity
//! check matrix `H` over `F_q`.

mod dumer;
mod prange;
mod stern;

pub use dumer::Dumer;
pub use prange::Prange;
pub use stern::Stern;

use crate::core::*;
use crate::estimator::{AlgorithmFamily, Estimator, EstimatorConfig};
use crate::families::helpers::{is_prime_power, log2_binomial};
use indexmap::IndexMap;

#[derive(Debug)]
pub struct SyndromeDecoding;

impl ProblemKind for SyndromeDecoding {
    fn name(&self) -> &str {
        "SD"
    }

    fn expected_solutions(&self, parameters: &IndexMap<String, f64>) -> Option<f64> {
        let (n, k, w, q) = unpack(parameters.values().copied())?;
        let q = q as f64;
        Some(log2_binomial(n, w) + w as f64 * (q - 1.0).log2() - (n - k) as f64 * q.log2())
    }

    fn time_bits(&self, parameters: &IndexMap<String, f64>, operations: f64) -> f64 {
        operations + element_bits(parameters)
    }

    fn memory_bits(&self, parameters: &IndexMap<String, f64>, elements: f64) -> f64 {
        elements + element_bits(parameters)
    }
}

/// log2 of the bits one row operation touches: `n log2 q`.
fn element_bits(parameters: &IndexMap<String, f64>) -> f64 {
    let n = parameters.get("n").copied().unwrap_or(1.0);
    let q = parameters.get("q").copied().unwrap_or(2.0);
    n.log2() + q.log2().log2()
}

fn unpack(values: impl Iterator<Item = f64>) -> Option<(i64, i64, i64, u64)> {
    match values.collect::<Vec<f64>>()[..] {
        [n, k, w, q] => Some((n as i64, k as i64, w as i64, q as u64)),
        _ => None,
    }
}

/// `(n, k, w, q)` of a syndrome decoding instance.
pub(crate) fn parameters(problem: &ProblemModel) -> Option<(i64, i64, i64, u64)> {
    unpack(problem.parameters().into_iter())
}

/// Binary syndrome decoding instance.
pub fn sd_problem(n: u64, k: u64, w: u64, options: ProblemOptions) -> Result<ProblemModel> {
    sd_problem_over(n, k, w, 2, options)
}

pub fn sd_problem_over(n: u64, k: u64, w: u64, q: u64, options: ProblemOptions) -> Result<ProblemModel> {
    if n == 0 {
        return Err(EstimatorError::domain("n must be positive"));
    }
    if k == 0 || k > n {
        return Err(EstimatorError::domain(format!(
            "k must satisfy 0 < k <= n, got k = {}, n = {}",
            k, n
        )));
    }
    if w == 0 || w > n - k {
        return Err(EstimatorError::domain(format!(
            "w must satisfy 0 < w <= n - k, got w = {}, n - k = {}",
            w,
            n - k
        )));
    }
    if !is_prime_power(q) {
        return Err(EstimatorError::domain(format!(
            "q must be a prime power, got {}",
            q
        )));
    }

    let parameters: IndexMap<String, f64> = [("n", n), ("k", k), ("w", w), ("q", q)]
        .into_iter()
        .map(|(name, v)| (name.to_string(), v as f64))
        .collect();
    ProblemModel::new(SyndromeDecoding, parameters, options)
}

/// Information set decoding algorithms.
pub fn family() -> AlgorithmFamily {
    AlgorithmFamily::new("SD")
        .with(Prange)
        .with(Stern)
        .with(Dumer)
}

/// Estimator for binary syndrome decoding.
pub fn sd_estimator(n: u64, k: u64, w: u64, config: &EstimatorConfig) -> Result<Estimator> {
    let problem = sd_problem(n, k, w, config.problem_options())?;
    Estimator::new(problem, family(), config)
}
