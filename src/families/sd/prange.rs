use super::parameters;
use crate::core::*;
use crate::families::helpers::{
    gaussian_elimination_complexity, log2_binomial, log2_binomial_approx, matrix_memory,
};
use crate::optimization::{CostFunction, ParameterContext};

/// Prange's information set decoding: guess an error-free information set and solve the
/// remaining linear system.
///
/// The only parameter is the four-Russians block size `r` of the Gaussian elimination, whose
/// optimum follows from `n` and `k` alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Prange;

impl Prange {
    /// log2 expected number of permutations until the error avoids the information set.
    fn permutations(n: i64, k: i64, w: i64, nsolutions: f64) -> f64 {
        (log2_binomial(n, w) - log2_binomial(n - k, w) - nsolutions).max(0.0)
    }
}

impl CostFunction for Prange {
    fn name(&self) -> &str {
        "Prange"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::independent("r")]
    }

    fn declare_space(&self, problem: &ProblemModel, space: &mut ParameterSpace, _full_domain: bool) -> Result<()> {
        let (n, k, _, _) = parameters(problem).ok_or_else(|| EstimatorError::domain("not an SD instance"))?;
        space.set_range("r", 0, (n - k).max(1))
    }

    /// Block size with the cheapest elimination whose table still fits the memory bound.
    fn independent_optimum(&self, name: &str, ctx: &ParameterContext<'_>) -> Option<i64> {
        if name != "r" {
            return None;
        }
        let (n, k, _, _) = parameters(ctx.problem)?;
        let mut best: Option<(i64, f64)> = None;
        for r in ctx.range.values() {
            let memory = ctx.model.memory(ctx.problem, matrix_memory(n, k, r).log2());
            if memory > ctx.model.memory_bound() {
                continue;
            }
            let time = gaussian_elimination_complexity(n, k, r).log2();
            if best.is_none_or(|(_, t)| time < t) {
                best = Some((r, time));
            }
        }
        best.map(|(r, _)| r)
    }

    fn cost(&self, problem: &ProblemModel, assignment: &Assignment, detail: Detail) -> CostResult {
        let (Some((n, k, w, _)), Some(&r)) = (parameters(problem), assignment.get("r")) else {
            return CostResult::infeasible();
        };

        let permutations = Self::permutations(n, k, w, problem.nsolutions());
        let gauss = gaussian_elimination_complexity(n, k, r).log2();
        let result = CostResult::new(permutations + gauss, matrix_memory(n, k, r).log2());

        match detail {
            Detail::Summary => result,
            Detail::Diagnostics => result
                .with_diagnostic("permutations", DiagnosticValue::Scalar(permutations))
                .with_diagnostic("gauss", DiagnosticValue::Scalar(gauss)),
        }
    }

    fn supports_tilde_o(&self) -> bool {
        true
    }

    fn tilde_o_cost(&self, problem: &ProblemModel, _assignment: &Assignment) -> CostResult {
        let Some((n, k, w, _)) = parameters(problem) else {
            return CostResult::infeasible();
        };
        let (n, k, w) = (n as f64, k as f64, w as f64);
        let time = log2_binomial_approx(n, w) - log2_binomial_approx(n - k, w) - problem.nsolutions();
        CostResult::new(time.max(0.0), 0.0)
    }

    fn supports_quantum(&self) -> bool {
        true
    }

    /// Grover search over the permutations.
    fn quantum_time(&self, problem: &ProblemModel, assignment: &Assignment) -> Option<f64> {
        let (n, k, w, _) = parameters(problem)?;
        let r = *assignment.get("r")?;
        let permutations = Self::permutations(n, k, w, problem.nsolutions());
        Some(permutations / 2.0 + gaussian_elimination_complexity(n, k, r).log2())
    }

    fn hidden_parameters(&self) -> &[&str] {
        &["r"]
    }
}
