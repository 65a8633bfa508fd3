use super::parameters;
use crate::core::*;
use crate::families::helpers::{
    gaussian_elimination_complexity, log2_binomial, log2_list_merge, log2_sum, matrix_memory,
};
use crate::optimization::{CostFunction, GridSearchPolicy, ParameterContext};

/// Stern's algorithm: split the information set in two halves carrying `p/2` errors each and
/// match the halves on `l` coordinates of the syndrome.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stern;

impl CostFunction for Stern {
    fn name(&self) -> &str {
        "Stern"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::independent("r"),
            ParameterSpec::joint("p", "isd").depends_on(&["r"]),
            ParameterSpec::joint("l", "isd").depends_on(&["r"]),
        ]
    }

    fn declare_space(&self, problem: &ProblemModel, space: &mut ParameterSpace, full_domain: bool) -> Result<()> {
        let (n, k, w, _) = parameters(problem).ok_or_else(|| EstimatorError::domain("not an SD instance"))?;
        let (p_max, l_max) = if full_domain {
            (w, n - k)
        } else {
            (w.min(20), (n - k).min(400))
        };
        space.set_range("r", 0, (n - k).max(1))?;
        space.set_range("p", 0, p_max + 1)?;
        space.set_range("l", 0, l_max)?;
        space.constrain(problem, "l", Relation::LessThanOrEqual, "n - k - w + p")
    }

    fn search_policy(&self, name: &str, _problem: &ProblemModel) -> GridSearchPolicy {
        match name {
            "p" => GridSearchPolicy::new(3, 2),
            _ => GridSearchPolicy::new(10, 4),
        }
    }

    /// Matching on about `log2 |L1|` bits keeps the merged list the size of its inputs.
    fn recenter(&self, name: &str, provisional: &Assignment, problem: &ProblemModel) -> Option<i64> {
        if name != "l" {
            return None;
        }
        let (_, k, _, _) = parameters(problem)?;
        let p = *provisional.get("p")?;
        Some(log2_binomial(k / 2, p / 2) as i64)
    }

    fn independent_optimum(&self, name: &str, ctx: &ParameterContext<'_>) -> Option<i64> {
        super::Prange.independent_optimum(name, ctx)
    }

    fn invalid(&self, problem: &ProblemModel, assignment: &Assignment) -> bool {
        let Some((n, k, w, _)) = parameters(problem) else {
            return true;
        };
        let (Some(&p), Some(&l)) = (assignment.get("p"), assignment.get("l")) else {
            return true;
        };
        p % 2 == 1 || p / 2 > k / 2 || n - k - l < w - p
    }

    fn time_lower_bound(&self, problem: &ProblemModel, assignment: &Assignment) -> Option<f64> {
        let (_, k, _, _) = parameters(problem)?;
        Some(log2_binomial(k / 2, assignment.get("p")? / 2))
    }

    fn cost(&self, problem: &ProblemModel, assignment: &Assignment, detail: Detail) -> CostResult {
        let Some((n, k, w, q)) = parameters(problem) else {
            return CostResult::infeasible();
        };
        let (Some(&r), Some(&p), Some(&l)) = (assignment.get("r"), assignment.get("p"), assignment.get("l")) else {
            return CostResult::infeasible();
        };
        if q != 2 || self.invalid(problem, assignment) {
            return CostResult::infeasible();
        }

        let k1 = k / 2;
        let list = log2_binomial(k1, p / 2);
        let memory = log2_sum(1.0 + list, matrix_memory(n, k, r).log2());

        let permutations = (log2_binomial(n, w)
            - log2_binomial(n - k, w - p)
            - 2.0 * list
            - problem.nsolutions())
        .max(0.0);

        // Projections needed until one of the expected solutions has no error on the `l`
        // matched coordinates.
        let remaining = log2_binomial(n - k, w - p) + 2.0 * list - (n - k) as f64;
        let mut projections = log2_binomial(n - k, w - p) - log2_binomial(n - k - l, w - p);
        if remaining > 0.0 {
            projections -= remaining;
        }
        let projections = projections.max(0.0);

        let gauss = gaussian_elimination_complexity(n, k, r).log2();
        let time = permutations + log2_sum(gauss, log2_list_merge(list, l) + projections);

        let result = CostResult::new(time, memory);
        match detail {
            Detail::Summary => result,
            Detail::Diagnostics => result
                .with_diagnostic("constraints", DiagnosticValue::List(vec![l as f64]))
                .with_diagnostic("permutations", DiagnosticValue::Scalar(permutations))
                .with_diagnostic("gauss", DiagnosticValue::Scalar(gauss))
                .with_diagnostic(
                    "lists",
                    DiagnosticValue::List(vec![list, 2.0 * list - l as f64]),
                ),
        }
    }

    fn hidden_parameters(&self) -> &[&str] {
        &["r"]
    }
}
