use super::parameters;
use crate::core::*;
use crate::families::helpers::{
    gaussian_elimination_complexity, log2_binomial, log2_list_merge, log2_sum, matrix_memory,
};
use crate::optimization::{CostFunction, GridSearchPolicy, ParameterContext};

/// Dumer's variant: the information set is extended by `l` coordinates and each half of the
/// extended set carries `p` errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dumer;

impl CostFunction for Dumer {
    fn name(&self) -> &str {
        "Dumer"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::independent("r"),
            ParameterSpec::joint("p", "isd").depends_on(&["r"]),
            ParameterSpec::joint("l", "isd").depends_on(&["r"]),
        ]
    }

    fn declare_space(&self, problem: &ProblemModel, space: &mut ParameterSpace, full_domain: bool) -> Result<()> {
        let (n, k, _, _) = parameters(problem).ok_or_else(|| EstimatorError::domain("not an SD instance"))?;
        let (p_max, l_max) = if full_domain {
            (n, n - k)
        } else {
            (20, (n - k).min(400))
        };
        space.set_range("r", 0, (n - k).max(1))?;
        space.set_range("p", 0, p_max + 1)?;
        space.set_range("l", 0, l_max)?;
        space.constrain(problem, "p", Relation::LessThanOrEqual, "w/2")?;
        space.constrain(problem, "l", Relation::LessThanOrEqual, "n - k - w + 2*p")
    }

    fn search_policy(&self, name: &str, _problem: &ProblemModel) -> GridSearchPolicy {
        match name {
            "p" => GridSearchPolicy::new(3, 1),
            _ => GridSearchPolicy::new(10, 4),
        }
    }

    fn recenter(&self, name: &str, provisional: &Assignment, problem: &ProblemModel) -> Option<i64> {
        if name != "l" {
            return None;
        }
        let (_, k, _, _) = parameters(problem)?;
        Some(log2_binomial(k / 2, *provisional.get("p")?) as i64)
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
        (k + l) / 2 < p || n - k - l < w - 2 * p
    }

    fn time_lower_bound(&self, problem: &ProblemModel, assignment: &Assignment) -> Option<f64> {
        let (_, k, _, _) = parameters(problem)?;
        let (p, l) = (*assignment.get("p")?, *assignment.get("l")?);
        Some(log2_binomial((k + l) / 2, p))
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

        let list = log2_binomial((k + l) / 2, p);
        let memory = log2_sum(1.0 + list, matrix_memory(n, k, r).log2());
        let permutations = (log2_binomial(n, w)
            - log2_binomial(n - k - l, w - 2 * p)
            - 2.0 * list
            - problem.nsolutions())
        .max(0.0);
        let gauss = gaussian_elimination_complexity(n, k, r).log2();
        let time = permutations + log2_sum(gauss, log2_list_merge(list, l));

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
