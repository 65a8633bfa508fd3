use crate::core::{
    Assignment, CostResult, Detail, ParameterRange, ParameterSpace, ParameterSpec, ProblemModel,
    Result,
};
use crate::optimization::problem::CostModel;
use crate::optimization::solvers::GridSearchPolicy;

/// Everything an independent parameter's closed form may look at.
pub struct ParameterContext<'a> {
    pub problem: &'a ProblemModel,
    pub model: &'a CostModel,
    /// Already resolved parameters this one depends on.
    pub fixed: &'a Assignment,
    /// Declared range, narrowed given `fixed`.
    pub range: ParameterRange,
}

/// Cost formula of one concrete algorithm.
///
/// Implementations are pure: the same problem and assignment always give the same result.
/// Times and memories are log2 basic operations and log2 stored elements; conversion to bit
/// complexity and memory-access penalties are applied by the engine.
pub trait CostFunction: Send + Sync {
    fn name(&self) -> &str;

    /// Optimal parameters, in resolution and display order.
    fn parameters(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    /// Declare ranges (and dependent range constraints) for every registered parameter.
    fn declare_space(
        &self,
        _problem: &ProblemModel,
        _space: &mut ParameterSpace,
        _full_domain: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn search_policy(&self, _name: &str, _problem: &ProblemModel) -> GridSearchPolicy {
        GridSearchPolicy::default()
    }

    /// Centre for `name`'s search window given the provisional best assignment.
    fn recenter(&self, _name: &str, _provisional: &Assignment, _problem: &ProblemModel) -> Option<i64> {
        None
    }

    /// Closed-form optimum of an independent parameter; `None` if nothing is feasible.
    fn independent_optimum(&self, _name: &str, _ctx: &ParameterContext<'_>) -> Option<i64> {
        None
    }

    fn invalid(&self, _problem: &ProblemModel, _assignment: &Assignment) -> bool {
        false
    }

    /// Cheap lower bound on `cost(..).time`, used to abandon hopeless candidates.
    fn time_lower_bound(&self, _problem: &ProblemModel, _assignment: &Assignment) -> Option<f64> {
        None
    }

    fn cost(&self, problem: &ProblemModel, assignment: &Assignment, detail: Detail) -> CostResult;

    fn supports_tilde_o(&self) -> bool {
        false
    }

    /// Asymptotic cost omitting polynomial factors.
    fn tilde_o_cost(&self, _problem: &ProblemModel, _assignment: &Assignment) -> CostResult {
        CostResult::infeasible()
    }

    fn supports_quantum(&self) -> bool {
        false
    }

    /// log2 quantum basic operations, `None` when infeasible at `assignment`.
    fn quantum_time(&self, _problem: &ProblemModel, _assignment: &Assignment) -> Option<f64> {
        None
    }

    /// Parameters left out of reports unless all parameters are requested.
    fn hidden_parameters(&self) -> &[&str] {
        &[]
    }
}
