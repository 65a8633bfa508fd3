use crate::core::*;
use crate::estimator::config::EstimatorConfig;
use crate::optimization::{CostFunction, CostModel, Objective, OptimalParameterResolver, SearchReport};
use indexmap::IndexMap;
use log::debug;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// One cost formula bound to a problem instance.
///
/// The optimal assignment is searched on first use and shared by every metric afterwards.
pub struct AlgorithmVariant {
    cost: Box<dyn CostFunction>,
    problem: Arc<ProblemModel>,
    resolver: OptimalParameterResolver,
    tilde_o: Option<OptimalParameterResolver>,
    complexity: OnceCell<Complexity>,
    tilde_o_complexity: OnceCell<Complexity>,
}

impl AlgorithmVariant {
    pub fn new(
        cost: Box<dyn CostFunction>,
        problem: Arc<ProblemModel>,
        config: &EstimatorConfig,
    ) -> Result<Self> {
        let mut space = ParameterSpace::new();
        cost.declare_space(&problem, &mut space, config.full_domain)?;
        let specs = cost.parameters();
        validate_registry(cost.name(), &specs, &space)?;

        let model = CostModel::new(
            config.bit_complexities,
            &config.memory_access,
            problem.memory_bound(),
        )?;

        let tilde_o = cost.supports_tilde_o().then(|| {
            OptimalParameterResolver::new(
                cost.name(),
                problem.clone(),
                specs.clone(),
                space.clone(),
                CostModel::asymptotic(),
                Objective::TildeO,
                config.search,
            )
        });
        let resolver = OptimalParameterResolver::new(
            cost.name(),
            problem.clone(),
            specs,
            space,
            model,
            Objective::Standard,
            config.search,
        );

        Ok(Self {
            cost,
            problem,
            resolver,
            tilde_o,
            complexity: OnceCell::new(),
            tilde_o_complexity: OnceCell::new(),
        })
    }

    /// Pin parameters to given values instead of searching them.
    pub fn with_fixed_parameters(mut self, fixed: &Assignment) -> Result<Self> {
        for (name, &value) in fixed {
            self.resolver.fix(name, value)?;
            if let Some(tilde_o) = self.tilde_o.as_mut() {
                tilde_o.fix(name, value)?;
            }
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        self.cost.name()
    }

    pub fn problem(&self) -> &ProblemModel {
        &self.problem
    }

    /// Time and memory at the optimal assignment, `(+inf, +inf)` when nothing is feasible.
    pub fn complexity(&self) -> Complexity {
        *self.complexity.get_or_init(|| {
            let complexity = match self.complete_assignment() {
                Some(assignment) => {
                    let raw = self.cost.cost(&self.problem, &assignment, Detail::Summary);
                    self.resolver.model().apply(&self.problem, &raw)
                }
                None => Complexity::INFEASIBLE,
            };
            debug!(
                "{} on {}: time {:.4} memory {:.4}",
                self.name(),
                self.problem,
                complexity.time,
                complexity.memory
            );
            complexity
        })
    }

    pub fn time_complexity(&self) -> f64 {
        self.complexity().time
    }

    pub fn memory_complexity(&self) -> f64 {
        self.complexity().memory
    }

    pub fn is_feasible(&self) -> bool {
        self.complexity().is_feasible()
    }

    /// Every registered parameter at its optimum, `None` where undefined.
    pub fn optimal_parameters(&self) -> IndexMap<String, Option<i64>> {
        self.resolver.optimal_assignment(self.cost.as_ref())
    }

    pub fn parameter(&self, name: &str) -> Result<Option<i64>> {
        self.resolver.resolve(self.cost.as_ref(), name)
    }

    /// Optimal parameters for reports, without internal ones unless `show_all`.
    pub fn display_parameters(&self, show_all: bool) -> IndexMap<String, Option<i64>> {
        self.visible(self.optimal_parameters(), show_all)
    }

    /// Parameters minimising the asymptotic cost, filtered like
    /// [`AlgorithmVariant::display_parameters`].
    pub fn tilde_o_parameters(&self, show_all: bool) -> Result<IndexMap<String, Option<i64>>> {
        let resolver = self.tilde_o_resolver()?;
        Ok(self.visible(resolver.optimal_assignment(self.cost.as_ref()), show_all))
    }

    fn visible(
        &self,
        parameters: IndexMap<String, Option<i64>>,
        show_all: bool,
    ) -> IndexMap<String, Option<i64>> {
        let hidden = self.cost.hidden_parameters();
        parameters
            .into_iter()
            .filter(|(name, _)| show_all || !hidden.contains(&name.as_str()))
            .collect()
    }

    /// Breakdown of the cost at the optimum. Evaluates the cost function once more.
    pub fn diagnostics(&self) -> Diagnostics {
        if !self.is_feasible() {
            return Diagnostics::new();
        }
        match self.complete_assignment() {
            Some(assignment) => {
                self.cost
                    .cost(&self.problem, &assignment, Detail::Diagnostics)
                    .diagnostics
            }
            None => Diagnostics::new(),
        }
    }

    fn tilde_o_resolver(&self) -> Result<&OptimalParameterResolver> {
        self.tilde_o
            .as_ref()
            .ok_or_else(|| EstimatorError::unsupported(self.name(), "tilde-O complexity"))
    }

    pub fn tilde_o_complexity(&self) -> Result<Complexity> {
        let resolver = self.tilde_o_resolver()?;

        Ok(*self.tilde_o_complexity.get_or_init(|| {
            let assignment = resolver.optimal_assignment(self.cost.as_ref());
            match complete(&assignment) {
                Some(assignment) => {
                    let raw = self.cost.tilde_o_cost(&self.problem, &assignment);
                    resolver.model().apply(&self.problem, &raw)
                }
                None => Complexity::INFEASIBLE,
            }
        }))
    }

    pub fn tilde_o_time(&self) -> Result<f64> {
        Ok(self.tilde_o_complexity()?.time)
    }

    pub fn tilde_o_memory(&self) -> Result<f64> {
        Ok(self.tilde_o_complexity()?.memory)
    }

    /// Quantum time at the classical optimum.
    pub fn quantum_time_complexity(&self) -> Result<f64> {
        if !self.cost.supports_quantum() {
            return Err(EstimatorError::unsupported(self.name(), "quantum complexity"));
        }
        let time = match self.complete_assignment() {
            Some(assignment) if self.is_feasible() => self
                .cost
                .quantum_time(&self.problem, &assignment)
                .map_or(f64::INFINITY, |t| self.resolver.model().time(&self.problem, t)),
            _ => f64::INFINITY,
        };
        Ok(time)
    }

    pub fn search_report(&self) -> SearchReport {
        self.resolver.report()
    }

    fn complete_assignment(&self) -> Option<Assignment> {
        complete(&self.optimal_parameters())
    }
}

impl fmt::Debug for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmVariant")
            .field("name", &self.name())
            .field("problem", &self.problem.to_string())
            .finish()
    }
}

impl fmt::Display for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} estimator for {}", self.name(), self.problem)
    }
}

/// `Some` only when every parameter has a value.
fn complete(assignment: &IndexMap<String, Option<i64>>) -> Option<Assignment> {
    assignment
        .iter()
        .map(|(name, value)| value.map(|v| (name.clone(), v)))
        .collect()
}
