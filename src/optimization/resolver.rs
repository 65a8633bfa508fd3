use crate::core::*;
use crate::optimization::callback::LoggingCallback;
use crate::optimization::cost::{CostFunction, ParameterContext};
use crate::optimization::problem::{CostModel, CostSearch, Objective};
use crate::optimization::solvers::{select_solver, SearchConfig};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::cell::RefCell;
use std::sync::Arc;

/// Work done by a resolver so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Closed-form evaluations plus group searches.
    pub searches: usize,
    pub evaluations: usize,
    pub aborted: usize,
    pub invalid: usize,
    pub sweeps: u32,
}

/// Lazily computes and memoizes the cost-minimizing values of an algorithm's parameters.
///
/// Parameters come from an explicit registry. Independent parameters use the cost function's
/// closed form; joint parameters are searched together with the rest of their group and
/// cached as a whole. A cached name is never searched again. `None` in the cache means the
/// parameter has no feasible value.
pub struct OptimalParameterResolver {
    algorithm: String,
    problem: Arc<ProblemModel>,
    specs: Vec<ParameterSpec>,
    space: ParameterSpace,
    model: CostModel,
    objective: Objective,
    search: SearchConfig,
    cache: RefCell<IndexMap<String, Option<i64>>>,
    report: RefCell<SearchReport>,
}

impl OptimalParameterResolver {
    pub fn new(
        algorithm: &str,
        problem: Arc<ProblemModel>,
        specs: Vec<ParameterSpec>,
        space: ParameterSpace,
        model: CostModel,
        objective: Objective,
        search: SearchConfig,
    ) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            problem,
            specs,
            space,
            model,
            objective,
            search,
            cache: RefCell::new(IndexMap::new()),
            report: RefCell::new(SearchReport::default()),
        }
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    pub fn report(&self) -> SearchReport {
        *self.report.borrow()
    }

    /// Pin `name` to `value` before any search. The value must lie in the declared range.
    pub fn fix(&mut self, name: &str, value: i64) -> Result<()> {
        if !self.specs.iter().any(|s| s.name == name) {
            return Err(self.unknown(name));
        }
        let range = self
            .space
            .narrowed_range(&self.problem, name, &Assignment::new())
            .ok_or_else(|| self.unknown(name))?;
        if !range.contains(value) {
            return Err(EstimatorError::InvalidRange {
                name: format!("{} = {}", name, value),
                min: range.min,
                max: range.max,
            });
        }
        self.cache.get_mut().insert(name.to_string(), Some(value));
        Ok(())
    }

    /// Cached value, without triggering a search.
    pub fn cached(&self, name: &str) -> Option<Option<i64>> {
        self.cache.borrow().get(name).copied()
    }

    pub fn resolve(&self, cost: &dyn CostFunction, name: &str) -> Result<Option<i64>> {
        let idx = self
            .specs
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| self.unknown(name))?;
        Ok(self.resolve_index(cost, idx))
    }

    /// Every registered parameter, in registry order. Runs each search at most once.
    pub fn optimal_assignment(&self, cost: &dyn CostFunction) -> IndexMap<String, Option<i64>> {
        (0..self.specs.len())
            .map(|idx| (self.specs[idx].name.clone(), self.resolve_index(cost, idx)))
            .collect()
    }

    fn unknown(&self, name: &str) -> EstimatorError {
        EstimatorError::UnknownParameter {
            algorithm: self.algorithm.clone(),
            name: name.to_string(),
        }
    }

    fn resolve_index(&self, cost: &dyn CostFunction, idx: usize) -> Option<i64> {
        let name = self.specs[idx].name.clone();
        let cached = self.cached(&name);
        if let Some(value) = cached {
            return value;
        }

        match self.specs[idx].group().map(str::to_string) {
            None => self.resolve_independent(cost, idx),
            Some(group) => {
                self.resolve_group(cost, &group);
                self.cached(&name).flatten()
            }
        }
    }

    /// Values of `names`, or `None` as soon as one of them is undefined.
    fn dependencies(&self, cost: &dyn CostFunction, names: &[String]) -> Option<Assignment> {
        let mut fixed = Assignment::new();
        for name in names {
            let idx = self.specs.iter().position(|s| &s.name == name)?;
            let value = self.resolve_index(cost, idx)?;
            fixed.insert(name.clone(), value);
        }
        Some(fixed)
    }

    fn resolve_independent(&self, cost: &dyn CostFunction, idx: usize) -> Option<i64> {
        let spec = &self.specs[idx];
        let value = self.dependencies(cost, &spec.depends_on).and_then(|fixed| {
            self.report.borrow_mut().searches += 1;
            let range = self
                .space
                .narrowed_range(&self.problem, &spec.name, &fixed)
                .unwrap_or(ParameterRange::new(0, 0));
            if range.is_empty() {
                return None;
            }
            let ctx = ParameterContext {
                problem: &self.problem,
                model: &self.model,
                fixed: &fixed,
                range,
            };
            cost.independent_optimum(&spec.name, &ctx)
                .filter(|v| range.contains(*v))
        });

        debug!("{}: {} = {:?}", self.algorithm, spec.name, value);
        self.cache.borrow_mut().insert(spec.name.clone(), value);
        value
    }

    fn resolve_group(&self, cost: &dyn CostFunction, group: &str) {
        let members: Vec<String> = self
            .specs
            .iter()
            .filter(|s| s.group() == Some(group))
            .map(|s| s.name.clone())
            .collect();

        let mut depends_on: Vec<String> = Vec::new();
        for spec in self.specs.iter().filter(|s| s.group() == Some(group)) {
            for dep in &spec.depends_on {
                if !members.contains(dep) && !depends_on.contains(dep) {
                    depends_on.push(dep.clone());
                }
            }
        }

        let Some(mut fixed) = self.dependencies(cost, &depends_on) else {
            debug!("{}: group {} has an undefined dependency", self.algorithm, group);
            let mut cache = self.cache.borrow_mut();
            for name in members {
                cache.entry(name).or_insert(None);
            }
            return;
        };

        let mut dimensions = Vec::new();
        for name in &members {
            match self.cached(name) {
                Some(Some(value)) => {
                    fixed.insert(name.clone(), value);
                }
                _ => dimensions.push(name.clone()),
            }
        }

        let search = CostSearch::new(
            cost,
            &self.problem,
            &self.model,
            &self.space,
            self.objective,
            dimensions.clone(),
            fixed,
        );
        let (solver, reason) = select_solver(&search, &self.search);
        debug!(
            "{}: searching {} [{}] ({})",
            self.algorithm,
            group,
            dimensions.join(", "),
            reason
        );

        let mut callback = LoggingCallback::new(&self.algorithm, self.search.max_evaluations);
        let result = solver.solve(&search, &mut callback);

        {
            let mut report = self.report.borrow_mut();
            report.searches += 1;
            report.evaluations += result.cost_evals;
            report.aborted += result.aborted_evals;
            report.invalid += result.invalid_skipped;
            report.sweeps += result.sweeps;
        }
        debug!(
            "{}: {} after {} sweeps, {} evaluations ({} aborted): {:?} time {:.4} memory {:.4}",
            self.algorithm,
            result.message,
            result.sweeps,
            result.cost_evals,
            result.aborted_evals,
            result.assignment,
            result.complexity.time,
            result.complexity.memory
        );

        let mut cache = self.cache.borrow_mut();
        for name in dimensions {
            let value = result.assignment.as_ref().and_then(|a| a.get(&name).copied());
            cache.insert(name, value);
        }
    }
}
