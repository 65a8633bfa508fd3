use crate::core::constraints::detect_cycles;
use crate::core::error::{EstimatorError, Result};
use crate::core::expression::CompiledExpression;
use crate::core::problem::ProblemModel;
use crate::core::types::Assignment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open integer interval `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: i64,
    pub max: i64,
}

impl ParameterRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn len(&self) -> u64 {
        (self.max - self.min).max(0) as u64
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value < self.max
    }

    /// Intersection; an empty result keeps `min == max`.
    pub fn intersect(&self, other: &ParameterRange) -> ParameterRange {
        ParameterRange::new(self.min.max(other.min), self.max.min(other.max))
    }

    pub fn values(&self) -> std::ops::Range<i64> {
        self.min..self.max
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equals,
}

impl Relation {
    /// The integer range `{x : x <relation> value}`.
    fn as_range(self, value: f64) -> ParameterRange {
        if value.is_nan() {
            return ParameterRange::new(0, 0);
        }
        let (lo, hi) = (i64::MIN, i64::MAX);
        match self {
            Relation::LessThan => ParameterRange::new(lo, value.ceil() as i64),
            Relation::LessThanOrEqual => {
                ParameterRange::new(lo, (value.floor() as i64).saturating_add(1))
            }
            Relation::GreaterThan => {
                ParameterRange::new((value.floor() as i64).saturating_add(1), hi)
            }
            Relation::GreaterThanOrEqual => ParameterRange::new(value.ceil() as i64, hi),
            Relation::Equals if value.fract() == 0.0 => {
                ParameterRange::new(value as i64, (value as i64).saturating_add(1))
            }
            Relation::Equals => ParameterRange::new(0, 0),
        }
    }
}

/// `target <relation> expression`, the expression ranging over problem parameters and the
/// algorithm's other parameters (its sources).
#[derive(Clone, Debug)]
pub struct RangeConstraint {
    pub target: String,
    pub relation: Relation,
    pub sources: Vec<String>,
    expression: CompiledExpression,
}

impl RangeConstraint {
    pub fn expression(&self) -> &str {
        self.expression.source()
    }

    fn bound(&self, problem: &ProblemModel, fixed: &Assignment) -> Option<ParameterRange> {
        if !self.sources.iter().all(|s| fixed.contains_key(s)) {
            return None;
        }
        let value = self.expression.evaluate_with(|name| {
            fixed
                .get(name)
                .map(|&v| v as f64)
                .or_else(|| problem.parameter(name))
        });
        // Undefined bounds (e.g. a zero divisor) leave nothing feasible.
        Some(match value {
            Ok(v) => self.relation.as_range(v),
            Err(_) => ParameterRange::new(0, 0),
        })
    }
}

/// Search ranges of one algorithm's parameters.
///
/// Declared ranges change only through [`ParameterSpace::set_range`]; dependent bounds are
/// applied by [`ParameterSpace::narrow_given`], which returns a fresh view.
#[derive(Clone, Debug, Default)]
pub struct ParameterSpace {
    ranges: IndexMap<String, ParameterRange>,
    constraints: Vec<RangeConstraint>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_range(&mut self, name: &str, min: i64, max_exclusive: i64) -> Result<()> {
        if min > max_exclusive {
            return Err(EstimatorError::InvalidRange {
                name: name.to_string(),
                min,
                max: max_exclusive,
            });
        }
        self.ranges
            .insert(name.to_string(), ParameterRange::new(min, max_exclusive));
        Ok(())
    }

    /// Add `target <relation> expression`. Variables are the problem's parameters plus every
    /// parameter declared so far.
    pub fn constrain(
        &mut self,
        problem: &ProblemModel,
        target: &str,
        relation: Relation,
        expression: &str,
    ) -> Result<()> {
        if !self.ranges.contains_key(target) {
            return Err(EstimatorError::UnknownParameter {
                algorithm: problem.name().to_string(),
                name: target.to_string(),
            });
        }

        let mut variables = problem.parameter_names();
        for name in self.ranges.keys() {
            if !variables.contains(name) {
                variables.push(name.clone());
            }
        }

        // Recompile over the names actually read, so evaluation only needs those values.
        let referenced: Vec<String> = CompiledExpression::new(expression, &variables)?
            .referenced_variables()
            .into_iter()
            .map(str::to_string)
            .collect();
        let expression = CompiledExpression::new(expression, &referenced)?;
        let sources: Vec<String> = referenced
            .iter()
            .filter(|v| self.ranges.contains_key(*v))
            .cloned()
            .collect();

        if sources.iter().any(|s| s == target) {
            return Err(EstimatorError::CyclicDependency(format!(
                "range of '{}' refers to itself",
                target
            )));
        }

        self.constraints.push(RangeConstraint {
            target: target.to_string(),
            relation,
            sources,
            expression,
        });

        let names: Vec<String> = self.ranges.keys().cloned().collect();
        let result = detect_cycles(
            &names,
            self.constraints.iter().flat_map(|c| {
                c.sources
                    .iter()
                    .map(move |s| (s.as_str(), c.target.as_str()))
            }),
        );
        if result.is_err() {
            self.constraints.pop();
        }
        result
    }

    pub fn range(&self, name: &str) -> Option<ParameterRange> {
        self.ranges.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParameterRange)> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn constraints(&self) -> &[RangeConstraint] {
        &self.constraints
    }

    pub fn contains(&self, name: &str, value: i64) -> bool {
        self.range(name).is_some_and(|r| r.contains(value))
    }

    /// New view with every constraint whose sources are all fixed applied to its target.
    /// Ranges only shrink; `self` is left untouched.
    pub fn narrow_given(&self, problem: &ProblemModel, fixed: &Assignment) -> ParameterSpace {
        let mut narrowed = self.clone();
        for (name, range) in narrowed.ranges.iter_mut() {
            if let Some(r) = self.narrowed_range(problem, name, fixed) {
                *range = r;
            }
        }
        narrowed
    }

    /// Range of a single parameter under `fixed`, without building a new space.
    pub fn narrowed_range(
        &self,
        problem: &ProblemModel,
        name: &str,
        fixed: &Assignment,
    ) -> Option<ParameterRange> {
        let mut range = self.range(name)?;
        for constraint in self.constraints.iter().filter(|c| c.target == name) {
            if let Some(bound) = constraint.bound(problem, fixed) {
                range = range.intersect(&bound);
            }
        }
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::problem::{ProblemKind, ProblemOptions};

    #[derive(Debug)]
    struct Code;

    impl ProblemKind for Code {
        fn name(&self) -> &str {
            "Code"
        }
    }

    fn problem() -> ProblemModel {
        let params = [("n", 100.0), ("k", 50.0), ("w", 10.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        ProblemModel::new(Code, params, ProblemOptions::default()).unwrap()
    }

    #[test]
    fn set_range_rejects_inverted_bounds() {
        let mut space = ParameterSpace::new();
        assert!(space.set_range("p", 5, 4).is_err());
        assert!(space.set_range("p", 4, 4).is_ok());
        assert!(space.range("p").unwrap().is_empty());
    }

    #[test]
    fn narrow_given_applies_dependent_bounds_without_mutating() {
        let problem = problem();
        let mut space = ParameterSpace::new();
        space.set_range("p", 0, 20).unwrap();
        space.set_range("l", 0, 400).unwrap();
        space
            .constrain(&problem, "p", Relation::LessThanOrEqual, "w/2")
            .unwrap();
        space
            .constrain(&problem, "l", Relation::LessThanOrEqual, "n - k - w + 2*p")
            .unwrap();

        // Problem-only constraints apply immediately, dependent ones wait for `p`.
        let view = space.narrow_given(&problem, &Assignment::new());
        assert_eq!(view.range("p"), Some(ParameterRange::new(0, 6)));
        assert_eq!(view.range("l"), Some(ParameterRange::new(0, 400)));

        let fixed: Assignment = [("p".to_string(), 2)].into_iter().collect();
        let view = space.narrow_given(&problem, &fixed);
        assert_eq!(view.range("l"), Some(ParameterRange::new(0, 45)));
        assert_eq!(
            space.narrowed_range(&problem, "l", &fixed),
            Some(ParameterRange::new(0, 45))
        );

        assert_eq!(space.range("l"), Some(ParameterRange::new(0, 400)));
    }

    #[test]
    fn constraint_needs_only_the_values_it_reads() {
        let problem = problem();
        let mut space = ParameterSpace::new();
        space.set_range("r", 0, 50).unwrap();
        space.set_range("p", 0, 20).unwrap();
        space.set_range("l", 0, 400).unwrap();
        space
            .constrain(&problem, "l", Relation::LessThanOrEqual, "n - k - w + p")
            .unwrap();
        assert_eq!(space.constraints()[0].sources, vec!["p"]);

        // `r` is present but unused; `l` itself is absent.
        for p in 0..20 {
            let fixed: Assignment = [("r".to_string(), 4), ("p".to_string(), p)].into_iter().collect();
            let range = space.narrowed_range(&problem, "l", &fixed).unwrap();
            assert_eq!(range, ParameterRange::new(0, 41 + p));
        }
    }

    #[test]
    fn narrowing_never_widens() {
        let problem = problem();
        let mut space = ParameterSpace::new();
        space.set_range("p", 3, 5).unwrap();
        space
            .constrain(&problem, "p", Relation::GreaterThanOrEqual, "0")
            .unwrap();
        space
            .constrain(&problem, "p", Relation::LessThan, "n")
            .unwrap();
        let view = space.narrow_given(&problem, &Assignment::new());
        assert_eq!(view.range("p"), Some(ParameterRange::new(3, 5)));
    }

    #[test]
    fn contradictory_bounds_give_empty_range() {
        let problem = problem();
        let mut space = ParameterSpace::new();
        space.set_range("p", 0, 10).unwrap();
        space
            .constrain(&problem, "p", Relation::GreaterThan, "k")
            .unwrap();
        let view = space.narrow_given(&problem, &Assignment::new());
        let range = view.range("p").unwrap();
        assert!(range.is_empty());
        assert!(range.min <= range.max);
    }

    #[test]
    fn rejects_cyclic_constraints() {
        let problem = problem();
        let mut space = ParameterSpace::new();
        space.set_range("a", 0, 10).unwrap();
        space.set_range("b", 0, 10).unwrap();
        space
            .constrain(&problem, "a", Relation::LessThan, "b")
            .unwrap();
        let err = space
            .constrain(&problem, "b", Relation::LessThan, "a + 1")
            .unwrap_err();
        assert!(matches!(err, EstimatorError::CyclicDependency(_)));
        assert_eq!(space.constraints().len(), 1);
        assert!(space.constrain(&problem, "a", Relation::LessThan, "a").is_err());
    }

    #[test]
    fn relation_rounding() {
        assert_eq!(Relation::LessThan.as_range(4.5).max, 5);
        assert_eq!(Relation::LessThan.as_range(4.0).max, 4);
        assert_eq!(Relation::LessThanOrEqual.as_range(4.5).max, 5);
        assert_eq!(Relation::LessThanOrEqual.as_range(4.0).max, 5);
        assert_eq!(Relation::GreaterThan.as_range(4.0).min, 5);
        assert_eq!(Relation::GreaterThanOrEqual.as_range(4.5).min, 5);
        assert_eq!(Relation::Equals.as_range(3.0), ParameterRange::new(3, 4));
        assert!(Relation::Equals.as_range(3.5).is_empty());
    }
}
