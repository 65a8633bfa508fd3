use crate::core::error::{EstimatorError, Result};
use crate::core::space::ParameterSpace;
use crate::core::types::ParameterSpec;

/// Detect cyclic dependencies among named parameters.
///
/// `edges` are `(source, target)` pairs: the target's range or value is derived from the
/// source. Uses depth-first search; returns an error naming a parameter on the cycle.
pub fn detect_cycles<'a, I>(names: &[String], edges: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let count = names.len();
    let mut graph: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (source, target) in edges {
        let src = names.iter().position(|n| n == source);
        let dst = names.iter().position(|n| n == target);
        if let (Some(src), Some(dst)) = (src, dst) {
            graph[src].push(dst);
        }
    }

    let mut visited = vec![false; count];
    let mut rec_stack = vec![false; count];

    fn dfs(
        node: usize,
        graph: &[Vec<usize>],
        visited: &mut [bool],
        rec_stack: &mut [bool],
        names: &[String],
    ) -> Result<()> {
        visited[node] = true;
        rec_stack[node] = true;

        for &neighbor in &graph[node] {
            if !visited[neighbor] {
                dfs(neighbor, graph, visited, rec_stack, names)?;
            } else if rec_stack[neighbor] {
                return Err(EstimatorError::CyclicDependency(format!(
                    "parameter '{}' depends on itself",
                    names[neighbor]
                )));
            }
        }

        rec_stack[node] = false;
        Ok(())
    }

    for i in 0..count {
        if !visited[i] {
            dfs(i, &graph, &mut visited, &mut rec_stack, names)?;
        }
    }

    Ok(())
}

/// Check a parameter registry against the declared search space.
///
/// Every registered name needs a declared range, every dependency must be registered,
/// and the dependency graph must be acyclic. Members of one joint group may not depend on
/// each other: the group is searched as a whole.
pub fn validate_registry(algorithm: &str, specs: &[ParameterSpec], space: &ParameterSpace) -> Result<()> {
    let names: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();

    for spec in specs {
        if space.range(&spec.name).is_none() {
            return Err(EstimatorError::UnknownParameter {
                algorithm: algorithm.to_string(),
                name: spec.name.clone(),
            });
        }
        for dep in &spec.depends_on {
            let Some(dep_spec) = specs.iter().find(|s| &s.name == dep) else {
                return Err(EstimatorError::UnknownParameter {
                    algorithm: algorithm.to_string(),
                    name: dep.clone(),
                });
            };
            if spec.group().is_some() && spec.group() == dep_spec.group() {
                return Err(EstimatorError::CyclicDependency(format!(
                    "'{}' and '{}' share group '{}'",
                    spec.name,
                    dep,
                    spec.group().unwrap_or_default()
                )));
            }
        }
    }

    detect_cycles(
        &names,
        specs.iter().flat_map(|spec| {
            spec.depends_on
                .iter()
                .map(move |dep| (dep.as_str(), spec.name.as_str()))
        }),
    )
}
