mod algorithm;
mod config;
mod family;
mod report;

pub use algorithm::AlgorithmVariant;
pub use config::{EstimatorConfig, ReportOptions};
pub use family::AlgorithmFamily;
pub use report::{format_number, format_parameters, AlgorithmEstimate, Estimate, UNAVAILABLE};

use crate::core::*;
use indexmap::IndexMap;
use log::{debug, info};
use report::{render_table, Align};
use std::fmt;
use std::sync::Arc;

/// Compares every non-excluded algorithm of a family on one problem instance.
pub struct Estimator {
    problem: Arc<ProblemModel>,
    algorithms: Vec<AlgorithmVariant>,
    excluded: Vec<String>,
}

impl fmt::Debug for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Estimator")
            .field("problem", &self.problem.to_string())
            .field("algorithms", &self.algorithm_names())
            .field("excluded", &self.excluded)
            .finish()
    }
}

impl Estimator {
    /// Build one variant per family member, skipping the family's default exclusions (unless
    /// explicitly included) and every name in `config.excluded_algorithms`.
    pub fn new(problem: ProblemModel, family: AlgorithmFamily, config: &EstimatorConfig) -> Result<Self> {
        let known: Vec<String> = family.names().iter().map(|s| s.to_string()).collect();
        for name in config
            .excluded_algorithms
            .iter()
            .chain(&config.included_algorithms)
        {
            if !known.contains(name) {
                return Err(EstimatorError::Config(format!(
                    "unknown algorithm '{}' for {} (available: {})",
                    name,
                    family.name(),
                    known.join(", ")
                )));
            }
        }

        let mut excluded: Vec<String> = family
            .default_exclusions()
            .iter()
            .filter(|name| !config.included_algorithms.contains(name))
            .cloned()
            .collect();
        for name in &config.excluded_algorithms {
            if !excluded.contains(name) {
                excluded.push(name.clone());
            }
        }

        let problem = Arc::new(problem);
        let mut algorithms = Vec::new();
        for cost in family.into_members() {
            if excluded.iter().any(|e| e == cost.name()) {
                debug!("skipping excluded algorithm {}", cost.name());
                continue;
            }
            algorithms.push(AlgorithmVariant::new(cost, problem.clone(), config)?);
        }

        info!(
            "estimator for {}: {} algorithms, {} excluded",
            problem,
            algorithms.len(),
            excluded.len()
        );

        Ok(Self {
            problem,
            algorithms,
            excluded,
        })
    }

    pub fn problem(&self) -> &ProblemModel {
        &self.problem
    }

    pub fn algorithms(&self) -> &[AlgorithmVariant] {
        &self.algorithms
    }

    pub fn algorithm(&self, name: &str) -> Option<&AlgorithmVariant> {
        self.algorithms.iter().find(|a| a.name() == name)
    }

    pub fn algorithm_names(&self) -> Vec<&str> {
        self.algorithms.iter().map(AlgorithmVariant::name).collect()
    }

    /// Effective exclusion set: family defaults plus the caller's list.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Time, memory, parameters and diagnostics of every algorithm.
    pub fn estimate(&self) -> IndexMap<String, AlgorithmEstimate> {
        self.estimate_with(&ReportOptions::default())
    }

    /// Like [`Estimator::estimate`], adding tilde-O and quantum figures when requested.
    /// Unsupported metrics are left out rather than failing the whole estimate.
    pub fn estimate_with(&self, options: &ReportOptions) -> IndexMap<String, AlgorithmEstimate> {
        self.algorithms
            .iter()
            .map(|algorithm| {
                let estimate = Estimate {
                    time: algorithm.time_complexity(),
                    memory: algorithm.memory_complexity(),
                    parameters: algorithm.display_parameters(options.show_all_parameters),
                };

                let tilde_o_estimate = if options.show_tilde_o_time {
                    let tilde_o = algorithm.tilde_o_complexity().and_then(|c| {
                        Ok((c, algorithm.tilde_o_parameters(options.show_all_parameters)?))
                    });
                    match tilde_o {
                        Ok((c, parameters)) => Some(Estimate {
                            time: c.time,
                            memory: c.memory,
                            parameters,
                        }),
                        Err(e) => {
                            debug!("{}", e);
                            None
                        }
                    }
                } else {
                    None
                };

                let quantum_time = if options.show_quantum_complexity {
                    algorithm.quantum_time_complexity().ok()
                } else {
                    None
                };

                let row = AlgorithmEstimate {
                    estimate,
                    diagnostics: algorithm.diagnostics(),
                    tilde_o_estimate,
                    quantum_time,
                };
                (algorithm.name().to_string(), row)
            })
            .collect()
    }

    /// Feasible algorithm with minimal time; the first declared wins ties.
    ///
    /// With `use_tilde_o` the asymptotic time decides and algorithms without one are skipped.
    /// Either way the memory bound applies to the memory on the same scale.
    pub fn fastest_algorithm(&self, use_tilde_o: bool) -> Option<&AlgorithmVariant> {
        let bound = self.problem.memory_bound();
        let mut best: Option<(&AlgorithmVariant, f64)> = None;

        for algorithm in &self.algorithms {
            if !algorithm.is_feasible() {
                continue;
            }
            let complexity = if use_tilde_o {
                match algorithm.tilde_o_complexity() {
                    Ok(c) => c,
                    Err(_) => continue,
                }
            } else {
                algorithm.complexity()
            };
            if complexity.memory > bound {
                continue;
            }
            let time = complexity.time;

            if !time.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, t)| time < t) {
                best = Some((algorithm, time));
            }
        }

        best.map(|(algorithm, _)| algorithm)
    }

    /// Comparison table of every algorithm.
    pub fn report(&self, options: &ReportOptions) -> String {
        let estimates = self.estimate_with(options);

        let mut headers = vec!["algorithm", "estimate.time", "estimate.memory"];
        if options.show_parameters {
            headers.push("estimate.parameters");
        }
        if options.show_tilde_o_time {
            headers.push("tilde_o_estimate.time");
            headers.push("tilde_o_estimate.memory");
        }
        if options.show_quantum_complexity {
            headers.push("quantum.time");
        }

        let align: Vec<Align> = headers
            .iter()
            .map(|h| match *h {
                "algorithm" | "estimate.parameters" => Align::Left,
                _ => Align::Right,
            })
            .collect();

        let number = |v: f64| format_number(v, options.precision, options.truncate);
        let rows: Vec<Vec<String>> = estimates
            .iter()
            .map(|(name, row)| {
                let mut cells = vec![
                    name.clone(),
                    number(row.estimate.time),
                    number(row.estimate.memory),
                ];
                if options.show_parameters {
                    cells.push(if row.estimate.is_feasible() {
                        format_parameters(&row.estimate.parameters)
                    } else {
                        UNAVAILABLE.to_string()
                    });
                }
                if options.show_tilde_o_time {
                    match &row.tilde_o_estimate {
                        Some(t) => {
                            cells.push(number(t.time));
                            cells.push(number(t.memory));
                        }
                        None => {
                            cells.push(UNAVAILABLE.to_string());
                            cells.push(UNAVAILABLE.to_string());
                        }
                    }
                }
                if options.show_quantum_complexity {
                    cells.push(row.quantum_time.map_or(UNAVAILABLE.to_string(), number));
                }
                cells
            })
            .collect();

        render_table(&headers, &align, &rows)
    }

    /// Print [`Estimator::report`] to stdout.
    pub fn table(&self, options: &ReportOptions) {
        println!("{}", self.report(options));
    }

    pub fn to_json(&self, options: &ReportOptions) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.estimate_with(options))?)
    }
}
