use super::config::FactoryConfig;
use super::report::RunReport;
use super::scenario::run_scenario;
use crate::core::error::SimError;
use crate::core::event::EventKind;
use crate::core::execution::{ConcurrencyMode, ExecutionConfig};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// `count` consecutive seeds starting at `first`
pub fn seeds_from(first: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|offset| first.wrapping_add(offset)).collect()
}

/// Run one independent simulation per seed. Reports come back in seed order
/// whatever the concurrency mode.
pub fn run_replications(
    config: &FactoryConfig,
    seeds: &[u64],
    execution: &ExecutionConfig,
) -> Result<Vec<RunReport>, SimError> {
    config.validate()?;
    info!(
        "running {} replications ({:?})",
        seeds.len(),
        execution.concurrency_mode
    );

    let run_one = |seed: u64| run_scenario(&config.clone().with_seed(seed));

    match execution.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(|&seed| run_one(seed)).collect(),
        ConcurrencyMode::Rayon => {
            let run_all = || {
                seeds
                    .par_iter()
                    .map(|&seed| run_one(seed))
                    .collect::<Result<Vec<_>, _>>()
            };

            match execution.thread_pool_size {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| SimError::ThreadPool(e.to_string()))?;
                    pool.install(run_all)
                }
                None => run_all(),
            }
        }
    }
}

/// Spread of outcomes across replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub mean_total_cost: f64,
    pub std_dev_total_cost: f64,
    pub min_total_cost: f64,
    pub max_total_cost: f64,
    pub mean_failures: f64,
}

impl ReplicationSummary {
    /// Returns `None` for an empty set of reports
    pub fn from_reports(reports: &[RunReport]) -> Option<Self> {
        if reports.is_empty() {
            return None;
        }

        let n = reports.len() as f64;
        let costs: Vec<f64> = reports.iter().map(|r| r.total_cost).collect();
        let mean = costs.iter().sum::<f64>() / n;
        let variance = costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        let failures: usize = reports
            .iter()
            .map(|r| r.count(EventKind::MachineFailed))
            .sum();

        Some(Self {
            replications: reports.len(),
            mean_total_cost: mean,
            std_dev_total_cost: variance.sqrt(),
            min_total_cost: costs.iter().copied().fold(f64::INFINITY, f64::min),
            max_total_cost: costs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_failures: failures as f64 / n,
        })
    }
}

impl std::fmt::Display for ReplicationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Replications: {}", self.replications)?;
        writeln!(
            f,
            "  total cost: mean {:.2}, std dev {:.2}, range {:.2}..{:.2}",
            self.mean_total_cost, self.std_dev_total_cost, self.min_total_cost, self.max_total_cost
        )?;
        write!(f, "  failures per run: {:.2}", self.mean_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> FactoryConfig {
        FactoryConfig::default()
            .with_machine_count(10)
            .with_horizon(400.0)
    }

    #[test]
    fn test_seeds_from() {
        assert_eq!(seeds_from(5, 3), vec![5, 6, 7]);
        assert!(seeds_from(0, 0).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = small_config();
        let seeds = seeds_from(10, 4);

        let sequential = run_replications(&config, &seeds, &ExecutionConfig::new()).unwrap();
        let parallel = run_replications(
            &config,
            &seeds,
            &ExecutionConfig::new()
                .with_concurrency(ConcurrencyMode::Rayon)
                .with_thread_pool_size(2),
        )
        .unwrap();

        assert_eq!(sequential.len(), 4);
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.timeline(), b.timeline());
            assert_eq!(a.total_cost, b.total_cost);
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let config = small_config().with_technicians(0);
        let result = run_replications(&config, &[1, 2], &ExecutionConfig::new());
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_summary_statistics() {
        let config = small_config();
        let reports = run_replications(&config, &seeds_from(0, 3), &ExecutionConfig::new()).unwrap();
        let summary = ReplicationSummary::from_reports(&reports).unwrap();

        assert_eq!(summary.replications, 3);
        assert!(summary.min_total_cost <= summary.mean_total_cost);
        assert!(summary.mean_total_cost <= summary.max_total_cost);
        assert!(summary.std_dev_total_cost >= 0.0);
        assert!(ReplicationSummary::from_reports(&[]).is_none());
    }
}
