//! Benchmarking: run the ACO + cargo-simulator + GA pipeline over a
//! directory of instances, multiple times each, and aggregate timing
//! and fitness statistics.

use crate::cargo_sim::{base_revenue, simulate};
use crate::error::Result;
use crate::heuristics::{AcoConfig, AntColonyOptimizer, GaConfig, GeneticOptimizer};
use crate::instance::RouteInstance;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Parameters shared by every instance in a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkConfig {
    pub runs: usize,
    pub aco: AcoConfig,
    pub ga: GaConfig,
}

/// Aggregated statistics for one instance across `runs` repetitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub instance: String,
    pub runs: usize,
    pub avg_distance: f64,
    pub best_distance: f64,
    pub avg_fitness: f64,
    pub best_fitness: f64,
    pub avg_aco_seconds: f64,
    pub avg_ga_seconds: f64,
}

/// Load every `*.json` instance file in `dir`.
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<RouteInstance>> {
    let mut instances = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            instances.push(RouteInstance::from_file(&path)?);
        }
    }
    instances.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(instances)
}

/// Run the pipeline `config.runs` times on `instance`, incrementing the
/// seed each run so repeats explore different random streams while
/// remaining individually deterministic.
pub fn run_instance(instance: &RouteInstance, config: &BenchmarkConfig) -> InstanceStatistics {
    log::info!("Running benchmark on instance: {}", instance.name);

    let edges = instance.edge_table();
    let shortest = crate::graph::ShortestPaths::build(&edges);

    let mut distances = Vec::with_capacity(config.runs);
    let mut fitnesses = Vec::with_capacity(config.runs);
    let mut aco_seconds = Vec::with_capacity(config.runs);
    let mut ga_seconds = Vec::with_capacity(config.runs);

    for run in 0..config.runs {
        let mut aco_config = config.aco;
        aco_config.seed = config.aco.seed.wrapping_add(run as u64);

        let aco_start = Instant::now();
        let mut aco = match AntColonyOptimizer::new(&shortest, &instance.parcels, instance.base, aco_config) {
            Ok(aco) => aco,
            Err(e) => {
                log::error!("ACO setup failed for {}: {e}", instance.name);
                continue;
            }
        };
        let aco_out = aco.solve();
        aco_seconds.push(aco_start.elapsed().as_secs_f64());
        distances.push(aco_out.best_distance);

        let route_data = instance.route_data(&aco_out.best_tour);
        let steps = simulate(&route_data, &instance.parcels, Some(&aco_out.parcel_order));
        let revenue = base_revenue(&steps, &instance.parcels);

        let mut ga_config = config.ga;
        ga_config.seed = config.ga.seed.wrapping_add(run as u64);

        let ga_start = Instant::now();
        let mut ga = match GeneticOptimizer::new(&route_data, &instance.parcels, ga_config) {
            Ok(ga) => ga,
            Err(e) => {
                log::error!("GA setup failed for {}: {e}", instance.name);
                continue;
            }
        };
        let ga_out = ga.run();
        ga_seconds.push(ga_start.elapsed().as_secs_f64());
        fitnesses.push(ga_out.history.last().copied().unwrap_or(revenue));
    }

    InstanceStatistics {
        instance: instance.name.clone(),
        runs: distances.len(),
        avg_distance: mean(&distances),
        best_distance: distances.iter().cloned().fold(f64::INFINITY, f64::min),
        avg_fitness: mean(&fitnesses),
        best_fitness: fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        avg_aco_seconds: mean(&aco_seconds),
        avg_ga_seconds: mean(&ga_seconds),
    }
}

/// Run the benchmark over every instance in `dir`.
pub fn run_directory<P: AsRef<Path>>(dir: P, config: &BenchmarkConfig) -> Result<Vec<InstanceStatistics>> {
    let instances = load_instances_from_dir(dir)?;
    Ok(instances.iter().map(|inst| run_instance(inst, config)).collect())
}

/// Write benchmark results to a CSV file.
pub fn write_csv<P: AsRef<Path>>(path: P, stats: &[InstanceStatistics]) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for s in stats {
        writer
            .serialize(s)
            .map_err(|e| crate::error::SolverError::Io(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| crate::error::SolverError::Io(e.to_string()))?;
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parcel;

    fn sample_instance() -> RouteInstance {
        RouteInstance {
            name: "demo".into(),
            n: 3,
            base: 0,
            edges: vec![(0, 1, 10.0), (1, 2, 10.0), (0, 2, 30.0)],
            parcels: vec![Parcel::new(0, 2, 500.0)],
            robbery_probability: vec![(0, 1, 0.2), (1, 2, 0.1)],
        }
    }

    #[test]
    fn run_instance_produces_statistics_for_every_run() {
        let instance = sample_instance();
        let config = BenchmarkConfig {
            runs: 3,
            aco: AcoConfig { iterations: 4, ants: 4, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 1 },
            ga: GaConfig { population: 6, generations: 5, mutation_rate: 0.1, seed: 1 },
        };
        let stats = run_instance(&instance, &config);
        assert_eq!(stats.runs, 3);
        assert!(stats.best_distance.is_finite());
        assert!(stats.best_fitness.is_finite());
    }
}
