//! Ant Colony Optimization over pickup-delivery parcels.
//!
//! Each ant builds a tour by repeatedly choosing which remaining parcel
//! to pick up next, biased by pheromone and inverse distance from the
//! ant's current position to that parcel's pickup city. Only the
//! decision edges (city-to-pickup, pickup-to-delivery) are reinforced;
//! the shortest-path hops used to physically connect them are fixed by
//! the graph preprocessor and never pheromone-bearing.

use crate::error::{Result, SolverError};
use crate::graph::ShortestPaths;
use crate::types::{Parcel, ParcelOrder, Tour, UNREACHABLE};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

const INITIAL_PHEROMONE: f64 = 0.1;
const DEPOSIT_Q: f64 = 100.0;
const WEIGHT_UNDERFLOW: f64 = 1e-12;
const HEURISTIC_EPSILON: f64 = 1e-6;

/// Required ACO parameters. All fields are validated in
/// [`AntColonyOptimizer::new`].
#[derive(Debug, Clone, Copy)]
pub struct AcoConfig {
    pub iterations: usize,
    pub ants: usize,
    pub alpha: f64,
    pub beta: f64,
    pub rho: f64,
    pub seed: u64,
}

impl AcoConfig {
    fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(SolverError::InvalidParameters("iterations must be >= 1".into()));
        }
        if self.ants < 1 {
            return Err(SolverError::InvalidParameters("ants must be >= 1".into()));
        }
        if self.alpha <= 0.0 {
            return Err(SolverError::InvalidParameters("alpha must be > 0".into()));
        }
        if self.beta <= 0.0 {
            return Err(SolverError::InvalidParameters("beta must be > 0".into()));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(SolverError::InvalidParameters("rho must be in (0,1)".into()));
        }
        Ok(())
    }
}

/// Result of a full ACO `solve` run.
#[derive(Debug, Clone)]
pub struct AcoOutput {
    pub best_tour: Tour,
    pub best_distance: f64,
    pub history: Vec<f64>,
    pub parcel_order: ParcelOrder,
}

/// One ant's simulated run: its expanded tour, total distance and the
/// parcel execution order it chose.
struct AntRun {
    tour: Tour,
    distance: f64,
    order: ParcelOrder,
}

pub struct AntColonyOptimizer<'a> {
    config: AcoConfig,
    shortest: &'a ShortestPaths,
    parcels: &'a [Parcel],
    base: usize,
    pheromone: Vec<Vec<f64>>,
}

impl<'a> AntColonyOptimizer<'a> {
    pub fn new(
        shortest: &'a ShortestPaths,
        parcels: &'a [Parcel],
        base: usize,
        config: AcoConfig,
    ) -> Result<Self> {
        config.validate()?;
        let n = shortest.n();
        if base >= n {
            return Err(SolverError::InvalidGraph(format!("base {base} >= N {n}")));
        }
        for (idx, p) in parcels.iter().enumerate() {
            if p.pickup >= n || p.delivery >= n {
                return Err(SolverError::InvalidGraph(format!(
                    "parcel {idx} references a city >= N {n}"
                )));
            }
            if p.pickup == p.delivery {
                return Err(SolverError::InvalidGraph(format!(
                    "parcel {idx} has identical pickup and delivery"
                )));
            }
        }

        Ok(AntColonyOptimizer {
            config,
            shortest,
            parcels,
            base,
            pheromone: vec![vec![INITIAL_PHEROMONE; n]; n],
        })
    }

    /// Run the outer ACO loop for `config.iterations` iterations.
    pub fn solve(&mut self) -> AcoOutput {
        let mut history = Vec::with_capacity(self.config.iterations);
        let mut global_best_tour = Vec::new();
        let mut global_best_dist = f64::INFINITY;
        let mut global_best_order = Vec::new();

        for iteration in 0..self.config.iterations {
            let runs: Vec<AntRun> = (0..self.config.ants)
                .into_par_iter()
                .map(|ant_idx| {
                    let mut rng = sub_rng(self.config.seed, iteration, ant_idx);
                    self.run_ant(&mut rng)
                })
                .collect();

            let iteration_best = runs
                .iter()
                .map(|r| r.distance)
                .fold(f64::INFINITY, f64::min);
            history.push(iteration_best);

            for run in &runs {
                if run.distance < global_best_dist {
                    global_best_dist = run.distance;
                    global_best_tour = run.tour.clone();
                    global_best_order = run.order.clone();
                }
            }

            self.evaporate();
            self.reinforce(&runs);
        }

        AcoOutput {
            best_tour: global_best_tour,
            best_distance: global_best_dist,
            history,
            parcel_order: global_best_order,
        }
    }

    fn evaporate(&mut self) {
        let keep = 1.0 - self.config.rho;
        for row in self.pheromone.iter_mut() {
            for tau in row.iter_mut() {
                *tau *= keep;
            }
        }
    }

    fn reinforce(&mut self, runs: &[AntRun]) {
        let mut ranked: Vec<&AntRun> = runs.iter().collect();
        ranked.sort_by_key(|r| OrderedFloat(r.distance));
        let elite_count = (self.config.ants / 4).max(1);

        for run in ranked.into_iter().take(elite_count) {
            if !(run.distance > 0.0 && run.distance < UNREACHABLE) {
                continue;
            }
            let deposit = DEPOSIT_Q / run.distance;
            let mut prev = self.base;
            for &parcel_idx in &run.order {
                let p = &self.parcels[parcel_idx];
                self.pheromone[prev][p.pickup] += deposit;
                self.pheromone[p.pickup][p.delivery] += deposit;
                prev = p.delivery;
            }
            self.pheromone[prev][self.base] += deposit;
        }
    }

    /// Simulate one ant: repeatedly pick the next parcel to service,
    /// append the shortest-path expansion of its pickup and delivery
    /// legs, and finally return to base.
    fn run_ant(&self, rng: &mut ChaCha8Rng) -> AntRun {
        let mut current = self.base;
        let mut remaining: Vec<usize> = (0..self.parcels.len()).collect();
        let mut order = Vec::with_capacity(self.parcels.len());
        let mut tour = vec![self.base];
        let mut total_dist = 0.0;

        while !remaining.is_empty() {
            let weights: Vec<f64> = remaining
                .iter()
                .map(|&pi| {
                    let pickup = self.parcels[pi].pickup;
                    let d = self.shortest.distance(current, pickup);
                    if d >= UNREACHABLE {
                        0.0
                    } else {
                        let tau = self.pheromone[current][pickup].powf(self.config.alpha);
                        let eta = (1.0 / (d + HEURISTIC_EPSILON)).powf(self.config.beta);
                        tau * eta
                    }
                })
                .collect();

            let local_idx = sample_weighted(rng, &weights);
            let parcel_idx = remaining.remove(local_idx);
            order.push(parcel_idx);

            let p = self.parcels[parcel_idx];
            total_dist += self.shortest.distance(current, p.pickup);
            extend_tour(&mut tour, &self.shortest.expand(current, p.pickup));

            total_dist += self.shortest.distance(p.pickup, p.delivery);
            extend_tour(&mut tour, &self.shortest.expand(p.pickup, p.delivery));

            current = p.delivery;
        }

        if current != self.base {
            total_dist += self.shortest.distance(current, self.base);
            extend_tour(&mut tour, &self.shortest.expand(current, self.base));
        }

        AntRun { tour: dedup_consecutive(tour), distance: total_dist, order }
    }
}

/// Append `segment` to `tour`, dropping the duplicated first node.
fn extend_tour(tour: &mut Tour, segment: &[usize]) {
    tour.extend_from_slice(&segment[1.min(segment.len())..]);
}

fn dedup_consecutive(tour: Tour) -> Tour {
    let mut out: Tour = Vec::with_capacity(tour.len());
    for node in tour {
        if out.last() != Some(&node) {
            out.push(node);
        }
    }
    out
}

/// Sample an index into `weights` proportionally. Falls back to a
/// uniform choice when the total weight underflows.
fn sample_weighted(rng: &mut ChaCha8Rng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= WEIGHT_UNDERFLOW {
        return rng.gen_range(0..weights.len());
    }
    let mut pick = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        pick -= w;
        if pick <= 0.0 {
            return i;
        }
    }
    weights.len() - 1
}

/// Derive a deterministic per-ant sub-generator from the run seed, the
/// iteration number and the ant index, so that parallel evaluation order
/// never affects the outcome.
fn sub_rng(seed: u64, iteration: usize, index: usize) -> ChaCha8Rng {
    let mixed = seed
        ^ (iteration as u64).wrapping_mul(0x9E3779B97F4A7C15)
        ^ (index as u64).wrapping_mul(0xC2B2AE3D27D4EB4F);
    ChaCha8Rng::seed_from_u64(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeTable;

    fn scenario_a() -> (ShortestPaths, Vec<Parcel>) {
        let mut e = EdgeTable::new(3);
        e.add_edge(0, 1, 10.0);
        e.add_edge(1, 2, 10.0);
        e.add_edge(0, 2, 30.0);
        let sp = ShortestPaths::build(&e);
        (sp, vec![Parcel::new(0, 2, 500.0)])
    }

    #[test]
    fn scenario_a_matches_expected_tour_and_distance() {
        let (sp, parcels) = scenario_a();
        let config = AcoConfig { iterations: 5, ants: 4, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 1 };
        let mut aco = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out = aco.solve();

        assert_eq!(out.best_tour, vec![0, 1, 2, 1, 0]);
        assert_eq!(out.best_distance, 40.0);
        assert_eq!(out.parcel_order, vec![0]);
        assert_eq!(out.history.len(), 5);
        assert!(out.history.iter().all(|&d| d == 40.0));
    }

    #[test]
    fn single_ant_elite_subset_has_one_member() {
        let (sp, parcels) = scenario_a();
        let config = AcoConfig { iterations: 3, ants: 1, alpha: 1.0, beta: 2.0, rho: 0.3, seed: 7 };
        let mut aco = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out = aco.solve();
        assert_eq!(out.history.len(), 3);
        assert!(out.best_distance >= 0.0);
    }

    #[test]
    fn determinism_same_seed_same_output() {
        let mut e = EdgeTable::new(4);
        e.add_edge(0, 1, 1.0);
        e.add_edge(1, 2, 1.0);
        e.add_edge(2, 3, 1.0);
        e.add_edge(3, 0, 1.0);
        e.add_edge(0, 2, std::f64::consts::SQRT_2);
        e.add_edge(1, 3, std::f64::consts::SQRT_2);
        let sp = ShortestPaths::build(&e);
        let parcels = vec![Parcel::new(0, 2, 10.0), Parcel::new(1, 3, 10.0)];
        let config = AcoConfig { iterations: 20, ants: 10, alpha: 1.0, beta: 2.0, rho: 0.2, seed: 42 };

        let mut a = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out_a = a.solve();
        let mut b = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out_b = b.solve();

        assert_eq!(out_a.best_tour, out_b.best_tour);
        assert_eq!(out_a.best_distance, out_b.best_distance);
        assert_eq!(out_a.history, out_b.history);
        assert_eq!(out_a.parcel_order, out_b.parcel_order);
    }

    #[test]
    fn history_length_equals_iterations_and_values_are_non_negative() {
        let (sp, parcels) = scenario_a();
        let config = AcoConfig { iterations: 8, ants: 6, alpha: 1.0, beta: 2.0, rho: 0.4, seed: 3 };
        let mut aco = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out = aco.solve();
        assert_eq!(out.history.len(), 8);
        assert!(out.history.iter().all(|&d| d >= 0.0));
        assert!(out.history.iter().cloned().fold(f64::INFINITY, f64::min) <= out.best_distance + 1e-9);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let (sp, parcels) = scenario_a();
        let bad = AcoConfig { iterations: 0, ants: 4, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 1 };
        assert!(AntColonyOptimizer::new(&sp, &parcels, 0, bad).is_err());
    }

    #[test]
    fn rejects_out_of_range_base() {
        let (sp, parcels) = scenario_a();
        let config = AcoConfig { iterations: 1, ants: 1, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 1 };
        assert!(AntColonyOptimizer::new(&sp, &parcels, 99, config).is_err());
    }

    #[test]
    fn scenario_d_converges_near_optimal_on_grid() {
        // Square of 4 cities, all 6 pairs weighted, two parcels that can be
        // served in either order; true optimum is the cheaper of the two
        // orderings over the fixed grid distances.
        let mut e = EdgeTable::new(4);
        e.add_edge(0, 1, 1.0);
        e.add_edge(1, 2, 1.0);
        e.add_edge(2, 3, 1.0);
        e.add_edge(3, 0, 1.0);
        e.add_edge(0, 2, std::f64::consts::SQRT_2);
        e.add_edge(1, 3, std::f64::consts::SQRT_2);
        let sp = ShortestPaths::build(&e);
        let parcels = vec![Parcel::new(0, 2, 10.0), Parcel::new(1, 3, 10.0)];

        let order_023: f64 = sp.distance(0, 0) + sp.distance(0, 2) + sp.distance(2, 1)
            + sp.distance(1, 3) + sp.distance(3, 0);
        let order_132: f64 = sp.distance(0, 1) + sp.distance(1, 3) + sp.distance(3, 0)
            + sp.distance(0, 2) + sp.distance(2, 0);
        let true_min = order_023.min(order_132);

        let config = AcoConfig { iterations: 50, ants: 20, alpha: 1.0, beta: 2.0, rho: 0.3, seed: 42 };
        let mut aco = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out = aco.solve();

        assert!(
            out.best_distance <= true_min * 1.01,
            "best {} exceeds 1% of true optimum {}",
            out.best_distance,
            true_min
        );
    }

    #[test]
    fn tour_bookends_on_base_and_has_no_adjacent_duplicates() {
        let (sp, parcels) = scenario_a();
        let config = AcoConfig { iterations: 5, ants: 4, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 9 };
        let mut aco = AntColonyOptimizer::new(&sp, &parcels, 0, config).unwrap();
        let out = aco.solve();
        assert_eq!(*out.best_tour.first().unwrap(), 0);
        assert_eq!(*out.best_tour.last().unwrap(), 0);
        for w in out.best_tour.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }
}
