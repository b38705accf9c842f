//! Genetic Algorithm for the robbery-protection decision problem.
//!
//! Evolves a fixed-length bitstring — one bit per tour edge, `1` meaning
//! "buy protection on this edge" — to maximize expected net profit given
//! the cargo-value sequence produced by the cargo simulator.

use crate::cargo_sim::{base_revenue, simulate};
use crate::error::{Result, SolverError};
use crate::types::{Parcel, ProtectBits, RouteEdge};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Required GA parameters. Validated in [`GeneticOptimizer::new`].
#[derive(Debug, Clone, Copy)]
pub struct GaConfig {
    pub population: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub seed: u64,
}

impl GaConfig {
    fn validate(&self) -> Result<()> {
        if self.population < 1 {
            return Err(SolverError::InvalidParameters("population must be >= 1".into()));
        }
        if self.generations < 1 {
            return Err(SolverError::InvalidParameters("generations must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SolverError::InvalidParameters("mutation_rate must be in [0,1]".into()));
        }
        Ok(())
    }
}

/// Result of a full GA `run`.
#[derive(Debug, Clone)]
pub struct GaOutput {
    pub protect_bits: ProtectBits,
    pub history: Vec<f64>,
}

pub struct GeneticOptimizer<'a> {
    config: GaConfig,
    route: &'a [RouteEdge],
    cargo_value: Vec<f64>,
    robbery_probability: Vec<f64>,
    protection_cost: Vec<f64>,
    base_revenue: f64,
    rng: ChaCha8Rng,
}

impl<'a> GeneticOptimizer<'a> {
    pub fn new(route: &'a [RouteEdge], parcels: &[Parcel], config: GaConfig) -> Result<Self> {
        config.validate()?;
        let steps = simulate(route, parcels, None);
        let base_revenue = base_revenue(&steps, parcels);

        Ok(GeneticOptimizer {
            config,
            route,
            cargo_value: steps.iter().map(|s| s.cargo_value).collect(),
            robbery_probability: route.iter().map(|e| e.robbery_probability).collect(),
            protection_cost: route.iter().map(|e| e.protection_cost).collect(),
            base_revenue,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    #[inline]
    fn route_len(&self) -> usize {
        self.route.len()
    }

    /// net = base_revenue - sum_k penalty(k), penalty(k) = protection_cost(k)
    /// if bit k is set, else cargo_value(k) * robbery_probability(k).
    pub fn fitness(&self, chromosome: &[bool]) -> f64 {
        let penalty: f64 = (0..self.route_len())
            .map(|k| {
                if chromosome[k] {
                    self.protection_cost[k]
                } else {
                    self.cargo_value[k] * self.robbery_probability[k]
                }
            })
            .sum();
        self.base_revenue - penalty
    }

    /// Run the GA for `config.generations` generations. Degenerates per
    /// spec.md §4.4/§7 when the route has zero edges: returns an empty
    /// chromosome and a history flat at `base_revenue`.
    pub fn run(&mut self) -> GaOutput {
        let l = self.route_len();
        if l == 0 {
            return GaOutput {
                protect_bits: Vec::new(),
                history: vec![self.base_revenue; self.config.generations],
            };
        }

        let mut population: Vec<ProtectBits> = (0..self.config.population)
            .map(|_| (0..l).map(|_| self.rng.gen_bool(0.5)).collect())
            .collect();

        let mut best_chromosome = population[0].clone();
        let mut best_fitness = self.fitness(&best_chromosome);
        let mut history = Vec::with_capacity(self.config.generations);

        for _ in 0..self.config.generations {
            let fitnesses: Vec<f64> = population
                .par_iter()
                .map(|ind| self.fitness(ind))
                .collect();

            // First occurrence of the maximum wins ties: key on (fitness,
            // Reverse(index)) so `max_by_key`'s last-wins-on-ties rule picks
            // the smallest index among equal fitnesses.
            let (current_best_idx, current_best_fit) = fitnesses
                .iter()
                .enumerate()
                .max_by_key(|&(i, &f)| (OrderedFloat(f), std::cmp::Reverse(i)))
                .map(|(i, &f)| (i, f))
                .unwrap();
            if current_best_fit > best_fitness {
                best_fitness = current_best_fit;
                best_chromosome = population[current_best_idx].clone();
            }
            history.push(best_fitness);

            if self.config.population == 1 {
                population = vec![best_chromosome.clone()];
                continue;
            }

            let mut next_pop = Vec::with_capacity(self.config.population);
            next_pop.push(best_chromosome.clone());

            while next_pop.len() < self.config.population {
                let parent_a = tournament_select(&population, &fitnesses, &mut self.rng).to_vec();
                let parent_b = tournament_select(&population, &fitnesses, &mut self.rng).to_vec();

                let (mut c1, mut c2) = crossover(&parent_a, &parent_b, &mut self.rng);
                mutate(&mut c1, self.config.mutation_rate, &mut self.rng);
                next_pop.push(c1);
                if next_pop.len() < self.config.population {
                    mutate(&mut c2, self.config.mutation_rate, &mut self.rng);
                    next_pop.push(c2);
                }
            }
            population = next_pop;
        }

        GaOutput { protect_bits: best_chromosome, history }
    }
}

fn tournament_select<'p>(
    population: &'p [ProtectBits],
    fitnesses: &[f64],
    rng: &mut ChaCha8Rng,
) -> &'p [bool] {
    let a = rng.gen_range(0..population.len());
    let b = rng.gen_range(0..population.len());
    if OrderedFloat(fitnesses[a]) >= OrderedFloat(fitnesses[b]) {
        &population[a]
    } else {
        &population[b]
    }
}

fn crossover(a: &[bool], b: &[bool], rng: &mut ChaCha8Rng) -> (ProtectBits, ProtectBits) {
    let l = a.len();
    if l < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let cut = rng.gen_range(1..l);
    let mut c1 = a[..cut].to_vec();
    c1.extend_from_slice(&b[cut..]);
    let mut c2 = b[..cut].to_vec();
    c2.extend_from_slice(&a[cut..]);
    (c1, c2)
}

fn mutate(chromosome: &mut [bool], rate: f64, rng: &mut ChaCha8Rng) {
    for bit in chromosome.iter_mut() {
        if rng.gen::<f64>() < rate {
            *bit = !*bit;
        }
    }
}
