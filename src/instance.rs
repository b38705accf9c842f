//! Loading and representing a routing instance: the partial road graph,
//! the parcel list, the base city and (for CLI convenience) a per-edge
//! robbery probability table.
//!
//! This is the ambient on-disk format the core pipeline is driven from.
//! The core itself (graph/aco/cargo_sim/genetic) never touches a file.

use crate::error::{Result, SolverError};
use crate::types::{EdgeTable, Parcel, RouteEdge};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A complete routing instance as loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInstance {
    pub name: String,
    /// Number of cities.
    pub n: usize,
    /// Base city id.
    pub base: usize,
    /// Undirected partial edges: (city_a, city_b, distance).
    pub edges: Vec<(usize, usize, f64)>,
    /// Parcels to deliver.
    pub parcels: Vec<Parcel>,
    /// Optional directed robbery probability for edge (u, v), in [0,1].
    /// Missing entries default to 0.0 (no risk).
    #[serde(default)]
    pub robbery_probability: Vec<(usize, usize, f64)>,
}

impl RouteInstance {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let instance: RouteInstance = serde_json::from_str(&text)?;
        instance.validate()?;
        Ok(instance)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let instance: RouteInstance = serde_json::from_str(text)?;
        instance.validate()?;
        Ok(instance)
    }

    /// Validate per spec.md §7's InvalidGraph condition: every parcel
    /// city and the base must be < n, and pickup != delivery.
    pub fn validate(&self) -> Result<()> {
        if self.base >= self.n {
            return Err(SolverError::InvalidGraph(format!("base {} >= N {}", self.base, self.n)));
        }
        for (idx, p) in self.parcels.iter().enumerate() {
            if p.pickup >= self.n || p.delivery >= self.n {
                return Err(SolverError::InvalidGraph(format!(
                    "parcel {idx} references a city >= N {}",
                    self.n
                )));
            }
            if p.pickup == p.delivery {
                return Err(SolverError::InvalidGraph(format!(
                    "parcel {idx} has identical pickup and delivery city"
                )));
            }
        }
        for &(a, b, w) in &self.edges {
            if a >= self.n || b >= self.n {
                return Err(SolverError::InvalidGraph(format!("edge ({a},{b}) references a city >= N {}", self.n)));
            }
            if w <= 0.0 {
                return Err(SolverError::InvalidGraph(format!("edge ({a},{b}) has non-positive weight {w}")));
            }
        }
        Ok(())
    }

    /// Build the dense partial adjacency table consumed by the graph
    /// preprocessor.
    pub fn edge_table(&self) -> EdgeTable {
        let mut table = EdgeTable::new(self.n);
        for &(a, b, w) in &self.edges {
            table.add_edge(a, b, w);
        }
        table
    }

    fn probability(&self, u: usize, v: usize) -> f64 {
        self.robbery_probability
            .iter()
            .find(|&&(a, b, _)| a == u && b == v)
            .map(|&(_, _, p)| p)
            .unwrap_or(0.0)
    }

    /// Average outgoing robbery probability from `u`, over every edge
    /// this instance declares as originating at `u`. Zero when `u` has
    /// no declared outgoing edges.
    fn average_outgoing_probability(&self, u: usize) -> f64 {
        let outgoing: Vec<f64> = self
            .robbery_probability
            .iter()
            .filter(|&&(a, _, _)| a == u)
            .map(|&(_, _, p)| p)
            .collect();
        if outgoing.is_empty() {
            0.0
        } else {
            outgoing.iter().sum::<f64>() / outgoing.len() as f64
        }
    }

    /// Build the GA's `route_data` from a fixed ACO tour: for each
    /// successive pair `(u, v)` produce `(u, edge_prob(u,v),
    /// derived_cost(u))`, where `derived_cost(u) = 100 * average
    /// outgoing edge probability from u`, matching the collaborator
    /// contract in spec.md §6.
    pub fn route_data(&self, tour: &[usize]) -> Vec<RouteEdge> {
        tour.windows(2)
            .map(|w| RouteEdge {
                current_city: w[0],
                robbery_probability: self.probability(w[0], w[1]),
                protection_cost: 100.0 * self.average_outgoing_probability(w[0]),
            })
            .collect()
    }
}
