//! Core data types shared by the graph preprocessor, ACO, cargo simulator
//! and GA stages.

use serde::{Deserialize, Serialize};

/// A pickup-delivery job: carry `reward` units of value from `pickup` to
/// `delivery`. The parcel's position in the owning `Vec<Parcel>` is its
/// stable identifier throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub pickup: usize,
    pub delivery: usize,
    pub reward: f64,
}

impl Parcel {
    pub fn new(pickup: usize, delivery: usize, reward: f64) -> Self {
        Parcel { pickup, delivery, reward }
    }
}

/// A symmetric partial adjacency table over `n` cities: `weights[i][j]`
/// is `Some(distance)` when a direct road exists, `None` otherwise.
/// Self-entries are always `None` (self-distance is zero by convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTable {
    pub n: usize,
    pub weights: Vec<Vec<Option<f64>>>,
}

impl EdgeTable {
    pub fn new(n: usize) -> Self {
        EdgeTable { n, weights: vec![vec![None; n]; n] }
    }

    /// Record a symmetric edge `{a, b}` with the given positive distance.
    pub fn add_edge(&mut self, a: usize, b: usize, dist: f64) {
        self.weights[a][b] = Some(dist);
        self.weights[b][a] = Some(dist);
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.weights[i][j]
    }
}

/// A concrete node-by-node tour, beginning and ending at the base city,
/// with no two consecutive duplicates.
pub type Tour = Vec<usize>;

/// A permutation of parcel indices giving their execution order.
pub type ParcelOrder = Vec<usize>;

/// What the vehicle is doing at a given tour-edge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    Empty,
    Load,
    Carry,
    Unload,
}

/// Per tour-edge annotation produced by the cargo simulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepRecord {
    pub current_city: usize,
    pub robbery_probability: f64,
    pub protection_cost: f64,
    pub cargo_value: f64,
    pub cargo_parcel_id: Option<usize>,
    pub action: StepAction,
}

/// One edge of the fixed tour as consumed by the GA: the city the
/// vehicle departs from, the robbery probability on that edge, and the
/// cost of buying protection on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteEdge {
    pub current_city: usize,
    pub robbery_probability: f64,
    pub protection_cost: f64,
}

/// A protect/don't-protect decision bitstring, one entry per tour edge.
pub type ProtectBits = Vec<bool>;

/// Sentinel distance used for unreachable pairs after Floyd-Warshall,
/// per spec.
pub const UNREACHABLE: f64 = 1e9;
