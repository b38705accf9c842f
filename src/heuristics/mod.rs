//! Optimization heuristics: the Ant Colony Optimizer over parcel routing
//! and the Genetic Optimizer over robbery-protection decisions.

pub mod aco;
pub mod genetic;

pub use aco::{AcoConfig, AcoOutput, AntColonyOptimizer};
pub use genetic::{GaConfig, GaOutput, GeneticOptimizer};
