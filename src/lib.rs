//! Pickup-delivery routing with robbery-protection optimization.
//!
//! Two cooperating metaheuristics solve a sequential decomposition of a
//! pickup-delivery vehicle routing problem:
//!
//! - [`heuristics::aco`] finds a parcel execution order and a concrete
//!   node tour starting and ending at a base city, approximately
//!   minimizing traveled distance.
//! - [`cargo_sim`] replays that tour to determine what the vehicle
//!   carries and its value at every step.
//! - [`heuristics::genetic`] then finds, for the fixed tour, a bitstring
//!   of protect/don't-protect decisions per edge that maximizes expected
//!   net profit against a probabilistic robbery model.
//!
//! [`graph`] bridges the two stages by turning a partial, symmetric,
//! weighted adjacency table into dense all-pairs shortest paths.
//!
//! # Example
//!
//! ```
//! use pd_robbery_solver::graph::ShortestPaths;
//! use pd_robbery_solver::heuristics::{AcoConfig, AntColonyOptimizer};
//! use pd_robbery_solver::types::{EdgeTable, Parcel};
//!
//! let mut edges = EdgeTable::new(3);
//! edges.add_edge(0, 1, 10.0);
//! edges.add_edge(1, 2, 10.0);
//! edges.add_edge(0, 2, 30.0);
//! let shortest = ShortestPaths::build(&edges);
//!
//! let parcels = vec![Parcel::new(0, 2, 500.0)];
//! let config = AcoConfig { iterations: 5, ants: 4, alpha: 1.0, beta: 2.0, rho: 0.5, seed: 1 };
//! let mut aco = AntColonyOptimizer::new(&shortest, &parcels, 0, config).unwrap();
//! let result = aco.solve();
//! assert_eq!(result.best_tour, vec![0, 1, 2, 1, 0]);
//! ```

pub mod benchmark;
pub mod cargo_sim;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod instance;
pub mod report;
pub mod types;

pub use error::{Result, SolverError};
pub use instance::RouteInstance;
pub use report::RunReport;
