//! Serializable bundle of one end-to-end run, for the CLI's `--output`
//! flag and for benchmark aggregation.

use crate::heuristics::{AcoOutput, GaOutput};
use crate::types::StepRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub instance_name: String,
    pub generated_at: DateTime<Utc>,
    pub best_tour: Vec<usize>,
    pub best_distance: f64,
    pub parcel_order: Vec<usize>,
    pub aco_history: Vec<f64>,
    pub cargo_steps: Vec<StepRecord>,
    pub base_revenue: f64,
    pub protect_bits: Vec<bool>,
    pub best_fitness: f64,
    pub ga_history: Vec<f64>,
    pub aco_seconds: f64,
    pub ga_seconds: f64,
}

impl RunReport {
    pub fn new(
        instance_name: &str,
        generated_at: DateTime<Utc>,
        aco: &AcoOutput,
        cargo_steps: Vec<StepRecord>,
        base_revenue: f64,
        ga: &GaOutput,
        aco_seconds: f64,
        ga_seconds: f64,
    ) -> Self {
        RunReport {
            instance_name: instance_name.to_string(),
            generated_at,
            best_tour: aco.best_tour.clone(),
            best_distance: aco.best_distance,
            parcel_order: aco.parcel_order.clone(),
            aco_history: aco.history.clone(),
            cargo_steps,
            base_revenue,
            protect_bits: ga.protect_bits.clone(),
            best_fitness: ga.history.last().copied().unwrap_or(base_revenue),
            ga_history: ga.history.clone(),
            aco_seconds,
            ga_seconds,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
