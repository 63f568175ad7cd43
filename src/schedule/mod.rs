//! Shift-space construction for one planning month.
//!
//! This module turns a [`Config`](crate::config::Config) into the derived
//! inputs of the optimisation model: the full shift set with per-date hour
//! decomposition, and the pairs of shifts that cannot be served by the
//! same employee.

mod conflicts;
mod day_hours;
mod generator;

pub use conflicts::{conflicting_pairs, shifts_conflict};
pub use day_hours::decompose_interval;
pub use generator::generate_shifts;
