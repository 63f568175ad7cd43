//! Core data models for the roster engine.
//!
//! This module contains the derived domain records: generated shifts with
//! their per-date hour decomposition, and the solution produced by a run.

mod shift;
mod solution;

pub use shift::{DayHours, Shift};
pub use solution::{EmployeeMetrics, PostMetrics, Solution, SolverStatus, TotalMetrics};
