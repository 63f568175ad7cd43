//! Error types for the roster engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while planning a month.

use thiserror::Error;

/// The main error type for the roster engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use roster_engine::error::PlannerError;
///
/// let error = PlannerError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration field was invalid or inconsistent.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A post has fewer fixed employees than the configured minimum.
    #[error("Post '{post_id}' has {have} fixed employees, minimum required is {need}")]
    InsufficientFixedStaffing {
        /// The understaffed post.
        post_id: String,
        /// How many fixed employees the input provides for the post.
        have: usize,
        /// The configured minimum.
        need: usize,
    },

    /// The solver found no solution at one of the lexicographic levels.
    #[error("Model infeasible at level '{level}'")]
    InfeasibleModel {
        /// The objective level that failed.
        level: String,
    },

    /// An assignment references an employee that is not in the configuration.
    #[error("Unknown employee '{emp_id}' assigned to shift '{shift_id}'")]
    UnknownEmployeeInAssignment {
        /// The unknown employee identifier.
        emp_id: String,
        /// The shift the employee was assigned to.
        shift_id: String,
    },

    /// A centihour aggregate disagrees with the assigned-hours total.
    #[error("Hour budget mismatch for employee '{emp_id}': expected {expected} centihours, got {got}")]
    HourBudgetMismatch {
        /// The employee whose aggregates disagree.
        emp_id: String,
        /// The expected centihour total (100 × assigned hours).
        expected: i64,
        /// The centihour total read back from the solver.
        got: i64,
    },
}

/// A type alias for Results that return PlannerError.
pub type PlannerResult<T> = Result<T, PlannerError>;
