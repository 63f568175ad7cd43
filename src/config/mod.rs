//! Configuration loading and management for the roster engine.
//!
//! This module provides the typed input records for one planning month and
//! a YAML loader for them.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::Config;
//!
//! let config = Config::from_yaml_file("./config/january.yaml").unwrap();
//! println!("Posts: {}, employees: {}", config.posts.len(), config.employees.len());
//! ```

mod loader;
mod types;

pub use types::{days_in_month, Config, Employee, EmployeeKind, GlobalConfig, Holiday, Post};
