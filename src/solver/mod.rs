//! The constraint-optimisation core.
//!
//! Builds a constraint model over boolean assignment variables and integer
//! hour aggregates, then minimises an ordered hierarchy of labour-cost
//! objectives, each level re-solving under "no worse than optimum" bounds
//! from the previous levels. The Sunday-distribution level is pluggable
//! via [`SundayPolicy`].

mod builder;
mod context;
mod driver;
mod metrics;
mod objective;
mod sunday_policy;

pub use context::{EmployeeData, PlannerContext};
pub use driver::Planner;
pub use objective::ObjectiveKind;
pub use sunday_policy::{excess_weight, infer_roles, SundayPolicy, SundayRole};
