//! Sunday-distribution policies.
//!
//! The middle lexicographic level is pluggable: each policy shapes how
//! excess Sundays (and therefore the converted holiday surcharge) are
//! spread across the roster. Policies are modelled as a tagged variant;
//! new policies plug in by adding a variant.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EmployeeKind;

use super::context::PlannerContext;

/// The pluggable Sunday-distribution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SundayPolicy {
    /// Role-weighted penalties: the cheapest fixed employee of each post
    /// absorbs excess Sundays first.
    Smart,
    /// Minimise the number of employees over the Sunday threshold.
    Balanced,
    /// Minimise the wage-weighted Sunday hour cost directly.
    CostFocused,
    /// Minimise the maximum assigned hours across employees.
    LoadBalancing,
    /// Minimise the maximum per-employee surcharge value.
    SurchargeEquity,
}

impl Default for SundayPolicy {
    fn default() -> Self {
        SundayPolicy::Smart
    }
}

impl std::fmt::Display for SundayPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SundayPolicy::Smart => "smart",
            SundayPolicy::Balanced => "balanced",
            SundayPolicy::CostFocused => "cost_focused",
            SundayPolicy::LoadBalancing => "load_balancing",
            SundayPolicy::SurchargeEquity => "surcharge_equity",
        })
    }
}

impl std::str::FromStr for SundayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smart" => Ok(SundayPolicy::Smart),
            "balanced" => Ok(SundayPolicy::Balanced),
            "cost_focused" => Ok(SundayPolicy::CostFocused),
            "load_balancing" => Ok(SundayPolicy::LoadBalancing),
            "surcharge_equity" => Ok(SundayPolicy::SurchargeEquity),
            other => Err(format!("unknown sunday policy '{}'", other)),
        }
    }
}

/// The Sunday role an employee plays under the smart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SundayRole {
    /// Cheapest fixed employee of a post; takes excess Sundays first.
    Champion,
    /// Second-cheapest fixed employee of a post.
    Helper,
    /// Remaining fixed employees of a post; strongly shielded.
    Other,
    /// Floaters, available as relief.
    Relief,
    /// Employees the role inference could not place.
    Unclassified,
}

/// Infers per-employee Sunday roles for the smart policy.
///
/// Per post, the fixed employees sorted ascending by contract salary become
/// champion, helper and others. Floaters are flagged as relief. The result
/// is parallel to `ctx.employees`.
pub fn infer_roles(ctx: &PlannerContext<'_>) -> Vec<SundayRole> {
    let mut roles = vec![SundayRole::Unclassified; ctx.employees.len()];

    for (idx, employee) in ctx.employees.iter().enumerate() {
        if employee.kind == EmployeeKind::Floater {
            roles[idx] = SundayRole::Relief;
        }
    }

    for post in &ctx.posts {
        let mut fixed: Vec<usize> = ctx
            .employees
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.kind == EmployeeKind::Fixed
                    && e.assigned_post_id.as_deref() == Some(post.post_id.as_str())
            })
            .map(|(i, _)| i)
            .collect();
        fixed.sort_by(|&a, &b| {
            ctx.employees[a]
                .contract_salary
                .cmp(&ctx.employees[b].contract_salary)
                .then_with(|| ctx.employees[a].emp_id.cmp(&ctx.employees[b].emp_id))
        });

        for (rank, &emp_idx) in fixed.iter().enumerate() {
            roles[emp_idx] = match rank {
                0 => SundayRole::Champion,
                1 => SundayRole::Helper,
                _ => SundayRole::Other,
            };
        }
    }

    roles
}

/// The excess-Sundays penalty weight for a role.
///
/// The gaps are deliberately large: the weights encode a near-lexicographic
/// preference over roles inside a single weighted minimisation.
pub fn excess_weight(role: SundayRole, contract_salary: Decimal) -> i64 {
    match role {
        SundayRole::Relief => 5,
        SundayRole::Champion => 1,
        SundayRole::Helper => 50,
        SundayRole::Other => 10_000,
        SundayRole::Unclassified => {
            let scaled = (contract_salary / Decimal::from(1000)).trunc();
            scaled.to_i64().unwrap_or(0) * 10
        }
    }
}
