//! Immutable planning context shared by every solve level.
//!
//! The context indexes the configuration and the generated shift set once:
//! employees and posts sorted by identifier, per-employee wage and hour
//! budget, eligibility, conflict pairs and Sunday dates. Every
//! lexicographic level builds its model from the same context.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::{Config, Employee, EmployeeKind, Post};
use crate::error::{PlannerError, PlannerResult};
use crate::models::Shift;
use crate::schedule::conflicting_pairs;

/// Derived payroll data for one employee.
#[derive(Debug, Clone)]
pub struct EmployeeData {
    /// Hourly wage (`contract_salary / hours_base_month`).
    pub hourly_wage: Decimal,
    /// Pre-overtime hour budget for the month, in hours.
    pub budget_hours: Decimal,
    /// The budget in centihours, truncated.
    pub budget_centihours: i64,
}

/// Indexed, immutable view of one planning problem.
pub struct PlannerContext<'a> {
    /// The input configuration.
    pub config: &'a Config,
    /// The generated shift set, in generation order.
    pub shifts: &'a [Shift],
    /// Employees sorted by identifier.
    pub employees: Vec<&'a Employee>,
    /// Posts sorted by identifier.
    pub posts: Vec<&'a Post>,
    /// Per-employee derived payroll data, parallel to `employees`.
    pub employee_data: Vec<EmployeeData>,
    /// Shift indices an employee may take, parallel to `employees`.
    pub eligible: Vec<Vec<usize>>,
    /// Conflicting shift pairs as indices into `shifts`.
    pub conflicts: Vec<(usize, usize)>,
    /// Every Sunday date of the month, in order.
    pub sundays: Vec<NaiveDate>,
}

impl<'a> PlannerContext<'a> {
    /// Builds the context, failing fast on insufficient fixed staffing.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InsufficientFixedStaffing`] when any post has
    /// fewer fixed employees in the input than `min_fixed_per_post`.
    pub fn new(config: &'a Config, shifts: &'a [Shift]) -> PlannerResult<Self> {
        let mut employees: Vec<&Employee> = config.employees.iter().collect();
        employees.sort_by(|a, b| a.emp_id.cmp(&b.emp_id));

        let mut posts: Vec<&Post> = config.posts.iter().collect();
        posts.sort_by(|a, b| a.post_id.cmp(&b.post_id));

        // Minimum fixed staffing is an input-shape rule, not a solver
        // constraint.
        for post in &posts {
            let have = employees
                .iter()
                .filter(|e| {
                    e.kind == EmployeeKind::Fixed
                        && e.assigned_post_id.as_deref() == Some(post.post_id.as_str())
                })
                .count();
            if have < config.global.min_fixed_per_post {
                return Err(PlannerError::InsufficientFixedStaffing {
                    post_id: post.post_id.clone(),
                    have,
                    need: config.global.min_fixed_per_post,
                });
            }
        }

        let budget_hours = config.hours_budget();
        let budget_centihours = (budget_hours * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .unwrap_or(0);

        let employee_data = employees
            .iter()
            .map(|e| EmployeeData {
                hourly_wage: config.hourly_wage(e),
                budget_hours,
                budget_centihours,
            })
            .collect();

        let eligible = employees
            .iter()
            .map(|e| {
                shifts
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| is_eligible(e, s))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let shift_index: BTreeMap<&str, usize> = shifts
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();
        let conflicts = conflicting_pairs(shifts)
            .iter()
            .filter_map(|(a, b)| Some((*shift_index.get(a.as_str())?, *shift_index.get(b.as_str())?)))
            .collect();

        Ok(Self {
            config,
            shifts,
            employees,
            posts,
            employee_data,
            eligible,
            conflicts,
            sundays: config.sundays(),
        })
    }

    /// The effective distinct-post cap for a floater.
    ///
    /// The per-employee cap wins when it is positive; otherwise the global
    /// cap applies.
    pub fn floater_cap(&self, employee: &Employee) -> u32 {
        if employee.max_posts_if_floater > 0 {
            employee.max_posts_if_floater
        } else {
            self.config.global.max_posts_per_floater
        }
    }

    /// Shift indices of the given post.
    pub fn shifts_of_post(&self, post_id: &str) -> Vec<usize> {
        self.shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| s.post_id == post_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// The number of shifts an employee may take.
    pub fn eligible_count(&self, emp_idx: usize) -> usize {
        self.eligible[emp_idx].len()
    }
}

/// Whether the employee-kind rule permits the employee on the shift.
pub fn is_eligible(employee: &Employee, shift: &Shift) -> bool {
    match employee.kind {
        EmployeeKind::Fixed => employee.assigned_post_id.as_deref() == Some(shift.post_id.as_str()),
        EmployeeKind::Floater => true,
    }
}
