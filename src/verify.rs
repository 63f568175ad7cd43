//! Independent solution verification.
//!
//! Recomputes every structural invariant and the reported metrics straight
//! from the assignment map and the shift data, without consulting the
//! solver. Deviations annotate the result as errors or warnings; nothing
//! here panics or raises.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, warn};

use crate::config::{Config, Employee, EmployeeKind, Post};
use crate::error::PlannerError;
use crate::models::{Shift, Solution};
use crate::schedule::shifts_conflict;

/// The outcome of verifying one solution.
#[derive(Debug, Default)]
pub struct VerificationResult {
    /// Whether the solution passed without errors.
    pub is_valid: bool,
    /// Error-severity findings.
    pub errors: Vec<String>,
    /// Warning-severity findings.
    pub warnings: Vec<String>,
    /// Summary counters.
    pub metrics: BTreeMap<String, i64>,
}

impl VerificationResult {
    fn new() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    fn add_error(&mut self, message: String) {
        error!(finding = %message, "verification error");
        self.errors.push(message);
        self.is_valid = false;
    }

    fn add_warning(&mut self, message: String) {
        warn!(finding = %message, "verification warning");
        self.warnings.push(message);
    }

    fn add_metric(&mut self, key: &str, value: i64) {
        self.metrics.insert(key.to_string(), value);
    }
}

/// Verifies a solution against the configuration and shift set.
///
/// Checks performed:
/// 1. coverage per shift
/// 2. employee assignment rules (fixed-to-post, availability, known ids)
/// 3. conflict absence (no overlapping or abutting pairs per employee)
/// 4. floater distinct-post caps
/// 5. minimum fixed employees per post (warning severity)
/// 6. metric recomputation from the per-date hour decomposition
pub fn verify_solution(
    solution: &Solution,
    config: &Config,
    shifts: &[Shift],
) -> VerificationResult {
    let mut result = VerificationResult::new();

    let employees: BTreeMap<&str, &Employee> = config
        .employees
        .iter()
        .map(|e| (e.emp_id.as_str(), e))
        .collect();
    let posts: BTreeMap<&str, &Post> =
        config.posts.iter().map(|p| (p.post_id.as_str(), p)).collect();
    let shifts_by_id: BTreeMap<&str, &Shift> = shifts.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut employee_shifts: BTreeMap<&str, Vec<&Shift>> = BTreeMap::new();
    for (shift_id, emp_id) in &solution.assignments {
        if let Some(shift) = shifts_by_id.get(shift_id.as_str()) {
            employee_shifts
                .entry(emp_id.as_str())
                .or_default()
                .push(shift);
        }
    }

    verify_coverage(&mut result, solution, shifts, &posts);
    verify_employee_rules(&mut result, solution, &shifts_by_id, &employees);
    verify_no_conflicts(&mut result, &employee_shifts);
    verify_floater_caps(&mut result, &employee_shifts, &employees, config);
    verify_minimum_fixed(&mut result, solution, &employees, &posts, config);
    verify_metrics(&mut result, solution, config, &employee_shifts);

    result.add_metric("total_assignments", solution.assignments.len() as i64);
    result.add_metric("active_employees", solution.active_employees.len() as i64);
    result.add_metric("total_errors", result.errors.len() as i64);
    result.add_metric("total_warnings", result.warnings.len() as i64);

    result
}

/// Every generated shift carries exactly its required coverage.
fn verify_coverage(
    result: &mut VerificationResult,
    solution: &Solution,
    shifts: &[Shift],
    posts: &BTreeMap<&str, &Post>,
) {
    let mut uncovered = 0i64;
    for shift in shifts {
        let required = posts
            .get(shift.post_id.as_str())
            .map(|p| i64::from(p.required_coverage))
            .unwrap_or(1);
        let assigned = i64::from(solution.assignments.contains_key(&shift.id));
        if assigned != required {
            result.add_error(format!(
                "Shift {} has {} assignments, requires {}",
                shift.id, assigned, required
            ));
            uncovered += 1;
        }
    }
    result.add_metric("uncovered_shifts", uncovered);
}

/// Fixed-to-post rule, availability windows and known employee ids.
fn verify_employee_rules(
    result: &mut VerificationResult,
    solution: &Solution,
    shifts_by_id: &BTreeMap<&str, &Shift>,
    employees: &BTreeMap<&str, &Employee>,
) {
    for (shift_id, emp_id) in &solution.assignments {
        let Some(shift) = shifts_by_id.get(shift_id.as_str()) else {
            result.add_error(format!("Assignment references unknown shift {}", shift_id));
            continue;
        };
        let Some(employee) = employees.get(emp_id.as_str()) else {
            result.add_error(
                PlannerError::UnknownEmployeeInAssignment {
                    emp_id: emp_id.clone(),
                    shift_id: shift_id.clone(),
                }
                .to_string(),
            );
            continue;
        };

        if employee.kind == EmployeeKind::Fixed
            && employee.assigned_post_id.as_deref() != Some(shift.post_id.as_str())
        {
            result.add_error(format!(
                "Fixed employee {} assigned to post {}, should be {}",
                emp_id,
                shift.post_id,
                employee.assigned_post_id.as_deref().unwrap_or("-")
            ));
        }

        if shift.date < employee.available_from || shift.date > employee.available_to {
            result.add_error(format!(
                "Employee {} assigned to shift {} outside availability window",
                emp_id, shift_id
            ));
        }
    }
}

/// No employee holds two overlapping or back-to-back shifts.
fn verify_no_conflicts(
    result: &mut VerificationResult,
    employee_shifts: &BTreeMap<&str, Vec<&Shift>>,
) {
    let mut violations = 0i64;
    for (emp_id, shifts) in employee_shifts {
        for (i, a) in shifts.iter().enumerate() {
            for b in &shifts[i + 1..] {
                if shifts_conflict(a, b) {
                    result.add_error(format!(
                        "Employee {}: conflicting shifts {} and {}",
                        emp_id, a.id, b.id
                    ));
                    violations += 1;
                }
            }
        }
    }
    result.add_metric("conflict_violations", violations);
}

/// Floaters stay within their effective distinct-post cap.
fn verify_floater_caps(
    result: &mut VerificationResult,
    employee_shifts: &BTreeMap<&str, Vec<&Shift>>,
    employees: &BTreeMap<&str, &Employee>,
    config: &Config,
) {
    for (emp_id, shifts) in employee_shifts {
        let Some(employee) = employees.get(emp_id) else {
            continue;
        };
        if employee.kind != EmployeeKind::Floater {
            continue;
        }

        let posts_used: BTreeSet<&str> = shifts.iter().map(|s| s.post_id.as_str()).collect();
        let cap = if employee.max_posts_if_floater > 0 {
            employee.max_posts_if_floater
        } else {
            config.global.max_posts_per_floater
        };
        if posts_used.len() as u32 > cap {
            result.add_error(format!(
                "Floater {} assigned to {} posts, maximum allowed {}",
                emp_id,
                posts_used.len(),
                cap
            ));
        }
    }
}

/// Each post keeps at least the configured minimum of active fixed staff.
fn verify_minimum_fixed(
    result: &mut VerificationResult,
    solution: &Solution,
    employees: &BTreeMap<&str, &Employee>,
    posts: &BTreeMap<&str, &Post>,
    config: &Config,
) {
    for post_id in posts.keys() {
        let active_fixed = solution
            .active_employees
            .iter()
            .filter_map(|id| employees.get(id.as_str()))
            .filter(|e| {
                e.kind == EmployeeKind::Fixed && e.assigned_post_id.as_deref() == Some(*post_id)
            })
            .count();

        if active_fixed < config.global.min_fixed_per_post {
            result.add_warning(format!(
                "Post {} has {} active fixed employees, minimum recommended {}",
                post_id, active_fixed, config.global.min_fixed_per_post
            ));
        }
    }
}

/// Recomputes the reported metrics from the per-date decomposition.
fn verify_metrics(
    result: &mut VerificationResult,
    solution: &Solution,
    config: &Config,
    employee_shifts: &BTreeMap<&str, Vec<&Shift>>,
) {
    let hour_tolerance = Decimal::new(1, 2); // 0.01 h
    let overtime_tolerance = Decimal::ONE; // 1.0 h

    for (emp_id, metrics) in &solution.employee_metrics {
        if !solution.active_employees.contains(emp_id) {
            continue;
        }
        let assigned = employee_shifts
            .get(emp_id.as_str())
            .cloned()
            .unwrap_or_default();

        let calc_hours: i64 = assigned.iter().map(|s| i64::from(s.duration_hours)).sum();
        if calc_hours != i64::from(metrics.hours_assigned) {
            result.add_error(format!(
                "Employee {}: hours assigned mismatch - calculated {}, reported {}",
                emp_id, calc_hours, metrics.hours_assigned
            ));
        }

        // The centihour aggregates must equal 100x the per-date sums.
        let total_centi: i64 = assigned
            .iter()
            .flat_map(|s| s.hours_by_day.values())
            .map(|dh| {
                (dh.total_hours * Decimal::ONE_HUNDRED)
                    .trunc()
                    .to_i64()
                    .unwrap_or(0)
            })
            .sum();
        if total_centi != calc_hours * 100 {
            result.add_error(
                PlannerError::HourBudgetMismatch {
                    emp_id: emp_id.clone(),
                    expected: calc_hours * 100,
                    got: total_centi,
                }
                .to_string(),
            );
        }

        let calc_night: i64 = assigned.iter().map(|s| s.night_centihours()).sum();
        compare_centihours(result, emp_id, "night", calc_night, metrics.hours_night, hour_tolerance);

        let calc_holiday: i64 = assigned.iter().map(|s| s.holiday_centihours()).sum();
        compare_centihours(
            result,
            emp_id,
            "holiday",
            calc_holiday,
            metrics.hours_holiday,
            hour_tolerance,
        );

        let calc_sunday: i64 = assigned.iter().map(|s| s.sunday_centihours()).sum();
        compare_centihours(
            result,
            emp_id,
            "sunday",
            calc_sunday,
            metrics.hours_sunday,
            hour_tolerance,
        );

        let sunday_dates: BTreeSet<chrono::NaiveDate> =
            assigned.iter().flat_map(|s| s.sunday_dates()).collect();
        if sunday_dates.len() as u32 != metrics.num_sundays {
            result.add_error(format!(
                "Employee {}: Sunday count mismatch - calculated {}, reported {}",
                emp_id,
                sunday_dates.len(),
                metrics.num_sundays
            ));
        }

        // The RF rule: past the threshold, Sunday hours convert to
        // holiday-surcharge hours.
        let expected_rf = if metrics.num_sundays > config.global.sunday_threshold {
            metrics.hours_holiday + metrics.hours_sunday
        } else {
            metrics.hours_holiday
        };
        if (expected_rf - metrics.rf_hours_applied).abs() > hour_tolerance {
            result.add_error(format!(
                "Employee {}: rf_hours_applied mismatch - expected {}, reported {}",
                emp_id, expected_rf, metrics.rf_hours_applied
            ));
        }

        // Overtime against the month-length budget; the solver rounds the
        // budget to integer centihours, hence the looser tolerance.
        let budget = config.hours_budget();
        let calc_he = (Decimal::from(calc_hours) - budget).max(Decimal::ZERO);
        if (calc_he - metrics.he_hours).abs() > overtime_tolerance {
            result.add_warning(format!(
                "Employee {}: overtime hours potential mismatch - calculated ~{:.1}, reported {}",
                emp_id, calc_he, metrics.he_hours
            ));
        }
    }
}

/// Compares a recomputed centihour aggregate with a reported decimal value.
fn compare_centihours(
    result: &mut VerificationResult,
    emp_id: &str,
    label: &str,
    calculated_centi: i64,
    reported_hours: Decimal,
    tolerance: Decimal,
) {
    let calculated = Decimal::from(calculated_centi) / Decimal::ONE_HUNDRED;
    if (calculated - reported_hours).abs() > tolerance {
        result.add_error(format!(
            "Employee {}: {} hours mismatch - calculated {}, reported {}",
            emp_id, label, calculated, reported_hours
        ));
    }
}
