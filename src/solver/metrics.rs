//! Metric extraction from a solved model.
//!
//! Reads the decision and aggregate variables back, converts centihours to
//! decimal hours, recomputes Sunday counts from the assigned shifts (the
//! post-processing convention, independent of the solver's indicators) and
//! prices the roster in currency.

use rust_decimal::Decimal;
use selen::prelude::Solution as CpSolution;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::config::EmployeeKind;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{EmployeeMetrics, PostMetrics, Solution, SolverStatus, TotalMetrics};

use super::builder::ModelVars;
use super::context::PlannerContext;

/// Converts solver values into the caller-owned [`Solution`].
pub(crate) fn extract_solution(
    ctx: &PlannerContext<'_>,
    cp: &CpSolution,
    vars: &ModelVars,
    objective_value: i64,
    solve_time: Duration,
) -> PlannerResult<Solution> {
    let mut assignments: BTreeMap<String, String> = BTreeMap::new();
    let mut assigned_shifts: Vec<Vec<usize>> = vec![Vec::new(); ctx.employees.len()];

    for (&(e, s), &var) in &vars.x {
        if cp.get::<i32>(var) == 1 {
            assignments.insert(ctx.shifts[s].id.clone(), ctx.employees[e].emp_id.clone());
            assigned_shifts[e].push(s);
        }
    }

    // Active means holding at least one assignment. The model's activation
    // variable only upper-bounds the assignments, so it is not read back.
    let active_employees: BTreeSet<String> = ctx
        .employees
        .iter()
        .enumerate()
        .filter(|(e, _)| !assigned_shifts[*e].is_empty())
        .map(|(_, emp)| emp.emp_id.clone())
        .collect();

    let mut employee_metrics: BTreeMap<String, EmployeeMetrics> = BTreeMap::new();
    for (e, employee) in ctx.employees.iter().enumerate() {
        let wage = ctx.employee_data[e].hourly_wage;

        if !active_employees.contains(&employee.emp_id) {
            employee_metrics.insert(
                employee.emp_id.clone(),
                EmployeeMetrics::inactive(employee.contract_salary, wage),
            );
            continue;
        }

        let hours_assigned = cp.get::<i32>(vars.hours_assigned[e]).max(0) as u32;
        let night_centi = i64::from(cp.get::<i32>(vars.hours_night[e]));
        let holiday_centi = i64::from(cp.get::<i32>(vars.hours_holiday[e]));
        let sunday_centi = i64::from(cp.get::<i32>(vars.hours_sunday[e]));
        let he_centi = i64::from(cp.get::<i32>(vars.he_hours[e]));

        // The per-shift totals must agree with the aggregate the solver
        // reports; a disagreement means the model and the shift data
        // diverged.
        let expected_centi: i64 = assigned_shifts[e]
            .iter()
            .map(|&s| i64::from(ctx.shifts[s].duration_hours) * 100)
            .sum();
        if expected_centi != i64::from(hours_assigned) * 100 {
            return Err(PlannerError::HourBudgetMismatch {
                emp_id: employee.emp_id.clone(),
                expected: expected_centi,
                got: i64::from(hours_assigned) * 100,
            });
        }

        // Distinct Sunday dates actually worked, from the decomposition.
        let sunday_dates: BTreeSet<chrono::NaiveDate> = assigned_shifts[e]
            .iter()
            .flat_map(|&s| ctx.shifts[s].sunday_dates())
            .collect();
        let num_sundays = sunday_dates.len() as u32;

        let hours_night = centi_to_hours(night_centi);
        let hours_holiday = centi_to_hours(holiday_centi);
        let hours_sunday = centi_to_hours(sunday_centi);
        let he_hours = centi_to_hours(he_centi);

        // Sunday hours convert to holiday-surcharge hours past the threshold.
        let rf_hours_applied = if num_sundays > ctx.config.global.sunday_threshold {
            hours_holiday + hours_sunday
        } else {
            hours_holiday
        };

        let global = &ctx.config.global;
        let val_rn = global.rn_pct * hours_night * wage;
        let val_rf = global.rf_pct * rf_hours_applied * wage;
        let val_he = global.he_pct * he_hours * wage;
        let salary_base = employee.contract_salary;
        let total = val_rn + val_rf + val_he + salary_base;

        employee_metrics.insert(
            employee.emp_id.clone(),
            EmployeeMetrics {
                contract_salary: employee.contract_salary,
                hourly_wage: wage,
                hours_assigned,
                hours_night,
                hours_holiday,
                hours_sunday,
                num_sundays,
                he_hours,
                rf_hours_applied,
                val_rn,
                val_rf,
                val_he,
                salary_base,
                total,
            },
        );
    }

    let post_metrics = post_metrics(ctx, &assignments, &employee_metrics);
    let totals = total_metrics(ctx, &employee_metrics);

    Ok(Solution {
        assignments,
        active_employees,
        employee_metrics,
        post_metrics,
        totals,
        objective_value,
        solver_status: SolverStatus::Optimal,
        solve_time_secs: solve_time.as_secs_f64(),
    })
}

/// Allocates roster cost to posts proportionally: each covered shift costs
/// its employee's `total / hours_assigned` times the shift duration.
fn post_metrics(
    ctx: &PlannerContext<'_>,
    assignments: &BTreeMap<String, String>,
    employee_metrics: &BTreeMap<String, EmployeeMetrics>,
) -> BTreeMap<String, PostMetrics> {
    let mut metrics = BTreeMap::new();

    for post in &ctx.posts {
        let post_shifts: Vec<&crate::models::Shift> = ctx
            .shifts
            .iter()
            .filter(|s| s.post_id == post.post_id)
            .collect();

        let mut total_cost = Decimal::ZERO;
        for shift in &post_shifts {
            let Some(emp_id) = assignments.get(&shift.id) else {
                continue;
            };
            let Some(emp) = employee_metrics.get(emp_id) else {
                continue;
            };
            if emp.hours_assigned > 0 {
                let hourly = emp.total / Decimal::from(emp.hours_assigned);
                total_cost += hourly * Decimal::from(shift.duration_hours);
            }
        }

        metrics.insert(
            post.post_id.clone(),
            PostMetrics {
                name: post.name.clone(),
                total_shifts: post_shifts.len(),
                total_cost,
            },
        );
    }

    metrics
}

/// Aggregates employee metrics into the month totals.
fn total_metrics(
    ctx: &PlannerContext<'_>,
    employee_metrics: &BTreeMap<String, EmployeeMetrics>,
) -> TotalMetrics {
    let worked: Vec<(&str, &EmployeeMetrics)> = employee_metrics
        .iter()
        .filter(|(_, m)| m.hours_assigned > 0)
        .map(|(id, m)| (id.as_str(), m))
        .collect();

    let kind_of = |emp_id: &str| {
        ctx.employees
            .iter()
            .find(|e| e.emp_id == emp_id)
            .map(|e| e.kind)
    };
    let fixed_active = worked
        .iter()
        .filter(|(id, _)| kind_of(id) == Some(EmployeeKind::Fixed))
        .count();
    let floaters_active = worked
        .iter()
        .filter(|(id, _)| kind_of(id) == Some(EmployeeKind::Floater))
        .count();

    let total_he_hours: Decimal = worked.iter().map(|(_, m)| m.he_hours).sum();
    let total_rf_hours: Decimal = worked.iter().map(|(_, m)| m.rf_hours_applied).sum();
    let total_rn_hours: Decimal = worked.iter().map(|(_, m)| m.hours_night).sum();
    let total_val_he: Decimal = worked.iter().map(|(_, m)| m.val_he).sum();
    let total_val_rf: Decimal = worked.iter().map(|(_, m)| m.val_rf).sum();
    let total_val_rn: Decimal = worked.iter().map(|(_, m)| m.val_rn).sum();
    let total_salary_base: Decimal = worked.iter().map(|(_, m)| m.salary_base).sum();
    let total_cost = total_val_he + total_val_rf + total_val_rn + total_salary_base;

    let employees_with_excess_sundays = worked
        .iter()
        .filter(|(_, m)| m.num_sundays > ctx.config.global.sunday_threshold)
        .count();

    let cost_per_post = if ctx.posts.is_empty() {
        Decimal::ZERO
    } else {
        total_cost / Decimal::from(ctx.posts.len() as u64)
    };

    TotalMetrics {
        active_employees: worked.len(),
        fixed_active,
        floaters_active,
        total_he_hours,
        total_rf_hours,
        total_rn_hours,
        total_val_he,
        total_val_rf,
        total_val_rn,
        total_salary_base,
        total_cost,
        cost_per_post,
        employees_with_excess_sundays,
    }
}

/// Centihours back to decimal hours.
fn centi_to_hours(centihours: i64) -> Decimal {
    Decimal::from(centihours) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centi_to_hours() {
        assert_eq!(centi_to_hours(600), Decimal::from(6));
        assert_eq!(centi_to_hours(33), Decimal::new(33, 2));
        assert_eq!(centi_to_hours(0), Decimal::ZERO);
    }
}
