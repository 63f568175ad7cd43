//! Solution model for one planning run.
//!
//! The [`Solution`] is the engine's final output: the assignment map, the
//! set of active employees, and payroll metrics at employee, post and
//! global granularity. All maps are ordered so serialized output is
//! reproducible run to run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The status the solver finished with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// The final objective level was solved to proven optimality.
    Optimal,
    /// A solution was found without an optimality proof.
    Feasible,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Optimal => write!(f, "OPTIMAL"),
            SolverStatus::Feasible => write!(f, "FEASIBLE"),
        }
    }
}

/// Payroll metrics for a single employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMetrics {
    /// Monthly contract salary.
    pub contract_salary: Decimal,
    /// Hourly wage (`contract_salary / hours_base_month`).
    pub hourly_wage: Decimal,
    /// Total hours assigned for the month.
    pub hours_assigned: u32,
    /// Hours falling in the night window.
    pub hours_night: Decimal,
    /// Hours falling on holiday dates.
    pub hours_holiday: Decimal,
    /// Hours falling on Sunday dates.
    pub hours_sunday: Decimal,
    /// Distinct Sunday dates worked.
    pub num_sundays: u32,
    /// Overtime hours beyond the monthly budget.
    pub he_hours: Decimal,
    /// Hours the holiday surcharge applies to after the Sunday rule.
    pub rf_hours_applied: Decimal,
    /// Night surcharge value.
    pub val_rn: Decimal,
    /// Holiday surcharge value.
    pub val_rf: Decimal,
    /// Overtime surcharge value.
    pub val_he: Decimal,
    /// Base salary charged for the month (zero when inactive).
    pub salary_base: Decimal,
    /// Total cost of the employee.
    pub total: Decimal,
}

impl EmployeeMetrics {
    /// Metrics for an employee with no assignments.
    pub fn inactive(contract_salary: Decimal, hourly_wage: Decimal) -> Self {
        Self {
            contract_salary,
            hourly_wage,
            hours_assigned: 0,
            hours_night: Decimal::ZERO,
            hours_holiday: Decimal::ZERO,
            hours_sunday: Decimal::ZERO,
            num_sundays: 0,
            he_hours: Decimal::ZERO,
            rf_hours_applied: Decimal::ZERO,
            val_rn: Decimal::ZERO,
            val_rf: Decimal::ZERO,
            val_he: Decimal::ZERO,
            salary_base: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Cost metrics for a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    /// Human-readable post name.
    pub name: String,
    /// Number of shift slots generated for the post.
    pub total_shifts: usize,
    /// Proportionally allocated cost of covering the post.
    pub total_cost: Decimal,
}

/// Aggregate metrics across the whole month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalMetrics {
    /// Number of employees with at least one assignment.
    pub active_employees: usize,
    /// Active fixed employees.
    pub fixed_active: usize,
    /// Active floaters.
    pub floaters_active: usize,
    /// Total overtime hours.
    pub total_he_hours: Decimal,
    /// Total holiday-surcharge hours after the Sunday rule.
    pub total_rf_hours: Decimal,
    /// Total night hours.
    pub total_rn_hours: Decimal,
    /// Total overtime surcharge value.
    pub total_val_he: Decimal,
    /// Total holiday surcharge value.
    pub total_val_rf: Decimal,
    /// Total night surcharge value.
    pub total_val_rn: Decimal,
    /// Total base salary of active employees.
    pub total_salary_base: Decimal,
    /// Grand total cost.
    pub total_cost: Decimal,
    /// Average cost per post.
    pub cost_per_post: Decimal,
    /// Employees whose Sunday count exceeds the threshold.
    pub employees_with_excess_sundays: usize,
}

/// The complete output of one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Shift id → employee id, exactly one entry per generated shift.
    pub assignments: BTreeMap<String, String>,
    /// Employees with at least one assignment.
    pub active_employees: BTreeSet<String>,
    /// Per-employee payroll metrics.
    pub employee_metrics: BTreeMap<String, EmployeeMetrics>,
    /// Per-post cost metrics.
    pub post_metrics: BTreeMap<String, PostMetrics>,
    /// Aggregate metrics.
    pub totals: TotalMetrics,
    /// The optimum of the final objective level.
    pub objective_value: i64,
    /// The status the solver finished with.
    pub solver_status: SolverStatus,
    /// Wall-clock solve time in seconds, across all levels.
    pub solve_time_secs: f64,
}

impl Solution {
    /// Returns the shifts assigned to the given employee.
    pub fn shifts_of<'a>(&'a self, emp_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.assignments
            .iter()
            .filter(move |(_, assigned)| assigned.as_str() == emp_id)
            .map(|(shift_id, _)| shift_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_solver_status_display() {
        assert_eq!(format!("{}", SolverStatus::Optimal), "OPTIMAL");
        assert_eq!(format!("{}", SolverStatus::Feasible), "FEASIBLE");
    }

    #[test]
    fn test_inactive_metrics_are_zeroed() {
        let metrics = EmployeeMetrics::inactive(dec("1423500"), dec("6470.45"));
        assert_eq!(metrics.hours_assigned, 0);
        assert_eq!(metrics.salary_base, Decimal::ZERO);
        assert_eq!(metrics.total, Decimal::ZERO);
        assert_eq!(metrics.contract_salary, dec("1423500"));
    }

    #[test]
    fn test_shifts_of_filters_by_employee() {
        let mut assignments = BTreeMap::new();
        assignments.insert("P001_20250101_DAY".to_string(), "E001".to_string());
        assignments.insert("P001_20250101_NIGHT".to_string(), "E002".to_string());
        assignments.insert("P001_20250102_DAY".to_string(), "E001".to_string());

        let solution = Solution {
            assignments,
            active_employees: BTreeSet::new(),
            employee_metrics: BTreeMap::new(),
            post_metrics: BTreeMap::new(),
            totals: TotalMetrics {
                active_employees: 0,
                fixed_active: 0,
                floaters_active: 0,
                total_he_hours: Decimal::ZERO,
                total_rf_hours: Decimal::ZERO,
                total_rn_hours: Decimal::ZERO,
                total_val_he: Decimal::ZERO,
                total_val_rf: Decimal::ZERO,
                total_val_rn: Decimal::ZERO,
                total_salary_base: Decimal::ZERO,
                total_cost: Decimal::ZERO,
                cost_per_post: Decimal::ZERO,
                employees_with_excess_sundays: 0,
            },
            objective_value: 0,
            solver_status: SolverStatus::Optimal,
            solve_time_secs: 0.0,
        };

        let shifts: Vec<&str> = solution.shifts_of("E001").collect();
        assert_eq!(shifts, vec!["P001_20250101_DAY", "P001_20250102_DAY"]);
    }

    #[test]
    fn test_solution_serializes_with_ordered_maps() {
        let mut assignments = BTreeMap::new();
        assignments.insert("b".to_string(), "E001".to_string());
        assignments.insert("a".to_string(), "E002".to_string());

        let json = serde_json::to_string(&assignments).unwrap();
        // BTreeMap serializes keys in sorted order.
        assert!(json.find("\"a\"").unwrap() < json.find("\"b\"").unwrap());
    }
}
