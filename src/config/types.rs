//! Configuration types for roster planning.
//!
//! This module contains the strongly-typed configuration structures that
//! describe one planning month: global parameters, holidays, guarded posts
//! and the employee roster. They are deserialized from YAML configuration
//! files or constructed directly by an embedding application.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{PlannerError, PlannerResult};

/// Global planning parameters, one per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// The year being planned.
    pub year: i32,
    /// The month being planned (1–12).
    pub month: u32,
    /// Time of day at which the night window ends.
    pub day_start: NaiveTime,
    /// Time of day at which the night window starts.
    pub night_start: NaiveTime,
    /// Shift duration in hours; 12 and 8 are the supported rotations.
    pub shift_length_hours: u32,
    /// Anchor time for the first slot of each day's rotation.
    pub shift_start_time: NaiveTime,
    /// Overtime surcharge as a fraction of the hourly wage.
    pub he_pct: Decimal,
    /// Holiday surcharge as a fraction of the hourly wage.
    pub rf_pct: Decimal,
    /// Night surcharge as a fraction of the hourly wage.
    pub rn_pct: Decimal,
    /// Divisor converting a monthly contract salary into an hourly wage.
    pub hours_base_month: Decimal,
    /// Contracted hours per week, used to derive the pre-overtime budget.
    pub hours_per_week: Decimal,
    /// Sunday count above which Sunday hours convert to holiday-surcharge hours.
    pub sunday_threshold: u32,
    /// Minimum number of fixed employees each post must have in the input.
    pub min_fixed_per_post: usize,
    /// Global cap on distinct posts a floater may serve in the month.
    pub max_posts_per_floater: u32,
    /// Overtime weight for the weighted single-objective strategy.
    pub w_he: Decimal,
    /// Holiday weight for the weighted single-objective strategy.
    pub w_rf: Decimal,
    /// Night weight for the weighted single-objective strategy.
    pub w_rn: Decimal,
    /// Base-salary weight for the weighted single-objective strategy.
    pub w_base: Decimal,
    /// Whether to solve lexicographically or with the weighted objective.
    pub use_lexicographic: bool,
}

/// A calendar holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The holiday date.
    pub date: NaiveDate,
    /// A human-readable description.
    pub description: String,
}

/// A guarded post requiring 24/7 coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    pub post_id: String,
    /// Human-readable post name.
    pub name: String,
    /// Number of distinct employees needed per shift slot.
    pub required_coverage: u32,
    /// Whether the post runs day slots.
    pub allow_day_shift: bool,
    /// Whether the post runs night slots.
    pub allow_night_shift: bool,
}

/// The contractual kind of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeKind {
    /// Pinned to a single post; may only take shifts there.
    Fixed,
    /// Eligible for any post, subject to a distinct-post cap.
    Floater,
}

impl std::fmt::Display for EmployeeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeKind::Fixed => write!(f, "FIXED"),
            EmployeeKind::Floater => write!(f, "FLOATER"),
        }
    }
}

/// An employee available for assignment during the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub emp_id: String,
    /// Fixed or floater.
    pub kind: EmployeeKind,
    /// The post a fixed employee is pinned to. Present iff `kind` is fixed.
    #[serde(default)]
    pub assigned_post_id: Option<String>,
    /// Monthly contract salary.
    pub contract_salary: Decimal,
    /// First day of availability.
    pub available_from: NaiveDate,
    /// Last day of availability.
    pub available_to: NaiveDate,
    /// Per-employee cap on distinct posts when floating; `0` defers to the
    /// global cap.
    #[serde(default)]
    pub max_posts_if_floater: u32,
}

/// The complete configuration for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global planning parameters.
    pub global: GlobalConfig,
    /// Calendar holidays for the month.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Guarded posts.
    pub posts: Vec<Post>,
    /// Employee roster.
    pub employees: Vec<Employee>,
}

impl Config {
    /// Returns the number of calendar days in the configured month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.global.year, self.global.month)
    }

    /// Returns every Sunday date of the configured month, in order.
    pub fn sundays(&self) -> Vec<NaiveDate> {
        (1..=self.days_in_month())
            .filter_map(|day| NaiveDate::from_ymd_opt(self.global.year, self.global.month, day))
            .filter(|d| d.weekday() == Weekday::Sun)
            .collect()
    }

    /// Returns the holiday dates as a set for fast membership tests.
    pub fn holiday_dates(&self) -> BTreeSet<NaiveDate> {
        self.holidays.iter().map(|h| h.date).collect()
    }

    /// Converts an employee's monthly contract salary into an hourly wage.
    pub fn hourly_wage(&self, employee: &Employee) -> Decimal {
        employee.contract_salary / self.global.hours_base_month
    }

    /// Returns the pre-overtime hour budget for the month, in hours.
    ///
    /// The budget is `hours_per_week / 7 × days_in_month`, assuming full
    /// month availability.
    pub fn hours_budget(&self) -> Decimal {
        self.global.hours_per_week / Decimal::from(7) * Decimal::from(self.days_in_month())
    }

    /// Validates the configuration's structural consistency.
    ///
    /// Checks performed:
    /// - the month is in `1..=12`
    /// - the shift length evenly divides a 24-hour day
    /// - the day window starts no later than the night window
    /// - availability windows are non-empty
    /// - fixed employees reference an existing post
    /// - salaries and hour divisors are positive
    pub fn validate(&self) -> PlannerResult<()> {
        if self.global.month == 0 || self.global.month > 12 {
            return Err(PlannerError::InvalidConfig {
                field: "month".to_string(),
                message: format!("month {} is outside 1..=12", self.global.month),
            });
        }
        if self.global.shift_length_hours == 0 || 24 % self.global.shift_length_hours != 0 {
            return Err(PlannerError::InvalidConfig {
                field: "shift_length_hours".to_string(),
                message: format!(
                    "shift length {} does not divide a 24-hour day",
                    self.global.shift_length_hours
                ),
            });
        }
        if self.global.day_start > self.global.night_start {
            return Err(PlannerError::InvalidConfig {
                field: "day_start".to_string(),
                message: format!(
                    "day window start {} is after night window start {}",
                    self.global.day_start, self.global.night_start
                ),
            });
        }
        if self.global.hours_base_month <= Decimal::ZERO {
            return Err(PlannerError::InvalidConfig {
                field: "hours_base_month".to_string(),
                message: "hours_base_month must be positive".to_string(),
            });
        }

        let post_ids: BTreeSet<&str> = self.posts.iter().map(|p| p.post_id.as_str()).collect();

        for employee in &self.employees {
            if employee.available_from > employee.available_to {
                return Err(PlannerError::InvalidConfig {
                    field: format!("employees.{}.available_from", employee.emp_id),
                    message: format!(
                        "availability window {}..{} is empty",
                        employee.available_from, employee.available_to
                    ),
                });
            }
            if employee.contract_salary <= Decimal::ZERO {
                return Err(PlannerError::InvalidConfig {
                    field: format!("employees.{}.contract_salary", employee.emp_id),
                    message: "contract salary must be positive".to_string(),
                });
            }
            if employee.kind == EmployeeKind::Fixed {
                match &employee.assigned_post_id {
                    Some(post_id) if post_ids.contains(post_id.as_str()) => {}
                    Some(post_id) => {
                        return Err(PlannerError::InvalidConfig {
                            field: format!("employees.{}.assigned_post_id", employee.emp_id),
                            message: format!("post '{}' does not exist", post_id),
                        });
                    }
                    None => {
                        return Err(PlannerError::InvalidConfig {
                            field: format!("employees.{}.assigned_post_id", employee.emp_id),
                            message: "fixed employees must be pinned to a post".to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Returns the number of calendar days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_global() -> GlobalConfig {
        GlobalConfig {
            year: 2025,
            month: 1,
            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            night_start: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            shift_length_hours: 12,
            shift_start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            he_pct: dec("1.25"),
            rf_pct: dec("0.80"),
            rn_pct: dec("0.35"),
            hours_base_month: dec("220"),
            hours_per_week: dec("44"),
            sunday_threshold: 2,
            min_fixed_per_post: 3,
            max_posts_per_floater: 4,
            w_he: dec("100"),
            w_rf: dec("10"),
            w_rn: dec("1"),
            w_base: dec("1"),
            use_lexicographic: true,
        }
    }

    fn test_config() -> Config {
        Config {
            global: test_global(),
            holidays: vec![Holiday {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                description: "New Year's Day".to_string(),
            }],
            posts: vec![Post {
                post_id: "P001".to_string(),
                name: "Main Gate".to_string(),
                required_coverage: 1,
                allow_day_shift: true,
                allow_night_shift: true,
            }],
            employees: vec![Employee {
                emp_id: "E001".to_string(),
                kind: EmployeeKind::Fixed,
                assigned_post_id: Some("P001".to_string()),
                contract_salary: dec("1423500"),
                available_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                available_to: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
                max_posts_if_floater: 0,
            }],
        }
    }

    #[test]
    fn test_days_in_month_regular_and_leap() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_sundays_january_2025() {
        let config = test_config();
        let sundays = config.sundays();
        let days: Vec<u32> = sundays.iter().map(|d| d.day()).collect();
        assert_eq!(days, vec![5, 12, 19, 26]);
    }

    #[test]
    fn test_hourly_wage() {
        let config = test_config();
        let wage = config.hourly_wage(&config.employees[0]);
        // 1,423,500 / 220
        assert_eq!(wage.round_dp(2), dec("6470.45"));
    }

    #[test]
    fn test_hours_budget_january() {
        let config = test_config();
        // 44 / 7 * 31 = 194.857...
        let budget = config.hours_budget();
        assert_eq!(budget.round_dp(2), dec("194.86"));
    }

    #[test]
    fn test_validate_accepts_consistent_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_month() {
        let mut config = test_config();
        config.global.month = 13;
        let result = config.validate();
        assert!(matches!(
            result,
            Err(PlannerError::InvalidConfig { field, .. }) if field == "month"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_shift_length() {
        let mut config = test_config();
        config.global.shift_length_hours = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_fixed_without_post() {
        let mut config = test_config();
        config.employees[0].assigned_post_id = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_post_reference() {
        let mut config = test_config();
        config.employees[0].assigned_post_id = Some("P999".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_availability_window() {
        let mut config = test_config();
        config.employees[0].available_from = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        config.employees[0].available_to = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_employee_kind_serialization() {
        assert_eq!(serde_json::to_string(&EmployeeKind::Fixed).unwrap(), "\"FIXED\"");
        assert_eq!(
            serde_json::to_string(&EmployeeKind::Floater).unwrap(),
            "\"FLOATER\""
        );
        let kind: EmployeeKind = serde_json::from_str("\"FLOATER\"").unwrap();
        assert_eq!(kind, EmployeeKind::Floater);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = test_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.posts[0].post_id, "P001");
        assert_eq!(back.employees[0].kind, EmployeeKind::Fixed);
        assert_eq!(back.holidays[0].description, "New Year's Day");
    }
}
