//! End-to-end scenarios for the roster engine.
//!
//! Each test drives the full pipeline — shift generation, conflict
//! analysis, the lexicographic (or weighted) solve and the independent
//! verifier — over small literal configurations with known outcomes:
//! - single-post minimum viable month
//! - hour decomposition across midnight
//! - the excess-Sundays holiday-surcharge flip
//! - smart Sunday policy champion preference
//! - floater distinct-post caps and induced infeasibility
//! - lexicographic vs weighted strategy divergence
//! - determinism across repeated solves

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use std::str::FromStr;

use roster_engine::config::{Config, Employee, EmployeeKind, GlobalConfig, Holiday, Post};
use roster_engine::error::PlannerError;
use roster_engine::schedule::generate_shifts;
use roster_engine::solver::{Planner, SundayPolicy};
use roster_engine::verify::verify_solution;

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn global(year: i32, month: u32) -> GlobalConfig {
    GlobalConfig {
        year,
        month,
        day_start: make_time(6),
        night_start: make_time(21),
        shift_length_hours: 12,
        shift_start_time: make_time(6),
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

fn post(id: &str, name: &str) -> Post {
    Post {
        post_id: id.to_string(),
        name: name.to_string(),
        required_coverage: 1,
        allow_day_shift: true,
        allow_night_shift: true,
    }
}

fn fixed(id: &str, post_id: &str, salary: &str) -> Employee {
    Employee {
        emp_id: id.to_string(),
        kind: EmployeeKind::Fixed,
        assigned_post_id: Some(post_id.to_string()),
        contract_salary: dec(salary),
        available_from: make_date(2025, 1, 1),
        available_to: make_date(2025, 12, 31),
        max_posts_if_floater: 0,
    }
}

fn floater(id: &str, salary: &str, max_posts: u32) -> Employee {
    Employee {
        emp_id: id.to_string(),
        kind: EmployeeKind::Floater,
        assigned_post_id: None,
        contract_salary: dec(salary),
        available_from: make_date(2025, 1, 1),
        available_to: make_date(2025, 12, 31),
        max_posts_if_floater: max_posts,
    }
}

/// January 2025, one post, 3 fixed + 1 floater, everyone on the same wage.
fn basic_january() -> Config {
    Config {
        global: global(2025, 1),
        holidays: vec![Holiday {
            date: make_date(2025, 1, 1),
            description: "New Year's Day".to_string(),
        }],
        posts: vec![post("P001", "Security Post 1")],
        employees: vec![
            fixed("E001", "P001", "1423500"),
            fixed("E002", "P001", "1423500"),
            fixed("E003", "P001", "1423500"),
            floater("E004", "1423500", 4),
        ],
    }
}

// =============================================================================
// Scenario 1: single-post minimum viable month
// =============================================================================

#[test]
fn test_scenario1_shift_generation() {
    let shifts = generate_shifts(&basic_january()).unwrap();

    // 31 days * 2 slots.
    assert_eq!(shifts.len(), 62);
    assert_eq!(shifts.iter().filter(|s| !s.is_night).count(), 31);
    assert_eq!(shifts.iter().filter(|s| s.is_night).count(), 31);

    // 4 Sundays (Jan 5, 12, 19, 26) * 2 slots anchored on them.
    let sunday_anchored = shifts
        .iter()
        .filter(|s| s.date.weekday() == Weekday::Sun)
        .count();
    assert_eq!(sunday_anchored, 8);
    assert!(shifts
        .iter()
        .filter(|s| s.date.weekday() == Weekday::Sun)
        .all(|s| s.is_sunday));

    // Saturday night shifts reach into Sunday morning, so they carry the
    // flag as well: 8 anchored + 4 Saturday nights.
    assert_eq!(shifts.iter().filter(|s| s.is_sunday).count(), 12);

    // New Year's Day: day + night slot.
    assert_eq!(shifts.iter().filter(|s| s.is_holiday).count(), 2);
}

#[test]
fn test_scenario1_solve_and_verify() {
    let config = basic_january();
    let planner = Planner::new(config.clone()).unwrap();
    let solution = planner.solve_lexicographic(SundayPolicy::Smart).unwrap();

    // Total coverage.
    assert_eq!(solution.assignments.len(), 62);

    // At least the three fixed employees are active.
    let active_fixed = solution
        .active_employees
        .iter()
        .filter(|id| id.starts_with('E') && *id != "E004")
        .count();
    assert!(active_fixed >= 3, "expected >=3 active fixed, got {}", active_fixed);

    // Every assignment references a configured employee.
    for emp_id in solution.assignments.values() {
        assert!(config.employees.iter().any(|e| &e.emp_id == emp_id));
    }

    // The independent verifier accepts the engine's own output.
    let verification = verify_solution(&solution, &config, planner.shifts());
    assert!(
        verification.is_valid,
        "verification failed: {:?}",
        verification.errors
    );
}

#[test]
fn test_scenario1_hours_and_totals_are_consistent() {
    let config = basic_january();
    let planner = Planner::new(config).unwrap();
    let solution = planner.solve_lexicographic(SundayPolicy::Smart).unwrap();

    // Per-employee assigned hours sum to the full month of coverage.
    let total_hours: u32 = solution
        .employee_metrics
        .values()
        .map(|m| m.hours_assigned)
        .sum();
    assert_eq!(total_hours, 62 * 12);

    // The grand total is the sum of the active employees' totals.
    let summed: Decimal = solution
        .employee_metrics
        .values()
        .filter(|m| m.hours_assigned > 0)
        .map(|m| m.total)
        .sum();
    assert_eq!(summed, solution.totals.total_cost);
}

// =============================================================================
// Scenario 2: hour decomposition across midnight
// =============================================================================

#[test]
fn test_scenario2_overnight_sunday_decomposition() {
    let shifts = generate_shifts(&basic_january()).unwrap();

    // 2025-01-05 is a Sunday; its night shift runs 18:00 -> 06:00.
    let shift = shifts.iter().find(|s| s.id == "P001_20250105_NIGHT").unwrap();
    assert_eq!(shift.hours_by_day.len(), 2);

    let sunday = &shift.hours_by_day[&make_date(2025, 1, 5)];
    assert_eq!(sunday.total_hours, dec("6"));
    assert_eq!(sunday.day_hours, dec("3"));
    assert_eq!(sunday.night_hours, dec("3"));
    assert!(sunday.is_sunday);

    let monday = &shift.hours_by_day[&make_date(2025, 1, 6)];
    assert_eq!(monday.total_hours, dec("6"));
    assert_eq!(monday.day_hours, dec("0"));
    assert_eq!(monday.night_hours, dec("6"));
    assert!(!monday.is_sunday);
}

// =============================================================================
// Scenario 3: excess-Sundays indicator flips the RF rule
// =============================================================================

#[test]
fn test_scenario3_excess_sundays_flip_rf_hours() {
    // Three fixed employees, no floater: 4 Sundays with at least two
    // distinct employees touching each force someone past the threshold.
    let mut config = basic_january();
    config.employees.truncate(3);

    let planner = Planner::new(config.clone()).unwrap();
    let solution = planner.solve_lexicographic(SundayPolicy::Balanced).unwrap();

    let over: Vec<_> = solution
        .employee_metrics
        .values()
        .filter(|m| m.num_sundays > config.global.sunday_threshold)
        .collect();
    assert!(!over.is_empty(), "someone must exceed the Sunday threshold");

    // The RF rule must hold for every employee, on both sides of the flip.
    for metrics in solution.employee_metrics.values() {
        if metrics.num_sundays > config.global.sunday_threshold {
            assert_eq!(
                metrics.rf_hours_applied,
                metrics.hours_holiday + metrics.hours_sunday
            );
        } else {
            assert_eq!(metrics.rf_hours_applied, metrics.hours_holiday);
        }
    }

    assert_eq!(
        solution.totals.employees_with_excess_sundays,
        over.len()
    );
}

// =============================================================================
// Scenario 4: smart policy routes excess Sundays to the champion
// =============================================================================

#[test]
fn test_scenario4_smart_policy_prefers_champion() {
    let mut config = basic_january();
    config.employees = vec![
        fixed("E001", "P001", "1200000"), // champion (cheapest)
        fixed("E002", "P001", "1400000"), // helper
        fixed("E003", "P001", "1600000"), // other
    ];

    let planner = Planner::new(config.clone()).unwrap();
    let solution = planner.solve_lexicographic(SundayPolicy::Smart).unwrap();

    let champion = &solution.employee_metrics["E001"];
    let helper = &solution.employee_metrics["E002"];
    let other = &solution.employee_metrics["E003"];

    // Only the cheapest employee absorbs the excess.
    assert!(champion.num_sundays > config.global.sunday_threshold);
    assert!(helper.num_sundays <= config.global.sunday_threshold);
    assert!(other.num_sundays <= config.global.sunday_threshold);
    assert_eq!(solution.totals.employees_with_excess_sundays, 1);
}

// =============================================================================
// Scenario 5: floater distinct-post cap
// =============================================================================

/// February 2025 keeps the multi-post models small (28 days).
fn multi_post_february(fixed_per_post: &[usize]) -> Config {
    let mut employees = Vec::new();
    let mut posts = Vec::new();
    for (p, &count) in fixed_per_post.iter().enumerate() {
        let post_id = format!("P00{}", p + 1);
        posts.push(post(&post_id, &format!("Post {}", p + 1)));
        for i in 0..count {
            employees.push(fixed(
                &format!("E{}{:02}", p + 1, i + 1),
                &post_id,
                "1423500",
            ));
        }
    }
    employees.push(floater("F001", "1423500", 1));

    let mut config = Config {
        global: global(2025, 2),
        holidays: vec![],
        posts,
        employees,
    };
    config.global.min_fixed_per_post = 1;
    config
}

#[test]
fn test_scenario5_floater_serves_at_most_one_post() {
    // One understaffed post, two self-sufficient ones.
    let config = multi_post_february(&[1, 2, 2]);
    let planner = Planner::new(config.clone()).unwrap();
    let solution = planner.solve_lexicographic(SundayPolicy::Balanced).unwrap();

    let floater_posts: std::collections::BTreeSet<&str> = planner
        .shifts()
        .iter()
        .filter(|s| solution.assignments.get(&s.id).map(String::as_str) == Some("F001"))
        .map(|s| s.post_id.as_str())
        .collect();
    assert!(
        floater_posts.len() <= 1,
        "floater served posts {:?}",
        floater_posts
    );

    let verification = verify_solution(&solution, &config, planner.shifts());
    assert!(verification.is_valid, "{:?}", verification.errors);
}

#[test]
fn test_scenario5_cap_makes_coverage_infeasible() {
    // Every post is understaffed, but the floater may only help one.
    let config = multi_post_february(&[1, 1, 1]);
    let planner = Planner::new(config).unwrap();

    let result = planner.solve_lexicographic(SundayPolicy::Balanced);
    match result {
        Err(PlannerError::InfeasibleModel { level }) => {
            assert_eq!(level, "overtime_hours");
        }
        other => panic!("expected infeasibility at L1, got {:?}", other.map(|_| ())),
    }
}

// =============================================================================
// Scenario 6: lexicographic vs weighted strategies diverge
// =============================================================================

#[test]
fn test_scenario6_lexicographic_minimizes_overtime_first() {
    let mut config = basic_january();
    config.employees = vec![
        fixed("E001", "P001", "1200000"),
        fixed("E002", "P001", "1400000"),
        fixed("E003", "P001", "1600000"),
    ];

    let lex = Planner::new(config.clone())
        .unwrap()
        .solve_lexicographic(SundayPolicy::Balanced)
        .unwrap();

    // A weighted run that only prices night surcharge piles the night
    // slots onto the cheapest employee, paying more overtime for it.
    config.global.use_lexicographic = false;
    config.global.w_he = dec("0");
    config.global.w_rf = dec("0");
    config.global.w_rn = dec("1");
    config.global.w_base = dec("0");
    let weighted = Planner::new(config).unwrap().solve_weighted().unwrap();

    // Night hours are a fixed mass under total coverage; the strategies
    // differ in who carries them and at what overtime price.
    assert_eq!(lex.totals.total_rn_hours, weighted.totals.total_rn_hours);

    // The cheapest employee takes every night slot: 31 shifts * 9h in the
    // night window.
    assert_eq!(weighted.employee_metrics["E001"].hours_night, dec("279"));

    // Concentrating nights costs overtime the lexicographic order forbids.
    assert!(
        weighted.totals.total_he_hours > lex.totals.total_he_hours,
        "weighted {} vs lexicographic {}",
        weighted.totals.total_he_hours,
        lex.totals.total_he_hours
    );
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_repeated_solves_are_byte_identical() {
    let planner = Planner::new(basic_january()).unwrap();

    let first = planner.solve_lexicographic(SundayPolicy::Smart).unwrap();
    let second = planner.solve_lexicographic(SundayPolicy::Smart).unwrap();

    let a = serde_json::to_string(&first.assignments).unwrap();
    let b = serde_json::to_string(&second.assignments).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.objective_value, second.objective_value);
}

// =============================================================================
// Sunday policies all produce valid rosters
// =============================================================================

#[test]
fn test_every_policy_yields_a_verified_solution() {
    let config = basic_january();
    let planner = Planner::new(config.clone()).unwrap();

    for policy in [
        SundayPolicy::Smart,
        SundayPolicy::Balanced,
        SundayPolicy::CostFocused,
        SundayPolicy::LoadBalancing,
        SundayPolicy::SurchargeEquity,
    ] {
        let solution = planner.solve_lexicographic(policy).unwrap();
        assert_eq!(solution.assignments.len(), 62, "policy {}", policy);

        let verification = verify_solution(&solution, &config, planner.shifts());
        assert!(
            verification.is_valid,
            "policy {} failed verification: {:?}",
            policy, verification.errors
        );
    }
}
