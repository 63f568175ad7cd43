//! The lexicographic solve driver.
//!
//! Sequences the objective levels L1 → L1b → L2 → L2b → L2c → L3. Each
//! level minimises one objective, harvests the optimum and freezes it as a
//! hard bound for every subsequent level. Infeasibility at any level is a
//! single-point failure reported with the level's label; no fallback
//! heuristic is attempted.

use std::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Shift, Solution};
use crate::schedule::generate_shifts;

use super::builder::{build_model, AssignmentModel, FrozenLevel};
use super::context::PlannerContext;
use super::metrics::extract_solution;
use super::objective::{build_weighted_objective, ObjectiveKind};
use super::sunday_policy::SundayPolicy;

/// Plans one month of shift coverage.
///
/// The planner owns the configuration and the generated shift set; solving
/// never mutates them, so one planner can be solved repeatedly (the result
/// is identical each time — the search is deterministic).
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::Config;
/// use roster_engine::solver::{Planner, SundayPolicy};
///
/// let config = Config::from_yaml_file("./config/january.yaml")?;
/// let planner = Planner::new(config)?;
/// let solution = planner.solve(SundayPolicy::Smart)?;
/// println!("{} assignments", solution.assignments.len());
/// # Ok::<(), roster_engine::error::PlannerError>(())
/// ```
pub struct Planner {
    config: Config,
    shifts: Vec<Shift>,
}

impl Planner {
    /// Validates the configuration and generates the month's shift set.
    pub fn new(config: Config) -> PlannerResult<Self> {
        let shifts = generate_shifts(&config)?;
        Ok(Self { config, shifts })
    }

    /// The planner's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The generated shift set, in stable generation order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Solves with the strategy selected by `use_lexicographic`.
    pub fn solve(&self, policy: SundayPolicy) -> PlannerResult<Solution> {
        if self.config.global.use_lexicographic {
            self.solve_lexicographic(policy)
        } else {
            self.solve_weighted()
        }
    }

    /// Runs the full lexicographic sequence.
    pub fn solve_lexicographic(&self, policy: SundayPolicy) -> PlannerResult<Solution> {
        let ctx = PlannerContext::new(&self.config, &self.shifts)?;

        let levels = [
            ObjectiveKind::TotalOvertime,
            ObjectiveKind::OvertimeHeadcount,
            ObjectiveKind::HolidaySundayHours,
            ObjectiveKind::SundayDistribution(policy),
            ObjectiveKind::WeightedSundayCost,
            ObjectiveKind::NightHours,
        ];

        let started = Instant::now();
        let mut frozen: Vec<FrozenLevel> = Vec::with_capacity(levels.len());
        let mut outcome = None;

        for kind in levels {
            info!(objective = kind.label(), "optimizing level");

            let AssignmentModel { mut model, vars } = build_model(&ctx, &frozen);
            let objective = kind.build_objective(&mut model, &vars, &ctx);
            let solution =
                model
                    .minimize(objective)
                    .map_err(|_| PlannerError::InfeasibleModel {
                        level: kind.label().to_string(),
                    })?;

            let optimum = i64::from(solution.get::<i32>(objective));
            info!(objective = kind.label(), optimum, "level optimum frozen");

            frozen.push(FrozenLevel { kind, optimum });
            outcome = Some((solution, vars, optimum));
        }

        let (solution, vars, objective_value) =
            outcome.expect("the lexicographic sequence has at least one level");
        let result = extract_solution(&ctx, &solution, &vars, objective_value, started.elapsed())?;

        info!(
            assignments = result.assignments.len(),
            active = result.active_employees.len(),
            solve_secs = result.solve_time_secs,
            "lexicographic solve complete"
        );
        Ok(result)
    }

    /// Minimises the single weighted objective instead of the sequence.
    pub fn solve_weighted(&self) -> PlannerResult<Solution> {
        let ctx = PlannerContext::new(&self.config, &self.shifts)?;

        info!("optimizing weighted objective");
        let started = Instant::now();

        let AssignmentModel { mut model, vars } = build_model(&ctx, &[]);
        let objective = build_weighted_objective(&mut model, &vars, &ctx);
        let solution = model
            .minimize(objective)
            .map_err(|_| PlannerError::InfeasibleModel {
                level: "weighted".to_string(),
            })?;

        let objective_value = i64::from(solution.get::<i32>(objective));
        let result = extract_solution(&ctx, &solution, &vars, objective_value, started.elapsed())?;

        info!(
            assignments = result.assignments.len(),
            active = result.active_employees.len(),
            "weighted solve complete"
        );
        Ok(result)
    }
}
