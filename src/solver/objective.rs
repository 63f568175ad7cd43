//! Objective construction for the lexicographic levels.
//!
//! Each level is a tagged [`ObjectiveKind`]; building an objective yields a
//! single variable the driver minimises, or bounds when the level has
//! already been frozen. Monetary coefficients are truncated integers of
//! `hourly_wage · pct / 100` per centihour, which keeps the integer model
//! aligned with the decimal payroll arithmetic downstream.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use selen::prelude::*;

use super::builder::{clamp_i32, rf_applied_var, scaled_sum, sum_or_zero, ModelVars};
use super::context::PlannerContext;
use super::sunday_policy::{excess_weight, infer_roles, SundayPolicy};

/// One objective of the lexicographic sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    /// L1 — total overtime centihours.
    TotalOvertime,
    /// L1b — number of employees with any overtime.
    OvertimeHeadcount,
    /// L2 — raw holiday + Sunday centihour mass.
    HolidaySundayHours,
    /// L2b — the pluggable Sunday-distribution policy.
    SundayDistribution(SundayPolicy),
    /// L2c — wage-weighted Sunday hour cost, always run after L2b.
    WeightedSundayCost,
    /// L3 — night centihours.
    NightHours,
}

impl ObjectiveKind {
    /// A stable label for logs and infeasibility reports.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectiveKind::TotalOvertime => "overtime_hours",
            ObjectiveKind::OvertimeHeadcount => "overtime_headcount",
            ObjectiveKind::HolidaySundayHours => "holiday_sunday_hours",
            ObjectiveKind::SundayDistribution(SundayPolicy::Smart) => "sunday_smart",
            ObjectiveKind::SundayDistribution(SundayPolicy::Balanced) => "sunday_balanced",
            ObjectiveKind::SundayDistribution(SundayPolicy::CostFocused) => "sunday_cost_focused",
            ObjectiveKind::SundayDistribution(SundayPolicy::LoadBalancing) => {
                "sunday_load_balancing"
            }
            ObjectiveKind::SundayDistribution(SundayPolicy::SurchargeEquity) => {
                "sunday_surcharge_equity"
            }
            ObjectiveKind::WeightedSundayCost => "weighted_sunday_cost",
            ObjectiveKind::NightHours => "night_hours",
        }
    }

    /// Builds this objective over an already-built model.
    pub fn build_objective(
        &self,
        m: &mut Model,
        vars: &ModelVars,
        ctx: &PlannerContext<'_>,
    ) -> VarId {
        match self {
            ObjectiveKind::TotalOvertime => sum_or_zero(m, &vars.he_hours),
            ObjectiveKind::OvertimeHeadcount => sum_or_zero(m, &vars.has_he),
            ObjectiveKind::HolidaySundayHours => {
                let mut all = vars.hours_holiday.clone();
                all.extend_from_slice(&vars.hours_sunday);
                sum_or_zero(m, &all)
            }
            ObjectiveKind::SundayDistribution(policy) => build_policy(m, vars, ctx, *policy),
            ObjectiveKind::WeightedSundayCost => build_sunday_cost(m, vars, ctx),
            ObjectiveKind::NightHours => sum_or_zero(m, &vars.hours_night),
        }
    }
}

/// Builds the L2b objective for the selected policy.
fn build_policy(
    m: &mut Model,
    vars: &ModelVars,
    ctx: &PlannerContext<'_>,
    policy: SundayPolicy,
) -> VarId {
    match policy {
        SundayPolicy::Smart => {
            let roles = infer_roles(ctx);
            let terms: Vec<(VarId, i64)> = vars
                .excess_sundays
                .iter()
                .enumerate()
                .map(|(e, &var)| {
                    (var, excess_weight(roles[e], ctx.employees[e].contract_salary))
                })
                .collect();
            scaled_sum(m, &terms)
        }
        SundayPolicy::Balanced => sum_or_zero(m, &vars.excess_sundays),
        SundayPolicy::CostFocused => build_sunday_cost(m, vars, ctx),
        SundayPolicy::LoadBalancing => {
            let upper = vars.assigned_upper.iter().copied().max().unwrap_or(0);
            let max_hours = m.int(0, clamp_i32(upper));
            for &assigned in &vars.hours_assigned {
                let slack = m.sub(max_hours, assigned);
                m.c(slack).ge(int(0));
            }
            max_hours
        }
        SundayPolicy::SurchargeEquity => {
            let mut bound = 0i64;
            let mut employee_values = Vec::with_capacity(ctx.employees.len());
            for e in 0..ctx.employees.len() {
                let rf = rf_applied_var(m, vars, e);
                let rn_coeff = centihour_coeff(ctx, e, ctx.config.global.rn_pct);
                let rf_coeff = centihour_coeff(ctx, e, ctx.config.global.rf_pct);
                let he_coeff = centihour_coeff(ctx, e, ctx.config.global.he_pct);

                let night_ub: i64 = ctx.eligible[e]
                    .iter()
                    .map(|&s| ctx.shifts[s].night_centihours())
                    .sum();
                let rf_ub = vars.holiday_upper[e] + vars.sunday_upper[e];
                bound = bound.max(
                    rn_coeff * night_ub + rf_coeff * rf_ub + he_coeff * vars.he_upper[e],
                );

                let value = scaled_sum(
                    m,
                    &[
                        (vars.hours_night[e], rn_coeff),
                        (rf, rf_coeff),
                        (vars.he_hours[e], he_coeff),
                    ],
                );
                employee_values.push(value);
            }

            let max_surcharge = m.int(0, clamp_i32(bound));
            for value in employee_values {
                let slack = m.sub(max_surcharge, value);
                m.c(slack).ge(int(0));
            }
            max_surcharge
        }
    }
}

/// `Σ_e hours_sunday[e] · ⌊hourly_wage(e) · rf_pct / 100⌋`, shared by the
/// cost-focused policy and the always-run L2c refinement.
fn build_sunday_cost(m: &mut Model, vars: &ModelVars, ctx: &PlannerContext<'_>) -> VarId {
    let terms: Vec<(VarId, i64)> = vars
        .hours_sunday
        .iter()
        .enumerate()
        .map(|(e, &var)| (var, centihour_coeff(ctx, e, ctx.config.global.rf_pct)))
        .collect();
    scaled_sum(m, &terms)
}

/// Builds the weighted single objective used when lexicographic mode is off:
/// centihour-scaled HE, RF and RN costs times their weights, plus the
/// base-salary activation cost, with every coefficient truncated.
pub fn build_weighted_objective(
    m: &mut Model,
    vars: &ModelVars,
    ctx: &PlannerContext<'_>,
) -> VarId {
    let global = &ctx.config.global;
    let mut terms: Vec<(VarId, i64)> = Vec::with_capacity(ctx.employees.len() * 4);

    for e in 0..ctx.employees.len() {
        let wage = ctx.employee_data[e].hourly_wage;

        let he_coeff = truncate(wage * global.he_pct / Decimal::ONE_HUNDRED * global.w_he);
        terms.push((vars.he_hours[e], he_coeff));

        let rf = rf_applied_var(m, vars, e);
        let rf_coeff = truncate(wage * global.rf_pct / Decimal::ONE_HUNDRED * global.w_rf);
        terms.push((rf, rf_coeff));

        let rn_coeff = truncate(wage * global.rn_pct / Decimal::ONE_HUNDRED * global.w_rn);
        terms.push((vars.hours_night[e], rn_coeff));

        let base_coeff = truncate(ctx.employees[e].contract_salary * global.w_base);
        terms.push((vars.active[e], base_coeff));
    }

    scaled_sum(m, &terms)
}

/// Truncated integer cost per centihour: `⌊hourly_wage · pct / 100⌋`.
fn centihour_coeff(ctx: &PlannerContext<'_>, e: usize, pct: Decimal) -> i64 {
    truncate(ctx.employee_data[e].hourly_wage * pct / Decimal::ONE_HUNDRED)
}

fn truncate(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(0)
}
