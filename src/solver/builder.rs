//! Constraint-model construction.
//!
//! Builds one [`selen::prelude::Model`] per solve: boolean assignment
//! variables, activation/indicator variables and the integer hour
//! aggregates, tied together by the structural constraints. All fractional
//! hour quantities enter the model in centihours so the solver stays in
//! integers while preserving the decomposer's exact breakdown.
//!
//! The solver consumes its model when solving, so the lexicographic driver
//! rebuilds the model at every level; previously frozen optima are
//! re-applied here as `objective ≤ optimum` bounds.

use selen::prelude::*;
use std::collections::BTreeMap;

use crate::config::EmployeeKind;

use super::context::PlannerContext;
use super::objective::ObjectiveKind;

/// The variable table of one built model.
///
/// Indices are positions in the context's sorted employee list; shift and
/// Sunday indices are positions in the context's shift and Sunday lists.
pub struct ModelVars {
    /// Assignment variables, keyed by `(employee, shift)`.
    pub x: BTreeMap<(usize, usize), VarId>,
    /// Activation indicator per employee.
    pub active: Vec<VarId>,
    /// Floater-post indicators, keyed by `(employee, post)`.
    pub z: BTreeMap<(usize, usize), VarId>,
    /// Worked-Sunday indicators, keyed by `(employee, sunday index)`.
    pub worked_sunday: BTreeMap<(usize, usize), VarId>,
    /// Excess-Sundays indicator per employee.
    pub excess_sundays: Vec<VarId>,
    /// Assigned hours per employee, in hours.
    pub hours_assigned: Vec<VarId>,
    /// Night hours per employee, in centihours.
    pub hours_night: Vec<VarId>,
    /// Holiday hours per employee, in centihours.
    pub hours_holiday: Vec<VarId>,
    /// Sunday hours per employee, in centihours.
    pub hours_sunday: Vec<VarId>,
    /// Overtime per employee, in centihours.
    pub he_hours: Vec<VarId>,
    /// Has-overtime indicator per employee.
    pub has_he: Vec<VarId>,
    /// Upper bound of `hours_assigned` per employee, in hours.
    pub assigned_upper: Vec<i64>,
    /// Upper bound of `hours_holiday` per employee, in centihours.
    pub holiday_upper: Vec<i64>,
    /// Upper bound of `hours_sunday` per employee, in centihours.
    pub sunday_upper: Vec<i64>,
    /// Upper bound of `he_hours` per employee, in centihours.
    pub he_upper: Vec<i64>,
}

/// A fully-built model together with its variable table.
pub struct AssignmentModel {
    /// The constraint model, ready to minimise one objective.
    pub model: Model,
    /// The variable table to read values back through.
    pub vars: ModelVars,
}

/// A previously-solved objective level and its optimum.
#[derive(Debug, Clone, Copy)]
pub struct FrozenLevel {
    /// The objective that was minimised.
    pub kind: ObjectiveKind,
    /// The optimum to freeze as an upper bound.
    pub optimum: i64,
}

/// Builds the assignment model with all structural constraints, then
/// bounds every frozen objective by its recorded optimum.
pub fn build_model(ctx: &PlannerContext<'_>, frozen: &[FrozenLevel]) -> AssignmentModel {
    let mut model = Model::default();
    let vars = build_structure(&mut model, ctx);

    for level in frozen {
        let objective = level.kind.build_objective(&mut model, &vars, ctx);
        model.c(objective).le(int(clamp_i32(level.optimum)));
    }

    AssignmentModel { model, vars }
}

/// Creates all variables and the structural constraints 1–9.
fn build_structure(m: &mut Model, ctx: &PlannerContext<'_>) -> ModelVars {
    let n_employees = ctx.employees.len();
    let shift_len = i64::from(ctx.config.global.shift_length_hours);

    // Assignment variables exist only where the employee-kind rule permits.
    let mut x: BTreeMap<(usize, usize), VarId> = BTreeMap::new();
    for (e, shift_indices) in ctx.eligible.iter().enumerate() {
        for &s in shift_indices {
            x.insert((e, s), m.int(0, 1));
        }
    }

    let active: Vec<VarId> = (0..n_employees).map(|_| m.int(0, 1)).collect();

    // Coverage: every shift gets exactly its required headcount.
    for (s, shift) in ctx.shifts.iter().enumerate() {
        let candidates: Vec<VarId> = (0..n_employees)
            .filter_map(|e| x.get(&(e, s)).copied())
            .collect();
        let total = sum_or_zero(m, &candidates);
        let required = ctx
            .posts
            .iter()
            .find(|p| p.post_id == shift.post_id)
            .map(|p| i64::from(p.required_coverage))
            .unwrap_or(1);
        m.c(total).eq(int(clamp_i32(required)));
    }

    // Activation: an assignment marks the employee active.
    for (&(e, _), &var) in &x {
        let d = m.sub(var, active[e]);
        m.c(d).le(int(0));
    }

    // Conflicts: no employee holds two overlapping or abutting shifts.
    for &(s1, s2) in &ctx.conflicts {
        for e in 0..n_employees {
            if let (Some(&x1), Some(&x2)) = (x.get(&(e, s1)), x.get(&(e, s2))) {
                let pair = m.sum(&[x1, x2]);
                m.c(pair).le(int(1));
            }
        }
    }

    // Floater post caps with the any/at-least-one indicator linking.
    let mut z: BTreeMap<(usize, usize), VarId> = BTreeMap::new();
    for (e, employee) in ctx.employees.iter().enumerate() {
        if employee.kind != EmployeeKind::Floater {
            continue;
        }
        let mut post_vars = Vec::with_capacity(ctx.posts.len());
        for (p, post) in ctx.posts.iter().enumerate() {
            let indicator = m.int(0, 1);
            let members: Vec<VarId> = ctx
                .shifts_of_post(&post.post_id)
                .into_iter()
                .filter_map(|s| x.get(&(e, s)).copied())
                .collect();
            if members.is_empty() {
                m.c(indicator).eq(int(0));
            } else {
                link_any_indicator(m, indicator, &members);
            }
            z.insert((e, p), indicator);
            post_vars.push(indicator);
        }
        let posts_used = sum_or_zero(m, &post_vars);
        let cap = i64::from(ctx.floater_cap(employee));
        m.c(posts_used).le(int(clamp_i32(cap)));
    }

    // Worked-Sunday indicators, one per employee and Sunday date.
    let mut worked_sunday: BTreeMap<(usize, usize), VarId> = BTreeMap::new();
    for e in 0..n_employees {
        for (d, &sunday) in ctx.sundays.iter().enumerate() {
            let indicator = m.int(0, 1);
            let members: Vec<VarId> = ctx.eligible[e]
                .iter()
                .filter(|&&s| ctx.shifts[s].touches_date(sunday))
                .filter_map(|&s| x.get(&(e, s)).copied())
                .collect();
            if members.is_empty() {
                m.c(indicator).eq(int(0));
            } else {
                link_any_indicator(m, indicator, &members);
            }
            worked_sunday.insert((e, d), indicator);
        }
    }

    // Excess-Sundays indicator: 1 iff the Sunday count exceeds the threshold.
    let threshold = i64::from(ctx.config.global.sunday_threshold);
    let num_sundays = ctx.sundays.len() as i64;
    let excess_sundays: Vec<VarId> = (0..n_employees)
        .map(|e| {
            let indicator = m.int(0, 1);
            let worked: Vec<VarId> = (0..ctx.sundays.len())
                .filter_map(|d| worked_sunday.get(&(e, d)).copied())
                .collect();
            let total = sum_or_zero(m, &worked);

            // total <= threshold + K * indicator
            let scaled = mul_const(m, indicator, num_sundays);
            let slack = m.sub(total, scaled);
            m.c(slack).le(int(clamp_i32(threshold)));

            // total >= (threshold + 1) * indicator
            let trigger = mul_const(m, indicator, threshold + 1);
            let margin = m.sub(total, trigger);
            m.c(margin).ge(int(0));

            indicator
        })
        .collect();

    // Hour aggregates and overtime.
    let mut hours_assigned = Vec::with_capacity(n_employees);
    let mut hours_night = Vec::with_capacity(n_employees);
    let mut hours_holiday = Vec::with_capacity(n_employees);
    let mut hours_sunday = Vec::with_capacity(n_employees);
    let mut he_hours = Vec::with_capacity(n_employees);
    let mut has_he = Vec::with_capacity(n_employees);
    let mut assigned_upper = Vec::with_capacity(n_employees);
    let mut holiday_upper = Vec::with_capacity(n_employees);
    let mut sunday_upper = Vec::with_capacity(n_employees);
    let mut he_upper = Vec::with_capacity(n_employees);

    for e in 0..n_employees {
        let assigned_terms: Vec<(VarId, i64)> = ctx.eligible[e]
            .iter()
            .filter_map(|&s| x.get(&(e, s)).map(|&v| (v, shift_len)))
            .collect();
        let night_terms: Vec<(VarId, i64)> = ctx.eligible[e]
            .iter()
            .filter_map(|&s| x.get(&(e, s)).map(|&v| (v, ctx.shifts[s].night_centihours())))
            .collect();
        let holiday_terms: Vec<(VarId, i64)> = ctx.eligible[e]
            .iter()
            .filter_map(|&s| x.get(&(e, s)).map(|&v| (v, ctx.shifts[s].holiday_centihours())))
            .collect();
        let sunday_terms: Vec<(VarId, i64)> = ctx.eligible[e]
            .iter()
            .filter_map(|&s| x.get(&(e, s)).map(|&v| (v, ctx.shifts[s].sunday_centihours())))
            .collect();

        let assigned = scaled_sum(m, &assigned_terms);
        let night = scaled_sum(m, &night_terms);
        let holiday = scaled_sum(m, &holiday_terms);
        let sunday = scaled_sum(m, &sunday_terms);

        let slot_count = ctx.eligible_count(e) as i64;
        let max_centihours = slot_count * shift_len * 100;
        assigned_upper.push(slot_count * shift_len);
        holiday_upper.push(holiday_terms.iter().map(|(_, c)| c).sum());
        sunday_upper.push(sunday_terms.iter().map(|(_, c)| c).sum());

        // Overtime in centihours: he >= 100 * assigned - budget, he >= 0,
        // bound to the has-overtime indicator with the big-M pair.
        let budget = ctx.employee_data[e].budget_centihours;
        let ub = (max_centihours - budget).max(0);
        let he = m.int(0, clamp_i32(ub));
        let assigned_centi = mul_const(m, assigned, 100);
        let over = m.sub(he, assigned_centi);
        m.c(over).ge(int(clamp_i32(-budget)));

        let has = m.int(0, 1);
        let big_m = mul_const(m, has, ub);
        let capped = m.sub(he, big_m);
        m.c(capped).le(int(0));
        let floor = m.sub(he, has);
        m.c(floor).ge(int(0));

        hours_assigned.push(assigned);
        hours_night.push(night);
        hours_holiday.push(holiday);
        hours_sunday.push(sunday);
        he_hours.push(he);
        has_he.push(has);
        he_upper.push(ub);
    }

    ModelVars {
        x,
        active,
        z,
        worked_sunday,
        excess_sundays,
        hours_assigned,
        hours_night,
        hours_holiday,
        hours_sunday,
        he_hours,
        has_he,
        assigned_upper,
        holiday_upper,
        sunday_upper,
        he_upper,
    }
}

/// Links an indicator to a set of booleans: any member forces the
/// indicator on, and the indicator forces at least one member.
pub(crate) fn link_any_indicator(m: &mut Model, indicator: VarId, members: &[VarId]) {
    for &member in members {
        let d = m.sub(member, indicator);
        m.c(d).le(int(0));
    }
    let total = sum_or_zero(m, members);
    let d = m.sub(indicator, total);
    m.c(d).le(int(0));
}

/// Builds the conditional holiday-surcharge hours of one employee:
/// `hours_holiday` when `excess_sundays = 0`, `hours_holiday +
/// hours_sunday` when `= 1`, linearised by bracketing both endpoints.
pub(crate) fn rf_applied_var(m: &mut Model, vars: &ModelVars, e: usize) -> VarId {
    let holiday = vars.hours_holiday[e];
    let sunday = vars.hours_sunday[e];
    let excess = vars.excess_sundays[e];
    let sunday_ub = vars.sunday_upper[e];

    let rf = m.int(0, clamp_i32(vars.holiday_upper[e] + sunday_ub));
    let both = m.sum(&[holiday, sunday]);

    let above_holiday = m.sub(rf, holiday);
    m.c(above_holiday).ge(int(0));
    let below_both = m.sub(rf, both);
    m.c(below_both).le(int(0));

    let gate = mul_const(m, excess, sunday_ub);
    let upper_gap = m.sub(above_holiday, gate);
    m.c(upper_gap).le(int(0));
    let lower_gap = m.sub(below_both, gate);
    m.c(lower_gap).ge(int(clamp_i32(-sunday_ub)));

    rf
}

/// Sums a variable set, yielding a constant zero for the empty set.
pub(crate) fn sum_or_zero(m: &mut Model, vars: &[VarId]) -> VarId {
    if vars.is_empty() {
        m.int(0, 0)
    } else {
        m.sum(vars)
    }
}

/// Builds `Σ coeff · var`, dropping zero coefficients.
pub(crate) fn scaled_sum(m: &mut Model, terms: &[(VarId, i64)]) -> VarId {
    let parts: Vec<VarId> = terms
        .iter()
        .filter(|(_, coeff)| *coeff != 0)
        .map(|&(var, coeff)| {
            if coeff == 1 {
                var
            } else {
                mul_const(m, var, coeff)
            }
        })
        .collect();
    sum_or_zero(m, &parts)
}

/// Multiplies a variable by an integer constant.
pub(crate) fn mul_const(m: &mut Model, var: VarId, coeff: i64) -> VarId {
    let clamped = clamp_i32(coeff);
    let constant = m.int(clamped, clamped);
    m.mul(var, constant)
}

/// Clamps a coefficient into the solver's integer domain.
pub(crate) fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
