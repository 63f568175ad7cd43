//! Shift generation for one planning month.
//!
//! Emits the full shift set — every day of the month, every post, every
//! slot of the configured rotation — with each shift annotated by its
//! per-date hour decomposition.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;

use crate::config::{Config, Post};
use crate::error::PlannerResult;
use crate::models::Shift;

use super::day_hours::decompose_interval;

/// The rotation label of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Day,
    Night,
}

impl SlotKind {
    fn label(self) -> &'static str {
        match self {
            SlotKind::Day => "DAY",
            SlotKind::Night => "NIGHT",
        }
    }
}

/// Generates all shifts for the configured month.
///
/// For a 12-hour rotation each day gets a `DAY` slot at `shift_start_time`
/// and a `NIGHT` slot twelve hours later. For an 8-hour rotation, slots at
/// +0, +8 and +16 hours; the last is labelled `NIGHT` when its start falls
/// inside the night window, else `DAY`. Any other length dividing 24 falls
/// back to `24 / length` slots with the same labelling rule. Per-post
/// `allow_day_shift` / `allow_night_shift` flags filter the slots.
///
/// Shifts are returned in a stable order: by day, then by post, then by
/// slot position.
pub fn generate_shifts(config: &Config) -> PlannerResult<Vec<Shift>> {
    config.validate()?;

    let holiday_dates = config.holiday_dates();
    let rotation = slot_rotation(config);

    let mut shifts = Vec::new();
    for day in 1..=config.days_in_month() {
        let Some(date) = NaiveDate::from_ymd_opt(config.global.year, config.global.month, day)
        else {
            continue;
        };

        for post in &config.posts {
            for &(slot_time, kind) in &rotation {
                let allowed = match kind {
                    SlotKind::Day => post.allow_day_shift,
                    SlotKind::Night => post.allow_night_shift,
                };
                if allowed {
                    shifts.push(create_shift(config, post, date, slot_time, kind, &holiday_dates));
                }
            }
        }
    }

    Ok(shifts)
}

/// Computes the slot start times and labels for the configured rotation.
fn slot_rotation(config: &Config) -> Vec<(NaiveTime, SlotKind)> {
    let base = config.global.shift_start_time;
    let length = config.global.shift_length_hours;

    match length {
        12 => vec![
            (base, SlotKind::Day),
            (offset_time(base, 12), SlotKind::Night),
        ],
        8 => {
            let third = offset_time(base, 16);
            vec![
                (base, SlotKind::Day),
                (offset_time(base, 8), SlotKind::Day),
                (third, window_kind(config, third)),
            ]
        }
        _ => {
            let slots_per_day = 24 / length;
            (0..slots_per_day)
                .map(|i| {
                    let start = offset_time(base, i * length);
                    (start, window_kind(config, start))
                })
                .collect()
        }
    }
}

/// Labels a slot `NIGHT` when its start falls inside the night window.
fn window_kind(config: &Config, start: NaiveTime) -> SlotKind {
    if start >= config.global.night_start || start < config.global.day_start {
        SlotKind::Night
    } else {
        SlotKind::Day
    }
}

/// Adds whole hours to a time of day, wrapping past midnight.
fn offset_time(base: NaiveTime, hours: u32) -> NaiveTime {
    let anchor = NaiveDate::from_ymd_opt(2000, 1, 1)
        .expect("valid anchor date")
        .and_time(base);
    (anchor + chrono::Duration::hours(i64::from(hours))).time()
}

/// Creates a single shift with its hours decomposed by date.
fn create_shift(
    config: &Config,
    post: &Post,
    date: NaiveDate,
    start_time: NaiveTime,
    kind: SlotKind,
    holiday_dates: &BTreeSet<NaiveDate>,
) -> Shift {
    let start = date.and_time(start_time);
    let end = start + chrono::Duration::hours(i64::from(config.global.shift_length_hours));

    let hours_by_day = decompose_interval(
        start,
        end,
        config.global.day_start,
        config.global.night_start,
        holiday_dates,
    );

    let is_sunday = hours_by_day.values().any(|dh| dh.is_sunday);
    let is_holiday = hours_by_day.values().any(|dh| dh.is_holiday);

    Shift {
        id: format!("{}_{}_{}", post.post_id, date.format("%Y%m%d"), kind.label()),
        post_id: post.post_id.clone(),
        date,
        start_time,
        end_time: end.time(),
        duration_hours: config.global.shift_length_hours,
        is_night: kind == SlotKind::Night,
        is_sunday,
        is_holiday,
        hours_by_day,
    }
}
