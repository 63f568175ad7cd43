//! Per-date hour decomposition for datetime intervals.
//!
//! Splits an arbitrary half-open interval onto the calendar dates it
//! touches, and within each date into day and night hours. Downstream
//! payroll rules and optimisation objectives depend on this decomposition
//! being exact, so all arithmetic is done on whole minutes converted to
//! `Decimal` hours.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::DayHours;

/// Decomposes `[start, end)` into per-date [`DayHours`] records.
///
/// The interval is walked one calendar day at a time. Within each date `d`
/// the contribution is intersected with three half-open windows on `d`:
///
/// - `[00:00, day_start)` → night
/// - `[day_start, night_start)` → day
/// - `[night_start, 24:00)` → night
///
/// Dates with zero hours are never emitted. `is_sunday` comes from the
/// weekday of `d`, `is_holiday` from membership in `holidays`.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use roster_engine::schedule::decompose_interval;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeSet;
///
/// // Sunday 2025-01-05 18:00 -> Monday 06:00, night window 21:00-06:00.
/// let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap().and_hms_opt(18, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let day_start = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
/// let night_start = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
///
/// let by_day = decompose_interval(start, end, day_start, night_start, &BTreeSet::new());
/// assert_eq!(by_day.len(), 2);
///
/// let sunday = &by_day[&NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()];
/// assert_eq!(sunday.total_hours, Decimal::from(6));
/// assert_eq!(sunday.day_hours, Decimal::from(3));
/// assert_eq!(sunday.night_hours, Decimal::from(3));
/// assert!(sunday.is_sunday);
/// ```
pub fn decompose_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
    day_start: NaiveTime,
    night_start: NaiveTime,
    holidays: &BTreeSet<NaiveDate>,
) -> BTreeMap<NaiveDate, DayHours> {
    let mut by_day = BTreeMap::new();
    let mut current = start;

    while current < end {
        let date = current.date();
        let next_midnight = (date + chrono::Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("valid midnight time");
        let day_end = next_midnight.min(end);

        let total_hours = hours_between(current, day_end);
        if total_hours > Decimal::ZERO {
            let (day_hours, night_hours) =
                split_day_night(current, day_end, date, day_start, night_start);

            by_day.insert(
                date,
                DayHours {
                    date,
                    total_hours,
                    day_hours,
                    night_hours,
                    is_sunday: date.weekday() == Weekday::Sun,
                    is_holiday: holidays.contains(&date),
                },
            );
        }

        current = day_end;
    }

    by_day
}

/// Splits one within-date period into day and night hours.
///
/// The night window spans two parts of `date`: the evening part
/// `[night_start, 24:00)` and the morning part `[00:00, day_start)`.
fn split_day_night(
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
    date: NaiveDate,
    day_start: NaiveTime,
    night_start: NaiveTime,
) -> (Decimal, Decimal) {
    let midnight_after = (date + chrono::Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight time");

    let day_window = (date.and_time(day_start), date.and_time(night_start));
    let night_evening = (date.and_time(night_start), midnight_after);
    let night_morning = (
        date.and_hms_opt(0, 0, 0).expect("valid midnight time"),
        date.and_time(day_start),
    );

    let day_hours = overlap_hours(period_start, period_end, day_window.0, day_window.1);
    let night_hours = overlap_hours(period_start, period_end, night_evening.0, night_evening.1)
        + overlap_hours(period_start, period_end, night_morning.0, night_morning.1);

    (day_hours, night_hours)
}

/// Hours of overlap between `[a_start, a_end)` and `[b_start, b_end)`.
fn overlap_hours(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> Decimal {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start {
        hours_between(start, end)
    } else {
        Decimal::ZERO
    }
}

/// The number of hours between two datetimes as a [`Decimal`].
fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let minutes = (end - start).num_minutes();
    Decimal::from(minutes) / Decimal::from(60)
}
