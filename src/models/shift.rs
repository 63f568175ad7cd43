//! Shift model and related types.
//!
//! This module defines the [`Shift`] and [`DayHours`] structs produced by
//! the shift generator. Every shift carries its hours decomposed onto the
//! actual calendar dates it spans, which is what the payroll surcharges and
//! the optimisation objectives are computed from.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hours worked on one calendar date of a shift.
///
/// Invariants: `day_hours + night_hours == total_hours` and
/// `total_hours > 0` (the decomposer never emits an empty date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// The calendar date these hours fall on.
    pub date: NaiveDate,
    /// Total hours worked on this date.
    pub total_hours: Decimal,
    /// Hours falling inside the day window.
    pub day_hours: Decimal,
    /// Hours falling inside the night window.
    pub night_hours: Decimal,
    /// Whether this date is a Sunday.
    pub is_sunday: bool,
    /// Whether this date is a configured holiday.
    pub is_holiday: bool,
}

/// One shift slot at a post, annotated with its per-date hour breakdown.
///
/// Shift identifiers follow `{post}_{YYYYMMDD}_{DAY|NIGHT}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The post this shift covers.
    pub post_id: String,
    /// The anchor date of the shift (the date the slot starts on).
    pub date: NaiveDate,
    /// The start time of the shift.
    pub start_time: NaiveTime,
    /// The end time of the shift (may fall on the next calendar date).
    pub end_time: NaiveTime,
    /// Shift duration in hours.
    pub duration_hours: u32,
    /// Whether this is the night slot of the rotation.
    pub is_night: bool,
    /// Whether any touched date is a Sunday.
    pub is_sunday: bool,
    /// Whether any touched date is a holiday.
    pub is_holiday: bool,
    /// Hours decomposed onto each calendar date the shift touches.
    pub hours_by_day: BTreeMap<NaiveDate, DayHours>,
}

impl Shift {
    /// Returns the shift's start instant.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Returns the shift's end instant.
    pub fn end_datetime(&self) -> NaiveDateTime {
        self.start_datetime() + chrono::Duration::hours(i64::from(self.duration_hours))
    }

    /// Night hours of the shift in centihours, truncated.
    pub fn night_centihours(&self) -> i64 {
        to_centihours(self.hours_by_day.values().map(|dh| dh.night_hours).sum())
    }

    /// Hours falling on holiday dates, in centihours, truncated.
    pub fn holiday_centihours(&self) -> i64 {
        to_centihours(
            self.hours_by_day
                .values()
                .filter(|dh| dh.is_holiday)
                .map(|dh| dh.total_hours)
                .sum(),
        )
    }

    /// Hours falling on Sunday dates, in centihours, truncated.
    pub fn sunday_centihours(&self) -> i64 {
        to_centihours(
            self.hours_by_day
                .values()
                .filter(|dh| dh.is_sunday)
                .map(|dh| dh.total_hours)
                .sum(),
        )
    }

    /// The Sunday dates this shift touches with positive hours.
    pub fn sunday_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.hours_by_day
            .values()
            .filter(|dh| dh.is_sunday && dh.total_hours > Decimal::ZERO)
            .map(|dh| dh.date)
    }

    /// Whether this shift touches the given calendar date with positive hours.
    pub fn touches_date(&self, date: NaiveDate) -> bool {
        self.hours_by_day.contains_key(&date)
    }
}

/// Converts fractional hours to centihours with truncation.
fn to_centihours(hours: Decimal) -> i64 {
    (hours * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(0)
}
