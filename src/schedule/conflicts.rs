//! Conflict analysis between shifts.
//!
//! Two shifts conflict when one employee cannot serve both: their time
//! intervals overlap, or they abut back to back (one ends exactly when the
//! other starts). Rest-hour parameters play no role; the rule is purely
//! "no consecutive slots".

use crate::models::Shift;

/// Returns whether two shifts cannot be held by the same employee.
pub fn shifts_conflict(a: &Shift, b: &Shift) -> bool {
    let (start_a, end_a) = (a.start_datetime(), a.end_datetime());
    let (start_b, end_b) = (b.start_datetime(), b.end_datetime());

    // Overlapping intervals.
    if !(end_a <= start_b || end_b <= start_a) {
        return true;
    }

    // Back-to-back abutment.
    end_a == start_b || end_b == start_a
}

/// Enumerates every unordered pair of conflicting shifts.
///
/// Pairs are emitted in the input's order — `(shifts[i].id, shifts[j].id)`
/// with `i < j` — so the output is stable for a given shift list.
pub fn conflicting_pairs(shifts: &[Shift]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in shifts.iter().enumerate() {
        for b in &shifts[i + 1..] {
            if shifts_conflict(a, b) {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}
