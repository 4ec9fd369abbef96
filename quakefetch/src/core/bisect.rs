//! Midpoint splitting of over-limit date ranges.

use chrono::Days;

use crate::core::types::DateRange;

/// Split a range at `start + floor((end - start) / 2)`.
///
/// The midpoint day belongs to the first half and the second half starts the
/// day after, so the halves cover the input exactly once. Returns `None` for a
/// single-day range, which cannot be narrowed further.
pub fn bisect(range: DateRange) -> Option<(DateRange, DateRange)> {
    let span = (range.end - range.start).num_days();
    if span < 1 {
        return None;
    }
    let offset = u64::try_from(span / 2).ok()?;
    let mid = range.start.checked_add_days(Days::new(offset))?;
    let after_mid = mid.succ_opt()?;
    Some((
        DateRange {
            start: range.start,
            end: mid,
        },
        DateRange {
            start: after_mid,
            end: range.end,
        },
    ))
}
