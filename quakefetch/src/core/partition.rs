//! Calendar-month partitioning of a backfill interval.

use std::iter::FusedIterator;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::core::types::DateRange;

/// Split `[start, end]` into calendar-month ranges.
///
/// The cursor starts at `start` and advances to the first day of each
/// following month; iteration stops once the cursor reaches `end`. Every
/// emitted range is clamped to the input bounds. `start >= end` yields
/// nothing.
pub fn partition(start: NaiveDate, end: NaiveDate) -> MonthlyRanges {
    MonthlyRanges {
        start,
        end,
        cursor: start,
    }
}

/// Lazy iterator returned by [`partition`]. Clone it to restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRanges {
    start: NaiveDate,
    end: NaiveDate,
    cursor: NaiveDate,
}

impl Iterator for MonthlyRanges {
    type Item = DateRange;

    fn next(&mut self) -> Option<DateRange> {
        if self.cursor >= self.end {
            return None;
        }
        let month_start = self.cursor - Days::new(u64::from(self.cursor.day0()));
        let next_month = month_start.checked_add_months(Months::new(1));
        let month_end = next_month
            .and_then(|first| first.pred_opt())
            .unwrap_or(self.end);

        // Near NaiveDate::MAX there is no next month; finish on this one.
        self.cursor = next_month.unwrap_or(self.end);

        Some(DateRange {
            start: month_start.max(self.start),
            end: month_end.min(self.end),
        })
    }
}

impl FusedIterator for MonthlyRanges {}
