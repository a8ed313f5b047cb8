/// Interval partitioning
///
/// Splits a campaign date range into the start dates of its periods.
///
/// # Rules
///
/// The first instant is always `start`. After that:
///
/// - `once`: nothing
/// - `daily`: every following day up to `end`
/// - `weekly`: every week start (Sunday) strictly after `start`, up to `end`
/// - `monthly`: every first-of-month strictly after `start`, up to `end`
/// - `quarterly`: `start + 3k` months for `k` in `0..max(1, ceil(months / 3))`,
///   where `months` is the calendar-month distance with days ignored
/// - `yearly`: every January 1st strictly after `start`, up to `end`
///
/// `start > end` is a caller error; the partition is then just `[start]`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use margo_shared::models::campaign::Frequency;
/// use margo_shared::planning::interval::partition;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
///
/// let instants = partition(start, end, Frequency::Monthly);
/// assert_eq!(instants.len(), 4);
/// assert_eq!(instants[1], NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// ```

use chrono::{Datelike, Days, Months, NaiveDate};
use std::iter;

use crate::models::campaign::Frequency;

/// Returns the ordered period start dates covering `[start, end]`
pub fn partition(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Vec<NaiveDate> {
    if end <= start {
        return vec![start];
    }

    match frequency {
        Frequency::Once => vec![start],
        Frequency::Daily => start.iter_days().take_while(|d| *d <= end).collect(),
        Frequency::Weekly => with_boundaries(start, end, next_week_start(start), Days::new(7)),
        Frequency::Monthly => {
            let first = first_of_month(start).and_then(|d| d.checked_add_months(Months::new(1)));
            with_boundaries_by_month(start, end, first, 1)
        }
        Frequency::Quarterly => quarters(start, end),
        Frequency::Yearly => {
            let first = NaiveDate::from_ymd_opt(start.year() + 1, 1, 1);
            with_boundaries_by_month(start, end, first, 12)
        }
    }
}

impl Frequency {
    /// First day after the period that begins at `instant`
    ///
    /// `None` for [`Frequency::Once`], whose period has no fixed length, and
    /// when the date would overflow.
    pub fn period_end(&self, instant: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Once => None,
            Frequency::Daily => instant.checked_add_days(Days::new(1)),
            Frequency::Weekly => instant.checked_add_days(Days::new(7)),
            Frequency::Monthly => instant.checked_add_months(Months::new(1)),
            Frequency::Quarterly => instant.checked_add_months(Months::new(3)),
            Frequency::Yearly => instant.checked_add_months(Months::new(12)),
        }
    }
}

/// Number of calendar months from `start` to `end`, ignoring days
pub fn month_span(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

fn quarters(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let months = month_span(start, end);
    let count = ((months + 2) / 3).max(1) as u32;

    (0..count)
        .map_while(|k| start.checked_add_months(Months::new(3 * k)))
        .collect()
}

fn next_week_start(date: NaiveDate) -> Option<NaiveDate> {
    let days_from_sunday = u64::from(date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(7 - days_from_sunday))
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn with_boundaries(
    start: NaiveDate,
    end: NaiveDate,
    first: Option<NaiveDate>,
    step: Days,
) -> Vec<NaiveDate> {
    let boundaries = iter::successors(first, |d| d.checked_add_days(step));
    iter::once(start)
        .chain(boundaries.take_while(|d| *d <= end))
        .collect()
}

fn with_boundaries_by_month(
    start: NaiveDate,
    end: NaiveDate,
    first: Option<NaiveDate>,
    months: u32,
) -> Vec<NaiveDate> {
    let boundaries = iter::successors(first, |d| d.checked_add_months(Months::new(months)));
    iter::once(start)
        .chain(boundaries.take_while(|d| *d <= end))
        .collect()
}
