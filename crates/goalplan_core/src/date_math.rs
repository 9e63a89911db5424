//! Calendar helpers for goal horizons.
//!
//! Goal horizons are counted in 30-day months: a target date `d` days away
//! resolves to `ceil(d / 30)` months, and projected completion dates are
//! `now + 30 * months` days. Day arithmetic goes through Rata Die numbering
//! so no `jiff::Span` is built for these conversions.
//!
//! Offsets saturate: a result past 9999-12-31 (or before 0001-01-01) is
//! clamped to that bound instead of failing.

use jiff::civil::Date;

use crate::error::{GoalError, Result};

/// Length of one projection month in days.
pub const DAYS_PER_MONTH: i32 = 30;

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March-based year so February is the last month
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Rata Die of 0001-01-01
const MIN_RATA_DIE: i32 = 1;

/// Inverse of [`rata_die`], clamped to `0001-01-01..=Date::MAX`.
#[inline]
fn rd_to_date(rd: i32) -> Date {
    let rd = rd.clamp(MIN_RATA_DIE, rata_die(Date::MAX));
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Signed number of days from `from` to `to`.
#[inline]
pub fn days_between(from: Date, to: Date) -> i32 {
    rata_die(to) - rata_die(from)
}

/// Add `n` days (possibly negative) to a date.
#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    rd_to_date(rata_die(d).saturating_add(n))
}

/// Months remaining until `target`, counted in whole 30-day months and
/// rounded up. Dates on or before `now` yield 0.
pub fn months_between(now: Date, target: Date) -> u32 {
    let days = days_between(now, target);
    if days <= 0 {
        0
    } else {
        (days + DAYS_PER_MONTH - 1).div_euclid(DAYS_PER_MONTH) as u32
    }
}

/// Date reached after `months` 30-day months from `now`.
pub fn add_months(now: Date, months: u32) -> Date {
    let days = i32::try_from(months)
        .unwrap_or(i32::MAX)
        .saturating_mul(DAYS_PER_MONTH);
    add_days(now, days)
}

/// Date reached after a fractional number of 30-day months, rounded to the
/// nearest day.
pub fn add_fractional_months(now: Date, months: f64) -> Date {
    let days = (months * f64::from(DAYS_PER_MONTH)).round() as i32;
    add_days(now, days)
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<Date> {
    input
        .trim()
        .parse::<Date>()
        .map_err(|source| GoalError::MalformedDate {
            input: input.to_string(),
            source,
        })
}

/// Today's date in the system time zone.
pub fn today() -> Date {
    jiff::Zoned::now().date()
}
