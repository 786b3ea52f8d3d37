//! Day-overlap proration of reservation costs into calendar months.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::pricing::ScenarioRate;
use crate::utils::calendar_utils::{month_end, month_start};

/// Cost of one reservation attributed to one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProratedCost {
    pub active_days: u32,
    pub recurring_cost: Decimal,
    pub upfront_cost: Decimal,
}

impl ProratedCost {
    pub fn total(&self) -> Decimal {
        self.recurring_cost + self.upfront_cost
    }
}

/// Inclusive number of days the interval `[start, end]` overlaps the month.
///
/// An unknown end means the reservation covers every day of the month from
/// its start onwards.
pub fn active_days_in_month(
    start: NaiveDate,
    end: Option<NaiveDate>,
    year: i32,
    month: u32,
) -> u32 {
    let (Some(first), Some(last)) = (month_start(year, month), month_end(year, month)) else {
        return 0;
    };
    let from = start.max(first);
    let to = match end {
        Some(end) => end.min(last),
        None => last,
    };
    if to < from {
        return 0;
    }
    ((to - from).num_days() + 1) as u32
}

/// Whether `date` falls inside the given calendar month.
pub fn is_in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Recurring and upfront cost of `count` instances for one month.
///
/// The whole upfront payment lands in the month containing `start`; every
/// other month carries zero upfront.
pub fn prorate_month(
    start: NaiveDate,
    end: Option<NaiveDate>,
    count: u32,
    rate: &ScenarioRate,
    year: i32,
    month: u32,
) -> ProratedCost {
    let active_days = active_days_in_month(start, end, year, month);
    if active_days == 0 {
        return ProratedCost::default();
    }
    let count = Decimal::from(count);
    let recurring_cost = rate.daily_rate * Decimal::from(active_days) * count;
    let upfront_cost = if is_in_month(start, year, month) {
        rate.upfront_cost * count
    } else {
        Decimal::ZERO
    };
    ProratedCost {
        active_days,
        recurring_cost,
        upfront_cost,
    }
}
