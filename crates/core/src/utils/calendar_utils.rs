use chrono::{Datelike, Months, NaiveDate};

/// Number of days in the given calendar month (leap years included).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_end(year, month).map(|d| d.day()).unwrap_or(0)
}

/// First day of the given month, `None` for an invalid year/month pair.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the given month, `None` for an invalid year/month pair.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    month_start(year, month)?;
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// The (year, month) pair following the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Adds calendar months to a date. A day that does not exist in the target
/// month is clamped to that month's last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Inclusive last day of a term that starts on `start` and lasts `months`.
pub fn term_end(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    add_months_clamped(start, months)?.pred_opt()
}

/// Sortable `YYYY-MM` key.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Number of calendar months from the month of `from` to the month of `to`,
/// inclusive of both ends. Zero when `to` is in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let diff = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32 + 1;
    diff.max(0) as u32
}

/// Last day of the given calendar year.
pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}
