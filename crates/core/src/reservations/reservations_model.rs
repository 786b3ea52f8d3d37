//! Reservation domain models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EDITION;
use crate::errors::{Result, ValidationError};
use crate::utils::calendar_utils::term_end;

/// How the upfront part of a reservation is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpfrontPayment {
    #[serde(rename = "No Upfront")]
    NoUpfront,
    #[serde(rename = "Partial Upfront")]
    PartialUpfront,
    #[serde(rename = "All Upfront")]
    AllUpfront,
}

impl UpfrontPayment {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpfrontPayment::NoUpfront => "No Upfront",
            UpfrontPayment::PartialUpfront => "Partial Upfront",
            UpfrontPayment::AllUpfront => "All Upfront",
        }
    }
}

impl std::fmt::Display for UpfrontPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation term length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "1yr")]
    OneYear,
    #[serde(rename = "3yr")]
    ThreeYear,
}

impl Term {
    pub fn months(&self) -> u32 {
        match self {
            Term::OneYear => 12,
            Term::ThreeYear => 36,
        }
    }

    pub fn from_months(months: u32) -> Result<Self> {
        match months {
            12 => Ok(Term::OneYear),
            36 => Ok(Term::ThreeYear),
            other => Err(ValidationError::UnsupportedTerm(other).into()),
        }
    }
}

/// Whether a row is a real purchase or a synthesized renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationType {
    #[default]
    Actual,
    Projected,
}

fn default_edition() -> String {
    DEFAULT_EDITION.to_string()
}

/// One purchased (or projected) group of identical reserved instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRow {
    pub id: String,
    pub start_date: NaiveDate,
    /// Inclusive end date. `None` when the source did not report one.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub count: u32,
    pub instance_class: String,
    pub region: String,
    pub multi_az: bool,
    pub engine: String,
    #[serde(default = "default_edition")]
    pub edition: String,
    pub upfront_payment: UpfrontPayment,
    pub duration_months: u32,
    #[serde(rename = "type", default)]
    pub reservation_type: ReservationType,
}

impl ReservationRow {
    /// The reported end date, or the last day of the term when none was reported.
    pub fn effective_end_date(&self) -> Option<NaiveDate> {
        self.end_date
            .or_else(|| term_end(self.start_date, self.duration_months))
    }

    pub fn is_projected(&self) -> bool {
        self.reservation_type == ReservationType::Projected
    }
}

/// First calendar year fully covered once the latest reservation has expired.
///
/// A portfolio whose latest end date falls on January 1 qualifies that year;
/// any other end date pushes the horizon to the following year.
pub fn first_full_year(rows: &[ReservationRow]) -> Option<i32> {
    let latest = rows.iter().filter_map(|r| r.effective_end_date()).max()?;
    if latest.month() == 1 && latest.day() == 1 {
        Some(latest.year())
    } else {
        Some(latest.year() + 1)
    }
}
