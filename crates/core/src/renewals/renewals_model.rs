//! Renewal projection models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ProjectionError, ValidationError};
use crate::pricing::Scenario;
use crate::reservations::{ReservationRow, Term, UpfrontPayment};

/// The term and payment style every projected renewal is bought with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalScenario {
    pub term: Term,
    pub upfront_payment: UpfrontPayment,
}

impl RenewalScenario {
    pub fn new(term: Term, upfront_payment: UpfrontPayment) -> Self {
        Self {
            term,
            upfront_payment,
        }
    }

    pub fn months(&self) -> u32 {
        self.term.months()
    }

    /// The priced scenario for these terms, if the catalog has one.
    pub fn scenario(&self) -> Option<Scenario> {
        Scenario::from_terms(self.term.months(), self.upfront_payment)
    }
}

impl TryFrom<Scenario> for RenewalScenario {
    type Error = Error;

    fn try_from(scenario: Scenario) -> Result<Self, Self::Error> {
        scenario
            .reservation_terms()
            .map(|(term, upfront)| RenewalScenario::new(term, upfront))
            .ok_or_else(|| ValidationError::NotARenewalScenario(scenario.to_string()).into())
    }
}

/// Originals followed by their renewal chains, plus the chains that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalProjection {
    pub rows: Vec<ReservationRow>,
    #[serde(skip)]
    pub failures: Vec<ProjectionError>,
    pub horizon_end: NaiveDate,
}

impl RenewalProjection {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn actual_rows(&self) -> impl Iterator<Item = &ReservationRow> {
        self.rows.iter().filter(|r| !r.is_projected())
    }

    pub fn projected_rows(&self) -> impl Iterator<Item = &ReservationRow> {
        self.rows.iter().filter(|r| r.is_projected())
    }

    /// The original row with the given id followed by its renewals.
    pub fn chain(&self, original_id: &str) -> Vec<&ReservationRow> {
        let prefix = format!("{}-renew-", original_id);
        self.rows
            .iter()
            .filter(|r| {
                (r.id == original_id && !r.is_projected())
                    || (r.is_projected() && r.id.strip_prefix(&prefix).is_some_and(is_sequence))
            })
            .collect()
    }
}

fn is_sequence(suffix: &str) -> bool {
    !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
}
