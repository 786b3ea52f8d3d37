//! Composite matching keys between reservations and catalog records.

use serde::{Deserialize, Serialize};

use crate::constants::KEY_SEPARATOR;
use crate::reservations::{ReservationRow, UpfrontPayment};

use super::pricing_model::{PricingRecord, Scenario};

/// The seven fields a reservation is priced by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingCriteria {
    pub instance_class: String,
    pub region: String,
    pub multi_az: bool,
    pub engine: String,
    pub edition: String,
    pub upfront_payment: UpfrontPayment,
    pub duration_months: u32,
}

impl MatchingCriteria {
    pub fn from_row(row: &ReservationRow) -> Self {
        Self {
            instance_class: row.instance_class.clone(),
            region: row.region.clone(),
            multi_az: row.multi_az,
            engine: row.engine.clone(),
            edition: row.edition.clone(),
            upfront_payment: row.upfront_payment,
            duration_months: row.duration_months,
        }
    }

    /// Criteria a record is indexed under for one reserved variant.
    pub fn for_record(record: &PricingRecord, scenario: Scenario) -> Option<Self> {
        let (term, upfront_payment) = scenario.reservation_terms()?;
        Some(Self {
            instance_class: record.instance_class.clone(),
            region: record.region.clone(),
            multi_az: record.multi_az,
            engine: record.engine.clone(),
            edition: record.edition.clone(),
            upfront_payment,
            duration_months: term.months(),
        })
    }

    /// Same SKU, different payment terms.
    pub fn with_terms(&self, duration_months: u32, upfront_payment: UpfrontPayment) -> Self {
        Self {
            upfront_payment,
            duration_months,
            ..self.clone()
        }
    }

    /// Human-readable bucket label: region / instance / deployment / engine edition.
    pub fn group_key(&self) -> String {
        let deployment = if self.multi_az {
            "Multi-AZ"
        } else {
            "Single-AZ"
        };
        let engine = normalize(&self.engine);
        let edition = normalize(&self.edition);
        let engine_label = if edition.is_empty() {
            engine
        } else {
            format!("{} {}", engine, edition)
        };
        format!(
            "{} / {} / {} / {}",
            normalize(&self.region),
            normalize(&self.instance_class),
            deployment,
            engine_label
        )
    }
}

/// Lower-cased, trimmed token as it appears in keys.
pub fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Builds the lookup key for the given criteria.
///
/// Pure and case-insensitive: criteria that agree on all seven fields after
/// trimming and lower-casing produce the same key.
pub fn build_key(criteria: &MatchingCriteria) -> String {
    compose_key(
        &criteria.instance_class,
        &criteria.region,
        criteria.multi_az,
        &criteria.engine,
        &criteria.edition,
        criteria.upfront_payment,
        criteria.duration_months,
    )
}

pub(crate) fn compose_key(
    instance_class: &str,
    region: &str,
    multi_az: bool,
    engine: &str,
    edition: &str,
    upfront_payment: UpfrontPayment,
    duration_months: u32,
) -> String {
    let parts = [
        normalize(instance_class),
        normalize(region),
        multi_az.to_string(),
        normalize(engine),
        normalize(edition),
        normalize(upfront_payment.as_str()),
        duration_months.to_string(),
    ];
    parts.join(&KEY_SEPARATOR.to_string())
}
