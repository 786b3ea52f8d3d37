//! Pricing catalog models and the closed set of payment scenarios.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EDITION, HOURS_PER_DAY};
use crate::reservations::{Term, UpfrontPayment};

/// A priced way to pay for capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "onDemand")]
    OnDemand,
    #[serde(rename = "1yrNoUpfront")]
    OneYearNoUpfront,
    #[serde(rename = "1yrPartialUpfront")]
    OneYearPartialUpfront,
    #[serde(rename = "1yrAllUpfront")]
    OneYearAllUpfront,
    #[serde(rename = "3yrPartialUpfront")]
    ThreeYearPartialUpfront,
    #[serde(rename = "3yrAllUpfront")]
    ThreeYearAllUpfront,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::OnDemand,
        Scenario::OneYearNoUpfront,
        Scenario::OneYearPartialUpfront,
        Scenario::OneYearAllUpfront,
        Scenario::ThreeYearPartialUpfront,
        Scenario::ThreeYearAllUpfront,
    ];

    pub const RESERVED: [Scenario; 5] = [
        Scenario::OneYearNoUpfront,
        Scenario::OneYearPartialUpfront,
        Scenario::OneYearAllUpfront,
        Scenario::ThreeYearPartialUpfront,
        Scenario::ThreeYearAllUpfront,
    ];

    /// Term and payment style of a reserved scenario; `None` for on-demand.
    pub fn reservation_terms(&self) -> Option<(Term, UpfrontPayment)> {
        match self {
            Scenario::OnDemand => None,
            Scenario::OneYearNoUpfront => Some((Term::OneYear, UpfrontPayment::NoUpfront)),
            Scenario::OneYearPartialUpfront => {
                Some((Term::OneYear, UpfrontPayment::PartialUpfront))
            }
            Scenario::OneYearAllUpfront => Some((Term::OneYear, UpfrontPayment::AllUpfront)),
            Scenario::ThreeYearPartialUpfront => {
                Some((Term::ThreeYear, UpfrontPayment::PartialUpfront))
            }
            Scenario::ThreeYearAllUpfront => Some((Term::ThreeYear, UpfrontPayment::AllUpfront)),
        }
    }

    /// The reserved scenario matching a term and payment style, if it is priced.
    pub fn from_terms(duration_months: u32, upfront: UpfrontPayment) -> Option<Scenario> {
        Scenario::RESERVED.into_iter().find(|s| {
            s.reservation_terms()
                .map(|(term, payment)| term.months() == duration_months && payment == upfront)
                .unwrap_or(false)
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::OnDemand => "onDemand",
            Scenario::OneYearNoUpfront => "1yrNoUpfront",
            Scenario::OneYearPartialUpfront => "1yrPartialUpfront",
            Scenario::OneYearAllUpfront => "1yrAllUpfront",
            Scenario::ThreeYearPartialUpfront => "3yrPartialUpfront",
            Scenario::ThreeYearAllUpfront => "3yrAllUpfront",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upfront and recurring price of one reserved variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedRate {
    #[serde(default)]
    pub upfront_cost: Option<Decimal>,
    #[serde(default)]
    pub daily_reserved_rate: Option<Decimal>,
}

/// The five reserved variants a catalog entry may price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedRates {
    #[serde(rename = "1yrNoUpfront", default)]
    pub one_year_no_upfront: Option<ReservedRate>,
    #[serde(rename = "1yrPartialUpfront", default)]
    pub one_year_partial_upfront: Option<ReservedRate>,
    #[serde(rename = "1yrAllUpfront", default)]
    pub one_year_all_upfront: Option<ReservedRate>,
    #[serde(rename = "3yrPartialUpfront", default)]
    pub three_year_partial_upfront: Option<ReservedRate>,
    #[serde(rename = "3yrAllUpfront", default)]
    pub three_year_all_upfront: Option<ReservedRate>,
}

impl ReservedRates {
    pub fn get(&self, scenario: Scenario) -> Option<&ReservedRate> {
        match scenario {
            Scenario::OnDemand => None,
            Scenario::OneYearNoUpfront => self.one_year_no_upfront.as_ref(),
            Scenario::OneYearPartialUpfront => self.one_year_partial_upfront.as_ref(),
            Scenario::OneYearAllUpfront => self.one_year_all_upfront.as_ref(),
            Scenario::ThreeYearPartialUpfront => self.three_year_partial_upfront.as_ref(),
            Scenario::ThreeYearAllUpfront => self.three_year_all_upfront.as_ref(),
        }
    }

    pub fn set(&mut self, scenario: Scenario, rate: ReservedRate) {
        let slot = match scenario {
            Scenario::OnDemand => return,
            Scenario::OneYearNoUpfront => &mut self.one_year_no_upfront,
            Scenario::OneYearPartialUpfront => &mut self.one_year_partial_upfront,
            Scenario::OneYearAllUpfront => &mut self.one_year_all_upfront,
            Scenario::ThreeYearPartialUpfront => &mut self.three_year_partial_upfront,
            Scenario::ThreeYearAllUpfront => &mut self.three_year_all_upfront,
        };
        *slot = Some(rate);
    }
}

/// Resolved price for one scenario: what is paid at purchase and per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioRate {
    pub upfront_cost: Decimal,
    pub daily_rate: Decimal,
}

fn default_edition() -> String {
    DEFAULT_EDITION.to_string()
}

/// One priced SKU: an instance class in a region for an engine/edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecord {
    pub region: String,
    pub instance_class: String,
    pub multi_az: bool,
    pub engine: String,
    /// Same default as a reservation without an edition.
    #[serde(default = "default_edition")]
    pub edition: String,
    #[serde(default)]
    pub daily_on_demand_rate: Option<Decimal>,
    #[serde(default)]
    pub hourly_on_demand_rate: Option<Decimal>,
    #[serde(default)]
    pub reserved: ReservedRates,
}

impl PricingRecord {
    /// Daily on-demand rate, derived from the hourly rate when only that is known.
    pub fn daily_on_demand(&self) -> Option<Decimal> {
        self.daily_on_demand_rate.or_else(|| {
            self.hourly_on_demand_rate
                .map(|hourly| hourly * Decimal::from(HOURS_PER_DAY))
        })
    }

    /// Price for the scenario, `None` when the catalog lacks the daily rate.
    /// A reserved variant without an upfront component is priced at zero upfront.
    pub fn rate_for(&self, scenario: Scenario) -> Option<ScenarioRate> {
        match scenario {
            Scenario::OnDemand => self.daily_on_demand().map(|daily_rate| ScenarioRate {
                upfront_cost: Decimal::ZERO,
                daily_rate,
            }),
            reserved => {
                let rate = self.reserved.get(reserved)?;
                Some(ScenarioRate {
                    upfront_cost: rate.upfront_cost.unwrap_or(Decimal::ZERO),
                    daily_rate: rate.daily_reserved_rate?,
                })
            }
        }
    }

    /// Whether a reserved variant is cheaper per day than on-demand,
    /// or cannot be compared because a rate is missing.
    pub fn is_valid_for(&self, scenario: Scenario) -> bool {
        let reserved = self
            .reserved
            .get(scenario)
            .and_then(|r| r.daily_reserved_rate);
        match (reserved, self.daily_on_demand()) {
            (Some(reserved), Some(on_demand)) => reserved <= on_demand,
            _ => true,
        }
    }

    /// Reserved variants priced above the on-demand rate.
    pub fn invalid_scenarios(&self) -> Vec<Scenario> {
        Scenario::RESERVED
            .into_iter()
            .filter(|s| !self.is_valid_for(*s))
            .collect()
    }
}
