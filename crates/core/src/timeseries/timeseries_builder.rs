use chrono::Datelike;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::aggregation::{CostDiagnostics, DiagnosticKind, DiagnosticSample};
use crate::pricing::{build_key, MatchingCriteria, PricingIndex, PricingRecord, Scenario, ScenarioRate};
use crate::proration::prorate_month;
use crate::reservations::ReservationRow;
use crate::settings::EngineSettings;
use crate::utils::calendar_utils::{months_between, next_month, year_end};

use super::scenario_merger::merge_rows;
use super::timeseries_model::{CostPair, MonthlyCostEntry};

/// Merged series of a whole portfolio for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSeries {
    pub scenario: Scenario,
    pub entries: Vec<MonthlyCostEntry>,
    pub diagnostics: CostDiagnostics,
}

/// Emits per-month costs of reservations for one scenario, up to the end of
/// the horizon year.
#[derive(Debug, Clone)]
pub struct CostTimeseriesBuilder {
    settings: EngineSettings,
    horizon_year: i32,
}

impl CostTimeseriesBuilder {
    pub fn new(settings: EngineSettings, horizon_year: i32) -> Self {
        Self {
            settings,
            horizon_year,
        }
    }

    pub fn horizon_year(&self) -> i32 {
        self.horizon_year
    }

    /// One entry per month from the row's start month through December of the
    /// horizon year. Only the `scenario` slot is filled. A row without an end
    /// date is priced up to the last day of its term.
    ///
    /// A scenario the record does not price yields zero-cost entries.
    pub fn build_series(
        &self,
        row: &ReservationRow,
        pricing: &PricingRecord,
        scenario: Scenario,
    ) -> Vec<MonthlyCostEntry> {
        let Some(horizon_end) = year_end(self.horizon_year) else {
            return Vec::new();
        };
        if row.start_date > horizon_end {
            return Vec::new();
        }

        let rate = pricing.rate_for(scenario).unwrap_or_else(|| {
            debug!(
                "No {} rate for reservation {}, emitting zero costs",
                scenario, row.id
            );
            ScenarioRate {
                upfront_cost: Decimal::ZERO,
                daily_rate: Decimal::ZERO,
            }
        });

        let mut months = months_between(row.start_date, horizon_end) as usize;
        if months > self.settings.max_month_iterations {
            warn!(
                "Reservation {} spans {} months, stopping after {}",
                row.id, months, self.settings.max_month_iterations
            );
            months = self.settings.max_month_iterations;
        }
        // Renewals chain from the term end, so an open-ended row stops there too.
        let end_date = row.effective_end_date();
        let (mut year, mut month) = (row.start_date.year(), row.start_date.month());
        let mut entries = Vec::with_capacity(months);

        for _ in 0..months {
            let cost = prorate_month(row.start_date, end_date, row.count, &rate, year, month);
            entries.push(MonthlyCostEntry::new(
                year,
                month,
                scenario,
                CostPair::new(cost.upfront_cost, cost.recurring_cost),
            ));
            (year, month) = next_month(year, month);
        }
        entries
    }

    /// Prices every row of a portfolio (originals and renewals) under one
    /// scenario and merges the rows into a single series.
    pub fn build_portfolio(
        &self,
        rows: &[ReservationRow],
        index: &PricingIndex,
        scenario: Scenario,
    ) -> PortfolioSeries {
        let cap = self.settings.max_unmatched_samples;
        let mut diagnostics = CostDiagnostics::default();
        let mut series = Vec::with_capacity(rows.len());

        for row in rows {
            let criteria = MatchingCriteria::from_row(row);
            let mut report = |kind: DiagnosticKind, message: String| {
                let sample = DiagnosticSample {
                    reservation_id: row.id.clone(),
                    kind,
                    matching_key: build_key(&criteria),
                    message: message.clone(),
                };
                if diagnostics.record(sample, cap) {
                    warn!("{}", message);
                }
            };

            if row.count == 0 {
                report(
                    DiagnosticKind::ZeroCount,
                    format!("Reservation {} has a count of zero", row.id),
                );
                continue;
            }
            let Some(record) = index.find_for_scenario(&criteria, scenario) else {
                report(
                    DiagnosticKind::UnmatchedPricing,
                    format!("No {} pricing found for reservation {}", scenario, row.id),
                );
                continue;
            };
            if !record.is_valid_for(scenario) {
                report(
                    DiagnosticKind::InvalidPricing,
                    format!(
                        "Pricing for reservation {} has a {} rate above on-demand",
                        row.id, scenario
                    ),
                );
                continue;
            }
            let row_series = self.build_series(row, record, scenario);
            if row_series.is_empty() {
                report(
                    DiagnosticKind::ZeroActiveDays,
                    format!(
                        "Reservation {} starts after the {} horizon",
                        row.id, self.horizon_year
                    ),
                );
                continue;
            }
            if record.rate_for(scenario).is_none() {
                report(
                    DiagnosticKind::MissingRates,
                    format!("Pricing for reservation {} lacks a {} rate", row.id, scenario),
                );
            }
            series.push(row_series);
        }

        PortfolioSeries {
            scenario,
            entries: merge_rows(&series),
            diagnostics,
        }
    }
}

/// Builds one reservation's series with default settings.
pub fn build_series(
    row: &ReservationRow,
    pricing: &PricingRecord,
    scenario: Scenario,
    horizon_year: i32,
) -> Vec<MonthlyCostEntry> {
    CostTimeseriesBuilder::new(EngineSettings::default(), horizon_year)
        .build_series(row, pricing, scenario)
}

/// Prices a portfolio under one scenario with default settings.
pub fn build_portfolio_series(
    rows: &[ReservationRow],
    index: &PricingIndex,
    scenario: Scenario,
    horizon_year: i32,
) -> PortfolioSeries {
    CostTimeseriesBuilder::new(EngineSettings::default(), horizon_year)
        .build_portfolio(rows, index, scenario)
}
