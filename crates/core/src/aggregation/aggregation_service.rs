use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::pricing::{build_key, MatchingCriteria, PricingIndex, PricingRecord, Scenario};
use crate::proration::{active_days_in_month, prorate_month};
use crate::reservations::ReservationRow;
use crate::settings::EngineSettings;
use crate::utils::calendar_utils::{month_key, months_between, next_month};

use super::aggregation_model::{
    AggregateDetail, AggregationResult, DiagnosticKind, DiagnosticSample, MonthlyCostAggregate,
};

/// What one reservation adds to the month/group table.
#[derive(Debug)]
struct RowContribution {
    group_key: String,
    months: Vec<(String, AggregateDetail)>,
    issue: Option<DiagnosticSample>,
}

impl RowContribution {
    fn skipped(group_key: String, issue: DiagnosticSample) -> Self {
        Self {
            group_key,
            months: Vec::new(),
            issue: Some(issue),
        }
    }
}

/// Turns reservations and a pricing catalog into a month-keyed, group-keyed
/// cost table. Rows that cannot be priced are reported in the diagnostics
/// and skipped; aggregation itself never fails.
#[derive(Debug, Clone, Default)]
pub struct CostAggregationEngine {
    settings: EngineSettings,
    window: Option<(NaiveDate, NaiveDate)>,
}

impl CostAggregationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            window: None,
        }
    }

    /// Restricts the enumerated days to the inclusive `[start, end]` window.
    /// Upfront payments made before the window are left out.
    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.window = Some((start, end));
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn aggregate(&self, rows: &[ReservationRow], pricing: &[PricingRecord]) -> AggregationResult {
        let index = PricingIndex::from_records(pricing, &self.settings);
        self.aggregate_with_index(rows, &index)
    }

    pub fn aggregate_with_index(
        &self,
        rows: &[ReservationRow],
        index: &PricingIndex,
    ) -> AggregationResult {
        debug!(
            "Aggregating costs for {} reservations against {} pricing keys",
            rows.len(),
            index.len()
        );

        // Collecting keeps row order, so the fold below is identical either way.
        let contributions: Vec<RowContribution> = if self.settings.parallel {
            rows.par_iter()
                .map(|row| self.row_contribution(row, index))
                .collect()
        } else {
            rows.iter()
                .map(|row| self.row_contribution(row, index))
                .collect()
        };

        let mut result = AggregationResult {
            rows_processed: rows.len(),
            ..AggregationResult::default()
        };
        let cap = self.settings.max_unmatched_samples;

        for contribution in contributions {
            if let Some(issue) = contribution.issue {
                let message = issue.message.clone();
                if result.diagnostics.record(issue, cap) {
                    warn!("{}", message);
                }
            }
            if contribution.months.is_empty() {
                continue;
            }
            result.rows_matched += 1;
            for (key, detail) in contribution.months {
                result
                    .months
                    .entry(key.clone())
                    .or_default()
                    .entry(contribution.group_key.clone())
                    .or_insert_with(|| MonthlyCostAggregate::new(&key, &contribution.group_key))
                    .add(detail);
            }
        }

        debug!(
            "Aggregated {} of {} reservations into {} months ({} diagnostics)",
            result.rows_matched,
            result.rows_processed,
            result.months.len(),
            result.diagnostics.total()
        );
        result
    }

    fn row_contribution(&self, row: &ReservationRow, index: &PricingIndex) -> RowContribution {
        let criteria = MatchingCriteria::from_row(row);
        let group_key = criteria.group_key();
        let key = build_key(&criteria);
        let issue = |kind: DiagnosticKind, message: String| DiagnosticSample {
            reservation_id: row.id.clone(),
            kind,
            matching_key: key.clone(),
            message,
        };

        if row.count == 0 {
            let sample = issue(
                DiagnosticKind::ZeroCount,
                format!("Reservation {} has a count of zero", row.id),
            );
            return RowContribution::skipped(group_key, sample);
        }

        let matched = index
            .get_by_key(&key)
            .zip(Scenario::from_terms(row.duration_months, row.upfront_payment));
        let Some((record, scenario)) = matched else {
            let sample = issue(
                DiagnosticKind::UnmatchedPricing,
                format!("No pricing found for reservation {} (key {})", row.id, key),
            );
            return RowContribution::skipped(group_key, sample);
        };

        let (Some(rate), Some(on_demand_rate)) = (record.rate_for(scenario), record.daily_on_demand())
        else {
            let sample = issue(
                DiagnosticKind::MissingRates,
                format!(
                    "Pricing for reservation {} lacks the {} or on-demand daily rate",
                    row.id, scenario
                ),
            );
            return RowContribution::skipped(group_key, sample);
        };

        if !record.is_valid_for(scenario) {
            let sample = issue(
                DiagnosticKind::InvalidPricing,
                format!(
                    "Pricing for reservation {} has a {} rate of {} above on-demand {}",
                    row.id, scenario, rate.daily_rate, on_demand_rate
                ),
            );
            return RowContribution::skipped(group_key, sample);
        }

        let mut months_to_visit = match row.end_date {
            Some(end) => months_between(row.start_date, end) as usize,
            None => row.duration_months as usize,
        };
        if months_to_visit > self.settings.max_month_iterations {
            warn!(
                "Reservation {} spans {} months, stopping after {}",
                row.id, months_to_visit, self.settings.max_month_iterations
            );
            months_to_visit = self.settings.max_month_iterations;
        }

        let count = Decimal::from(row.count);
        let mut months = Vec::new();
        let (mut year, mut month) = (row.start_date.year(), row.start_date.month());

        for _ in 0..months_to_visit {
            let cost = prorate_month(row.start_date, row.end_date, row.count, &rate, year, month);
            let (active_days, upfront_cost) = match self.window {
                None => (cost.active_days, cost.upfront_cost),
                Some((window_start, window_end)) => {
                    let end = row.end_date.map_or(window_end, |e| e.min(window_end));
                    let days =
                        active_days_in_month(row.start_date.max(window_start), Some(end), year, month);
                    let upfront_in_window =
                        row.start_date >= window_start && row.start_date <= window_end;
                    let upfront = if upfront_in_window && days > 0 {
                        cost.upfront_cost
                    } else {
                        Decimal::ZERO
                    };
                    (days, upfront)
                }
            };

            if active_days > 0 {
                let days = Decimal::from(active_days);
                let recurring_cost = rate.daily_rate * days * count;
                months.push((
                    month_key(year, month),
                    AggregateDetail {
                        reservation_id: row.id.clone(),
                        count: row.count,
                        active_days,
                        upfront_cost,
                        recurring_cost,
                        ri_cost: recurring_cost + upfront_cost,
                        on_demand_cost: on_demand_rate * days * count,
                    },
                ));
            }
            (year, month) = next_month(year, month);
        }

        if months.is_empty() {
            let sample = issue(
                DiagnosticKind::ZeroActiveDays,
                format!("Reservation {} is not active in any aggregated month", row.id),
            );
            return RowContribution::skipped(group_key, sample);
        }

        RowContribution {
            group_key,
            months,
            issue: None,
        }
    }
}

/// Aggregates with default settings.
pub fn aggregate(rows: &[ReservationRow], pricing: &[PricingRecord]) -> AggregationResult {
    CostAggregationEngine::default().aggregate(rows, pricing)
}
