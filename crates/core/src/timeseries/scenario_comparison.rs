use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::pricing::Scenario;

use super::timeseries_model::MonthlyCostEntry;

/// Totals of one scenario over the comparison window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub total_cost: Decimal,
    pub total_upfront: Decimal,
    pub total_monthly_payment: Decimal,
    pub maximum_monthly_cost: Decimal,
    /// Cost paid during the first full year alone.
    pub first_full_year_cost: Decimal,
    /// Saving against the baseline; absent for the baseline itself or when
    /// the baseline costs nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_percent: Option<Decimal>,
}

impl ScenarioSummary {
    fn empty(scenario: Scenario) -> Self {
        Self {
            scenario,
            total_cost: Decimal::ZERO,
            total_upfront: Decimal::ZERO,
            total_monthly_payment: Decimal::ZERO,
            maximum_monthly_cost: Decimal::ZERO,
            first_full_year_cost: Decimal::ZERO,
            savings_percent: None,
        }
    }

    fn rounded(&self) -> Self {
        Self {
            total_cost: self.total_cost.round_dp(DISPLAY_DECIMAL_PRECISION),
            total_upfront: self.total_upfront.round_dp(DISPLAY_DECIMAL_PRECISION),
            total_monthly_payment: self.total_monthly_payment.round_dp(DISPLAY_DECIMAL_PRECISION),
            maximum_monthly_cost: self.maximum_monthly_cost.round_dp(DISPLAY_DECIMAL_PRECISION),
            first_full_year_cost: self.first_full_year_cost.round_dp(DISPLAY_DECIMAL_PRECISION),
            savings_percent: self
                .savings_percent
                .map(|p| p.round_dp(DISPLAY_DECIMAL_PRECISION)),
            ..self.clone()
        }
    }
}

/// Per-scenario totals compared against a baseline scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub baseline: Scenario,
    pub first_full_year: i32,
    pub summaries: BTreeMap<Scenario, ScenarioSummary>,
}

impl ScenarioComparison {
    pub fn get(&self, scenario: Scenario) -> Option<&ScenarioSummary> {
        self.summaries.get(&scenario)
    }

    /// The scenario with the lowest total cost.
    pub fn cheapest(&self) -> Option<&ScenarioSummary> {
        self.summaries.values().min_by_key(|s| s.total_cost)
    }

    /// Copy with every amount rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            summaries: self
                .summaries
                .iter()
                .map(|(scenario, summary)| (*scenario, summary.rounded()))
                .collect(),
            ..self.clone()
        }
    }
}

/// Summarizes each scenario's series up to the end of `first_full_year` and
/// computes its saving against `baseline`.
///
/// Months after December of `first_full_year` are left out of every total,
/// the savings percentage included, not only out of `first_full_year_cost`.
///
/// Each series is read through its own scenario's slot, so callers may pass
/// the same merged union series under several keys.
pub fn compare_scenarios(
    series_by_scenario: &BTreeMap<Scenario, Vec<MonthlyCostEntry>>,
    baseline: Scenario,
    first_full_year: i32,
) -> ScenarioComparison {
    let mut summaries: BTreeMap<Scenario, ScenarioSummary> = BTreeMap::new();

    for (scenario, series) in series_by_scenario {
        let mut summary = ScenarioSummary::empty(*scenario);
        for entry in series.iter().filter(|e| e.year <= first_full_year) {
            let Some(cost) = entry.cost.get(*scenario) else {
                continue;
            };
            summary.total_upfront += cost.upfront_cost;
            summary.total_monthly_payment += cost.monthly_cost;
            summary.maximum_monthly_cost = summary.maximum_monthly_cost.max(cost.total());
            if entry.year == first_full_year {
                summary.first_full_year_cost += cost.total();
            }
        }
        summary.total_cost = summary.total_monthly_payment + summary.total_upfront;
        summaries.insert(*scenario, summary);
    }

    let baseline_total = summaries
        .get(&baseline)
        .map(|s| s.total_cost)
        .filter(|total| !total.is_zero());

    match baseline_total {
        Some(baseline_total) => {
            for summary in summaries.values_mut().filter(|s| s.scenario != baseline) {
                summary.savings_percent = Some(
                    (baseline_total - summary.total_cost) / baseline_total * Decimal::ONE_HUNDRED,
                );
            }
        }
        None => debug!(
            "Baseline {} has no cost through {}, savings left undefined",
            baseline, first_full_year
        ),
    }

    ScenarioComparison {
        baseline,
        first_full_year,
        summaries,
    }
}
