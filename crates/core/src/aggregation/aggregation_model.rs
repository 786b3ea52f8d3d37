//! Cost aggregation domain models and diagnostics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a reservation did not (fully) contribute to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// No catalog entry for the reservation's matching key.
    UnmatchedPricing,
    /// The matched reserved rate is above the on-demand rate.
    InvalidPricing,
    /// The matched record lacks the reserved or on-demand daily rate.
    MissingRates,
    /// The reservation is not active on any enumerated day.
    ZeroActiveDays,
    /// The reservation covers no instances.
    ZeroCount,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnmatchedPricing => "unmatched pricing",
            DiagnosticKind::InvalidPricing => "invalid pricing",
            DiagnosticKind::MissingRates => "missing rates",
            DiagnosticKind::ZeroActiveDays => "zero active days",
            DiagnosticKind::ZeroCount => "zero count",
        }
    }
}

/// One reported reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSample {
    pub reservation_id: String,
    pub kind: DiagnosticKind,
    pub matching_key: String,
    pub message: String,
}

/// Count and capped samples for one diagnostic kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticBucket {
    pub count: usize,
    pub samples: Vec<DiagnosticSample>,
}

/// Data-quality findings collected while aggregating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDiagnostics {
    pub unmatched_count: usize,
    /// Matching keys that found no catalog entry, capped.
    pub unmatched_samples: Vec<String>,
    pub unmatched_pricing: DiagnosticBucket,
    pub invalid_pricing: DiagnosticBucket,
    pub missing_rates: DiagnosticBucket,
    pub zero_active_days: DiagnosticBucket,
    pub zero_count: DiagnosticBucket,
}

impl CostDiagnostics {
    fn bucket_mut(&mut self, kind: DiagnosticKind) -> &mut DiagnosticBucket {
        match kind {
            DiagnosticKind::UnmatchedPricing => &mut self.unmatched_pricing,
            DiagnosticKind::InvalidPricing => &mut self.invalid_pricing,
            DiagnosticKind::MissingRates => &mut self.missing_rates,
            DiagnosticKind::ZeroActiveDays => &mut self.zero_active_days,
            DiagnosticKind::ZeroCount => &mut self.zero_count,
        }
    }

    pub fn bucket(&self, kind: DiagnosticKind) -> &DiagnosticBucket {
        match kind {
            DiagnosticKind::UnmatchedPricing => &self.unmatched_pricing,
            DiagnosticKind::InvalidPricing => &self.invalid_pricing,
            DiagnosticKind::MissingRates => &self.missing_rates,
            DiagnosticKind::ZeroActiveDays => &self.zero_active_days,
            DiagnosticKind::ZeroCount => &self.zero_count,
        }
    }

    /// Counts the finding and keeps its sample while the bucket is under `cap`.
    /// Returns whether the sample was kept.
    pub fn record(&mut self, sample: DiagnosticSample, cap: usize) -> bool {
        if sample.kind == DiagnosticKind::UnmatchedPricing {
            self.unmatched_count += 1;
            if self.unmatched_samples.len() < cap {
                self.unmatched_samples.push(sample.matching_key.clone());
            }
        }
        let bucket = self.bucket_mut(sample.kind);
        bucket.count += 1;
        if bucket.samples.len() < cap {
            bucket.samples.push(sample);
            true
        } else {
            false
        }
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.bucket(kind).count
    }

    pub fn total(&self) -> usize {
        ALL_KINDS.iter().map(|k| self.count(*k)).sum()
    }

    pub fn has_issues(&self) -> bool {
        self.total() > 0
    }

    /// One-line description for surfacing to the user, `None` when clean.
    pub fn summary(&self) -> Option<String> {
        if !self.has_issues() {
            return None;
        }
        let parts: Vec<String> = ALL_KINDS
            .iter()
            .filter(|k| self.count(**k) > 0)
            .map(|k| format!("{} {}", self.count(*k), k.as_str()))
            .collect();
        let total = self.total();
        let noun = if total == 1 {
            "reservation"
        } else {
            "reservations"
        };
        Some(format!(
            "{} {} could not be priced ({})",
            total,
            noun,
            parts.join(", ")
        ))
    }
}

pub(crate) const ALL_KINDS: [DiagnosticKind; 5] = [
    DiagnosticKind::UnmatchedPricing,
    DiagnosticKind::InvalidPricing,
    DiagnosticKind::MissingRates,
    DiagnosticKind::ZeroActiveDays,
    DiagnosticKind::ZeroCount,
];

/// Contribution of one reservation to one month bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDetail {
    pub reservation_id: String,
    pub count: u32,
    pub active_days: u32,
    pub upfront_cost: Decimal,
    pub recurring_cost: Decimal,
    pub ri_cost: Decimal,
    pub on_demand_cost: Decimal,
}

/// Summed cost of every reservation sharing a month and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCostAggregate {
    pub month_key: String,
    pub group_key: String,
    pub ri_cost: Decimal,
    pub on_demand_cost: Decimal,
    pub savings_amount: Decimal,
    pub savings_percentage: Decimal,
    pub details: Vec<AggregateDetail>,
}

impl MonthlyCostAggregate {
    pub fn new(month_key: &str, group_key: &str) -> Self {
        Self {
            month_key: month_key.to_string(),
            group_key: group_key.to_string(),
            ri_cost: Decimal::ZERO,
            on_demand_cost: Decimal::ZERO,
            savings_amount: Decimal::ZERO,
            savings_percentage: Decimal::ZERO,
            details: Vec::new(),
        }
    }

    /// Stacks one reservation's contribution and refreshes the savings
    /// figures from the running totals.
    pub fn add(&mut self, detail: AggregateDetail) {
        self.ri_cost += detail.ri_cost;
        self.on_demand_cost += detail.on_demand_cost;
        self.details.push(detail);
        self.savings_amount = self.on_demand_cost - self.ri_cost;
        self.savings_percentage = savings_percentage(self.ri_cost, self.on_demand_cost);
    }
}

/// `(1 - ri / on_demand) * 100`, zero when there is no on-demand cost.
pub fn savings_percentage(ri_cost: Decimal, on_demand_cost: Decimal) -> Decimal {
    if on_demand_cost > Decimal::ZERO {
        (Decimal::ONE - ri_cost / on_demand_cost) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Month key -> group key -> aggregate.
pub type MonthlyAggregates = BTreeMap<String, BTreeMap<String, MonthlyCostAggregate>>;

/// Output of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub months: MonthlyAggregates,
    pub diagnostics: CostDiagnostics,
    pub rows_processed: usize,
    pub rows_matched: usize,
}

impl AggregationResult {
    pub fn get(&self, month_key: &str, group_key: &str) -> Option<&MonthlyCostAggregate> {
        self.months.get(month_key)?.get(group_key)
    }

    pub fn total_ri_cost(&self) -> Decimal {
        self.aggregates().map(|a| a.ri_cost).sum()
    }

    pub fn total_on_demand_cost(&self) -> Decimal {
        self.aggregates().map(|a| a.on_demand_cost).sum()
    }

    /// RI and on-demand cost of one month summed over all groups.
    pub fn month_totals(&self, month_key: &str) -> (Decimal, Decimal) {
        self.months
            .get(month_key)
            .map(|groups| {
                groups.values().fold((Decimal::ZERO, Decimal::ZERO), |acc, a| {
                    (acc.0 + a.ri_cost, acc.1 + a.on_demand_cost)
                })
            })
            .unwrap_or((Decimal::ZERO, Decimal::ZERO))
    }

    pub fn aggregates(&self) -> impl Iterator<Item = &MonthlyCostAggregate> {
        self.months.values().flat_map(|groups| groups.values())
    }
}
