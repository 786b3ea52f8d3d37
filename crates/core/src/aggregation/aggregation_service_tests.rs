//! Unit tests for the cost aggregation engine.

use super::*;
use crate::pricing::{PricingRecord, ReservedRate, ReservedRates, Scenario};
use crate::reservations::{ReservationRow, ReservationType, UpfrontPayment};
use crate::settings::EngineSettings;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Fixtures
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> ReservationRow {
    ReservationRow {
        id: id.to_string(),
        start_date: start,
        end_date: end,
        count: 1,
        instance_class: "db.r5.large".to_string(),
        region: "us-east-1".to_string(),
        multi_az: false,
        engine: "mysql".to_string(),
        edition: "standard".to_string(),
        upfront_payment: UpfrontPayment::NoUpfront,
        duration_months: 12,
        reservation_type: ReservationType::Actual,
    }
}

fn record(on_demand: Decimal, no_upfront: Decimal) -> PricingRecord {
    let mut reserved = ReservedRates::default();
    reserved.set(
        Scenario::OneYearNoUpfront,
        ReservedRate {
            upfront_cost: None,
            daily_reserved_rate: Some(no_upfront),
        },
    );
    reserved.set(
        Scenario::OneYearAllUpfront,
        ReservedRate {
            upfront_cost: Some(dec!(3600)),
            daily_reserved_rate: Some(dec!(10)),
        },
    );
    PricingRecord {
        region: "us-east-1".to_string(),
        instance_class: "db.r5.large".to_string(),
        multi_az: false,
        engine: "mysql".to_string(),
        edition: "standard".to_string(),
        daily_on_demand_rate: Some(on_demand),
        hourly_on_demand_rate: None,
        reserved,
    }
}

const MYSQL_GROUP: &str = "us-east-1 / db.r5.large / Single-AZ / mysql standard";

// ============================================================================
// Cost math
// ============================================================================

#[test]
fn test_savings_for_full_november() {
    let rows = vec![row("ri-1", date(2024, 11, 1), Some(date(2024, 11, 30)))];
    let result = aggregate(&rows, &[record(dec!(50), dec!(30))]);

    let november = result.get("2024-11", MYSQL_GROUP).unwrap();
    assert_eq!(november.on_demand_cost, dec!(1500));
    assert_eq!(november.ri_cost, dec!(900));
    assert_eq!(november.savings_amount, dec!(600));
    assert_eq!(november.savings_percentage, dec!(40));
    assert_eq!(result.months.len(), 1);
    assert!(!result.diagnostics.has_issues());
}

#[test]
fn test_open_ended_reservation_prorates_first_month() {
    let rows = vec![row("ri-1", date(2024, 11, 16), None)];
    let result = aggregate(&rows, &[record(dec!(50), dec!(30))]);

    assert_eq!(result.get("2024-11", MYSQL_GROUP).unwrap().ri_cost, dec!(450));
    assert_eq!(result.get("2024-12", MYSQL_GROUP).unwrap().ri_cost, dec!(930));
    // Twelve months enumerated from the start month.
    assert_eq!(result.months.len(), 12);
    assert!(result.months.contains_key("2025-10"));
    assert!(!result.months.contains_key("2025-11"));
}

#[test]
fn test_upfront_lands_in_start_month_only() {
    let mut all_upfront = row("ri-1", date(2025, 9, 10), None);
    all_upfront.upfront_payment = UpfrontPayment::AllUpfront;
    let result = aggregate(&[all_upfront], &[record(dec!(50), dec!(30))]);

    let september = result.get("2025-09", MYSQL_GROUP).unwrap();
    let october = result.get("2025-10", MYSQL_GROUP).unwrap();
    assert!(september.ri_cost >= dec!(3600));
    assert_eq!(september.details[0].upfront_cost, dec!(3600));
    assert!(october.ri_cost < dec!(3600));
    assert_eq!(october.details[0].upfront_cost, dec!(0));
}

#[test]
fn test_known_end_stops_at_end_month() {
    let rows = vec![row("ri-1", date(2024, 6, 15), Some(date(2025, 6, 14)))];
    let result = aggregate(&rows, &[record(dec!(50), dec!(30))]);

    assert_eq!(result.months.len(), 13);
    let last = result.get("2025-06", MYSQL_GROUP).unwrap();
    assert_eq!(last.details[0].active_days, 14);
}

#[test]
fn test_reservations_in_same_group_are_stacked() {
    let mut second = row("ri-2", date(2024, 11, 1), Some(date(2024, 11, 30)));
    second.count = 2;
    let rows = vec![row("ri-1", date(2024, 11, 1), Some(date(2024, 11, 30))), second];
    let result = aggregate(&rows, &[record(dec!(50), dec!(30))]);

    let november = result.get("2024-11", MYSQL_GROUP).unwrap();
    assert_eq!(november.details.len(), 2);
    assert_eq!(november.ri_cost, dec!(2700));
    assert_eq!(november.on_demand_cost, dec!(4500));
    assert_eq!(november.savings_amount, dec!(1800));
    assert_eq!(november.savings_percentage, dec!(40));
    assert_eq!(result.rows_matched, 2);
}

#[test]
fn test_different_deployments_use_separate_groups() {
    let mut multi = row("ri-2", date(2024, 11, 1), Some(date(2024, 11, 30)));
    multi.multi_az = true;
    let mut multi_record = record(dec!(100), dec!(60));
    multi_record.multi_az = true;

    let rows = vec![row("ri-1", date(2024, 11, 1), Some(date(2024, 11, 30))), multi];
    let result = aggregate(&rows, &[record(dec!(50), dec!(30)), multi_record]);

    assert_eq!(result.months["2024-11"].len(), 2);
    assert_eq!(result.month_totals("2024-11"), (dec!(2700), dec!(4500)));
    assert_eq!(result.total_ri_cost(), dec!(2700));
    assert_eq!(result.total_on_demand_cost(), dec!(4500));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_unmatched_rows_are_counted_and_skipped() {
    let mut unknown = row("ri-9", date(2024, 11, 1), None);
    unknown.instance_class = "db.x9.huge".to_string();
    let result = aggregate(&[unknown], &[record(dec!(50), dec!(30))]);

    assert!(result.months.is_empty());
    assert_eq!(result.diagnostics.unmatched_count, 1);
    assert_eq!(result.diagnostics.count(DiagnosticKind::UnmatchedPricing), 1);
    assert_eq!(
        result.diagnostics.unmatched_samples,
        vec!["db.x9.huge|us-east-1|false|mysql|standard|no upfront|12".to_string()]
    );
    assert_eq!(result.rows_matched, 0);
}

#[test]
fn test_unpriced_term_is_unmatched() {
    let mut three_year_no_upfront = row("ri-1", date(2024, 11, 1), None);
    three_year_no_upfront.duration_months = 36;
    let result = aggregate(&[three_year_no_upfront], &[record(dec!(50), dec!(30))]);
    assert_eq!(result.diagnostics.unmatched_count, 1);
}

#[test]
fn test_reserved_rate_above_on_demand_is_invalid() {
    let rows = vec![row("ri-1", date(2024, 11, 1), None)];
    let result = aggregate(&rows, &[record(dec!(50), dec!(60))]);

    assert!(result.months.is_empty());
    assert_eq!(result.diagnostics.count(DiagnosticKind::InvalidPricing), 1);
    assert_eq!(result.diagnostics.unmatched_count, 0);
    assert_eq!(
        result.diagnostics.invalid_pricing.samples[0].reservation_id,
        "ri-1"
    );
}

#[test]
fn test_missing_variant_rate_is_flagged() {
    let mut partial = row("ri-1", date(2024, 11, 1), None);
    partial.upfront_payment = UpfrontPayment::PartialUpfront;
    let result = aggregate(&[partial], &[record(dec!(50), dec!(30))]);

    assert!(result.months.is_empty());
    assert_eq!(result.diagnostics.count(DiagnosticKind::MissingRates), 1);
}

#[test]
fn test_missing_on_demand_rate_is_flagged() {
    let mut no_on_demand = record(dec!(50), dec!(30));
    no_on_demand.daily_on_demand_rate = None;
    let result = aggregate(&[row("ri-1", date(2024, 11, 1), None)], &[no_on_demand]);
    assert_eq!(result.diagnostics.count(DiagnosticKind::MissingRates), 1);
}

#[test]
fn test_zero_count_is_flagged() {
    let mut empty = row("ri-1", date(2024, 11, 1), None);
    empty.count = 0;
    let result = aggregate(&[empty], &[record(dec!(50), dec!(30))]);
    assert_eq!(result.diagnostics.count(DiagnosticKind::ZeroCount), 1);
    assert!(result.months.is_empty());
}

#[test]
fn test_end_before_start_has_zero_active_days() {
    let inverted = row("ri-1", date(2024, 11, 20), Some(date(2024, 11, 10)));
    let result = aggregate(&[inverted], &[record(dec!(50), dec!(30))]);
    assert_eq!(result.diagnostics.count(DiagnosticKind::ZeroActiveDays), 1);
}

#[test]
fn test_samples_are_capped() {
    let settings = EngineSettings {
        max_unmatched_samples: 2,
        ..EngineSettings::default()
    };
    let rows: Vec<ReservationRow> = (0..5)
        .map(|i| {
            let mut r = row(&format!("ri-{}", i), date(2024, 1, 1), None);
            r.region = format!("nowhere-{}", i);
            r
        })
        .collect();
    let result = CostAggregationEngine::new(settings).aggregate(&rows, &[]);

    assert_eq!(result.diagnostics.unmatched_count, 5);
    assert_eq!(result.diagnostics.unmatched_samples.len(), 2);
    assert_eq!(result.diagnostics.unmatched_pricing.count, 5);
    assert_eq!(result.diagnostics.unmatched_pricing.samples.len(), 2);
}

#[test]
fn test_diagnostics_summary() {
    let mut empty = row("ri-1", date(2024, 11, 1), None);
    empty.count = 0;
    let mut unknown = row("ri-2", date(2024, 11, 1), None);
    unknown.engine = "db2".to_string();
    let result = aggregate(&[empty, unknown], &[record(dec!(50), dec!(30))]);

    assert_eq!(
        result.diagnostics.summary().unwrap(),
        "2 reservations could not be priced (1 unmatched pricing, 1 zero count)"
    );
    assert_eq!(CostDiagnostics::default().summary(), None);
}

// ============================================================================
// Engine options
// ============================================================================

#[test]
fn test_parallel_matches_sequential() {
    let rows: Vec<ReservationRow> = (0..40)
        .map(|i| {
            let mut r = row(&format!("ri-{}", i), date(2024, 1 + (i % 12), 1 + i % 28), None);
            r.count = 1 + i;
            r
        })
        .collect();
    let pricing = vec![record(dec!(50), dec!(30))];

    let sequential = CostAggregationEngine::default().aggregate(&rows, &pricing);
    let parallel = CostAggregationEngine::new(EngineSettings {
        parallel: true,
        ..EngineSettings::default()
    })
    .aggregate(&rows, &pricing);

    assert_eq!(sequential, parallel);
}

#[test]
fn test_window_clips_months_and_upfront() {
    let mut all_upfront = row("ri-1", date(2024, 6, 15), None);
    all_upfront.upfront_payment = UpfrontPayment::AllUpfront;
    let pricing = vec![record(dec!(50), dec!(30))];

    let clipped = CostAggregationEngine::default()
        .with_window(date(2024, 7, 1), date(2024, 12, 31))
        .aggregate(&[all_upfront], &pricing);

    assert_eq!(clipped.months.len(), 6);
    assert!(!clipped.months.contains_key("2024-06"));
    assert!(!clipped.months.contains_key("2025-01"));
    assert!(clipped
        .aggregates()
        .all(|a| a.details[0].upfront_cost == dec!(0)));
}

#[test]
fn test_month_iteration_cap() {
    let settings = EngineSettings {
        max_month_iterations: 3,
        ..EngineSettings::default()
    };
    let result = CostAggregationEngine::new(settings)
        .aggregate(&[row("ri-1", date(2024, 1, 1), None)], &[record(dec!(50), dec!(30))]);
    assert_eq!(result.months.len(), 3);
}

#[test]
fn test_savings_percentage_without_on_demand_cost() {
    assert_eq!(savings_percentage(dec!(10), dec!(0)), dec!(0));
    assert_eq!(savings_percentage(dec!(25), dec!(100)), dec!(75));
}
