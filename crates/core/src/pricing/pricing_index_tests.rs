//! Tests for the pricing index and catalog record helpers.

use super::pricing_index::alias_forms;
use super::*;
use crate::reservations::UpfrontPayment;
use crate::settings::EngineSettings;
use rust_decimal_macros::dec;

fn record(engine: &str, edition: &str) -> PricingRecord {
    let mut reserved = ReservedRates::default();
    reserved.set(
        Scenario::OneYearNoUpfront,
        ReservedRate {
            upfront_cost: None,
            daily_reserved_rate: Some(dec!(30)),
        },
    );
    reserved.set(
        Scenario::ThreeYearAllUpfront,
        ReservedRate {
            upfront_cost: Some(dec!(3600)),
            daily_reserved_rate: Some(dec!(0)),
        },
    );
    PricingRecord {
        region: "us-east-1".to_string(),
        instance_class: "db.r5.large".to_string(),
        multi_az: false,
        engine: engine.to_string(),
        edition: edition.to_string(),
        daily_on_demand_rate: Some(dec!(50)),
        hourly_on_demand_rate: None,
        reserved,
    }
}

fn criteria(engine: &str, edition: &str) -> MatchingCriteria {
    MatchingCriteria {
        instance_class: "db.r5.large".to_string(),
        region: "us-east-1".to_string(),
        multi_az: false,
        engine: engine.to_string(),
        edition: edition.to_string(),
        upfront_payment: UpfrontPayment::NoUpfront,
        duration_months: 12,
    }
}

fn tokens() -> Vec<String> {
    EngineSettings::default().normalized_license_tokens()
}

fn forms(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(e, d)| (e.to_string(), d.to_string()))
        .collect()
}

// ==================== Alias generation ====================

#[test]
fn test_alias_split_fused_engine() {
    assert_eq!(
        alias_forms("oracle-se2-byol", "", &tokens()),
        forms(&[
            ("oracle", "se2-byol"),
            ("oracle", "se2"),
            ("oracle-se2", ""),
        ])
    );
}

#[test]
fn test_alias_combine_split_engine() {
    assert_eq!(
        alias_forms("oracle", "se2-byol", &tokens()),
        forms(&[
            ("oracle-se2-byol", ""),
            ("oracle", "se2"),
            ("oracle-se2", ""),
        ])
    );
}

#[test]
fn test_alias_edition_that_is_only_a_license() {
    assert_eq!(
        alias_forms("sqlserver", "license-included", &tokens()),
        forms(&[("sqlserver-license-included", ""), ("sqlserver", "")])
    );
}

#[test]
fn test_alias_plain_engine_has_no_aliases() {
    assert!(alias_forms("mysql", "", &tokens()).is_empty());
}

#[test]
fn test_license_token_must_be_whole_tail() {
    // "deli" ends in "li" but not in "-li".
    assert_eq!(
        alias_forms("oracle", "deli", &tokens()),
        forms(&[("oracle-deli", "")])
    );
}

// ==================== Index loading and lookup ====================

#[test]
fn test_exact_lookup_per_variant() {
    let index = PricingIndex::from_records(&[record("mysql", "standard")], &EngineSettings::default());
    let found = index.get(&criteria("MySQL", "Standard")).unwrap();
    assert_eq!(found.engine, "mysql");

    let three_year = criteria("mysql", "standard").with_terms(36, UpfrontPayment::AllUpfront);
    assert!(index.get(&three_year).is_some());

    let unpriced = criteria("mysql", "standard").with_terms(36, UpfrontPayment::NoUpfront);
    assert!(index.get(&unpriced).is_none());
}

#[test]
fn test_fused_catalog_matches_split_rows() {
    let index =
        PricingIndex::from_records(&[record("oracle-se2-byol", "")], &EngineSettings::default());
    assert!(index.get(&criteria("oracle", "se2-byol")).is_some());
    assert!(index.get(&criteria("oracle", "se2")).is_some());
    assert!(index.get(&criteria("oracle-se2", "")).is_some());
    assert!(index.get(&criteria("oracle", "ee")).is_none());
}

#[test]
fn test_split_catalog_matches_fused_rows() {
    let index =
        PricingIndex::from_records(&[record("oracle", "se2-byol")], &EngineSettings::default());
    assert!(index.get(&criteria("oracle-se2-byol", "")).is_some());
}

#[test]
fn test_alias_never_overwrites_exact_entry() {
    let mut exact = record("oracle", "se2");
    exact.daily_on_demand_rate = Some(dec!(99));
    // The fused record would alias to (oracle, se2); the exact record must keep the key
    // even though it is listed second.
    let index = PricingIndex::from_records(
        &[record("oracle-se2-byol", ""), exact],
        &EngineSettings::default(),
    );
    let found = index.get(&criteria("oracle", "se2")).unwrap();
    assert_eq!(found.daily_on_demand_rate, Some(dec!(99)));
}

#[test]
fn test_first_exact_writer_wins() {
    let mut second = record("mysql", "standard");
    second.daily_on_demand_rate = Some(dec!(7));
    let index = PricingIndex::from_records(
        &[record("mysql", "standard"), second],
        &EngineSettings::default(),
    );
    let found = index.get(&criteria("mysql", "standard")).unwrap();
    assert_eq!(found.daily_on_demand_rate, Some(dec!(50)));
    assert_eq!(index.exact_len(), 5);
}

#[test]
fn test_load_replaces_previous_catalog() {
    let mut index =
        PricingIndex::from_records(&[record("mysql", "standard")], &EngineSettings::default());
    index.load(&[record("postgres", "standard")]);
    assert!(index.get(&criteria("mysql", "standard")).is_none());
    assert!(index.get(&criteria("postgres", "standard")).is_some());
    assert_eq!(index.records().len(), 1);
}

#[test]
fn test_empty_index() {
    let index = PricingIndex::from_records(&[], &EngineSettings::default());
    assert!(index.is_empty());
    assert_eq!(index.alias_len(), 0);
}

#[test]
fn test_find_for_scenario() {
    let index = PricingIndex::from_records(&[record("mysql", "standard")], &EngineSettings::default());
    let row_criteria = criteria("mysql", "standard").with_terms(36, UpfrontPayment::NoUpfront);
    assert!(index.get(&row_criteria).is_none());
    assert!(index
        .find_for_scenario(&row_criteria, Scenario::ThreeYearAllUpfront)
        .is_some());
    assert!(index
        .find_for_scenario(&row_criteria, Scenario::OnDemand)
        .is_some());
}

// ==================== Record helpers ====================

#[test]
fn test_daily_on_demand_falls_back_to_hourly() {
    let mut hourly = record("mysql", "standard");
    hourly.daily_on_demand_rate = None;
    hourly.hourly_on_demand_rate = Some(dec!(0.5));
    assert_eq!(hourly.daily_on_demand(), Some(dec!(12)));
}

#[test]
fn test_rate_for_scenarios() {
    let rec = record("mysql", "standard");
    let no_upfront = rec.rate_for(Scenario::OneYearNoUpfront).unwrap();
    assert_eq!(no_upfront.upfront_cost, dec!(0));
    assert_eq!(no_upfront.daily_rate, dec!(30));

    let on_demand = rec.rate_for(Scenario::OnDemand).unwrap();
    assert_eq!(on_demand.daily_rate, dec!(50));

    assert!(rec.rate_for(Scenario::OneYearPartialUpfront).is_none());
}

#[test]
fn test_invalid_scenarios_flags_reserved_above_on_demand() {
    let mut rec = record("mysql", "standard");
    rec.reserved.set(
        Scenario::OneYearAllUpfront,
        ReservedRate {
            upfront_cost: Some(dec!(100)),
            daily_reserved_rate: Some(dec!(51)),
        },
    );
    assert_eq!(rec.invalid_scenarios(), vec![Scenario::OneYearAllUpfront]);
    assert!(rec.is_valid_for(Scenario::OneYearNoUpfront));
}

#[test]
fn test_scenario_serialization_and_terms() {
    assert_eq!(
        serde_json::to_string(&Scenario::ThreeYearPartialUpfront).unwrap(),
        "\"3yrPartialUpfront\""
    );
    assert_eq!(
        Scenario::from_terms(12, UpfrontPayment::AllUpfront),
        Some(Scenario::OneYearAllUpfront)
    );
    assert_eq!(Scenario::from_terms(36, UpfrontPayment::NoUpfront), None);
    assert_eq!(Scenario::OnDemand.reservation_terms(), None);
}

#[test]
fn test_row_and_record_without_edition_match() {
    let record: PricingRecord = serde_json::from_str(
        r#"{
            "region": "us-east-1",
            "instanceClass": "db.r5.large",
            "multiAz": false,
            "engine": "mysql",
            "dailyOnDemandRate": 50,
            "reserved": {"1yrNoUpfront": {"dailyReservedRate": 30}}
        }"#,
    )
    .unwrap();
    let row: crate::reservations::ReservationRow = serde_json::from_str(
        r#"{
            "id": "ri-1",
            "startDate": "2024-11-01",
            "count": 1,
            "instanceClass": "db.r5.large",
            "region": "us-east-1",
            "multiAz": false,
            "engine": "mysql",
            "upfrontPayment": "No Upfront",
            "durationMonths": 12
        }"#,
    )
    .unwrap();
    assert_eq!(record.edition, row.edition);

    let index = PricingIndex::from_records(&[record], &EngineSettings::default());
    let matched = index.get(&MatchingCriteria::from_row(&row)).unwrap();
    assert_eq!(matched.engine, "mysql");
}
