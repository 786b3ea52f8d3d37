//! Lookup table from matching keys to catalog records.
//!
//! Catalog files encode engine and license inconsistently: `oracle-se2-byol`
//! with no edition in one file, `oracle` + `se2-byol` in another. The index
//! expands every record into a fixed set of alias spellings at load time so
//! that a lookup is always one map access by primary key.
//!
//! Alias spellings generated for a normalized `(engine, edition)` pair:
//!
//! | Rule | Condition | Alias |
//! |------|-----------|-------|
//! | split | edition empty, engine has `-` | `(head, tail)` split at the first `-` |
//! | combine | edition set, engine has no `-` | `(engine-edition, "")` |
//! | strip edition | edition ends in a license token | `(engine, stripped)` and `(engine-stripped, "")` |
//! | strip engine | engine ends in a license token | `(stripped, edition)` and, with no edition, its split form |
//!
//! License tokens are whole hyphen-separated tails taken from
//! [`EngineSettings::license_tokens`]. Exact spellings are inserted before any
//! alias, and an alias never replaces a key already present.

use std::collections::HashMap;

use log::debug;

use crate::settings::EngineSettings;

use super::matching_key::{build_key, compose_key, normalize, MatchingCriteria};
use super::pricing_model::{PricingRecord, Scenario};

#[derive(Debug, Clone, Default)]
pub struct PricingIndex {
    records: Vec<PricingRecord>,
    keys: HashMap<String, usize>,
    exact_len: usize,
    license_tokens: Vec<String>,
}

impl PricingIndex {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            license_tokens: settings.normalized_license_tokens(),
            ..Self::default()
        }
    }

    pub fn from_records(records: &[PricingRecord], settings: &EngineSettings) -> Self {
        let mut index = Self::new(settings);
        index.load(records);
        index
    }

    /// Replaces the index contents with the given catalog.
    pub fn load(&mut self, records: &[PricingRecord]) {
        self.records = records.to_vec();
        self.keys.clear();

        for (position, record) in self.records.iter().enumerate() {
            for scenario in Scenario::RESERVED {
                if let Some(criteria) = MatchingCriteria::for_record(record, scenario) {
                    self.keys.entry(build_key(&criteria)).or_insert(position);
                }
            }
        }
        self.exact_len = self.keys.len();

        for (position, record) in self.records.iter().enumerate() {
            let engine = normalize(&record.engine);
            let edition = normalize(&record.edition);
            for (alias_engine, alias_edition) in
                alias_forms(&engine, &edition, &self.license_tokens)
            {
                for scenario in Scenario::RESERVED {
                    let Some((term, upfront)) = scenario.reservation_terms() else {
                        continue;
                    };
                    let key = compose_key(
                        &record.instance_class,
                        &record.region,
                        record.multi_az,
                        &alias_engine,
                        &alias_edition,
                        upfront,
                        term.months(),
                    );
                    self.keys.entry(key).or_insert(position);
                }
            }
        }

        debug!(
            "Pricing index loaded {} records into {} keys ({} aliases)",
            self.records.len(),
            self.keys.len(),
            self.alias_len()
        );
    }

    pub fn get(&self, criteria: &MatchingCriteria) -> Option<&PricingRecord> {
        self.get_by_key(&build_key(criteria))
    }

    pub fn get_by_key(&self, key: &str) -> Option<&PricingRecord> {
        self.keys.get(key).map(|&position| &self.records[position])
    }

    /// Record pricing the SKU of `criteria` under another scenario.
    ///
    /// On-demand rates live on every variant's record, so an on-demand lookup
    /// tries the criteria's own variant first and then each reserved variant.
    pub fn find_for_scenario(
        &self,
        criteria: &MatchingCriteria,
        scenario: Scenario,
    ) -> Option<&PricingRecord> {
        match scenario.reservation_terms() {
            Some((term, upfront)) => self.get(&criteria.with_terms(term.months(), upfront)),
            None => self.get(criteria).or_else(|| {
                Scenario::RESERVED.into_iter().find_map(|reserved| {
                    let (term, upfront) = reserved.reservation_terms()?;
                    self.get(&criteria.with_terms(term.months(), upfront))
                })
            }),
        }
    }

    /// Total number of keys, exact and alias.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn exact_len(&self) -> usize {
        self.exact_len
    }

    pub fn alias_len(&self) -> usize {
        self.keys.len() - self.exact_len
    }

    pub fn records(&self) -> &[PricingRecord] {
        &self.records
    }
}

/// Removes a trailing license token, `Some("")` when the token is the whole value.
fn strip_license(value: &str, tokens: &[String]) -> Option<String> {
    tokens.iter().find_map(|token| {
        if value == token {
            Some(String::new())
        } else {
            value
                .strip_suffix(token.as_str())
                .and_then(|head| head.strip_suffix('-'))
                .filter(|head| !head.is_empty())
                .map(str::to_string)
        }
    })
}

fn split_engine(engine: &str) -> Option<(String, String)> {
    let (head, tail) = engine.split_once('-')?;
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((head.to_string(), tail.to_string()))
}

fn combine(engine: &str, edition: &str) -> String {
    format!("{}-{}", engine, edition)
}

/// Alternate `(engine, edition)` spellings for a normalized pair, in insertion order.
pub(crate) fn alias_forms(engine: &str, edition: &str, tokens: &[String]) -> Vec<(String, String)> {
    let mut forms: Vec<(String, String)> = Vec::new();

    if edition.is_empty() {
        if let Some(split) = split_engine(engine) {
            forms.push(split);
        }
    } else if !engine.contains('-') {
        forms.push((combine(engine, edition), String::new()));
    }

    if !edition.is_empty() {
        if let Some(stripped) = strip_license(edition, tokens) {
            if stripped.is_empty() {
                forms.push((engine.to_string(), String::new()));
            } else {
                forms.push((engine.to_string(), stripped.clone()));
                if !engine.contains('-') {
                    forms.push((combine(engine, &stripped), String::new()));
                }
            }
        }
    }

    if let Some(stripped) = strip_license(engine, tokens) {
        if !stripped.is_empty() {
            if edition.is_empty() {
                if let Some(split) = split_engine(&stripped) {
                    forms.push(split);
                }
            }
            forms.push((stripped, edition.to_string()));
        }
    }

    let mut unique: Vec<(String, String)> = Vec::with_capacity(forms.len());
    for form in forms {
        if (form.0 != engine || form.1 != edition) && !unique.contains(&form) {
            unique.push(form);
        }
    }
    unique
}
