use std::collections::BTreeMap;

use crate::pricing::Scenario;

use super::timeseries_model::{MonthlyCostEntry, ScenarioCosts};

/// Unions the months of several series and sums each scenario's costs.
///
/// A scenario missing from one series is simply not added for it, so a slot
/// that no input defines stays absent in the result. The output is ordered
/// by (year, month); a single input is returned as-is.
pub fn merge_rows(series_list: &[Vec<MonthlyCostEntry>]) -> Vec<MonthlyCostEntry> {
    match series_list {
        [] => Vec::new(),
        [single] => single.clone(),
        many => {
            let mut merged: BTreeMap<(i32, u32), ScenarioCosts> = BTreeMap::new();
            for entry in many.iter().flatten() {
                let costs = merged.entry((entry.year, entry.month)).or_default();
                for scenario in Scenario::ALL {
                    if let Some(cost) = entry.cost.get(scenario) {
                        costs.add(scenario, *cost);
                    }
                }
            }
            merged
                .into_iter()
                .map(|((year, month), cost)| MonthlyCostEntry { year, month, cost })
                .collect()
        }
    }
}
