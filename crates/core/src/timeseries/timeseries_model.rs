//! Month-by-month cost series shared by every scenario.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::Scenario;
use crate::utils::calendar_utils::month_key;

/// Upfront and recurring cost paid in one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPair {
    pub upfront_cost: Decimal,
    pub monthly_cost: Decimal,
}

impl CostPair {
    pub fn new(upfront_cost: Decimal, monthly_cost: Decimal) -> Self {
        Self {
            upfront_cost,
            monthly_cost,
        }
    }

    pub fn total(&self) -> Decimal {
        self.upfront_cost + self.monthly_cost
    }
}

impl std::ops::AddAssign for CostPair {
    fn add_assign(&mut self, other: Self) {
        self.upfront_cost += other.upfront_cost;
        self.monthly_cost += other.monthly_cost;
    }
}

/// One optional cost slot per scenario. An absent slot means the scenario was
/// not computed for that month, which is different from a zero cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCosts {
    #[serde(rename = "onDemand", default)]
    pub on_demand: Option<CostPair>,
    #[serde(rename = "1yrNoUpfront", default)]
    pub one_year_no_upfront: Option<CostPair>,
    #[serde(rename = "1yrPartialUpfront", default)]
    pub one_year_partial_upfront: Option<CostPair>,
    #[serde(rename = "1yrAllUpfront", default)]
    pub one_year_all_upfront: Option<CostPair>,
    #[serde(rename = "3yrPartialUpfront", default)]
    pub three_year_partial_upfront: Option<CostPair>,
    #[serde(rename = "3yrAllUpfront", default)]
    pub three_year_all_upfront: Option<CostPair>,
}

impl ScenarioCosts {
    /// Costs with only the given scenario's slot filled.
    pub fn only(scenario: Scenario, cost: CostPair) -> Self {
        let mut costs = Self::default();
        *costs.slot_mut(scenario) = Some(cost);
        costs
    }

    pub fn get(&self, scenario: Scenario) -> Option<&CostPair> {
        match scenario {
            Scenario::OnDemand => self.on_demand.as_ref(),
            Scenario::OneYearNoUpfront => self.one_year_no_upfront.as_ref(),
            Scenario::OneYearPartialUpfront => self.one_year_partial_upfront.as_ref(),
            Scenario::OneYearAllUpfront => self.one_year_all_upfront.as_ref(),
            Scenario::ThreeYearPartialUpfront => self.three_year_partial_upfront.as_ref(),
            Scenario::ThreeYearAllUpfront => self.three_year_all_upfront.as_ref(),
        }
    }

    fn slot_mut(&mut self, scenario: Scenario) -> &mut Option<CostPair> {
        match scenario {
            Scenario::OnDemand => &mut self.on_demand,
            Scenario::OneYearNoUpfront => &mut self.one_year_no_upfront,
            Scenario::OneYearPartialUpfront => &mut self.one_year_partial_upfront,
            Scenario::OneYearAllUpfront => &mut self.one_year_all_upfront,
            Scenario::ThreeYearPartialUpfront => &mut self.three_year_partial_upfront,
            Scenario::ThreeYearAllUpfront => &mut self.three_year_all_upfront,
        }
    }

    /// Adds to the scenario's slot, filling it when absent.
    pub fn add(&mut self, scenario: Scenario, cost: CostPair) {
        let slot = self.slot_mut(scenario);
        match slot {
            Some(existing) => *existing += cost,
            None => *slot = Some(cost),
        }
    }

    /// Scenarios that have a value in this month.
    pub fn scenarios(&self) -> impl Iterator<Item = Scenario> + '_ {
        Scenario::ALL
            .into_iter()
            .filter(move |s| self.get(*s).is_some())
    }
}

/// Cost of one calendar month across scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCostEntry {
    pub year: i32,
    pub month: u32,
    pub cost: ScenarioCosts,
}

impl MonthlyCostEntry {
    pub fn new(year: i32, month: u32, scenario: Scenario, cost: CostPair) -> Self {
        Self {
            year,
            month,
            cost: ScenarioCosts::only(scenario, cost),
        }
    }

    pub fn month_key(&self) -> String {
        month_key(self.year, self.month)
    }
}
