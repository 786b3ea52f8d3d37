//! Renewals module - chained projection of future reservation terms.

mod renewal_projector;
mod renewals_model;

pub use renewal_projector::RenewalProjector;
pub use renewals_model::{RenewalProjection, RenewalScenario};
