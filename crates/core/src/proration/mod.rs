//! Proration module - per-month cost attribution.

mod monthly_prorater;

pub use monthly_prorater::{active_days_in_month, is_in_month, prorate_month, ProratedCost};
