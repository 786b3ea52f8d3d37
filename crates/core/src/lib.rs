//! RI Planner Core - reservation cost projection and aggregation.
//!
//! This crate prices reserved database capacity against a pricing catalog,
//! projects renewals out to a horizon year and compares the monthly cost of
//! paying on-demand against the reserved payment options. It performs no I/O:
//! callers load reservations and catalog records and pass them in.

pub mod aggregation;
pub mod constants;
pub mod errors;
pub mod pricing;
pub mod proration;
pub mod renewals;
pub mod reservations;
pub mod settings;
pub mod timeseries;
pub mod utils;

// Re-export the value types most callers need
pub use pricing::{PricingIndex, PricingRecord, Scenario};
pub use reservations::{first_full_year, ReservationRow, ReservationType, Term, UpfrontPayment};
pub use settings::EngineSettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
