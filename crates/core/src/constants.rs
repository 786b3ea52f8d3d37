/// Default cap on every diagnostic sample list
pub const DEFAULT_MAX_DIAGNOSTIC_SAMPLES: usize = 1000;

/// Runaway guard for month enumeration of a single reservation
pub const DEFAULT_MAX_MONTH_ITERATIONS: usize = 2400;

/// Runaway guard for the renewals generated for a single reservation
pub const DEFAULT_MAX_RENEWAL_ITERATIONS: usize = 1000;

/// Edition assumed when a reservation does not carry one
pub const DEFAULT_EDITION: &str = "standard";

/// License suffixes stripped from engine/edition tokens when building alias keys.
/// Matched as whole hyphen-separated tails, never as substrings.
pub const DEFAULT_LICENSE_TOKENS: &[&str] = &[
    "byol",
    "bring-your-own-license",
    "li",
    "license-included",
];

/// Hours used to derive a daily rate from an hourly one
pub const HOURS_PER_DAY: i64 = 24;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Separator between the components of a matching key
pub const KEY_SEPARATOR: char = '|';
