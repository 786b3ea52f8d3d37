//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LICENSE_TOKENS, DEFAULT_MAX_DIAGNOSTIC_SAMPLES, DEFAULT_MAX_MONTH_ITERATIONS,
    DEFAULT_MAX_RENEWAL_ITERATIONS,
};
use crate::errors::{Error, Result};

/// Tunables shared by the aggregation engine, the pricing index and the
/// renewal projector. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Cap applied to every diagnostic sample list.
    pub max_unmatched_samples: usize,
    /// Maximum months enumerated for one reservation.
    pub max_month_iterations: usize,
    /// Maximum renewals generated for one reservation.
    pub max_renewal_iterations: usize,
    /// Compute per-reservation contributions on the rayon pool.
    pub parallel: bool,
    /// License suffixes stripped when generating pricing alias keys.
    pub license_tokens: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_unmatched_samples: DEFAULT_MAX_DIAGNOSTIC_SAMPLES,
            max_month_iterations: DEFAULT_MAX_MONTH_ITERATIONS,
            max_renewal_iterations: DEFAULT_MAX_RENEWAL_ITERATIONS,
            parallel: false,
            license_tokens: DEFAULT_LICENSE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_month_iterations == 0 {
            return Err(Error::Settings(
                "maxMonthIterations must be greater than zero".to_string(),
            ));
        }
        if self.max_renewal_iterations == 0 {
            return Err(Error::Settings(
                "maxRenewalIterations must be greater than zero".to_string(),
            ));
        }
        if self
            .license_tokens
            .iter()
            .any(|token| token.trim().is_empty())
        {
            return Err(Error::Settings(
                "licenseTokens must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }

    /// License tokens normalized the same way matching keys are.
    pub fn normalized_license_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .license_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        // Longest first so "license-included" wins over "included"-style tails.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();
        tokens
    }
}
