use chrono::NaiveDate;
use log::{debug, error};

use crate::errors::{ProjectionError, Result, ValidationError};
use crate::reservations::{ReservationRow, ReservationType};
use crate::settings::EngineSettings;
use crate::utils::calendar_utils::{term_end, year_end};

use super::renewals_model::{RenewalProjection, RenewalScenario};

/// Extends reservations with back-to-back renewals until each chain covers
/// the end of the horizon year.
#[derive(Debug, Clone, Default)]
pub struct RenewalProjector {
    settings: EngineSettings,
}

impl RenewalProjector {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Copies every actual reservation and appends its renewal chain.
    ///
    /// A chain that fails to converge keeps its original row, drops its
    /// renewals and is reported in [`RenewalProjection::failures`].
    pub fn project(
        &self,
        portfolio: &[ReservationRow],
        scenario: RenewalScenario,
        horizon_year: i32,
    ) -> Result<RenewalProjection> {
        let horizon_end = year_end(horizon_year).ok_or_else(|| {
            ValidationError::InvalidInput(format!("Horizon year {} is out of range", horizon_year))
        })?;
        debug!(
            "Projecting {} reservations to {} with {} {} renewals",
            portfolio.len(),
            horizon_end,
            scenario.term.months(),
            scenario.upfront_payment
        );

        let mut rows = Vec::with_capacity(portfolio.len() * 2);
        let mut failures = Vec::new();

        for original in portfolio.iter().filter(|r| !r.is_projected()) {
            rows.push(original.clone());
            match self.project_chain(original, scenario, horizon_end) {
                Ok(renewals) => rows.extend(renewals),
                Err(e) => {
                    error!("{}", e);
                    failures.push(e);
                }
            }
        }

        debug!(
            "Projection produced {} rows, {} failed chains",
            rows.len(),
            failures.len()
        );
        Ok(RenewalProjection {
            rows,
            failures,
            horizon_end,
        })
    }

    /// Renewals for one reservation, each starting the day after the previous
    /// term ends. At least one renewal is produced and the last one always
    /// ends after `horizon_end`.
    pub fn project_chain(
        &self,
        original: &ReservationRow,
        scenario: RenewalScenario,
        horizon_end: NaiveDate,
    ) -> std::result::Result<Vec<ReservationRow>, ProjectionError> {
        let out_of_range = |date: NaiveDate| ProjectionError::DateOutOfRange {
            reservation_id: original.id.clone(),
            date,
        };

        let mut previous_end = original
            .effective_end_date()
            .ok_or_else(|| out_of_range(original.start_date))?;
        let mut renewals = Vec::new();

        for sequence in 1..=self.settings.max_renewal_iterations {
            let start = previous_end
                .succ_opt()
                .ok_or_else(|| out_of_range(previous_end))?;
            let end = term_end(start, scenario.months()).ok_or_else(|| out_of_range(start))?;
            if end <= previous_end {
                return Err(ProjectionError::Stalled {
                    reservation_id: original.id.clone(),
                    date: previous_end,
                });
            }

            renewals.push(ReservationRow {
                id: format!("{}-renew-{}", original.id, sequence),
                start_date: start,
                end_date: Some(end),
                upfront_payment: scenario.upfront_payment,
                duration_months: scenario.months(),
                reservation_type: ReservationType::Projected,
                ..original.clone()
            });

            if end > horizon_end {
                return Ok(renewals);
            }
            previous_end = end;
        }

        Err(ProjectionError::RunawayProjection {
            reservation_id: original.id.clone(),
            iterations: self.settings.max_renewal_iterations,
        })
    }
}
