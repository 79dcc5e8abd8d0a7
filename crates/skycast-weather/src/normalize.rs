//! Turn either upstream forecast shape into a fixed-length daily series.

use chrono::{Local, TimeZone};
use rand::Rng;

use crate::aggregate::DailyAggregator;
use crate::error::ForecastError;
use crate::extrapolate::ForecastExtrapolator;
use crate::types::{DailySummary, ForecastPayload, ForecastSeries, FORECAST_DAYS};

/// Aggregates, extrapolates and truncates forecast payloads into a
/// [`ForecastSeries`] of exactly [`FORECAST_DAYS`] entries.
///
/// Pure over its input: no I/O, no shared state. Construct one per caller
/// or share it freely.
#[derive(Debug, Clone)]
pub struct ForecastNormalizer<Tz: TimeZone = Local> {
    aggregator: DailyAggregator<Tz>,
    extrapolator: ForecastExtrapolator,
}

impl ForecastNormalizer<Local> {
    pub fn new() -> Self {
        Self::with_aggregator(DailyAggregator::new())
    }
}

impl Default for ForecastNormalizer<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> ForecastNormalizer<Tz> {
    pub fn with_aggregator(aggregator: DailyAggregator<Tz>) -> Self {
        Self {
            aggregator,
            extrapolator: ForecastExtrapolator::new(),
        }
    }

    /// Normalize using the thread-local RNG for any extrapolated days.
    pub fn normalize(&self, payload: ForecastPayload) -> Result<ForecastSeries, ForecastError> {
        self.normalize_with(payload, &mut rand::rng())
    }

    /// Normalize, drawing extrapolation offsets from `rng`.
    ///
    /// Native daily entries pass through as-is. Three-hourly samples are
    /// aggregated per day first. Either way the result is padded by
    /// extrapolation and cut to [`FORECAST_DAYS`].
    pub fn normalize_with<R: Rng + ?Sized>(
        &self,
        payload: ForecastPayload,
        rng: &mut R,
    ) -> Result<ForecastSeries, ForecastError> {
        let mode = payload.mode();
        let days = match payload {
            ForecastPayload::NativeDaily(days) => {
                if days.is_empty() {
                    return Err(ForecastError::EmptyInput);
                }
                days
            }
            ForecastPayload::ThreeHourly(samples) => {
                if samples.is_empty() {
                    return Err(ForecastError::EmptyInput);
                }
                let days = self.aggregator.aggregate(&samples)?;
                if days.is_empty() {
                    return Err(ForecastError::InsufficientData {
                        produced: 0,
                        expected: FORECAST_DAYS,
                    });
                }
                days
            }
        };

        let real_days = days.len();
        let series = self.fit(days, rng)?;
        tracing::debug!(
            "Normalized {:?} forecast: {} real days, {} total",
            mode,
            real_days.min(FORECAST_DAYS),
            series.len()
        );
        Ok(series)
    }

    fn fit<R: Rng + ?Sized>(
        &self,
        days: Vec<DailySummary>,
        rng: &mut R,
    ) -> Result<ForecastSeries, ForecastError> {
        let mut days = self.extrapolator.extend_with(days, FORECAST_DAYS, rng);
        days.truncate(FORECAST_DAYS);

        if days.len() != FORECAST_DAYS {
            return Err(ForecastError::InsufficientData {
                produced: days.len(),
                expected: FORECAST_DAYS,
            });
        }
        Ok(ForecastSeries::new_unchecked(days))
    }
}
