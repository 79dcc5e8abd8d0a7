//! Pad a short forecast out to a fixed number of days.
//!
//! Each synthesized day is a bounded random walk from the day before it.
//! The values are placeholders for display and carry no forecasting skill.

use rand::Rng;

use crate::types::DailySummary;

const SECONDS_PER_DAY: i64 = 86_400;
/// Max temperature shift per day, °C
const TEMP_STEP: f64 = 5.0;
/// Max humidity shift per day, percentage points
const HUMIDITY_STEP: i32 = 10;
/// Max wind speed shift per day, m/s
const WIND_STEP: f64 = 1.0;
/// Max precipitation probability shift per day
const POP_STEP: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastExtrapolator;

impl ForecastExtrapolator {
    pub fn new() -> Self {
        Self
    }

    /// Extend `series` to `target` days using the thread-local RNG.
    pub fn extend(&self, series: Vec<DailySummary>, target: usize) -> Vec<DailySummary> {
        self.extend_with(series, target, &mut rand::rng())
    }

    /// Extend `series` to `target` days, drawing offsets from `rng`.
    ///
    /// A series already at or past `target` is returned untouched. Each new
    /// day is derived from the current last day, synthesized or not. An
    /// empty series stays empty since there is nothing to walk from.
    pub fn extend_with<R: Rng + ?Sized>(
        &self,
        mut series: Vec<DailySummary>,
        target: usize,
        rng: &mut R,
    ) -> Vec<DailySummary> {
        let real_days = series.len();

        while series.len() < target {
            let Some(basis) = series.last() else {
                break;
            };
            let next = step(basis, rng);
            series.push(next);
        }

        if series.len() > real_days {
            tracing::debug!(
                "Extrapolated {} days beyond {} real days",
                series.len() - real_days,
                real_days
            );
        }
        series
    }
}

fn step<R: Rng + ?Sized>(basis: &DailySummary, rng: &mut R) -> DailySummary {
    // One draw moves both ends of the temperature range together.
    let temp_shift = rng.random_range(-TEMP_STEP..=TEMP_STEP);
    let humidity_shift = rng.random_range(-HUMIDITY_STEP..=HUMIDITY_STEP);
    let wind_shift = rng.random_range(-WIND_STEP..=WIND_STEP);
    let pop_shift = rng.random_range(-POP_STEP..=POP_STEP);

    DailySummary {
        timestamp: basis.timestamp + SECONDS_PER_DAY,
        temp_max: basis.temp_max + temp_shift,
        temp_min: basis.temp_min + temp_shift,
        category: basis.category,
        description: basis.description.clone(),
        icon: basis.icon.clone(),
        // Humidity and wind are left unclamped and can drift out of their
        // physical ranges over a long walk.
        humidity: basis.humidity + humidity_shift,
        wind_speed: basis.wind_speed + wind_shift,
        precipitation_probability: (basis.precipitation_probability + pop_shift).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCategory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(timestamp: i64, pop: f64) -> DailySummary {
        DailySummary {
            timestamp,
            temp_max: 22.0,
            temp_min: 14.0,
            category: WeatherCategory::Drizzle,
            description: "light drizzle".to_string(),
            icon: "09d".to_string(),
            humidity: 70,
            wind_speed: 4.0,
            precipitation_probability: pop,
        }
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_identity_when_already_long_enough() {
        let series = vec![day(0, 0.1), day(86_400, 0.2), day(172_800, 0.3)];
        let extrapolator = ForecastExtrapolator::new();

        assert_eq!(extrapolator.extend(series.clone(), 3), series);
        assert_eq!(extrapolator.extend(series.clone(), 2), series);
        assert_eq!(extrapolator.extend(series.clone(), 0), series);
    }

    #[test]
    fn test_extends_to_target() {
        let series = vec![day(1_000, 0.5), day(87_400, 0.5)];
        let out = ForecastExtrapolator::new().extend_with(series.clone(), 16, &mut seeded(7));

        assert_eq!(out.len(), 16);
        assert_eq!(&out[..2], &series[..]);
    }

    #[test]
    fn test_empty_series_stays_empty() {
        let out = ForecastExtrapolator::new().extend_with(Vec::new(), 16, &mut seeded(1));
        assert!(out.is_empty());
    }

    #[test]
    fn test_each_step_is_bounded_by_previous_day() {
        for seed in 0..20 {
            let out =
                ForecastExtrapolator::new().extend_with(vec![day(0, 0.5)], 16, &mut seeded(seed));

            for pair in out.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                let temp_shift = next.temp_max - prev.temp_max;

                assert!(temp_shift.abs() <= TEMP_STEP + 1e-9);
                // Max and min move by the same draw
                assert!((next.temp_min - prev.temp_min - temp_shift).abs() < 1e-9);
                assert!(next.temp_max >= next.temp_min);
                assert!((next.humidity - prev.humidity).abs() <= HUMIDITY_STEP);
                assert!((next.wind_speed - prev.wind_speed).abs() <= WIND_STEP + 1e-9);
                assert!(
                    (next.precipitation_probability - prev.precipitation_probability).abs()
                        <= POP_STEP + 1e-9
                );
                assert_eq!(next.timestamp, prev.timestamp + SECONDS_PER_DAY);
            }
        }
    }

    #[test]
    fn test_precipitation_stays_in_unit_range() {
        for (seed, start) in [(3, 0.0), (4, 1.0), (5, 0.05), (6, 0.95)] {
            let out = ForecastExtrapolator::new().extend_with(
                vec![day(0, start)],
                64,
                &mut seeded(seed),
            );
            for d in &out {
                assert!((0.0..=1.0).contains(&d.precipitation_probability));
            }
        }
    }

    #[test]
    fn test_weather_copied_from_last_day() {
        let mut last = day(86_400, 0.2);
        last.category = WeatherCategory::Snow;
        last.description = "heavy snow".to_string();
        last.icon = "13d".to_string();
        let series = vec![day(0, 0.1), last];

        let out = ForecastExtrapolator::new().extend_with(series, 10, &mut seeded(11));

        for d in &out[2..] {
            assert_eq!(d.category, WeatherCategory::Snow);
            assert_eq!(d.description, "heavy snow");
            assert_eq!(d.icon, "13d");
        }
    }
}
