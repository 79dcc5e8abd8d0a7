//! Reduce 3-hourly forecast samples to one summary per calendar day.

use chrono::{Local, NaiveDate, TimeZone};

use crate::error::ForecastError;
use crate::types::{DailySummary, RawSample, WeatherCategory};

/// Calendar date a sample falls on, evaluated in the aggregator's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct DayKey(NaiveDate);

/// Groups samples into calendar days and summarizes each day.
///
/// Stateless apart from the timezone used to decide where a day starts.
/// Defaults to the local timezone of the machine running it.
#[derive(Debug, Clone)]
pub struct DailyAggregator<Tz: TimeZone = Local> {
    tz: Tz,
}

impl DailyAggregator<Local> {
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl Default for DailyAggregator<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> DailyAggregator<Tz> {
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    /// Calendar day of an epoch timestamp.
    pub(crate) fn day_key(&self, timestamp: i64) -> Result<DayKey, ForecastError> {
        self.tz
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|dt| DayKey(dt.date_naive()))
            .ok_or_else(|| {
                ForecastError::MalformedSample(format!("timestamp out of range: {}", timestamp))
            })
    }

    /// Summarize `samples` per day.
    ///
    /// Days appear in the order their first sample appears in the input, so
    /// unsorted input is fine. Empty input gives empty output. Samples whose
    /// timestamp has no calendar date are skipped; if every sample is skipped
    /// the last rejection is returned.
    pub fn aggregate(&self, samples: &[RawSample]) -> Result<Vec<DailySummary>, ForecastError> {
        let mut buckets: Vec<(DayKey, Vec<&RawSample>)> = Vec::new();
        let mut rejected = None;

        for sample in samples {
            let key = match self.day_key(sample.timestamp) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping forecast sample: {}", e);
                    rejected = Some(e);
                    continue;
                }
            };
            match buckets.iter_mut().find(|(k, _)| *k == key) {
                Some((_, bucket)) => bucket.push(sample),
                None => buckets.push((key, vec![sample])),
            }
        }

        tracing::debug!(
            "Grouped {} samples into {} days",
            samples.len(),
            buckets.len()
        );

        if buckets.is_empty() {
            if let Some(e) = rejected {
                return Err(e);
            }
        }

        Ok(buckets
            .iter()
            .filter_map(|(_, bucket)| summarize(bucket))
            .collect())
    }
}

/// Reduce one day's samples. Returns `None` only for an empty bucket.
fn summarize(bucket: &[&RawSample]) -> Option<DailySummary> {
    let first = bucket.first()?;
    let median = bucket[bucket.len() / 2];
    let count = bucket.len() as f64;

    let temp_max = bucket
        .iter()
        .map(|s| s.temperature)
        .fold(f64::NEG_INFINITY, f64::max);
    let temp_min = bucket
        .iter()
        .map(|s| s.temperature)
        .fold(f64::INFINITY, f64::min);
    let humidity = bucket.iter().map(|s| s.humidity).sum::<f64>() / count;
    let wind_speed = bucket.iter().map(|s| s.wind_speed).sum::<f64>() / count;
    let precipitation_probability = bucket
        .iter()
        .map(|s| s.precipitation_probability.unwrap_or(0.0))
        .fold(0.0, f64::max);

    Some(DailySummary {
        timestamp: first.timestamp,
        temp_max,
        temp_min,
        category: most_frequent(bucket.iter().map(|s| s.category)),
        // Description and icon follow the middle sample, which may disagree
        // with the chosen category.
        description: median.description.clone(),
        icon: median.icon.clone(),
        humidity: humidity.round() as i32,
        wind_speed,
        precipitation_probability,
    })
}

/// Most common category. Ties go to the category seen first.
pub fn most_frequent(categories: impl IntoIterator<Item = WeatherCategory>) -> WeatherCategory {
    let mut counts: Vec<(WeatherCategory, usize)> = Vec::new();
    for category in categories {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(WeatherCategory, usize)> = None;
    for (category, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((category, n));
        }
    }
    best.map(|(c, _)| c).unwrap_or_default()
}
