// Daily aggregator and tariff totals for the energy tab
use crate::domain::error::TimelineResult;
use crate::domain::telemetry::{DailyEnergyBucket, EnergyConsumption};
use crate::domain::timestamp::parse_timestamp;
use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;

/// Retail and feed-in rates used for the cost summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnergyTariff {
    #[serde(default = "default_cost_per_kwh")]
    pub cost_per_kwh: f64,
    #[serde(default = "default_feed_in_peak_rate")]
    pub feed_in_peak_rate: f64,
    #[serde(default = "default_feed_in_offpeak_rate")]
    pub feed_in_offpeak_rate: f64,
    /// Local hour the peak feed-in window opens, inclusive
    #[serde(default = "default_peak_start_hour")]
    pub peak_start_hour: u32,
    /// Local hour the peak feed-in window closes, exclusive
    #[serde(default = "default_peak_end_hour")]
    pub peak_end_hour: u32,
}

fn default_cost_per_kwh() -> f64 {
    0.323719
}

fn default_feed_in_peak_rate() -> f64 {
    0.10
}

fn default_feed_in_offpeak_rate() -> f64 {
    0.02
}

fn default_peak_start_hour() -> u32 {
    15
}

fn default_peak_end_hour() -> u32 {
    21
}

impl Default for EnergyTariff {
    fn default() -> Self {
        Self {
            cost_per_kwh: default_cost_per_kwh(),
            feed_in_peak_rate: default_feed_in_peak_rate(),
            feed_in_offpeak_rate: default_feed_in_offpeak_rate(),
            peak_start_hour: default_peak_start_hour(),
            peak_end_hour: default_peak_end_hour(),
        }
    }
}

fn local_time(sample: &EnergyConsumption, tz: Tz) -> TimelineResult<DateTime<Tz>> {
    Ok(parse_timestamp(&sample.id, &sample.time)?.with_timezone(&tz))
}

/// Sum usage and export per local calendar day, in first-seen order.
pub fn aggregate_daily(
    samples: &[EnergyConsumption],
    tz: Tz,
) -> TimelineResult<Vec<DailyEnergyBucket>> {
    let mut buckets: Vec<DailyEnergyBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let day_label = local_time(sample, tz)?.format("%d/%m/%Y").to_string();
        let slot = *index.entry(day_label.clone()).or_insert_with(|| {
            buckets.push(DailyEnergyBucket::new(day_label));
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.used_kwh += sample.used;
        bucket.solar_exported_kwh += sample.solar_exported;
    }

    tracing::debug!("Aggregated {} energy samples into {} days", samples.len(), buckets.len());
    Ok(buckets)
}

/// Retail cost of everything consumed.
pub fn total_cost(samples: &[EnergyConsumption], tariff: &EnergyTariff) -> f64 {
    samples.iter().map(|s| s.used * tariff.cost_per_kwh).sum()
}

/// Feed-in credit, paying the peak rate inside the local peak window.
pub fn total_solar_value(
    samples: &[EnergyConsumption],
    tariff: &EnergyTariff,
    tz: Tz,
) -> TimelineResult<f64> {
    let mut total = 0.0;
    for sample in samples {
        let hour = local_time(sample, tz)?.hour();
        let rate = if hour >= tariff.peak_start_hour && hour < tariff.peak_end_hour {
            tariff.feed_in_peak_rate
        } else {
            tariff.feed_in_offpeak_rate
        };
        total += sample.solar_exported * rate;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TimelineError;
    use chrono_tz::Australia::Perth;

    fn sample(id: &str, time: &str, used: f64, solar_exported: f64) -> EnergyConsumption {
        EnergyConsumption {
            id: id.to_string(),
            used,
            solar_exported,
            time: time.to_string(),
        }
    }

    #[test]
    fn test_same_day_samples_are_summed() {
        let samples = vec![
            sample("1", "2025-06-01T01:00:00Z", 1.0, 0.5),
            sample("2", "2025-06-01T05:00:00Z", 2.5, 0.25),
        ];
        let days = aggregate_daily(&samples, Perth).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_label, "01/06/2025");
        assert_eq!(days[0].used_kwh, 3.5);
        assert_eq!(days[0].solar_exported_kwh, 0.75);
    }

    #[test]
    fn test_first_seen_order_without_gap_filling() {
        let samples = vec![
            sample("1", "2025-06-03T04:00:00Z", 1.0, 0.0),
            sample("2", "2025-06-01T04:00:00Z", 2.0, 0.0),
            sample("3", "2025-06-03T06:00:00Z", 3.0, 0.0),
        ];
        let days = aggregate_daily(&samples, Perth).unwrap();
        let labels: Vec<&str> = days.iter().map(|d| d.day_label.as_str()).collect();
        assert_eq!(labels, vec!["03/06/2025", "01/06/2025"]);
        assert_eq!(days[0].used_kwh, 4.0);
    }

    #[test]
    fn test_day_boundary_follows_local_zone() {
        // 17:00Z is 01:00 the next day in Perth
        let samples = vec![
            sample("1", "2025-06-01T15:00:00Z", 1.0, 0.0),
            sample("2", "2025-06-01T17:00:00Z", 1.0, 0.0),
        ];
        assert_eq!(aggregate_daily(&samples, Perth).unwrap().len(), 2);
        assert_eq!(aggregate_daily(&samples, Tz::UTC).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_time_is_reported() {
        let samples = vec![sample("broken", "soon", 1.0, 0.0)];
        assert!(aggregate_daily(&samples, Perth).is_err());
    }

    #[test]
    fn test_out_of_range_epoch_is_not_bucketed_as_1970() {
        let samples = vec![sample("far", "9000000000000000", 1.0, 0.0)];
        assert!(matches!(
            aggregate_daily(&samples, Perth),
            Err(TimelineError::InvalidTimestamp { ref source_id, .. }) if source_id == "far"
        ));
        assert!(total_solar_value(&samples, &EnergyTariff::default(), Perth).is_err());
    }

    #[test]
    fn test_tariff_totals() {
        let tariff = EnergyTariff::default();
        let samples = vec![
            // 16:00 Perth, inside the peak window
            sample("1", "2025-06-01T08:00:00Z", 10.0, 2.0),
            // 10:00 Perth, off-peak
            sample("2", "2025-06-01T02:00:00Z", 0.0, 5.0),
        ];

        assert!((total_cost(&samples, &tariff) - 3.23719).abs() < 1e-9);
        let value = total_solar_value(&samples, &tariff, Perth).unwrap();
        assert!((value - 0.3).abs() < 1e-9);
    }
}
