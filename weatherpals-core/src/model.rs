use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::condition::{ConditionFlags, WeatherCondition};

/// What a provider is asked for: a point and an optional local time.
///
/// `when == None` means "current conditions".
#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub when: Option<NaiveDateTime>,
}

/// A normalized provider answer.
#[derive(Debug, Clone)]
pub struct WeatherResponse {
    pub provider: String,
    /// Local time of the reading at the requested location.
    pub observed_at: NaiveDateTime,
    pub snapshot: WeatherSnapshot,
}

/// Precipitation amounts in millimetres, as reported upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationBreakdown {
    pub rain: f64,
    pub showers: f64,
    pub snowfall: f64,
    pub other: f64,
}

impl PrecipitationBreakdown {
    pub fn total(&self) -> f64 {
        self.rain + self.showers + self.snowfall + self.other
    }

    fn clamped(self) -> Self {
        Self {
            rain: non_negative(self.rain),
            showers: non_negative(self.showers),
            snowfall: non_negative(self.snowfall),
            other: non_negative(self.other),
        }
    }
}

/// Weather readings for one instant, normalized across providers.
///
/// Built through [`WeatherSnapshot::builder`], which clamps percentages to
/// `0..=100` and amounts to `>= 0`. Immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    temperature_c: f64,
    apparent_temperature_c: Option<f64>,
    precipitation_probability_pct: f64,
    precipitation: PrecipitationBreakdown,
    wind_speed_kph: f64,
    wind_gust_kph: Option<f64>,
    cloud_cover_pct: f64,
    condition: Option<WeatherCondition>,
    weather_code: Option<i32>,
    humidity_pct: Option<f64>,
    is_daytime: Option<bool>,
}

impl WeatherSnapshot {
    pub fn builder(temperature_c: f64) -> SnapshotBuilder {
        SnapshotBuilder::new(temperature_c)
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn apparent_temperature_c(&self) -> Option<f64> {
        self.apparent_temperature_c
    }

    pub fn precipitation_probability_pct(&self) -> f64 {
        self.precipitation_probability_pct
    }

    /// Sum of rain, showers, snowfall and other precipitation.
    pub fn precipitation_mm(&self) -> f64 {
        self.precipitation.total()
    }

    pub fn precipitation(&self) -> PrecipitationBreakdown {
        self.precipitation
    }

    pub fn snowfall_mm(&self) -> f64 {
        self.precipitation.snowfall
    }

    pub fn wind_speed_kph(&self) -> f64 {
        self.wind_speed_kph
    }

    pub fn wind_gust_kph(&self) -> Option<f64> {
        self.wind_gust_kph
    }

    pub fn cloud_cover_pct(&self) -> f64 {
        self.cloud_cover_pct
    }

    pub fn condition(&self) -> Option<WeatherCondition> {
        self.condition
    }

    /// Raw provider weather code, kept for export.
    pub fn weather_code(&self) -> Option<i32> {
        self.weather_code
    }

    pub fn humidity_pct(&self) -> Option<f64> {
        self.humidity_pct
    }

    pub fn is_daytime(&self) -> Option<bool> {
        self.is_daytime
    }

    /// Condition flags; all false when the condition is unknown.
    pub fn flags(&self) -> ConditionFlags {
        self.condition.map(WeatherCondition::flags).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    inner: WeatherSnapshot,
}

impl SnapshotBuilder {
    fn new(temperature_c: f64) -> Self {
        Self {
            inner: WeatherSnapshot {
                temperature_c,
                apparent_temperature_c: None,
                precipitation_probability_pct: 0.0,
                precipitation: PrecipitationBreakdown::default(),
                wind_speed_kph: 0.0,
                wind_gust_kph: None,
                cloud_cover_pct: 0.0,
                condition: None,
                weather_code: None,
                humidity_pct: None,
                is_daytime: None,
            },
        }
    }

    pub fn apparent_temperature_c(mut self, value: Option<f64>) -> Self {
        self.inner.apparent_temperature_c = value;
        self
    }

    pub fn precipitation_probability_pct(mut self, value: f64) -> Self {
        self.inner.precipitation_probability_pct = percentage(value);
        self
    }

    pub fn precipitation(mut self, breakdown: PrecipitationBreakdown) -> Self {
        self.inner.precipitation = breakdown.clamped();
        self
    }

    /// Shorthand for a single unclassified amount.
    pub fn precipitation_mm(self, amount: f64) -> Self {
        self.precipitation(PrecipitationBreakdown { other: amount, ..Default::default() })
    }

    pub fn wind_speed_kph(mut self, value: f64) -> Self {
        self.inner.wind_speed_kph = non_negative(value);
        self
    }

    pub fn wind_gust_kph(mut self, value: Option<f64>) -> Self {
        self.inner.wind_gust_kph = value.map(non_negative);
        self
    }

    pub fn cloud_cover_pct(mut self, value: f64) -> Self {
        self.inner.cloud_cover_pct = percentage(value);
        self
    }

    pub fn condition(mut self, value: Option<WeatherCondition>) -> Self {
        self.inner.condition = value;
        self
    }

    pub fn weather_code(mut self, value: Option<i32>) -> Self {
        self.inner.weather_code = value;
        self
    }

    pub fn humidity_pct(mut self, value: Option<f64>) -> Self {
        self.inner.humidity_pct = value.map(percentage);
        self
    }

    pub fn is_daytime(mut self, value: Option<bool>) -> Self {
        self.inner.is_daytime = value;
        self
    }

    pub fn build(self) -> WeatherSnapshot {
        self.inner
    }
}

fn percentage(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_percentages_and_amounts() {
        let snapshot = WeatherSnapshot::builder(12.0)
            .precipitation_probability_pct(140.0)
            .cloud_cover_pct(-5.0)
            .humidity_pct(Some(101.0))
            .wind_speed_kph(-3.0)
            .precipitation(PrecipitationBreakdown {
                rain: -1.0,
                showers: 0.5,
                ..Default::default()
            })
            .build();

        assert_eq!(snapshot.precipitation_probability_pct(), 100.0);
        assert_eq!(snapshot.cloud_cover_pct(), 0.0);
        assert_eq!(snapshot.humidity_pct(), Some(100.0));
        assert_eq!(snapshot.wind_speed_kph(), 0.0);
        assert_eq!(snapshot.precipitation_mm(), 0.5);
    }

    #[test]
    fn precipitation_total_sums_all_parts() {
        let snapshot = WeatherSnapshot::builder(10.0)
            .precipitation(PrecipitationBreakdown {
                rain: 1.0,
                showers: 0.5,
                snowfall: 0.25,
                other: 2.0,
            })
            .build();

        assert_eq!(snapshot.precipitation_mm(), 3.75);
        assert_eq!(snapshot.snowfall_mm(), 0.25);
    }

    #[test]
    fn missing_condition_yields_no_flags() {
        let snapshot = WeatherSnapshot::builder(20.0).build();
        assert_eq!(snapshot.flags(), ConditionFlags::default());
    }
}
