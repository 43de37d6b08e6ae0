use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    condition::WeatherCondition,
    model::{PrecipitationBreakdown, WeatherRequest, WeatherResponse, WeatherSnapshot},
    provider::{DateRequest, ProviderId, classify_date, same_hour, truncate_body},
};

use super::WeatherProvider;

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation_probability,precipitation,rain,showers,snowfall,weather_code,cloud_cover,\
wind_speed_10m,wind_gusts_10m,is_day";

const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,rain,showers,snowfall,weather_code,cloud_cover,wind_speed_10m,wind_gusts_10m,\
is_day";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Keyless forecast provider. Times are local to the requested point
/// (`timezone=auto`).
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self { base_url: OPEN_METEO_FORECAST_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch<T: DeserializeOwned>(&self, what: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = %self.base_url, what, "requesting Open-Meteo");

        let res = self
            .http
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }

    async fn fetch_current(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        let query = [
            ("latitude", request.latitude.to_string()),
            ("longitude", request.longitude.to_string()),
            ("current", CURRENT_VARIABLES.to_string()),
            ("hourly", "precipitation_probability".to_string()),
            ("forecast_days", "1".to_string()),
            ("timezone", "auto".to_string()),
        ];

        let parsed: OmCurrentResponse = self.fetch("current", &query).await?;

        let observed_at = parse_time(&parsed.current.time)?;

        // The current block has no probability; borrow it from this hour's forecast.
        let probability = parsed.hourly.as_ref().and_then(|hourly| {
            hourly
                .time
                .iter()
                .position(|t| parse_time(t).is_ok_and(|dt| same_hour(dt, observed_at)))
                .and_then(|idx| value_at(&hourly.precipitation_probability, idx))
        });

        let reading = OmReading { precipitation_probability: probability, ..parsed.current.values };

        Ok(WeatherResponse {
            provider: ProviderId::OpenMeteo.to_string(),
            observed_at,
            snapshot: reading.into_snapshot()?,
        })
    }

    async fn fetch_hourly(
        &self,
        request: &WeatherRequest,
        when: NaiveDateTime,
    ) -> Result<WeatherResponse> {
        let date = when.date().format("%Y-%m-%d").to_string();
        let query = [
            ("latitude", request.latitude.to_string()),
            ("longitude", request.longitude.to_string()),
            ("hourly", VARIABLES.to_string()),
            ("start_date", date.clone()),
            ("end_date", date),
            ("timezone", "auto".to_string()),
        ];

        let parsed: OmHourlyResponse = self.fetch("forecast", &query).await?;

        let hourly = parsed
            .hourly
            .ok_or_else(|| anyhow!("Invalid weather data received: missing hourly block"))?;

        let (idx, observed_at) = hourly
            .time
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| parse_time(t).ok().map(|dt| (idx, dt)))
            .find(|(_, dt)| same_hour(*dt, when))
            .ok_or_else(|| anyhow!("Could not find weather data for the selected time ({when})"))?;

        debug!(%observed_at, idx, "selected hourly entry");

        Ok(WeatherResponse {
            provider: ProviderId::OpenMeteo.to_string(),
            observed_at,
            snapshot: hourly.reading_at(idx).into_snapshot()?,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        match classify_date(request.when) {
            DateRequest::Current => self.fetch_current(request).await,
            DateRequest::Hourly(dt) => self.fetch_hourly(request, dt).await,
        }
    }
}

/// One instant's values; every field may be null upstream.
#[derive(Debug, Clone, Default, Deserialize)]
struct OmReading {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    precipitation_probability: Option<f64>,
    precipitation: Option<f64>,
    rain: Option<f64>,
    showers: Option<f64>,
    snowfall: Option<f64>,
    weather_code: Option<i32>,
    cloud_cover: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_gusts_10m: Option<f64>,
    is_day: Option<u8>,
}

impl OmReading {
    fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let temperature =
            self.temperature_2m.context("Open-Meteo response is missing temperature_2m")?;
        let wind = self.wind_speed_10m.context("Open-Meteo response is missing wind_speed_10m")?;
        let cloud = self.cloud_cover.context("Open-Meteo response is missing cloud_cover")?;

        let condition = self.weather_code.and_then(WeatherCondition::from_wmo_code);

        Ok(WeatherSnapshot::builder(temperature)
            .apparent_temperature_c(self.apparent_temperature)
            .precipitation_probability_pct(self.precipitation_probability.unwrap_or(0.0))
            .precipitation(PrecipitationBreakdown {
                rain: self.rain.unwrap_or(0.0),
                showers: self.showers.unwrap_or(0.0),
                snowfall: self.snowfall.unwrap_or(0.0),
                other: self.precipitation.unwrap_or(0.0),
            })
            .wind_speed_kph(wind)
            .wind_gust_kph(self.wind_gusts_10m)
            .cloud_cover_pct(cloud)
            .condition(condition)
            .weather_code(self.weather_code)
            .humidity_pct(self.relative_humidity_2m)
            .is_daytime(self.is_day.map(|d| d != 0))
            .build())
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    #[serde(flatten)]
    values: OmReading,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
    hourly: Option<OmHourly>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    apparent_temperature: Vec<Option<f64>>,
    precipitation_probability: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    rain: Vec<Option<f64>>,
    showers: Vec<Option<f64>>,
    snowfall: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
    cloud_cover: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_gusts_10m: Vec<Option<f64>>,
    is_day: Vec<Option<u8>>,
}

impl OmHourly {
    fn reading_at(&self, idx: usize) -> OmReading {
        OmReading {
            temperature_2m: value_at(&self.temperature_2m, idx),
            relative_humidity_2m: value_at(&self.relative_humidity_2m, idx),
            apparent_temperature: value_at(&self.apparent_temperature, idx),
            precipitation_probability: value_at(&self.precipitation_probability, idx),
            precipitation: value_at(&self.precipitation, idx),
            rain: value_at(&self.rain, idx),
            showers: value_at(&self.showers, idx),
            snowfall: value_at(&self.snowfall, idx),
            weather_code: value_at(&self.weather_code, idx),
            cloud_cover: value_at(&self.cloud_cover, idx),
            wind_speed_10m: value_at(&self.wind_speed_10m, idx),
            wind_gusts_10m: value_at(&self.wind_gusts_10m, idx),
            is_day: value_at(&self.is_day, idx),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmHourlyResponse {
    hourly: Option<OmHourly>,
}

fn value_at<T: Copy>(series: &[Option<T>], idx: usize) -> Option<T> {
    series.get(idx).copied().flatten()
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .with_context(|| format!("Invalid Open-Meteo time format: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn reading_requires_temperature_wind_and_cloud() {
        let reading = OmReading {
            temperature_2m: Some(20.0),
            wind_speed_10m: Some(5.0),
            ..OmReading::default()
        };

        let err = reading.into_snapshot().unwrap_err();
        assert!(err.to_string().contains("cloud_cover"));
    }

    #[test]
    fn missing_precipitation_is_zero() {
        let reading = OmReading {
            temperature_2m: Some(20.0),
            wind_speed_10m: Some(5.0),
            cloud_cover: Some(40.0),
            weather_code: Some(61),
            ..OmReading::default()
        };

        let snapshot = reading.into_snapshot().expect("valid reading");
        assert_eq!(snapshot.precipitation_mm(), 0.0);
        assert_eq!(snapshot.precipitation_probability_pct(), 0.0);
        assert_eq!(snapshot.condition(), Some(WeatherCondition::Rain));
        assert_eq!(snapshot.apparent_temperature_c(), None);
    }

    #[test]
    fn hourly_nulls_and_short_series_read_as_absent() {
        let hourly: OmHourly = serde_json::from_str(
            r#"{"time": ["2025-10-05T00:00", "2025-10-05T01:00"],
                "temperature_2m": [10.0, null],
                "rain": [0.2]}"#,
        )
        .expect("valid hourly block");

        assert_eq!(hourly.reading_at(0).temperature_2m, Some(10.0));
        assert_eq!(hourly.reading_at(1).temperature_2m, None);
        assert_eq!(hourly.reading_at(1).rain, None);
    }

    #[test]
    fn parses_open_meteo_time() {
        let dt = parse_time("2025-10-05T14:00").expect("valid time");
        assert_eq!(dt.hour(), 14);
        assert!(parse_time("2025-10-05 14:00").is_err());
    }
}
