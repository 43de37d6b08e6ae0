use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    condition::WeatherCondition,
    model::{PrecipitationBreakdown, WeatherRequest, WeatherResponse, WeatherSnapshot},
    provider::{DateRequest, ProviderId, classify_date, same_hour, truncate_body},
};

use super::WeatherProvider;

pub const WEATHERAPI_BASE_URL: &str = "https://api.weatherapi.com/v1";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: WEATHERAPI_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        what: &str,
        extra: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, what, "requesting WeatherAPI.com");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(extra)
            .send()
            .await
            .with_context(|| format!("Failed to send request to WeatherAPI.com ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherAPI {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse WeatherAPI {what} JSON"))
    }

    async fn fetch_current(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        let parsed: WaResponse =
            self.fetch("current.json", "current", &[("q", coordinates(request))]).await?;

        let current = parsed.current;
        let observed_at = parse_time(&current.last_updated)?;

        let snapshot = WeatherSnapshot::builder(current.temp_c)
            .apparent_temperature_c(current.feelslike_c)
            .precipitation(PrecipitationBreakdown {
                other: current.precip_mm.unwrap_or(0.0),
                ..Default::default()
            })
            .wind_speed_kph(current.wind_kph)
            .wind_gust_kph(current.gust_kph)
            .cloud_cover_pct(current.cloud)
            .condition(WeatherCondition::from_weatherapi_code(current.condition.code))
            .weather_code(Some(current.condition.code))
            .humidity_pct(current.humidity)
            .is_daytime(current.is_day.map(|d| d != 0))
            .build();

        Ok(WeatherResponse { provider: ProviderId::WeatherApi.to_string(), observed_at, snapshot })
    }

    async fn fetch_hourly(
        &self,
        request: &WeatherRequest,
        when: NaiveDateTime,
    ) -> Result<WeatherResponse> {
        let query = [
            ("q", coordinates(request)),
            ("dt", when.date().format("%Y-%m-%d").to_string()),
            ("hour", when.hour().to_string()),
        ];

        let parsed: WaForecastResponse = self.fetch("forecast.json", "forecast", &query).await?;

        let day = parsed
            .forecast
            .forecastday
            .first()
            .ok_or_else(|| anyhow!("WeatherAPI response contained no forecastday data"))?;

        let (hour, observed_at) = day
            .hour
            .iter()
            .filter_map(|h| parse_time(&h.time).ok().map(|dt| (h, dt)))
            .find(|(_, dt)| same_hour(*dt, when))
            .ok_or_else(|| anyhow!("Could not find weather data for the selected time ({when})"))?;

        let probability =
            hour.chance_of_rain.unwrap_or(0.0).max(hour.chance_of_snow.unwrap_or(0.0));

        let snapshot = WeatherSnapshot::builder(hour.temp_c)
            .apparent_temperature_c(hour.feelslike_c)
            .precipitation_probability_pct(probability)
            .precipitation(PrecipitationBreakdown {
                snowfall: hour.snow_cm.unwrap_or(0.0) * 10.0,
                other: hour.precip_mm.unwrap_or(0.0),
                ..Default::default()
            })
            .wind_speed_kph(hour.wind_kph)
            .wind_gust_kph(hour.gust_kph)
            .cloud_cover_pct(hour.cloud)
            .condition(WeatherCondition::from_weatherapi_code(hour.condition.code))
            .weather_code(Some(hour.condition.code))
            .humidity_pct(hour.humidity)
            .is_daytime(hour.is_day.map(|d| d != 0))
            .build();

        Ok(WeatherResponse { provider: ProviderId::WeatherApi.to_string(), observed_at, snapshot })
    }
}

fn coordinates(request: &WeatherRequest) -> String {
    format!("{},{}", request.latitude, request.longitude)
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .with_context(|| format!("Invalid WeatherAPI time format: {raw}"))
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    code: i32,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    last_updated: String,
    temp_c: f64,
    feelslike_c: Option<f64>,
    humidity: Option<f64>,
    wind_kph: f64,
    gust_kph: Option<f64>,
    cloud: f64,
    precip_mm: Option<f64>,
    is_day: Option<u8>,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    feelslike_c: Option<f64>,
    humidity: Option<f64>,
    wind_kph: f64,
    gust_kph: Option<f64>,
    cloud: f64,
    precip_mm: Option<f64>,
    snow_cm: Option<f64>,
    chance_of_rain: Option<f64>,
    chance_of_snow: Option<f64>,
    is_day: Option<u8>,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        match classify_date(request.when) {
            DateRequest::Current => self.fetch_current(request).await,
            DateRequest::Hourly(dt) => self.fetch_hourly(request, dt).await,
        }
    }
}
