use crate::{
    Config, WeatherRequest, WeatherResponse,
    provider::{openmeteo::OpenMeteoProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use std::{convert::TryFrom, fmt::Debug};

pub mod openmeteo;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "openmeteo",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::WeatherApi]
    }

    /// Open-Meteo is free and keyless.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::WeatherApi)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openmeteo, weatherapi."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn get_weather(&self, request: &WeatherRequest) -> anyhow::Result<WeatherResponse>;
}

/// Which upstream shape a request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateRequest {
    Current,
    Hourly(NaiveDateTime),
}

/// Only an absent target means current conditions. An explicit target is
/// local to the location, so it always selects the matching forecast hour.
pub(crate) fn classify_date(when: Option<NaiveDateTime>) -> DateRequest {
    match when {
        None => DateRequest::Current,
        Some(dt) => DateRequest::Hourly(dt),
    }
}

pub(crate) fn same_hour(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour()
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let base_url = config.provider_base_url(id).map(str::to_owned);

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenMeteo => {
            let provider = OpenMeteoProvider::new();
            Box::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            })
        }
        ProviderId::WeatherApi => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `weatherpals configure {id}` and enter your API key."
                )
            })?;
            let provider = WeatherApiProvider::new(api_key.to_owned());
            Box::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            })
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
