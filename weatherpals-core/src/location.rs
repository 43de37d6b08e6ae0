use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::RequestError, provider::truncate_body};

pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: Option<String>, latitude: f64, longitude: f64) -> Self {
        Self { name, latitude, longitude }
    }

    /// `"26.2200°N, 50.5800°E"`
    pub fn coordinates(&self) -> String {
        format!("{:.4}°N, {:.4}°E", self.latitude, self.longitude)
    }

    /// The place name if known, otherwise the coordinates.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.coordinates())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Parse a `"lat, lng"` literal.
///
/// `Ok(None)` means the input does not look like coordinates at all and
/// should be geocoded instead.
pub fn parse_coordinates(input: &str) -> Result<Option<Location>, RequestError> {
    let Some((lat, lng)) = input.trim().split_once(',') else {
        return Ok(None);
    };

    let (Some(latitude), Some(longitude)) = (parse_decimal(lat), parse_decimal(lng)) else {
        return Ok(None);
    };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RequestError::InvalidCoordinates { latitude, longitude });
    }

    Ok(Some(Location::new(None, latitude, longitude)))
}

/// Optional minus, digits, optional fraction. No exponents, no `inf`.
fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if int.is_empty() || !digits(int) || !digits(frac) {
        return None;
    }

    s.parse().ok()
}

/// Place-name lookup backed by the Open-Meteo geocoding API.
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: String,
    http: Client,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_GEOCODING_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    /// First match for `query`, or [`RequestError::LocationNotFound`].
    pub async fn search(&self, query: &str) -> Result<Location> {
        debug!(query, url = %self.base_url, "geocoding location");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("name", query), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .context("Failed to send geocoding request")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeoResponse =
            serde_json::from_str(&body).context("Failed to parse geocoding JSON")?;

        let place = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| RequestError::LocationNotFound { query: query.to_string() })?;

        let name = [Some(place.name), place.admin1, place.country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Location::new(Some(name), place.latitude, place.longitude))
    }
}

/// Coordinates are parsed locally; anything else is geocoded.
pub async fn resolve_location(query: &str, geocoder: &Geocoder) -> Result<Location> {
    let query = query.trim();
    if query.is_empty() {
        return Err(RequestError::EmptyLocation.into());
    }

    match parse_coordinates(query)? {
        Some(location) => Ok(location),
        None => geocoder.search(query).await,
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoPlace>,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_literal() {
        let location = parse_coordinates("26.22, 50.58").expect("valid").expect("coordinates");
        assert_eq!(location.latitude, 26.22);
        assert_eq!(location.longitude, 50.58);
        assert_eq!(location.name, None);
    }

    #[test]
    fn parses_negative_and_integer_coordinates() {
        let location = parse_coordinates("-33,151").expect("valid").expect("coordinates");
        assert_eq!(location.latitude, -33.0);
        assert_eq!(location.longitude, 151.0);
    }

    #[test]
    fn place_names_are_not_coordinates() {
        assert_eq!(parse_coordinates("Paris, France"), Ok(None));
        assert_eq!(parse_coordinates("Manama"), Ok(None));
        assert_eq!(parse_coordinates("1e3, 5"), Ok(None));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let err = parse_coordinates("91, 10").unwrap_err();
        assert_eq!(err, RequestError::InvalidCoordinates { latitude: 91.0, longitude: 10.0 });

        assert!(parse_coordinates("10, -180.5").is_err());
    }

    #[test]
    fn display_name_falls_back_to_coordinates() {
        let unnamed = Location::new(None, 26.22, 50.58);
        assert_eq!(unnamed.display_name(), "26.2200°N, 50.5800°E");

        let named = Location::new(Some("Manama, Bahrain".into()), 26.22, 50.58);
        assert_eq!(named.to_string(), "Manama, Bahrain");
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_lookup() {
        let geocoder = Geocoder::with_base_url("http://127.0.0.1:9");
        let err = resolve_location("   ", &geocoder).await.unwrap_err();
        assert_eq!(err.downcast_ref::<RequestError>(), Some(&RequestError::EmptyLocation));
    }
}
