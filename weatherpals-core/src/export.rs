//! Analysis reports as nested JSON or flattened CSV.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    activities::{Activity, Recommendations},
    describe::{cloud_description, precipitation_description, wind_description},
    event::EventKind,
    model::{PrecipitationBreakdown, WeatherSnapshot},
    request::AnalysisRequest,
    scorer::{Assessment, BASE_SCORE, Level},
};

pub const EXPORTED_FROM: &str = "WeatherPals";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub event: EventSection,
    pub location: LocationSection,
    pub weather_conditions: ConditionsSection,
    pub assessment: AssessmentSection,
    pub recommendations: Vec<RecommendationEntry>,
    #[serde(default)]
    pub activities: Recommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub exported_from: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSection {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub type_name: String,
    pub date_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSection {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsSection {
    pub temperature: TemperatureSection,
    pub precipitation: PrecipitationSection,
    pub wind: WindSection,
    pub cloud_cover: CloudSection,
    pub weather_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSection {
    pub actual: i64,
    pub feels_like: Option<i64>,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationSection {
    pub probability: i64,
    pub amount: f64,
    pub unit: String,
    pub description: String,
    pub breakdown: PrecipitationBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSection {
    pub speed: i64,
    pub gusts: Option<i64>,
    pub unit: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSection {
    pub percentage: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSection {
    pub level: Level,
    pub score: i32,
    pub max_score: i32,
    pub title: String,
    pub summary: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl AnalysisReport {
    pub fn new(
        request: &AnalysisRequest,
        snapshot: &WeatherSnapshot,
        assessment: &Assessment,
        activities: Recommendations,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let location = &request.location;

        Self {
            metadata: ReportMetadata {
                generated_at,
                exported_from: EXPORTED_FROM.to_string(),
            },
            event: EventSection {
                kind: request.event,
                type_name: request.event.display_name().to_string(),
                date_time: request.target,
            },
            location: LocationSection {
                name: location.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                latitude: location.latitude,
                longitude: location.longitude,
                coordinates: location.coordinates(),
            },
            weather_conditions: ConditionsSection {
                temperature: TemperatureSection {
                    actual: round(snapshot.temperature_c()),
                    feels_like: snapshot.apparent_temperature_c().map(round),
                    unit: "°C".to_string(),
                },
                precipitation: PrecipitationSection {
                    probability: round(snapshot.precipitation_probability_pct()),
                    amount: (snapshot.precipitation_mm() * 100.0).round() / 100.0,
                    unit: "mm".to_string(),
                    description: precipitation_description(snapshot),
                    breakdown: snapshot.precipitation(),
                },
                wind: WindSection {
                    speed: round(snapshot.wind_speed_kph()),
                    gusts: snapshot.wind_gust_kph().map(round),
                    unit: "km/h".to_string(),
                    description: wind_description(snapshot.wind_speed_kph()).to_string(),
                },
                cloud_cover: CloudSection {
                    percentage: round(snapshot.cloud_cover_pct()),
                    description: cloud_description(snapshot.cloud_cover_pct()).to_string(),
                },
                weather_code: snapshot.weather_code(),
            },
            assessment: AssessmentSection {
                level: assessment.level,
                score: assessment.score,
                max_score: BASE_SCORE,
                title: assessment.title.clone(),
                summary: assessment.summary.clone(),
                details: assessment.details.clone(),
            },
            recommendations: assessment
                .advice
                .iter()
                .map(|item| RecommendationEntry {
                    icon: item.icon.clone(),
                    title: item.title.clone(),
                    description: item.text.clone(),
                })
                .collect(),
            activities,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse report JSON")
    }

    /// Flattened key/value rows grouped under section headings.
    pub fn to_csv(&self) -> String {
        let conditions = &self.weather_conditions;
        let assessment = &self.assessment;

        let mut rows: Vec<Vec<String>> = vec![
            row(["Weather Analysis Report"]),
            row(["Generated on".to_string(), self.metadata.generated_at.to_rfc3339()]),
            Vec::new(),
            row(["Event Information"]),
            row(["Event Type", self.event.type_name.as_str()]),
            row(["Location".to_string(), self.location_label()]),
            row([
                "Date & Time".to_string(),
                self.event.date_time.format("%A, %B %-d, %Y %H:%M").to_string(),
            ]),
            Vec::new(),
            row(["Weather Conditions"]),
            row(["Temperature".to_string(), format!("{}°C", conditions.temperature.actual)]),
            row(["Feels Like".to_string(), optional(conditions.temperature.feels_like, "°C")]),
            row([
                "Precipitation Probability".to_string(),
                format!("{}%", conditions.precipitation.probability),
            ]),
            row([
                "Precipitation Amount".to_string(),
                format!("{:.2} mm", conditions.precipitation.amount),
            ]),
            row(["Precipitation Outlook", conditions.precipitation.description.as_str()]),
            row(["Wind Speed".to_string(), format!("{} km/h", conditions.wind.speed)]),
            row(["Wind Gusts".to_string(), optional(conditions.wind.gusts, " km/h")]),
            row(["Cloud Cover".to_string(), format!("{}%", conditions.cloud_cover.percentage)]),
            row(["Weather Code".to_string(), optional(conditions.weather_code, "")]),
            Vec::new(),
            row(["Overall Assessment"]),
            row(["Recommendation Level".to_string(), assessment.level.as_str().to_uppercase()]),
            row(["Score".to_string(), format!("{}/{}", assessment.score, assessment.max_score)]),
            row(["Title", assessment.title.as_str()]),
            row(["Summary", assessment.summary.as_str()]),
            row(["Details", assessment.details.as_str()]),
            Vec::new(),
            row(["Detailed Recommendations"]),
        ];

        for (index, item) in self.recommendations.iter().enumerate() {
            rows.push(row([format!("{}. {}", index + 1, item.title), item.description.clone()]));
        }

        rows.push(Vec::new());
        rows.push(row(["Suggested Activities"]));
        for (category, list) in [
            ("Outdoor", &self.activities.outdoor),
            ("Indoor", &self.activities.indoor),
            ("Sports", &self.activities.sports),
        ] {
            rows.push(row([category.to_string(), activity_names(list)]));
        }

        let mut csv = String::new();
        for row in rows {
            let line = row.iter().map(|field| escape_csv(field)).collect::<Vec<_>>().join(",");
            csv.push_str(&line);
            csv.push('\n');
        }

        csv
    }

    fn location_label(&self) -> String {
        if self.location.name == "Unknown" {
            self.location.coordinates.clone()
        } else {
            self.location.name.clone()
        }
    }
}

fn row<const N: usize, S: Into<String>>(cells: [S; N]) -> Vec<String> {
    cells.into_iter().map(Into::into).collect()
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

fn optional<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map(|v| format!("{v}{unit}")).unwrap_or_else(|| "n/a".to_string())
}

fn activity_names(list: &[Activity]) -> String {
    if list.is_empty() {
        return "None".to_string();
    }
    list.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join("; ")
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
