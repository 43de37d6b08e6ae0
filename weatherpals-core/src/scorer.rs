//! Rule-based event suitability scoring.
//!
//! A score starts at 100 and four independent passes (temperature,
//! precipitation, wind, cloud cover) subtract fixed penalties and collect
//! advice. Event-specific advice is appended afterwards without touching the
//! score. The score is not clamped and may go below zero.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{event::EventKind, model::WeatherSnapshot};

pub const BASE_SCORE: i32 = 100;

/// One piece of human-readable guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceItem {
    pub icon: String,
    pub title: String,
    pub text: String,
}

impl AdviceItem {
    fn new(icon: &str, title: &str, text: impl Into<String>) -> Self {
        Self { icon: icon.to_string(), title: title.to_string(), text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Level {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 80 => Level::Excellent,
            s if s >= 60 => Level::Good,
            s if s >= 40 => Level::Fair,
            _ => Level::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Excellent => "excellent",
            Level::Good => "good",
            Level::Fair => "fair",
            Level::Poor => "poor",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Level::Excellent => "🎉",
            Level::Good => "👍",
            Level::Fair => "⚠️",
            Level::Poor => "❌",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Level::Excellent => "Excellent Conditions!",
            Level::Good => "Good Conditions",
            Level::Fair => "Fair Conditions",
            Level::Poor => "Challenging Conditions",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scorer's verdict for one snapshot and event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub level: Level,
    pub icon: String,
    pub title: String,
    pub summary: String,
    pub details: String,
    pub advice: Vec<AdviceItem>,
    pub score: i32,
}

/// Result of a single scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PassOutcome {
    pub penalty: i32,
    pub issue: Option<&'static str>,
    pub advice: Option<AdviceItem>,
}

impl PassOutcome {
    fn none() -> Self {
        Self { penalty: 0, issue: None, advice: None }
    }

    fn new(penalty: i32, issue: Option<&'static str>, advice: AdviceItem) -> Self {
        Self { penalty, issue, advice: Some(advice) }
    }
}

/// Score `snapshot` for an event of the given kind.
pub fn score(snapshot: &WeatherSnapshot, event: EventKind) -> Assessment {
    let passes = [
        temperature_pass(snapshot.temperature_c()),
        precipitation_pass(snapshot.precipitation_mm(), snapshot.precipitation_probability_pct()),
        wind_pass(snapshot.wind_speed_kph()),
        cloud_pass(snapshot.cloud_cover_pct()),
    ];

    let mut score = BASE_SCORE;
    let mut issues = Vec::new();
    let mut advice = Vec::new();

    for pass in passes {
        score -= pass.penalty;
        issues.extend(pass.issue);
        advice.extend(pass.advice);
    }

    advice.extend(event_advice(event, snapshot));

    let level = Level::from_score(score);
    debug!(%event, score, %level, issues = ?issues, "scored snapshot");

    let name = event.display_name().to_lowercase();
    let joined = issues.join(", ");

    let (summary, details) = match level {
        Level::Excellent => (
            format!("Perfect weather for your {name}!"),
            "Weather conditions are ideal. Your event should go smoothly with minimal \
             weather-related concerns."
                .to_string(),
        ),
        Level::Good => (
            format!("Generally favorable weather for your {name}."),
            if issues.is_empty() {
                "Weather should be manageable with standard preparations.".to_string()
            } else {
                format!(
                    "Minor concerns: {joined}. With proper preparation, your event should \
                     proceed well."
                )
            },
        ),
        Level::Fair => (
            format!("Weather may present some challenges for your {name}."),
            format!("Concerns: {joined}. Extra precautions recommended. Have backup plans ready."),
        ),
        Level::Poor => (
            format!("Weather conditions are not ideal for your {name}."),
            format!(
                "Significant concerns: {joined}. Strongly consider rescheduling or moving \
                 indoors if possible."
            ),
        ),
    };

    Assessment {
        level,
        icon: level.icon().to_string(),
        title: level.title().to_string(),
        summary,
        details,
        advice,
        score,
    }
}

pub(crate) fn temperature_pass(temp: f64) -> PassOutcome {
    if temp < 0.0 {
        PassOutcome::new(
            75,
            Some("freezing temperatures"),
            AdviceItem::new(
                "❄️",
                "Freezing Conditions",
                "Extremely cold! Temperatures below freezing. Provide heated areas, warm \
                 clothing, hot beverages, and monitor for hypothermia risks.",
            ),
        )
    } else if temp <= 5.0 {
        PassOutcome::new(
            30,
            Some("very cold temperatures"),
            AdviceItem::new(
                "🧥",
                "Very Cold Weather",
                "Very cold conditions. Attendees should wear heavy winter clothing, and warm \
                 shelter should be available.",
            ),
        )
    } else if temp < 10.0 {
        PassOutcome::new(
            15,
            Some("cold temperatures"),
            AdviceItem::new(
                "🧥",
                "Cold Weather",
                "Cold temperatures. Attendees should dress warmly with jackets and layers.",
            ),
        )
    } else if temp < 18.0 {
        PassOutcome::new(
            5,
            None,
            AdviceItem::new(
                "🌡️",
                "Cool & Comfortable",
                "Cool but pleasant weather. Light jackets or sweaters recommended for comfort.",
            ),
        )
    } else if temp <= 25.0 {
        PassOutcome::new(
            0,
            None,
            AdviceItem::new(
                "✨",
                "Perfect Temperature",
                "Ideal temperature range! Comfortable conditions for outdoor activities.",
            ),
        )
    } else if temp <= 30.0 {
        PassOutcome::new(
            5,
            None,
            AdviceItem::new(
                "☀️",
                "Warm Weather",
                "Warm and pleasant. Ensure water is available and consider providing shaded \
                 areas.",
            ),
        )
    } else if temp <= 36.0 {
        PassOutcome::new(
            10,
            Some("hot temperatures"),
            AdviceItem::new(
                "🌡️",
                "Hot Weather",
                "Hot conditions. Provide plenty of water, shade areas, and encourage sun \
                 protection.",
            ),
        )
    } else if temp <= 39.0 {
        PassOutcome::new(
            40,
            Some("very hot temperatures"),
            AdviceItem::new(
                "🔥",
                "Very Hot Weather",
                "Very hot conditions! Essential to have abundant water, cooling stations, \
                 shaded areas, and medical support. Monitor attendees for heat exhaustion.",
            ),
        )
    } else if temp <= 40.0 {
        PassOutcome::new(
            60,
            Some("extreme heat"),
            AdviceItem::new(
                "🔥",
                "Extreme Heat",
                "Dangerously hot! Strongly consider rescheduling. If proceeding, mandatory \
                 cooling stations, medical staff, and frequent hydration breaks required.",
            ),
        )
    } else if temp > 40.0 {
        PassOutcome::new(
            70,
            Some("dangerously hot temperatures"),
            AdviceItem::new(
                "⚠️",
                "Dangerous Heat",
                "Extreme heat danger! Temperatures above 40°C pose serious health risks. \
                 Strongly recommend postponing or moving event indoors with air conditioning.",
            ),
        )
    } else {
        // NaN matches no band.
        PassOutcome::none()
    }
}

pub(crate) fn precipitation_pass(amount_mm: f64, probability: f64) -> PassOutcome {
    let amount = amount_mm.max(0.0);

    if amount > 5.0 || probability > 80.0 {
        PassOutcome::new(
            80,
            Some("heavy rain"),
            AdviceItem::new(
                "☔",
                "Heavy Rain Expected",
                format!(
                    "Significant rainfall expected ({probability}% chance). Strong \
                     recommendation to have covered areas, provide rain gear, or consider \
                     postponement."
                ),
            ),
        )
    } else if amount > 1.0 || probability > 60.0 {
        PassOutcome::new(
            60,
            Some("rain"),
            AdviceItem::new(
                "🌧️",
                "Rain Expected",
                format!(
                    "Rain is likely ({probability}% chance). Set up tents or covered areas, \
                     and inform attendees to bring umbrellas and waterproof clothing."
                ),
            ),
        )
    } else if amount > 0.1 || probability > 30.0 {
        PassOutcome::new(
            50,
            Some("light rain possible"),
            AdviceItem::new(
                "💧",
                "Rain Possible",
                format!(
                    "There's a {probability}% chance of rain. Have some covered areas ready and \
                     suggest attendees bring light rain gear just in case."
                ),
            ),
        )
    } else if probability > 15.0 {
        PassOutcome::new(
            30,
            None,
            AdviceItem::new(
                "🌤️",
                "Slight Rain Chance",
                format!(
                    "Low chance of rain ({probability}%). Weather should be mostly dry, but keep \
                     an eye on conditions."
                ),
            ),
        )
    } else {
        PassOutcome::none()
    }
}

pub(crate) fn wind_pass(wind_kph: f64) -> PassOutcome {
    if wind_kph > 40.0 {
        PassOutcome::new(
            35,
            Some("very strong winds"),
            AdviceItem::new(
                "💨",
                "Very Strong Winds",
                "Dangerous wind conditions! Secure all equipment, decorations, and structures. \
                 Consider postponing outdoor activities.",
            ),
        )
    } else if wind_kph > 25.0 {
        PassOutcome::new(
            20,
            Some("strong winds"),
            AdviceItem::new(
                "🌬️",
                "Strong Winds",
                "Windy conditions. Secure tents, decorations, and loose items. Avoid large \
                 inflatables or unstable structures.",
            ),
        )
    } else if wind_kph > 15.0 {
        PassOutcome::new(
            10,
            Some("moderate winds"),
            AdviceItem::new(
                "🍃",
                "Moderate Winds",
                "Moderate winds expected. Secure light decorations and ensure structures are \
                 properly anchored.",
            ),
        )
    } else {
        PassOutcome::none()
    }
}

/// Informational only; never changes the score.
pub(crate) fn cloud_pass(cloud_pct: f64) -> PassOutcome {
    if cloud_pct > 80.0 {
        PassOutcome::new(
            0,
            None,
            AdviceItem::new(
                "☁️",
                "Overcast",
                "Mostly cloudy skies. Good for outdoor photos without harsh shadows, but \
                 natural lighting will be limited.",
            ),
        )
    } else if cloud_pct < 30.0 {
        PassOutcome::new(
            0,
            None,
            AdviceItem::new(
                "☀️",
                "Clear Skies",
                "Mostly clear skies! Great visibility and natural lighting. Remember sun \
                 protection for attendees.",
            ),
        )
    } else {
        PassOutcome::none()
    }
}

/// Extra advice for a particular kind of event.
pub(crate) fn event_advice(event: EventKind, snapshot: &WeatherSnapshot) -> Vec<AdviceItem> {
    let temp = snapshot.temperature_c();
    let amount = snapshot.precipitation_mm();
    let prob = snapshot.precipitation_probability_pct();
    let wind = snapshot.wind_speed_kph();

    let mut advice = Vec::new();

    match event {
        EventKind::Parade => {
            if amount > 0.5 || prob > 40.0 {
                advice.push(AdviceItem::new(
                    "🎊",
                    "Parade Specific",
                    format!(
                        "Rain may affect floats and costumes ({prob}% chance). Consider \
                         waterproof coverings for electronics and decorations."
                    ),
                ));
            }
            if wind > 20.0 {
                advice.push(AdviceItem::new(
                    "🎈",
                    "Parade Specific",
                    "High winds can make balloons and banners difficult to control. Have extra \
                     handlers ready.",
                ));
            }
        }
        EventKind::Concert => {
            if temp > 25.0 {
                advice.push(AdviceItem::new(
                    "🎵",
                    "Concert Specific",
                    "Hot weather and crowds can be challenging. Ensure adequate water stations \
                     and medical staff presence.",
                ));
            }
            if amount > 0.0 || prob > 30.0 {
                advice.push(AdviceItem::new(
                    "🎸",
                    "Concert Specific",
                    format!(
                        "Protect all electrical equipment ({prob}% rain chance). Have tarps and \
                         covers ready for instruments and sound systems."
                    ),
                ));
            }
        }
        EventKind::Sports => {
            if temp > 28.0 {
                advice.push(AdviceItem::new(
                    "⚽",
                    "Sports Specific",
                    "High heat increases risk of heat exhaustion. Schedule water breaks and \
                     have cooling stations available.",
                ));
            }
            if amount > 2.0 {
                advice.push(AdviceItem::new(
                    "🏃",
                    "Sports Specific",
                    "Wet conditions create slippery surfaces. Consider field conditions and \
                     player safety carefully.",
                ));
            }
        }
        EventKind::Picnic => {
            if wind > 15.0 {
                advice.push(AdviceItem::new(
                    "🧺",
                    "Picnic Specific",
                    "Wind can scatter lightweight items. Bring weights for tablecloths and \
                     secure loose items.",
                ));
            }
            if temp < 12.0 {
                advice.push(AdviceItem::new(
                    "🍽️",
                    "Picnic Specific",
                    "Cold weather affects food temperature. Consider bringing thermoses with \
                     hot drinks and warm meals.",
                ));
            }
        }
        EventKind::Gardening => {
            if amount > 0.1 || prob > 30.0 {
                advice.push(AdviceItem::new(
                    "🌱",
                    "Gardening Specific",
                    format!(
                        "Rain can make soil muddy and difficult to work with ({prob}% rain \
                         chance). Consider postponing or focus on covered tasks."
                    ),
                ));
            }
            if wind > 20.0 {
                advice.push(AdviceItem::new(
                    "🌿",
                    "Gardening Specific",
                    "Strong winds can damage plants and make it difficult to work. Secure loose \
                     items and consider indoor gardening tasks.",
                ));
            }
            if temp > 30.0 {
                advice.push(AdviceItem::new(
                    "☀️",
                    "Gardening Specific",
                    "Very hot weather - schedule gardening for early morning or evening. Stay \
                     hydrated and wear sun protection.",
                ));
            }
        }
        EventKind::Festival => {
            if temp > 27.0 {
                advice.push(AdviceItem::new(
                    "🎪",
                    "Festival Specific",
                    "Hot weather and long duration require multiple water stations, first aid \
                     tents, and shaded rest areas.",
                ));
            }
            if wind > 25.0 || amount > 1.0 || prob > 50.0 {
                advice.push(AdviceItem::new(
                    "🎡",
                    "Festival Specific",
                    format!(
                        "Weather may affect vendor tents and attractions ({prob}% rain chance). \
                         Ensure all structures are properly secured and certified."
                    ),
                ));
            }
        }
        EventKind::Generic => {}
    }

    advice
}
