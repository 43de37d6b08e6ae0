use std::fmt::Write as _;

use weatherpals_core::{
    Activity, AnalysisRequest, Assessment, Recommendations, WeatherSnapshot,
    describe::{cloud_description, precipitation_description, wind_description},
};

const DATE_FORMAT: &str = "%A, %B %-d, %Y at %H:%M";

/// Full terminal report for `weatherpals analyze`.
pub fn analysis(
    request: &AnalysisRequest,
    snapshot: &WeatherSnapshot,
    assessment: &Assessment,
    activities: &Recommendations,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} at {} on {}",
        request.event.display_name(),
        request.location,
        request.target.format(DATE_FORMAT),
    );
    out.push('\n');
    out.push_str(&conditions(snapshot));
    out.push('\n');

    let _ = writeln!(
        out,
        "{} {}  (score {}/100)",
        assessment.icon, assessment.title, assessment.score
    );
    let _ = writeln!(out, "{}", assessment.summary);
    let _ = writeln!(out, "{}", assessment.details);
    out.push('\n');

    for item in &assessment.advice {
        let _ = writeln!(out, "  {} {}", item.icon, item.title);
        let _ = writeln!(out, "     {}", item.text);
    }
    out.push('\n');

    out.push_str(&activity_list(activities));
    out
}

/// Terminal listing for `weatherpals activities`.
pub fn activities_only(
    location: &str,
    snapshot: &WeatherSnapshot,
    activities: &Recommendations,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Activities for {location}");
    out.push('\n');
    out.push_str(&conditions(snapshot));
    out.push('\n');
    out.push_str(&activity_list(activities));
    out
}

fn conditions(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();

    let feels = snapshot
        .apparent_temperature_c()
        .map(|t| format!(" (feels like {}°C)", t.round()))
        .unwrap_or_default();
    let _ = writeln!(out, "  Temperature    {}°C{feels}", snapshot.temperature_c().round());

    let _ = writeln!(
        out,
        "  Precipitation  {}%  {}",
        snapshot.precipitation_probability_pct().round(),
        precipitation_description(snapshot),
    );
    let _ = writeln!(
        out,
        "  Wind           {} km/h  {}",
        snapshot.wind_speed_kph().round(),
        wind_description(snapshot.wind_speed_kph()),
    );
    let _ = writeln!(
        out,
        "  Cloud cover    {}%  {}",
        snapshot.cloud_cover_pct().round(),
        cloud_description(snapshot.cloud_cover_pct()),
    );

    if let Some(condition) = snapshot.condition() {
        let _ = writeln!(out, "  Sky            {condition}");
    }

    out
}

fn activity_list(activities: &Recommendations) -> String {
    let mut out = String::new();

    for (heading, list, empty) in [
        ("Outdoor", &activities.outdoor, "No outdoor activities recommended for these conditions."),
        ("Indoor", &activities.indoor, "No indoor activities needed, enjoy the outdoors!"),
        ("Sports", &activities.sports, "No sports activities recommended for these conditions."),
    ] {
        let _ = writeln!(out, "{heading}:");
        if list.is_empty() {
            let _ = writeln!(out, "  {empty}");
        }
        for activity in list {
            out.push_str(&activity_line(activity));
        }
    }

    out
}

fn activity_line(activity: &Activity) -> String {
    format!(
        "  {} {} - {} ({}, {})\n",
        activity.icon, activity.name, activity.description, activity.intensity, activity.duration
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weatherpals_core::{EventKind, Location, WeatherCondition, recommend, score};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot::builder(20.4)
            .apparent_temperature_c(Some(19.6))
            .wind_speed_kph(5.0)
            .cloud_cover_pct(10.0)
            .condition(Some(WeatherCondition::Clear))
            .build()
    }

    #[test]
    fn analysis_includes_headline_and_advice() {
        let target = NaiveDate::from_ymd_opt(2025, 10, 5)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid datetime");
        let request = AnalysisRequest::new(
            Location::new(Some("Manama".into()), 26.22, 50.58),
            EventKind::Picnic,
            target,
        );
        let snapshot = snapshot();
        let assessment = score(&snapshot, request.event);

        let text = analysis(&request, &snapshot, &assessment, &recommend(&snapshot));

        assert!(text.starts_with("Picnic at Manama on Sunday, October 5, 2025 at 12:00\n"));
        assert!(text.contains("feels like 20°C"));
        assert!(text.contains("Excellent Conditions!  (score 100/100)"));
        assert!(text.contains("Perfect Temperature"));
        assert!(text.contains("Hiking - Perfect temperature"));
    }

    #[test]
    fn empty_categories_get_placeholder() {
        let snapshot = snapshot();
        let text = activities_only("Manama", &snapshot, &recommend(&snapshot));

        assert!(text.contains("No indoor activities needed"));
    }
}
