//! Short phrases shown next to raw readings.

use crate::model::WeatherSnapshot;

pub fn wind_description(speed_kph: f64) -> &'static str {
    match speed_kph {
        s if s < 5.0 => "Calm",
        s if s < 12.0 => "Light breeze",
        s if s < 20.0 => "Moderate",
        s if s < 30.0 => "Strong",
        s if s < 40.0 => "Very strong",
        _ => "Dangerous",
    }
}

pub fn cloud_description(cover_pct: f64) -> &'static str {
    match cover_pct {
        c if c < 20.0 => "Clear skies",
        c if c < 50.0 => "Partly cloudy",
        c if c < 80.0 => "Mostly cloudy",
        _ => "Overcast",
    }
}

pub fn precipitation_description(snapshot: &WeatherSnapshot) -> String {
    let prob = snapshot.precipitation_probability_pct();
    let total = snapshot.precipitation_mm();

    if snapshot.snowfall_mm() > 0.1 {
        let likelihood = if prob > 70.0 { "likely" } else { "possible" };
        return format!("Snow {likelihood} ({total:.1} mm, {prob}% chance)");
    }

    if prob > 70.0 {
        let kind = if total > 2.0 {
            "Heavy rain likely"
        } else if total > 0.5 {
            "Rain expected"
        } else {
            "Light rain likely"
        };
        format!("{kind} ({total:.1} mm)")
    } else if prob > 40.0 {
        if total > 0.1 {
            format!("Rain possible ({total:.1} mm, {prob}% chance)")
        } else {
            format!("{prob}% chance of rain")
        }
    } else if prob > 20.0 {
        format!("Slight rain chance ({prob}%)")
    } else if total > 0.1 {
        format!("Trace precipitation ({total:.1} mm)")
    } else if prob > 0.0 {
        format!("Minimal rain chance ({prob}%)")
    } else {
        "No precipitation expected".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrecipitationBreakdown;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "Calm")]
    #[case(5.0, "Light breeze")]
    #[case(12.0, "Moderate")]
    #[case(20.0, "Strong")]
    #[case(30.0, "Very strong")]
    #[case(40.0, "Dangerous")]
    fn wind_phrases(#[case] speed: f64, #[case] expected: &str) {
        assert_eq!(wind_description(speed), expected);
    }

    #[rstest]
    #[case(10.0, "Clear skies")]
    #[case(20.0, "Partly cloudy")]
    #[case(50.0, "Mostly cloudy")]
    #[case(80.0, "Overcast")]
    fn cloud_phrases(#[case] cover: f64, #[case] expected: &str) {
        assert_eq!(cloud_description(cover), expected);
    }

    fn snapshot(prob: f64, rain: f64, snowfall: f64) -> WeatherSnapshot {
        WeatherSnapshot::builder(5.0)
            .precipitation_probability_pct(prob)
            .precipitation(PrecipitationBreakdown { rain, snowfall, ..Default::default() })
            .build()
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0, "No precipitation expected")]
    #[case(10.0, 0.0, 0.0, "Minimal rain chance (10%)")]
    #[case(0.0, 0.3, 0.0, "Trace precipitation (0.3 mm)")]
    #[case(25.0, 0.0, 0.0, "Slight rain chance (25%)")]
    #[case(50.0, 0.0, 0.0, "50% chance of rain")]
    #[case(50.0, 0.4, 0.0, "Rain possible (0.4 mm, 50% chance)")]
    #[case(90.0, 3.0, 0.0, "Heavy rain likely (3.0 mm)")]
    #[case(90.0, 1.0, 0.0, "Rain expected (1.0 mm)")]
    #[case(90.0, 0.2, 0.0, "Light rain likely (0.2 mm)")]
    #[case(80.0, 0.0, 1.5, "Snow likely (1.5 mm, 80% chance)")]
    #[case(30.0, 0.5, 1.0, "Snow possible (1.5 mm, 30% chance)")]
    fn precipitation_phrases(
        #[case] prob: f64,
        #[case] rain: f64,
        #[case] snowfall: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(precipitation_description(&snapshot(prob, rain, snowfall)), expected);
    }
}
