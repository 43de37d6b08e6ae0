use serde::{Deserialize, Serialize};

use crate::model::WeatherSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub icon: String,
    pub description: String,
    pub intensity: String,
    pub duration: String,
}

impl Activity {
    fn new(name: &str, icon: &str, description: &str, intensity: &str, duration: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            intensity: intensity.to_string(),
            duration: duration.to_string(),
        }
    }
}

/// Suggested activities, grouped by category in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub outdoor: Vec<Activity>,
    pub indoor: Vec<Activity>,
    pub sports: Vec<Activity>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.outdoor.is_empty() && self.indoor.is_empty() && self.sports.is_empty()
    }
}

pub fn recommend(snapshot: &WeatherSnapshot) -> Recommendations {
    Recommendations {
        outdoor: outdoor_activities(snapshot),
        indoor: indoor_activities(snapshot),
        sports: sports_activities(snapshot),
    }
}

fn outdoor_activities(snapshot: &WeatherSnapshot) -> Vec<Activity> {
    let temp = snapshot.temperature_c();
    let wind = snapshot.wind_speed_kph();
    let flags = snapshot.flags();

    let mut activities = Vec::new();

    if (18.0..=25.0).contains(&temp) && wind < 15.0 && !flags.raining {
        activities.push(Activity::new(
            "Hiking",
            "🏃‍♂️",
            "Perfect temperature and wind conditions for hiking",
            "Moderate",
            "2-4 hours",
        ));
    }

    if temp > 25.0 && !flags.raining && wind < 20.0 {
        activities.push(Activity::new(
            "Beach Visit",
            "🏖️",
            "Great weather for beach activities",
            "Light to Moderate",
            "3-6 hours",
        ));
    }

    if flags.cloudy && !flags.raining {
        activities.push(Activity::new(
            "Photography",
            "📸",
            "Perfect diffused light for outdoor photography",
            "Light",
            "1-3 hours",
        ));
    }

    activities
}

fn indoor_activities(snapshot: &WeatherSnapshot) -> Vec<Activity> {
    let temp = snapshot.temperature_c();

    if !(snapshot.flags().raining || temp < 10.0 || temp > 35.0) {
        return Vec::new();
    }

    vec![
        Activity::new(
            "Museum Visit",
            "🏛️",
            "Perfect day to explore local museums",
            "Light",
            "2-4 hours",
        ),
        Activity::new(
            "Indoor Workshop",
            "🎨",
            "Try an art or craft workshop",
            "Light",
            "1-3 hours",
        ),
    ]
}

fn sports_activities(snapshot: &WeatherSnapshot) -> Vec<Activity> {
    let temp = snapshot.temperature_c();
    let wind = snapshot.wind_speed_kph();
    let raining = snapshot.flags().raining;

    let mut activities = Vec::new();

    if (15.0..=28.0).contains(&temp) && !raining && wind < 20.0 {
        activities.push(Activity::new(
            "Tennis",
            "🎾",
            "Great conditions for tennis",
            "High",
            "1-2 hours",
        ));
        activities.push(Activity::new(
            "Cycling",
            "🚴‍♂️",
            "Perfect weather for a bike ride",
            "Moderate to High",
            "1-3 hours",
        ));
    }

    if temp > 25.0 && !raining && wind < 25.0 {
        activities.push(Activity::new(
            "Swimming",
            "🏊‍♂️",
            "Ideal temperature for swimming",
            "Moderate",
            "30-60 minutes",
        ));
    }

    activities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::WeatherCondition;

    fn snapshot(temp: f64, wind: f64, condition: Option<WeatherCondition>) -> WeatherSnapshot {
        WeatherSnapshot::builder(temp).wind_speed_kph(wind).condition(condition).build()
    }

    fn names(list: &[Activity]) -> Vec<&str> {
        list.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn sunny_mild_day_suggests_hiking() {
        let recs = recommend(&snapshot(20.0, 5.0, Some(WeatherCondition::Clear)));

        assert_eq!(names(&recs.outdoor), vec!["Hiking"]);
        assert!(recs.indoor.is_empty());
        assert_eq!(names(&recs.sports), vec!["Tennis", "Cycling"]);
    }

    #[test]
    fn cold_rain_moves_everything_indoors() {
        let recs = recommend(&snapshot(5.0, 5.0, Some(WeatherCondition::Rain)));

        assert!(recs.outdoor.is_empty());
        assert_eq!(names(&recs.indoor), vec!["Museum Visit", "Indoor Workshop"]);
        assert!(recs.sports.is_empty());
    }

    #[test]
    fn rain_blocks_hiking_even_in_ideal_temperature() {
        let recs = recommend(&snapshot(21.0, 5.0, Some(WeatherCondition::Drizzle)));

        assert!(!names(&recs.outdoor).contains(&"Hiking"));
        assert_eq!(names(&recs.indoor), vec!["Museum Visit", "Indoor Workshop"]);
    }

    #[test]
    fn hot_calm_day_suggests_beach_and_swimming() {
        let recs = recommend(&snapshot(30.0, 10.0, Some(WeatherCondition::Clear)));

        assert_eq!(names(&recs.outdoor), vec!["Beach Visit"]);
        assert_eq!(names(&recs.sports), vec!["Swimming"]);
    }

    #[test]
    fn overlapping_gates_keep_enumeration_order() {
        let recs = recommend(&snapshot(26.0, 10.0, Some(WeatherCondition::PartlyCloudy)));

        assert_eq!(names(&recs.outdoor), vec!["Beach Visit", "Photography"]);
        assert_eq!(names(&recs.sports), vec!["Tennis", "Cycling", "Swimming"]);
    }

    #[test]
    fn extreme_heat_recommends_indoor() {
        let recs = recommend(&snapshot(36.0, 30.0, None));
        assert_eq!(names(&recs.indoor), vec!["Museum Visit", "Indoor Workshop"]);
        assert!(recs.outdoor.is_empty());
        assert!(recs.sports.is_empty());
    }

    #[test]
    fn windy_mild_day_can_leave_every_category_empty() {
        let recs = recommend(&snapshot(12.0, 30.0, Some(WeatherCondition::Clear)));
        assert!(recs.is_empty());
    }
}
