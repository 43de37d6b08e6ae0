use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{error::RequestError, event::EventKind, location::Location, model::WeatherRequest};

/// How many days ahead a forecast may be requested.
pub const DEFAULT_HORIZON_DAYS: u32 = 15;

/// Inputs for one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub location: Location,
    pub event: EventKind,
    /// Local time at the location.
    pub target: NaiveDateTime,
}

impl AnalysisRequest {
    pub fn new(location: Location, event: EventKind, target: NaiveDateTime) -> Self {
        Self { location, event, target }
    }

    /// Reject targets before `today` or past the forecast horizon.
    pub fn validate(&self, today: NaiveDate, horizon_days: u32) -> Result<(), RequestError> {
        validate_target(self.target, today, horizon_days)
    }

    pub fn weather_request(&self) -> WeatherRequest {
        WeatherRequest {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            when: Some(self.target),
        }
    }
}

pub fn validate_target(
    target: NaiveDateTime,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<(), RequestError> {
    let date = target.date();
    if date < today {
        return Err(RequestError::PastDate { date });
    }

    let latest =
        today.checked_add_days(Days::new(u64::from(horizon_days))).unwrap_or(NaiveDate::MAX);
    if date > latest {
        return Err(RequestError::BeyondHorizon { horizon_days, latest });
    }

    Ok(())
}

/// Tomorrow at noon, the default target when none is given.
pub fn default_target(today: NaiveDate) -> NaiveDateTime {
    let tomorrow = today.succ_opt().unwrap_or(today);
    tomorrow.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at_noon(day: NaiveDate) -> NaiveDateTime {
        day.and_hms_opt(12, 0, 0).expect("valid time")
    }

    #[test]
    fn today_and_horizon_edge_are_accepted() {
        let today = date(2025, 10, 4);
        assert!(validate_target(at_noon(today), today, 15).is_ok());
        assert!(validate_target(at_noon(date(2025, 10, 19)), today, 15).is_ok());
    }

    #[test]
    fn past_date_is_rejected() {
        let today = date(2025, 10, 4);
        let err = validate_target(at_noon(date(2025, 10, 3)), today, 15).unwrap_err();
        assert_eq!(err, RequestError::PastDate { date: date(2025, 10, 3) });
    }

    #[test]
    fn date_beyond_horizon_is_rejected() {
        let today = date(2025, 10, 4);
        let err = validate_target(at_noon(date(2025, 10, 20)), today, 15).unwrap_err();

        assert_eq!(
            err,
            RequestError::BeyondHorizon { horizon_days: 15, latest: date(2025, 10, 19) }
        );
        assert!(err.to_string().contains("up to 15 days"));
    }

    #[test]
    fn default_target_is_tomorrow_noon() {
        assert_eq!(default_target(date(2025, 12, 31)), at_noon(date(2026, 1, 1)));
    }

    #[test]
    fn analysis_request_builds_weather_request() {
        let location = Location::new(Some("Manama".into()), 26.22, 50.58);
        let target = at_noon(date(2025, 10, 5));
        let request = AnalysisRequest::new(location, EventKind::Festival, target);

        let weather = request.weather_request();
        assert_eq!(weather.latitude, 26.22);
        assert_eq!(weather.longitude, 50.58);
        assert_eq!(weather.when, Some(target));
    }

    #[test]
    fn analysis_request_validates_its_target() {
        let location = Location::new(None, 26.22, 50.58);
        let target = at_noon(date(2025, 10, 10));
        let request = AnalysisRequest::new(location, EventKind::Parade, target);

        assert!(request.validate(date(2025, 10, 4), 15).is_ok());
        assert!(matches!(
            request.validate(date(2025, 10, 4), 3),
            Err(RequestError::BeyondHorizon { horizon_days: 3, .. })
        ));
    }
}
