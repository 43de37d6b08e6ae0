use serde::{Deserialize, Serialize};

/// Sky condition, mapped once from a provider's numeric weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Sleet,
    Snow,
    Thunderstorm,
}

/// Boolean view of a condition used by the activity rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionFlags {
    pub raining: bool,
    pub snowing: bool,
    pub clear: bool,
    pub cloudy: bool,
}

impl WeatherCondition {
    /// WMO weather interpretation code, as returned by Open-Meteo.
    pub fn from_wmo_code(code: i32) -> Option<Self> {
        use WeatherCondition::*;

        let condition = match code {
            0 => Clear,
            1 | 2 => PartlyCloudy,
            3 => Overcast,
            45 | 48 => Fog,
            51 | 53 | 55 => Drizzle,
            56 | 57 | 66 | 67 => FreezingRain,
            61 | 63 | 65 | 80..=82 => Rain,
            71 | 73 | 75 | 77 | 85 | 86 => Snow,
            95 | 96 | 99 => Thunderstorm,
            _ => return None,
        };

        Some(condition)
    }

    /// WeatherAPI.com condition code (1000..=1282).
    pub fn from_weatherapi_code(code: i32) -> Option<Self> {
        use WeatherCondition::*;

        let condition = match code {
            1000 => Clear,
            1003 => PartlyCloudy,
            1006 => Cloudy,
            1009 => Overcast,
            1030 | 1135 | 1147 => Fog,
            1063 | 1180..=1195 | 1240..=1246 => Rain,
            1066 | 1114 | 1117 | 1210..=1225 | 1255 | 1258 | 1279 | 1282 => Snow,
            1069 | 1204 | 1207 | 1237 | 1249 | 1252 | 1261 | 1264 => Sleet,
            1072 | 1168 | 1171 | 1198 | 1201 => FreezingRain,
            1150 | 1153 => Drizzle,
            1087 | 1273 | 1276 => Thunderstorm,
            _ => return None,
        };

        Some(condition)
    }

    pub fn flags(self) -> ConditionFlags {
        use WeatherCondition::*;

        ConditionFlags {
            raining: matches!(self, Drizzle | Rain | FreezingRain | Sleet | Thunderstorm),
            snowing: matches!(self, Snow | Sleet),
            clear: matches!(self, Clear),
            cloudy: matches!(self, PartlyCloudy | Cloudy | Overcast),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Overcast => "Overcast",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::FreezingRain => "Freezing rain",
            WeatherCondition::Sleet => "Sleet",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(WeatherCondition::Clear))]
    #[case(2, Some(WeatherCondition::PartlyCloudy))]
    #[case(3, Some(WeatherCondition::Overcast))]
    #[case(53, Some(WeatherCondition::Drizzle))]
    #[case(63, Some(WeatherCondition::Rain))]
    #[case(81, Some(WeatherCondition::Rain))]
    #[case(67, Some(WeatherCondition::FreezingRain))]
    #[case(75, Some(WeatherCondition::Snow))]
    #[case(99, Some(WeatherCondition::Thunderstorm))]
    #[case(42, None)]
    fn maps_wmo_codes(#[case] code: i32, #[case] expected: Option<WeatherCondition>) {
        assert_eq!(WeatherCondition::from_wmo_code(code), expected);
    }

    #[rstest]
    #[case(1000, Some(WeatherCondition::Clear))]
    #[case(1009, Some(WeatherCondition::Overcast))]
    #[case(1183, Some(WeatherCondition::Rain))]
    #[case(1153, Some(WeatherCondition::Drizzle))]
    #[case(1219, Some(WeatherCondition::Snow))]
    #[case(1276, Some(WeatherCondition::Thunderstorm))]
    #[case(1279, Some(WeatherCondition::Snow))]
    #[case(1282, Some(WeatherCondition::Snow))]
    #[case(9999, None)]
    fn maps_weatherapi_codes(#[case] code: i32, #[case] expected: Option<WeatherCondition>) {
        assert_eq!(WeatherCondition::from_weatherapi_code(code), expected);
    }

    #[test]
    fn drizzle_counts_as_rain() {
        let flags = WeatherCondition::Drizzle.flags();
        assert!(flags.raining);
        assert!(!flags.cloudy);
    }

    #[test]
    fn sleet_is_both_rain_and_snow() {
        let flags = WeatherCondition::Sleet.flags();
        assert!(flags.raining);
        assert!(flags.snowing);
    }

    #[test]
    fn partly_cloudy_is_cloudy_not_clear() {
        let flags = WeatherCondition::PartlyCloudy.flags();
        assert!(flags.cloudy);
        assert!(!flags.clear);
        assert!(!flags.raining);
    }

    #[test]
    fn thundersnow_is_snowing_not_raining() {
        let flags = WeatherCondition::from_weatherapi_code(1282).map(WeatherCondition::flags);
        assert_eq!(
            flags,
            Some(ConditionFlags { raining: false, snowing: true, clear: false, cloudy: false })
        );
    }
}
