use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ServiceError, ServiceResult},
    model::{CurrentWeather, DailyForecast, HourlyForecast, WeatherReport},
    upstream::ServiceKind,
};

use super::{decode, null_as_default};

/// Hourly entries kept from an upstream forecast.
pub const HOURLY_HORIZON: usize = 48;
/// Daily entries kept from an upstream forecast.
pub const DAILY_HORIZON: usize = 7;

pub const CURRENT_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "weather_code",
    "surface_pressure",
    "visibility",
];

pub const HOURLY_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "weather_code",
    "precipitation_probability",
];

pub const DAILY_VARIABLES: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "weather_code",
    "precipitation_sum",
    "wind_speed_10m_max",
];

/// WMO weather interpretation code → description. Unlisted codes are
/// `"Unknown"`.
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawForecast {
    timezone: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    current: RawCurrent,
    hourly: Option<RawHourly>,
    daily: Option<RawDaily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCurrent {
    #[serde(deserialize_with = "null_as_default")]
    temperature_2m: f64,
    #[serde(deserialize_with = "null_as_default")]
    relative_humidity_2m: i64,
    #[serde(deserialize_with = "null_as_default")]
    wind_speed_10m: f64,
    #[serde(deserialize_with = "null_as_default")]
    wind_direction_10m: i64,
    #[serde(deserialize_with = "null_as_default")]
    weather_code: i64,
    surface_pressure: Option<f64>,
    visibility: Option<f64>,
}

/// Column-oriented: entry `i` is made of element `i` of every array.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHourly {
    #[serde(deserialize_with = "null_as_default")]
    time: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    temperature_2m: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_default")]
    relative_humidity_2m: Vec<Option<i64>>,
    #[serde(deserialize_with = "null_as_default")]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_default")]
    wind_direction_10m: Vec<Option<i64>>,
    #[serde(deserialize_with = "null_as_default")]
    weather_code: Vec<Option<i64>>,
    #[serde(deserialize_with = "null_as_default")]
    precipitation_probability: Vec<Option<i64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDaily {
    #[serde(deserialize_with = "null_as_default")]
    time: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_default")]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_default")]
    weather_code: Vec<Option<i64>>,
    #[serde(deserialize_with = "null_as_default")]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_default")]
    wind_speed_10m_max: Vec<Option<f64>>,
}

fn at<T: Copy + Default>(column: &[Option<T>], i: usize) -> T {
    column.get(i).copied().flatten().unwrap_or_default()
}

fn opt_at<T: Copy>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).copied().flatten()
}

impl From<RawCurrent> for CurrentWeather {
    fn from(raw: RawCurrent) -> Self {
        CurrentWeather {
            temperature: raw.temperature_2m,
            humidity: raw.relative_humidity_2m,
            wind_speed: raw.wind_speed_10m,
            wind_direction: raw.wind_direction_10m,
            weather_code: raw.weather_code,
            weather_description: describe_weather_code(raw.weather_code).to_string(),
            pressure: raw.surface_pressure,
            visibility: raw.visibility,
        }
    }
}

impl RawHourly {
    fn into_entries(self) -> ServiceResult<Vec<HourlyForecast>> {
        self.time
            .iter()
            .take(HOURLY_HORIZON)
            .enumerate()
            .map(|(i, time)| {
                let weather_code = at(&self.weather_code, i);
                Ok(HourlyForecast {
                    time: parse_timestamp(time)?,
                    temperature: at(&self.temperature_2m, i),
                    humidity: at(&self.relative_humidity_2m, i),
                    wind_speed: at(&self.wind_speed_10m, i),
                    wind_direction: at(&self.wind_direction_10m, i),
                    weather_code,
                    weather_description: describe_weather_code(weather_code).to_string(),
                    precipitation_probability: opt_at(&self.precipitation_probability, i),
                })
            })
            .collect()
    }
}

impl RawDaily {
    fn into_entries(self) -> ServiceResult<Vec<DailyForecast>> {
        self.time
            .iter()
            .take(DAILY_HORIZON)
            .enumerate()
            .map(|(i, date)| {
                let weather_code = at(&self.weather_code, i);
                Ok(DailyForecast {
                    date: parse_date(date)?,
                    temperature_max: at(&self.temperature_2m_max, i),
                    temperature_min: at(&self.temperature_2m_min, i),
                    weather_code,
                    weather_description: describe_weather_code(weather_code).to_string(),
                    precipitation_sum: opt_at(&self.precipitation_sum, i),
                    wind_speed_max: opt_at(&self.wind_speed_10m_max, i),
                })
            })
            .collect()
    }
}

/// Open-Meteo reports times as wall-clock in the requested timezone, so an
/// RFC 3339 offset is dropped and the local reading kept as-is.
fn parse_timestamp(value: &str) -> ServiceResult<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    let trimmed = value.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            ServiceError::invalid_shape(ServiceKind::Weather, format!("unparseable time '{value}'"))
        })
}

fn parse_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| parse_timestamp(value).map(|dt| dt.date()))
        .map_err(|_| {
            ServiceError::invalid_shape(ServiceKind::Weather, format!("unparseable date '{value}'"))
        })
}

/// Map an Open-Meteo forecast body into a [`WeatherReport`].
///
/// Forecast blocks are only produced when both requested and present in
/// the body; they are cut to [`HOURLY_HORIZON`] and [`DAILY_HORIZON`].
pub fn weather_report(
    body: Value,
    latitude: f64,
    longitude: f64,
    requested_timezone: &str,
    include_hourly: bool,
    include_daily: bool,
) -> ServiceResult<WeatherReport> {
    let raw: RawForecast = decode(ServiceKind::Weather, body)?;

    let hourly = match raw.hourly {
        Some(hourly) if include_hourly => Some(hourly.into_entries()?),
        _ => None,
    };
    let daily = match raw.daily {
        Some(daily) if include_daily => Some(daily.into_entries()?),
        _ => None,
    };

    Ok(WeatherReport {
        location: format!("{latitude},{longitude}"),
        latitude,
        longitude,
        timezone: raw.timezone.unwrap_or_else(|| requested_timezone.to_string()),
        current: raw.current.into(),
        hourly,
        daily,
    })
}
