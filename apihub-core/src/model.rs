use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// °C
    pub temperature: f64,
    /// Relative humidity, 0–100.
    pub humidity: i64,
    /// km/h
    pub wind_speed: f64,
    /// Degrees, 0–359.
    pub wind_direction: i64,
    pub weather_code: i64,
    pub weather_description: String,
    /// hPa
    pub pressure: Option<f64>,
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub wind_direction: i64,
    pub weather_code: i64,
    pub weather_description: String,
    pub precipitation_probability: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: i64,
    pub weather_description: String,
    /// mm
    pub precipitation_sum: Option<f64>,
    /// km/h
    pub wind_speed_max: Option<f64>,
}

/// Current conditions plus optional forecasts for one coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// `"{lat},{lon}"`
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Timezone resolved by the upstream, or the requested one.
    pub timezone: String,
    pub current: CurrentWeather,
    pub hourly: Option<Vec<HourlyForecast>>,
    pub daily: Option<Vec<DailyForecast>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub content: String,
    pub author: String,
    pub author_slug: Option<String>,
    pub tags: Vec<String>,
    /// As reported upstream, not recomputed from `content`.
    pub length: i64,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub official_name: String,
    pub capital: Vec<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub population: u64,
    /// km²
    pub area: Option<f64>,
    pub currencies: Option<Vec<Currency>>,
    pub languages: Option<Vec<Language>>,
    pub flag: String,
    pub flag_url: Option<String>,
    pub cca2: String,
    pub cca3: String,
    /// `None` when the upstream had no `idd.root`; `Some(vec![])` when it
    /// had a root but no suffixes.
    pub calling_codes: Option<Vec<String>>,
    pub timezones: Option<Vec<String>>,
}

/// One page of an offset-paginated upstream listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items in this page, not the requested limit.
    pub count: usize,
    /// 1-based.
    pub page: u32,
    pub total_count: Option<u64>,
}
