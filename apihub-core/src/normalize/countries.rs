use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{ServiceError, ServiceResult},
    model::{Country, Currency, Language},
    upstream::ServiceKind,
};

use super::{decode, expect_object, json_type, null_as_default};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCountry {
    #[serde(deserialize_with = "null_as_default")]
    name: RawName,
    #[serde(deserialize_with = "null_as_default")]
    capital: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    region: String,
    subregion: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    population: u64,
    area: Option<f64>,
    /// Kept as a JSON map so the upstream key order survives.
    currencies: Option<Map<String, Value>>,
    languages: Option<Map<String, Value>>,
    #[serde(deserialize_with = "null_as_default")]
    flag: String,
    flags: Option<RawFlags>,
    #[serde(deserialize_with = "null_as_default")]
    cca2: String,
    #[serde(deserialize_with = "null_as_default")]
    cca3: String,
    idd: Option<RawIdd>,
    timezones: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawName {
    #[serde(deserialize_with = "null_as_default")]
    common: String,
    #[serde(deserialize_with = "null_as_default")]
    official: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlags {
    png: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIdd {
    root: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    suffixes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCurrencyDetail {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    symbol: String,
}

impl RawIdd {
    /// One entry per suffix, `root` prefixed. No root means no codes at all.
    fn calling_codes(self) -> Option<Vec<String>> {
        let root = self.root?;
        Some(self.suffixes.iter().map(|suffix| format!("{root}{suffix}")).collect())
    }
}

fn currencies(map: Map<String, Value>) -> ServiceResult<Option<Vec<Currency>>> {
    if map.is_empty() {
        return Ok(None);
    }

    map.into_iter()
        .map(|(code, detail)| {
            let detail: RawCurrencyDetail = decode(ServiceKind::Countries, detail)?;
            Ok(Currency { code, name: detail.name, symbol: detail.symbol })
        })
        .collect::<ServiceResult<Vec<_>>>()
        .map(Some)
}

fn languages(map: Map<String, Value>) -> ServiceResult<Option<Vec<Language>>> {
    if map.is_empty() {
        return Ok(None);
    }

    map.into_iter()
        .map(|(code, name)| match name {
            Value::String(name) => Ok(Language { code, name }),
            other => Err(ServiceError::invalid_shape(
                ServiceKind::Countries,
                format!("language '{code}' has a {} name", json_type(&other)),
            )),
        })
        .collect::<ServiceResult<Vec<_>>>()
        .map(Some)
}

/// Map one REST Countries record into a [`Country`].
pub fn country(body: Value) -> ServiceResult<Country> {
    expect_object(ServiceKind::Countries, &body)?;
    let raw: RawCountry = decode(ServiceKind::Countries, body)?;

    Ok(Country {
        name: raw.name.common,
        official_name: raw.name.official,
        capital: raw.capital,
        region: raw.region,
        subregion: raw.subregion,
        population: raw.population,
        area: raw.area,
        currencies: raw.currencies.map(currencies).transpose()?.flatten(),
        languages: raw.languages.map(languages).transpose()?.flatten(),
        flag: raw.flag,
        flag_url: raw.flags.and_then(|f| f.png),
        cca2: raw.cca2,
        cca3: raw.cca3,
        calling_codes: raw.idd.and_then(RawIdd::calling_codes),
        timezones: raw.timezones,
    })
}

/// A JSON array of country records.
pub fn country_list(body: Value) -> ServiceResult<Vec<Country>> {
    match body {
        Value::Array(items) => items.into_iter().map(country).collect(),
        other => Err(ServiceError::invalid_shape(
            ServiceKind::Countries,
            format!("expected an array of countries, got {}", json_type(&other)),
        )),
    }
}

/// First match of a lookup. Lookups may answer with a single object or an
/// array of matches; `null` or an empty array means nothing matched.
pub fn first_country(body: Value) -> ServiceResult<Option<Country>> {
    match body {
        Value::Null => Ok(None),
        Value::Array(items) => items.into_iter().next().map(country).transpose(),
        object @ Value::Object(_) => country(object).map(Some),
        other => Err(ServiceError::invalid_shape(
            ServiceKind::Countries,
            format!("expected a country or list of countries, got {}", json_type(&other)),
        )),
    }
}
