//! Wire types of the upstream weather provider.
//!
//! The provider is loose about JSON types: temperatures, ids and
//! humidity arrive as strings most of the time and as numbers or `null`
//! occasionally. Every scalar is therefore decoded into a `String`
//! through [`lenient_string`], and lists tolerate explicit `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::WeatherError;

/// Envelope `code` value signalling success.
pub const SUCCESS_CODE: &str = "200";

/// Top-level provider response.
///
/// Held as raw JSON so that a body which parses but does not have the
/// expected shape is reported as a data failure rather than a decode one.
#[derive(Debug, Clone)]
pub struct WeatherEnvelope {
    raw: Value,
}

impl From<Value> for WeatherEnvelope {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}

impl WeatherEnvelope {
    /// `code` exactly as sent; only the string `"200"` means success.
    pub fn code(&self) -> Option<&Value> {
        self.raw.get("code")
    }

    pub fn is_success(&self) -> bool {
        self.code().and_then(Value::as_str) == Some(SUCCESS_CODE)
    }

    /// Provider message, or a generic description when it sent none.
    pub fn message(&self) -> String {
        let message = match self.raw.get("message") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        if message.is_empty() {
            "未知错误".to_string()
        } else {
            message
        }
    }

    /// Validate the envelope and decode only the first per-city block.
    pub fn into_first_block(mut self) -> Result<WeatherBlock, WeatherError> {
        let message = self.message();
        if !self.is_success() {
            return Err(WeatherError::data(message));
        }

        let first = match self.raw.get_mut("value") {
            Some(Value::Array(blocks)) if !blocks.is_empty() => blocks.swap_remove(0),
            _ => return Err(WeatherError::data(message)),
        };

        serde_json::from_value(first)
            .map_err(|e| WeatherError::data(format!("城市天气数据格式不正确: {e}")))
    }
}

/// Weather data for one city.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherBlock {
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(rename = "provinceName", default, deserialize_with = "lenient_string")]
    pub province_name: String,
    #[serde(default)]
    pub realtime: Option<RealtimeSnapshot>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weathers: Vec<DayForecast>,
    #[serde(default)]
    pub pm25: Option<AirQuality>,
    #[serde(rename = "weatherDetailsInfo", default)]
    pub weather_details_info: Option<WeatherDetailsInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub indexes: Vec<LifeIndex>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RealtimeSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub temp: String,
    #[serde(rename = "sendibleTemp", default, deserialize_with = "lenient_string")]
    pub feels_like: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather: String,
    /// Relative humidity, percent.
    #[serde(rename = "sD", default, deserialize_with = "lenient_string")]
    pub humidity: String,
    #[serde(rename = "wD", default, deserialize_with = "lenient_string")]
    pub wind_direction: String,
    #[serde(rename = "wS", default, deserialize_with = "lenient_string")]
    pub wind_scale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AirQuality {
    #[serde(default, deserialize_with = "lenient_string")]
    pub aqi: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pm25: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pm10: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DayForecast {
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub week: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather: String,
    #[serde(rename = "temp_day_c", default, deserialize_with = "lenient_string")]
    pub temp_day: String,
    #[serde(rename = "temp_night_c", default, deserialize_with = "lenient_string")]
    pub temp_night: String,
    #[serde(rename = "sun_rise_time", default, deserialize_with = "lenient_string")]
    pub sunrise: String,
    #[serde(rename = "sun_down_time", default, deserialize_with = "lenient_string")]
    pub sunset: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherDetailsInfo {
    #[serde(
        rename = "weather3HoursDetailsInfos",
        default,
        deserialize_with = "null_as_default"
    )]
    pub intervals: Vec<IntervalForecast>,
}

/// One 3-hour slot of the short-interval forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntervalForecast {
    #[serde(rename = "startTime", default, deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(rename = "endTime", default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather: String,
    #[serde(rename = "lowerestTemperature", default, deserialize_with = "lenient_string")]
    pub min_temp: String,
    #[serde(rename = "highestTemperature", default, deserialize_with = "lenient_string")]
    pub max_temp: String,
    /// Millimetres; absent, empty and `"0"` all mean no precipitation.
    #[serde(default, deserialize_with = "lenient_string")]
    pub precipitation: String,
}

impl IntervalForecast {
    pub fn has_precipitation(&self) -> bool {
        let amount = self.precipitation.trim();
        !amount.is_empty() && amount != "0"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifeIndex {
    #[serde(default, deserialize_with = "lenient_string")]
    pub abbreviation: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
}

impl LifeIndex {
    pub fn kind(&self) -> LifeIndexKind {
        LifeIndexKind::from_abbreviation(&self.abbreviation)
    }
}

/// Life-index categories the provider publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeIndexKind {
    Clothing,
    Makeup,
    ColdRisk,
    CarWash,
    Exercise,
    Uv,
    Other,
}

impl LifeIndexKind {
    pub fn from_abbreviation(abbreviation: &str) -> Self {
        match abbreviation {
            "ct" => LifeIndexKind::Clothing,
            "pp" => LifeIndexKind::Makeup,
            "gm" => LifeIndexKind::ColdRisk,
            "xc" => LifeIndexKind::CarWash,
            "yd" => LifeIndexKind::Exercise,
            "uv" => LifeIndexKind::Uv,
            _ => LifeIndexKind::Other,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_nulls_decode_as_strings() {
        let realtime: RealtimeSnapshot = serde_json::from_value(json!({
            "time": "2026-10-15 08:00:00",
            "temp": 21,
            "sendibleTemp": 19.5,
            "weather": "多云",
            "sD": null,
            "wD": "东北风",
        }))
        .unwrap();

        assert_eq!(realtime.temp, "21");
        assert_eq!(realtime.feels_like, "19.5");
        assert_eq!(realtime.humidity, "");
        assert_eq!(realtime.wind_scale, "");
    }

    #[test]
    fn first_block_is_returned_on_success() {
        let envelope = WeatherEnvelope::from(json!({
            "code": "200",
            "value": [{ "city": "北京" }, { "city": "上海" }]
        }));

        let block = envelope.into_first_block().unwrap();
        assert_eq!(block.city, "北京");
    }

    #[test]
    fn non_success_code_uses_provider_message() {
        let envelope = WeatherEnvelope::from(json!({
            "code": "404",
            "value": [],
            "message": "city not found"
        }));

        let err = envelope.into_first_block().unwrap_err();
        assert!(err.to_string().contains("city not found"));
    }

    #[test]
    fn empty_value_list_is_an_error_with_generic_message() {
        let envelope = WeatherEnvelope::from(json!({ "code": "200", "value": null }));

        let err = envelope.into_first_block().unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamData(_)));
        assert!(err.to_string().contains("未知错误"));
    }

    #[test]
    fn numeric_success_code_is_rejected() {
        let envelope = WeatherEnvelope::from(json!({
            "code": 200,
            "value": [{ "city": "北京" }]
        }));

        assert!(!envelope.is_success());
        let err = envelope.into_first_block().unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamData(_)));
    }

    #[test]
    fn value_of_wrong_shape_reports_provider_message() {
        let envelope = WeatherEnvelope::from(json!({
            "code": "500",
            "message": "服务繁忙",
            "value": {}
        }));

        let err = envelope.into_first_block().unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamData(_)));
        assert_eq!(err.to_string(), "获取天气数据失败: 服务繁忙");

        let envelope = WeatherEnvelope::from(json!({ "code": "200", "value": {} }));
        assert!(matches!(
            envelope.into_first_block(),
            Err(WeatherError::UpstreamData(_))
        ));
    }

    #[test]
    fn undecodable_block_is_a_data_error() {
        let envelope = WeatherEnvelope::from(json!({
            "code": "200",
            "value": [{ "city": "北京", "realtime": "n/a" }]
        }));

        let err = envelope.into_first_block().unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamData(_)));
        assert!(err.to_string().contains("城市天气数据格式不正确"));
    }

    #[test]
    fn precipitation_zero_or_empty_is_absent() {
        let mut slot = IntervalForecast::default();
        assert!(!slot.has_precipitation());
        slot.precipitation = "0".into();
        assert!(!slot.has_precipitation());
        slot.precipitation = "1.2".into();
        assert!(slot.has_precipitation());
    }

    #[test]
    fn unknown_index_abbreviation_is_other() {
        assert_eq!(LifeIndexKind::from_abbreviation("ct"), LifeIndexKind::Clothing);
        assert_eq!(LifeIndexKind::from_abbreviation("zz"), LifeIndexKind::Other);
    }
}
