use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::ObservationError;

pub const TIMESTAMP_FIELD: &str = "timestamp";
pub const OBJECT_PREFIX: &str = "weather-data";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One weather snapshot for a city, kept exactly as the provider returned it.
///
/// Only the fields read by [`Observation::summary`] are interpreted; everything
/// else is carried through to storage untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(Map<String, Value>);

impl Observation {
    /// Accepts JSON objects only.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Record the capture time under `timestamp`, replacing any previous value.
    pub fn stamp(&mut self, captured: &CaptureTimestamp) {
        self.0
            .insert(TIMESTAMP_FIELD.to_string(), Value::String(captured.to_string()));
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
    }

    /// Extract the display fields, failing on the first one that is absent.
    pub fn summary(&self) -> Result<WeatherSummary, ObservationError> {
        let main = self.0.get("main");
        let main_field = |name: &str| main.and_then(|m| m.get(name));

        let description = self
            .0
            .get("weather")
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("description"))
            .and_then(Value::as_str)
            .ok_or(ObservationError::MissingField("weather[0].description"))?;

        Ok(WeatherSummary {
            temperature: number(main_field("temp"), "main.temp")?,
            feels_like: number(main_field("feels_like"), "main.feels_like")?,
            humidity: number(main_field("humidity"), "main.humidity")?,
            description: description.to_owned(),
        })
    }
}

fn number(value: Option<&Value>, field: &'static str) -> Result<Number, ObservationError> {
    match value {
        Some(Value::Number(n)) => Ok(n.clone()),
        _ => Err(ObservationError::MissingField(field)),
    }
}

/// The fields shown to the operator for each city. Values are imperial units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub temperature: Number,
    pub feels_like: Number,
    pub humidity: Number,
    pub description: String,
}

impl fmt::Display for WeatherSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Temperature: {}°F", self.temperature)?;
        writeln!(f, "Feels like: {}°F", self.feels_like)?;
        writeln!(f, "Humidity: {}%", self.humidity)?;
        write!(f, "Conditions: {}", self.description)
    }
}

/// Local wall-clock capture time, second granularity, rendered `YYYYMMDD-HHMMSS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTimestamp(NaiveDateTime);

impl CaptureTimestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn at(time: NaiveDateTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d-%H%M%S"))
    }
}

/// Location of one stored observation inside the bucket.
///
/// Two captures for the same city within the same second map to the same key;
/// the later write replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn for_observation(city: &str, captured: &CaptureTimestamp) -> Self {
        Self(format!("{OBJECT_PREFIX}/{city}-{captured}.json"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
