use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{error::FetchError, model::Observation};

use super::WeatherProvider;

pub const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Fahrenheit and miles per hour.
const UNITS: &str = "imperial";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            url: CURRENT_WEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point requests at a different current-weather endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, city: &str) -> Result<Observation, FetchError> {
        tracing::debug!(city, url = %self.url, "requesting current weather");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_deref().unwrap_or_default()),
                ("units", UNITS),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("invalid JSON: {e}")))?;

        Observation::from_value(parsed)
            .ok_or_else(|| FetchError::Decode("expected a JSON object".to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
