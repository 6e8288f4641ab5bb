use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::FetchError, model::Observation};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather observations.
///
/// Implementations make a single attempt per call and never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<Observation, FetchError>;
}
