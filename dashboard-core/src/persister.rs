use std::sync::Arc;

use crate::{
    error::PersistError,
    model::{CaptureTimestamp, JSON_CONTENT_TYPE, ObjectKey, Observation},
    storage::ObjectStore,
};

/// An observation as it was written, with its capture timestamp applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObservation {
    pub key: ObjectKey,
    pub observation: Observation,
}

#[derive(Debug, Clone)]
pub struct Persister {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl Persister {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Stamp `observation` with the current time and write it under
    /// `weather-data/{city}-{timestamp}.json`.
    pub async fn save(
        &self,
        observation: Option<Observation>,
        city: &str,
    ) -> Result<StoredObservation, PersistError> {
        self.save_at(observation, city, CaptureTimestamp::now()).await
    }

    pub async fn save_at(
        &self,
        observation: Option<Observation>,
        city: &str,
        captured: CaptureTimestamp,
    ) -> Result<StoredObservation, PersistError> {
        let mut observation = observation
            .filter(|o| !o.is_empty())
            .ok_or(PersistError::MissingObservation)?;

        observation.stamp(&captured);
        let key = ObjectKey::for_observation(city, &captured);
        let body = observation.to_json_bytes()?;

        self.store
            .put_object(&self.bucket, key.as_str(), body, JSON_CONTENT_TYPE)
            .await
            .map_err(|source| PersistError::Put {
                key: key.to_string(),
                source,
            })?;

        tracing::info!(city, bucket = %self.bucket, %key, "saved observation");
        Ok(StoredObservation { key, observation })
    }
}
