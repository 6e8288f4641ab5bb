//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use dashboard_core::{
    Config, ConfigFile, FetchError, ObjectStore, Observation, StorageError, WeatherProvider,
    config::ReadinessFile,
};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Head(String),
    Create { bucket: String, region: String },
    Put(PutCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutCall {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

impl PutCall {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("put body is JSON")
    }
}

#[derive(Debug, Default)]
struct StoreState {
    buckets: HashSet<String>,
    ops: Vec<Op>,
    /// Head calls that still report NotFound after a successful create.
    pending_visibility: usize,
}

/// In-memory object store that records every call.
#[derive(Debug, Default)]
pub struct RecordingStore {
    state: Mutex<StoreState>,
    head_error: Option<StorageError>,
    create_error: Option<StorageError>,
    put_error: Option<StorageError>,
    propagation_delay: usize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.state.lock().unwrap().buckets.insert(bucket.to_string());
        self
    }

    /// Error returned by head checks on buckets that do not exist.
    pub fn with_head_error(mut self, err: StorageError) -> Self {
        self.head_error = Some(err);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.create_error = Some(StorageError::Request("AccessDenied".into()));
        self
    }

    pub fn failing_put(mut self) -> Self {
        self.put_error = Some(StorageError::Request("SlowDown".into()));
        self
    }

    /// Newly created buckets stay invisible to the next `checks` head calls.
    pub fn with_propagation_delay(mut self, checks: usize) -> Self {
        self.propagation_delay = checks;
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn heads(&self) -> usize {
        self.ops().iter().filter(|op| matches!(op, Op::Head(_))).count()
    }

    pub fn creates(&self) -> Vec<(String, String)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Create { bucket, region } => Some((bucket, region)),
                _ => None,
            })
            .collect()
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Put(call) => Some(call),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn head_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(Op::Head(bucket.to_string()));

        if !state.buckets.contains(bucket) {
            return Err(self.head_error.clone().unwrap_or(StorageError::NotFound));
        }
        if state.pending_visibility > 0 {
            state.pending_visibility -= 1;
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(Op::Create {
            bucket: bucket.to_string(),
            region: region.to_string(),
        });

        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        state.buckets.insert(bucket.to_string());
        state.pending_visibility = self.propagation_delay;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(Op::Put(PutCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        }));

        if let Some(err) = &self.put_error {
            return Err(err.clone());
        }
        if !state.buckets.contains(bucket) {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Body(Value),
    Status(u16),
    /// A real connection attempt against a closed local port.
    Unreachable,
}

/// Provider answering from a per-city script and recording each request.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: HashMap<String, Reply>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, city: &str, reply: Reply) -> Self {
        self.replies.insert(city.to_string(), reply);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn fetch_current(&self, city: &str) -> Result<Observation, FetchError> {
        self.requested.lock().unwrap().push(city.to_string());

        match self.replies.get(city).cloned() {
            Some(Reply::Body(value)) => Observation::from_value(value)
                .ok_or_else(|| FetchError::Decode("expected a JSON object".into())),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                status,
                body: String::new(),
            }),
            Some(Reply::Unreachable) | None => {
                let err = reqwest::Client::new()
                    .get("http://127.0.0.1:1/")
                    .send()
                    .await
                    .expect_err("nothing listens on port 1");
                Err(FetchError::Transport(err))
            }
        }
    }
}

/// Config with fast readiness polling and the given cities.
pub fn test_config(cities: &[&str]) -> Config {
    let file = ConfigFile {
        cities: Some(cities.iter().map(|c| c.to_string()).collect()),
        readiness: ReadinessFile {
            poll_interval_ms: Some(100),
            timeout_secs: Some(1),
        },
        ..Default::default()
    };
    Config::resolve(file, |_| None)
}

pub fn clear_sky() -> Value {
    serde_json::json!({
        "main": {"temp": 72, "feels_like": 70, "humidity": 40},
        "weather": [{"description": "clear sky"}]
    })
}
