//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration resolved once from a config file and the environment
//! - The weather provider abstraction and its OpenWeather implementation
//! - The object store abstraction and its S3 implementation
//! - Bucket provisioning, observation persistence and the per-city run loop
//!
//! It is used by `weather-dashboard`, but the collaborators are traits so the
//! whole run can be driven against fakes.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod persister;
pub mod provider;
pub mod provisioner;
pub mod report;
pub mod storage;

pub use config::{BucketIdentity, Config, ConfigFile, ExitPolicy, Readiness};
pub use dashboard::Dashboard;
pub use error::{FetchError, ObservationError, PersistError, ProvisionError, StorageError};
pub use model::{CaptureTimestamp, ObjectKey, Observation, WeatherSummary};
pub use persister::{Persister, StoredObservation};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use provisioner::{ProvisionOutcome, Provisioner};
pub use report::{CityOutcome, CityReport, RunReport};
pub use storage::{ObjectStore, S3ObjectStore};
