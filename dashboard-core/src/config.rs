use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const BUCKET_PREFIX_VAR: &str = "AWS_BUCKET_PREFIX";
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BUCKET_PREFIX: &str = "weather-dashboard";
pub const DEFAULT_REGION: &str = "us-west-1";
pub const DEFAULT_CITIES: [&str; 3] = ["Philadelphia", "Seattle", "New York"];

/// Readiness checks are never issued more often than this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

const SUFFIX_LEN: usize = 6;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// What the process exit status reports after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExitPolicy {
    /// Exit 0 even when some cities failed.
    #[default]
    AlwaysSuccess,
    /// Exit 1 when any city failed to fetch or persist.
    FailOnPartial,
}

/// Bounds for waiting on a freshly created bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for Readiness {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessFile {
    pub poll_interval_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// Optional settings stored on disk. Every field may be absent.
///
/// Example TOML:
/// ```toml
/// bucket_prefix = "weather-dashboard"
/// api_key = "..."
/// region = "us-west-1"
/// cities = ["Philadelphia", "Seattle", "New York"]
/// exit_policy = "fail-on-partial"
///
/// [readiness]
/// poll_interval_ms = 500
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub bucket_prefix: Option<String>,
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub cities: Option<Vec<String>>,
    pub exit_policy: Option<ExitPolicy>,
    #[serde(default)]
    pub readiness: ReadinessFile,
}

impl ConfigFile {
    /// Load the config file from its platform location, or an empty document on first run.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Globally unique bucket name: `{prefix}-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketIdentity {
    prefix: String,
    suffix: String,
    name: String,
}

impl BucketIdentity {
    /// Draw a fresh 6-character `[a-z0-9]` suffix for `prefix`.
    pub fn generate(prefix: &str) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
            .collect();

        let identity = Self::with_suffix(prefix, &suffix);
        tracing::info!(bucket = %identity.name, "generated bucket name");
        identity
    }

    pub fn with_suffix(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            name: format!("{prefix}-{suffix}"),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BucketIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Runtime configuration, resolved once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: BucketIdentity,
    /// Not validated here; a missing key shows up as a provider auth failure.
    pub api_key: Option<String>,
    pub region: String,
    pub cities: Vec<String>,
    pub readiness: Readiness,
    pub exit_policy: ExitPolicy,
}

impl Config {
    /// Config file plus the process environment.
    pub fn from_env() -> Result<Self> {
        let file = ConfigFile::load()?;
        Ok(Self::resolve(file, |name| std::env::var(name).ok()))
    }

    /// Merge `file` with variables from `env`. Environment wins over the file,
    /// the file wins over defaults. Empty variables count as unset.
    pub fn resolve<F>(file: ConfigFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let prefix = var(BUCKET_PREFIX_VAR)
            .or(file.bucket_prefix)
            .unwrap_or_else(|| DEFAULT_BUCKET_PREFIX.to_string());

        let defaults = Readiness::default();
        let readiness = Readiness {
            poll_interval: file
                .readiness
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval)
                .max(MIN_POLL_INTERVAL),
            timeout: file
                .readiness
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        Self {
            bucket: BucketIdentity::generate(&prefix),
            api_key: var(API_KEY_VAR).or(file.api_key),
            region: file.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            cities: file
                .cities
                .unwrap_or_else(|| DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()),
            readiness,
            exit_policy: file.exit_policy.unwrap_or_default(),
        }
    }
}
