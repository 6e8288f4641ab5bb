use std::{io::Write, sync::Arc};

use crate::{
    config::Config,
    persister::Persister,
    provider::WeatherProvider,
    provisioner::Provisioner,
    report::{CityOutcome, RunReport},
    storage::ObjectStore,
};

/// Fetches each configured city in order and stores what comes back.
///
/// Human-readable progress goes to the writer passed to [`Dashboard::run`];
/// diagnostics go through `tracing`.
#[derive(Debug)]
pub struct Dashboard {
    provider: Arc<dyn WeatherProvider>,
    provisioner: Provisioner,
    persister: Persister,
    cities: Vec<String>,
}

impl Dashboard {
    pub fn new(
        config: &Config,
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let bucket = config.bucket.name();

        Self {
            provider,
            provisioner: Provisioner::new(
                Arc::clone(&store),
                bucket,
                config.region.as_str(),
                config.readiness,
            ),
            persister: Persister::new(store, bucket),
            cities: config.cities.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        self.provisioner.bucket()
    }

    /// Provision the bucket once, then process every city.
    ///
    /// Per-city failures are recorded in the report and never stop the run.
    /// Only a failing `out` aborts.
    pub async fn run<W: Write>(&self, out: &mut W) -> std::io::Result<RunReport> {
        match self.provisioner.ensure_bucket().await {
            Ok(outcome) => tracing::debug!(bucket = %self.bucket(), ?outcome, "bucket provisioned"),
            Err(err) => tracing::error!(error = %err, "bucket provisioning failed, continuing"),
        }

        let mut report = RunReport::default();
        for city in &self.cities {
            let outcome = self.process_city(city, out).await?;
            report.push(city.as_str(), outcome);
        }

        Ok(report)
    }

    async fn process_city<W: Write>(&self, city: &str, out: &mut W) -> std::io::Result<CityOutcome> {
        writeln!(out, "\nFetching weather for {city}...")?;

        let observation = match self.provider.fetch_current(city).await {
            Ok(observation) => observation,
            Err(err) => {
                tracing::error!(city, error = %err, "error fetching weather data");
                writeln!(out, "Failed to fetch weather data for {city}")?;
                return Ok(CityOutcome::FetchFailed(err.to_string()));
            }
        };

        let summary = match observation.summary() {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(city, error = %err, "unexpected weather response");
                writeln!(out, "Failed to fetch weather data for {city}")?;
                return Ok(CityOutcome::InvalidResponse(err.to_string()));
            }
        };

        writeln!(out, "{summary}")?;

        match self.persister.save(Some(observation), city).await {
            Ok(stored) => {
                writeln!(out, "Weather data for {city} saved to S3!")?;
                Ok(CityOutcome::Saved(stored.key))
            }
            Err(err) => {
                tracing::error!(city, error = %err, "error saving to S3");
                writeln!(out, "Failed to save weather data for {city}")?;
                Ok(CityOutcome::PersistFailed(err.to_string()))
            }
        }
    }
}
