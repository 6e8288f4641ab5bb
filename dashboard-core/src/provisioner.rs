use std::{sync::Arc, time::Duration};
use tokio::time::{Instant, sleep};

use crate::{config::Readiness, error::ProvisionError, storage::ObjectStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyExists,
    /// Created during this run; `waited` is how long it took to become reachable.
    Created { waited: Duration },
}

/// Makes sure the run's bucket exists before anything is written to it.
///
/// The existence check and the creation are not atomic. Bucket names carry a
/// random suffix, so two processes racing on the same name is not a concern.
#[derive(Debug, Clone)]
pub struct Provisioner {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    readiness: Readiness,
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        readiness: Readiness,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            region: region.into(),
            readiness,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Create the bucket unless the existence check succeeds.
    ///
    /// Any failed check (missing, denied, transient) leads to a single creation
    /// attempt, followed by polling until the bucket answers or the readiness
    /// timeout runs out.
    pub async fn ensure_bucket(&self) -> Result<ProvisionOutcome, ProvisionError> {
        match self.store.head_bucket(&self.bucket).await {
            Ok(()) => {
                tracing::info!(bucket = %self.bucket, "bucket already exists");
                return Ok(ProvisionOutcome::AlreadyExists);
            }
            Err(reason) => {
                tracing::info!(bucket = %self.bucket, %reason, "bucket does not exist, creating");
            }
        }

        self.store
            .create_bucket(&self.bucket, &self.region)
            .await
            .map_err(|source| ProvisionError::Create {
                bucket: self.bucket.clone(),
                source,
            })?;

        tracing::info!(bucket = %self.bucket, region = %self.region, "created bucket");

        let waited = self.wait_until_ready().await?;
        Ok(ProvisionOutcome::Created { waited })
    }

    async fn wait_until_ready(&self) -> Result<Duration, ProvisionError> {
        let started = Instant::now();

        loop {
            sleep(self.readiness.poll_interval).await;
            let waited = started.elapsed();

            match self.store.head_bucket(&self.bucket).await {
                Ok(()) => {
                    tracing::debug!(bucket = %self.bucket, ?waited, "bucket is ready");
                    return Ok(waited);
                }
                Err(_) if waited >= self.readiness.timeout => {
                    return Err(ProvisionError::NotReady {
                        bucket: self.bucket.clone(),
                        waited,
                    });
                }
                Err(reason) => {
                    tracing::debug!(bucket = %self.bucket, %reason, "bucket not ready yet");
                }
            }
        }
    }
}
