use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::StorageError;

pub mod s3;

pub use s3::S3ObjectStore;

/// Bucket/object operations the dashboard needs from a cloud object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// `Ok` when the bucket exists and is accessible.
    async fn head_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StorageError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
