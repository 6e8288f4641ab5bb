use std::time::Duration;

/// Failure of a single weather provider request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("weather provider returned an unreadable body: {0}")]
    Decode(String),
}

/// A consumed field is missing from a provider response, or has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObservationError {
    #[error("observation is missing field `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("bucket or object not found")]
    NotFound,

    #[error("{0}")]
    Request(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("failed to create bucket {bucket}: {source}")]
    Create {
        bucket: String,
        #[source]
        source: StorageError,
    },

    #[error("bucket {bucket} was not reachable {waited:?} after creation")]
    NotReady { bucket: String, waited: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("no observation to persist")]
    MissingObservation,

    #[error("failed to serialize observation: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {key}: {source}")]
    Put {
        key: String,
        #[source]
        source: StorageError,
    },
}
