use thiserror::Error;

/// Errors that can occur when fetching a document from a store location.
///
/// These never escape a store evaluation: the fetch boundary logs them and
/// treats the document as absent.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Network or connection error
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout
    #[error("Timed out fetching {0}")]
    Timeout(String),

    /// The server answered with a non-success status
    #[error("Unexpected status {status} for {location}")]
    Status { status: u16, location: String },

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Document bytes could not be decoded into the expected record
    #[error("Malformed document at {location}: {message}")]
    Parse { location: String, message: String },

    /// The location string cannot be turned into a request
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

impl FetchError {
    /// Whether this error only means the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Errors raised while sizing a single array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Byte width cannot be inferred from the data type
    #[error("Unsupported data type: {dtype}")]
    UnsupportedDtype { dtype: String },

    /// Array metadata carries no data type at all
    #[error("Array metadata has no data type")]
    MissingDtype,
}

/// Errors from reading sample lists and writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Sample list is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
