/// All error types that can occur when talking to a floodlight device.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device did not answer within the caller's deadline.
    #[error("request timed out")]
    Timeout,

    /// A socket operation failed while communicating with the device.
    #[error("connection {action} error: {err:?}")]
    Connection { action: String, err: std::io::Error },

    /// The device answered with a status code outside [200, 400).
    #[error("device returned http status {0}")]
    HttpStatus(u16),

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP response could not be framed (bad status line or headers).
    #[error("malformed http response: {0}")]
    MalformedResponse(String),

    /// The configured device endpoint is unusable (missing host or port).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Attempted to send a [`crate::MediaConfig`] with no attributes set.
    #[error("media config update has no attributes set")]
    NoAttribute,
}

impl Error {
    /// Create a new connection error
    pub fn connection(action: &str, err: std::io::Error) -> Self {
        Error::Connection {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new invalid endpoint error
    pub fn invalid_endpoint(reason: &str) -> Self {
        Error::InvalidEndpoint(reason.to_string())
    }

    /// Whether this error is a timeout (the only kind reads fall back on).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
