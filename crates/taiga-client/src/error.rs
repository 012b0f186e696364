//! Error types for the tracker client

use burndown_core::FetchError;

/// Tracker client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request could not be built or sent
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status, when the tracker answered
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

impl From<ClientError> for FetchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Status { status, .. } => FetchError::Status(status),
            ClientError::Decode(msg) => FetchError::Decode(msg),
            ClientError::Http(e) if e.is_decode() => FetchError::Decode(e.to_string()),
            ClientError::Http(e) => match e.status() {
                Some(status) => FetchError::Status(status.as_u16()),
                None => FetchError::Transport(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_fetch_status() {
        let error = ClientError::Status {
            status: 403,
            url: "http://tracker/userstories/1".into(),
        };
        assert_eq!(error.status_code(), Some(403));
        assert_eq!(FetchError::from(error), FetchError::Status(403));
    }

    #[test]
    fn decode_maps_to_fetch_decode() {
        let error = ClientError::Decode("missing field".into());
        assert_eq!(
            FetchError::from(error),
            FetchError::Decode("missing field".into())
        );
    }
}
