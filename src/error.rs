use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, timeout or non-success HTTP status
    Request,
    /// Response body is not the expected JSON array of places
    Parse,
    /// Caller-supplied query or coordinates are unusable
    Validation,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("Nominatim returned HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to parse Nominatim response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid place {place_id} in Nominatim response: {reason}")]
    InvalidPlace { place_id: u64, reason: String },

    #[error("invalid search parameters: {0}")]
    Validation(String),

    #[error("invalid coordinates: {lat}, {lon}")]
    InvalidLocation { lat: f64, lon: f64 },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::Status { .. } => {
                ErrorKind::Request
            }
            Self::Parse { .. } | Self::InvalidPlace { .. } => ErrorKind::Parse,
            Self::Validation(_) | Self::InvalidLocation { .. } => ErrorKind::Validation,
        }
    }

    /// Wrap a reqwest failure, keeping timeouts distinguishable.
    pub(crate) fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("user agent must not be empty")]
    EmptyUserAgent,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let status = SearchError::Status {
            status: 503,
            url: "http://localhost/search".to_string(),
        };
        assert_eq!(status.kind(), ErrorKind::Request);
        assert_eq!(
            SearchError::Validation("empty".to_string()).kind(),
            ErrorKind::Validation
        );

        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let parse = SearchError::Parse {
            url: "http://localhost/search".to_string(),
            source,
        };
        assert_eq!(parse.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_status_message() {
        let err = SearchError::Status {
            status: 429,
            url: "http://localhost/search".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Nominatim returned HTTP 429 from http://localhost/search"
        );
    }
}
