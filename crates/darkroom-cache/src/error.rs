//! Cache error types.

use thiserror::Error;

/// Errors surfaced by the media cache and its tiers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The locator is not an absolute URL.
    #[error("invalid media locator {locator:?}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// Neither tier held the bytes and the origin could not supply them.
    #[error("media unavailable for {locator}: {source}")]
    Unavailable {
        locator: String,
        #[source]
        source: OriginError,
    },

    /// Filesystem error in the disk tier.
    #[error("disk cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking disk task was cancelled or panicked.
    #[error("disk cache task failed: {0}")]
    Task(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures reported by an [`Origin`](crate::origin::Origin).
#[derive(Error, Debug)]
pub enum OriginError {
    /// Connection, timeout, or body-read failure.
    #[error("transport error fetching {locator}: {source}")]
    Transport {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    /// The origin answered with a non-success status.
    #[error("origin returned {status} for {locator}")]
    Status { locator: String, status: u16 },

    /// HTTP client could not be constructed.
    #[error("HTTP client initialisation failed: {0}")]
    Client(#[source] reqwest::Error),

    /// The origin reported the media as unavailable for another reason.
    #[error("origin unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DARKROOM_CACHE_DIR environment variable is required")]
    MissingCacheDir,
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_display_includes_origin_cause() {
        let err = CacheError::Unavailable {
            locator: "https://cdn.example/p/1.jpg".into(),
            source: OriginError::Status {
                locator: "https://cdn.example/p/1.jpg".into(),
                status: 503,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("media unavailable"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = CacheError::from(io_err);
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidNumber {
            var: "DARKROOM_DISK_BUDGET_BYTES".into(),
            value: "lots".into(),
        };
        assert!(err.to_string().contains("DARKROOM_DISK_BUDGET_BYTES"));
        assert!(ConfigError::Zero("disk_budget_bytes").to_string().contains("greater than zero"));
    }
}
