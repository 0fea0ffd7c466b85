//! Errors raised by the code directory and its registry backend.

use darkroom_core::{CoreError, EventId, JoinCode};
use thiserror::Error;

/// Failure reported by an [`EventRegistry`](crate::EventRegistry) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The join code is already held by another event, live or deleted.
    #[error("join code {0} is already assigned")]
    Collision(JoinCode),

    #[error("{0} already exists")]
    DuplicateEvent(EventId),

    /// The backend could not be reached or refused the operation.
    #[error("registry backend failure: {0}")]
    Backend(String),
}

/// Top-level error type for directory operations.
///
/// A code that matches nothing is not an error; lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// No unused code was found within the attempt limit.
    #[error("join code space exhausted after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Event data failed validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_names_the_code() {
        let code = JoinCode::parse("K7PH2Q").unwrap();
        let err = RegistryError::Collision(code);
        assert_eq!(err.to_string(), "join code K7PH2Q is already assigned");
    }

    #[test]
    fn exhaustion_reports_attempts() {
        let err = DirectoryError::CodeSpaceExhausted { attempts: 32 };
        assert!(err.to_string().contains("32 attempts"));
    }

    #[test]
    fn registry_error_converts_transparently() {
        let err: DirectoryError = RegistryError::Backend("timeout".into()).into();
        assert_eq!(err.to_string(), "registry backend failure: timeout");
    }
}
