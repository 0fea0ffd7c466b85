//! # Join Codes
//!
//! A join code is a short, human-enterable secret that grants lookup access
//! to exactly one event. Codes are drawn from an alphabet with the visually
//! confusable characters removed (`0`/`O`, `1`/`I`/`l`), so a code read
//! aloud or copied from a screen survives transcription.
//!
//! ## Normalisation
//!
//! [`JoinCode::parse`] trims surrounding whitespace and upper-cases its
//! input before validating, so `" k7ph2q "` and `"K7PH2Q"` are the same code.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Characters a join code may contain. No `0`, `O`, `1`, `I`.
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in every join code.
pub const JOIN_CODE_LEN: usize = 6;

/// A validated, normalised join code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JoinCode(String);

impl JoinCode {
    /// Normalise and validate a user-entered code.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalised = raw.trim().to_ascii_uppercase();
        if !Self::is_well_formed(&normalised) {
            return Err(CoreError::InvalidJoinCode(raw.to_string()));
        }
        Ok(Self(normalised))
    }

    /// Build a code from alphabet indices. Indices are reduced modulo the
    /// alphabet size.
    pub fn from_indices(indices: [usize; JOIN_CODE_LEN]) -> Self {
        let code = indices
            .iter()
            .map(|i| JOIN_CODE_ALPHABET[i % JOIN_CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    /// Whether `s` is already in normalised join-code form.
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == JOIN_CODE_LEN && s.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b))
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JoinCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JoinCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JoinCode> for String {
    fn from(code: JoinCode) -> Self {
        code.0
    }
}
