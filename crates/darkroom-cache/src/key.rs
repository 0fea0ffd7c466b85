//! # Cache Key Derivation
//!
//! Maps a media locator to a stable key that doubles as the disk-tier file
//! name: `{sha256(canonical_url)}-{trailing_segment}`.
//!
//! ## Canonical Form
//!
//! The URL is parsed (which lower-cases scheme and host and drops default
//! ports) and its fragment is removed. The query string is kept, so two
//! differently-signed URLs for the same object are distinct keys.
//!
//! ## File-Name Safety
//!
//! The trailing path segment is reduced to `[A-Za-z0-9._-]`, capped at 64
//! characters. Keys always start with a hex digit, so they never collide
//! with the dot-prefixed temporary files the disk tier writes.

use sha2::{Digest, Sha256};
use url::Url;

use crate::error::CacheError;

const DIGEST_HEX_LEN: usize = 64;
const MAX_SEGMENT_LEN: usize = 64;

/// Stable key for one media object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for an already-parsed locator.
    pub fn derive(locator: &Url) -> Self {
        let mut canonical = locator.clone();
        canonical.set_fragment(None);

        let digest = Sha256::digest(canonical.as_str().as_bytes());
        let mut key: String = digest.iter().map(|b| format!("{b:02x}")).collect();

        if let Some(segment) = trailing_segment(&canonical) {
            key.push('-');
            key.push_str(&segment);
        }
        Self(key)
    }

    /// Parse `raw` as an absolute URL and derive its key.
    pub fn derive_str(raw: &str) -> Result<(Url, Self), CacheError> {
        let url = parse_locator(raw)?;
        let key = Self::derive(&url);
        Ok((url, key))
    }

    /// Recover a key from a disk-tier file name. Returns `None` for names
    /// this module could not have produced.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.len() < DIGEST_HEX_LEN || !name.is_char_boundary(DIGEST_HEX_LEN) {
            return None;
        }
        let (digest, rest) = name.split_at(DIGEST_HEX_LEN);
        if !digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return None;
        }
        match rest.strip_prefix('-') {
            None if rest.is_empty() => Some(Self(name.to_string())),
            Some(seg) if !seg.is_empty() && seg.len() <= MAX_SEGMENT_LEN && seg.bytes().all(is_safe) => {
                Some(Self(name.to_string()))
            }
            _ => None,
        }
    }

    /// Key as a string slice; also the disk-tier file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a locator, requiring an absolute URL with a host.
pub fn parse_locator(raw: &str) -> Result<Url, CacheError> {
    let url = Url::parse(raw.trim()).map_err(|e| CacheError::InvalidLocator {
        locator: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(CacheError::InvalidLocator {
            locator: raw.to_string(),
            reason: "locator must be a hierarchical URL with a host".into(),
        });
    }
    Ok(url)
}

fn is_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-'
}

fn trailing_segment(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let cleaned: String = last
        .bytes()
        .take(MAX_SEGMENT_LEN)
        .map(|b| if is_safe(b) { b as char } else { '_' })
        .collect();
    Some(cleaned)
}
