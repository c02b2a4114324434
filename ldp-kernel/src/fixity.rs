//! Fixity (checksum and size) verification results

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Digest algorithms the store can compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[default]
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
}

impl DigestAlgorithm {
    /// URN scheme used for digests of this algorithm (`urn:sha1:<hex>`)
    pub fn urn_scheme(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Hex digest of `data`
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }

    /// Digest of `data` as a `urn:<alg>:<hex>` URI
    pub fn digest_uri(&self, data: &[u8]) -> String {
        format!("urn:{}:{}", self.urn_scheme(), self.hex_digest(data))
    }

    /// Algorithm named by a `urn:<alg>:<hex>` digest URI
    pub fn from_digest_uri(uri: &str) -> Option<Self> {
        let mut parts = uri.splitn(3, ':');
        match (parts.next(), parts.next()) {
            (Some("urn"), Some("sha1")) => Some(DigestAlgorithm::Sha1),
            (Some("urn"), Some("sha256")) => Some(DigestAlgorithm::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => f.write_str("SHA-1"),
            DigestAlgorithm::Sha256 => f.write_str("SHA-256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SHA-1" | "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA-256" | "SHA256" => Ok(DigestAlgorithm::Sha256),
            other => Err(Error::config(format!("unsupported digest algorithm: {other}"))),
        }
    }
}

/// Outcome of a single fixity comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixityState {
    Success,
    BadChecksum,
    BadSize,
}

impl FixityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixityState::Success => "SUCCESS",
            FixityState::BadChecksum => "BAD_CHECKSUM",
            FixityState::BadSize => "BAD_SIZE",
        }
    }
}

/// A checksum computed over one stored copy of a binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixityResult {
    /// Storage-backend locator of the copy that was checked
    pub content_location: String,
    /// Computed digest, as a `urn:<alg>:<hex>` URI
    pub computed_digest: String,
    /// Computed size in bytes
    pub computed_size: u64,
    /// Empty until [`FixityResult::verify`] has run
    pub states: BTreeSet<FixityState>,
}

impl FixityResult {
    pub fn new(content_location: impl Into<String>, computed_digest: impl Into<String>, computed_size: u64) -> Self {
        Self {
            content_location: content_location.into(),
            computed_digest: computed_digest.into(),
            computed_size,
            states: BTreeSet::new(),
        }
    }

    /// Compare against the expected digest and size.
    ///
    /// Yields `SUCCESS` when both match, otherwise one state per mismatch.
    pub fn verify(mut self, expected_digest: &str, expected_size: u64) -> Self {
        self.states.clear();
        if self.computed_digest != expected_digest {
            self.states.insert(FixityState::BadChecksum);
        }
        if self.computed_size != expected_size {
            self.states.insert(FixityState::BadSize);
        }
        if self.states.is_empty() {
            self.states.insert(FixityState::Success);
        }
        self
    }

    pub fn matches(&self) -> bool {
        self.states.len() == 1 && self.states.contains(&FixityState::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_digest_uri() {
        assert_eq!(
            DigestAlgorithm::Sha1.digest_uri(b"hello"),
            "urn:sha1:aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(
            DigestAlgorithm::from_digest_uri("urn:sha256:abcd"),
            Some(DigestAlgorithm::Sha256)
        );
        assert_eq!(DigestAlgorithm::from_digest_uri("urn:md5:abcd"), None);
    }

    #[test]
    fn test_verify_states() {
        let digest = DigestAlgorithm::Sha1.digest_uri(b"hello");
        let ok = FixityResult::new("memory:/a", &digest, 5).verify(&digest, 5);
        assert!(ok.matches());

        let bad = FixityResult::new("memory:/a", &digest, 5).verify("urn:sha1:00", 6);
        assert!(!bad.matches());
        assert_eq!(
            bad.states.into_iter().collect::<Vec<_>>(),
            vec![FixityState::BadChecksum, FixityState::BadSize]
        );
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("sha-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("SHA1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }
}
