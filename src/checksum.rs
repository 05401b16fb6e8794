//! Checksum utilities for inputs and generated output

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    pub fn of_str(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Checksum over named blobs, independent of the order they are given in
    pub fn of_bundle<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut hasher = Sha256::new();
        for (name, data) in entries {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            hasher.update((data.len() as u64).to_le_bytes());
            hasher.update(data);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of_str(content)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "type Person struct {}";
        assert_eq!(Checksum::of_str(content), Checksum::of_str(content));
        assert_eq!(Checksum::of_str(content).as_str().len(), 64);
    }

    #[test]
    fn test_verify() {
        let checksum = Checksum::of_str("a");
        assert!(checksum.verify("a"));
        assert!(!checksum.verify("b"));
    }

    #[test]
    fn test_bundle_is_order_independent() {
        let a = Checksum::of_bundle([("a.json", &b"{}"[..]), ("b.json", &b"[]"[..])]);
        let b = Checksum::of_bundle([("b.json", &b"[]"[..]), ("a.json", &b"{}"[..])]);
        assert_eq!(a, b);

        let c = Checksum::of_bundle([("a.json", &b"{}"[..]), ("b.json", &b"{}"[..])]);
        assert_ne!(a, c);
    }
}
