// src/hash.rs

//! Requirement digests
//!
//! A lock is stamped with the digest of the requirement list that produced
//! it. Re-hashing the declared list and comparing with the stamp is the only
//! staleness check; timestamps are never consulted.
//!
//! Format: `sha256:<64 lowercase hex characters>`
//!
//! The canonical encoding is the compact JSON array of the dependencies in
//! declared order, each serialized as `{"name":..,"version":..,"repository":..}`
//! plus any optional manifest fields that are set. Reordering the list
//! changes the digest.

use crate::chart::Dependency;
use crate::error::Result;
use sha2::{Digest, Sha256};

/// Algorithm prefix for digest strings
pub const DIGEST_PREFIX: &str = "sha256:";

/// Hex length of a SHA-256 digest
const SHA256_HEX_LEN: usize = 64;

/// Compute the digest of a requirement list
pub fn hash_req(deps: &[Dependency]) -> Result<String> {
    let data = serde_json::to_vec(deps)?;
    Ok(digest_bytes(&data))
}

/// Compute the prefixed SHA-256 digest of a byte slice
pub fn digest_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{}{}", DIGEST_PREFIX, hex::encode(hasher.finalize()))
}

/// Check that a string is a well-formed `sha256:<hex>` digest
pub fn is_digest(s: &str) -> bool {
    match s.strip_prefix(DIGEST_PREFIX) {
        Some(hex) => {
            hex.len() == SHA256_HEX_LEN
                && hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPINE_DIGEST: &str =
        "sha256:d661820b01ed7bcf26eed8f01cf16380e0a76326ba33058d3150f919d9b15bc0";

    fn alpine() -> Dependency {
        Dependency::new("alpine", "0.1.0", "http://localhost:8879/charts")
    }

    #[test]
    fn test_hash_req_known_value() {
        assert_eq!(hash_req(&[alpine()]).unwrap(), ALPINE_DIGEST);
    }

    #[test]
    fn test_hash_req_empty_differs() {
        let empty = hash_req(&[]).unwrap();
        assert_ne!(empty, ALPINE_DIGEST);
        assert!(is_digest(&empty));
    }

    #[test]
    fn test_hash_req_idempotent() {
        let deps = vec![alpine(), Dependency::new("redis", "^6", "@stable")];
        assert_eq!(hash_req(&deps).unwrap(), hash_req(&deps).unwrap());
    }

    #[test]
    fn test_hash_req_order_sensitive() {
        let a = vec![alpine(), Dependency::new("redis", "^6", "@stable")];
        let b = vec![Dependency::new("redis", "^6", "@stable"), alpine()];
        assert_ne!(hash_req(&a).unwrap(), hash_req(&b).unwrap());
    }

    #[test]
    fn test_hash_req_sees_every_field() {
        let base = hash_req(&[alpine()]).unwrap();
        let mut changed = alpine();
        changed.repository = "http://localhost:8879".to_string();
        assert_ne!(hash_req(&[changed]).unwrap(), base);

        let mut changed = alpine();
        changed.version = "0.1.1".to_string();
        assert_ne!(hash_req(&[changed]).unwrap(), base);
    }

    #[test]
    fn test_digest_bytes_known_value() {
        assert_eq!(
            digest_bytes(b"Hello, World!"),
            "sha256:dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_is_digest() {
        assert!(is_digest(ALPINE_DIGEST));
        assert!(!is_digest("sha256:abc"));
        assert!(!is_digest(&ALPINE_DIGEST.to_uppercase()));
        assert!(!is_digest("d661820b01ed7bcf26eed8f01cf16380e0a76326ba33058d3150f919d9b15bc0"));
    }
}
