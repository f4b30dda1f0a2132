// src/reference.rs

//! Compact source references
//!
//! A reference names a chart source and an optional tag in one string:
//! `[host[:port]/]path[:tag]`
//!
//! Examples:
//! - `mychart` - repository `mychart`, no tag
//! - `myrepo/mychart:1.5.0` - repository `myrepo/mychart`, tag `1.5.0`
//! - `localhost:5000/mychart:latest` - host with port, tag `latest`
//! - `mychart:5001:1.5.0` - self-hosted shorthand, port `5001`, tag `1.5.0`
//!
//! # Disambiguation
//!
//! The colon serves as both port and tag separator. A tag never contains
//! `/`, so a colon followed by a `/`-bearing remainder is a port separator.
//! With two colons and no `/` after the first, the middle part is accepted
//! as a port only when it is all digits. Anything else with two or more
//! colons is rejected.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed source reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Repository portion, including host and port when present
    pub repository: String,
    /// Tag portion, empty when the reference carries none
    pub tag: String,
}

impl Reference {
    /// Create a reference from its parts
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Parse a reference from `[host[:port]/]path[:tag]`
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidReference {
                reference: s.to_string(),
                reason: "empty reference".to_string(),
            });
        }

        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [_] => Ok(Self::new(s, "")),
            [repo, rest] => {
                if rest.contains('/') {
                    Ok(Self::new(s, ""))
                } else {
                    Ok(Self::new(*repo, *rest))
                }
            }
            [host, port_or_path, tag] => {
                if port_or_path.contains('/') || is_port(port_or_path) {
                    Ok(Self::new(format!("{}:{}", host, port_or_path), *tag))
                } else {
                    Err(too_many_colons(s, 2))
                }
            }
            _ => Err(too_many_colons(s, parts.len() - 1)),
        }
    }

    /// Whether the reference carries a tag
    pub fn has_tag(&self) -> bool {
        !self.tag.is_empty()
    }
}

fn is_port(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn too_many_colons(s: &str, count: usize) -> Error {
    Error::InvalidReference {
        reference: s.to_string(),
        reason: format!("ref contains too many colons ({})", count),
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if self.has_tag() {
            write!(f, ":{}", self.tag)?;
        }
        Ok(())
    }
}

impl FromStr for Reference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Reference::parse(s)
    }
}
