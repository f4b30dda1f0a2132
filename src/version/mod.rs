// src/version/mod.rs

//! Version parsing and constraint satisfaction for chart dependencies
//!
//! Versions are semantic versions, parsed leniently the way chart indexes
//! write them: a leading `v` is dropped and missing minor/patch components
//! default to zero (`v1.2` is `1.2.0`).
//!
//! Constraints build on [`semver::VersionReq`] with the chart-manifest
//! extensions:
//! - `""` and `"*"` accept any release version
//! - a bare version (`1.2.3`) means exact equality
//! - a bare wildcard (`1.2.x`) means the wildcard range
//! - `a - b` is the inclusive range `>= a, <= b`
//! - `!= v` excludes a single version
//! - `||` separates alternatives, `,` separates AND-ed comparators
//!
//! Pre-release versions only match when a comparator in the same
//! alternative names a pre-release of the same major.minor.patch.

use semver::{Version, VersionReq};
use std::fmt;
use thiserror::Error;

/// A constraint string that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid constraint {constraint:?}: {reason}")]
pub struct ConstraintError {
    pub constraint: String,
    pub reason: String,
}

/// Parse a version leniently
///
/// Examples:
/// - "1.2.3" → 1.2.3
/// - "v1.2" → 1.2.0
/// - "2" → 2.0.0
/// - "1.0-rc.1" → 1.0.0-rc.1
pub fn parse_version(s: &str) -> Result<Version, semver::Error> {
    let s = s.trim();
    let s = s.strip_prefix('v').unwrap_or(s);

    // Pad the numeric core before any pre-release or build suffix
    let split = s.find(['-', '+']).unwrap_or(s.len());
    let (core, suffix) = s.split_at(split);
    let mut padded = core.to_string();
    for _ in core.matches('.').count()..2 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded)
}

/// One `||` alternative of a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alternative {
    req: VersionReq,
    excluded: Vec<Version>,
}

impl Alternative {
    fn matches(&self, version: &Version) -> bool {
        self.req.matches(version) && !self.excluded.contains(version)
    }
}

/// A parsed version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    original: String,
    alternatives: Vec<Alternative>,
}

impl VersionConstraint {
    /// Parse a version constraint string
    ///
    /// Examples:
    /// - ">= 1.2.3" → at least 1.2.3
    /// - "1.2.3" → exactly 1.2.3
    /// - "^1.2 || ~2.0" → either range
    /// - "1.0 - 1.4.5" → inclusive range
    pub fn parse(s: &str) -> Result<Self, ConstraintError> {
        let trimmed = s.trim();
        let alternatives = if trimmed.is_empty() {
            vec![Alternative {
                req: VersionReq::STAR,
                excluded: Vec::new(),
            }]
        } else {
            trimmed
                .split("||")
                .map(|alt| parse_alternative(s, alt))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            original: s.to_string(),
            alternatives,
        })
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(version))
    }

    /// Check a version string, treating unparsable versions as unsatisfying
    pub fn satisfies_str(&self, version: &str) -> bool {
        parse_version(version)
            .map(|v| self.satisfies(&v))
            .unwrap_or(false)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original.trim().is_empty() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.original.trim())
        }
    }
}

fn parse_alternative(original: &str, alt: &str) -> Result<Alternative, ConstraintError> {
    let invalid = |reason: String| ConstraintError {
        constraint: original.to_string(),
        reason,
    };

    let mut comparators = Vec::new();
    let mut excluded = Vec::new();

    for term in alt.split(',') {
        let term = term.trim();
        if term.is_empty() {
            return Err(invalid("empty comparator".to_string()));
        }

        if let Some((low, high)) = term.split_once(" - ") {
            comparators.push(format!(">={}", strip_v(low.trim())));
            comparators.push(format!("<={}", strip_v(high.trim())));
        } else if let Some(rest) = term.strip_prefix("!=") {
            let version = parse_version(rest).map_err(|e| invalid(e.to_string()))?;
            excluded.push(version);
        } else {
            comparators.push(normalize_term(term));
        }
    }

    let req = if comparators.is_empty() {
        VersionReq::STAR
    } else {
        VersionReq::parse(&comparators.join(", ")).map_err(|e| invalid(e.to_string()))?
    };

    Ok(Alternative { req, excluded })
}

/// Rewrite one comparator into `semver` syntax
fn normalize_term(term: &str) -> String {
    const OPERATORS: [&str; 8] = [">=", "<=", ">", "<", "=", "^", "~>", "~"];

    for op in OPERATORS {
        if let Some(rest) = term.strip_prefix(op) {
            // `~>` is the pessimistic operator, same meaning as `~`
            let op = if op == "~>" { "~" } else { op };
            return format!("{}{}", op, strip_v(rest.trim()));
        }
    }

    let bare = strip_v(term);
    let core = bare.split(['-', '+']).next().unwrap_or(bare);
    if core.contains(['x', 'X', '*']) {
        bare.to_string()
    } else {
        format!("={}", bare)
    }
}

fn strip_v(s: &str) -> &str {
    match s.strip_prefix('v') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    #[test]
    fn test_parse_version_lenient() {
        assert_eq!(v("1.2.3"), Version::new(1, 2, 3));
        assert_eq!(v("v1.2"), Version::new(1, 2, 0));
        assert_eq!(v("2"), Version::new(2, 0, 0));
        assert_eq!(v("1.0-rc.1").to_string(), "1.0.0-rc.1");
        assert!(parse_version("latest").is_err());
    }

    #[test]
    fn test_constraint_any() {
        let c = VersionConstraint::parse("").unwrap();
        assert!(c.satisfies(&v("99.99.99")));
        assert_eq!(c.to_string(), "*");

        let c = VersionConstraint::parse("*").unwrap();
        assert!(c.satisfies(&v("0.0.1")));
    }

    #[test]
    fn test_constraint_bare_version_is_exact() {
        let c = VersionConstraint::parse("1.2.3").unwrap();
        assert!(c.satisfies(&v("1.2.3")));
        assert!(!c.satisfies(&v("1.2.4")));
        assert!(!c.satisfies(&v("1.3.0")));
    }

    #[test]
    fn test_constraint_greater_or_equal() {
        let c = VersionConstraint::parse(">=0.1.0").unwrap();
        assert!(c.satisfies(&v("0.1.0")));
        assert!(c.satisfies(&v("0.2.0")));
        assert!(!c.satisfies(&v("0.0.9")));

        let c = VersionConstraint::parse(">= 1.2.0").unwrap();
        assert!(c.satisfies(&v("1.3.0")));
    }

    #[test]
    fn test_constraint_and_or() {
        let c = VersionConstraint::parse(">= 1.0.0, < 2.0.0").unwrap();
        assert!(c.satisfies(&v("1.5.0")));
        assert!(!c.satisfies(&v("2.0.0")));
        assert!(!c.satisfies(&v("0.9.0")));

        let c = VersionConstraint::parse("^1.2 || ~3.0").unwrap();
        assert!(c.satisfies(&v("1.9.0")));
        assert!(c.satisfies(&v("3.0.7")));
        assert!(!c.satisfies(&v("2.0.0")));
        assert!(!c.satisfies(&v("3.1.0")));
    }

    #[test]
    fn test_constraint_hyphen_range_and_wildcard() {
        let c = VersionConstraint::parse("1.2 - 1.4.5").unwrap();
        assert!(c.satisfies(&v("1.2.0")));
        assert!(c.satisfies(&v("1.4.5")));
        assert!(!c.satisfies(&v("1.4.6")));

        let c = VersionConstraint::parse("1.2.x").unwrap();
        assert!(c.satisfies(&v("1.2.9")));
        assert!(!c.satisfies(&v("1.3.0")));
    }

    #[test]
    fn test_constraint_not_equal() {
        let c = VersionConstraint::parse(">=1.0.0, !=1.1.0").unwrap();
        assert!(c.satisfies(&v("1.0.0")));
        assert!(!c.satisfies(&v("1.1.0")));
        assert!(c.satisfies(&v("1.2.0")));
    }

    #[test]
    fn test_constraint_prerelease() {
        let c = VersionConstraint::parse(">=1.0.0").unwrap();
        assert!(!c.satisfies(&v("2.0.0-beta.1")));

        let c = VersionConstraint::parse(">=2.0.0-alpha").unwrap();
        assert!(c.satisfies(&v("2.0.0-beta.1")));
    }

    #[test]
    fn test_constraint_invalid() {
        assert!(VersionConstraint::parse(">a1").is_err());
        assert!(VersionConstraint::parse(">=1.0, ").is_err());
        assert!(VersionConstraint::parse("!=banana").is_err());
    }

    #[test]
    fn test_satisfies_str() {
        let c = VersionConstraint::parse("~1.2").unwrap();
        assert!(c.satisfies_str("v1.2.7"));
        assert!(!c.satisfies_str("not-a-version"));
    }
}
