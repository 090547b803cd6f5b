//! Endpoint path matching.
//!
//! # Design Decisions
//! - Matching is exact string equality on the request path, case-sensitive
//! - Patterns must start with `/`; anything else could never match
//! - No prefixes or wildcards: the legacy client calls fixed `.asp` paths

use std::fmt;

use crate::error::GatewayError;

/// A validated endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern(String);

impl PathPattern {
    /// Validate `path`.
    pub fn parse(path: impl Into<String>) -> Result<Self, GatewayError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(GatewayError::Configuration(format!(
                "Invalid path: {path:?} will never match. Must start with /"
            )));
        }
        Ok(Self(path))
    }

    /// Returns true if `method` is exactly this path.
    pub fn matches(&self, method: &str) -> bool {
        self.0 == method
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
