//! Slash-delimited resource paths ("org/dept/team")

use crate::api::{ApiError, Result};
use std::fmt;
use std::str::FromStr;

/// A validated, non-empty sequence of name segments.
///
/// The last segment is the target's own name; the ones before it are its
/// ancestors, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    ancestors: Vec<String>,
    leaf: String,
}

impl ResourcePath {
    /// Parse a path, trimming leading and trailing slashes.
    ///
    /// Empty paths and empty interior segments ("a//b") are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ApiError::InvalidPath(raw.to_string());

        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(invalid());
        }

        let leaf = segments.pop().ok_or_else(invalid)?;
        Ok(Self {
            ancestors: segments,
            leaf,
        })
    }

    /// The target's own name
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Expected ancestor names, outermost first
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// All names, outermost first, ending with the leaf
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.ancestors
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.leaf.as_str()))
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len() + 1
    }
}

impl FromStr for ResourcePath {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ancestor in &self.ancestors {
            write!(f, "{}/", ancestor)?;
        }
        f.write_str(&self.leaf)
    }
}
