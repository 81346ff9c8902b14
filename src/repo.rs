//! Repository references
//!
//! Accepts the repository spellings users actually paste: `owner/name`,
//! `github.com/owner/name`, or a full https URL, with or without `.git`.

use crate::error::{Error, Result};
use serde::Serialize;

/// An owner/name repository reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoId {
    /// Parse a repository reference from any accepted spelling.
    pub fn parse(input: &str) -> Result<Self> {
        let mut s = input.trim();

        for prefix in ["https://", "http://"] {
            if let Some(rest) = s.strip_prefix(prefix) {
                s = rest;
                break;
            }
        }
        if let Some(rest) = s.strip_prefix("github.com/") {
            s = rest;
        }
        let s = s.strip_suffix('/').unwrap_or(s);
        let s = s.strip_suffix(".git").unwrap_or(s);

        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::InvalidRepo(input.to_string())),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
