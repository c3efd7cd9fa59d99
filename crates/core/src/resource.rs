// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster resource kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A resource category that commands operate on.
///
/// The well-known kinds understand kubectl's singular, plural and short
/// spellings. Anything else is carried verbatim as [`ResourceKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceKind {
    Service,
    Pod,
    Deployment,
    Namespace,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid resource kind: {0:?}")]
pub struct ParseKindError(pub String);

impl ResourceKind {
    /// Kinds the command rewriter recognizes, in match priority order.
    pub const REWRITABLE: [ResourceKind; 3] =
        [ResourceKind::Service, ResourceKind::Pod, ResourceKind::Deployment];

    /// Every spelling kubectl accepts for this kind.
    pub fn aliases(&self) -> &[&str] {
        match self {
            Self::Service => &["service", "services", "svc"],
            Self::Pod => &["pod", "pods", "po"],
            Self::Deployment => &["deployment", "deployments", "deploy"],
            Self::Namespace => &["namespace", "namespaces", "ns"],
            Self::Other(_) => &[],
        }
    }

    /// Keywords that mark a command as targeting this kind.
    ///
    /// Narrower than [`aliases`](Self::aliases): two-letter short names
    /// like `po` are too ambiguous to match inside free-form commands.
    pub fn keywords(&self) -> &[&str] {
        match self {
            Self::Service => &["service", "services", "svc"],
            Self::Pod => &["pod", "pods"],
            Self::Deployment => &["deployment", "deployments", "deploy"],
            Self::Namespace => &["namespace", "namespaces"],
            Self::Other(_) => &[],
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Service => "service",
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::Namespace => "namespace",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        let valid = !word.is_empty()
            && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(ParseKindError(s.to_string()));
        }
        let known = [Self::Service, Self::Pod, Self::Deployment, Self::Namespace];
        Ok(known
            .into_iter()
            .find(|kind| kind.aliases().contains(&word.as_str()))
            .unwrap_or(Self::Other(word)))
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = ParseKindError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
