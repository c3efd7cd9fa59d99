// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource registry: names observed in successful listings, by kind.

use indexmap::IndexSet;
use kp_core::ResourceKind;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of looking up a name against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name has been observed for this kind.
    Known,
    /// The name is unknown and exactly one name of this kind is known.
    Unique(String),
    /// The name is unknown and there is no single replacement.
    Unresolved,
}

/// Shared, grow-only record of resource names.
///
/// Cloning shares the underlying map, so one registry can back every run of
/// a session. Names are never removed.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    inner: Arc<RwLock<HashMap<ResourceKind, IndexSet<String>>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `names` into the set for `kind`; returns how many were new.
    pub fn observe<I, S>(&self, kind: ResourceKind, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = self.inner.write();
        let set = inner.entry(kind).or_default();
        names.into_iter().map(|name| set.insert(name.into())).filter(|added| *added).count()
    }

    /// Known names for `kind`, in first-observed order.
    pub fn candidates(&self, kind: &ResourceKind) -> Vec<String> {
        self.inner.read().get(kind).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// The only known name for `kind`, if there is exactly one.
    pub fn unique_candidate(&self, kind: &ResourceKind) -> Option<String> {
        let inner = self.inner.read();
        match inner.get(kind) {
            Some(set) if set.len() == 1 => set.first().cloned(),
            _ => None,
        }
    }

    /// Decide how `name` relates to the known names of `kind` under one read.
    pub fn resolve(&self, kind: &ResourceKind, name: &str) -> Resolution {
        let inner = self.inner.read();
        let Some(set) = inner.get(kind) else {
            return Resolution::Unresolved;
        };
        if set.contains(name) {
            Resolution::Known
        } else if let (1, Some(only)) = (set.len(), set.first()) {
            Resolution::Unique(only.clone())
        } else {
            Resolution::Unresolved
        }
    }

    /// Copy of every kind's names.
    pub fn snapshot(&self) -> HashMap<ResourceKind, Vec<String>> {
        self.inner
            .read()
            .iter()
            .map(|(kind, names)| (kind.clone(), names.iter().cloned().collect()))
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
