// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Substitutes unknown resource names with the single known one.

use crate::registry::{Resolution, ResourceRegistry};
use crate::text::positional_args;
use kp_core::ResourceKind;

/// Verbs whose resource name is being introduced rather than referenced.
const CREATING_VERBS: &[&str] = &["create", "run", "apply"];

#[derive(Debug, Clone)]
pub struct Rewriter {
    registry: ResourceRegistry,
    keyword: String,
}

impl Rewriter {
    pub fn new(registry: ResourceRegistry, keyword: impl Into<String>) -> Self {
        Self { registry, keyword: keyword.into() }
    }

    /// Rewrite `command` against the registry, or return it unchanged.
    ///
    /// Only the first kind keyword found (services before pods before
    /// deployments) is considered, and only when the following token looks
    /// like a resource name.
    pub fn rewrite(&self, command: &str) -> String {
        let creating = positional_args(command, &self.keyword)
            .and_then(|args| args.first().copied())
            .is_some_and(|verb| CREATING_VERBS.contains(&verb));
        if creating {
            return command.to_string();
        }

        let Some((kind, name)) = target(command) else {
            return command.to_string();
        };
        match self.registry.resolve(&kind, name) {
            Resolution::Unique(known) => {
                let rewritten = command.replace(name, &known);
                tracing::info!(
                    kind = %kind,
                    from = name,
                    to = %known,
                    command = %rewritten,
                    "rewrote resource name"
                );
                rewritten
            }
            Resolution::Known | Resolution::Unresolved => command.to_string(),
        }
    }
}

/// The targeted kind and the name token that follows its keyword.
fn target(command: &str) -> Option<(ResourceKind, &str)> {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    ResourceKind::REWRITABLE.into_iter().find_map(|kind| {
        let at = tokens.iter().position(|token| kind.keywords().contains(token))?;
        let name = tokens.get(at + 1).copied().filter(|token| is_name(token))?;
        Some((kind, name))
    })
}

fn is_name(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|c| c.is_alphanumeric() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
