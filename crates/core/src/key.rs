//! Namespaced resource keys.
//!
//! Keys are stable string identifiers naming blocks and sound events
//! (e.g. `minecraft:wheat`, `minecraft:block.sand.step`). They are ordered
//! and validated to support deterministic iteration and stable lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error returned when parsing an invalid [`ResourceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResourceKeyError {
    message: String,
}

impl ResourceKeyError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    namespace: String,
    path: String,
}

impl ResourceKey {
    /// Parse a resource key.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, ResourceKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ResourceKeyError::new("ResourceKey cannot be empty"));
        }

        let (namespace, path) = match input.split_once(':') {
            Some((ns, p)) => (ns, p),
            None => (DEFAULT_NAMESPACE, input),
        };

        let namespace = namespace.trim();
        let path = path.trim();

        validate_namespace(namespace)?;
        validate_path(path)?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Resource key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resource key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceKey {
    type Err = ResourceKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_namespace(ns: &str) -> Result<(), ResourceKeyError> {
    if ns.is_empty() {
        return Err(ResourceKeyError::new("ResourceKey namespace cannot be empty"));
    }
    if ns.len() > 64 {
        return Err(ResourceKeyError::new(
            "ResourceKey namespace too long (max 64)",
        ));
    }
    if !ns
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(ResourceKeyError::new(
            "ResourceKey namespace has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ResourceKeyError> {
    if path.is_empty() {
        return Err(ResourceKeyError::new("ResourceKey path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(ResourceKeyError::new("ResourceKey path too long (max 128)"));
    }
    if !path.chars().all(|c| {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/' )
    }) {
        return Err(ResourceKeyError::new(
            "ResourceKey path has invalid characters (allowed: a-z0-9_./-)",
        ));
    }
    Ok(())
}
