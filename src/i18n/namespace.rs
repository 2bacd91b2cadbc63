use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A named partition of translation keys (e.g., "common", "skateparks").
///
/// Names are limited to ASCII alphanumerics, `-` and `_`, which keeps them
/// safe to use as file names and URL segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Arc<str>);

impl Namespace {
    pub fn new(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name.len() <= 64
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(Error::InvalidNamespace(name.to_string()));
        }
        Ok(Namespace(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma-separated list, skipping blanks.
    pub fn parse_list(list: &str) -> Result<Vec<Namespace>> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Namespace::new)
            .collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
