// ABOUTME: Foundation API endpoint URL.
// ABOUTME: One environment fans out to an ordered list of these.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FoundationUrlError {
    #[error("foundation URL cannot be empty")]
    Empty,

    #[error("foundation URL must start with http:// or https://: {0}")]
    MissingScheme(String),

    #[error("foundation URL cannot contain whitespace: {0}")]
    ContainsWhitespace(String),
}

/// API endpoint of a single foundation.
///
/// Each Action binds one courier session to exactly one of these; the
/// ordered list in an `Environment` defines the deployment fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoundationUrl(String);

impl FoundationUrl {
    pub fn new(value: &str) -> Result<Self, FoundationUrlError> {
        if value.is_empty() {
            return Err(FoundationUrlError::Empty);
        }

        if value.chars().any(char::is_whitespace) {
            return Err(FoundationUrlError::ContainsWhitespace(value.to_string()));
        }

        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(FoundationUrlError::MissingScheme(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoundationUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FoundationUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FoundationUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        FoundationUrl::new(&value).map_err(serde::de::Error::custom)
    }
}
