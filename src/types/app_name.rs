// ABOUTME: Validated application name.
// ABOUTME: Rejects names that would break the temporary-name rename dance.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppNameError {
    #[error("application name cannot be empty")]
    Empty,

    #[error("application name cannot contain whitespace")]
    ContainsWhitespace,

    #[error("application name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("invalid character in application name: '{0}'")]
    InvalidChar(char),
}

/// Name of the application as known to the foundations.
///
/// The blue/green flow derives the temporary name from this value, so the
/// character set is restricted to what every foundation accepts verbatim
/// in `push`, `rename`, and route commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        if value.is_empty() {
            return Err(AppNameError::Empty);
        }

        if value.starts_with('-') {
            return Err(AppNameError::StartsWithHyphen);
        }

        for c in value.chars() {
            if c.is_whitespace() {
                return Err(AppNameError::ContainsWhitespace);
            }
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(AppNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AppName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AppName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        AppName::new(&value).map_err(serde::de::Error::custom)
    }
}
