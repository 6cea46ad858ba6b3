// ABOUTME: Config values that are either literal or pulled from the process environment.
// ABOUTME: Keeps credentials out of checked-in configuration files.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        assert_eq!(
            EnvValue::Literal("deployer".into()).resolve().unwrap(),
            "deployer"
        );
    }

    #[test]
    fn missing_var_without_default_errors() {
        let value = EnvValue::FromEnv {
            var: "CONVOY_TEST_UNSET_VAR".into(),
            default: None,
        };
        assert!(matches!(value.resolve(), Err(Error::MissingEnvVar(_))));
    }

    #[test]
    fn missing_var_falls_back_to_default() {
        let value = EnvValue::FromEnv {
            var: "CONVOY_TEST_UNSET_VAR".into(),
            default: Some("fallback".into()),
        };
        assert_eq!(value.resolve().unwrap(), "fallback");
    }
}
