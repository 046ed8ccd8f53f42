//! Deployment environment detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variables consulted, in order, to pick the environment
const ENVIRONMENT_VARS: [&str; 2] = ["ENVIRONMENT", "ENV"];

/// Where the service is running; drives CORS and logging defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    /// Verbose diagnostics are allowed everywhere except production
    pub fn is_debug(&self) -> bool {
        !self.is_production()
    }

    /// First parsable value of `ENVIRONMENT` or `ENV`, else development
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find_map(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Invalid environment: {}", other)),
        }
    }
}
