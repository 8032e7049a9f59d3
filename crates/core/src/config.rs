// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System configuration
//!
//! Describes the resources and users of a run. Loaded from TOML:
//!
//! ```toml
//! seed = 7
//!
//! [[resource]]
//! name = "A"
//! max_uses = 20
//! fairness = "barging"
//!
//! [[user]]
//! name = "1"
//! max_hold = "100ms"
//! ```

use crate::error::ConfigError;
use crate::manager::FairnessPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    /// Upper bound of the randomly drawn usage budget
    pub max_uses: u32,
    #[serde(default)]
    pub fairness: FairnessPolicy,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>, max_uses: u32) -> Self {
        Self {
            name: name.into(),
            max_uses,
            fairness: FairnessPolicy::default(),
        }
    }

    pub fn with_fairness(mut self, fairness: FairnessPolicy) -> Self {
        self.fairness = fairness;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
    /// Longest a user holds a resource per use
    #[serde(with = "humantime_serde")]
    pub max_hold: Duration,
}

impl UserConfig {
    pub fn new(name: impl Into<String>, max_hold: Duration) -> Self {
        Self {
            name: name.into(),
            max_hold,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Seeds budgets and user hold times for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
    #[serde(default, rename = "user")]
    pub users: Vec<UserConfig>,
}

impl SystemConfig {
    /// One resource usable up to 20 times, shared by four users
    pub fn demo() -> Self {
        Self {
            seed: None,
            resources: vec![ResourceConfig::new("A", 20)],
            users: vec![
                UserConfig::new("1", Duration::from_millis(100)),
                UserConfig::new("2", Duration::from_millis(100)),
                UserConfig::new("3", Duration::from_millis(200)),
                UserConfig::new("4", Duration::from_millis(200)),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.is_empty() {
            return Err(ConfigError::Invalid("at least one resource is required".into()));
        }
        if self.users.is_empty() {
            return Err(ConfigError::Invalid("at least one user is required".into()));
        }

        let mut names = HashSet::new();
        for resource in &self.resources {
            if resource.max_uses == 0 {
                return Err(ConfigError::Invalid(format!(
                    "resource {} must allow at least one use",
                    resource.name
                )));
            }
            if !names.insert(resource.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate resource name: {}",
                    resource.name
                )));
            }
        }

        let mut names = HashSet::new();
        for user in &self.users {
            if !names.insert(user.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate user name: {}",
                    user.name
                )));
            }
        }

        Ok(())
    }

    /// Apply the same fairness policy to every resource
    pub fn with_fairness(mut self, fairness: FairnessPolicy) -> Self {
        for resource in &mut self.resources {
            resource.fairness = fairness;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
