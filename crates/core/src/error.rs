// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for resource arbitration, configuration and system runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while requesting, using or releasing a resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// A second user got into the resource while another was using it.
    /// Only possible when callers skip request/release.
    #[error("{user} cannot use resource \"{resource}\" because it is already in use by another user")]
    Busy { resource: String, user: String },
    /// The wait for the resource was interrupted; the resource was never acquired
    #[error("resource \"{resource}\" was interrupted while waiting in priority {priority} queue")]
    Interrupted { resource: String, priority: u8 },
    #[error("priority {0} is outside 0..=10")]
    InvalidPriority(i64),
}

/// Errors loading or validating a system configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fatal errors from running a resource system
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("user {user} failed: {source}")]
    User {
        user: String,
        #[source]
        source: ResourceError,
    },
    #[error("user {0} panicked")]
    Panicked(String),
    #[error("failed to start user {user}: {source}")]
    Spawn {
        user: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
