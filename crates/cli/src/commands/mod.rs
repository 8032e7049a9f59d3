// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod run;

use anyhow::{Context, Result};
use resman_core::SystemConfig;
use std::path::Path;

/// Load a config file, or the built-in demo when none is given
pub fn load_config(path: Option<&Path>) -> Result<SystemConfig> {
    match path {
        Some(path) => SystemConfig::load(path)
            .with_context(|| format!("could not load {}", path.display())),
        None => Ok(SystemConfig::demo()),
    }
}
