// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Check command

use super::load_config;
use anyhow::Result;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// System configuration (TOML) to validate
    config: PathBuf,
}

pub fn handle(args: CheckArgs) -> Result<()> {
    let config = load_config(Some(&args.config))?;

    println!("{}: ok", args.config.display());
    if let Some(seed) = config.seed {
        println!("  seed: {}", seed);
    }
    for resource in &config.resources {
        println!(
            "  resource \"{}\": up to {} uses, {}",
            resource.name, resource.max_uses, resource.fairness
        );
    }
    for user in &config.users {
        println!(
            "  user {}: holds up to {:?}",
            user.name, user.max_hold
        );
    }
    Ok(())
}
