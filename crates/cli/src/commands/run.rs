// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run command

use super::load_config;
use anyhow::{Context, Result};
use resman_core::{FairnessPolicy, ResourceSystem, RunReport};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Fairness {
    /// Woken users race new arrivals for the resource
    Barging,
    /// Released resources go straight to the woken user
    HandOff,
}

impl From<Fairness> for FairnessPolicy {
    fn from(fairness: Fairness) -> Self {
        match fairness {
            Fairness::Barging => FairnessPolicy::Barging,
            Fairness::HandOff => FairnessPolicy::HandOff,
        }
    }
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// System configuration (TOML). Runs the built-in demo when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for resource budgets and hold times
    #[arg(long)]
    seed: Option<u64>,

    /// Fairness policy for every resource, overriding the config
    #[arg(long, value_enum)]
    fairness: Option<Fairness>,
}

pub fn handle(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(fairness) = args.fairness {
        config = config.with_fairness(fairness.into());
    }

    let system = ResourceSystem::from_config(&config)?;

    let interrupts = system.interrupt_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupting users...");
        interrupts.interrupt_all();
    })
    .context("could not install Ctrl-C handler")?;

    let report = system.run()?;
    print_report(&report);

    if report.interrupted() {
        anyhow::bail!("run interrupted");
    }
    println!("All users finished");
    Ok(())
}

fn print_report(report: &RunReport) {
    for user in &report.users {
        println!(
            "user {}: {} uses in {} cycles",
            user.name, user.uses, user.cycles
        );
    }
    for resource in &report.resources {
        println!(
            "resource \"{}\": {} of {} uses consumed",
            resource.name,
            resource.initial_uses - resource.uses_left,
            resource.initial_uses
        );
    }
}
