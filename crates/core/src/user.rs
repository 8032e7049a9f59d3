// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource users
//!
//! A user repeatedly requests each of its resources at a random priority,
//! uses it for a random time and releases it, until every resource is
//! exhausted.

use crate::error::ResourceError;
use crate::interrupt::Interrupt;
use crate::manager::ResourceManager;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// What a user did before it stopped
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserReport {
    pub name: String,
    /// Completed request/use/release cycles
    pub cycles: u32,
    /// Cycles in which the resource was still available when used
    pub uses: u32,
    /// Stopped early because its interrupt fired
    pub interrupted: bool,
}

pub struct ResourceUser {
    name: String,
    max_hold: Duration,
    managers: Vec<Arc<dyn ResourceManager>>,
    rng: StdRng,
    interrupt: Interrupt,
}

impl ResourceUser {
    pub fn new(
        name: impl Into<String>,
        max_hold: Duration,
        managers: Vec<Arc<dyn ResourceManager>>,
        rng: StdRng,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            name: name.into(),
            max_hold,
            managers,
            rng,
            interrupt,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Run until every resource is exhausted or the user is interrupted.
    ///
    /// An interrupt while parked surfaces as [`ResourceError::Interrupted`];
    /// one noticed between cycles ends the run normally.
    pub fn run(mut self) -> Result<UserReport, ResourceError> {
        let mut report = UserReport {
            name: self.name.clone(),
            ..UserReport::default()
        };

        loop {
            let mut active = false;

            for manager in &self.managers {
                if self.interrupt.is_interrupted() {
                    tracing::info!(user = %self.name, "stopping, interrupted");
                    report.interrupted = true;
                    return Ok(report);
                }
                if manager.is_exhausted() {
                    continue;
                }
                active = true;

                let priority = manager.random_priority();
                let hold = random_hold(&mut self.rng, self.max_hold);
                tracing::debug!(
                    user = %self.name,
                    resource = %manager.resource_name(),
                    %priority,
                    "requesting"
                );

                manager.request_resource(priority, &self.interrupt)?;
                let was_available = !manager.is_exhausted();
                if let Err(e) = manager.use_resource(hold, &self.interrupt) {
                    // Don't strand the other users behind a failed holder
                    manager.release_resource()?;
                    return Err(e);
                }
                manager.release_resource()?;

                report.cycles += 1;
                if was_available {
                    report.uses += 1;
                }
            }

            if !active {
                tracing::debug!(user = %self.name, cycles = report.cycles, "all resources exhausted");
                return Ok(report);
            }
        }
    }
}

fn random_hold(rng: &mut StdRng, max_hold: Duration) -> Duration {
    let max_micros = u64::try_from(max_hold.as_micros()).unwrap_or(u64::MAX);
    Duration::from_micros(rng.gen_range(0..=max_micros))
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
