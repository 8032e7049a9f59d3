// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource systems
//!
//! A system owns a set of resource managers and a set of users. Running it
//! starts one thread per user and waits for all of them. Any user error is
//! fatal to the run.

use crate::config::SystemConfig;
use crate::error::{ConfigError, ResourceError, SystemError};
use crate::interrupt::{Interrupt, InterruptHandle};
use crate::manager::{BasicResourceManager, FairnessPolicy, LockResourceManager, ResourceManager};
use crate::resource::Resource;
use crate::user::{ResourceUser, UserReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Budget of a resource at the end of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceReport {
    pub name: String,
    pub initial_uses: u32,
    pub uses_left: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub users: Vec<UserReport>,
    pub resources: Vec<ResourceReport>,
}

impl RunReport {
    pub fn total_uses(&self) -> u32 {
        self.users.iter().map(|u| u.uses).sum()
    }

    pub fn interrupted(&self) -> bool {
        self.users.iter().any(|u| u.interrupted)
    }
}

struct PendingUser {
    name: String,
    max_hold: Duration,
    interrupt: Interrupt,
}

pub struct ResourceSystem {
    managers: Vec<Arc<LockResourceManager>>,
    users: Vec<PendingUser>,
    seed: Option<u64>,
    rng: StdRng,
    interrupts: InterruptHandle,
}

impl ResourceSystem {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Budgets and user hold times are derived from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            managers: Vec::new(),
            users: Vec::new(),
            seed,
            rng,
            interrupts: InterruptHandle::new(),
        }
    }

    pub fn from_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut system = Self::build(config.seed);
        for resource in &config.resources {
            let max_uses = NonZeroU32::new(resource.max_uses).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "resource {} must allow at least one use",
                    resource.name
                ))
            })?;
            system.add_resource(&resource.name, max_uses, resource.fairness);
        }
        for user in &config.users {
            system.add_user(&user.name, user.max_hold);
        }
        Ok(system)
    }

    /// Add a resource whose budget is drawn from `1..=max_uses`
    pub fn add_resource(&mut self, name: &str, max_uses: NonZeroU32, fairness: FairnessPolicy) {
        let basic = BasicResourceManager::with_rng(Resource::new(name), max_uses, &mut self.rng);
        self.add_manager(LockResourceManager::from_basic(basic).with_policy(fairness));
    }

    pub fn add_manager(&mut self, manager: LockResourceManager) {
        self.managers.push(Arc::new(manager));
    }

    /// Add a user that holds a resource for up to `max_hold` per use.
    /// Every user may use every resource.
    pub fn add_user(&mut self, name: &str, max_hold: Duration) {
        let interrupt = Interrupt::new();
        self.interrupts.register(interrupt.clone());
        self.users.push(PendingUser {
            name: name.to_string(),
            max_hold,
            interrupt,
        });
    }

    pub fn managers(&self) -> &[Arc<LockResourceManager>] {
        &self.managers
    }

    /// Handle that interrupts every user of this system
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    /// Start every user, wait for all of them, and report.
    pub fn run(&self) -> Result<RunReport, SystemError> {
        let managers: Vec<Arc<dyn ResourceManager>> = self
            .managers
            .iter()
            .map(|m| Arc::clone(m) as Arc<dyn ResourceManager>)
            .collect();

        let mut handles: Vec<(String, UserHandle)> = Vec::with_capacity(self.users.len());
        for (index, pending) in self.users.iter().enumerate() {
            let rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64 + 1)),
                None => StdRng::from_entropy(),
            };
            let user = ResourceUser::new(
                pending.name.clone(),
                pending.max_hold,
                managers.clone(),
                rng,
                pending.interrupt.clone(),
            );

            tracing::info!(user = %pending.name, "starting user");
            let spawned = thread::Builder::new()
                .name(format!("user {}", pending.name))
                .spawn(move || user.run());

            match spawned {
                Ok(handle) => handles.push((pending.name.clone(), handle)),
                Err(source) => {
                    self.interrupts.interrupt_all();
                    // Results don't matter, the run has already failed
                    let _ = join_all(handles);
                    return Err(SystemError::Spawn {
                        user: pending.name.clone(),
                        source,
                    });
                }
            }
        }

        let users = join_all(handles)?;
        tracing::info!("all users finished");

        let resources = self
            .managers
            .iter()
            .map(|m| ResourceReport {
                name: m.resource_name().to_string(),
                initial_uses: m.basic().initial_uses(),
                uses_left: m.basic().uses_left(),
            })
            .collect();

        Ok(RunReport { users, resources })
    }
}

impl Default for ResourceSystem {
    fn default() -> Self {
        Self::new()
    }
}

type UserHandle = JoinHandle<Result<UserReport, ResourceError>>;

/// Join every user before reporting the first failure
fn join_all(handles: Vec<(String, UserHandle)>) -> Result<Vec<UserReport>, SystemError> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for (name, handle) in handles {
        match handle.join() {
            Ok(Ok(report)) => {
                tracing::info!(user = %name, cycles = report.cycles, uses = report.uses, "user has finished");
                reports.push(report);
            }
            Ok(Err(source)) => {
                tracing::error!(user = %name, error = %source, "user failed");
                first_error.get_or_insert(SystemError::User { user: name, source });
            }
            Err(_) => {
                tracing::error!(user = %name, "user panicked");
                first_error.get_or_insert(SystemError::Panicked(name));
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
