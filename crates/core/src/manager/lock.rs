// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-based priority arbitration
//!
//! One mutex guards the occupancy flag and the waiting counts. Each priority
//! level has its own condition variable, all parked under that one mutex.
//!
//! A release moves one waiter's slot from `waiting[p]` to `wakeups[p]` and
//! signals level `p`. Parked users only leave their wait by taking a wake
//! token (or being interrupted), so spurious condvar wake-ups are harmless.
//! At any time `waiting[p] + wakeups[p]` is the number of users parked at `p`.
//!
//! Under [`FairnessPolicy::Barging`] occupancy is cleared on release, so a
//! newly arriving request can take the resource before the woken user gets
//! back in. The woken user then re-queues at its original priority and may
//! starve under sustained arrivals. [`FairnessPolicy::HandOff`] keeps the
//! resource occupied and grants it straight to the woken user.

use super::basic::{BasicResourceManager, WaitingCounts};
use super::ResourceManager;
use crate::error::ResourceError;
use crate::interrupt::{Interrupt, WakeParked};
use crate::priority::{Priority, PRIORITY_LEVELS};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// What a release does with occupancy when it wakes a waiter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FairnessPolicy {
    /// Clear occupancy; the woken user races new arrivals for it
    #[default]
    Barging,
    /// Keep occupancy set and grant it to the woken user
    HandOff,
}

impl fmt::Display for FairnessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FairnessPolicy::Barging => write!(f, "barging"),
            FairnessPolicy::HandOff => write!(f, "hand-off"),
        }
    }
}

#[derive(Debug, Default)]
struct ArbiterState {
    occupied: bool,
    waiting: WaitingCounts,
    wakeups: [u32; PRIORITY_LEVELS],
}

struct Arbiter {
    state: Mutex<ArbiterState>,
    queues: [Condvar; PRIORITY_LEVELS],
}

impl Arbiter {
    fn lock(&self) -> MutexGuard<'_, ArbiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand a wake token to the highest waiting level and signal one waiter there
    fn signal_highest(&self, state: &mut ArbiterState) -> Option<Priority> {
        let priority = state.waiting.highest()?;
        state.waiting.decrease(priority);
        state.wakeups[priority.index()] += 1;
        self.queues[priority.index()].notify_one();
        Some(priority)
    }
}

impl WakeParked for Arbiter {
    fn wake_level(&self, priority: Priority) {
        let _state = self.lock();
        self.queues[priority.index()].notify_all();
    }
}

/// Point-in-time view of an arbiter's state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbiterSnapshot {
    pub occupied: bool,
    pub waiting: [u32; PRIORITY_LEVELS],
}

/// Resource manager that arbitrates by priority with a mutex and per-level
/// wait-sets
pub struct LockResourceManager {
    basic: BasicResourceManager,
    policy: FairnessPolicy,
    arbiter: Arc<Arbiter>,
}

impl LockResourceManager {
    pub fn new(resource: Resource, max_uses: NonZeroU32) -> Self {
        Self::from_basic(BasicResourceManager::new(resource, max_uses))
    }

    pub fn from_basic(basic: BasicResourceManager) -> Self {
        Self {
            basic,
            policy: FairnessPolicy::default(),
            arbiter: Arc::new(Arbiter {
                state: Mutex::new(ArbiterState::default()),
                queues: std::array::from_fn(|_| Condvar::new()),
            }),
        }
    }

    pub fn with_policy(mut self, policy: FairnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FairnessPolicy {
        self.policy
    }

    pub fn basic(&self) -> &BasicResourceManager {
        &self.basic
    }

    pub fn is_occupied(&self) -> bool {
        self.arbiter.lock().occupied
    }

    /// Number of users counted as waiting at `priority`
    pub fn waiting(&self, priority: Priority) -> u32 {
        self.arbiter.lock().waiting.get(priority)
    }

    pub fn snapshot(&self) -> ArbiterSnapshot {
        let state = self.arbiter.lock();
        ArbiterSnapshot {
            occupied: state.occupied,
            waiting: state.waiting.as_array(),
        }
    }

    /// Park at `priority` until a wake token for that level is taken.
    fn park<'a>(
        &'a self,
        mut state: MutexGuard<'a, ArbiterState>,
        priority: Priority,
        interrupt: &Interrupt,
    ) -> Result<MutexGuard<'a, ArbiterState>, ResourceError> {
        let level = priority.index();
        loop {
            if interrupt.is_interrupted() {
                self.abandon(&mut state, priority);
                tracing::warn!(
                    resource = %self.basic.resource_name(),
                    %priority,
                    "interrupted while waiting"
                );
                return Err(ResourceError::Interrupted {
                    resource: self.basic.resource_name().to_string(),
                    priority: priority.level(),
                });
            }
            if state.wakeups[level] > 0 {
                state.wakeups[level] -= 1;
                return Ok(state);
            }
            state = self.arbiter.queues[level]
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Clean up after an interrupted waiter so no count or wake is leaked.
    fn abandon(&self, state: &mut ArbiterState, priority: Priority) {
        let level = priority.index();
        if state.waiting.get(priority) > 0 {
            state.waiting.decrease(priority);
        } else if state.wakeups[level] > 0 {
            // Every waiter at this level already holds a wake; decline one
            // and pass it on.
            state.wakeups[level] -= 1;
            match self.policy {
                FairnessPolicy::Barging => {
                    if !state.occupied {
                        self.arbiter.signal_highest(state);
                    }
                }
                FairnessPolicy::HandOff => {
                    if self.arbiter.signal_highest(state).is_none() {
                        state.occupied = false;
                    }
                }
            }
        }

        // notify_one may have picked this waiter; make sure a token left at
        // this level reaches someone.
        if state.wakeups[level] > 0 {
            self.arbiter.queues[level].notify_one();
        }
    }
}

impl ResourceManager for LockResourceManager {
    fn random_priority(&self) -> Priority {
        self.basic.random_priority()
    }

    fn resource_name(&self) -> &str {
        self.basic.resource_name()
    }

    fn is_exhausted(&self) -> bool {
        self.basic.is_exhausted()
    }

    fn request_resource(&self, priority: Priority, interrupt: &Interrupt) -> Result<(), ResourceError> {
        let mut state = self.arbiter.lock();

        if state.occupied {
            let target: Weak<dyn WakeParked> = Arc::downgrade(&self.arbiter) as Weak<dyn WakeParked>;
            let _parked = interrupt.park_on(target, priority);

            while state.occupied {
                let waiting = state.waiting.increase(priority);
                tracing::debug!(resource = %self.basic.resource_name(), %priority, waiting, "waiting");

                state = self.park(state, priority, interrupt)?;
                tracing::debug!(resource = %self.basic.resource_name(), %priority, "woken");

                if self.policy == FairnessPolicy::HandOff {
                    // Occupancy was kept set and handed to us
                    break;
                }
            }
        }

        state.occupied = true;
        tracing::debug!(resource = %self.basic.resource_name(), %priority, "acquired");
        Ok(())
    }

    fn use_resource(&self, duration: Duration, interrupt: &Interrupt) -> Result<(), ResourceError> {
        self.basic.use_resource(duration, interrupt)
    }

    fn release_resource(&self) -> Result<Option<Priority>, ResourceError> {
        let mut state = self.arbiter.lock();
        if !state.occupied {
            tracing::warn!(resource = %self.basic.resource_name(), "released while not occupied");
        }

        let woken = self.arbiter.signal_highest(&mut state);
        if !(self.policy == FairnessPolicy::HandOff && woken.is_some()) {
            state.occupied = false;
        }
        drop(state);

        tracing::debug!(
            resource = %self.basic.resource_name(),
            woken = Priority::level_or_none(woken),
            "released"
        );
        Ok(woken)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
