// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage accounting shared by every resource manager
//!
//! Tracks the remaining usage budget, the number of users waiting at each
//! priority, and guards against two users being inside a use at once.

use crate::error::ResourceError;
use crate::interrupt::Interrupt;
use crate::priority::{Priority, MAX_PRIORITY, PRIORITY_LEVELS};
use crate::resource::Resource;
use rand::Rng;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Number of users waiting at each priority level.
///
/// Lives inside the arbiter's locked state, so holding a `&mut` to it means
/// holding the lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitingCounts {
    counts: [u32; PRIORITY_LEVELS],
}

impl WaitingCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note one more waiter at `priority`; returns the new count
    pub fn increase(&mut self, priority: Priority) -> u32 {
        let count = &mut self.counts[priority.index()];
        *count += 1;
        *count
    }

    /// Note one fewer waiter at `priority`; returns the new count.
    /// Never goes below zero.
    pub fn decrease(&mut self, priority: Priority) -> u32 {
        let count = &mut self.counts[priority.index()];
        *count = count.saturating_sub(1);
        *count
    }

    pub fn get(&self, priority: Priority) -> u32 {
        self.counts[priority.index()]
    }

    /// The highest level with anyone waiting
    pub fn highest(&self) -> Option<Priority> {
        Priority::all().rev().find(|p| self.get(*p) > 0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn as_array(&self) -> [u32; PRIORITY_LEVELS] {
        self.counts
    }
}

/// Accounting half of a resource manager.
///
/// Not a synchronization primitive: [`use_resource`](Self::use_resource)
/// assumes the caller already holds the resource through request/release.
#[derive(Debug)]
pub struct BasicResourceManager {
    resource: Resource,
    initial_uses: u32,
    uses_left: AtomicU32,
    users: AtomicU32,
}

impl BasicResourceManager {
    /// Budget drawn uniformly from `1..=max_uses`
    pub fn new(resource: Resource, max_uses: NonZeroU32) -> Self {
        Self::with_rng(resource, max_uses, &mut rand::thread_rng())
    }

    pub fn with_rng(resource: Resource, max_uses: NonZeroU32, rng: &mut impl Rng) -> Self {
        let uses = rng.gen_range(1..=max_uses.get());
        Self::with_exact_uses(resource, uses)
    }

    /// Fixed budget of exactly `uses`
    pub fn with_exact_uses(resource: Resource, uses: u32) -> Self {
        tracing::debug!(resource = %resource.name(), uses, "resource budget set");
        Self {
            resource,
            initial_uses: uses,
            uses_left: AtomicU32::new(uses),
            users: AtomicU32::new(0),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }

    pub fn random_priority(&self) -> Priority {
        let level = rand::thread_rng().gen_range(0..=MAX_PRIORITY);
        Priority::new(level).unwrap_or(Priority::HIGHEST)
    }

    pub fn initial_uses(&self) -> u32 {
        self.initial_uses
    }

    pub fn uses_left(&self) -> u32 {
        self.uses_left.load(Ordering::SeqCst)
    }

    pub fn uses_made(&self) -> u32 {
        self.initial_uses - self.uses_left()
    }

    pub fn is_exhausted(&self) -> bool {
        self.uses_left() == 0
    }

    /// Use the resource for `duration` and charge one use against the budget.
    ///
    /// Fails with [`ResourceError::Busy`] if another user is already inside.
    /// Using an exhausted resource is logged and otherwise does nothing.
    pub fn use_resource(&self, duration: Duration, interrupt: &Interrupt) -> Result<(), ResourceError> {
        let occupant = Occupant::enter(&self.users);
        if occupant.others > 0 {
            return Err(ResourceError::Busy {
                resource: self.resource.name().to_string(),
                user: current_user(),
            });
        }

        if self.is_exhausted() {
            tracing::warn!(
                resource = %self.resource.name(),
                user = %current_user(),
                "cannot use resource, it is exhausted"
            );
        } else {
            self.resource.use_for(duration, interrupt);
            self.charge_use();
        }

        tracing::info!(resource = %self.resource.name(), uses_left = self.uses_left(), "uses left");
        Ok(())
    }

    /// Take one use off the budget. Returns `false`, and logs, if it was
    /// already spent.
    fn charge_use(&self) -> bool {
        // Only one occupant gets here, so no concurrent decrement.
        let charged = self
            .uses_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if charged.is_err() {
            tracing::warn!(
                resource = %self.resource.name(),
                user = %current_user(),
                "use not charged, budget already exhausted"
            );
        }
        charged.is_ok()
    }
}

/// Counts a user in on creation and back out on drop, error paths included
struct Occupant<'a> {
    users: &'a AtomicU32,
    others: u32,
}

impl<'a> Occupant<'a> {
    fn enter(users: &'a AtomicU32) -> Self {
        let others = users.fetch_add(1, Ordering::SeqCst);
        Self { users, others }
    }
}

impl Drop for Occupant<'_> {
    fn drop(&mut self) {
        self.users.fetch_sub(1, Ordering::SeqCst);
    }
}

fn current_user() -> String {
    std::thread::current()
        .name()
        .unwrap_or("<unnamed>")
        .to_string()
}

#[cfg(test)]
#[path = "basic_tests.rs"]
mod tests;
