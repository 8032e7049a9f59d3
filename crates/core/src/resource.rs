// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A named resource that users take turns to use
//!
//! A resource does no concurrency control of its own. Its manager makes sure
//! only one user is inside [`Resource::use_for`] at a time.

use crate::interrupt::Interrupt;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    name: String,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Use the resource for `duration`, blocking the calling thread.
    ///
    /// An interrupt ends the use early; that is not an error.
    pub fn use_for(&self, duration: Duration, interrupt: &Interrupt) {
        let current = std::thread::current();
        let user = current.name().unwrap_or("<unnamed>");

        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(resource = %self.name, user, duration_ms, "started using");
        if !interrupt.sleep(duration) {
            tracing::debug!(resource = %self.name, user, "use cut short by interrupt");
        }
        tracing::info!(resource = %self.name, user, "finished using");
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource \"{}\"", self.name)
    }
}
