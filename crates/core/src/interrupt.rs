// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interruption tokens for blocked users
//!
//! Each user owns one [`Interrupt`]. Firing it makes a parked
//! `request_resource` fail and cuts a simulated use short. The flag is
//! sticky until [`Interrupt::clear`] is called.

use crate::priority::Priority;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

/// Something a token owner can be parked on
pub(crate) trait WakeParked: Send + Sync {
    /// Wake every waiter parked at `priority` so they re-check their tokens.
    /// Implementations must take the same lock the waiters park under.
    fn wake_level(&self, priority: Priority);
}

#[derive(Clone)]
struct ParkedOn {
    target: Weak<dyn WakeParked>,
    priority: Priority,
}

struct Inner {
    interrupted: AtomicBool,
    parked: Mutex<Option<ParkedOn>>,
    sleep_lock: Mutex<()>,
    sleep_cv: Condvar,
}

/// Cloneable interruption token
#[derive(Clone)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                interrupted: AtomicBool::new(false),
                parked: Mutex::new(None),
                sleep_lock: Mutex::new(()),
                sleep_cv: Condvar::new(),
            }),
        }
    }

    /// A token for callers that are never interrupted
    pub fn never() -> Self {
        Self::new()
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.inner.interrupted.store(false, Ordering::SeqCst);
    }

    /// Set the flag and wake the owner wherever it is blocked
    pub fn interrupt(&self) {
        self.inner.interrupted.store(true, Ordering::SeqCst);

        {
            let _sleep = self
                .inner
                .sleep_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.sleep_cv.notify_all();
        }

        // Clone out first: the waiter registers while holding the arbiter
        // lock, so never hold `parked` while taking it.
        let parked = self
            .inner
            .parked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(ParkedOn { target, priority }) = parked {
            if let Some(target) = target.upgrade() {
                target.wake_level(priority);
            }
        }
    }

    /// Sleep for `duration` unless interrupted first.
    ///
    /// Returns `true` if the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        // No representable deadline means wait until interrupted
        let deadline = Instant::now().checked_add(duration);
        let mut guard = self
            .inner
            .sleep_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while !self.is_interrupted() {
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }
                    self.inner
                        .sleep_cv
                        .wait_timeout(guard, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .inner
                    .sleep_cv
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
        false
    }

    /// Record where the owner is about to park. Cleared when the guard drops.
    pub(crate) fn park_on(&self, target: Weak<dyn WakeParked>, priority: Priority) -> ParkGuard<'_> {
        *self
            .inner
            .parked
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(ParkedOn { target, priority });
        ParkGuard { interrupt: self }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupt")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

pub(crate) struct ParkGuard<'a> {
    interrupt: &'a Interrupt,
}

impl Drop for ParkGuard<'_> {
    fn drop(&mut self) {
        *self
            .interrupt
            .inner
            .parked
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Interrupts every token registered with it
#[derive(Clone, Debug, Default)]
pub struct InterruptHandle {
    tokens: Arc<Mutex<Vec<Interrupt>>>,
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, token: Interrupt) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token);
    }

    pub fn interrupt_all(&self) {
        let tokens = self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for token in tokens {
            token.interrupt();
        }
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
