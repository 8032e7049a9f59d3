// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource managers
//!
//! This module provides:
//! - **BasicResourceManager** - usage budget, waiting counts and the
//!   single-occupant check around a use
//! - **LockResourceManager** - priority arbitration with one mutex and one
//!   wait-set per priority level

pub mod basic;
pub mod lock;

pub use basic::{BasicResourceManager, WaitingCounts};
pub use lock::{ArbiterSnapshot, FairnessPolicy, LockResourceManager};

use crate::error::ResourceError;
use crate::interrupt::Interrupt;
use crate::priority::Priority;
use std::time::Duration;

/// Arbitrates exclusive access to a single resource.
///
/// Users call [`request_resource`](Self::request_resource), then
/// [`use_resource`](Self::use_resource), then
/// [`release_resource`](Self::release_resource). Only one user may be between
/// a successful request and its release at any time.
pub trait ResourceManager: Send + Sync {
    /// A uniformly random priority in `0..=MAX_PRIORITY`
    fn random_priority(&self) -> Priority;

    fn resource_name(&self) -> &str;

    fn is_exhausted(&self) -> bool;

    /// Block until the resource is granted at `priority`.
    ///
    /// Fails with [`ResourceError::Interrupted`] if `interrupt` fires while
    /// parked; the resource was not acquired in that case.
    fn request_resource(&self, priority: Priority, interrupt: &Interrupt) -> Result<(), ResourceError>;

    /// Use the resource for `duration`. Must be bracketed by request and release.
    fn use_resource(&self, duration: Duration, interrupt: &Interrupt) -> Result<(), ResourceError>;

    /// Release the resource and wake one waiter at the highest waiting level.
    ///
    /// Returns the level that was woken, or `None` if nobody was waiting.
    fn release_resource(&self) -> Result<Option<Priority>, ResourceError>;
}
