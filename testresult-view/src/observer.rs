// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription bookkeeping shared by every publisher in this crate.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a single subscription.
///
/// Returned by every `subscribe` method, and passed back to the matching `unsubscribe` to end the
/// subscription. Ids are never reused, so an id obtained from one publisher never matches a
/// subscription on another.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}

/// An ordered list of callbacks. Callbacks run in subscription order.
pub(crate) struct Observers<F: ?Sized> {
    entries: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Observers<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, callback: Box<F>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.entries.push((id, callback));
        id
    }

    /// Returns true if a subscription was removed.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut F> {
        self.entries.iter_mut().map(|(_, callback)| &mut **callback)
    }
}
