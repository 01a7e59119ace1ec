// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The set of test results, and change notifications for it.

use crate::{
    observer::{Observers, SubscriptionId},
    record::TestRecord,
};
use debug_ignore::DebugIgnore;
use indexmap::IndexSet;
use tracing::trace;

/// A membership change in a [`ResultStore`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StoreEvent<'a> {
    /// A record was inserted.
    Added(&'a TestRecord),

    /// A record was removed. This is the record that was held by the store.
    Removed(&'a TestRecord),
}

impl<'a> StoreEvent<'a> {
    /// Returns the record this event is about.
    pub fn record(&self) -> &'a TestRecord {
        match self {
            StoreEvent::Added(record) | StoreEvent::Removed(record) => record,
        }
    }
}

type StoreCallback = dyn FnMut(StoreEvent<'_>);

/// Holds a set of [`TestRecord`]s, keyed by their `(class_name, test_name)` identity.
///
/// [`add`](Self::add) and [`remove`](Self::remove) are the only ways to change the set. Every
/// change that actually happens is published to subscribers synchronously, before the call
/// returns; calls that don't change the set publish nothing.
#[derive(Debug)]
pub struct ResultStore {
    records: IndexSet<TestRecord>,
    observers: DebugIgnore<Observers<StoreCallback>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: IndexSet::new(),
            observers: DebugIgnore(Observers::new()),
        }
    }

    /// Inserts `record` unless an equal record is already present.
    ///
    /// Returns true if the record was inserted. An equal record that is already present is kept
    /// as is, even if its payload differs.
    pub fn add(&mut self, record: TestRecord) -> bool {
        let (index, inserted) = self.records.insert_full(record);
        let record = &self.records[index];
        if !inserted {
            trace!("record {} already present, ignoring add", record.key());
            return false;
        }

        trace!("added record {}", record.key());
        for observer in self.observers.iter_mut() {
            observer(StoreEvent::Added(record));
        }
        true
    }

    /// Removes the record equal to `record`, if any.
    ///
    /// Returns true if a record was removed.
    pub fn remove(&mut self, record: &TestRecord) -> bool {
        let Some(removed) = self.records.shift_take(record) else {
            trace!("record {} not present, ignoring remove", record.key());
            return false;
        };

        trace!("removed record {}", removed.key());
        for observer in self.observers.iter_mut() {
            observer(StoreEvent::Removed(&removed));
        }
        true
    }

    /// Subscribes to membership changes, with one callback per kind of change.
    pub fn subscribe(
        &mut self,
        mut on_added: impl FnMut(&TestRecord) + 'static,
        mut on_removed: impl FnMut(&TestRecord) + 'static,
    ) -> SubscriptionId {
        self.subscribe_events(move |event| match event {
            StoreEvent::Added(record) => on_added(record),
            StoreEvent::Removed(record) => on_removed(record),
        })
    }

    /// Subscribes to membership changes with a single callback.
    pub fn subscribe_events(
        &mut self,
        callback: impl FnMut(StoreEvent<'_>) + 'static,
    ) -> SubscriptionId {
        self.observers.insert(Box::new(callback))
    }

    /// Ends a subscription. Returns true if `id` was subscribed to this store.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Returns true if a record equal to `record` is present.
    pub fn contains(&self, record: &TestRecord) -> bool {
        self.records.contains(record)
    }

    /// Returns the stored record equal to `record`, if any.
    pub fn get(&self, record: &TestRecord) -> Option<&TestRecord> {
        self.records.get(record)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records. The order carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = &TestRecord> {
        self.records.iter()
    }
}
