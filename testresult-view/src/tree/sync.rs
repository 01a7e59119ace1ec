// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{GroupIndex, NodeId, ResultTree};
use crate::{
    config::TreeConfig,
    observer::{Observers, SubscriptionId},
    record::TestRecord,
    store::StoreEvent,
};
use debug_ignore::DebugIgnore;
use tracing::{debug, trace};

/// A structural change to a [`ResultTree`].
///
/// Positions are indexes into the parent's children at the time of the change: for groups,
/// among the root's children; for leaves, among the group's children.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TreeEvent {
    /// A group was appended to the root.
    GroupInserted {
        /// The new group.
        group: NodeId,
        /// The group's position.
        index: usize,
    },

    /// A leaf was appended to a group.
    LeafInserted {
        /// The owning group.
        group: NodeId,
        /// The new leaf.
        leaf: NodeId,
        /// The leaf's position within the group.
        index: usize,
    },

    /// A leaf was removed from a group.
    LeafRemoved {
        /// The owning group.
        group: NodeId,
        /// The removed leaf.
        leaf: NodeId,
        /// The position the leaf was removed from.
        index: usize,
    },

    /// A group was removed from the root after its last leaf went away.
    GroupRemoved {
        /// The removed group.
        group: NodeId,
        /// The position the group was removed from.
        index: usize,
    },
}

type TreeCallback = dyn FnMut(&TreeEvent, &ResultTree);

/// Keeps a [`ResultTree`] and its [`GroupIndex`] in lock-step with store events.
///
/// Every event is applied fully, index and structure both, before tree subscribers are told
/// about it. Subscribers are called once per structural change, in the order the changes
/// happen, and see the tree as it is right after that change.
#[derive(Debug)]
pub struct TreeSync {
    tree: ResultTree,
    index: GroupIndex,
    config: TreeConfig,
    observers: DebugIgnore<Observers<TreeCallback>>,
}

impl TreeSync {
    /// Creates an empty tree.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            tree: ResultTree::new(),
            index: GroupIndex::new(),
            config,
            observers: DebugIgnore(Observers::new()),
        }
    }

    /// Returns the tree.
    pub fn tree(&self) -> &ResultTree {
        &self.tree
    }

    /// Returns the class name index.
    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    /// Subscribes to structural changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&TreeEvent, &ResultTree) + 'static,
    ) -> SubscriptionId {
        self.observers.insert(Box::new(callback))
    }

    /// Ends a subscription. Returns true if `id` was subscribed to this tree.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Applies a store event.
    pub fn apply(&mut self, event: StoreEvent<'_>) {
        match event {
            StoreEvent::Added(record) => self.on_added(record),
            StoreEvent::Removed(record) => self.on_removed(record),
        }
    }

    /// Adds a leaf for `record`, creating its group first if the class is new.
    pub fn on_added(&mut self, record: &TestRecord) {
        let existing = self
            .index
            .get(&record.class_name)
            .and_then(|id| self.tree.group_position(id));

        let (group, position) = match existing {
            Some(position) => (self.tree.groups[position].id, position),
            None => {
                let (group, position) = self.tree.push_group(record, self.config.expand_groups);
                self.index.register(record.class_name.clone(), group);
                debug!("created group {group} for class {}", record.class_name);
                self.publish(TreeEvent::GroupInserted {
                    group,
                    index: position,
                });
                (group, position)
            }
        };

        let (leaf, index) =
            self.tree
                .push_leaf(position, record.clone(), self.config.expand_leaves);
        trace!("added leaf {leaf} for {} to group {group}", record.key());
        self.publish(TreeEvent::LeafInserted { group, leaf, index });
    }

    /// Removes a leaf of the class of `record`, and the group too if that was its last leaf.
    ///
    /// The leaf removed is the first one in the group whose class name matches; the test name
    /// is not consulted. Does nothing if there is no group for the class.
    pub fn on_removed(&mut self, record: &TestRecord) {
        let Some((group, position)) = self
            .index
            .get(&record.class_name)
            .and_then(|id| Some((id, self.tree.group_position(id)?)))
        else {
            trace!("no group for class {}, ignoring removal", record.class_name);
            return;
        };

        if let Some((leaf, index)) = self
            .tree
            .remove_first_leaf_of_class(position, &record.class_name)
        {
            trace!(
                "removed leaf {} ({}) from group {group}",
                leaf.id(),
                leaf.record().key()
            );
            self.publish(TreeEvent::LeafRemoved {
                group,
                leaf: leaf.id(),
                index,
            });
        }

        if self.tree.groups[position].children.is_empty() {
            self.tree.remove_group(position);
            self.index.deregister(&record.class_name);
            debug!("removed group {group} for class {}", record.class_name);
            self.publish(TreeEvent::GroupRemoved {
                group,
                index: position,
            });
        }
    }

    fn publish(&mut self, event: TreeEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event, &self.tree);
        }
    }
}
