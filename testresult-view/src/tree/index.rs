// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::NodeId;
use indexmap::IndexMap;

/// Maps class names to the id of their group node.
///
/// This is a derived cache over the groups of a [`ResultTree`](super::ResultTree), maintained in
/// lock-step with it by [`TreeSync`](super::TreeSync). It is never a source of truth: a class is
/// registered exactly when the tree has a group for it, and entries are kept in group order.
#[derive(Clone, Debug, Default)]
pub struct GroupIndex {
    groups: IndexMap<String, NodeId>,
}

impl GroupIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the group id for `class_name`, if a group exists.
    pub fn get(&self, class_name: &str) -> Option<NodeId> {
        self.groups.get(class_name).copied()
    }

    /// Returns true if a group exists for `class_name`.
    pub fn contains(&self, class_name: &str) -> bool {
        self.groups.contains_key(class_name)
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over registered class names, in group order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub(super) fn register(&mut self, class_name: impl Into<String>, id: NodeId) {
        let class_name = class_name.into();
        debug_assert!(
            !self.groups.contains_key(&class_name),
            "class {class_name} registered twice"
        );
        self.groups.insert(class_name, id);
    }

    pub(super) fn deregister(&mut self, class_name: &str) -> Option<NodeId> {
        self.groups.shift_remove(class_name)
    }
}
