// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two-level tree of results: a hidden root, one group per class, and one leaf per record.
//!
//! The tree is a plain data structure, independent of how it is drawn. It is only ever mutated
//! by [`TreeSync`] in response to store events; everything else gets read-only access.
//!
//! Groups appear in the order their class was first seen, and leaves within a group appear in
//! the order they were added. Nothing is ever re-sorted.

mod index;
mod sync;

pub use index::GroupIndex;
pub use sync::{TreeEvent, TreeSync};

use crate::record::TestRecord;
use std::fmt;

/// Identifies a node in a [`ResultTree`].
///
/// Ids are allocated when a node is created and never reused, so a stale id (for a node that
/// has since been removed) simply fails to resolve.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u64);

impl NodeId {
    /// The id of the hidden root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns true if this is the root's id.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A leaf node, wrapping exactly one record.
#[derive(Clone, Debug)]
pub struct LeafNode {
    id: NodeId,
    record: TestRecord,
    expanded: bool,
}

impl LeafNode {
    /// Returns this node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the wrapped record.
    pub fn record(&self) -> &TestRecord {
        &self.record
    }

    /// Returns true if this node is marked as expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// A group node, holding the leaves for every record of one class.
#[derive(Clone, Debug)]
pub struct GroupNode {
    id: NodeId,
    record: TestRecord,
    expanded: bool,
    children: Vec<LeafNode>,
}

impl GroupNode {
    /// Creates a group for the class of `first`, the record that caused the group to exist.
    ///
    /// The group's own record carries the class name, and the duration and failure flag of
    /// `first`. The test name and description are empty.
    fn new(id: NodeId, first: &TestRecord, expanded: bool) -> Self {
        let mut record = TestRecord::new(first.class_name.clone(), "");
        record
            .set_duration_ms(first.duration_ms)
            .set_failed(first.failed);
        Self {
            id,
            record,
            expanded,
            children: Vec::new(),
        }
    }

    /// Returns this node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the class name this group is keyed by.
    pub fn class_name(&self) -> &str {
        &self.record.class_name
    }

    /// Returns the group's own record.
    ///
    /// This is fixed when the group is created and is not recomputed as leaves come and go.
    pub fn record(&self) -> &TestRecord {
        &self.record
    }

    /// Returns true if this node is marked as expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Returns the leaves of this group, in insertion order.
    pub fn children(&self) -> &[LeafNode] {
        &self.children
    }

    /// Returns the leaf with the given id, if it belongs to this group.
    pub fn leaf(&self, id: NodeId) -> Option<&LeafNode> {
        self.children.iter().find(|leaf| leaf.id == id)
    }
}

/// A node resolved from a [`NodeId`].
#[derive(Copy, Clone, Debug)]
pub enum NodeRef<'a> {
    /// The hidden root.
    Root,

    /// A group, whose parent is the root.
    Group(&'a GroupNode),

    /// A leaf, together with the group that owns it.
    Leaf {
        /// The owning group.
        group: &'a GroupNode,

        /// The leaf.
        leaf: &'a LeafNode,
    },
}

impl NodeRef<'_> {
    /// Returns the id of this node.
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Root => NodeId::ROOT,
            NodeRef::Group(group) => group.id,
            NodeRef::Leaf { leaf, .. } => leaf.id,
        }
    }

    /// Returns the id of this node's parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            NodeRef::Root => None,
            NodeRef::Group(_) => Some(NodeId::ROOT),
            NodeRef::Leaf { group, .. } => Some(group.id),
        }
    }
}

/// One visible line of a flattened [`ResultTree`].
#[derive(Copy, Clone, Debug)]
pub enum TreeRow<'a> {
    /// A group row.
    Group(&'a GroupNode),

    /// A leaf row, shown under its group.
    Leaf {
        /// The owning group.
        group: &'a GroupNode,

        /// The leaf.
        leaf: &'a LeafNode,
    },
}

impl TreeRow<'_> {
    /// Returns the nesting depth of this row: 0 for groups, 1 for leaves.
    pub fn depth(&self) -> usize {
        match self {
            TreeRow::Group(_) => 0,
            TreeRow::Leaf { .. } => 1,
        }
    }

    /// Returns the id of the node shown on this row.
    pub fn id(&self) -> NodeId {
        match self {
            TreeRow::Group(group) => group.id,
            TreeRow::Leaf { leaf, .. } => leaf.id,
        }
    }
}

/// Draws the nodes of a [`ResultTree`].
///
/// Implemented by presentation layers and driven by [`ResultTree::render`].
pub trait NodeRenderer {
    /// Draws a group row.
    fn render_group(&mut self, group: &GroupNode);

    /// Draws a leaf row belonging to `group`.
    fn render_leaf(&mut self, group: &GroupNode, leaf: &LeafNode);
}

/// The tree of results. The root is implicit: its children are the groups.
#[derive(Clone, Debug)]
pub struct ResultTree {
    groups: Vec<GroupNode>,
    next_id: u64,
}

impl Default for ResultTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTree {
    pub(crate) fn new() -> Self {
        Self {
            groups: Vec::new(),
            // 0 is reserved for the root.
            next_id: 1,
        }
    }

    /// Returns the groups, in the order their classes were first seen.
    pub fn groups(&self) -> &[GroupNode] {
        &self.groups
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the tree has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the total number of leaves across all groups.
    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(|group| group.children.len()).sum()
    }

    /// Returns the group for `class_name`, if any.
    pub fn group(&self, class_name: &str) -> Option<&GroupNode> {
        self.groups
            .iter()
            .find(|group| group.class_name() == class_name)
    }

    /// Resolves `id` to a node.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        if id.is_root() {
            return Some(NodeRef::Root);
        }
        self.groups.iter().find_map(|group| {
            if group.id == id {
                Some(NodeRef::Group(group))
            } else {
                group.leaf(id).map(|leaf| NodeRef::Leaf { group, leaf })
            }
        })
    }

    /// Returns the id of the parent of `id`, or `None` if `id` is the root or doesn't exist.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent()
    }

    /// Flattens the tree into the rows a list-based view would show.
    ///
    /// Each group is followed by its leaves if it is expanded.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::with_capacity(self.groups.len() + self.leaf_count());
        for group in &self.groups {
            rows.push(TreeRow::Group(group));
            if group.expanded {
                rows.extend(
                    group
                        .children
                        .iter()
                        .map(|leaf| TreeRow::Leaf { group, leaf }),
                );
            }
        }
        rows
    }

    /// Walks the visible rows in order, handing each to `renderer`.
    pub fn render<R: NodeRenderer + ?Sized>(&self, renderer: &mut R) {
        for row in self.rows() {
            match row {
                TreeRow::Group(group) => renderer.render_group(group),
                TreeRow::Leaf { group, leaf } => renderer.render_leaf(group, leaf),
            }
        }
    }

    // ---
    // Mutations, used by TreeSync
    // ---

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn group_position(&self, id: NodeId) -> Option<usize> {
        self.groups.iter().position(|group| group.id == id)
    }

    /// Appends a new group for the class of `first`, returning its id and position.
    fn push_group(&mut self, first: &TestRecord, expanded: bool) -> (NodeId, usize) {
        let id = self.alloc_id();
        self.groups.push(GroupNode::new(id, first, expanded));
        (id, self.groups.len() - 1)
    }

    /// Appends a leaf to the group at `position`, returning its id and position in the group.
    fn push_leaf(
        &mut self,
        position: usize,
        record: TestRecord,
        expanded: bool,
    ) -> (NodeId, usize) {
        let id = self.alloc_id();
        let group = &mut self.groups[position];
        group.children.push(LeafNode {
            id,
            record,
            expanded,
        });
        (id, group.children.len() - 1)
    }

    /// Removes the first leaf of the group at `position` whose record has class `class_name`.
    ///
    /// Only the class name is compared, not the test name.
    fn remove_first_leaf_of_class(
        &mut self,
        position: usize,
        class_name: &str,
    ) -> Option<(LeafNode, usize)> {
        let children = &mut self.groups[position].children;
        let index = children
            .iter()
            .position(|leaf| leaf.record.class_name == class_name)?;
        Some((children.remove(index), index))
    }

    fn remove_group(&mut self, position: usize) -> GroupNode {
        self.groups.remove(position)
    }
}
