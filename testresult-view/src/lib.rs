// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test results grouped by class, kept in sync with a set of records.
//!
//! A [`ResultStore`] holds an unordered set of [`TestRecord`]s. A [`TreeSync`] listens to it and
//! maintains a two-level [`ResultTree`]: one group per class, each holding one leaf per record.
//! A [`SelectionAggregator`] turns the selected node into a selected value, synthesizing an
//! aggregate record when a whole group is selected. [`TestResultView`] wires these together.
//!
//! Drawing the tree is left to the caller: see [`NodeRenderer`] and [`ResultTree::rows`].

mod adapter;
pub mod config;
pub mod errors;
mod observer;
mod record;
mod selection;
mod store;
pub mod tree;
mod view;

pub use adapter::*;
pub use config::ViewConfig;
pub use observer::SubscriptionId;
pub use record::*;
pub use selection::*;
pub use store::*;
pub use tree::{
    GroupNode, LeafNode, NodeId, NodeRef, NodeRenderer, ResultTree, TreeEvent, TreeRow, TreeSync,
};
pub use view::*;
