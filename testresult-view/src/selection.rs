// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Computes the selected value from the selected tree node.

use crate::{
    config::SelectionConfig,
    observer::{Observers, SubscriptionId},
    record::TestRecord,
    tree::{GroupNode, NodeId, NodeRef, ResultTree},
};
use debug_ignore::DebugIgnore;
use tracing::{debug, trace};

type SelectedCallback = dyn FnMut(Option<&TestRecord>, &TestRecord);

/// A read-only, observable value.
///
/// Subscribers are called with the previous and the new value whenever the value changes. A
/// change is any difference in any field, not just in the record's identity.
#[derive(Debug)]
pub struct SelectedValue {
    value: Option<TestRecord>,
    observers: DebugIgnore<Observers<SelectedCallback>>,
}

impl SelectedValue {
    fn new() -> Self {
        Self {
            value: None,
            observers: DebugIgnore(Observers::new()),
        }
    }

    /// Returns the current value, or `None` if nothing has been selected yet.
    pub fn get(&self) -> Option<&TestRecord> {
        self.value.as_ref()
    }

    /// Subscribes to changes. The callback receives the previous value and the new one.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(Option<&TestRecord>, &TestRecord) + 'static,
    ) -> SubscriptionId {
        self.observers.insert(Box::new(callback))
    }

    /// Ends a subscription. Returns true if `id` was subscribed to this value.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    fn set(&mut self, new: TestRecord) {
        let unchanged = self
            .value
            .as_ref()
            .is_some_and(|old| old.same_contents(&new));
        let old = self.value.replace(new);
        if unchanged {
            return;
        }

        if let Some(new) = &self.value {
            for observer in self.observers.iter_mut() {
                observer(old.as_ref(), new);
            }
        }
    }
}

/// Recomputes the selected value whenever the selection changes.
#[derive(Debug)]
pub struct SelectionAggregator {
    separator: String,
    selected: SelectedValue,
}

impl SelectionAggregator {
    /// Creates an aggregator with nothing selected.
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            separator: config.description_separator.clone(),
            selected: SelectedValue::new(),
        }
    }

    /// Returns the selected value.
    pub fn selected(&self) -> &SelectedValue {
        &self.selected
    }

    /// Returns the selected value, for subscribing.
    pub fn selected_mut(&mut self) -> &mut SelectedValue {
        &mut self.selected
    }

    /// Handles a selection change.
    ///
    /// * A leaf: the selected value becomes the leaf's record.
    /// * A group: the selected value becomes the group's aggregate, see [`aggregate_group`].
    /// * `None`, the root, or a node that no longer exists: the selection is treated as cleared,
    ///   and the previous value is kept.
    pub fn on_selection_changed(&mut self, tree: &ResultTree, node: Option<NodeId>) {
        let Some(id) = node else {
            trace!("selection cleared, keeping previous value");
            return;
        };

        match tree.get(id) {
            Some(NodeRef::Leaf { leaf, .. }) => {
                trace!("selected leaf {id} ({})", leaf.record().key());
                self.selected.set(leaf.record().clone());
            }
            Some(NodeRef::Group(group)) => {
                trace!("selected group {id} ({})", group.class_name());
                self.selected.set(aggregate_group(group, &self.separator));
            }
            Some(NodeRef::Root) => {
                debug!("root can't be selected, keeping previous value");
            }
            None => {
                debug!("selected node {id} no longer exists, keeping previous value");
            }
        }
    }
}

/// Builds the record that stands for a selected group.
///
/// The description is the non-empty descriptions of the group's leaves, in leaf order, joined by
/// `separator`. The class name, duration and failure flag come from the group's own record, and
/// the test name is empty. This is computed afresh every time.
pub fn aggregate_group(group: &GroupNode, separator: &str) -> TestRecord {
    let description = group
        .children()
        .iter()
        .map(|leaf| leaf.record().description.as_str())
        .filter(|description| !description.is_empty())
        .collect::<Vec<_>>()
        .join(separator);

    let own = group.record();
    let mut aggregate = TestRecord::new(own.class_name.clone(), "");
    aggregate
        .set_description(description)
        .set_duration_ms(own.duration_ms)
        .set_failed(own.failed);
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TreeConfig, tree::TreeSync};
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, rc::Rc};
    use test_case::test_case;

    fn record(class_name: &str, test_name: &str, description: &str) -> TestRecord {
        let mut record = TestRecord::new(class_name, test_name);
        record.set_description(description);
        record
    }

    fn sync_with(records: &[TestRecord]) -> TreeSync {
        let mut sync = TreeSync::new(TreeConfig::default());
        for record in records {
            sync.on_added(record);
        }
        sync
    }

    #[test_case(&["A", "", "B"], "A\n\nB" ; "skips empty")]
    #[test_case(&["", ""], "" ; "all empty")]
    #[test_case(&["only"], "only" ; "single")]
    #[test_case(&["x", "y", "z"], "x\n\ny\n\nz" ; "several")]
    fn group_description(descriptions: &[&str], expected: &str) {
        let records: Vec<_> = descriptions
            .iter()
            .enumerate()
            .map(|(i, description)| record("C", &format!("t{i}"), description))
            .collect();
        let sync = sync_with(&records);

        let aggregate = aggregate_group(&sync.tree().groups()[0], "\n\n");
        assert_eq!(aggregate.description, expected);
        assert_eq!(aggregate.class_name, "C");
        assert_eq!(aggregate.test_name, "");
    }

    #[test]
    fn leaf_selection_yields_record() {
        let mut leaf_record = record("C", "t", "leaf description");
        leaf_record.set_duration_ms(42).set_failed(true);
        let sync = sync_with(std::slice::from_ref(&leaf_record));
        let leaf = sync.tree().groups()[0].children()[0].id();

        let mut aggregator = SelectionAggregator::new(&SelectionConfig::default());
        aggregator.on_selection_changed(sync.tree(), Some(leaf));

        let selected = aggregator.selected().get().expect("value is set");
        assert!(selected.same_contents(&leaf_record));
    }

    #[test]
    fn cleared_or_stale_selection_keeps_value() {
        let mut sync = sync_with(&[record("C", "t", "d")]);
        let group = sync.tree().groups()[0].id();

        let mut aggregator = SelectionAggregator::new(&SelectionConfig::default());
        aggregator.on_selection_changed(sync.tree(), None);
        assert!(aggregator.selected().get().is_none());

        aggregator.on_selection_changed(sync.tree(), Some(group));
        let before = aggregator.selected().get().cloned().expect("value is set");

        sync.on_removed(&record("C", "t", ""));
        aggregator.on_selection_changed(sync.tree(), Some(group));
        aggregator.on_selection_changed(sync.tree(), Some(NodeId::ROOT));
        aggregator.on_selection_changed(sync.tree(), None);

        let after = aggregator.selected().get().expect("value is kept");
        assert!(after.same_contents(&before));
    }

    #[test]
    fn observers_see_changes_only() {
        let sync = sync_with(&[record("C", "t1", "one"), record("C", "t2", "two")]);
        let group = sync.tree().groups()[0].id();
        let leaf = sync.tree().groups()[0].children()[1].id();

        let mut aggregator = SelectionAggregator::new(&SelectionConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = aggregator.selected_mut().subscribe(move |old, new| {
            sink.borrow_mut().push((
                old.map(|old| old.key().to_string()),
                new.key().to_string(),
                new.description.clone(),
            ));
        });

        aggregator.on_selection_changed(sync.tree(), Some(group));
        // Same group, same contents: no notification.
        aggregator.on_selection_changed(sync.tree(), Some(group));
        aggregator.on_selection_changed(sync.tree(), Some(leaf));
        assert!(aggregator.selected_mut().unsubscribe(id));
        aggregator.on_selection_changed(sync.tree(), Some(group));

        assert_eq!(
            *seen.borrow(),
            vec![
                (None, "C".to_owned(), "one\n\ntwo".to_owned()),
                (Some("C".to_owned()), "C::t2".to_owned(), "two".to_owned()),
            ]
        );
    }

    #[test]
    fn group_aggregate_is_recomputed() {
        let mut sync = sync_with(&[record("C", "t1", "one")]);
        let group = sync.tree().groups()[0].id();
        let mut aggregator = SelectionAggregator::new(&SelectionConfig::default());

        aggregator.on_selection_changed(sync.tree(), Some(group));
        assert_eq!(aggregator.selected().get().map(|r| r.description.as_str()), Some("one"));

        sync.on_added(&record("C", "t2", "two"));
        aggregator.on_selection_changed(sync.tree(), Some(group));
        assert_eq!(
            aggregator.selected().get().map(|r| r.description.as_str()),
            Some("one\n\ntwo")
        );
    }

    #[test]
    fn custom_separator() {
        let sync = sync_with(&[record("C", "t1", "one"), record("C", "t2", "two")]);
        let config = SelectionConfig {
            description_separator: " | ".to_owned(),
        };
        let mut aggregator = SelectionAggregator::new(&config);
        aggregator.on_selection_changed(sync.tree(), Some(sync.tree().groups()[0].id()));
        assert_eq!(
            aggregator.selected().get().map(|r| r.description.as_str()),
            Some("one | two")
        );
    }
}
