// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The main structure in this crate is [`TestResultView`].

use crate::{
    adapter::RecordAdapter,
    config::ViewConfig,
    observer::SubscriptionId,
    record::TestRecord,
    selection::SelectionAggregator,
    store::ResultStore,
    tree::{GroupIndex, NodeId, ResultTree, TreeEvent, TreeSync},
};
use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

/// Test results grouped by class, kept in sync with a set of records.
///
/// Records go in through [`add`](Self::add) and [`remove`](Self::remove) (or their adapter
/// forms). Each call updates the store and the tree completely before it returns. A presentation
/// layer reads the tree, listens to [`subscribe_tree`](Self::subscribe_tree) to redraw, and calls
/// [`select`](Self::select) whenever the user moves the selection; the resulting value is
/// available through [`selected_value`](Self::selected_value).
///
/// Everything here runs on one thread: callbacks fire synchronously, in the order changes happen.
#[derive(Debug)]
pub struct TestResultView {
    store: ResultStore,
    sync: Rc<RefCell<TreeSync>>,
    selection: SelectionAggregator,
}

impl Default for TestResultView {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResultView {
    /// Creates an empty view with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&ViewConfig::default())
    }

    /// Creates an empty view with the given configuration.
    pub fn with_config(config: &ViewConfig) -> Self {
        let mut store = ResultStore::new();
        let sync = Rc::new(RefCell::new(TreeSync::new(config.tree)));

        // The store owns this subscription for as long as the view lives.
        let subscriber = Rc::clone(&sync);
        store.subscribe_events(move |event| subscriber.borrow_mut().apply(event));

        Self {
            store,
            sync,
            selection: SelectionAggregator::new(&config.selection),
        }
    }

    /// Adds a record. Returns false, and changes nothing, if an equal record is already present.
    pub fn add(&mut self, record: TestRecord) -> bool {
        self.store.add(record)
    }

    /// Removes the record equal to `record`. Returns false if there was none.
    pub fn remove(&mut self, record: &TestRecord) -> bool {
        self.store.remove(record)
    }

    /// Converts `item` with `adapter`, then adds the result.
    ///
    /// If conversion fails, the error is returned and nothing is changed.
    pub fn add_with<T, A>(&mut self, item: T, adapter: &A) -> Result<bool, A::Error>
    where
        A: RecordAdapter<T> + ?Sized,
    {
        let record = adapter.convert(item)?;
        Ok(self.add(record))
    }

    /// Converts `item` with `adapter`, then removes the result.
    ///
    /// If conversion fails, the error is returned and nothing is changed.
    pub fn remove_with<T, A>(&mut self, item: T, adapter: &A) -> Result<bool, A::Error>
    where
        A: RecordAdapter<T> + ?Sized,
    {
        let record = adapter.convert(item)?;
        Ok(self.remove(&record))
    }

    /// Reports a selection change from the presentation layer.
    ///
    /// `None` means the selection was cleared; the selected value is kept as it was.
    pub fn select(&mut self, node: Option<NodeId>) {
        let sync = self.sync.borrow();
        self.selection.on_selection_changed(sync.tree(), node);
    }

    /// Returns the selected value, or `None` if nothing has been selected yet.
    pub fn selected_value(&self) -> Option<&TestRecord> {
        self.selection.selected().get()
    }

    /// Subscribes to changes of the selected value.
    pub fn subscribe_selected(
        &mut self,
        callback: impl FnMut(Option<&TestRecord>, &TestRecord) + 'static,
    ) -> SubscriptionId {
        self.selection.selected_mut().subscribe(callback)
    }

    /// Ends a subscription made with [`subscribe_selected`](Self::subscribe_selected).
    pub fn unsubscribe_selected(&mut self, id: SubscriptionId) -> bool {
        self.selection.selected_mut().unsubscribe(id)
    }

    /// Subscribes to structural changes of the tree.
    ///
    /// The callback must not access this view; it is given the updated tree instead.
    pub fn subscribe_tree(
        &mut self,
        callback: impl FnMut(&TreeEvent, &ResultTree) + 'static,
    ) -> SubscriptionId {
        self.sync.borrow_mut().subscribe(callback)
    }

    /// Ends a subscription made with [`subscribe_tree`](Self::subscribe_tree).
    pub fn unsubscribe_tree(&mut self, id: SubscriptionId) -> bool {
        self.sync.borrow_mut().unsubscribe(id)
    }

    /// Returns the store.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Returns the tree.
    pub fn tree(&self) -> Ref<'_, ResultTree> {
        Ref::map(self.sync.borrow(), TreeSync::tree)
    }

    /// Returns the class name index.
    pub fn index(&self) -> Ref<'_, GroupIndex> {
        Ref::map(self.sync.borrow(), TreeSync::index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapter::DelimitedAdapter, errors::DelimitedParseError};
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_conversion_changes_nothing() {
        let mut view = TestResultView::new();
        let adapter = DelimitedAdapter::default();

        let error = view
            .add_with("missing-test-name", &adapter)
            .expect_err("conversion fails");
        assert!(matches!(error, DelimitedParseError::MissingField { .. }));
        assert!(view.store().is_empty());
        assert!(view.tree().is_empty());

        assert_eq!(view.add_with("C::t::desc", &adapter), Ok(true));
        assert_eq!(view.remove_with("C::t::4::bogus-duration", &adapter).ok(), None);
        assert_eq!(view.store().len(), 1);
        assert_eq!(view.remove_with("C::t", &adapter), Ok(true));
        assert!(view.tree().is_empty());
    }

    #[test]
    fn tree_subscribers_fire_within_the_call() {
        let mut view = TestResultView::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        view.subscribe_tree(move |event, _| sink.borrow_mut().push(*event));

        view.add(TestRecord::new("C", "t"));
        assert_eq!(events.borrow().len(), 2, "group and leaf inserted");
        view.add(TestRecord::new("C", "t"));
        assert_eq!(events.borrow().len(), 2, "duplicate add publishes nothing");
    }
}
