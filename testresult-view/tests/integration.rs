// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving a `TestResultView` the way a presentation layer would.

use pretty_assertions::assert_eq;
use quick_junit::{NonSuccessKind, TestCase, TestCaseStatus};
use std::{cell::RefCell, rc::Rc, time::Duration};
use testresult_view::{
    DelimitedAdapter, JunitAdapter, NodeId, TestRecord, TestResultView, TreeEvent, ViewConfig,
};

fn record(
    class_name: &str,
    test_name: &str,
    description: &str,
    duration_ms: u64,
    failed: bool,
) -> TestRecord {
    let mut record = TestRecord::new(class_name, test_name);
    record
        .set_description(description)
        .set_duration_ms(duration_ms)
        .set_failed(failed);
    record
}

fn shape(view: &TestResultView) -> Vec<(String, usize)> {
    view.tree()
        .groups()
        .iter()
        .map(|group| (group.class_name().to_owned(), group.children().len()))
        .collect()
}

fn group_id(view: &TestResultView, class_name: &str) -> NodeId {
    view.tree()
        .group(class_name)
        .map(|group| group.id())
        .unwrap_or_else(|| panic!("group {class_name} exists"))
}

#[test]
fn add_select_remove() {
    let mut view = TestResultView::new();
    assert!(view.add(record("ClassX", "testA", "d1", 10, false)));
    assert!(view.add(record("ClassX", "testB", "", 20, true)));
    assert!(view.add(record("ClassY", "testC", "d3", 5, false)));

    assert_eq!(
        shape(&view),
        vec![("ClassX".to_owned(), 2), ("ClassY".to_owned(), 1)]
    );

    let class_x = group_id(&view, "ClassX");
    view.select(Some(class_x));
    let selected = view.selected_value().expect("group selected");
    assert!(
        selected.same_contents(&record("ClassX", "", "d1", 10, false)),
        "unexpected aggregate: {selected:?}"
    );

    assert!(view.remove(&record("ClassY", "testC", "", 0, false)));
    assert_eq!(shape(&view), vec![("ClassX".to_owned(), 2)]);
    assert!(!view.index().contains("ClassY"));
}

#[test]
fn duplicate_add_is_idempotent() {
    let mut view = TestResultView::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    view.subscribe_tree(move |event, _| sink.borrow_mut().push(*event));

    assert!(view.add(record("ClassX", "testA", "d1", 10, false)));
    assert!(!view.add(record("ClassX", "testA", "other", 99, true)));

    assert_eq!(shape(&view), vec![("ClassX".to_owned(), 1)]);
    assert_eq!(view.store().len(), 1);
    assert_eq!(events.borrow().len(), 2);
    assert!(matches!(
        events.borrow()[0],
        TreeEvent::GroupInserted { index: 0, .. }
    ));
}

#[test]
fn removing_sole_record_removes_group() {
    let mut view = TestResultView::new();
    view.add(record("ClassX", "testA", "", 1, false));
    view.add(record("ClassY", "testB", "", 1, false));
    view.remove(&record("ClassX", "testA", "", 0, false));

    assert_eq!(shape(&view), vec![("ClassY".to_owned(), 1)]);

    // The class comes back at the end, not in its old position.
    view.add(record("ClassX", "testA", "", 1, false));
    assert_eq!(
        shape(&view),
        vec![("ClassY".to_owned(), 1), ("ClassX".to_owned(), 1)]
    );
}

#[test]
fn leaf_selection_and_observers() {
    let mut view = TestResultView::new();
    view.add(record("ClassX", "testA", "d1", 10, false));
    view.add(record("ClassX", "testB", "d2", 20, true));

    let descriptions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&descriptions);
    view.subscribe_selected(move |_, new| sink.borrow_mut().push(new.description.clone()));

    let leaf = view.tree().groups()[0].children()[1].id();
    view.select(Some(leaf));
    let selected = view.selected_value().expect("leaf selected");
    assert!(selected.same_contents(&record("ClassX", "testB", "d2", 20, true)));

    let group = group_id(&view, "ClassX");
    view.select(Some(group));
    view.select(None);

    assert_eq!(
        view.selected_value().map(|r| r.description.as_str()),
        Some("d1\n\nd2")
    );
    assert_eq!(*descriptions.borrow(), vec!["d2", "d1\n\nd2"]);
}

#[test]
fn adapters_feed_the_store() {
    let mut view = TestResultView::new();
    let delimited = DelimitedAdapter::default().with_default_failed(true);
    assert_eq!(
        view.add_with("BigShakTest::testMath::quick maths", &delimited),
        Ok(true)
    );

    let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
    status.set_description("assertion failed");
    let mut failing = TestCase::new("testIsHot", status);
    failing
        .set_classname("BigShakTest")
        .set_time(Duration::from_millis(120));
    assert_eq!(view.add_with(&failing, &JunitAdapter), Ok(true));

    let converted = |line: &str| -> Result<TestRecord, std::convert::Infallible> {
        Ok(TestRecord::new("Lines", line))
    };
    assert_eq!(view.add_with("first", &converted), Ok(true));

    assert_eq!(
        shape(&view),
        vec![("BigShakTest".to_owned(), 2), ("Lines".to_owned(), 1)]
    );

    let group = group_id(&view, "BigShakTest");
    view.select(Some(group));
    let selected = view.selected_value().expect("group selected");
    assert_eq!(selected.description, "quick maths\n\nassertion failed");
    // The group's own record came from the delimited record, which was added first.
    assert!(selected.failed);
    assert_eq!(selected.duration_ms, 0);

    assert_eq!(view.remove_with(&failing, &JunitAdapter), Ok(true));
    assert_eq!(view.remove_with("first", &converted), Ok(true));
    assert_eq!(shape(&view), vec![("BigShakTest".to_owned(), 1)]);
}

#[test]
fn collapsed_groups_from_config() {
    let config = ViewConfig::from_toml_str(
        "<test>",
        "[tree]\nexpand-groups = false\n[selection]\ndescription-separator = \"; \"\n",
    )
    .expect("config parses");
    let mut view = TestResultView::with_config(&config);
    view.add(record("ClassX", "testA", "a", 1, false));
    view.add(record("ClassX", "testB", "b", 1, false));

    assert_eq!(view.tree().rows().len(), 1, "only the group row is visible");

    let group = group_id(&view, "ClassX");
    view.select(Some(group));
    assert_eq!(
        view.selected_value().map(|r| r.description.as_str()),
        Some("a; b")
    );
}
