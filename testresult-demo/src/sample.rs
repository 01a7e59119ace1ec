// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample results fed into the view, through each of the ways records can arrive.

use color_eyre::eyre::Result;
use quick_junit::{NonSuccessKind, TestCase, TestCaseStatus};
use std::time::Duration;
use testresult_view::{DelimitedAdapter, JunitAdapter, TestRecord, TestResultView};
use tracing::debug;

/// Lines in the `class::test::description::duration_ms::failed` form.
static DELIMITED_RESULTS: &[&str] = &[
    "ParserTest::parses_empty_input::::3::false",
    "ParserTest::rejects_unterminated_string::expected `\"`, found end of input::11::true",
];

pub(crate) fn load(view: &mut TestResultView) -> Result<()> {
    let mut direct = TestRecord::new("CalculatorTest", "adds_small_numbers");
    direct.set_duration_ms(4);
    view.add(direct);

    let mut direct = TestRecord::new("CalculatorTest", "divides_by_zero");
    direct
        .set_description("attempt to divide by zero")
        .set_duration_ms(9)
        .set_failed(true);
    view.add(direct);

    let adapter = DelimitedAdapter::default();
    for line in DELIMITED_RESULTS {
        view.add_with(*line, &adapter)?;
    }

    for test_case in junit_test_cases() {
        view.add_with(&test_case, &JunitAdapter)?;
    }

    debug!("loaded {} sample records", view.store().len());
    Ok(())
}

fn junit_test_cases() -> Vec<TestCase> {
    let mut passing = TestCase::new("test_round_trip", TestCaseStatus::success());
    passing
        .set_classname("storage::tests")
        .set_time(Duration::from_millis(38));

    let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
    status
        .set_message("assertion failed")
        .set_description("assertion `left == right` failed\n  left: 3\n right: 4");
    let mut failing = TestCase::new("test_compaction", status);
    failing
        .set_classname("storage::tests")
        .set_time(Duration::from_millis(415));

    let mut status = TestCaseStatus::skipped();
    status.set_message("ignored: requires network");
    let mut skipped = TestCase::new("test_remote_sync", status);
    skipped.set_classname("storage::tests");

    vec![passing, failing, skipped]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_builds_three_groups() {
        let mut view = TestResultView::new();
        load(&mut view).expect("sample data converts");

        let groups: Vec<_> = view
            .tree()
            .groups()
            .iter()
            .map(|group| (group.class_name().to_owned(), group.children().len()))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("CalculatorTest".to_owned(), 2),
                ("ParserTest".to_owned(), 2),
                ("storage::tests".to_owned(), 3),
            ]
        );
    }
}
