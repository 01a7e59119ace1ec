// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draws a result tree as text.

use crate::output::ResultStyles;
use owo_colors::OwoColorize;
use std::fmt::Write;
use testresult_view::{GroupNode, LeafNode, NodeRenderer, TestRecord};

/// Renders groups as headings and leaves as indented status lines.
///
/// Leaf lines are laid out as `<status> <test name> <duration>`, with durations right-aligned
/// to `width` columns.
pub(crate) struct TextRenderer<'a> {
    styles: &'a ResultStyles,
    width: usize,
    out: String,
}

impl<'a> TextRenderer<'a> {
    pub(crate) fn new(styles: &'a ResultStyles, width: usize) -> Self {
        Self {
            styles,
            width,
            out: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

impl NodeRenderer for TextRenderer<'_> {
    fn render_group(&mut self, group: &GroupNode) {
        let failed = group
            .children()
            .iter()
            .filter(|leaf| leaf.record().failed)
            .count();
        let _ = writeln!(
            self.out,
            "{} ({} tests, {} failed)",
            group.class_name().style(self.styles.group),
            group.children().len(),
            failed,
        );
    }

    fn render_leaf(&mut self, _group: &GroupNode, leaf: &LeafNode) {
        let record = leaf.record();
        let status = status_str(record);
        let duration = format!("{} ms", record.duration_ms);
        // Fixed columns: 2 indent, 4 status, 1 space, 1 space before the duration.
        let name_width = self
            .width
            .saturating_sub(2 + 4 + 1 + 1 + duration.len())
            .max(record.test_name.len());
        let status_style = if record.failed {
            self.styles.fail
        } else {
            self.styles.pass
        };
        let _ = writeln!(
            self.out,
            "  {} {:<name_width$} {}",
            status.style(status_style),
            record.test_name,
            duration.style(self.styles.duration),
        );
    }
}

fn status_str(record: &TestRecord) -> &'static str {
    if record.failed { "FAIL" } else { "PASS" }
}

/// Formats the selected value for display.
pub(crate) fn selected_value_str(styles: &ResultStyles, record: &TestRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} [{}, {} ms]",
        "selected:".style(styles.heading),
        record.key(),
        status_str(record),
        record.duration_ms,
    );
    if record.description.is_empty() {
        out.push_str("(no description)\n");
    } else {
        out.push_str(&record.description);
        out.push('\n');
    }
    out
}
