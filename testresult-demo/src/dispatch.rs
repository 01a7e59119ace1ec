// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    output::OutputOpts,
    render::{TextRenderer, selected_value_str},
    sample,
};
use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use std::{cell::Cell, rc::Rc};
use testresult_view::{NodeId, ResultTree, TestRecord, TestResultView, ViewConfig};
use tracing::{debug, info, warn};

/// Shows sample test results grouped by class, and the value a selection produces.
#[derive(Debug, Parser)]
#[command(version)]
pub(crate) struct DemoApp {
    /// View configuration file
    #[arg(long = "config", value_name = "PATH", env = "TESTRESULT_VIEW_CONFIG")]
    config_file: Option<Utf8PathBuf>,

    /// Records to remove after loading
    #[arg(long, value_name = "CLASS::TEST")]
    remove: Vec<String>,

    /// Node to select after loading: a class, or a test within a class
    #[arg(long, value_name = "CLASS[::TEST]")]
    select: Option<String>,

    /// Width of the printed tree, in columns
    #[arg(long, default_value_t = 60)]
    width: usize,

    #[command(flatten)]
    output: OutputOpts,
}

impl DemoApp {
    /// Executes the app.
    pub(crate) fn exec(self) -> Result<()> {
        let output = self.output.init();
        let styles = output.stdout_styles();

        let config = match &self.config_file {
            Some(path) => ViewConfig::from_path(path)
                .wrap_err_with(|| format!("failed to load view config from `{path}`"))?,
            None => ViewConfig::default(),
        };

        let mut view = TestResultView::with_config(&config);

        let tree_events = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&tree_events);
        view.subscribe_tree(move |event, tree| {
            counter.set(counter.get() + 1);
            debug!("tree event {event:?}, now {} groups", tree.len());
        });

        let selected_styles = styles.clone();
        view.subscribe_selected(move |_, new| {
            print!("{}", selected_value_str(&selected_styles, new));
        });

        sample::load(&mut view).wrap_err("failed to load sample results")?;

        for spec in &self.remove {
            let record = parse_record_spec(spec)?;
            if !view.remove(&record) {
                warn!("no record {} to remove", record.key());
            }
        }

        let mut renderer = TextRenderer::new(&styles, self.width);
        view.tree().render(&mut renderer);
        print!("{}", renderer.finish());

        if let Some(spec) = &self.select {
            let node = find_node(&view.tree(), spec)
                .ok_or_else(|| eyre!("no class or test matching `{spec}`"))?;
            view.select(Some(node));
        }

        info!(
            "{} records in {} groups ({} tree events)",
            view.store().len(),
            view.tree().len(),
            tree_events.get(),
        );
        Ok(())
    }
}

/// Splits `CLASS::TEST` at the last `::`, since class names may contain `::` themselves.
fn split_spec(spec: &str) -> Option<(&str, &str)> {
    spec.rsplit_once("::")
        .filter(|(class_name, test_name)| !class_name.is_empty() && !test_name.is_empty())
}

fn parse_record_spec(spec: &str) -> Result<TestRecord> {
    let (class_name, test_name) =
        split_spec(spec).ok_or_else(|| eyre!("expected `CLASS::TEST`, found `{spec}`"))?;
    Ok(TestRecord::new(class_name, test_name))
}

/// Finds the node for `spec`. A spec naming a class selects its group; otherwise it is
/// interpreted as `CLASS::TEST` and selects that leaf.
fn find_node(tree: &ResultTree, spec: &str) -> Option<NodeId> {
    if let Some(group) = tree.group(spec) {
        return Some(group.id());
    }
    let (class_name, test_name) = split_spec(spec)?;
    tree.group(class_name)?
        .children()
        .iter()
        .find(|leaf| leaf.record().test_name == test_name)
        .map(|leaf| leaf.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult_view::NodeRef;

    fn sample_view() -> TestResultView {
        let mut view = TestResultView::new();
        view.add(TestRecord::new("storage::tests", "test_round_trip"));
        view.add(TestRecord::new("ParserTest", "parses_empty_input"));
        view
    }

    #[test_case("storage::tests", Some(("storage::tests", "")) ; "class containing separator")]
    #[test_case("storage::tests::test_round_trip", Some(("storage::tests", "test_round_trip")) ; "leaf")]
    #[test_case("ParserTest", Some(("ParserTest", "")) ; "plain class")]
    #[test_case("ParserTest::missing", None ; "missing test")]
    #[test_case("Missing", None ; "missing class")]
    fn find_node_by_spec(spec: &str, expected: Option<(&str, &str)>) {
        let view = sample_view();
        let tree = view.tree();
        let found = find_node(&tree, spec).map(|id| match tree.get(id) {
            Some(NodeRef::Group(group)) => (group.class_name().to_owned(), String::new()),
            Some(NodeRef::Leaf { group, leaf }) => (
                group.class_name().to_owned(),
                leaf.record().test_name.clone(),
            ),
            other => panic!("unexpected node {other:?}"),
        });
        assert_eq!(
            found,
            expected.map(|(class_name, test_name)| (class_name.to_owned(), test_name.to_owned()))
        );
    }

    #[test_case("a::b", Some(("a", "b")) ; "simple")]
    #[test_case("a::b::c", Some(("a::b", "c")) ; "nested class")]
    #[test_case("a::", None ; "empty test")]
    #[test_case("no-separator", None ; "no separator")]
    fn split(spec: &str, expected: Option<(&str, &str)>) {
        assert_eq!(split_spec(spec), expected);
    }
}
