// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feeds sample test results into a `TestResultView`, prints the tree, and shows the value that
//! selecting a node produces.

mod dispatch;
mod output;
mod render;
mod sample;

use clap::Parser;
use color_eyre::Result;
use dispatch::DemoApp;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = enable_ansi_support::enable_ansi_support();

    DemoApp::parse().exec()
}
