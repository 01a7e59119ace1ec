// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for a [`TestResultView`](crate::TestResultView).
//!
//! Configuration is read from TOML. Every key is optional, and the defaults reproduce the
//! standard behavior:
//!
//! ```toml
//! [tree]
//! expand-groups = true
//! expand-leaves = true
//!
//! [selection]
//! description-separator = "\n\n"
//! ```
//!
//! Unknown keys are logged and otherwise ignored.

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// The separator placed between the descriptions of a group's leaves when the group is selected.
pub const DEFAULT_DESCRIPTION_SEPARATOR: &str = "\n\n";

/// Top-level configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ViewConfig {
    /// Settings for tree construction.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Settings for the selected value.
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Settings for tree construction.
#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct TreeConfig {
    /// Whether new group nodes start out expanded.
    pub expand_groups: bool,

    /// Whether new leaf nodes start out expanded.
    pub expand_leaves: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            expand_groups: true,
            expand_leaves: true,
        }
    }
}

/// Settings for the selected value.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct SelectionConfig {
    /// Placed between consecutive non-empty leaf descriptions when a group is selected.
    pub description_separator: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            description_separator: DEFAULT_DESCRIPTION_SEPARATOR.to_owned(),
        }
    }
}

impl ViewConfig {
    /// Parses configuration from a TOML string.
    ///
    /// `source` names where the string came from, and is used in warnings and errors.
    pub fn from_toml_str(source: &str, toml_str: &str) -> Result<Self, ConfigParseError> {
        let (config, unknown) = Self::deserialize_with_unknown(toml_str)
            .map_err(|error| ConfigParseError::new(source, ConfigParseErrorKind::Toml(error)))?;
        if !unknown.is_empty() {
            warn_unknown_keys(source, &unknown);
        }
        Ok(config)
    }

    /// Reads and parses configuration from a TOML file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigParseError> {
        let toml_str = std::fs::read_to_string(path.as_str())
            .map_err(|error| ConfigParseError::new(path, ConfigParseErrorKind::Read(error)))?;
        Self::from_toml_str(path.as_str(), &toml_str)
    }

    fn deserialize_with_unknown(
        toml_str: &str,
    ) -> Result<(Self, BTreeSet<String>), Box<toml::de::Error>> {
        let toml_de = toml::de::Deserializer::parse(toml_str).map_err(Box::new)?;
        let mut unknown = BTreeSet::new();
        let config: ViewConfig = serde_ignored::deserialize(toml_de, |path| {
            unknown.insert(path.to_string());
        })
        .map_err(Box::new)?;
        Ok((config, unknown))
    }
}

fn warn_unknown_keys(source: &str, unknown: &BTreeSet<String>) {
    let mut unknown_str = String::new();
    if unknown.len() == 1 {
        unknown_str.push_str("key: ");
        unknown_str.extend(unknown.iter().map(String::as_str));
    } else {
        unknown_str.push_str("keys:\n");
        for key in unknown {
            unknown_str.push_str("\n  - ");
            unknown_str.push_str(key);
        }
    }
    warn!("in config {source}, ignoring unknown configuration {unknown_str}");
}
