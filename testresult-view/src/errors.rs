// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testresult-view.
//!
//! Adding, removing and selecting canonical records can't fail. Errors only arise at the edges:
//! converting external items into records, and loading configuration.

use camino::{Utf8Path, Utf8PathBuf};
use std::num::ParseIntError;
use thiserror::Error;

/// An error that occurred while reading or parsing configuration.
#[derive(Debug, Error)]
#[error("failed to parse config at `{config_source}`")]
pub struct ConfigParseError {
    config_source: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_source: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_source: config_source.into(),
            kind,
        }
    }

    /// Returns where the configuration was being read from.
    pub fn config_source(&self) -> &Utf8Path {
        &self.config_source
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of a [`ConfigParseError`].
#[derive(Debug, Error)]
pub enum ConfigParseErrorKind {
    /// The configuration file could not be read.
    #[error("error reading config file")]
    Read(#[source] std::io::Error),

    /// The configuration was not valid TOML, or didn't match the expected schema.
    #[error("error deserializing TOML")]
    Toml(#[source] Box<toml::de::Error>),
}

/// An error that occurred while converting a delimited string into a record.
///
/// Returned by [`DelimitedAdapter`](crate::DelimitedAdapter).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DelimitedParseError {
    /// The input didn't contain the class name and test name.
    #[error("expected at least `<class>{delimiter}<test>`, found `{input}`")]
    MissingField {
        /// The input.
        input: String,
        /// The delimiter in use.
        delimiter: String,
    },

    /// The duration field wasn't a non-negative integer.
    #[error("invalid duration `{value}` in `{input}`")]
    InvalidDuration {
        /// The input.
        input: String,
        /// The duration field.
        value: String,
        /// The underlying parse error.
        #[source]
        error: ParseIntError,
    },

    /// The failed field wasn't `true` or `false`.
    #[error("invalid failed flag `{value}` in `{input}` (expected `true` or `false`)")]
    InvalidFailed {
        /// The input.
        input: String,
        /// The failed field.
        value: String,
    },

    /// The input had more fields than a record has.
    #[error("too many fields in `{input}` (expected at most {max})")]
    TooManyFields {
        /// The input.
        input: String,
        /// The maximum number of fields.
        max: usize,
    },
}

/// An error that occurred while converting a JUnit test case into a record.
///
/// Returned by [`JunitAdapter`](crate::JunitAdapter).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("JUnit test case `{name}` has no classname")]
pub struct JunitConvertError {
    name: String,
}

impl JunitConvertError {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the test case.
    pub fn name(&self) -> &str {
        &self.name
    }
}
