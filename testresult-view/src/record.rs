// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fmt,
    hash::{Hash, Hasher},
    time::Duration,
};

/// The result of executing a single test.
///
/// Two records are equal if and only if their `class_name` and `test_name` are equal. The
/// description, duration and failure flag are payload, and are not part of a record's identity:
/// a store holds at most one record per `(class_name, test_name)` pair.
#[derive(Clone, Debug, Default)]
pub struct TestRecord {
    /// The name of the class (or suite, or binary) the test belongs to.
    pub class_name: String,

    /// The name of the test within its class.
    pub test_name: String,

    /// Free-form text describing the result, typically a failure message.
    ///
    /// Empty if there is nothing to report.
    pub description: String,

    /// The time it took to execute the test, in milliseconds.
    pub duration_ms: u64,

    /// Whether the test failed.
    pub failed: bool,
}

impl TestRecord {
    /// Creates a new passing record with an empty description and zero duration.
    pub fn new(class_name: impl Into<String>, test_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            test_name: test_name.into(),
            description: String::new(),
            duration_ms: 0,
            failed: false,
        }
    }

    /// Creates a record with every field empty, zero or false.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Sets the duration in milliseconds.
    pub fn set_duration_ms(&mut self, duration_ms: u64) -> &mut Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the duration from a [`Duration`], saturating at `u64::MAX` milliseconds.
    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets whether the test failed.
    pub fn set_failed(&mut self, failed: bool) -> &mut Self {
        self.failed = failed;
        self
    }

    /// Returns the duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Returns the identity of this record.
    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            class_name: &self.class_name,
            test_name: &self.test_name,
        }
    }

    /// Returns true if every field, not just the identity, matches `other`.
    pub fn same_contents(&self, other: &Self) -> bool {
        self.key() == other.key()
            && self.description == other.description
            && self.duration_ms == other.duration_ms
            && self.failed == other.failed
    }
}

impl PartialEq for TestRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TestRecord {}

impl Hash for TestRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// The `(class_name, test_name)` pair identifying a [`TestRecord`].
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct RecordKey<'a> {
    /// The class name.
    pub class_name: &'a str,

    /// The test name.
    pub test_name: &'a str,
}

impl fmt::Display for RecordKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.test_name.is_empty() {
            write!(f, "{}", self.class_name)
        } else {
            write!(f, "{}::{}", self.class_name, self.test_name)
        }
    }
}
