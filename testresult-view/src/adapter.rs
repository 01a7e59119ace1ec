// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converting external items into [`TestRecord`]s.
//!
//! A [`RecordAdapter`] turns an item of some external shape into a record before it reaches the
//! store. Any `Fn(T) -> Result<TestRecord, E>` closure is an adapter; [`DelimitedAdapter`] and
//! [`JunitAdapter`] cover two common shapes.

use crate::{
    errors::{DelimitedParseError, JunitConvertError},
    record::TestRecord,
};
use quick_junit::{TestCase, TestCaseStatus};

/// Converts items of type `T` into records.
///
/// Conversion must be deterministic and free of side effects: the same item always converts to
/// the same record. This is what lets an item be removed by converting it again.
pub trait RecordAdapter<T> {
    /// The error returned if `item` can't be converted.
    type Error;

    /// Converts `item` into a record.
    fn convert(&self, item: T) -> Result<TestRecord, Self::Error>;
}

impl<T, E, F> RecordAdapter<T> for F
where
    F: Fn(T) -> Result<TestRecord, E>,
{
    type Error = E;

    fn convert(&self, item: T) -> Result<TestRecord, E> {
        self(item)
    }
}

/// Converts delimited strings of the form `class::test[::description[::duration_ms[::failed]]]`.
///
/// The delimiter defaults to `::`. The description may be empty, the duration defaults to 0 and
/// the failed flag defaults to the value passed to [`with_default_failed`](Self::with_default_failed),
/// which is `false` by default.
#[derive(Clone, Debug)]
pub struct DelimitedAdapter {
    delimiter: String,
    default_failed: bool,
}

impl Default for DelimitedAdapter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELIMITER)
    }
}

impl DelimitedAdapter {
    /// The default delimiter.
    pub const DEFAULT_DELIMITER: &'static str = "::";

    const MAX_FIELDS: usize = 5;

    /// Creates an adapter splitting on `delimiter`.
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            default_failed: false,
        }
    }

    /// Sets the failed flag used for inputs that don't specify one.
    pub fn with_default_failed(mut self, default_failed: bool) -> Self {
        self.default_failed = default_failed;
        self
    }

    fn parse(&self, input: &str) -> Result<TestRecord, DelimitedParseError> {
        let fields: Vec<&str> = input.split(self.delimiter.as_str()).collect();
        let (class_name, test_name, rest) = match fields.as_slice() {
            [class_name, test_name, rest @ ..] if !class_name.is_empty() => {
                (*class_name, *test_name, rest)
            }
            _ => {
                return Err(DelimitedParseError::MissingField {
                    input: input.to_owned(),
                    delimiter: self.delimiter.clone(),
                });
            }
        };
        if fields.len() > Self::MAX_FIELDS {
            return Err(DelimitedParseError::TooManyFields {
                input: input.to_owned(),
                max: Self::MAX_FIELDS,
            });
        }

        let mut record = TestRecord::new(class_name, test_name);
        record.set_failed(self.default_failed);
        if let Some(description) = rest.first() {
            record.set_description(*description);
        }
        if let Some(duration) = rest.get(1) {
            let duration_ms =
                duration
                    .trim()
                    .parse()
                    .map_err(|error| DelimitedParseError::InvalidDuration {
                        input: input.to_owned(),
                        value: (*duration).to_owned(),
                        error,
                    })?;
            record.set_duration_ms(duration_ms);
        }
        if let Some(failed) = rest.get(2) {
            let failed = match failed.trim() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(DelimitedParseError::InvalidFailed {
                        input: input.to_owned(),
                        value: (*failed).to_owned(),
                    });
                }
            };
            record.set_failed(failed);
        }
        Ok(record)
    }
}

impl RecordAdapter<&str> for DelimitedAdapter {
    type Error = DelimitedParseError;

    fn convert(&self, item: &str) -> Result<TestRecord, Self::Error> {
        self.parse(item)
    }
}

impl RecordAdapter<&String> for DelimitedAdapter {
    type Error = DelimitedParseError;

    fn convert(&self, item: &String) -> Result<TestRecord, Self::Error> {
        self.parse(item)
    }
}

/// Converts JUnit test cases, as modeled by [`quick_junit`].
///
/// * The class name is the test case's `classname`, which must be present.
/// * The description is the failure or skip description if there is one, otherwise its message.
/// * The duration is the test case's time, rounded down to milliseconds.
/// * The test failed if its status is a failure or an error.
#[derive(Copy, Clone, Debug, Default)]
pub struct JunitAdapter;

impl RecordAdapter<&TestCase> for JunitAdapter {
    type Error = JunitConvertError;

    fn convert(&self, item: &TestCase) -> Result<TestRecord, Self::Error> {
        let class_name = item
            .classname
            .as_ref()
            .ok_or_else(|| JunitConvertError::new(item.name.as_str()))?;

        let (description, message, failed) = match &item.status {
            TestCaseStatus::NonSuccess {
                description,
                message,
                ..
            } => (description.as_ref(), message.as_ref(), true),
            TestCaseStatus::Skipped {
                description,
                message,
                ..
            } => (description.as_ref(), message.as_ref(), false),
            _ => (None, None, false),
        };

        let mut record = TestRecord::new(class_name.as_str(), item.name.as_str());
        if let Some(text) = description.or(message) {
            record.set_description(text.as_str());
        }
        if let Some(time) = item.time {
            record.set_duration(time);
        }
        record.set_failed(failed);
        Ok(record)
    }
}
