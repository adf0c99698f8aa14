// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the harness.

use crate::harness::HarnessState;
use camino::Utf8PathBuf;
use config::ConfigError;
use std::{error::Error, fmt, num::ParseIntError};
use thiserror::Error;

/// A boxed error returned by a caller-supplied line parser.
pub type BoxedParseError = Box<dyn Error + Send + Sync>;

/// An error that occurred while parsing the harness config.
#[derive(Debug, Error)]
#[error("failed to parse harness config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing the harness config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the layered config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// An error that occurred while reading a single resource from a single place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadResourceError {
    /// The local file couldn't be read.
    #[error("failed to read `{path}`")]
    Io {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// No remote base URL is configured, so the resource can't be fetched.
    #[error("no remote base URL configured")]
    NoRemoteBase,

    /// The network fetch failed.
    #[error("failed to fetch `{url}`")]
    Http {
        /// The URL that was fetched.
        url: String,

        /// The underlying error.
        #[source]
        error: Box<ureq::Error>,
    },

    /// The blocking fetch task didn't complete.
    #[error("fetch task for `{url}` did not complete")]
    FetchTask {
        /// The URL that was being fetched.
        url: String,

        /// The underlying error.
        #[source]
        error: tokio::task::JoinError,
    },

    /// An in-memory reader doesn't hold the resource.
    #[error("resource not present in memory")]
    NotInMemory,

    /// The primary reader failed, and so did the fallback.
    ///
    /// The message includes the primary error's causes. The fallback error
    /// is the source.
    #[error("{}; fallback also failed", DisplayErrorChain::new(&**primary))]
    Fallback {
        /// The error from the primary reader.
        primary: Box<ReadResourceError>,

        /// The error from the fallback reader.
        #[source]
        fallback: Box<ReadResourceError>,
    },
}

/// Neither the local-file nor the network read succeeded for a named resource.
#[derive(Debug, Error)]
#[error("failed to load resource `{name}`")]
pub struct ResourceLoadError {
    name: String,
    #[source]
    error: ReadResourceError,
}

impl ResourceLoadError {
    pub(crate) fn new(name: impl Into<String>, error: ReadResourceError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    /// Returns the name of the resource that couldn't be loaded.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the error from the last place the resource was looked up.
    pub fn read_error(&self) -> &ReadResourceError {
        &self.error
    }
}

/// An error produced by one of the built-in line parsers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineParseError {
    /// The line doesn't contain an index field.
    #[error("expected `<index> <value>`, found no index")]
    MissingIndex,

    /// The line has an index but no value.
    #[error("expected `<index> <value>`, found no value")]
    MissingValue,

    /// The index isn't an unsigned integer.
    #[error("invalid index `{input}`")]
    InvalidIndex {
        /// The index text.
        input: String,

        /// The underlying error.
        #[source]
        error: ParseIntError,
    },

    /// The value couldn't be parsed.
    #[error("invalid value `{input}`")]
    InvalidValue {
        /// The value text.
        input: String,

        /// The underlying error.
        #[source]
        error: BoxedParseError,
    },
}

/// Which of the two resources an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    /// The input resource.
    Input,

    /// The output (expected results) resource.
    Output,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// An error that occurred while initializing a [`Harness`](crate::harness::Harness).
///
/// All of these are fatal: the harness stays unconfigured and nothing is run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessInitError {
    /// A resource couldn't be read.
    #[error(transparent)]
    ResourceLoad(#[from] ResourceLoadError),

    /// The input resource yielded no test cases.
    #[error("no test cases found in input resource `{name}`")]
    EmptyInput {
        /// The name of the input resource.
        name: String,
    },

    /// The number of inputs differs from the number of distinct expected outputs.
    #[error(
        "mismatched input/output lengths: input has {input_count} entries, \
         output has {output_count} entries"
    )]
    LengthMismatch {
        /// The number of parsed inputs.
        input_count: usize,

        /// The number of distinct indexes in the output.
        output_count: usize,
    },

    /// Counts match, but an input position has no expected output.
    #[error("no expected output for test {index} (output indexes must cover 1..={input_count})")]
    MissingExpected {
        /// The 1-based index with no expected output.
        index: u64,

        /// The number of parsed inputs.
        input_count: usize,
    },

    /// A line couldn't be parsed.
    #[error("{kind} resource `{name}`, line {line_number}: failed to parse `{line}`")]
    ParseLine {
        /// Which resource the line came from.
        kind: ResourceKind,

        /// The name of the resource.
        name: String,

        /// The 1-based line number within the resource.
        line_number: usize,

        /// The line text.
        line: String,

        /// The error returned by the parser.
        #[source]
        error: BoxedParseError,
    },

    /// An output line yielded index 0.
    #[error("output resource `{name}`, line {line_number}: index 0 is invalid (indexes start at 1)")]
    InvalidIndex {
        /// The name of the output resource.
        name: String,

        /// The 1-based line number within the resource.
        line_number: usize,
    },

    /// A test-count header was configured, but the input doesn't start with one.
    #[error("input resource `{name}` does not start with a test-count header")]
    HeaderMissing {
        /// The name of the input resource.
        name: String,

        /// The header line, if one was present but couldn't be parsed.
        #[source]
        error: Option<ParseIntError>,
    },
}

/// The harness was asked to run before it was initialized.
#[derive(Clone, Copy, Debug, Error)]
#[error("harness is not ready to run (current state: {state})")]
pub struct NotReady {
    state: HarnessState,
}

impl NotReady {
    pub(crate) fn new(state: HarnessState) -> Self {
        Self { state }
    }

    /// Returns the state the harness was in.
    pub fn state(&self) -> HarnessState {
        self.state
    }
}

/// Displays an error and its sources on one line, separated by `: `.
pub(crate) struct DisplayErrorChain<'a> {
    error: &'a (dyn Error + 'a),
}

impl<'a> DisplayErrorChain<'a> {
    pub(crate) fn new(error: &'a (dyn Error + 'a)) -> Self {
        Self { error }
    }
}

impl fmt::Display for DisplayErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, ": {error}")?;
            source = error.source();
        }
        Ok(())
    }
}
