// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line parsers for input and output resources.
//!
//! Lines are trimmed before they're handed to a parser, so parsers never see
//! surrounding whitespace or a trailing `\r`.

use crate::errors::{BoxedParseError, LineParseError};
use std::{fmt, str::FromStr};

type ParseFn<T> = Box<dyn Fn(&str) -> Result<T, BoxedParseError> + Send + Sync>;

/// Parses a single input line into a `T`.
pub struct InputParser<T> {
    parse: ParseFn<T>,
}

impl<T> InputParser<T> {
    /// Creates a parser from a function.
    ///
    /// The function is called with each non-blank line after it has been
    /// trimmed, so leading whitespace and a trailing `\r` are never visible to
    /// it.
    pub fn new<F, E>(parse: F) -> Self
    where
        T: 'static,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxedParseError>,
    {
        Self {
            parse: Box::new(move |line| parse(line).map_err(Into::into)),
        }
    }

    /// Creates a parser that uses `T`'s [`FromStr`] implementation.
    pub fn from_str_impl() -> Self
    where
        T: FromStr + 'static,
        T::Err: Into<BoxedParseError>,
    {
        Self::new(T::from_str)
    }

    pub(crate) fn parse(&self, line: &str) -> Result<T, BoxedParseError> {
        (self.parse)(line)
    }
}

impl<T> fmt::Debug for InputParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputParser").finish_non_exhaustive()
    }
}

/// How an output line is correlated with an input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CorrelationMode {
    /// The Nth non-blank output line is the expected value for test N.
    Positional,

    /// Each output line carries its own 1-based test index.
    Embedded,
}

/// Parses a single output line into an expected value keyed by test index.
///
/// The variant decides the correlation key convention. The runner looks
/// expected values up the same way in both cases.
pub enum OutputParser<T> {
    /// The line holds only a value; its key is its 1-based position among
    /// non-blank lines.
    Positional(ParseFn<T>),

    /// The line holds an index and a value.
    Embedded(ParseFn<(u64, T)>),
}

impl<T> OutputParser<T> {
    /// Creates a positional parser from a function.
    ///
    /// As with [`InputParser::new`], the function sees trimmed lines.
    pub fn positional<F, E>(parse: F) -> Self
    where
        T: 'static,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxedParseError>,
    {
        Self::Positional(Box::new(move |line| parse(line).map_err(Into::into)))
    }

    /// Creates an embedded-index parser from a function returning `(index, value)`.
    pub fn embedded<F, E>(parse: F) -> Self
    where
        T: 'static,
        F: Fn(&str) -> Result<(u64, T), E> + Send + Sync + 'static,
        E: Into<BoxedParseError>,
    {
        Self::Embedded(Box::new(move |line| parse(line).map_err(Into::into)))
    }

    /// Creates a positional parser that uses `T`'s [`FromStr`] implementation.
    pub fn values() -> Self
    where
        T: FromStr + 'static,
        T::Err: Into<BoxedParseError>,
    {
        Self::positional(T::from_str)
    }

    /// Creates an embedded-index parser for lines of the form `<index> <value>`,
    /// separated by whitespace. The value is everything after the index.
    pub fn indexed() -> Self
    where
        T: FromStr + 'static,
        T::Err: Into<BoxedParseError>,
    {
        Self::embedded(parse_indexed_line::<T>)
    }

    /// Returns the correlation mode this parser encodes.
    pub fn correlation(&self) -> CorrelationMode {
        match self {
            Self::Positional(_) => CorrelationMode::Positional,
            Self::Embedded(_) => CorrelationMode::Embedded,
        }
    }

    /// Parses a line. `position` is the 1-based position of the line among
    /// non-blank data lines.
    pub(crate) fn parse(&self, position: u64, line: &str) -> Result<(u64, T), BoxedParseError> {
        match self {
            Self::Positional(parse) => parse(line).map(|value| (position, value)),
            Self::Embedded(parse) => parse(line),
        }
    }
}

impl<T> fmt::Debug for OutputParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputParser")
            .field(&self.correlation())
            .finish()
    }
}

/// Parses `<index> <value>`.
pub fn parse_indexed_line<T>(line: &str) -> Result<(u64, T), LineParseError>
where
    T: FromStr,
    T::Err: Into<BoxedParseError>,
{
    let line = line.trim();
    let (index, value) = match line.split_once(char::is_whitespace) {
        Some((index, value)) => (index, value.trim()),
        None if line.is_empty() => return Err(LineParseError::MissingIndex),
        None => return Err(LineParseError::MissingValue),
    };
    if value.is_empty() {
        return Err(LineParseError::MissingValue);
    }

    let index = index
        .parse::<u64>()
        .map_err(|error| LineParseError::InvalidIndex {
            input: index.to_owned(),
            error,
        })?;
    let value = value
        .parse::<T>()
        .map_err(|error| LineParseError::InvalidValue {
            input: value.to_owned(),
            error: error.into(),
        })?;
    Ok((index, value))
}
