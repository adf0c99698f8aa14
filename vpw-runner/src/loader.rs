// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    config::HeaderMode,
    errors::{HarnessInitError, ResourceKind, ResourceLoadError},
    parse::{InputParser, OutputParser},
    resource::ResourceReader,
};
use std::collections::{BTreeMap, btree_map::Entry};
use tracing::{debug, warn};

/// Inputs and expected outputs, validated and correlated by 1-based index.
#[derive(Clone, Debug)]
pub(crate) struct LoadedSuite<T> {
    pub(crate) inputs: Vec<T>,
    pub(crate) expected: BTreeMap<u64, T>,
}

impl<T> LoadedSuite<T> {
    pub(crate) fn test_count(&self) -> usize {
        self.inputs.len()
    }
}

pub(crate) struct Loader<'a, T, R> {
    pub(crate) reader: &'a R,
    pub(crate) input_name: &'a str,
    pub(crate) output_name: &'a str,
    pub(crate) header: HeaderMode,
    pub(crate) input_parser: &'a InputParser<T>,
    pub(crate) output_parser: &'a OutputParser<T>,
}

impl<T, R: ResourceReader> Loader<'_, T, R> {
    /// Reads both resources, input first, and validates them.
    pub(crate) async fn load(&self) -> Result<LoadedSuite<T>, HarnessInitError> {
        let contents = self.read(self.input_name).await?;
        let inputs = self.parse_inputs(&contents)?;

        let contents = self.read(self.output_name).await?;
        let expected = self.parse_outputs(&contents)?;

        self.validate(&inputs, &expected)?;
        Ok(LoadedSuite { inputs, expected })
    }

    async fn read(&self, name: &str) -> Result<String, HarnessInitError> {
        debug!("loading `{name}` from {}", self.reader.location(name));
        self.reader
            .read(name)
            .await
            .map_err(|error| ResourceLoadError::new(name, error).into())
    }

    fn parse_inputs(&self, contents: &str) -> Result<Vec<T>, HarnessInitError> {
        let mut lines = data_lines(contents);

        let declared_count = match self.header {
            HeaderMode::None => None,
            HeaderMode::TestCount => Some(self.parse_header(lines.next())?),
        };

        let inputs = lines
            .map(|(line_number, line)| {
                self.input_parser
                    .parse(line)
                    .map_err(|error| HarnessInitError::ParseLine {
                        kind: ResourceKind::Input,
                        name: self.input_name.to_owned(),
                        line_number,
                        line: line.to_owned(),
                        error,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(declared_count) = declared_count
            && declared_count != inputs.len()
        {
            warn!(
                "input `{}` declares {declared_count} test cases, but has {}",
                self.input_name,
                inputs.len(),
            );
        }

        Ok(inputs)
    }

    fn parse_header(&self, line: Option<(usize, &str)>) -> Result<usize, HarnessInitError> {
        let Some((_, line)) = line else {
            return Err(HarnessInitError::HeaderMissing {
                name: self.input_name.to_owned(),
                error: None,
            });
        };
        line.parse::<usize>()
            .map_err(|error| HarnessInitError::HeaderMissing {
                name: self.input_name.to_owned(),
                error: Some(error),
            })
    }

    fn parse_outputs(&self, contents: &str) -> Result<BTreeMap<u64, T>, HarnessInitError> {
        let mut expected = BTreeMap::new();

        for (position, (line_number, line)) in (1..).zip(data_lines(contents)) {
            let (index, value) = self.output_parser.parse(position, line).map_err(|error| {
                HarnessInitError::ParseLine {
                    kind: ResourceKind::Output,
                    name: self.output_name.to_owned(),
                    line_number,
                    line: line.to_owned(),
                    error,
                }
            })?;
            if index == 0 {
                return Err(HarnessInitError::InvalidIndex {
                    name: self.output_name.to_owned(),
                    line_number,
                });
            }

            // Later lines win.
            match expected.entry(index) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => {
                    warn!(
                        "output `{}`, line {line_number}: index {index} was already \
                         specified, overriding earlier value",
                        self.output_name,
                    );
                    entry.insert(value);
                }
            }
        }

        Ok(expected)
    }

    fn validate(&self, inputs: &[T], expected: &BTreeMap<u64, T>) -> Result<(), HarnessInitError> {
        let input_count = inputs.len();
        if input_count == 0 {
            return Err(HarnessInitError::EmptyInput {
                name: self.input_name.to_owned(),
            });
        }

        if input_count != expected.len() {
            return Err(HarnessInitError::LengthMismatch {
                input_count,
                output_count: expected.len(),
            });
        }

        if let Some(index) = (1..=input_count as u64).find(|index| !expected.contains_key(index)) {
            return Err(HarnessInitError::MissingExpected { index, input_count });
        }

        Ok(())
    }
}

/// Returns non-blank lines, trimmed, with their 1-based line numbers.
fn data_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}
