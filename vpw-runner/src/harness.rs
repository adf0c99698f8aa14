// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The harness: loads fixtures, then runs a function under test against them.
//!
//! A harness moves through these states:
//!
//! ```text
//! Unconfigured --initialize--> Loading --ok--> Ready --run--> Executed --run--> Executed
//!                                 |
//!                                 +--error--> Unconfigured
//! ```
//!
//! Each run rebuilds the error set from scratch.

use crate::{
    config::{HarnessConfig, PanicPolicy},
    errors::{HarnessInitError, NotReady},
    loader::{LoadedSuite, Loader},
    parse::{InputParser, OutputParser},
    resource::{DefaultReader, ResourceReader},
};
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};
use tracing::{debug, info};

/// A custom equality check, called as `comparator(actual, expected)`.
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Builder for a [`Harness`].
pub struct HarnessBuilder<T> {
    config: HarnessConfig,
    input_parser: InputParser<T>,
    output_parser: OutputParser<T>,
    comparator: Option<Comparator<T>>,
}

impl<T> HarnessBuilder<T> {
    /// Creates a new builder.
    pub fn new(
        config: HarnessConfig,
        input_parser: InputParser<T>,
        output_parser: OutputParser<T>,
    ) -> Self {
        Self {
            config,
            input_parser,
            output_parser,
            comparator: None,
        }
    }

    /// Uses a custom comparator instead of `==` to decide whether a result
    /// matches its expected value.
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Builds a harness that reads resources as described by the config.
    pub fn build(self) -> Harness<T> {
        let reader = self.config.reader();
        self.build_with_reader(reader)
    }

    /// Builds a harness that reads resources through `reader`.
    pub fn build_with_reader<R: ResourceReader>(self, reader: R) -> Harness<T, R> {
        Harness {
            config: self.config,
            reader,
            input_parser: self.input_parser,
            output_parser: self.output_parser,
            comparator: self.comparator,
            state: HarnessState::Unconfigured,
            suite: None,
            error_inputs: Vec::new(),
            panicked_inputs: Vec::new(),
            last_run: None,
        }
    }
}

/// Loads paired input/output fixtures and checks a function against them.
pub struct Harness<T, R = DefaultReader> {
    config: HarnessConfig,
    reader: R,
    input_parser: InputParser<T>,
    output_parser: OutputParser<T>,
    comparator: Option<Comparator<T>>,
    state: HarnessState,
    suite: Option<LoadedSuite<T>>,
    error_inputs: Vec<T>,
    panicked_inputs: Vec<T>,
    last_run: Option<RunStats>,
}

impl<T> Harness<T> {
    /// Returns a builder for a harness.
    pub fn builder(
        config: HarnessConfig,
        input_parser: InputParser<T>,
        output_parser: OutputParser<T>,
    ) -> HarnessBuilder<T> {
        HarnessBuilder::new(config, input_parser, output_parser)
    }
}

impl<T, R: ResourceReader> Harness<T, R> {
    /// Reads and validates both resources.
    ///
    /// Must complete successfully before [`run`](Self::run) is called. On
    /// failure the harness is left unconfigured, and `initialize` may be
    /// called again.
    pub async fn initialize(&mut self) -> Result<(), HarnessInitError> {
        self.state = HarnessState::Loading;
        self.suite = None;
        self.error_inputs.clear();
        self.panicked_inputs.clear();
        self.last_run = None;

        let loader = Loader {
            reader: &self.reader,
            input_name: self.config.input(),
            output_name: self.config.output(),
            header: self.config.header(),
            input_parser: &self.input_parser,
            output_parser: &self.output_parser,
        };

        match loader.load().await {
            Ok(suite) => {
                info!(
                    "starting {} test cases from {}",
                    suite.test_count(),
                    self.config.input(),
                );
                self.suite = Some(suite);
                self.state = HarnessState::Ready;
                Ok(())
            }
            Err(error) => {
                self.state = HarnessState::Unconfigured;
                Err(error)
            }
        }
    }
}

impl<T, R> Harness<T, R> {
    /// Runs `f` once on every input, in input order, and records each input
    /// whose result doesn't match its expected value.
    ///
    /// The previous run's error set is discarded first. If `f` panics and the
    /// panic policy is [`PanicPolicy::Propagate`], the panic unwinds out of
    /// this call, the error set stays empty, and the harness stays in its
    /// current state.
    pub fn run<F>(&mut self, mut f: F) -> Result<RunStats, NotReady>
    where
        F: FnMut(T) -> T,
        T: Clone + PartialEq,
    {
        self.error_inputs.clear();
        self.panicked_inputs.clear();

        let suite = match (self.state, &self.suite) {
            (HarnessState::Ready | HarnessState::Executed, Some(suite)) => suite,
            _ => return Err(NotReady::new(self.state)),
        };

        let mut error_inputs = Vec::new();
        let mut panicked_inputs = Vec::new();

        for (index, input) in (1..).zip(&suite.inputs) {
            let actual = match self.config.on_panic() {
                PanicPolicy::Propagate => f(input.clone()),
                PanicPolicy::Record => {
                    match panic::catch_unwind(AssertUnwindSafe(|| f(input.clone()))) {
                        Ok(actual) => actual,
                        Err(_) => {
                            debug!("test {index} panicked");
                            panicked_inputs.push(input.clone());
                            continue;
                        }
                    }
                }
            };

            let matches = suite
                .expected
                .get(&index)
                .is_some_and(|expected| self.matches(&actual, expected));
            if !matches {
                debug!("test {index} failed");
                error_inputs.push(input.clone());
            }
        }

        let stats = RunStats {
            initial_run_count: suite.test_count(),
            passed: suite.test_count() - error_inputs.len() - panicked_inputs.len(),
            failed: error_inputs.len(),
            panicked: panicked_inputs.len(),
        };
        debug!(
            "run finished: {} passed, {} failed, {} panicked",
            stats.passed, stats.failed, stats.panicked,
        );

        self.error_inputs = error_inputs;
        self.panicked_inputs = panicked_inputs;
        self.last_run = Some(stats);
        self.state = HarnessState::Executed;
        Ok(stats)
    }

    fn matches(&self, actual: &T, expected: &T) -> bool
    where
        T: PartialEq,
    {
        match &self.comparator {
            Some(comparator) => comparator(actual, expected),
            None => actual == expected,
        }
    }

    /// Returns the inputs whose result didn't match in the last run, in input
    /// order.
    pub fn error_inputs(&self) -> &[T] {
        &self.error_inputs
    }

    /// Returns the inputs that panicked in the last run, in input order.
    ///
    /// Always empty unless the panic policy is [`PanicPolicy::Record`].
    pub fn panicked_inputs(&self) -> &[T] {
        &self.panicked_inputs
    }

    /// Returns the number of tests, fixed at initialization. Zero before the
    /// harness has been initialized.
    pub fn tests_executed(&self) -> usize {
        self.suite.as_ref().map_or(0, LoadedSuite::test_count)
    }

    /// Returns the parsed inputs, in input order.
    pub fn inputs(&self) -> &[T] {
        self.suite
            .as_ref()
            .map_or(&[][..], |suite| suite.inputs.as_slice())
    }

    /// Returns the expected value for a 1-based test index.
    pub fn expected(&self, index: u64) -> Option<&T> {
        self.suite.as_ref()?.expected.get(&index)
    }

    /// Returns statistics for the last run, if any.
    pub fn last_run(&self) -> Option<RunStats> {
        self.last_run
    }

    /// Returns the current state.
    pub fn state(&self) -> HarnessState {
        self.state
    }

    /// Returns the config.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the resource reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<T, R> fmt::Debug for Harness<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("correlation", &self.output_parser.correlation())
            .field("custom_comparator", &self.comparator.is_some())
            .field("state", &self.state)
            .field("tests", &self.tests_executed())
            .finish_non_exhaustive()
    }
}

/// The lifecycle state of a [`Harness`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HarnessState {
    /// Not yet initialized, or initialization failed.
    Unconfigured,

    /// Resources are being read.
    Loading,

    /// Resources were loaded and validated; no run has completed yet.
    Ready,

    /// At least one run has completed.
    Executed,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Executed => write!(f, "executed"),
        }
    }
}

/// Statistics for a single run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The total number of tests, fixed at initialization.
    pub initial_run_count: usize,

    /// The number of tests whose result matched.
    pub passed: usize,

    /// The number of tests whose result didn't match.
    pub failed: usize,

    /// The number of tests that panicked (only with [`PanicPolicy::Record`]).
    pub panicked: usize,
}

impl RunStats {
    /// Returns true if every test passed.
    pub fn is_success(&self) -> bool {
        self.passed == self.initial_run_count
    }
}
