// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors surfaced by the `lang-getal` binary, and the exit codes they map to.

use crate::output::StderrStyles;
use camino::FromPathBufError;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use vpw_runner::errors::{ConfigParseError, HarnessInitError, NotReady};

/// Documented exit codes for `lang-getal` failures.
///
/// Unknown/unexpected failures, such as panics in the function under test, always result in exit
/// code 1 or 101.
pub enum LangGetalExitCode {}

impl LangGetalExitCode {
    /// Every test case passed.
    pub const OK: i32 = 0;

    /// One or more test cases failed.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// The fixtures couldn't be loaded or didn't validate.
    pub const FIXTURE_LOAD_FAILED: i32 = 104;

    /// An error occurred while setting up the run: an invalid current directory, an invalid
    /// config, or a failure to start the async runtime.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing the run summary failed.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}

/// An error that occurs in `lang-getal` that isn't a bug.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        error: FromPathBufError,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        error: ConfigParseError,
    },
    #[error("failed to create tokio runtime")]
    TokioRuntimeCreateFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("failed to load fixtures")]
    FixtureLoadFailed {
        #[from]
        error: HarnessInitError,
    },
    #[error("harness is not ready")]
    NotReady {
        #[from]
        error: NotReady,
    },
    #[error("test run failed")]
    TestRunFailed,
    #[error("error writing run summary")]
    WriteOutputError {
        #[source]
        error: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::TokioRuntimeCreateFailed { .. }
            | Self::NotReady { .. } => LangGetalExitCode::SETUP_ERROR,
            Self::FixtureLoadFailed { .. } => LangGetalExitCode::FIXTURE_LOAD_FAILED,
            Self::TestRunFailed => LangGetalExitCode::TEST_RUN_FAILED,
            Self::WriteOutputError { .. } => LangGetalExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::CurrentDirFailed { error } => {
                tracing::error!("could not determine current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { error } => {
                tracing::error!("current directory is not valid UTF-8");
                Some(error as &dyn Error)
            }
            Self::ConfigParseError { error } => {
                tracing::error!(
                    "failed to parse config at `{}`",
                    error.config_file().style(styles.bold)
                );
                error.source()
            }
            Self::TokioRuntimeCreateFailed { error } => {
                tracing::error!("failed to create tokio runtime");
                Some(error as &dyn Error)
            }
            Self::FixtureLoadFailed { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::NotReady { error } => {
                tracing::error!("{error}");
                None
            }
            Self::TestRunFailed => {
                tracing::error!("test run failed");
                None
            }
            Self::WriteOutputError { error } => {
                tracing::error!("error writing run summary");
                Some(error as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: "lang_getal::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vpw_runner::errors::HarnessInitError;

    #[test]
    fn exit_codes() {
        assert_eq!(
            ExpectedError::TestRunFailed.process_exit_code(),
            LangGetalExitCode::TEST_RUN_FAILED
        );
        let error = ExpectedError::from(HarnessInitError::LengthMismatch {
            input_count: 5,
            output_count: 4,
        });
        assert_eq!(
            error.process_exit_code(),
            LangGetalExitCode::FIXTURE_LOAD_FAILED
        );
    }
}
