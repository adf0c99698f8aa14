// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    digits::lang_getal,
    errors::{ExpectedError, LangGetalExitCode},
    output::{OutputContext, write_summary},
};
use camino::Utf8PathBuf;
use std::io::Write;
use vpw_runner::{
    config::HarnessConfig,
    harness::Harness,
    parse::{InputParser, OutputParser},
};

/// Runs [`lang_getal`] over the fixtures configured for the current directory.
///
/// Config is read from `.config/vpw.toml` in the current directory, if present, with `VPW_*`
/// environment variables layered on top. Returns the exit code on success.
pub fn exec(output: OutputContext, writer: impl Write) -> Result<i32, ExpectedError> {
    let cwd = std::env::current_dir()
        .map_err(|error| ExpectedError::CurrentDirFailed { error })?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|error| ExpectedError::CurrentDirInvalidUtf8 { error })?;

    let config = HarnessConfig::from_sources(&cwd, None)?;
    run_fixtures(config, output, writer)
}

/// Runs [`lang_getal`] over the fixtures described by `config`, and writes a summary to `writer`.
pub fn run_fixtures(
    config: HarnessConfig,
    output: OutputContext,
    mut writer: impl Write,
) -> Result<i32, ExpectedError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| ExpectedError::TokioRuntimeCreateFailed { error })?;

    // Inputs must fit in a u64. Expected counts can exceed it.
    let mut harness = Harness::builder(
        config,
        InputParser::new(|line: &str| line.parse::<u64>().map(u128::from)),
        OutputParser::<u128>::indexed(),
    )
    .build();
    runtime.block_on(harness.initialize())?;

    let stats = harness.run(|n| u64::try_from(n).map_or(0, lang_getal))?;
    write_summary(
        &mut writer,
        &stats,
        harness.error_inputs(),
        harness.panicked_inputs(),
        &output.summary_styles(),
    )
    .map_err(|error| ExpectedError::WriteOutputError { error })?;

    if stats.is_success() {
        Ok(LangGetalExitCode::OK)
    } else {
        Err(ExpectedError::TestRunFailed)
    }
}
