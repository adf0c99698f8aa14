// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for the harness.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    resource::{DefaultReader, FallbackReader, HttpReader, LocalFileReader},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Case, Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::fmt;

/// Configuration for a [`Harness`](crate::harness::Harness).
///
/// Can be built in code with [`HarnessConfig::new`], or read from the default
/// config, `.config/vpw.toml` and `VPW_*` environment variables with
/// [`HarnessConfig::from_sources`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HarnessConfig {
    input: String,
    output: String,
    base_dir: Utf8PathBuf,
    fixture_dir: Utf8PathBuf,
    #[serde(default)]
    remote_base_url: Option<String>,
    #[serde(default)]
    header: HeaderMode,
    #[serde(default)]
    on_panic: PanicPolicy,
}

impl HarnessConfig {
    /// The default location of the config within a directory.
    pub const CONFIG_PATH: &'static str = ".config/vpw.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Environment configuration uses this prefix, plus a _.
    pub const ENVIRONMENT_PREFIX: &'static str = "VPW";

    /// The default fixture directory, relative to the base directory.
    pub const DEFAULT_FIXTURE_DIR: &'static str = "src";

    /// Creates a config for the given input and output resources, with all
    /// other settings at their defaults.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            base_dir: Utf8PathBuf::from("."),
            fixture_dir: Utf8PathBuf::from(Self::DEFAULT_FIXTURE_DIR),
            remote_base_url: None,
            header: HeaderMode::default(),
            on_panic: PanicPolicy::default(),
        }
    }

    /// Reads the config from the given file, or if not specified from
    /// `.config/vpw.toml` in `root`. `VPW_*` environment variables take
    /// precedence over both.
    ///
    /// If no config file is specified and `root` doesn't have
    /// `.config/vpw.toml`, the default config is used.
    pub fn from_sources(
        root: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::read_from_sources(root, config_file, None)
    }

    /// Returns the default config.
    pub fn default_config() -> Self {
        Self::make_default_config()
            .build()
            .expect("default config is always valid")
            .try_deserialize()
            .expect("default config is always valid")
    }

    /// Sets the directory the fixture directory is relative to.
    pub fn with_base_dir(mut self, base_dir: impl Into<Utf8PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Sets the directory fixtures live in, relative to the base directory.
    pub fn with_fixture_dir(mut self, fixture_dir: impl Into<Utf8PathBuf>) -> Self {
        self.fixture_dir = fixture_dir.into();
        self
    }

    /// Sets the base URL that fixtures are fetched from if they can't be read
    /// locally.
    pub fn with_remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.remote_base_url = Some(url.into());
        self
    }

    /// Sets the header mode.
    pub fn with_header(mut self, header: HeaderMode) -> Self {
        self.header = header;
        self
    }

    /// Sets the panic policy.
    pub fn with_on_panic(mut self, on_panic: PanicPolicy) -> Self {
        self.on_panic = on_panic;
        self
    }

    /// Returns the name of the input resource.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the name of the output resource.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Returns the fixture directory, relative to the base directory.
    pub fn fixture_dir(&self) -> &Utf8Path {
        &self.fixture_dir
    }

    /// Returns the remote base URL, if any.
    pub fn remote_base_url(&self) -> Option<&str> {
        self.remote_base_url.as_deref()
    }

    /// Returns the header mode.
    pub fn header(&self) -> HeaderMode {
        self.header
    }

    /// Returns the panic policy.
    pub fn on_panic(&self) -> PanicPolicy {
        self.on_panic
    }

    /// Returns the reader for this config: the local fixture directory,
    /// falling back to the remote base URL.
    pub fn reader(&self) -> DefaultReader {
        FallbackReader::new(
            LocalFileReader::new(&self.base_dir, &self.fixture_dir),
            HttpReader::new(self.remote_base_url.clone(), self.fixture_dir.clone()),
        )
    }

    // ---
    // Helper methods
    // ---

    fn read_from_sources(
        root: &Utf8Path,
        file: Option<&Utf8Path>,
        env_source: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let environment = Environment::with_prefix(Self::ENVIRONMENT_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .convert_case(Case::Kebab)
            .source(env_source);

        let builder = Self::make_default_config()
            .add_source(source)
            .add_source(environment);

        Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))
    }
}

/// Whether the input resource starts with a test-count header.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMode {
    /// Every non-blank line is a test case.
    #[default]
    None,

    /// The first non-blank line is the number of test cases, and is skipped.
    TestCount,
}

impl fmt::Display for HeaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::TestCount => write!(f, "test-count"),
        }
    }
}

/// What to do when the function under test panics.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum PanicPolicy {
    /// Let the panic unwind out of the run. Inputs after the panicking one
    /// aren't evaluated.
    #[default]
    Propagate,

    /// Catch the panic, record the input as panicked, and continue.
    Record,
}

impl fmt::Display for PanicPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => write!(f, "propagate"),
            Self::Record => write!(f, "record"),
        }
    }
}
