// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ResourceReader;
use crate::errors::ReadResourceError;
use camino::{Utf8Path, Utf8PathBuf};

/// Reads resources from a fixture directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalFileReader {
    dir: Utf8PathBuf,
}

impl LocalFileReader {
    /// Creates a reader that looks up resources in `base_dir/fixture_dir`.
    pub fn new(base_dir: impl AsRef<Utf8Path>, fixture_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            dir: base_dir.as_ref().join(fixture_dir),
        }
    }

    /// Returns the directory resources are read from.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the path a resource resolves to.
    pub fn path_for(&self, name: &str) -> Utf8PathBuf {
        self.dir.join(name)
    }
}

impl ResourceReader for LocalFileReader {
    fn location(&self, name: &str) -> String {
        self.path_for(name).into_string()
    }

    async fn read(&self, name: &str) -> Result<String, ReadResourceError> {
        let path = self.path_for(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| ReadResourceError::Io { path, error })
    }
}
