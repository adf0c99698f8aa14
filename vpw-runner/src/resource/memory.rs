// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ResourceReader;
use crate::errors::ReadResourceError;
use std::{collections::BTreeMap, sync::Mutex};

/// Serves resources from memory.
///
/// Every read is recorded, in order, whether or not it succeeded.
#[derive(Debug, Default)]
pub struct MemoryReader {
    resources: BTreeMap<String, String>,
    reads: Mutex<Vec<String>>,
}

impl MemoryReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any existing resource with the same name.
    pub fn with_resource(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.resources.insert(name.into(), contents.into());
        self
    }

    /// Returns the names of all resources read so far, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ResourceReader for MemoryReader {
    fn location(&self, name: &str) -> String {
        format!("memory:{name}")
    }

    async fn read(&self, name: &str) -> Result<String, ReadResourceError> {
        self.reads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(name.to_owned());
        self.resources
            .get(name)
            .cloned()
            .ok_or(ReadResourceError::NotInMemory)
    }
}
