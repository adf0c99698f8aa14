// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ResourceReader;
use crate::errors::ReadResourceError;
use tracing::debug;

/// Tries a primary reader, and on any failure tries a fallback reader.
///
/// Both readers are always attempted, in order, before a read is reported as
/// failed.
#[derive(Clone, Debug)]
pub struct FallbackReader<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackReader<P, F> {
    /// Creates a new fallback reader.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Returns the primary reader.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Returns the fallback reader.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: ResourceReader, F: ResourceReader> ResourceReader for FallbackReader<P, F> {
    fn location(&self, name: &str) -> String {
        format!(
            "{} (fallback: {})",
            self.primary.location(name),
            self.fallback.location(name)
        )
    }

    async fn read(&self, name: &str) -> Result<String, ReadResourceError> {
        let primary = match self.primary.read(name).await {
            Ok(contents) => {
                debug!("read `{name}` from {}", self.primary.location(name));
                return Ok(contents);
            }
            Err(error) => error,
        };

        debug!(
            "reading `{name}` from {} failed ({primary}), trying {}",
            self.primary.location(name),
            self.fallback.location(name),
        );

        match self.fallback.read(name).await {
            Ok(contents) => {
                debug!("read `{name}` from {}", self.fallback.location(name));
                Ok(contents)
            }
            Err(fallback) => Err(ReadResourceError::Fallback {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }),
        }
    }
}
