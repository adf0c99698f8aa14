// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of named fixture resources.
//!
//! A resource is identified by a short file name like `in.txt`. Readers turn
//! that name into text: [`LocalFileReader`] looks under a fixture directory,
//! [`HttpReader`] fetches the same relative path from a remote base URL, and
//! [`FallbackReader`] tries one and then the other. [`MemoryReader`] holds
//! resources in memory.

mod fallback;
mod http;
mod local;
mod memory;

pub use fallback::FallbackReader;
pub use http::HttpReader;
pub use local::LocalFileReader;
pub use memory::MemoryReader;

use crate::errors::ReadResourceError;
use std::future::Future;

/// The reader used by default: a local file, falling back to a network fetch.
pub type DefaultReader = FallbackReader<LocalFileReader, HttpReader>;

/// A source of named text resources.
pub trait ResourceReader {
    /// Returns a description of where `name` is looked up, for logging.
    fn location(&self, name: &str) -> String;

    /// Reads the resource called `name` to a string.
    fn read(&self, name: &str) -> impl Future<Output = Result<String, ReadResourceError>>;
}

impl<R: ResourceReader> ResourceReader for &R {
    fn location(&self, name: &str) -> String {
        (**self).location(name)
    }

    fn read(&self, name: &str) -> impl Future<Output = Result<String, ReadResourceError>> {
        (**self).read(name)
    }
}
