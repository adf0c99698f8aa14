// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Fixture-driven harness for programming-contest solutions.
//!
//! A [`Harness`](harness::Harness) reads an input resource and an output
//! resource, correlates each parsed input with its expected value by 1-based
//! position, and runs a function under test over every input, collecting the
//! inputs whose result didn't match.
//!
//! The basic flow is:
//!
//! 1. Build a [`HarnessConfig`](config::HarnessConfig), either in code or from
//!    `.config/vpw.toml`.
//! 2. Build a harness with an [`InputParser`](parse::InputParser) and an
//!    [`OutputParser`](parse::OutputParser).
//! 3. Call [`initialize`](harness::Harness::initialize), then
//!    [`run`](harness::Harness::run) as many times as needed.

pub mod config;
pub mod errors;
pub mod harness;
mod loader;
pub mod parse;
pub mod resource;
