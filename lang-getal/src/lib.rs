// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The "lang getal" exercise, checked against its VPW fixtures.
//!
//! Writing out every number from 1 to `n` one after the other gives one long number. The exercise
//! asks for how many digits that long number has. [`lang_getal`] computes it, and [`exec`] runs it
//! over the fixtures in `src/in.txt` and `src/uit.txt`.

mod digits;
mod dispatch;
pub mod errors;
mod output;

pub use digits::lang_getal;
pub use dispatch::{exec, run_fixtures};
pub use errors::{ExpectedError, LangGetalExitCode};
pub use output::{COLOR_ENV, Color, LOG_ENV, OutputContext, StderrStyles, SummaryStyles};
