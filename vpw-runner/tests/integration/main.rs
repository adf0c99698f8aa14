// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the harness against real files and a local HTTP
//! server.

mod fixtures;
mod local;
mod remote;
