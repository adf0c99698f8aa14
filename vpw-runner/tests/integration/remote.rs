// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::Result;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use vpw_runner::{
    config::HarnessConfig,
    errors::{HarnessInitError, ReadResourceError},
    harness::Harness,
    parse::{InputParser, OutputParser},
};

fn routes(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(path, body)| ((*path).to_owned(), (*body).to_owned()))
        .collect()
}

fn remote_harness(fixtures: &TempFixtures, server: &FixtureServer) -> Harness<u64> {
    Harness::builder(
        HarnessConfig::new("in.txt", "uit.txt")
            .with_base_dir(fixtures.base_dir())
            .with_remote_base_url(server.base_url()),
        InputParser::from_str_impl(),
        OutputParser::indexed(),
    )
    .build()
}

#[tokio::test]
async fn fetches_missing_fixtures() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    let server = FixtureServer::start(routes(&[
        ("/src/in.txt", LANG_GETAL_INPUT),
        ("/src/uit.txt", LANG_GETAL_OUTPUT),
    ]))?;

    let mut harness = remote_harness(&fixtures, &server);
    harness.initialize().await?;
    harness.run(total_digits)?;

    assert_eq!(harness.tests_executed(), 5);
    assert!(harness.error_inputs().is_empty());
    assert_eq!(server.requests(), vec!["/src/in.txt", "/src/uit.txt"]);
    Ok(())
}

#[tokio::test]
async fn local_file_takes_priority() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", "15\n")?;
    let server = FixtureServer::start(routes(&[
        ("/src/in.txt", "8\n"),
        ("/src/uit.txt", "1 21\n"),
    ]))?;

    let mut harness = remote_harness(&fixtures, &server);
    harness.initialize().await?;

    assert_eq!(harness.inputs(), &[15]);
    assert_eq!(server.requests(), vec!["/src/uit.txt"]);
    Ok(())
}

#[tokio::test]
async fn remote_not_found() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", "15\n")?;
    let server = FixtureServer::start(BTreeMap::new())?;

    let mut harness = remote_harness(&fixtures, &server);
    let error = harness.initialize().await.unwrap_err();
    match error {
        HarnessInitError::ResourceLoad(error) => {
            assert_eq!(error.name(), "uit.txt");
            match error.read_error() {
                ReadResourceError::Fallback { fallback, .. } => {
                    let expected_url = format!("{}/src/uit.txt", server.base_url());
                    assert!(
                        matches!(&**fallback, ReadResourceError::Http { url, .. } if *url == expected_url),
                        "unexpected fallback error: {fallback:?}"
                    );
                }
                other => panic!("unexpected read error: {other}"),
            }
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
