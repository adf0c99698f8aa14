// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use indoc::indoc;
use pretty_assertions::assert_eq;
use vpw_runner::{
    config::{HarnessConfig, HeaderMode},
    errors::{HarnessInitError, ReadResourceError},
    harness::{Harness, HarnessState},
    parse::{InputParser, OutputParser},
};

fn lang_getal_harness(fixtures: &TempFixtures) -> Harness<u64> {
    Harness::builder(
        HarnessConfig::new("in.txt", "uit.txt").with_base_dir(fixtures.base_dir()),
        InputParser::from_str_impl(),
        OutputParser::indexed(),
    )
    .build()
}

#[tokio::test]
async fn reference_implementation_passes() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", LANG_GETAL_INPUT)?;
    fixtures.write("uit.txt", LANG_GETAL_OUTPUT)?;

    let mut harness = lang_getal_harness(&fixtures);
    harness.initialize().await?;
    assert_eq!(harness.tests_executed(), 5);

    let stats = harness.run(total_digits)?;
    ensure!(
        harness.error_inputs().is_empty(),
        "unexpected errors: {:?}",
        harness.error_inputs()
    );
    assert_eq!(stats.passed, 5);
    Ok(())
}

#[tokio::test]
async fn wrong_answer_is_recorded() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", "15\n")?;
    fixtures.write("uit.txt", "1 21\n")?;

    let mut harness = lang_getal_harness(&fixtures);
    harness.initialize().await?;
    harness.run(|n| if n == 15 { 20 } else { total_digits(n) })?;

    assert_eq!(harness.error_inputs(), &[15]);
    Ok(())
}

#[tokio::test]
async fn altered_expectation_flags_one_input() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", LANG_GETAL_INPUT)?;
    fixtures.write("uit.txt", &LANG_GETAL_OUTPUT.replace("3 189", "3 190"))?;

    let mut harness = lang_getal_harness(&fixtures);
    harness.initialize().await?;
    harness.run(total_digits)?;

    assert_eq!(harness.error_inputs(), &[99]);
    Ok(())
}

#[tokio::test]
async fn crlf_and_blank_lines() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("in.txt", "\r\n8\r\n\r\n15\r\n")?;
    fixtures.write("uit.txt", "1 8\r\n2 21\r\n\r\n")?;

    let mut harness = lang_getal_harness(&fixtures);
    harness.initialize().await?;
    assert_eq!(harness.inputs(), &[8, 15]);
    Ok(())
}

#[tokio::test]
async fn missing_fixture_without_remote() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write("uit.txt", "1 8\n")?;

    let mut harness = lang_getal_harness(&fixtures);
    let error = harness.initialize().await.unwrap_err();
    match error {
        HarnessInitError::ResourceLoad(error) => {
            assert_eq!(error.name(), "in.txt");
            match error.read_error() {
                ReadResourceError::Fallback { primary, fallback } => {
                    ensure!(
                        matches!(**primary, ReadResourceError::Io { .. }),
                        "primary error should be an I/O error, was {primary}"
                    );
                    ensure!(
                        matches!(**fallback, ReadResourceError::NoRemoteBase),
                        "fallback error should be NoRemoteBase, was {fallback}"
                    );
                }
                other => panic!("unexpected read error: {other}"),
            }
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(harness.state(), HarnessState::Unconfigured);
    Ok(())
}

#[tokio::test]
async fn config_from_repository_file() -> Result<()> {
    test_init();
    let fixtures = TempFixtures::new()?;
    fixtures.write_config(indoc! {r#"
        input = "cases.txt"
        output = "answers.txt"
        header = "test-count"
    "#})?;
    fixtures.write("cases.txt", "3\n1\n2\n3\n")?;
    fixtures.write("answers.txt", "1\n2\n1\n")?;

    let config =
        HarnessConfig::from_sources(fixtures.base_dir(), None)?.with_base_dir(fixtures.base_dir());
    assert_eq!(config.header(), HeaderMode::TestCount);

    let mut harness = Harness::builder(
        config,
        InputParser::<u64>::from_str_impl(),
        OutputParser::values(),
    )
    .build();
    harness.initialize().await?;
    harness.run(|n: u64| n)?;

    assert_eq!(harness.tests_executed(), 3);
    assert_eq!(harness.error_inputs(), &[3]);
    Ok(())
}
