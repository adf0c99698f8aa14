// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::Result;
use lang_getal::OutputContext;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = enable_ansi_support::enable_ansi_support();

    let output = OutputContext::from_env();

    match lang_getal::exec(output, std::io::stdout().lock()) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}
