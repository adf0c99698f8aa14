// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use owo_colors::{OwoColorize, Style, style};
use std::{fmt, io};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};
use vpw_runner::harness::RunStats;

/// The environment variable that controls color output: `auto`, `always` or `never`.
pub const COLOR_ENV: &str = "VPW_COLOR";

/// The environment variable that controls log filtering, in `tracing` target syntax.
pub const LOG_ENV: &str = "VPW_LOG";

/// Output settings for a single invocation.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) color: Color,
}

impl OutputContext {
    /// Reads the color setting from `VPW_COLOR`, and sets up logging to stderr.
    pub fn from_env() -> Self {
        let color = std::env::var(COLOR_ENV)
            .ok()
            .and_then(|value| Color::parse(&value))
            .unwrap_or_default();
        Self::new(color)
    }

    /// Sets up logging to stderr with the given color setting.
    ///
    /// Logging is only set up once per process, so later calls only change the output styles.
    pub fn new(color: Color) -> Self {
        color.init();
        Self { color }
    }

    /// Returns general stderr styles for the current output context.
    pub fn stderr_styles(&self) -> StderrStyles {
        let mut styles = StderrStyles::default();

        if self.color.should_colorize(supports_color::Stream::Stderr) {
            styles.colorize();
        }

        styles
    }

    /// Returns styles for the run summary written to stdout.
    pub fn summary_styles(&self) -> SummaryStyles {
        let mut styles = SummaryStyles::default();

        if self.color.should_colorize(supports_color::Stream::Stdout) {
            styles.colorize();
        }

        styles
    }
}

/// Whether to produce color output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub enum Color {
    /// Colorize if the stream supports it.
    #[default]
    Auto,

    /// Always colorize.
    Always,

    /// Never colorize.
    Never,
}

impl Color {
    /// Parses a color setting, ignoring case. Returns `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub(crate) fn init(self) {
        let mut log_styles = LogStyles::default();
        if self.should_colorize(supports_color::Stream::Stderr) {
            log_styles.colorize();
        }

        INIT_LOGGER.call_once(|| {
            // Unparseable filters fall back to the default.
            let targets = std::env::var(LOG_ENV)
                .ok()
                .filter(|level_str| !level_str.is_empty())
                .and_then(|level_str| level_str.parse::<Targets>().ok())
                .unwrap_or_else(|| Targets::new().with_default(LevelFilter::INFO));

            let layer = tracing_subscriber::fmt::layer()
                .event_format(SimpleFormatter { styles: log_styles })
                .with_writer(io::stderr)
                .with_filter(targets);

            tracing_subscriber::registry().with(layer).init();
        });
    }

    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

struct SimpleFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        if metadata.target() != "lang_getal::no_heading" {
            let (label, style) = match *metadata.level() {
                Level::ERROR => ("error", self.styles.error),
                Level::WARN => ("warning", self.styles.warning),
                Level::INFO => ("info", self.styles.info),
                Level::DEBUG => ("debug", self.styles.debug),
                Level::TRACE => ("trace", self.styles.trace),
            };
            write!(writer, "{}: ", label.style(style))?;
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            error: None,
        };

        event.record(&mut visitor);

        if let Some(error) = visitor.error {
            return Err(error);
        }

        writeln!(writer)
    }
}

static MESSAGE_FIELD: &str = "message";

struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    error: Option<fmt::Error>,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD
            && let Err(error) = write!(self.writer, "{value:?}")
        {
            self.error = Some(error);
        }
    }
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
    trace: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.info = style().bold();
        self.debug = style().bold();
        self.trace = style().dimmed();
    }
}

/// Styles for messages written to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

impl StderrStyles {
    fn colorize(&mut self) {
        self.bold = style().bold();
    }
}

/// Styles for the run summary.
#[derive(Debug, Default)]
pub struct SummaryStyles {
    pass: Style,
    fail: Style,
    count: Style,
}

impl SummaryStyles {
    fn colorize(&mut self) {
        self.pass = style().green().bold();
        self.fail = style().red().bold();
        self.count = style().bold();
    }
}

/// Writes the one-line run summary.
///
/// Inputs that panicked are listed on a separate line after the mismatches.
pub(crate) fn write_summary<T: fmt::Debug>(
    mut writer: impl io::Write,
    stats: &RunStats,
    error_inputs: &[T],
    panicked_inputs: &[T],
    styles: &SummaryStyles,
) -> io::Result<()> {
    if stats.is_success() {
        return writeln!(
            writer,
            "{} {} tests passed!",
            "All".style(styles.pass),
            stats.initial_run_count.style(styles.count),
        );
    }

    if stats.failed > 0 || stats.panicked == 0 {
        writeln!(
            writer,
            "{} {}/{} tests for inputs: {error_inputs:?}",
            "Found errors in".style(styles.fail),
            stats.failed.style(styles.count),
            stats.initial_run_count.style(styles.count),
        )?;
    }
    if stats.panicked > 0 {
        writeln!(
            writer,
            "{} {}/{} tests for inputs: {panicked_inputs:?}",
            "Panicked in".style(styles.fail),
            stats.panicked.style(styles.count),
            stats.initial_run_count.style(styles.count),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn summary(stats: RunStats, error_inputs: &[u64], panicked_inputs: &[u64]) -> String {
        let mut buf = Vec::new();
        write_summary(
            &mut buf,
            &stats,
            error_inputs,
            panicked_inputs,
            &SummaryStyles::default(),
        )
        .expect("writing to a Vec succeeds");
        String::from_utf8(buf).expect("summary is valid UTF-8")
    }

    #[test]
    fn all_passed() {
        let stats = RunStats {
            initial_run_count: 5,
            passed: 5,
            ..RunStats::default()
        };
        assert_eq!(summary(stats, &[], &[]), "All 5 tests passed!\n");
    }

    #[test]
    fn some_failed() {
        let stats = RunStats {
            initial_run_count: 5,
            passed: 3,
            failed: 2,
            ..RunStats::default()
        };
        assert_eq!(
            summary(stats, &[15, 997], &[]),
            "Found errors in 2/5 tests for inputs: [15, 997]\n"
        );
    }

    #[test]
    fn panicked_only() {
        let stats = RunStats {
            initial_run_count: 3,
            passed: 2,
            panicked: 1,
            ..RunStats::default()
        };
        assert_eq!(
            summary(stats, &[], &[99]),
            "Panicked in 1/3 tests for inputs: [99]\n"
        );
    }

    #[test_case("auto", Some(Color::Auto))]
    #[test_case(" Always ", Some(Color::Always) ; "trimmed and case insensitive")]
    #[test_case("never", Some(Color::Never))]
    #[test_case("sometimes", None)]
    fn parse_color(input: &str, expected: Option<Color>) {
        assert_eq!(Color::parse(input), expected);
    }
}
