// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration of demo output, such as colorization and logging.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::fmt;
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

/// The environment variable holding the log filter, e.g. `testresult_view=debug`.
pub(crate) static LOG_ENV: &str = "TESTRESULT_VIEW_LOG";

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Produce color output
    #[arg(
        long,
        value_enum,
        default_value_t,
        global = true,
        env = "TESTRESULT_DEMO_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        let OutputOpts { color } = self;
        color.init();
        OutputContext { color }
    }
}

/// High level specification of demo output options
#[derive(Copy, Clone, Debug)]
#[must_use]
pub(crate) struct OutputContext {
    /// Specify how colorization is determined (not what color is used)
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns styles for the result tree written to stdout.
    pub(crate) fn stdout_styles(&self) -> ResultStyles {
        let mut styles = ResultStyles::default();
        if self.color.should_colorize(supports_color::Stream::Stdout) {
            styles.colorize();
        }
        styles
    }
}

/// Specifies whether to colorize output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    /// Determine coloration based on whether the terminal supports it
    #[default]
    Auto,

    /// Always try to colorize
    Always,

    /// Never try to colorize
    Never,
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

impl Color {
    /// Initialize logging
    fn init(self) {
        let mut log_styles = LogStyles::default();
        if self.should_colorize(supports_color::Stream::Stderr) {
            log_styles.colorize();
        }

        INIT_LOGGER.call_once(|| {
            let level_str = std::env::var_os(LOG_ENV).unwrap_or_default();
            let level_str = level_str.to_string_lossy();

            // If the level string is empty or invalid, use the standard level filter instead.
            let targets = if level_str.is_empty() {
                Targets::new().with_default(LevelFilter::INFO)
            } else {
                match level_str.parse() {
                    Ok(targets) => targets,
                    Err(error) => {
                        eprintln!("ignoring invalid {LOG_ENV} value `{level_str}`: {error}");
                        Targets::new().with_default(LevelFilter::INFO)
                    }
                }
            };

            let layer = tracing_subscriber::fmt::layer()
                .event_format(SimpleFormatter { styles: log_styles })
                .with_writer(std::io::stderr)
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

/// Styles for the printed result tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResultStyles {
    pub(crate) group: Style,
    pub(crate) pass: Style,
    pub(crate) fail: Style,
    pub(crate) duration: Style,
    pub(crate) heading: Style,
}

impl ResultStyles {
    pub(crate) fn colorize(&mut self) {
        self.group = style().bold();
        self.pass = style().green().bold();
        self.fail = style().red().bold();
        self.duration = style().dimmed();
        self.heading = style().cyan().bold();
    }
}

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

        match *metadata.level() {
            Level::ERROR => {
                write!(writer, "{}: ", "error".style(self.styles.error))?;
            }
            Level::WARN => {
                write!(writer, "{}: ", "warning".style(self.styles.warning))?;
            }
            Level::INFO => {
                write!(writer, "{}: ", "info".style(self.styles.info))?;
            }
            Level::DEBUG => {
                write!(writer, "{}: ", "debug".style(self.styles.debug))?;
            }
            Level::TRACE => {
                write!(writer, "{}: ", "trace".style(self.styles.trace))?;
            }
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
