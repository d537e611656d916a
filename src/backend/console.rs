// Console sink: renders events as colorized text or JSON lines on stdout
// (or any injected writer).
use super::{Backend, EventDocument, run_blocking};
use crate::domain::{LogEvent, LogLevel, SetupError};
use crate::filter::DropFilter;
use chrono::Local;
use clap::ValueEnum;
use ::console::Style;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;
use std::sync::Arc;
use tracing::error;

/// Output format of the console backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, colorized by level
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub min_level: LogLevel,
    pub format: OutputFormat,
    pub drop_patterns: Vec<Option<String>>,
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub struct ConsoleBackend {
    config: ConsoleConfig,
    filter: DropFilter,
    out: SharedWriter,
    colored: bool,
}

impl ConsoleBackend {
    /// Console backend writing to stdout, colored when stdout supports it.
    pub fn new(config: ConsoleConfig) -> Self {
        let colored = ::console::colors_enabled();
        Self::with_writer(config, io::stdout()).with_colors(colored)
    }

    /// Console backend writing to an arbitrary sink, uncolored by default.
    pub fn with_writer(config: ConsoleConfig, out: impl Write + Send + 'static) -> Self {
        Self {
            config,
            filter: DropFilter::empty(),
            out: Arc::new(Mutex::new(Box::new(out))),
            colored: false,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn level_style(&self, level: LogLevel) -> Style {
        let style = match level {
            LogLevel::Trace => Style::new().dim(),
            LogLevel::Debug => Style::new().magenta(),
            LogLevel::Info => Style::new().blue().bright(),
            LogLevel::Warn => Style::new().yellow().bright(),
            LogLevel::Error => Style::new().red().bright(),
            LogLevel::Fatal => Style::new().red().bold(),
        };
        style.force_styling(self.colored)
    }

    fn render_text(&self, event: &LogEvent) -> String {
        let time = Local::now().format("[%H:%M:%S%.3f]");
        let level = self
            .level_style(event.level)
            .apply_to(format!("[{}]", event.level));
        let group = Style::new()
            .green()
            .force_styling(self.colored)
            .apply_to(&event.group);
        let message = Style::new()
            .yellow()
            .force_styling(self.colored)
            .apply_to(&event.message);

        if event.has_payload() {
            let data = Style::new()
                .white()
                .force_styling(self.colored)
                .apply_to(event.payload.to_string());
            format!("{time} {level} {group}: {message} {data}")
        } else {
            format!("{time} {level} {group}: {message}")
        }
    }

    fn render(&self, event: &LogEvent) -> Result<String, serde_json::Error> {
        match self.config.format {
            OutputFormat::Text => Ok(self.render_text(event)),
            OutputFormat::Json => serde_json::to_string(&EventDocument::now(event)),
        }
    }

    /// The line to print for `event`, or `None` when it is gated or dropped.
    fn line_for(&self, event: &LogEvent) -> Option<String> {
        if !event.level.is_enabled_for(self.config.min_level) {
            return None;
        }
        if self.filter.should_drop(&event.group, &event.message) {
            return None;
        }

        match self.render(event) {
            Ok(line) => Some(line),
            Err(e) => {
                error!("Failed to render console log line: {e}");
                None
            }
        }
    }
}

fn write_line(out: &SharedWriter, line: &str) {
    let mut out = out.lock();
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        error!("Failed to write console log line: {e}");
    }
}

impl Backend for ConsoleBackend {
    fn initialize(&mut self) -> Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + '_>> {
        Box::pin(async move {
            self.filter = DropFilter::compile(self.config.drop_patterns.iter().map(Option::as_deref))?;
            Ok(())
        })
    }

    fn log<'a>(&'a self, event: &'a LogEvent) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let line = self.line_for(event);
        let out = Arc::clone(&self.out);
        Box::pin(async move {
            if let Some(line) = line {
                run_blocking(move || write_line(&out, &line)).await;
            }
        })
    }
}
