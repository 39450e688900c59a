//! `multisearch` - pick any number of users from a searchable list.
//!
//! Runs the prompt inline below the cursor, prints the selected users one
//! per line on submit and exits with status 130 when cancelled.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::{Paragraph, Widget};
use ratatui::{Terminal, TerminalOptions};

use cortex_multisearch::demo;
use cortex_multisearch::prelude::*;

/// Exit status for a cancelled prompt.
const EXIT_CANCELLED: u8 = 130;

/// Box borders plus the line reserved for a warning.
const FRAME_OVERHEAD: usize = 4;

#[derive(Debug, Parser)]
#[command(name = "multisearch", version, about = "Search and select users")]
struct Args {
    /// TOML file with prompt settings
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prompt label
    #[arg(long)]
    label: Option<String>,

    /// Text shown while the query is empty
    #[arg(long)]
    placeholder: Option<String>,

    /// Maximum rows in the scroll window
    #[arg(long, value_name = "ROWS")]
    scroll: Option<usize>,

    /// Refuse to submit an empty selection
    #[arg(long)]
    required: bool,

    /// Preselected user (repeatable)
    #[arg(long = "default", value_name = "USER")]
    defaults: Vec<String>,

    /// Simulated provider latency
    #[arg(long, value_name = "MS", default_value_t = 100)]
    delay_ms: u64,

    /// Write logs to this file
    #[arg(long, value_name = "FILE", env = "MULTISEARCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "debug")]
    log_level: String,
}

impl Args {
    /// Config file (or built-in defaults) with command line overrides applied.
    fn prompt_config(&self) -> Result<PromptConfig> {
        let mut config = match &self.config {
            Some(path) => PromptConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => PromptConfig::builder(demo::USERS_LABEL)
                .placeholder("Search...")
                .build()?,
        };

        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            config.placeholder = placeholder.clone();
        }
        if let Some(scroll) = self.scroll {
            config.scroll = scroll;
        }
        if self.required {
            config.required = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Keeps the non-blocking log writer alive until exit.
struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Log to `path`. The terminal itself is owned by the prompt, so logs never
/// go to stderr.
fn setup_file_logging(path: &Path, level: &str) -> Result<LogGuard> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(LogGuard { _guard: guard })
}

/// Raw mode and bracketed paste for the lifetime of the prompt.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnableBracketedPaste)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(io::stdout(), DisableBracketedPaste);
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

fn run(args: &Args) -> Result<ComponentResult<Vec<String>>> {
    let config = args.prompt_config()?;
    let delay = Duration::from_millis(args.delay_ms);

    let provider = move |query: &str| {
        if !query.is_empty() {
            thread::sleep(delay);
        }
        demo::users_provider(query)
    };

    let mut prompt = MultiSearchPrompt::new(config, provider)?
        .with_validator(demo::reject_user_zero)
        .deferred_fetch();
    if !args.defaults.is_empty() {
        prompt = prompt.with_defaults(Defaults::values(args.defaults.iter().cloned()));
    }

    let renderer = if std::env::var_os("NO_COLOR").is_some() {
        Renderer::new(Theme::monochrome())
    } else {
        Renderer::default()
    };

    let (cols, lines) = crossterm::terminal::size()?;
    let mut viewport = Viewport::new(cols, lines);
    prompt.set_viewport(viewport);
    let height = viewport.scroll_rows(prompt.config().scroll) + FRAME_OVERHEAD;

    let _raw_mode = RawModeGuard::enable()?;
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(io::stdout()),
        TerminalOptions {
            viewport: ratatui::Viewport::Inline(height as u16),
        },
    )?;

    let outcome = loop {
        let frame = renderer.render(&prompt.view(), viewport);
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(Paragraph::new(frame), area);
        })?;

        // The searching frame is on screen; run the provider now
        if prompt.phase() == PromptPhase::Searching {
            prompt.search();
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                let Some(key) = PromptKey::from_key_event(key) else {
                    continue;
                };
                let result = prompt.handle_key(key);
                if result.is_done() {
                    break result;
                }
            }
            Event::Paste(text) => {
                prompt.handle_paste(&text);
            }
            Event::Resize(cols, lines) => {
                viewport = Viewport::new(cols, lines);
                prompt.set_viewport(viewport);
                terminal.autoresize()?;
            }
            _ => {}
        }
    };

    // Leave the final frame in the scrollback
    let frame = renderer.render(&prompt.view(), viewport);
    let rows = frame.height() as u16;
    terminal.clear()?;
    terminal.insert_before(rows, |buf| Paragraph::new(frame).render(buf.area, buf))?;

    Ok(outcome)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = match &args.log_file {
        Some(path) => Some(setup_file_logging(path, &args.log_level)?),
        None => None,
    };
    tracing::debug!(version = cortex_multisearch::VERSION, "starting multisearch");

    match run(&args)? {
        ComponentResult::Done(value) => {
            tracing::info!(selected = value.len(), "prompt submitted");
            for id in value {
                println!("{id}");
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            tracing::info!("prompt cancelled");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "multisearch",
            "--label",
            "Pick",
            "--scroll",
            "8",
            "--required",
            "--default",
            "User 5",
            "--default",
            "User 6",
        ]);
        let config = args.prompt_config().unwrap();
        assert_eq!(config.label, "Pick");
        assert_eq!(config.placeholder, "Search...");
        assert_eq!(config.scroll, 8);
        assert!(config.required);
        assert_eq!(args.defaults, vec!["User 5", "User 6"]);
    }

    #[test]
    fn test_default_config() {
        let args = Args::parse_from(["multisearch"]);
        let config = args.prompt_config().unwrap();
        assert_eq!(config.label, demo::USERS_LABEL);
        assert_eq!(config.scroll, 5);
        assert_eq!(args.delay_ms, 100);
    }

    #[test]
    fn test_zero_scroll_rejected() {
        let args = Args::parse_from(["multisearch", "--scroll", "0"]);
        assert!(args.prompt_config().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::parse_from(["multisearch", "--config", "/nonexistent/multisearch.toml"]);
        let err = args.prompt_config().unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
