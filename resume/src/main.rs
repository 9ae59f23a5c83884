//! A TUI for signing up, logging in, and getting resumes parsed by the resume
//! agent API

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Macro for tabbing between form fields
mod form_fields;

use app::{Action, App, Effect, EffectContext};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream},
    execute,
};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{io, path::Path, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The TUI owns stdout, so logs go to a file. Hold on to the guard so
    // buffered lines get flushed when we exit.
    let (_guard, logging_problem) = init_logging(&config);
    tracing::info!(api_url = %config.api_url, "starting");

    let context = EffectContext::new(config.request_timeout).map_err(io::Error::other)?;

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableBracketedPaste)?;
    terminal.clear()?;

    let res = run(terminal, &config, Arc::new(context), logging_problem).await;

    let _ = execute!(io::stdout(), DisableBracketedPaste);
    ratatui::restore();
    res
}

/// Open a daily log file (`resume.<date>.log`) in `dir`, creating it if
/// needed.
fn open_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("resume")
        .filename_suffix("log")
        .build(dir)
}

/// Set up `tracing` to write to a daily log file. Filter with `RUST_LOG`.
///
/// If the log directory can't be used we still run, just without logs, and
/// return a message to show the user.
fn init_logging(config: &config::Config) -> (WorkerGuard, Option<String>) {
    let dir = config.log_dir();

    let ((writer, guard), problem) = match open_appender(&dir) {
        Ok(appender) => (tracing_appender::non_blocking(appender), None),
        Err(err) => (
            tracing_appender::non_blocking(io::sink()),
            Some(format!("Logging disabled, can't write to {}: {err}", dir.display())),
        ),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    (guard, problem)
}

/// Manage the lifecycle of the app
async fn run(
    mut terminal: DefaultTerminal,
    config: &config::Config,
    context: Arc<EffectContext>,
    logging_problem: Option<String>,
) -> io::Result<ExitCode> {
    let mut app = App::new(config.api_url.clone());

    if let Some(problem) = logging_problem {
        app.handle(Action::Problem(problem));
    }

    // Remote calls run as async tasks. Once they're done, we read their
    // results off of a channel. We keep track of outstanding calls so we can
    // stop them when exiting.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<JoinHandle<()>> = Vec::with_capacity(3);

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    loop {
        // Wait for either terminal input or the result of a call. Not every
        // terminal event matters to us (e.g. mouse movement), hence `Option`.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => Some(Action::Key(key_event)),
                    Some(Ok(Event::Paste(text))) => Some(Action::Paste(text)),
                    Some(Err(err)) => Some(Action::Problem(err.to_string())),
                    _ => None,
                }
            },

            effect_opt = effect_rx.recv() => effect_opt,
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&context),
                    effect,
                ));
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        // This list is at most one entry per kind of call, so a full scan on
        // every pass is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Calls can't be cancelled while the app is running, but there's no
        // one to show their results to once we're exiting.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                effect.abort();
            }

            tracing::info!("exiting");
            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<Action>,
    context: Arc<EffectContext>,
    effect: Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let next_action = effect.run(&context).await;

        // If the channel is closed we're shutting down and nobody needs the
        // result.
        let _ = effect_tx.send(next_action);
    })
}
