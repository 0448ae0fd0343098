//! Runtime: event loop and terminal lifecycle for the settings TUI.
//!
//! - A dedicated input task blocks on `crossterm::event::read()` and forwards
//!   events over a channel.
//! - Effects returned by key handlers and updates are executed through
//!   [`cmd::run_from_effects`]; REST calls come back as [`PendingExec`]s
//!   polled from a `FuturesUnordered`.
//! - Ticks are fast while requests are in flight (throbber animation) and
//!   slow otherwise. Rendering happens only after something changed.

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};
use uploadvalidator_types::{Effect, Msg};

use crate::app::App;
use crate::cmd::{self, CommandContext, PendingExec};
use crate::ui::main_view::MainView;

type Backend = CrosstermBackend<std::io::Stdout>;

/// Spawn a blocking input reader that forwards terminal events.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    tokio::task::spawn_blocking(move || {
        let poll_interval = Duration::from_millis(50);
        loop {
            if sender.is_closed() {
                break;
            }
            match event::poll(poll_interval) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "failed to poll terminal input");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal input");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<Backend>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so enabled/disabled editors are reflected.
    app.rebuild_focus();
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Executes effects; returns `true` when one of them asked to quit.
fn process_effects(
    app: &mut App,
    context: &CommandContext,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<PendingExec>,
    main_view: &mut MainView,
) -> bool {
    if effects.is_empty() {
        return false;
    }
    let quit = effects.iter().any(|effect| matches!(effect, Effect::Quit));
    let batch = cmd::run_from_effects(context, effects);
    if !batch.pending.is_empty() {
        if !app.executing {
            app.throbber_idx = 0;
        }
        pending_execs.extend(batch.pending);
        app.executing = true;
    }
    for outcome in batch.immediate {
        let follow_up = main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome)));
        if !follow_up.is_empty() {
            let batch = cmd::run_from_effects(context, follow_up);
            pending_execs.extend(batch.pending);
        }
    }
    quit
}

/// Entry point for the TUI runtime: sets up the terminal, activates `repo`,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_app(mut app: App, context: CommandContext, repo: String) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::default();
    let mut terminal = setup_terminal()?;

    let mut pending_execs: FuturesUnordered<PendingExec> = FuturesUnordered::new();
    let initial = app.activate(&repo);
    process_effects(&mut app, &context, initial, &mut pending_execs, &mut main_view);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = fast_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    let result: Result<()> = loop {
        let target_interval = if app.executing { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects = Vec::new();
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break Ok(());
                };
                match event {
                    Event::Key(key) => effects.extend(main_view.handle_key_events(&mut app, key)),
                    Event::Resize(width, height) => effects.extend(main_view.handle_message(&mut app, Msg::Resize(width, height))),
                    _ => {}
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = app.executing;
            }

            Some(outcome) = pending_execs.next(), if !pending_execs.is_empty() => {
                effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !pending_execs.is_empty();
                if !app.executing {
                    app.throbber_idx = 0;
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break Ok(()); }
        }

        if process_effects(&mut app, &context, effects, &mut pending_execs, &mut main_view) {
            info!("quit requested");
            break Ok(());
        }

        if needs_render && let Err(error) = render(&mut terminal, &mut app, &mut main_view) {
            break Err(error);
        }
    };

    cleanup_terminal(&mut terminal)?;
    if app.panel.is_dirty() {
        warn!(repo = ?app.panel.repo_name(), "exiting with unsaved changes");
    }
    result
}
