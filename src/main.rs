use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};

use depthview::config::fetch_config;
use depthview::events::{DepthEvent, DepthHandler};
use depthview::models::Side;
use depthview::replay::{ReplayFeed, spawn_replay};
use depthview::tui::event::{spawn_event_reader, spawn_tick_timer, update};
use depthview::tui::ui::{book_rows_per_side, chart_viewport};
use depthview::tui::{Action, App, HighlightTimers, Message, TerminalSession, render};
use depthview::{DepthViewError, Result};

/// Host callbacks: log interactions and drive the replay pause switch.
struct HostHandler {
    live: watch::Sender<bool>,
    notice: Option<String>,
}

impl DepthHandler for HostHandler {
    fn on_price_click(&mut self, price: Decimal) {
        tracing::info!(%price, "price clicked");
        self.notice = Some(format!("clicked {price}"));
    }

    fn on_row_double_click(&mut self, price: Decimal, size: Decimal, side: Side) {
        tracing::info!(%price, %size, %side, "row double-clicked");
        self.notice = Some(format!("{side} {size} @ {price}"));
    }

    fn on_live_toggle(&mut self) {
        let live = !*self.live.borrow();
        self.live.send_replace(live);
        tracing::info!(live, "live toggled");
        self.notice = Some(if live { "resumed" } else { "paused" }.to_string());
    }
}

/// Installs a file-backed subscriber when `DEPTHVIEW_LOG` names a path.
fn init_tracing() -> Result<()> {
    let Some(path) = std::env::var("DEPTHVIEW_LOG").ok().filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .map_err(|e| DepthViewError::Io(format!("failed to create log file {path}: {e}")))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = fetch_config()?;

    let feed = match std::env::args().nth(1) {
        Some(path) => ReplayFeed::load(&PathBuf::from(path))?,
        None => ReplayFeed::synthetic(Decimal::from(65_000), Decimal::new(5, 1), 24, 240),
    };

    let mut session = TerminalSession::start()?;
    let (width, height) = session.size()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (live_tx, live_rx) = watch::channel(true);

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), config.tick_interval_ms);
    spawn_replay(feed, tx.clone(), config.replay_interval_ms, live_rx);

    let mut app = App::new(config, chart_viewport(width, height));
    app.set_book_rows(book_rows_per_side(width, height));
    let mut timers = HighlightTimers::new(tx.clone());
    let mut handler = HostHandler {
        live: live_tx,
        notice: None,
    };

    tracing::info!(
        levels = app.options.levels,
        window_ms = app.config.highlight_window_ms,
        "depth view started"
    );

    while !app.should_quit {
        session
            .terminal()
            .draw(|frame| render(frame, &app))
            .map_err(|e| DepthViewError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Message::HighlightExpired(ticket) = &message {
            timers.complete(ticket);
        }

        match update(&mut app, message, Instant::now()) {
            Some(Action::ScheduleClears(tickets)) => {
                for ticket in tickets {
                    timers.schedule(ticket);
                }
            }
            Some(Action::Notify(event)) => {
                event.dispatch(&mut handler);
                if let Some(notice) = handler.notice.take() {
                    app.show_notice(notice);
                }
                if matches!(event, DepthEvent::LiveToggle) {
                    app.tracker.reset();
                    timers.cancel_all();
                }
            }
            None => {}
        }
    }

    drop(timers);
    session.finish()
}
