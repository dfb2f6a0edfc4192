//! Event handling for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::events::DepthEvent;
use crate::models::{BookSnapshot, SentimentReading};
use crate::tracker::ClearTicket;

use super::app::App;
use super::ui::{book_rows_per_side, chart_viewport};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// A new book snapshot from the feed, with an optional host sentiment.
    Snapshot {
        snapshot: BookSnapshot,
        sentiment: Option<SentimentReading>,
    },
    /// A highlight timer fired.
    HighlightExpired(ClearTicket),
    /// Request to quit the application.
    Quit,
}

/// Actions that require handling outside the app state.
#[derive(Debug)]
pub enum Action {
    /// Arm a clear timer for each ticket.
    ScheduleClears(Vec<ClearTicket>),
    /// Relay an interaction to the host callbacks.
    Notify(DepthEvent),
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        // `interval` panics on a zero period.
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message, now: Instant) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event, now),
        Message::Snapshot {
            snapshot,
            sentiment,
        } => {
            let tickets = app.apply_snapshot(snapshot, sentiment, now);
            if tickets.is_empty() {
                None
            } else {
                Some(Action::ScheduleClears(tickets))
            }
        }
        Message::HighlightExpired(ticket) => {
            app.expire_highlight(&ticket);
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event, now: Instant) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key, now),
        Event::Resize(w, h) => {
            app.resize_chart(chart_viewport(w, h));
            app.set_book_rows(book_rows_per_side(w, h));
            None
        }
        Event::Tick => {
            app.clear_stale_notice();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            None
        }
        KeyCode::Enter => app
            .selected_row(now)
            .map(|row| Action::Notify(row.click())),
        KeyCode::Char('d') => app
            .selected_row(now)
            .map(|row| Action::Notify(row.double_click())),
        KeyCode::Char(' ') => Some(Action::Notify(app.toggle_live())),
        _ => None,
    }
}
