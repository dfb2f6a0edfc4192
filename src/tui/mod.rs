//! Terminal host for the depth view.
//!
//! Provides a Ratatui-based TUI that renders the level table, change
//! highlights, depth chart and sentiment badge from a snapshot feed.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod timers;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{TerminalSession, Tui, restore_terminal, setup_terminal};
pub use timers::HighlightTimers;
pub use ui::render;
