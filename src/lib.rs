//! Market depth visualization engine.
//!
//! Turns host-supplied order book snapshots into ranked level rows with
//! depth bars ([`table`]), per-rank price change highlights ([`tracker`]),
//! step-area depth chart geometry ([`chart`]) and a coarse sentiment badge
//! ([`sentiment`]). The engine does no I/O and never fails on malformed
//! data; it renders the degenerate case instead. A terminal host ([`tui`])
//! and a replay feed ([`replay`]) drive it from the bundled binary.

pub mod chart;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod replay;
pub mod sentiment;
pub mod table;
pub mod tracker;
pub mod tui;

pub use error::{DepthViewError, Result};
