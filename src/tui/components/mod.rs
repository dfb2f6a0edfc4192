//! Reusable TUI components.

pub mod depth_chart;
pub mod order_book;
pub mod status_bar;
