//! Main UI rendering coordinator.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::chart::Viewport;

use super::app::App;
use super::components::{depth_chart, order_book, status_bar};

/// Share of the width given to the order book panel.
const BOOK_PERCENT: u16 = 40;

/// Canvas sub-cell resolution (braille: 2x4 dots per cell).
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let now = Instant::now();
    let (status, book, chart, help) = split(frame.area());

    status_bar::render(frame, status, app);
    order_book::render(frame, book, app, now);
    depth_chart::render(frame, chart, app);
    render_keybindings(frame, help);
}

/// Chart viewport for a terminal of the given size, in canvas dots.
pub fn chart_viewport(width: u16, height: u16) -> Viewport {
    let (_, _, chart, _) = split(Rect::new(0, 0, width, height));
    // Borders take one cell on each edge.
    let inner_w = chart.width.saturating_sub(2);
    let inner_h = chart.height.saturating_sub(2);
    Viewport::new(f64::from(inner_w) * DOTS_X, f64::from(inner_h) * DOTS_Y)
}

/// Rows per side the book panel can draw on a terminal of the given size.
pub fn book_rows_per_side(width: u16, height: u16) -> usize {
    let (_, book, _, _) = split(Rect::new(0, 0, width, height));
    order_book::rows_per_side(book)
}

/// Splits the screen into status bar, book panel, chart panel and help line.
fn split(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(6),    // Book + chart
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(BOOK_PERCENT),
            Constraint::Percentage(100 - BOOK_PERCENT),
        ])
        .split(rows[1]);

    (rows[0], columns[0], columns[1], rows[2])
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = "[j/k]select [Enter]click [d]double-click [Space]live/pause [q]quit";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
