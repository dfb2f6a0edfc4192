//! Order book panel: level table rows with depth bars and change highlights.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::models::Side;
use crate::table::LevelRow;
use crate::tracker::Direction;
use crate::tui::app::{App, Selection};

/// Width of the depth bar column in cells.
const BAR_WIDTH: usize = 15;

/// Renders the order book panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let title = if app.live {
        " Order Book "
    } else {
        " Order Book [PAUSED] "
    };
    let border_style = if app.live {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(view) = app.table_view(now) else {
        let para = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "  {:>14} {:>12} {:>12}",
            view.headers.price, view.headers.size, view.headers.total
        ),
        Style::default().fg(Color::DarkGray),
    )));

    // Asks reversed so the best ask sits next to the spread
    for row in view.asks.iter().rev() {
        lines.push(row_line(row, app.selection));
    }

    lines.push(Line::from(Span::styled(
        format!("─── Spread: {} ───", view.spread_text),
        Style::default().fg(Color::DarkGray),
    )));

    for row in &view.bids {
        lines.push(row_line(row, app.selection));
    }

    if view.is_empty() {
        lines.push(Line::from(Span::styled(
            "Empty book",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines);
    frame.render_widget(para, inner);
}

/// Rows per side that fit a book panel drawn in `area`.
pub fn rows_per_side(area: Rect) -> usize {
    // Borders, then the column header and spread line
    let inner = area.height.saturating_sub(2);
    (inner.saturating_sub(2) / 2) as usize
}

/// Builds one row: change marker, price, size, total, depth bar.
fn row_line(row: &LevelRow, selection: Selection) -> Line<'static> {
    let side_color = match row.side {
        Side::Bid => Color::Green,
        Side::Ask => Color::Red,
    };

    let (marker, price_style) = match row.change {
        Some(Direction::Up) => (
            "▲",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Some(Direction::Down) => (
            "▼",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        None => (" ", Style::default().fg(side_color)),
    };

    let bar = row
        .depth_pct
        .map(|pct| "▒".repeat(bar_cells(pct)))
        .unwrap_or_default();

    let mut line = Line::from(vec![
        Span::styled(format!("{marker} "), Style::default().fg(side_color)),
        Span::styled(format!("{:>14}", row.price_text), price_style),
        Span::raw(format!(" {:>12}", row.size_text)),
        Span::raw(format!(" {:>12} ", row.total_text)),
        Span::styled(bar, Style::default().fg(side_color)),
    ]);

    if selection.side == row.side && selection.rank == row.rank {
        line = line.style(Style::default().add_modifier(Modifier::REVERSED));
    }
    line
}

/// Number of bar cells for a depth percentage.
fn bar_cells(pct: f64) -> usize {
    let cells = (pct.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round();
    cells as usize
}
