//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::sentiment::{Tone, classify};
use crate::tui::app::App;

/// Maps a sentiment tone to a terminal color.
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Bullish => Color::Green,
        Tone::Bearish => Color::Red,
        Tone::Neutral => Color::Gray,
    }
}

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let live_span = if app.live {
        Span::styled(
            " ● LIVE ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ❚❚ PAUSED ", Style::default().fg(Color::Black).bg(Color::Yellow))
    };

    let mut spans = vec![live_span, Span::raw(" ")];

    if let Some(reading) = &app.sentiment {
        let style = classify(reading);
        spans.push(Span::styled(
            format!(" {} {} ", style.icon, reading.sentiment.label()),
            Style::default()
                .fg(tone_color(style.tone))
                .add_modifier(Modifier::BOLD),
        ));
        // Buy/sell split drawn in the gradient's tone
        spans.push(Span::styled(
            format!(
                "B {:.0}% / S {:.0}% ",
                reading.buy_pressure, reading.sell_pressure
            ),
            Style::default().fg(tone_color(style.gradient.tone)),
        ));
        spans.push(Span::raw("│"));
    }

    if let Some(snapshot) = &app.snapshot {
        spans.push(Span::styled(
            format!(" {} ", snapshot.last_update),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("│"));
    }

    spans.push(Span::styled(
        format!(" #{} ", app.snapshots_seen),
        Style::default().fg(Color::Cyan),
    ));

    if let Some(ref notice) = app.notice {
        spans.push(Span::raw("│"));
        spans.push(Span::styled(
            format!(" {} ", notice.message),
            Style::default().fg(Color::Yellow),
        ));
    }

    let line = Line::from(spans);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
