//! Depth chart panel drawn on a braille canvas.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};

use crate::chart::{ChartGeometry, PathGeometry};
use crate::tui::app::App;

/// Renders the depth chart panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(chart) = app.chart() else {
        let block = Block::default()
            .title(" Depth ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let para = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    };

    let precision = app.options.price_precision as usize;
    let title = format!(
        " Depth {:.*} – {:.*} ",
        precision, chart.bounds.min_price, precision, chart.bounds.max_price
    );

    let viewport = chart.viewport;
    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width])
        .y_bounds([0.0, viewport.height])
        .paint(|ctx| draw_chart(ctx, chart));

    frame.render_widget(canvas, area);
}

/// Draws both outlines and the mid line. Geometry y grows downward; the
/// canvas grows upward, so every y is flipped against the viewport height.
fn draw_chart(ctx: &mut Context, chart: &ChartGeometry) {
    let height = chart.viewport.height;

    if let Some(mid_x) = chart.mid_x {
        ctx.draw(&CanvasLine::new(mid_x, 0.0, mid_x, height, Color::DarkGray));
    }
    if let Some(path) = &chart.bid_path {
        draw_outline(ctx, path, height, Color::Green);
    }
    if let Some(path) = &chart.ask_path {
        draw_outline(ctx, path, height, Color::Red);
    }
}

fn draw_outline(ctx: &mut Context, path: &PathGeometry, height: f64, color: Color) {
    for pair in path.vertices.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        ctx.draw(&CanvasLine::new(x1, height - y1, x2, height - y2, color));
    }
}
