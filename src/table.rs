//! Level table: the ranked bid/ask rows of the order book view.
//!
//! Rows are taken in the order the host supplied them; nothing is re-sorted.
//! Depth bars are normalized against the deepest *displayed* level on each
//! side, so they always fill the visible window however many levels are
//! hidden.

use std::time::Instant;

use rust_decimal::Decimal;

use crate::config::{DEFAULT_LEVELS, DepthConfig};
use crate::events::DepthEvent;
use crate::models::depth::to_f64;
use crate::models::{BookSnapshot, PriceLevel, Side};
use crate::tracker::{ChangeTracker, Direction};

/// Rendering options for the level table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Rows per side. Zero shows nothing; more than available shows all.
    pub levels: usize,
    pub price_precision: u32,
    pub size_precision: u32,
    pub quote_currency: String,
    pub show_depth_bars: bool,
    pub highlight_changes: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            price_precision: 2,
            size_precision: 4,
            quote_currency: "USDT".to_string(),
            show_depth_bars: true,
            highlight_changes: true,
        }
    }
}

impl From<&DepthConfig> for TableOptions {
    fn from(config: &DepthConfig) -> Self {
        Self {
            levels: config.levels,
            price_precision: config.price_precision,
            size_precision: config.size_precision,
            quote_currency: config.quote_currency.clone(),
            show_depth_bars: config.show_depth_bars,
            highlight_changes: config.highlight_changes,
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRow {
    pub side: Side,
    pub rank: usize,
    pub id: String,
    pub price: Decimal,
    pub size: Decimal,
    pub total: Decimal,
    pub order_count: Option<u32>,
    pub price_text: String,
    pub size_text: String,
    pub total_text: String,
    /// Depth bar width in percent of the side's window maximum.
    pub depth_pct: Option<f64>,
    pub change: Option<Direction>,
}

impl LevelRow {
    /// Event raised by a single click.
    pub fn click(&self) -> DepthEvent {
        DepthEvent::PriceClick { price: self.price }
    }

    /// Event raised by a double click.
    pub fn double_click(&self) -> DepthEvent {
        DepthEvent::RowDoubleClick {
            price: self.price,
            size: self.size,
            side: self.side,
        }
    }
}

/// Column header labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeaders {
    pub price: String,
    pub size: String,
    pub total: String,
}

/// Output of [`LevelTable::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Ask rows, best (lowest) first.
    pub asks: Vec<LevelRow>,
    /// Bid rows, best (highest) first.
    pub bids: Vec<LevelRow>,
    pub spread: Decimal,
    pub spread_percent: Decimal,
    pub spread_text: String,
    pub headers: TableHeaders,
}

impl TableView {
    pub fn rows(&self, side: Side) -> &[LevelRow] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub fn row(&self, side: Side, rank: usize) -> Option<&LevelRow> {
        self.rows(side).get(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

/// Stateless renderer for ranked level rows.
pub struct LevelTable;

impl LevelTable {
    /// Renders up to `options.levels` rows per side.
    ///
    /// When `changes` is given and highlighting is enabled, each row carries
    /// the tracker's active direction for its slot as of the given instant.
    pub fn render(
        snapshot: &BookSnapshot,
        options: &TableOptions,
        changes: Option<(&ChangeTracker, Instant)>,
    ) -> TableView {
        let changes = changes.filter(|_| options.highlight_changes);

        TableView {
            asks: side_rows(&snapshot.asks, Side::Ask, options, changes),
            bids: side_rows(&snapshot.bids, Side::Bid, options, changes),
            spread: snapshot.spread,
            spread_percent: snapshot.spread_percent,
            spread_text: format!(
                "{:.*} ({:.3}%)",
                options.price_precision as usize, snapshot.spread, snapshot.spread_percent
            ),
            headers: TableHeaders {
                price: format!("Price ({})", options.quote_currency),
                size: "Size".to_string(),
                total: "Total".to_string(),
            },
        }
    }
}

fn side_rows(
    levels: &[PriceLevel],
    side: Side,
    options: &TableOptions,
    changes: Option<(&ChangeTracker, Instant)>,
) -> Vec<LevelRow> {
    let window = &levels[..options.levels.min(levels.len())];
    let max_total = window_max_total(window);

    window
        .iter()
        .enumerate()
        .map(|(rank, level)| LevelRow {
            side,
            rank,
            id: level.id.clone(),
            price: level.price,
            size: level.size,
            total: level.total,
            order_count: level.order_count,
            price_text: format!("{:.*}", options.price_precision as usize, level.price),
            size_text: format!("{:.*}", options.size_precision as usize, level.size),
            total_text: format!("{:.*}", options.size_precision as usize, level.total),
            depth_pct: options
                .show_depth_bars
                .then(|| depth_pct(level.total, max_total)),
            change: changes.and_then(|(tracker, now)| tracker.direction(side, rank, now)),
        })
        .collect()
}

/// Total of the deepest displayed row, falling back to 1 for an empty or non-positive window.
fn window_max_total(window: &[PriceLevel]) -> f64 {
    match window.last().map(|level| to_f64(level.total)) {
        Some(total) if total > 0.0 && total.is_finite() => total,
        _ => 1.0,
    }
}

fn depth_pct(total: Decimal, max_total: f64) -> f64 {
    let pct = to_f64(total) / max_total * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accumulate;
    use rust_decimal_macros::dec;

    fn snapshot() -> BookSnapshot {
        BookSnapshot::from_levels(
            accumulate(
                Side::Bid,
                &[(dec!(100), dec!(1)), (dec!(99), dec!(2)), (dec!(98), dec!(3))],
            ),
            accumulate(Side::Ask, &[(dec!(101), dec!(1))]),
            "t",
        )
    }

    #[test]
    fn zero_levels_shows_nothing() {
        let options = TableOptions {
            levels: 0,
            ..TableOptions::default()
        };
        let view = LevelTable::render(&snapshot(), &options, None);
        assert!(view.is_empty());
    }

    #[test]
    fn window_renormalizes_depth_bars() {
        let options = TableOptions {
            levels: 2,
            ..TableOptions::default()
        };
        let view = LevelTable::render(&snapshot(), &options, None);
        assert_eq!(view.bids.len(), 2);
        assert_eq!(view.bids[1].depth_pct, Some(100.0));
        let first = view.bids[0].depth_pct.unwrap();
        assert!((first - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn depth_bars_can_be_disabled() {
        let options = TableOptions {
            show_depth_bars: false,
            ..TableOptions::default()
        };
        let view = LevelTable::render(&snapshot(), &options, None);
        assert!(view.bids.iter().all(|row| row.depth_pct.is_none()));
    }

    #[test]
    fn zero_totals_do_not_produce_nan() {
        let mut book = snapshot();
        for level in &mut book.bids {
            level.total = Decimal::ZERO;
        }
        let view = LevelTable::render(&book, &TableOptions::default(), None);
        assert!(view.bids.iter().all(|row| row.depth_pct == Some(0.0)));
    }

    #[test]
    fn non_monotone_totals_stay_within_bounds() {
        let mut book = snapshot();
        book.bids[0].total = dec!(50);
        let view = LevelTable::render(&book, &TableOptions::default(), None);
        assert_eq!(view.bids[0].depth_pct, Some(100.0));
        assert!(
            view.bids
                .iter()
                .filter_map(|row| row.depth_pct)
                .all(|pct| (0.0..=100.0).contains(&pct))
        );
    }

    #[test]
    fn formats_with_precision_and_headers() {
        let view = LevelTable::render(&snapshot(), &TableOptions::default(), None);
        assert_eq!(view.bids[0].price_text, "100.00");
        assert_eq!(view.bids[0].size_text, "1.0000");
        assert_eq!(view.headers.price, "Price (USDT)");
        assert_eq!(view.spread_text, "1.00 (1.000%)");
    }
}
