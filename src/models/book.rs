//! Order book snapshot models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of the book a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Returns the wire name (`"bid"` / `"ask"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ranked price level.
///
/// `id` identifies the slot, not the price: it may shift as levels are
/// inserted or removed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevel {
    pub id: String,
    pub price: Decimal,
    pub size: Decimal,
    /// Cumulative size from the best price through this level.
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_count: Option<u32>,
}

/// Immutable view of both sides of the book at one instant.
///
/// Bids are expected in descending price order and asks ascending. The
/// engine renders whatever it is given, including crossed or empty books.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub spread: Decimal,
    pub spread_percent: Decimal,
    pub last_update: String,
}

impl BookSnapshot {
    /// Builds a snapshot, deriving spread and spread percent from the best levels.
    ///
    /// Spread percent is relative to the best bid. Both are zero when either
    /// side is empty; the percentage is also zero when the best bid is zero
    /// or the arithmetic overflows.
    pub fn from_levels(
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
        last_update: impl Into<String>,
    ) -> Self {
        let (spread, spread_percent) = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => {
                let spread = ask.price.checked_sub(bid.price).unwrap_or_default();
                let pct = spread
                    .checked_div(bid.price)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or_default();
                (spread, pct)
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };

        Self {
            bids,
            asks,
            spread,
            spread_percent,
            last_update: last_update.into(),
        }
    }

    /// Returns the levels for one side.
    pub fn side(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Mean of the best bid and ask, or whichever one exists.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(
                (bid.price / Decimal::TWO).saturating_add(ask.price / Decimal::TWO),
            ),
            (Some(bid), None) => Some(bid.price),
            (None, Some(ask)) => Some(ask.price),
            (None, None) => None,
        }
    }

    /// True when the best bid is at or above the best ask.
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some(bid), Some(ask)) if bid.price >= ask.price
        )
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Builds ranked levels with running totals from `(price, size)` pairs.
///
/// Input must already be ordered best price first. Ids are `"{side}-{rank}"`.
pub fn accumulate(side: Side, levels: &[(Decimal, Decimal)]) -> Vec<PriceLevel> {
    let mut running = Decimal::ZERO;
    levels
        .iter()
        .enumerate()
        .map(|(rank, &(price, size))| {
            running = running.saturating_add(size);
            PriceLevel {
                id: format!("{side}-{rank}"),
                price,
                size,
                total: running,
                order_count: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accumulate_builds_running_totals() {
        let levels = accumulate(Side::Bid, &[(dec!(100), dec!(1)), (dec!(99), dec!(2))]);
        assert_eq!(levels[0].id, "bid-0");
        assert_eq!(levels[0].total, dec!(1));
        assert_eq!(levels[1].id, "bid-1");
        assert_eq!(levels[1].total, dec!(3));
    }

    #[test]
    fn spread_from_best_levels() {
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(dec!(100), dec!(1))]),
            accumulate(Side::Ask, &[(dec!(101), dec!(1))]),
            "t",
        );
        assert_eq!(snapshot.spread, dec!(1));
        assert_eq!(snapshot.spread_percent, dec!(1));
        assert_eq!(snapshot.mid_price(), Some(dec!(100.5)));
        assert!(!snapshot.is_crossed());
    }

    #[test]
    fn one_sided_book_has_zero_spread() {
        let snapshot =
            BookSnapshot::from_levels(Vec::new(), accumulate(Side::Ask, &[(dec!(5), dec!(1))]), "t");
        assert_eq!(snapshot.spread, Decimal::ZERO);
        assert_eq!(snapshot.mid_price(), Some(dec!(5)));
    }

    #[test]
    fn zero_best_bid_does_not_divide() {
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(dec!(0), dec!(1))]),
            accumulate(Side::Ask, &[(dec!(1), dec!(1))]),
            "t",
        );
        assert_eq!(snapshot.spread, dec!(1));
        assert_eq!(snapshot.spread_percent, Decimal::ZERO);
    }

    #[test]
    fn extreme_values_degrade_instead_of_panicking() {
        let tiny = Decimal::new(1, 28);
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(tiny, Decimal::MAX), (tiny, Decimal::MAX)]),
            accumulate(Side::Ask, &[(Decimal::MAX, dec!(1))]),
            "t",
        );
        assert_eq!(snapshot.spread_percent, Decimal::ZERO);
        assert_eq!(snapshot.bids[1].total, Decimal::MAX);
        assert!(snapshot.mid_price().is_some());
    }

    #[test]
    fn crossed_book_is_detected() {
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(dec!(102), dec!(1))]),
            accumulate(Side::Ask, &[(dec!(101), dec!(1))]),
            "t",
        );
        assert!(snapshot.is_crossed());
        assert_eq!(snapshot.spread, dec!(-1));
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{
            "bids": [{ "id": "b0", "price": "100", "size": "1", "total": "1", "orderCount": 3 }],
            "asks": [],
            "spread": "0",
            "spreadPercent": "0",
            "lastUpdate": "2024-01-15T10:30:00.123456Z"
        }"#;
        let snapshot: BookSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.bids[0].order_count, Some(3));
        assert_eq!(snapshot.bids[0].price, dec!(100));
        assert!(snapshot.asks.is_empty());
    }
}
