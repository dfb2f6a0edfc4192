//! Market sentiment readings supplied by the host.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::book::{BookSnapshot, PriceLevel};
use super::depth::to_f64;

/// Coarse market direction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

/// Buy/sell pressure percentages (0–100) with the host's label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    pub buy_pressure: f64,
    pub sell_pressure: f64,
}

impl SentimentReading {
    /// Derives a reading from resting size over the top `levels` of each side.
    ///
    /// Buy pressure is bid size over total size, as a percentage. An empty
    /// window reads 50/50. The label uses the same thresholds as
    /// [`crate::sentiment::classify`].
    pub fn from_book(snapshot: &BookSnapshot, levels: usize) -> Self {
        let bid = to_f64(resting_size(&snapshot.bids, levels));
        let ask = to_f64(resting_size(&snapshot.asks, levels));
        let total = bid + ask;

        let buy_pressure = if total > 0.0 && total.is_finite() {
            (bid / total * 100.0).clamp(0.0, 100.0)
        } else {
            50.0
        };

        Self {
            sentiment: crate::sentiment::bucket(buy_pressure),
            buy_pressure,
            sell_pressure: 100.0 - buy_pressure,
        }
    }
}

fn resting_size(levels: &[PriceLevel], take: usize) -> Decimal {
    levels
        .iter()
        .take(take)
        .fold(Decimal::ZERO, |sum, level| sum.saturating_add(level.size))
}
