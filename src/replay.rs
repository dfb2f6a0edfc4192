//! Snapshot replay feed for the terminal host.
//!
//! Stands in for a live order book source: frames are read from a JSON file
//! (or generated) and replayed in a loop while the view is live. Each frame
//! lists `(price, size)` pairs best price first; totals, spread and the
//! update timestamp are filled in on emission.

use std::path::Path;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::{mpsc, watch};

use crate::models::{BookSnapshot, SentimentReading, Side, accumulate};
use crate::tui::Message;

/// One replayed book state.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayFrame {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
    /// Host-supplied reading; derived from the book when absent.
    #[serde(default)]
    pub sentiment: Option<SentimentReading>,
}

impl ReplayFrame {
    /// Builds the snapshot for this frame, stamped with `last_update`.
    pub fn to_snapshot(&self, last_update: impl Into<String>) -> BookSnapshot {
        BookSnapshot::from_levels(
            accumulate(Side::Bid, &self.bids),
            accumulate(Side::Ask, &self.asks),
            last_update,
        )
    }
}

/// Cycles through a fixed list of frames.
#[derive(Debug)]
pub struct ReplayFeed {
    frames: Vec<ReplayFrame>,
    cursor: usize,
}

impl ReplayFeed {
    /// Creates a feed over `frames`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `frames` is empty.
    pub fn new(frames: Vec<ReplayFrame>) -> crate::Result<Self> {
        if frames.is_empty() {
            return Err(crate::DepthViewError::Config(
                "replay feed needs at least one frame".to_string(),
            ));
        }
        Ok(Self { frames, cursor: 0 })
    }

    /// Loads frames from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is empty.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::DepthViewError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let frames: Vec<ReplayFrame> = serde_json::from_str(&contents)?;
        tracing::info!(frames = frames.len(), path = %path.display(), "replay loaded");
        Self::new(frames)
    }

    /// Generates a deterministic drifting book around `mid`.
    ///
    /// Each step moves the mid by up to two ticks and reshapes sizes, so
    /// rows change price frequently enough to exercise highlights.
    pub fn synthetic(mid: Decimal, tick: Decimal, depth: usize, steps: usize) -> Self {
        let mut frames = Vec::with_capacity(steps.max(1));
        let mut center = mid;

        for step in 0..steps.max(1) {
            let drift = Decimal::from((step * 7 % 5) as i64 - 2);
            center += drift * tick;

            let level = |i: usize| {
                let wave = Decimal::from(((step + i * 3) % 7 + 1) as i64);
                wave * Decimal::new(25, 2)
            };
            let bids = (0..depth)
                .map(|i| (center - tick * Decimal::from(i as i64 + 1), level(i)))
                .collect();
            let asks = (0..depth)
                .map(|i| (center + tick * Decimal::from(i as i64 + 1), level(i + 1)))
                .collect();

            frames.push(ReplayFrame {
                bids,
                asks,
                sentiment: None,
            });
        }

        Self { frames, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the next snapshot, wrapping around at the end.
    pub fn next_frame(&mut self) -> (BookSnapshot, Option<SentimentReading>) {
        let frame = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();
        (frame.to_snapshot(iso_timestamp()), frame.sentiment)
    }
}

/// Spawns the replay loop. Frames are only emitted while `live` reads `true`.
pub fn spawn_replay(
    mut feed: ReplayFeed,
    tx: mpsc::UnboundedSender<Message>,
    interval_ms: u64,
    live: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            interval.tick().await;
            if !*live.borrow() {
                continue;
            }
            let (snapshot, sentiment) = feed.next_frame();
            if tx
                .send(Message::Snapshot {
                    snapshot,
                    sentiment,
                })
                .is_err()
            {
                break;
            }
        }
    });
}

/// Current UTC time as RFC 3339 with microseconds, e.g. `2024-01-15T12:00:00.000000Z`.
fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_feed_is_rejected() {
        let err = ReplayFeed::new(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at least one frame"));
    }

    #[test]
    fn frames_cycle() {
        let frame = |bid| ReplayFrame {
            bids: vec![(bid, dec!(1))],
            asks: vec![(dec!(200), dec!(1))],
            sentiment: None,
        };
        let mut feed = ReplayFeed::new(vec![frame(dec!(100)), frame(dec!(101))]).unwrap();
        assert_eq!(feed.next_frame().0.bids[0].price, dec!(100));
        assert_eq!(feed.next_frame().0.bids[0].price, dec!(101));
        assert_eq!(feed.next_frame().0.bids[0].price, dec!(100));
    }

    #[test]
    fn frame_fills_totals_and_spread() {
        let frame: ReplayFrame = serde_json::from_str(
            r#"{ "bids": [["100", "1"], ["99", "2"]], "asks": [["101", "0.5"]] }"#,
        )
        .unwrap();
        let snapshot = frame.to_snapshot("t");
        assert_eq!(snapshot.bids[1].total, dec!(3));
        assert_eq!(snapshot.spread, dec!(1));
        assert!(frame.sentiment.is_none());
    }

    #[test]
    fn synthetic_book_is_sorted_and_uncrossed() {
        let mut feed = ReplayFeed::synthetic(dec!(100), dec!(0.5), 5, 10);
        assert_eq!(feed.len(), 10);
        for _ in 0..10 {
            let (snapshot, _) = feed.next_frame();
            assert!(!snapshot.is_crossed());
            assert!(snapshot.bids.windows(2).all(|w| w[0].price > w[1].price));
            assert!(snapshot.asks.windows(2).all(|w| w[0].price < w[1].price));
        }
    }

    #[test]
    fn frames_are_stamped_in_utc() {
        let mut feed = ReplayFeed::synthetic(dec!(100), dec!(1), 1, 1);
        let (snapshot, _) = feed.next_frame();
        let stamped = chrono::DateTime::parse_from_rfc3339(&snapshot.last_update).unwrap();
        assert_eq!(stamped.offset().local_minus_utc(), 0);
        assert!(snapshot.last_update.ends_with('Z'));
        // Microsecond precision: "YYYY-MM-DDTHH:MM:SS.ffffffZ"
        assert_eq!(snapshot.last_update.len(), 27);
    }
}
