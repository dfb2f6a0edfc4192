//! Data contracts shared by the table, tracker and chart.
//!
//! Snapshots are immutable values owned by the host and passed by reference
//! on every render.

pub mod book;
pub mod depth;
pub mod sentiment;

pub use book::{BookSnapshot, PriceLevel, Side, accumulate};
pub use depth::{DepthPoint, depth_points};
pub use sentiment::{Sentiment, SentimentReading};
