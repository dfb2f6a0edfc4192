//! Shared snapshot builders for integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use depthview::models::{BookSnapshot, PriceLevel, Side};

/// Builds a level with explicit size and cumulative total.
pub fn level(side: Side, rank: usize, price: Decimal, size: Decimal, total: Decimal) -> PriceLevel {
    PriceLevel {
        id: format!("{side}-{rank}"),
        price,
        size,
        total,
        order_count: None,
    }
}

/// The reference book: bids 100/99/98 with totals 1/3/6, asks 101/102/103
/// with totals 1/2.5/4.
pub fn reference_book() -> BookSnapshot {
    BookSnapshot::from_levels(
        vec![
            level(Side::Bid, 0, dec!(100), dec!(1), dec!(1)),
            level(Side::Bid, 1, dec!(99), dec!(2), dec!(3)),
            level(Side::Bid, 2, dec!(98), dec!(3), dec!(6)),
        ],
        vec![
            level(Side::Ask, 0, dec!(101), dec!(1), dec!(1)),
            level(Side::Ask, 1, dec!(102), dec!(1.5), dec!(2.5)),
            level(Side::Ask, 2, dec!(103), dec!(1.5), dec!(4)),
        ],
        "2024-01-15T10:30:00.000000Z",
    )
}

/// A one-level-per-side book.
pub fn top_of_book(bid: Decimal, ask: Decimal) -> BookSnapshot {
    BookSnapshot::from_levels(
        vec![level(Side::Bid, 0, bid, dec!(1), dec!(1))],
        vec![level(Side::Ask, 0, ask, dec!(1), dec!(1))],
        "t",
    )
}
