//! Cumulative depth points consumed by the chart geometry.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::book::{BookSnapshot, PriceLevel, Side};

/// One point of cumulative liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthPoint {
    pub price: f64,
    pub cumulative: f64,
    pub side: Side,
}

/// Derives bid and ask depth points from a snapshot.
///
/// Both vectors are in rank order (best price first). Each point's
/// cumulative value is the summed size from the top of book through that
/// level, inclusive, recomputed from `size` rather than trusting `total`.
pub fn depth_points(snapshot: &BookSnapshot) -> (Vec<DepthPoint>, Vec<DepthPoint>) {
    (
        side_points(&snapshot.bids, Side::Bid),
        side_points(&snapshot.asks, Side::Ask),
    )
}

fn side_points(levels: &[PriceLevel], side: Side) -> Vec<DepthPoint> {
    let mut running = Decimal::ZERO;
    levels
        .iter()
        .map(|level| {
            running = running.saturating_add(level.size);
            DepthPoint {
                price: to_f64(level.price),
                cumulative: to_f64(running),
                side,
            }
        })
        .collect()
}

/// Lossy conversion used at the boundary between book values and geometry.
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::accumulate;
    use rust_decimal_macros::dec;

    #[test]
    fn cumulative_runs_outward_from_top_of_book() {
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(dec!(100), dec!(1)), (dec!(99), dec!(2))]),
            accumulate(
                Side::Ask,
                &[(dec!(101), dec!(1)), (dec!(102), dec!(1.5)), (dec!(103), dec!(1.5))],
            ),
            "t",
        );
        let (bids, asks) = depth_points(&snapshot);

        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].price, 100.0);
        assert_eq!(bids[1].cumulative, 3.0);
        assert!(bids.iter().all(|p| p.side == Side::Bid));

        let cumulative: Vec<f64> = asks.iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![1.0, 2.5, 4.0]);
        assert_eq!(asks[2].price, 103.0);
    }

    #[test]
    fn saturating_cumulative_stays_finite() {
        let snapshot = BookSnapshot::from_levels(
            accumulate(Side::Bid, &[(dec!(100), Decimal::MAX), (dec!(99), Decimal::MAX)]),
            Vec::new(),
            "t",
        );
        let (bids, _) = depth_points(&snapshot);
        assert_eq!(bids[0].cumulative, bids[1].cumulative);
        assert!(bids[1].cumulative.is_finite());
    }

    #[test]
    fn empty_book_yields_no_points() {
        let (bids, asks) = depth_points(&BookSnapshot::default());
        assert!(bids.is_empty());
        assert!(asks.is_empty());
    }
}
