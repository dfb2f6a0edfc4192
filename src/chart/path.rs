//! Step-path construction for cumulative depth.
//!
//! Points are projected with
//! `x = (price - min_price) / (max_price - min_price) * width` and
//! `y = height - cumulative / max_cumulative * (height - headroom)`,
//! where the bounds span *both* sides of the book. Bids step with the
//! corner at the previous point's x, asks with the corner at the current
//! point's x, so both staircases hug the spread and grow away from it.
//! Each path is closed by dropping to the floor at its first and last x.

use std::fmt::Write;

use crate::models::{BookSnapshot, DepthPoint, Side, depth_points};

/// Space kept free above the tallest point.
pub const DEFAULT_HEADROOM: f64 = 20.0;

/// Plot area in pixel (or canvas) units. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub headroom: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            headroom: DEFAULT_HEADROOM,
        }
    }

    pub fn with_headroom(mut self, headroom: f64) -> Self {
        self.headroom = headroom;
        self
    }

    /// Drawable height below the headroom, never negative.
    pub fn plot_height(&self) -> f64 {
        (self.height - self.headroom).max(0.0)
    }
}

/// Price and cumulative ranges shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub min_price: f64,
    pub max_price: f64,
    pub max_cumulative: f64,
}

impl ChartBounds {
    /// Computes bounds across both point sets. `None` when neither has a finite point.
    pub fn from_points(bids: &[DepthPoint], asks: &[DepthPoint]) -> Option<Self> {
        bids.iter()
            .chain(asks)
            .filter(|p| is_finite(p))
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    None => Self {
                        min_price: p.price,
                        max_price: p.price,
                        max_cumulative: p.cumulative,
                    },
                    Some(b) => Self {
                        min_price: b.min_price.min(p.price),
                        max_price: b.max_price.max(p.price),
                        max_cumulative: b.max_cumulative.max(p.cumulative),
                    },
                })
            })
    }

    /// Projects a price to x.
    pub fn x(&self, price: f64, viewport: &Viewport) -> f64 {
        let span = self.max_price - self.min_price;
        let span = if span > 0.0 { span } else { 1.0 };
        (price - self.min_price) / span * viewport.width
    }

    /// Projects a cumulative value to y.
    ///
    /// The cumulative divisor never drops below 1, so books with less than
    /// one unit of total depth stay proportionally short.
    pub fn y(&self, cumulative: f64, viewport: &Viewport) -> f64 {
        let divisor = self.max_cumulative.max(1.0);
        viewport.height - cumulative / divisor * viewport.plot_height()
    }

    pub fn project(&self, point: &DepthPoint, viewport: &Viewport) -> (f64, f64) {
        (self.x(point.price, viewport), self.y(point.cumulative, viewport))
    }
}

fn is_finite(point: &DepthPoint) -> bool {
    point.price.is_finite() && point.cumulative.is_finite()
}

/// A closed step-area outline for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    pub side: Side,
    /// Outline vertices, starting and ending on the floor.
    pub vertices: Vec<(f64, f64)>,
}

impl PathGeometry {
    /// Vertices between the two floor drops.
    pub fn outline(&self) -> &[(f64, f64)] {
        let len = self.vertices.len();
        if len < 2 {
            return &[];
        }
        &self.vertices[1..len - 1]
    }

    /// Renders the outline as an SVG path string.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for (i, (x, y)) in self.vertices.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(out, "{cmd}{x:.2},{y:.2} ");
        }
        out.push('Z');
        out
    }
}

/// Builds the step path for one side.
///
/// `points` must be in rank order (best price first). Non-finite points are
/// skipped; fewer than two remaining points yields no path.
pub fn build_path(
    points: &[DepthPoint],
    side: Side,
    bounds: &ChartBounds,
    viewport: &Viewport,
) -> Option<PathGeometry> {
    let projected: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| is_finite(p))
        .map(|p| bounds.project(p, viewport))
        .collect();

    let (first, last) = match (projected.first(), projected.last()) {
        (Some(first), Some(last)) if projected.len() >= 2 => (*first, *last),
        _ => return None,
    };

    let floor = viewport.height;
    let mut vertices = Vec::with_capacity(projected.len() * 2 + 2);
    vertices.push((first.0, floor));
    vertices.push(first);

    for pair in projected.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let corner = match side {
            Side::Bid => (prev.0, cur.1),
            Side::Ask => (cur.0, prev.1),
        };
        vertices.push(corner);
        vertices.push(cur);
    }

    vertices.push((last.0, floor));

    Some(PathGeometry { side, vertices })
}

/// Full chart geometry for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub bounds: ChartBounds,
    pub viewport: Viewport,
    pub bid_path: Option<PathGeometry>,
    pub ask_path: Option<PathGeometry>,
    /// X of the mid-price reference line.
    pub mid_x: Option<f64>,
}

/// Assembles both step paths and the mid line.
pub struct DepthChart;

impl DepthChart {
    /// Builds geometry from rank-ordered bid and ask points.
    ///
    /// The mid price is the mean of the best bid and best ask, or whichever
    /// exists. Returns `None` when there is nothing to plot.
    pub fn build(
        bids: &[DepthPoint],
        asks: &[DepthPoint],
        viewport: Viewport,
    ) -> Option<ChartGeometry> {
        let bounds = ChartBounds::from_points(bids, asks)?;

        let mid_price = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / 2.0),
            (Some(bid), None) => Some(bid.price),
            (None, Some(ask)) => Some(ask.price),
            (None, None) => None,
        }
        .filter(|price| price.is_finite());

        Some(ChartGeometry {
            bounds,
            viewport,
            bid_path: build_path(bids, Side::Bid, &bounds, &viewport),
            ask_path: build_path(asks, Side::Ask, &bounds, &viewport),
            mid_x: mid_price.map(|price| bounds.x(price, &viewport)),
        })
    }

    /// Derives depth points from `snapshot` and builds its geometry.
    pub fn from_snapshot(snapshot: &BookSnapshot, viewport: Viewport) -> Option<ChartGeometry> {
        let (bids, asks) = depth_points(snapshot);
        Self::build(&bids, &asks, viewport)
    }
}
