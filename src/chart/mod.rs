//! Depth chart geometry: step-area paths, the mid line, and the viewport
//! they are projected into.

pub mod layout;
pub mod path;

pub use layout::{ChartLayout, LayoutSubscription};
pub use path::{ChartBounds, ChartGeometry, DepthChart, PathGeometry, Viewport, build_path};
