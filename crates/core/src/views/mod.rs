pub mod coverage;
pub mod geometry;
pub mod hit_test;
pub mod label;
pub mod render;

pub use coverage::{Coverage, MatchedIntervals};
pub use geometry::{GeometryRequest, Layout, VisibleFrame, compute_geometry};
pub use hit_test::{frame_at, hit_test, level_at};
pub use render::render_layout;
