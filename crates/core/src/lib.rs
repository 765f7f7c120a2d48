//! Flame-graph engine: lays a weighted call tree out on a canvas under an
//! arbitrary zoom root, hit-tests pointer positions against that layout,
//! highlights frames matching a search pattern and reports how much of the
//! zoomed subtree they cover.
//!
//! ```text
//!   levels JSON ─▶ FlameTree ─▶ views::geometry ─▶ Layout ─▶ views::render ─▶ RenderCommand[]
//!                                   ▲                 │
//!                         FlameController ◀── hit_test / coverage
//! ```
//!
//! Drawing, pointer events and tooltip display belong to the host; the
//! controller talks to them only through [`controller::RenderSurface`] and
//! plain numeric coordinates.

pub mod config;
pub mod controller;
pub mod model;
pub mod parsers;
pub mod pattern;
pub mod svg;
pub mod tooltip;
pub mod views;

pub use config::FlameConfig;
pub use controller::{FlameController, RenderSurface};
pub use model::{FlameTree, Frame, FrameDetails};
pub use pattern::{FrameMatcher, PatternError};
pub use views::coverage::Coverage;
