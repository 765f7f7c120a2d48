use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{FrameKey, Point, Rect};

/// How a shape is filled or stroked.
///
/// Frame colors arrive from the tree builder as opaque strings and are
/// passed through untouched; everything the engine itself decides on is a
/// theme token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    /// An opaque color string supplied with the profile (e.g. `#50e150`).
    Literal(SharedStr),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Paint::Theme(token)
    }
}

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each draw. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill the whole canvas, discarding everything drawn before.
    Clear { color: Paint },

    /// Draw a filled rectangle with an optional border. `frame` identifies
    /// the flame-graph frame it depicts, if any.
    DrawRect {
        rect: Rect,
        color: Paint,
        border_color: Option<Paint>,
        frame: Option<FrameKey>,
    },

    /// Draw left-aligned text with its baseline at `position`, clipped to
    /// `max_width`.
    DrawText {
        position: Point,
        text: SharedStr,
        color: Paint,
        font_size: f64,
        max_width: f64,
    },

    /// Fill a rectangle without a border (used for translucent overlays).
    FillRect { rect: Rect, color: Paint },
}
