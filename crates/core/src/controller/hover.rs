use flamesight_protocol::{FrameKey, SharedStr};
use serde::Serialize;

use crate::tooltip::TooltipContent;

/// Box drawn over the hovered frame, in canvas coordinates with the scroll
/// offset already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverBox {
    pub frame: FrameKey,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub title: SharedStr,
}

/// Which tooltip edge `TooltipPlacement::x` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TooltipAlign {
    /// Left edge at `x`; pointer in the left half of the canvas.
    Start,
    /// Right edge at `x`; pointer past the midline, so the tooltip opens
    /// to the left and stays on screen.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub align: TooltipAlign,
}

/// A tooltip whose delay elapsed: what to show and where.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRequest {
    pub frame: FrameKey,
    pub content: TooltipContent,
    pub placement: TooltipPlacement,
}
