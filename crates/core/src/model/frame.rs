use flamesight_protocol::SharedStr;
use serde::{Deserialize, Serialize};

/// One node of the sampled call tree, positioned on the shared weight axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Display name (method/function).
    pub title: SharedStr,
    /// Offset on the weight axis where this frame starts.
    pub left: u64,
    /// Sampled weight including all descendants.
    #[serde(alias = "width")]
    pub total: u64,
    /// Weight spent in this frame alone, when the producer records it.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_weight: Option<u64>,
    /// Opaque color assigned by the tree builder.
    pub color: SharedStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FrameDetails>,
}

impl Frame {
    pub fn new(title: impl Into<SharedStr>, left: u64, total: u64, color: impl Into<SharedStr>) -> Self {
        Self {
            title: title.into(),
            left,
            total,
            self_weight: None,
            color: color.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: FrameDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// End of the frame on the weight axis (exclusive), clamped to `u64::MAX`.
    pub fn right(&self) -> u64 {
        self.left.saturating_add(self.total)
    }

    /// Whether `other` lies entirely within this frame's range.
    pub fn contains(&self, other: &Frame) -> bool {
        self.left <= other.left && other.right() <= self.right()
    }

    /// Strict overlap with the half-open window `[start, end)`; a frame that
    /// only touches a window edge is outside.
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        self.left < end && self.right() > start
    }
}

/// Extra per-frame information shown in tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameDetails {
    /// Difference between the comparison and the baseline profile.
    Diff { samples: i64, percent: f64 },
    /// Free-form text, e.g. the JIT tier breakdown `", int=3, c1=1"`.
    Text(String),
}
