use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Point-in-box test with inclusive bounds on every edge, so a point on
    /// the border shared by two neighbours belongs to both.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Logical drawing area. Geometry is always produced in logical units;
/// `dpr` is carried through for surfaces that back the canvas with more
/// physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    pub fn with_dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    /// Physical backing-store size for surfaces that scale by `dpr`.
    pub fn physical_size(&self) -> (f64, f64) {
        let dpr = if self.dpr > 0.0 { self.dpr } else { 1.0 };
        (self.width * dpr, self.height * dpr)
    }

    /// Whether any frame can be laid out in this area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Arena handle of a frame: its stack depth and its position within that
/// level's left-ordered frame list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameKey {
    pub level: u32,
    pub index: u32,
}

impl FrameKey {
    pub const ROOT: FrameKey = FrameKey { level: 0, index: 0 };

    /// Largest level or index a key can hold. Trees are validated against
    /// it, so keys built from a valid tree are exact.
    pub const MAX_COMPONENT: u32 = u32::MAX;

    /// Out-of-range components saturate to [`Self::MAX_COMPONENT`], which
    /// never names a frame of a validated tree.
    pub fn new(level: usize, index: usize) -> Self {
        Self {
            level: u32::try_from(level).unwrap_or(Self::MAX_COMPONENT),
            index: u32::try_from(index).unwrap_or(Self::MAX_COMPONENT),
        }
    }

    pub fn level(&self) -> usize {
        self.level as usize
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}
