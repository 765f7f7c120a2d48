use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Canvas fill behind all frames.
    Background,
    /// Stroke around every frame rectangle.
    FrameBorder,
    /// Label text drawn inside a frame.
    FrameText,
    /// Fill of frames whose title matches the active search.
    SearchHighlight,
    /// Translucent veil drawn over ancestors of the zoom root.
    UnderRootOverlay,
    /// Hover box that follows the pointer.
    HoverHighlight,
    /// Text inside the hover box.
    HoverText,
}

impl ThemeToken {
    /// The stock palette of the browser flame graph.
    pub fn default_css(self) -> &'static str {
        match self {
            Self::Background => "#ffffff",
            Self::FrameBorder => "#ffffff",
            Self::FrameText => "#000000",
            Self::SearchHighlight => "#ee00ee",
            Self::UnderRootOverlay => "rgba(255, 255, 255, 0.5)",
            Self::HoverHighlight => "#ffffe0",
            Self::HoverText => "#000000",
        }
    }
}
