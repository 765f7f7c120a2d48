//! Interactive state around one flame graph: zoom root, orientation,
//! search pattern, hover and tooltip scheduling.
//!
//! Every operation runs to completion synchronously. The only writer of the
//! layout snapshot is the private draw step, which builds a new [`Layout`]
//! and swaps it in whole, so pointer queries never see a half-built one.

mod hover;
mod surface;
mod tooltip_slot;

use std::time::Duration;

use flamesight_protocol::{FrameKey, SharedStr, Viewport};
use tracing::debug;

pub use hover::{HoverBox, TooltipAlign, TooltipPlacement, TooltipRequest};
pub use surface::{RecordingSurface, RenderSurface};
pub use tooltip_slot::{PendingTooltip, TooltipSlot};

use crate::config::FlameConfig;
use crate::model::{FlameTree, Frame};
use crate::pattern::{FrameMatcher, PatternError, RegexMatcher};
use crate::tooltip::{BasicTooltip, TooltipRenderer};
use crate::views::{Coverage, GeometryRequest, Layout, compute_geometry, frame_at, render_layout};

/// Construction options for [`FlameController`].
#[derive(Debug)]
pub struct ControllerOptions {
    pub config: FlameConfig,
    /// Start with level 0 at the top.
    pub reversed: bool,
    pub tooltips: Box<dyn TooltipRenderer>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            config: FlameConfig::default(),
            reversed: true,
            tooltips: Box::new(BasicTooltip),
        }
    }
}

pub struct FlameController<S: RenderSurface> {
    tree: FlameTree,
    config: FlameConfig,
    surface: S,
    tooltips: Box<dyn TooltipRenderer>,
    viewport: Viewport,
    root: FrameKey,
    reversed: bool,
    pattern: Option<Box<dyn FrameMatcher>>,
    layout: Layout,
    scroll_y: f64,
    hovered: Option<FrameKey>,
    highlight: Option<HoverBox>,
    context_frame: Option<FrameKey>,
    tooltip: TooltipSlot,
}

impl<S: RenderSurface> FlameController<S> {
    /// Create a controller and paint the full graph once.
    pub fn new(tree: FlameTree, surface: S, viewport: Viewport) -> Self {
        Self::with_options(tree, surface, viewport, ControllerOptions::default())
    }

    pub fn with_options(
        tree: FlameTree,
        surface: S,
        viewport: Viewport,
        options: ControllerOptions,
    ) -> Self {
        let request = GeometryRequest {
            root: FrameKey::ROOT,
            viewport,
            reversed: options.reversed,
            pattern: None,
        };
        let layout = compute_geometry(&tree, &request, &options.config);
        let mut controller = Self {
            tree,
            config: options.config,
            surface,
            tooltips: options.tooltips,
            viewport,
            root: FrameKey::ROOT,
            reversed: options.reversed,
            pattern: None,
            layout,
            scroll_y: 0.0,
            hovered: None,
            highlight: None,
            context_frame: None,
            tooltip: TooltipSlot::default(),
        };
        controller.draw(FrameKey::ROOT);
        controller
    }

    // --- drawing ---

    /// Lay out and paint under `root` with the current pattern.
    fn draw(&mut self, root: FrameKey) {
        let request = GeometryRequest {
            root,
            viewport: self.viewport,
            reversed: self.reversed,
            pattern: self.pattern.as_deref(),
        };
        let layout = compute_geometry(&self.tree, &request, &self.config);
        let commands = render_layout(&self.tree, &layout, &self.config);

        self.root = layout.root;
        self.layout = layout;
        if self.context_frame.is_none() {
            self.highlight = None;
        }
        self.surface.paint(&self.viewport, &commands);

        debug!(
            root = ?self.root,
            reversed = self.reversed,
            visible = self.layout.visible_count(),
            matched = self.layout.matched.len(),
            "drew flame graph"
        );
    }

    /// Make `key` the zoom root. Refused (returning `false`) when the frame
    /// does not exist, is already the root, or has no weight to spread over
    /// the canvas.
    pub fn zoom_to(&mut self, key: FrameKey) -> bool {
        if key == self.root {
            return false;
        }
        match self.tree.frame(key) {
            Some(frame) if frame.total > 0 => {
                debug!(?key, title = %frame.title, "zoom");
                self.draw(key);
                true
            }
            Some(_) => {
                debug!(?key, "refusing zero-weight zoom root");
                false
            }
            None => false,
        }
    }

    /// Zoom into the frame under the pointer. Returns the new root.
    pub fn click(&mut self, x: f64, y: f64) -> Option<FrameKey> {
        let key = frame_at(&self.layout, x, y)?.key;
        self.zoom_to(key).then_some(key)
    }

    pub fn reset_zoom(&mut self) {
        self.draw(FrameKey::ROOT);
    }

    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
        self.draw(self.root);
    }

    /// Adopt new canvas dimensions; the zoom root and pattern are kept.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.draw(self.root);
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    // --- search ---

    /// Highlight frames whose title matches the regular expression
    /// `pattern` and return their coverage of the zoom root.
    ///
    /// A pattern that fails to compile leaves the previous search and the
    /// painted graph untouched.
    pub fn search(&mut self, pattern: &str) -> Result<Coverage, PatternError> {
        let matcher = RegexMatcher::new(pattern)?;
        Ok(self.search_with(Box::new(matcher)))
    }

    pub fn search_with(&mut self, matcher: Box<dyn FrameMatcher>) -> Coverage {
        debug!(?matcher, "search");
        self.pattern = Some(matcher);
        self.draw(self.root);
        self.root_coverage()
    }

    pub fn reset_search(&mut self) {
        self.pattern = None;
        self.draw(self.root);
    }

    /// Coverage of the active search, `None` without one.
    pub fn coverage(&self) -> Option<Coverage> {
        self.pattern.as_ref().map(|_| self.root_coverage())
    }

    fn root_coverage(&self) -> Coverage {
        Coverage::new(&self.layout.matched, self.root_frame().total)
    }

    // --- pointer ---

    /// Track the pointer: move the hover box and (re)schedule the tooltip.
    /// Returns the frame under the pointer.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) -> Option<FrameKey> {
        let Some(key) = frame_at(&self.layout, x, y).map(|v| v.key) else {
            self.pointer_out();
            return None;
        };

        self.hovered = Some(key);
        if self.context_frame.is_none() {
            self.highlight = self.hover_box(key);
        }
        self.tooltip.schedule(PendingTooltip {
            frame: key,
            x,
            y,
            due: now.saturating_add(self.config.tooltip_delay()),
        });
        Some(key)
    }

    /// Pointer left the canvas: drop the hover box unless a context menu
    /// pinned it, and cancel any pending tooltip.
    pub fn pointer_out(&mut self) {
        self.hovered = None;
        if self.context_frame.is_none() {
            self.highlight = None;
        }
        self.tooltip.cancel();
    }

    /// The tooltip to show now, if one was scheduled and its delay passed.
    pub fn poll_tooltip(&mut self, now: Duration) -> Option<TooltipRequest> {
        let pending = self.tooltip.take_due(now)?;
        let frame = self.tree.frame(pending.frame)?;
        let content = self.tooltips.render(frame, self.tree.total());

        let offset = self.config.tooltip_offset;
        let (x, align) = if pending.x > self.viewport.width / 2.0 {
            (pending.x - offset, TooltipAlign::End)
        } else {
            (pending.x + offset, TooltipAlign::Start)
        };
        Some(TooltipRequest {
            frame: pending.frame,
            content,
            placement: TooltipPlacement {
                x,
                y: self.scroll_y + pending.y + offset,
                align,
            },
        })
    }

    /// Title of the highlighted frame, for selecting/copying its text.
    pub fn double_click(&self) -> Option<SharedStr> {
        self.highlight.as_ref().map(|h| h.title.clone())
    }

    /// Pin the hovered frame for a context menu. While pinned, hovering
    /// no longer moves the highlight.
    pub fn open_context_menu(&mut self) -> Option<FrameKey> {
        self.context_frame = self.hovered;
        self.context_frame
    }

    pub fn close_context_menu(&mut self) {
        self.context_frame = None;
    }

    fn hover_box(&self, key: FrameKey) -> Option<HoverBox> {
        let frame = self.tree.frame(key)?;
        let root = self.root_frame();
        let px = self.layout.px_per_unit;
        Some(HoverBox {
            frame: key,
            left: frame.left.saturating_sub(root.left) as f64 * px,
            top: self.layout.level_y(key.level()) - self.scroll_y,
            width: frame.total.min(root.total) as f64 * px,
            height: self.config.frame_height,
            title: frame.title.clone(),
        })
    }

    // --- accessors ---

    pub fn tree(&self) -> &FlameTree {
        &self.tree
    }

    pub fn config(&self) -> &FlameConfig {
        &self.config
    }

    /// The last computed layout snapshot.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom_root(&self) -> FrameKey {
        self.root
    }

    pub fn root_frame(&self) -> &Frame {
        self.tree.frame(self.root).unwrap_or_else(|| self.tree.root())
    }

    pub fn is_zoomed(&self) -> bool {
        self.root != FrameKey::ROOT
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn hovered_frame(&self) -> Option<FrameKey> {
        self.hovered
    }

    pub fn highlight(&self) -> Option<&HoverBox> {
        self.highlight.as_ref()
    }

    pub fn context_frame(&self) -> Option<FrameKey> {
        self.context_frame
    }
}
