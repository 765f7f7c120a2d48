use flamesight_protocol::{FrameKey, Rect, SharedStr, Viewport};
use tracing::warn;

use super::coverage::MatchedIntervals;
use super::label::fit_label;
use crate::config::FlameConfig;
use crate::model::FlameTree;
use crate::pattern::FrameMatcher;

/// A frame that intersects the zoom window, with its canvas rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleFrame {
    pub rect: Rect,
    pub key: FrameKey,
    /// Ancestor of the zoom root: drawn dimmed, context only.
    pub under_root: bool,
    /// Title matched the active search pattern.
    pub matched: bool,
    pub label: Option<SharedStr>,
}

/// Inputs of one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRequest<'a> {
    pub root: FrameKey,
    pub viewport: Viewport,
    /// `true` puts level 0 at the top and grows calls downward.
    pub reversed: bool,
    pub pattern: Option<&'a dyn FrameMatcher>,
}

/// Result of a layout pass: per level, the visible frames in left-to-right
/// order, plus the weight intervals matched by the search pattern.
///
/// A layout is never patched; every draw builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub levels: Vec<Vec<VisibleFrame>>,
    pub matched: MatchedIntervals,
    pub root: FrameKey,
    pub viewport: Viewport,
    pub reversed: bool,
    pub frame_height: f64,
    /// Logical pixels per unit of weight; zero when nothing is visible.
    pub px_per_unit: f64,
    /// Start of the zoom window on the weight axis.
    pub window_start: u64,
    /// End of the zoom window (exclusive).
    pub window_end: u64,
}

impl Layout {
    pub fn level(&self, level: usize) -> &[VisibleFrame] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn frames(&self) -> impl Iterator<Item = &VisibleFrame> {
        self.levels.iter().flatten()
    }

    pub fn visible_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn find(&self, key: FrameKey) -> Option<&VisibleFrame> {
        self.level(key.level()).iter().find(|v| v.key == key)
    }

    /// Top edge of a level's row.
    pub fn level_y(&self, level: usize) -> f64 {
        level_y(level, self.viewport.height, self.frame_height, self.reversed)
    }
}

pub(crate) fn level_y(level: usize, canvas_height: f64, frame_height: f64, reversed: bool) -> f64 {
    if reversed {
        level as f64 * frame_height
    } else {
        canvas_height - (level + 1) as f64 * frame_height
    }
}

/// Lay the tree out under `request.root`.
///
/// The root fills the canvas width; every frame of every level that
/// strictly overlaps the root's weight range is placed proportionally, and
/// frames outside it are dropped. An empty viewport yields no frames but
/// still records search matches.
pub fn compute_geometry(tree: &FlameTree, request: &GeometryRequest<'_>, config: &FlameConfig) -> Layout {
    let (root_key, root) = match tree.frame(request.root) {
        Some(frame) => (request.root, frame),
        None => {
            warn!(root = ?request.root, "zoom root not in tree, using tree root");
            (FrameKey::ROOT, tree.root())
        }
    };

    let mut layout = Layout {
        levels: vec![Vec::new(); tree.level_count()],
        matched: MatchedIntervals::new(),
        root: root_key,
        viewport: request.viewport,
        reversed: request.reversed,
        frame_height: config.frame_height,
        px_per_unit: 0.0,
        window_start: root.left,
        window_end: root.right(),
    };

    if root.total == 0 {
        return layout;
    }

    // Matches are weight-axis facts and are recorded even when there is no
    // canvas to place frames on.
    let placing = !request.viewport.is_empty();
    let px = if placing {
        request.viewport.width / root.total as f64
    } else {
        0.0
    };
    layout.px_per_unit = px;
    let (x_start, x_end) = (layout.window_start, layout.window_end);

    for (level, frames) in tree.levels().iter().enumerate() {
        let y = layout.level_y(level);
        let under_root = level < root_key.level();
        // Levels are left-ordered: skip to the first candidate and stop at
        // the first frame past the window.
        let first = frames.partition_point(|f| f.right() <= x_start);
        let row = &mut layout.levels[level];

        for (offset, frame) in frames[first..].iter().enumerate() {
            if frame.left >= x_end {
                break;
            }
            if !frame.overlaps(x_start, x_end) {
                continue;
            }

            let matched = request.pattern.is_some_and(|p| p.matches(&frame.title));
            if matched {
                layout.matched.record(frame.left, frame.total);
            }
            if !placing {
                continue;
            }

            let width = frame.total as f64 * px;
            row.push(VisibleFrame {
                rect: Rect::new(
                    (frame.left as f64 - x_start as f64) * px,
                    y,
                    width,
                    config.frame_height,
                ),
                key: FrameKey::new(level, first + offset),
                under_root,
                matched,
                label: fit_label(&frame.title, width, config),
            });
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frame;
    use crate::pattern::RegexMatcher;

    fn tree() -> FlameTree {
        let f = |t: &str, l, w| Frame::new(t, l, w, "#50e150");
        FlameTree::new(vec![
            vec![f("all", 0, 100)],
            vec![f("main", 0, 40), f("worker", 40, 60)],
            vec![f("parse", 5, 30), f("run", 40, 50)],
            vec![f("run.inner", 45, 10)],
        ])
        .expect("well-formed tree")
    }

    fn layout(root: FrameKey, width: f64, reversed: bool, pattern: Option<&dyn FrameMatcher>) -> Layout {
        let request = GeometryRequest {
            root,
            viewport: Viewport::new(width, 200.0),
            reversed,
            pattern,
        };
        compute_geometry(&tree(), &request, &FlameConfig::default())
    }

    #[test]
    fn full_view_places_every_frame() {
        let l = layout(FrameKey::ROOT, 1000.0, true, None);
        assert_eq!(l.visible_count(), 6);
        assert_eq!(l.px_per_unit, 10.0);
        let worker = &l.level(1)[1];
        assert_eq!(worker.rect, Rect::new(400.0, 20.0, 600.0, 20.0));
        assert!(!worker.under_root);
    }

    #[test]
    fn bottom_up_orientation() {
        let l = layout(FrameKey::ROOT, 1000.0, false, None);
        assert_eq!(l.level(0)[0].rect.y, 180.0);
        assert_eq!(l.level(3)[0].rect.y, 120.0);
    }

    #[test]
    fn zoom_drops_frames_outside_window() {
        let l = layout(FrameKey::new(1, 1), 600.0, true, None);
        // main and parse end exactly where the window starts
        assert!(l.level(1).iter().all(|v| v.key != FrameKey::new(1, 0)));
        assert_eq!(l.level(2).len(), 1);
        let worker = l.find(FrameKey::new(1, 1)).expect("root visible");
        assert_eq!(worker.rect.x, 0.0);
        assert_eq!(worker.rect.w, 600.0);
        let all = &l.level(0)[0];
        assert!(all.under_root);
        assert_eq!(all.rect.x, -400.0);
        assert_eq!(l.level(3)[0].rect.x, 50.0);
    }

    #[test]
    fn pattern_marks_and_records_matches() {
        let m = RegexMatcher::new("^run").expect("valid regex");
        let l = layout(FrameKey::ROOT, 1000.0, true, Some(&m));
        let matched: Vec<_> = l.frames().filter(|v| v.matched).map(|v| v.key).collect();
        assert_eq!(matched, vec![FrameKey::new(2, 1), FrameKey::new(3, 0)]);
        assert_eq!(l.matched.iter().collect::<Vec<_>>(), vec![(40, 50), (45, 10)]);
    }

    #[test]
    fn empty_viewport_has_no_frames() {
        let l = layout(FrameKey::ROOT, 0.0, true, None);
        assert_eq!(l.visible_count(), 0);
        assert_eq!(l.levels.len(), 4);
        assert_eq!(l.px_per_unit, 0.0);
    }

    #[test]
    fn empty_viewport_still_records_matches() {
        let m = RegexMatcher::new("^run").expect("valid regex");
        for viewport in [Viewport::new(0.0, 200.0), Viewport::new(1000.0, 0.0)] {
            let request = GeometryRequest {
                root: FrameKey::ROOT,
                viewport,
                reversed: true,
                pattern: Some(&m),
            };
            let l = compute_geometry(&tree(), &request, &FlameConfig::default());
            assert_eq!(l.visible_count(), 0);
            assert_eq!(l.matched.iter().collect::<Vec<_>>(), vec![(40, 50), (45, 10)]);
        }
    }

    #[test]
    fn labels_follow_width() {
        let l = layout(FrameKey::ROOT, 100.0, true, None);
        // run.inner is 10px wide at this scale
        assert_eq!(l.level(3)[0].label, None);
        assert_eq!(l.level(1)[1].label, Some("worker".into()));
    }
}
