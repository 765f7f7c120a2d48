//! Pointer → frame lookup against the last computed [`Layout`].

use tracing::trace;

use super::geometry::{Layout, VisibleFrame};

/// Level under a pointer at logical `y`, or `None` outside the graph.
pub fn level_at(layout: &Layout, y: f64) -> Option<usize> {
    if layout.frame_height <= 0.0 {
        return None;
    }
    let from_origin = if layout.reversed {
        y
    } else {
        layout.viewport.height - y
    };
    let level = (from_origin / layout.frame_height).floor();
    if !level.is_finite() || level < 0.0 {
        return None;
    }
    let level = level as usize;
    (level < layout.levels.len()).then_some(level)
}

/// First visible frame of `level` whose rectangle contains `(x, y)`.
pub fn hit_test(layout: &Layout, level: usize, x: f64, y: f64) -> Option<&VisibleFrame> {
    layout.level(level).iter().find(|v| v.rect.contains(x, y))
}

/// Frame under the pointer: derives the level from `y`, then scans it.
pub fn frame_at(layout: &Layout, x: f64, y: f64) -> Option<&VisibleFrame> {
    let level = level_at(layout, y)?;
    let hit = hit_test(layout, level, x, y);
    trace!(x, y, level, hit = ?hit.map(|v| v.key), "hit test");
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlameConfig;
    use crate::model::{FlameTree, Frame};
    use crate::views::geometry::{GeometryRequest, compute_geometry};
    use flamesight_protocol::{FrameKey, Viewport};

    fn layout(reversed: bool) -> Layout {
        let f = |t: &str, l, w| Frame::new(t, l, w, "#50cccc");
        let tree = FlameTree::new(vec![
            vec![f("all", 0, 100)],
            vec![f("a", 0, 40), f("b", 40, 60)],
        ])
        .expect("well-formed tree");
        let request = GeometryRequest {
            root: FrameKey::ROOT,
            viewport: Viewport::new(100.0, 100.0),
            reversed,
            pattern: None,
        };
        compute_geometry(&tree, &request, &FlameConfig::default())
    }

    #[test]
    fn level_from_pointer_in_both_orientations() {
        let top_down = layout(true);
        assert_eq!(level_at(&top_down, 5.0), Some(0));
        assert_eq!(level_at(&top_down, 25.0), Some(1));
        assert_eq!(level_at(&top_down, 45.0), None);
        assert_eq!(level_at(&top_down, -1.0), None);

        let bottom_up = layout(false);
        assert_eq!(level_at(&bottom_up, 95.0), Some(0));
        assert_eq!(level_at(&bottom_up, 75.0), Some(1));
        assert_eq!(level_at(&bottom_up, 10.0), None);
        assert_eq!(level_at(&bottom_up, 101.0), None);
    }

    #[test]
    fn finds_frame_under_pointer() {
        let l = layout(true);
        assert_eq!(frame_at(&l, 10.0, 30.0).map(|v| v.key), Some(FrameKey::new(1, 0)));
        assert_eq!(frame_at(&l, 70.0, 30.0).map(|v| v.key), Some(FrameKey::new(1, 1)));
        assert_eq!(frame_at(&l, 50.0, 10.0).map(|v| v.key), Some(FrameKey::ROOT));
    }

    #[test]
    fn shared_edge_resolves_to_left_frame() {
        let l = layout(true);
        assert_eq!(frame_at(&l, 40.0, 30.0).map(|v| v.key), Some(FrameKey::new(1, 0)));
    }

    #[test]
    fn misses_outside_canvas() {
        let l = layout(true);
        assert!(frame_at(&l, 150.0, 30.0).is_none());
        assert!(frame_at(&l, -3.0, 30.0).is_none());
        assert!(hit_test(&l, 7, 10.0, 10.0).is_none());
    }
}
