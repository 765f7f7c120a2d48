//! Property tests over randomly shaped flame graphs.
//!
//! Graphs are built from random stacks merged into a call trie, so every
//! generated tree is well formed: levels are left-ordered and each frame
//! sits inside its parent.
//!
//! 1. Every non-root frame is contained by its parent.
//! 2. A frame lying fully on the canvas is hit at its center.
//! 3. Coverage stays within 0..=100 and formats as "100" exactly when full.
//! 4. Coverage at the tree root equals the union of matched intervals.
//! 5. Flipping orientation mirrors y and leaves x untouched.
//! 6. Resetting zoom twice equals resetting once.

use std::collections::BTreeMap;

use flamesight_core::controller::RecordingSurface;
use flamesight_core::model::{FlameTree, Frame};
use flamesight_core::pattern::RegexMatcher;
use flamesight_core::views::frame_at;
use flamesight_core::{FlameConfig, FlameController, FrameMatcher};
use flamesight_protocol::{FrameKey, Viewport};
use proptest::prelude::*;
use proptest::sample::Index;

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Node {
    self_weight: u64,
    children: BTreeMap<&'static str, Node>,
}

impl Node {
    fn total(&self) -> u64 {
        self.self_weight + self.children.values().map(Node::total).sum::<u64>()
    }

    fn emit(&self, title: &str, left: u64, level: usize, levels: &mut Vec<Vec<Frame>>) {
        if levels.len() <= level {
            levels.push(Vec::new());
        }
        levels[level].push(Frame::new(title, left, self.total(), "#e8a040"));
        let mut offset = left;
        for (name, child) in &self.children {
            child.emit(name, offset, level + 1, levels);
            offset += child.total();
        }
    }
}

fn build_tree(stacks: &[(Vec<usize>, u64)]) -> FlameTree {
    let mut root = Node::default();
    for (path, weight) in stacks {
        let mut node = &mut root;
        for &i in path {
            node = node.children.entry(NAMES[i]).or_default();
        }
        node.self_weight += weight;
    }
    let mut levels = Vec::new();
    root.emit("all", 0, 0, &mut levels);
    FlameTree::new(levels).expect("trie layout is well formed")
}

fn tree_strategy() -> impl Strategy<Value = FlameTree> {
    prop::collection::vec(
        (prop::collection::vec(0usize..NAMES.len(), 1..6), 1u64..50),
        1..24,
    )
    .prop_map(|stacks| build_tree(&stacks))
}

fn pattern_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["alpha", "^beta$", "ta", "^g", "mm", "a$", "zzz"])
}

fn pick_key(tree: &FlameTree, level: Index, index: Index) -> FrameKey {
    let level = level.index(tree.level_count());
    let index = index.index(tree.level(level).len());
    FrameKey::new(level, index)
}

fn controller(tree: FlameTree, width: f64) -> FlameController<RecordingSurface> {
    let height = tree.preferred_height(&FlameConfig::default());
    FlameController::new(tree, RecordingSurface::default(), Viewport::new(width, height))
}

fn all_keys(tree: &FlameTree) -> impl Iterator<Item = FrameKey> + '_ {
    tree.levels()
        .iter()
        .enumerate()
        .flat_map(|(level, frames)| (0..frames.len()).map(move |index| FrameKey::new(level, index)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Parents contain their children
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parent_contains_child(tree in tree_strategy()) {
        for key in all_keys(&tree).filter(|k| k.level() > 0) {
            let parent_key = tree.parent(key);
            prop_assert!(parent_key.is_some(), "no parent for {:?}", key);
            let parent = tree.frame(parent_key.unwrap_or(FrameKey::ROOT)).unwrap_or(tree.root());
            let child = tree.frame(key).unwrap_or(tree.root());
            prop_assert!(parent.left <= child.left && child.right() <= parent.right(),
                "{:?} escapes its parent", key);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Layout and hit-testing agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn center_of_visible_frame_hits_it(
        tree in tree_strategy(),
        level in any::<Index>(),
        index in any::<Index>(),
        width in 100.0f64..2000.0,
        reversed in any::<bool>(),
    ) {
        let key = pick_key(&tree, level, index);
        let mut c = controller(tree, width);
        c.zoom_to(key);
        if c.is_reversed() != reversed {
            c.reverse();
        }
        let layout = c.layout();
        for visible in layout.frames() {
            let center = visible.rect.center();
            let x = center.x.clamp(0.0, width);
            let hit = frame_at(layout, x, center.y).map(|v| v.key);
            // the last child's right edge may round a hair past the canvas
            if visible.rect.x >= 0.0 && visible.rect.right() <= width + 1e-6 {
                prop_assert_eq!(hit, Some(visible.key));
            } else {
                prop_assert!(visible.under_root || visible.key == layout.root);
                prop_assert!(hit.is_some());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Coverage bounds and formatting
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coverage_is_a_bounded_percentage(
        tree in tree_strategy(),
        pattern in pattern_strategy(),
        level in any::<Index>(),
        index in any::<Index>(),
    ) {
        let key = pick_key(&tree, level, index);
        let mut c = controller(tree, 1000.0);
        c.zoom_to(key);
        let cov = c.search(pattern).expect("valid pattern");
        let percent = cov.percent();
        prop_assert!((0.0..=100.0).contains(&percent), "{} out of range", percent);
        prop_assert_eq!(cov.to_string() == "100", cov.matched >= cov.root_total);
        prop_assert_eq!(c.coverage(), Some(cov));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Coverage counts nested matches once
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coverage_equals_union_of_matches(tree in tree_strategy(), pattern in pattern_strategy()) {
        let matcher = RegexMatcher::new(pattern).expect("valid pattern");
        let mut covered = vec![false; tree.total() as usize];
        for frames in tree.levels() {
            for frame in frames.iter().filter(|f| matcher.matches(&f.title)) {
                covered[frame.left as usize..frame.right() as usize].fill(true);
            }
        }
        let expected = covered.iter().filter(|&&c| c).count() as u64;

        let mut c = controller(tree, 1000.0);
        let cov = c.search_with(Box::new(matcher));
        prop_assert_eq!(cov.matched, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Orientation only mirrors rows
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reverse_mirrors_rows(tree in tree_strategy(), level in any::<Index>(), index in any::<Index>()) {
        let key = pick_key(&tree, level, index);
        let mut c = controller(tree, 800.0);
        c.zoom_to(key);
        let top_down = c.layout().clone();
        c.reverse();
        let bottom_up = c.layout();

        let height = top_down.viewport.height;
        let frame_height = top_down.frame_height;
        prop_assert_eq!(top_down.visible_count(), bottom_up.visible_count());
        for (a, b) in top_down.frames().zip(bottom_up.frames()) {
            prop_assert_eq!(a.key, b.key);
            prop_assert_eq!((a.rect.x, a.rect.w), (b.rect.x, b.rect.w));
            prop_assert!((a.rect.y + b.rect.y - (height - frame_height)).abs() < 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. reset_zoom is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_zoom_is_idempotent(tree in tree_strategy(), level in any::<Index>(), index in any::<Index>()) {
        let key = pick_key(&tree, level, index);
        let mut c = controller(tree, 640.0);
        c.zoom_to(key);
        c.reset_zoom();
        let once = c.layout().clone();
        c.reset_zoom();
        prop_assert_eq!(c.layout(), &once);
        prop_assert_eq!(c.zoom_root(), FrameKey::ROOT);
        prop_assert!(!c.is_zoomed());
    }
}
