use flamesight_protocol::FrameKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::frame::Frame;
use crate::config::FlameConfig;

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("flame graph has no levels")]
    Empty,
    #[error("root level must hold exactly one frame, found {0}")]
    RootLevel(usize),
    #[error("root frame has zero weight")]
    ZeroWeightRoot,
    #[error("level {level} is empty")]
    EmptyLevel { level: usize },
    #[error("frame {index} at level {level} overlaps or precedes its left neighbour")]
    Unordered { level: usize, index: usize },
    #[error("frame {index} at level {level} is not contained in any frame of the level above")]
    Orphan { level: usize, index: usize },
    #[error("frame {index} at level {level} extends past the end of the weight axis")]
    WeightOverflow { level: usize, index: usize },
    #[error("level {level} holds more frames than a frame key can address")]
    TooManyFrames { level: usize },
}

/// Profile data as produced by the flame-graph generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlameData {
    /// Informational; the level list is authoritative.
    #[serde(default)]
    pub depth: usize,
    pub levels: Vec<Vec<Frame>>,
}

/// Immutable weighted call tree stored level by level.
///
/// Parent/child relations are implied by interval containment between
/// adjacent levels. They are resolved once here and cached as an index into
/// the previous level, so nothing downstream re-scans ranges.
#[derive(Debug, Clone)]
pub struct FlameTree {
    levels: Vec<Vec<Frame>>,
    parents: Vec<Vec<u32>>,
}

impl FlameTree {
    pub fn new(levels: Vec<Vec<Frame>>) -> Result<Self, TreeError> {
        let root_level = levels.first().ok_or(TreeError::Empty)?;
        if root_level.len() != 1 {
            return Err(TreeError::RootLevel(root_level.len()));
        }
        if root_level[0].total == 0 {
            return Err(TreeError::ZeroWeightRoot);
        }
        check_bounds(&levels)?;

        let mut parents = Vec::with_capacity(levels.len());
        parents.push(vec![0]);

        for level in 1..levels.len() {
            let frames = &levels[level];
            if frames.is_empty() {
                return Err(TreeError::EmptyLevel { level });
            }
            check_order(level, frames)?;
            parents.push(resolve_parents(level, &levels[level - 1], frames)?);
        }

        let zero_weight = levels.iter().flatten().filter(|f| f.total == 0).count();
        if zero_weight > 0 {
            debug!(zero_weight, "tree holds zero-weight frames");
        }
        debug!(
            levels = levels.len(),
            frames = levels.iter().map(Vec::len).sum::<usize>(),
            total = levels[0][0].total,
            "built flame tree"
        );

        Ok(Self { levels, parents })
    }

    pub fn from_data(data: FlameData) -> Result<Self, TreeError> {
        let count = data.levels.len();
        if data.depth != count && data.depth + 1 != count {
            warn!(
                declared = data.depth,
                levels = count,
                "declared depth disagrees with level count"
            );
        }
        Self::new(data.levels)
    }

    pub fn root(&self) -> &Frame {
        &self.levels[0][0]
    }

    /// Weight of the whole graph.
    pub fn total(&self) -> u64 {
        self.root().total
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Deepest level index (`level_count() - 1`).
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn levels(&self) -> &[Vec<Frame>] {
        &self.levels
    }

    pub fn level(&self, level: usize) -> &[Frame] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn frame(&self, key: FrameKey) -> Option<&Frame> {
        self.levels.get(key.level())?.get(key.index())
    }

    pub fn parent(&self, key: FrameKey) -> Option<FrameKey> {
        if key.level == 0 {
            return None;
        }
        let index = *self.parents.get(key.level())?.get(key.index())?;
        Some(FrameKey::new(key.level() - 1, index as usize))
    }

    /// Ancestors of `key`, nearest first, ending with the root.
    pub fn ancestors(&self, key: FrameKey) -> impl Iterator<Item = FrameKey> + '_ {
        std::iter::successors(self.parent(key), |k| self.parent(*k))
    }

    /// Initial canvas height: one row per level, capped.
    pub fn preferred_height(&self, config: &FlameConfig) -> f64 {
        (self.levels.len() as f64 * config.frame_height).min(config.max_canvas_height)
    }
}

/// Every level and frame position must fit a [`FrameKey`], and every
/// `left + total` must fit the weight axis.
fn check_bounds(levels: &[Vec<Frame>]) -> Result<(), TreeError> {
    check_key_range(levels.len().saturating_sub(1), 1)?;
    for (level, frames) in levels.iter().enumerate() {
        check_key_range(level, frames.len())?;
        if let Some(index) = frames
            .iter()
            .position(|f| f.left.checked_add(f.total).is_none())
        {
            return Err(TreeError::WeightOverflow { level, index });
        }
    }
    Ok(())
}

fn check_key_range(level: usize, len: usize) -> Result<(), TreeError> {
    let max = FrameKey::MAX_COMPONENT as usize;
    if level >= max || len > max {
        return Err(TreeError::TooManyFrames { level });
    }
    Ok(())
}

fn check_order(level: usize, frames: &[Frame]) -> Result<(), TreeError> {
    for (index, pair) in frames.windows(2).enumerate() {
        if pair[1].left < pair[0].right() {
            return Err(TreeError::Unordered {
                level,
                index: index + 1,
            });
        }
    }
    Ok(())
}

/// Both lists are left-ordered and non-overlapping, so one forward sweep
/// finds the unique container of every child.
fn resolve_parents(level: usize, above: &[Frame], frames: &[Frame]) -> Result<Vec<u32>, TreeError> {
    let mut out = Vec::with_capacity(frames.len());
    let mut p = 0;
    for (index, frame) in frames.iter().enumerate() {
        while p + 1 < above.len() && above[p + 1].left <= frame.left {
            p += 1;
        }
        match above.get(p) {
            Some(parent) if parent.contains(frame) => out.push(p as u32),
            _ => return Err(TreeError::Orphan { level, index }),
        }
    }
    Ok(out)
}
