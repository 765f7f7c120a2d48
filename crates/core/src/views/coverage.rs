use std::collections::BTreeMap;
use std::fmt;

/// Weight-axis intervals of frames matched by the active search, keyed by
/// their left offset.
///
/// Matches from different levels may nest (a recursive method matches at
/// several depths); [`MatchedIntervals::merged_total`] counts only the
/// outermost ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedIntervals {
    by_left: BTreeMap<u64, u64>,
}

impl MatchedIntervals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a matched frame. Of several matches starting at the same
    /// offset the widest one is kept.
    pub fn record(&mut self, left: u64, weight: u64) {
        let slot = self.by_left.entry(left).or_insert(weight);
        if weight > *slot {
            *slot = weight;
        }
    }

    pub fn len(&self) -> usize {
        self.by_left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_left.is_empty()
    }

    /// `(left, weight)` pairs in ascending `left` order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.by_left.iter().map(|(&left, &weight)| (left, weight))
    }

    /// Total weight covered by the matches, with every interval that starts
    /// inside an already counted one skipped.
    pub fn merged_total(&self) -> u64 {
        let mut total: u64 = 0;
        let mut next_free = 0;
        for (left, weight) in self.iter() {
            if left >= next_free {
                total = total.saturating_add(weight);
                next_free = left.saturating_add(weight);
            }
        }
        total
    }
}

impl FromIterator<(u64, u64)> for MatchedIntervals {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (left, weight) in iter {
            out.record(left, weight);
        }
        out
    }
}

/// Share of the zoom root's weight highlighted by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub matched: u64,
    pub root_total: u64,
}

impl Coverage {
    pub fn new(intervals: &MatchedIntervals, root_total: u64) -> Self {
        Self {
            matched: intervals.merged_total(),
            root_total,
        }
    }

    pub fn is_full(&self) -> bool {
        self.matched >= self.root_total
    }

    /// Percentage in `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.is_full() {
            100.0
        } else {
            100.0 * self.matched as f64 / self.root_total as f64
        }
    }
}

/// `"100"` for full coverage, otherwise two decimals (`"40.00"`).
impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            f.write_str("100")
        } else {
            write!(f, "{:.2}", self.percent())
        }
    }
}
