//! Frame label fitting.

use flamesight_protocol::SharedStr;

use crate::config::FlameConfig;

/// Label to draw inside a frame `width` pixels wide, or `None` when the
/// frame is too narrow for text. Titles longer than the character budget
/// (`floor(width / char_width)`) are cut and suffixed with `..`.
pub fn fit_label(title: &SharedStr, width: f64, config: &FlameConfig) -> Option<SharedStr> {
    if width.is_nan() || width < config.min_label_width {
        return None;
    }
    let budget = char_budget(width, config);
    if title.char_count() <= budget {
        return Some(title.clone());
    }
    let mut cut: String = title.chars().take(budget.saturating_sub(2)).collect();
    cut.push_str("..");
    Some(cut.into())
}

pub fn char_budget(width: f64, config: &FlameConfig) -> usize {
    if config.char_width <= 0.0 {
        return 0;
    }
    (width / config.char_width).floor().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_frames_get_no_label() {
        let cfg = FlameConfig::default();
        assert_eq!(fit_label(&"run".into(), 20.9, &cfg), None);
        assert_eq!(fit_label(&"run".into(), 21.0, &cfg), Some("run".into()));
    }

    #[test]
    fn long_titles_are_truncated_to_budget() {
        let cfg = FlameConfig::default();
        // 70px / 7px = 10 characters, 8 kept plus the suffix
        let label = fit_label(&"java.lang.Thread.run".into(), 70.0, &cfg);
        assert_eq!(label, Some("java.lan..".into()));
        assert_eq!(
            fit_label(&"0123456789".into(), 70.0, &cfg),
            Some("0123456789".into())
        );
    }

    #[test]
    fn truncation_counts_characters() {
        let cfg = FlameConfig::default();
        let label = fit_label(&"äöüäöü".into(), 35.0, &cfg);
        assert_eq!(label, Some("äöü..".into()));
    }
}
