use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Layout and interaction constants.
///
/// Every field has a default matching the stock browser flame graph, so a
/// config file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameConfig {
    /// Height of one stack level in logical pixels.
    pub frame_height: f64,
    /// Frames narrower than this get no label.
    pub min_label_width: f64,
    /// Average glyph advance used to budget label characters.
    pub char_width: f64,
    /// Horizontal inset of the label inside its frame.
    pub label_inset: f64,
    /// Label baseline, measured from the top of the frame.
    pub label_baseline: f64,
    pub font_size: f64,
    /// Delay between the last pointer move and the tooltip appearing.
    pub tooltip_delay_ms: u64,
    /// Gap between pointer and tooltip.
    pub tooltip_offset: f64,
    /// Upper bound for the initial canvas height.
    pub max_canvas_height: f64,
}

impl FlameConfig {
    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.tooltip_delay_ms)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl Default for FlameConfig {
    fn default() -> Self {
        Self {
            frame_height: 20.0,
            min_label_width: 21.0,
            char_width: 7.0,
            label_inset: 3.0,
            label_baseline: 14.0,
            font_size: 12.0,
            tooltip_delay_ms: 500,
            tooltip_offset: 5.0,
            max_canvas_height: 5000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = FlameConfig::from_json(br#"{"frame_height": 16}"#).unwrap_or_default();
        assert_eq!(cfg.frame_height, 16.0);
        assert_eq!(cfg.min_label_width, 21.0);
        assert_eq!(cfg.tooltip_delay(), Duration::from_millis(500));
    }
}
