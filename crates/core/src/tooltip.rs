//! Tooltip content for a hovered frame.
//!
//! The controller only decides when and where a tooltip appears; what it
//! says is up to a [`TooltipRenderer`].

use std::fmt::Write;

use serde::Serialize;

use crate::model::{Frame, FrameDetails};

/// Title plus labelled rows, ready for a host to lay out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Plain-text rendering, one row per line.
    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        for (label, value) in &self.rows {
            let _ = write!(out, "\n{label}: {value}");
        }
        out
    }
}

pub trait TooltipRenderer: std::fmt::Debug {
    /// `graph_total` is the weight of the whole graph, not of the zoom root.
    fn render(&self, frame: &Frame, graph_total: u64) -> TooltipContent;
}

fn percent_of(value: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", 100.0 * value as f64 / total as f64)
}

/// Samples, share of the graph, self weight and JIT details.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTooltip;

impl TooltipRenderer for BasicTooltip {
    fn render(&self, frame: &Frame, graph_total: u64) -> TooltipContent {
        let mut content = TooltipContent::new(frame.title.as_str())
            .row("Samples", frame.total.to_string())
            .row("Total", percent_of(frame.total, graph_total));
        if let Some(self_weight) = frame.self_weight {
            content = content.row("Self", format!("{self_weight} ({})", percent_of(self_weight, graph_total)));
        }
        if let Some(FrameDetails::Text(text)) = &frame.details {
            let text = text.trim_start_matches([',', ' ']);
            if !text.is_empty() {
                content = content.row("Details", text);
            }
        }
        content
    }
}

/// Basic rows plus the change between baseline and comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferentialTooltip;

impl TooltipRenderer for DifferentialTooltip {
    fn render(&self, frame: &Frame, graph_total: u64) -> TooltipContent {
        let content = BasicTooltip.render(frame, graph_total);
        match &frame.details {
            Some(FrameDetails::Diff { samples, percent }) => {
                let trend = match samples.signum() {
                    1 => "added",
                    -1 => "removed",
                    _ => "unchanged",
                };
                content
                    .row("Difference", format!("{samples:+} samples"))
                    .row("Change", format!("{percent:.0}% {trend}"))
            }
            _ => content,
        }
    }
}
