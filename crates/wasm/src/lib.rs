//! Browser bridge: one [`FlameGraph`] per canvas. Every method that changes
//! what is on screen leaves a fresh command list behind, fetched with
//! [`FlameGraph::commands`] and replayed by the page's canvas code.

use std::time::Duration;

use flamesight_core::FlameController;
use flamesight_core::controller::{ControllerOptions, RecordingSurface};
use flamesight_core::parsers::parse_tree;
use flamesight_core::tooltip::DifferentialTooltip;
use flamesight_protocol::{FrameKey, Viewport};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(js_error)
}

/// Page timestamps are untrusted; negative or NaN clamp to zero and
/// anything too large for a `Duration` saturates.
fn millis(now_ms: f64) -> Duration {
    let ms = if now_ms.is_nan() { 0.0 } else { now_ms.max(0.0) };
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

#[wasm_bindgen]
pub struct FlameGraph {
    controller: FlameController<RecordingSurface>,
}

#[wasm_bindgen]
impl FlameGraph {
    /// Parse a levels document and lay it out on a `width` × `height`
    /// canvas. `differential` switches tooltips to sample deltas.
    #[wasm_bindgen(constructor)]
    pub fn new(
        data: &[u8],
        width: f64,
        height: f64,
        dpr: f64,
        differential: bool,
    ) -> Result<FlameGraph, JsError> {
        let tree = parse_tree(data).map_err(js_error)?;
        let mut options = ControllerOptions::default();
        if differential {
            options.tooltips = Box::new(DifferentialTooltip);
        }
        let viewport = Viewport::new(width, height).with_dpr(dpr);
        Ok(Self {
            controller: FlameController::with_options(
                tree,
                RecordingSurface::default(),
                viewport,
                options,
            ),
        })
    }

    /// Canvas height the graph would like before any resize.
    #[wasm_bindgen(js_name = preferredHeight)]
    pub fn preferred_height(&self) -> f64 {
        let c = &self.controller;
        c.tree().preferred_height(c.config())
    }

    /// Render commands of the latest draw, as JSON.
    pub fn commands(&self) -> Result<String, JsError> {
        to_json(&self.controller.surface().commands)
    }

    pub fn reverse(&mut self) {
        self.controller.reverse();
    }

    /// Highlight frames matching `pattern`; returns the coverage label
    /// ("100" or two decimals).
    pub fn search(&mut self, pattern: &str) -> Result<String, JsError> {
        let coverage = self.controller.search(pattern).map_err(js_error)?;
        Ok(coverage.to_string())
    }

    #[wasm_bindgen(js_name = resetSearch)]
    pub fn reset_search(&mut self) {
        self.controller.reset_search();
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&mut self) {
        self.controller.reset_zoom();
    }

    /// Zoom to the frame at `(level, index)`; `false` if refused.
    #[wasm_bindgen(js_name = zoomTo)]
    pub fn zoom_to(&mut self, level: usize, index: usize) -> bool {
        self.controller.zoom_to(FrameKey::new(level, index))
    }

    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.controller.resize(Viewport::new(width, height).with_dpr(dpr));
    }

    #[wasm_bindgen(js_name = setScrollY)]
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.controller.set_scroll_y(scroll_y);
    }

    /// Returns the hover box as JSON, or `None` off the graph.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        now_ms: f64,
    ) -> Result<Option<String>, JsError> {
        self.controller.pointer_move(x, y, millis(now_ms));
        self.controller.highlight().map(to_json).transpose()
    }

    #[wasm_bindgen(js_name = pointerOut)]
    pub fn pointer_out(&mut self) {
        self.controller.pointer_out();
    }

    /// Zoom into the frame under the pointer; `true` if the view changed.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.controller.click(x, y).is_some()
    }

    /// Tooltip content and placement as JSON once its delay has passed.
    #[wasm_bindgen(js_name = pollTooltip)]
    pub fn poll_tooltip(&mut self, now_ms: f64) -> Result<Option<String>, JsError> {
        self.controller
            .poll_tooltip(millis(now_ms))
            .as_ref()
            .map(to_json)
            .transpose()
    }

    /// Title of the highlighted frame, for the page to select.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self) -> Option<String> {
        self.controller.double_click().map(|title| title.to_string())
    }

    #[wasm_bindgen(js_name = openContextMenu)]
    pub fn open_context_menu(&mut self) -> bool {
        self.controller.open_context_menu().is_some()
    }

    #[wasm_bindgen(js_name = closeContextMenu)]
    pub fn close_context_menu(&mut self) {
        self.controller.close_context_menu();
    }
}
