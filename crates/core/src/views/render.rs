use flamesight_protocol::{Paint, Point, RenderCommand, ThemeToken};

use super::geometry::Layout;
use crate::config::FlameConfig;
use crate::model::FlameTree;

/// Turn a layout into draw instructions: clear the canvas, then per frame a
/// bordered rectangle, its label if one fits, and a veil over ancestors of
/// the zoom root.
pub fn render_layout(tree: &FlameTree, layout: &Layout, config: &FlameConfig) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(layout.visible_count() * 2 + 1);
    commands.push(RenderCommand::Clear {
        color: ThemeToken::Background.into(),
    });

    for visible in layout.frames() {
        let Some(frame) = tree.frame(visible.key) else {
            continue;
        };
        let rect = visible.rect;

        let color = if visible.matched {
            ThemeToken::SearchHighlight.into()
        } else {
            Paint::Literal(frame.color.clone())
        };
        commands.push(RenderCommand::DrawRect {
            rect,
            color,
            border_color: Some(ThemeToken::FrameBorder.into()),
            frame: Some(visible.key),
        });

        if let Some(label) = &visible.label {
            // Ancestors start left of the canvas; pin their label to its edge.
            let x = frame.left.saturating_sub(layout.window_start) as f64 * layout.px_per_unit
                + config.label_inset;
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, rect.y + config.label_baseline),
                text: label.clone(),
                color: ThemeToken::FrameText.into(),
                font_size: config.font_size,
                max_width: rect.w - 2.0 * config.label_inset,
            });
        }

        if visible.under_root {
            commands.push(RenderCommand::FillRect {
                rect,
                color: ThemeToken::UnderRootOverlay.into(),
            });
        }
    }

    commands
}
