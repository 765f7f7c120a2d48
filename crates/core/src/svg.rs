//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write;

use flamesight_protocol::{Paint, RenderCommand, Viewport};

use crate::controller::RenderSurface;

/// Render a list of commands as an SVG document. The view box spans the
/// logical viewport; the document size is its physical (dpr-scaled) size.
pub fn render_svg(commands: &[RenderCommand], viewport: &Viewport) -> String {
    let (width, height) = (viewport.width, viewport.height);
    let (physical_width, physical_height) = viewport.physical_size();
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{physical_width}" height="{physical_height}" style="font:12px Arial,sans-serif">"#,
    );

    for cmd in commands {
        match cmd {
            RenderCommand::Clear { color } => {
                let _ = write!(
                    svg,
                    r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
                    resolve_paint(color),
                );
            }
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    resolve_paint(color),
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}" stroke-width="1""#, resolve_paint(border));
                }
                svg.push_str("/>");
            }
            RenderCommand::FillRect { rect, color } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" style="pointer-events:none"/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    resolve_paint(color),
                );
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                ..
            } => {
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" style="pointer-events:none">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_paint(color),
                    escape_xml(text),
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_paint(paint: &Paint) -> String {
    match paint {
        Paint::Theme(token) => token.default_css().to_string(),
        Paint::Literal(color) => escape_xml(color),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Surface that keeps the latest paint as an SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    document: String,
}

impl SvgSurface {
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl RenderSurface for SvgSurface {
    fn paint(&mut self, viewport: &Viewport, commands: &[RenderCommand]) {
        self.document = render_svg(commands, viewport);
    }
}
