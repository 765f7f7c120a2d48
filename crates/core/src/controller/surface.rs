use flamesight_protocol::{RenderCommand, Viewport};

/// Where the controller sends its draw instructions.
///
/// Implementations own the actual drawing target (canvas, terminal, SVG
/// buffer). Geometry is in logical units; scaling by `viewport.dpr` is the
/// surface's business.
pub trait RenderSurface {
    fn paint(&mut self, viewport: &Viewport, commands: &[RenderCommand]);
}

/// Keeps the most recent command list; for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<RenderCommand>,
    pub viewport: Option<Viewport>,
    /// Number of paints received so far.
    pub paints: usize,
}

impl RenderSurface for RecordingSurface {
    fn paint(&mut self, viewport: &Viewport, commands: &[RenderCommand]) {
        self.commands = commands.to_vec();
        self.viewport = Some(*viewport);
        self.paints += 1;
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn paint(&mut self, viewport: &Viewport, commands: &[RenderCommand]) {
        (**self).paint(viewport, commands);
    }
}
