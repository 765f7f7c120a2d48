use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flamesight_core::controller::ControllerOptions;
use flamesight_core::{FlameConfig, FlameController, FlameTree, RenderSurface};
use flamesight_protocol::{Paint, Rect as CanvasRect, RenderCommand, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};
use tracing::debug;

/// Keeps the controller's latest command list until the next terminal
/// frame is drawn.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    commands: Vec<RenderCommand>,
}

impl RenderSurface for TerminalSurface {
    fn paint(&mut self, viewport: &Viewport, commands: &[RenderCommand]) {
        debug!(
            width = viewport.width,
            height = viewport.height,
            commands = commands.len(),
            "terminal paint"
        );
        self.commands = commands.to_vec();
    }
}

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::FrameBorder => Color::Black,
        ThemeToken::FrameText => Color::Black,
        ThemeToken::SearchHighlight => Color::Rgb(0xee, 0x00, 0xee),
        ThemeToken::UnderRootOverlay => Color::DarkGray,
        ThemeToken::HoverHighlight => Color::LightYellow,
        ThemeToken::HoverText => Color::Black,
    }
}

fn paint_to_color(paint: &Paint) -> Color {
    match paint {
        Paint::Theme(token) => theme_to_color(*token),
        Paint::Literal(css) => parse_css_color(css).unwrap_or(Color::Gray),
    }
}

/// Parse `#rrggbb`, `#rgb` and `rgb(r, g, b)` / `rgba(r, g, b, a)`.
fn parse_css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Color::Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                let nibble = |shift: u16| (((v >> shift) & 0xf) * 17) as u8;
                Some(Color::Rgb(nibble(8), nibble(4), nibble(0)))
            }
            _ => None,
        };
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<f64>().ok());
    let mut next = || parts.next().flatten().map(|v| v.clamp(0.0, 255.0) as u8);
    Some(Color::Rgb(next()?, next()?, next()?))
}

/// Maps between terminal cells and canvas coordinates: one cell is
/// `char_width` logical pixels wide and one stack level tall.
#[derive(Debug, Clone, Copy)]
struct CellGrid {
    area: Rect,
    cell_w: f64,
    cell_h: f64,
    scroll_rows: u16,
}

impl CellGrid {
    fn new(area: Rect, config: &FlameConfig, scroll_rows: u16) -> Self {
        Self {
            area,
            cell_w: config.char_width,
            cell_h: config.frame_height,
            scroll_rows,
        }
    }

    /// Canvas size for this grid; tall graphs extend below the screen and
    /// are reached by scrolling.
    fn viewport(&self, level_count: usize) -> Viewport {
        let rows = usize::from(self.area.height).max(level_count);
        Viewport::new(
            f64::from(self.area.width) * self.cell_w,
            rows as f64 * self.cell_h,
        )
    }

    fn scroll_y(&self) -> f64 {
        f64::from(self.scroll_rows) * self.cell_h
    }

    /// Canvas point at the center of a terminal cell.
    fn to_canvas(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let col = f64::from(column - self.area.x);
        let row = f64::from(row - self.area.y) + f64::from(self.scroll_rows);
        Some(((col + 0.5) * self.cell_w, (row + 0.5) * self.cell_h))
    }

    fn row_of(&self, y: f64) -> Option<u16> {
        let row = (y / self.cell_h).floor() - f64::from(self.scroll_rows);
        (row >= 0.0 && row < f64::from(self.area.height)).then(|| self.area.y + row as u16)
    }

    /// Cells covered by a canvas rectangle, clipped to the grid. Frames
    /// narrower than a cell still get one.
    fn cells(&self, rect: &CanvasRect) -> Option<Rect> {
        let y = self.row_of(rect.y)?;
        let width = f64::from(self.area.width);
        let start = (rect.x / self.cell_w).round().clamp(0.0, width);
        let mut end = (rect.right() / self.cell_w).round().clamp(0.0, width);
        if end <= start {
            if rect.w <= 0.0 || start >= width {
                return None;
            }
            end = start + 1.0;
        }
        Some(Rect::new(
            self.area.x + start as u16,
            y,
            (end - start) as u16,
            1,
        ))
    }
}

fn paint_commands(buf: &mut Buffer, grid: &CellGrid, commands: &[RenderCommand]) {
    for cmd in commands {
        match cmd {
            RenderCommand::Clear { color } => {
                fill(buf, grid.area, paint_to_color(color));
            }
            RenderCommand::DrawRect { rect, color, .. } => {
                if let Some(cells) = grid.cells(rect) {
                    fill(buf, cells, paint_to_color(color));
                }
            }
            RenderCommand::FillRect { rect, .. } => {
                if let Some(cells) = grid.cells(rect) {
                    buf.set_style(cells, Style::default().add_modifier(Modifier::DIM));
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                max_width,
                ..
            } => {
                let Some(y) = grid.row_of(position.y) else {
                    continue;
                };
                let col = (position.x / grid.cell_w).floor();
                if col < 0.0 || col >= f64::from(grid.area.width) {
                    continue;
                }
                let col = col as u16;
                let room = usize::from(grid.area.width - col);
                let chars = ((max_width / grid.cell_w).floor().max(0.0) as usize).min(room);
                buf.set_stringn(
                    grid.area.x + col,
                    y,
                    text,
                    chars,
                    Style::default().fg(paint_to_color(color)),
                );
            }
        }
    }
}

fn fill(buf: &mut Buffer, area: Rect, color: Color) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf[(x, y)].set_char(' ').set_bg(color);
        }
    }
}

#[derive(Debug)]
enum Mode {
    Normal,
    Search(String),
}

struct App {
    controller: FlameController<TerminalSurface>,
    config: FlameConfig,
    mode: Mode,
    status: String,
    scroll_rows: u16,
    clock: Instant,
    quit: bool,
}

impl App {
    fn grid(&self, screen: Rect) -> CellGrid {
        let canvas = Rect::new(0, 1, screen.width, screen.height.saturating_sub(2));
        CellGrid::new(canvas, &self.config, self.scroll_rows)
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn sync_viewport(&mut self, grid: &CellGrid) {
        let viewport = grid.viewport(self.controller.tree().level_count());
        if viewport != self.controller.viewport() {
            self.controller.resize(viewport);
        }
        self.controller.set_scroll_y(grid.scroll_y());
    }

    fn scroll(&mut self, grid: &CellGrid, delta: i32) {
        let rows = self.controller.tree().level_count() as i32;
        let max = (rows - i32::from(grid.area.height)).max(0);
        self.scroll_rows = (i32::from(self.scroll_rows) + delta).clamp(0, max) as u16;
    }

    fn on_key(&mut self, code: KeyCode, grid: &CellGrid) {
        if let Mode::Search(query) = &mut self.mode {
            match code {
                KeyCode::Char(c) => query.push(c),
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Enter => {
                    let query = std::mem::take(query);
                    self.status = match self.controller.search(&query) {
                        Ok(coverage) => format!("Matched: {coverage}%"),
                        Err(e) => e.to_string(),
                    };
                    self.mode = Mode::Normal;
                }
                KeyCode::Esc => self.mode = Mode::Normal,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('r') => self.controller.reverse(),
            KeyCode::Char('/') => self.mode = Mode::Search(String::new()),
            KeyCode::Char('0') | KeyCode::Char('z') => self.controller.reset_zoom(),
            KeyCode::Char('y') => {
                if let Some(title) = self.controller.double_click() {
                    self.status = format!("Selected: {title}");
                }
            }
            KeyCode::Char('c') => self.controller.close_context_menu(),
            KeyCode::Esc => {
                self.controller.reset_search();
                self.status.clear();
            }
            KeyCode::Up => self.scroll(grid, -1),
            KeyCode::Down => self.scroll(grid, 1),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, grid: &CellGrid) {
        let point = grid.to_canvas(mouse.column, mouse.row);
        match (mouse.kind, point) {
            (MouseEventKind::Moved, Some((x, y))) => {
                self.controller.pointer_move(x, y, self.now());
            }
            (MouseEventKind::Moved, None) => self.controller.pointer_out(),
            (MouseEventKind::Down(MouseButton::Left), Some((x, y))) => {
                self.controller.click(x, y);
            }
            (MouseEventKind::Down(MouseButton::Right), Some((x, y))) => {
                self.controller.close_context_menu();
                self.controller.pointer_move(x, y, self.now());
                if let Some(title) = self
                    .controller
                    .open_context_menu()
                    .and_then(|key| self.controller.tree().frame(key))
                    .map(|frame| frame.title.clone())
                {
                    self.status = format!("Pinned: {title} (c to release)");
                }
            }
            (MouseEventKind::ScrollUp, _) => self.scroll(grid, -1),
            (MouseEventKind::ScrollDown, _) => self.scroll(grid, 1),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame, grid: &CellGrid) {
        let area = frame.area();
        let root = self.controller.root_frame();
        let header = format!(
            " flamesight | {}{} | click zoom  0 reset  r flip  / search  Esc clear  q quit ",
            root.title,
            if self.controller.is_zoomed() { " (zoomed)" } else { "" },
        );
        frame.render_widget(
            Paragraph::new(Line::from(header))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
            Rect::new(0, 0, area.width, 1),
        );

        let buf = frame.buffer_mut();
        paint_commands(buf, grid, &self.controller.surface().commands);
        if let Some(hover) = self.controller.highlight() {
            let rect = CanvasRect::new(
                hover.left,
                hover.top + self.controller.scroll_y(),
                hover.width,
                hover.height,
            );
            if let Some(cells) = grid.cells(&rect) {
                buf.set_style(cells, Style::default().add_modifier(Modifier::REVERSED));
            }
        }

        let status = match &self.mode {
            Mode::Search(query) => format!("/{query}"),
            Mode::Normal => self.status.clone(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(status)).style(Style::default().fg(Color::White)),
            Rect::new(0, area.height.saturating_sub(1), area.width, 1),
        );
    }
}

/// Open the interactive viewer and block until the user quits.
pub fn run(tree: FlameTree, config: FlameConfig, top_down: bool, search: Option<&str>) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, tree, config, top_down, search);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    tree: FlameTree,
    config: FlameConfig,
    top_down: bool,
    search: Option<&str>,
) -> Result<()> {
    let size = terminal.size()?;
    let screen = Rect::new(0, 0, size.width, size.height);
    let initial = CellGrid::new(
        Rect::new(0, 1, screen.width, screen.height.saturating_sub(2)),
        &config,
        0,
    );
    let options = ControllerOptions {
        config: config.clone(),
        reversed: top_down,
        ..ControllerOptions::default()
    };
    let viewport = initial.viewport(tree.level_count());
    let mut app = App {
        controller: FlameController::with_options(tree, TerminalSurface::default(), viewport, options),
        config,
        mode: Mode::Normal,
        status: String::new(),
        scroll_rows: 0,
        clock: Instant::now(),
        quit: false,
    };
    if let Some(pattern) = search {
        app.status = match app.controller.search(pattern) {
            Ok(coverage) => format!("Matched: {coverage}%"),
            Err(e) => e.to_string(),
        };
    }

    while !app.quit {
        let size = terminal.size()?;
        let grid = app.grid(Rect::new(0, 0, size.width, size.height));
        app.sync_viewport(&grid);

        if let Some(tooltip) = app.controller.poll_tooltip(app.now()) {
            app.status = tooltip.content.to_text().replace('\n', " | ");
        }

        terminal.draw(|frame| app.draw(frame, &grid))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key.code, &grid),
                Event::Mouse(mouse) => app.on_mouse(mouse, &grid),
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamesight_core::Frame;

    fn grid(width: u16, height: u16) -> CellGrid {
        CellGrid::new(Rect::new(0, 0, width, height), &FlameConfig::default(), 0)
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(parse_css_color("#50e150"), Some(Color::Rgb(0x50, 0xe1, 0x50)));
        assert_eq!(parse_css_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(
            parse_css_color("rgba(255, 255, 255, 0.5)"),
            Some(Color::Rgb(255, 255, 255))
        );
        assert_eq!(parse_css_color("rgb(1,2,3)"), Some(Color::Rgb(1, 2, 3)));
        assert_eq!(parse_css_color("hotpink"), None);
    }

    #[test]
    fn cell_centers_map_back_to_their_cells() {
        let g = grid(20, 5);
        let (x, y) = g.to_canvas(3, 2).unwrap();
        assert_eq!((x, y), (24.5, 50.0));
        assert_eq!(g.row_of(y), Some(2));
        assert!(g.to_canvas(20, 0).is_none());
    }

    #[test]
    fn deep_scroll_maps_past_the_u16_range() {
        let g = CellGrid::new(Rect::new(0, 3, 20, 5), &FlameConfig::default(), u16::MAX);
        let (_, y) = g.to_canvas(0, 7).unwrap();
        let rows = f64::from(u16::MAX) + 4.0;
        assert_eq!(y, (rows + 0.5) * FlameConfig::default().frame_height);
    }

    #[test]
    fn narrow_rect_still_gets_a_cell() {
        let g = grid(20, 5);
        let cells = g.cells(&CanvasRect::new(30.0, 20.0, 0.5, 20.0)).unwrap();
        assert_eq!((cells.x, cells.y, cells.width), (4, 1, 1));
        assert!(g.cells(&CanvasRect::new(30.0, 20.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn paints_frames_and_labels_into_cells() {
        let tree = FlameTree::new(vec![
            vec![Frame::new("root", 0, 100, "#b2e1b2")],
            vec![
                Frame::new("first", 0, 40, "#50e150"),
                Frame::new("second", 40, 60, "#50cccc"),
            ],
        ])
        .unwrap();
        let g = grid(20, 4);
        let controller = FlameController::new(tree, TerminalSurface::default(), g.viewport(2));

        let mut buf = Buffer::empty(g.area);
        paint_commands(&mut buf, &g, &controller.surface().commands);

        assert_eq!(buf[(0, 0)].bg, Color::Rgb(0xb2, 0xe1, 0xb2));
        assert_eq!(buf[(0, 0)].symbol(), "r");
        assert_eq!(buf[(1, 1)].bg, Color::Rgb(0x50, 0xe1, 0x50));
        assert_eq!(buf[(12, 1)].bg, Color::Rgb(0x50, 0xcc, 0xcc));
        assert_eq!(buf[(0, 3)].bg, Color::Black);
    }
}
