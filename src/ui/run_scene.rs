//! Requisite Run game UI rendering.
//!
//! Uses a cell buffer approach for per-character color control. World
//! coordinates (one viewport of the level) are scaled down to the play field,
//! everything is drawn into a 2D grid, and the grid is stamped row-by-row as
//! Paragraph widgets.

use super::hud::{create_hud_layout, render_panel_frame, render_run_over, render_status_bar};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use requisite_run::build_info::BUILD_COMMIT;
use requisite_run::run::types::{Bounds, MotionState, RunState};

const GROUND_CHAR: char = '▓';
const PLAYER_COLOR: Color = Color::LightYellow;

/// Where the pursuer stands, in world units.
const PURSUER_BOUNDS: Bounds = Bounds {
    x: 20.0,
    y: 350.0,
    width: 100.0,
    height: 130.0,
};

/// Render the run scene.
pub fn render_run_scene(frame: &mut Frame, area: Rect, run: &RunState, waiting_to_start: bool) {
    if run.is_over() {
        render_run_over(frame, area, run);
        return;
    }

    let title = format!(" Requisite Run ({}) ", BUILD_COMMIT);
    let layout = create_hud_layout(frame, area, &title);

    render_play_field(frame, layout.play_field, run);

    if waiting_to_start {
        render_start_prompt(frame, layout.play_field);
    }

    render_status_bar_content(frame, layout.status_bar, run, waiting_to_start);
    render_info_panel(frame, layout.panel, run);
}

/// Cell in the render buffer with foreground and background colors.
#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl Cell {
    fn new(ch: char, fg: Color) -> Self {
        Self {
            ch,
            fg,
            bg: Color::Reset,
        }
    }
}

/// World-to-cell projection for one frame.
struct Projection {
    x_scale: f64,
    y_scale: f64,
    width: usize,
    height: usize,
}

impl Projection {
    /// Fill the cells covered by `bounds`, clipped to the buffer.
    fn fill(&self, buffer: &mut [Vec<Cell>], bounds: &Bounds, cell: Cell) {
        let left = (bounds.x * self.x_scale).floor() as i64;
        let right = ((bounds.right() * self.x_scale).ceil() as i64).max(left + 1);
        let top = (bounds.y * self.y_scale).floor() as i64;
        let bottom = ((bounds.bottom() * self.y_scale).ceil() as i64).max(top + 1);

        for row in top.max(0)..bottom.min(self.height as i64) {
            for col in left.max(0)..right.min(self.width as i64) {
                buffer[row as usize][col as usize] = cell;
            }
        }
    }

    fn row_of(&self, y: f64) -> usize {
        ((y * self.y_scale).round() as usize).min(self.height.saturating_sub(1))
    }
}

/// Render the play field: scenery, obstacles, requisites, gate, pursuer, player.
fn render_play_field(frame: &mut Frame, area: Rect, run: &RunState) {
    if area.height < 4 || area.width < 20 {
        return;
    }

    let width = area.width as usize;
    let height = area.height as usize;
    let view = Projection {
        x_scale: area.width as f64 / run.config.viewport_width,
        y_scale: area.height as f64 / run.config.viewport_height,
        width,
        height,
    };

    let mut buffer: Vec<Vec<Cell>> = vec![vec![Cell::default(); width]; height];

    // ── Background: parallax dots ─────────────────────────────────────
    let drift = -run.scroll_offset * view.x_scale;
    for &(base_x, y, pattern) in &[
        (8.0_f64, 1usize, ". ."),
        (30.0, 2, "."),
        (52.0, 1, ".."),
        (70.0, 3, ". ."),
    ] {
        let cx = (base_x - drift).rem_euclid(width as f64) as usize;
        if y < height {
            for (i, ch) in pattern.chars().enumerate() {
                buffer[y][(cx + i) % width] = Cell::new(ch, Color::Rgb(60, 60, 80));
            }
        }
    }

    // ── Ground ────────────────────────────────────────────────────────
    let ground_row = view.row_of(run.ground_line());
    for row in buffer.iter_mut().skip(ground_row) {
        for cell in row.iter_mut() {
            *cell = Cell {
                ch: GROUND_CHAR,
                fg: Color::Rgb(90, 70, 50),
                bg: Color::Rgb(50, 40, 30),
            };
        }
    }

    // ── Obstacles ─────────────────────────────────────────────────────
    for obstacle in &run.obstacles {
        view.fill(
            &mut buffer,
            &obstacle.bounds,
            Cell::new('#', Color::Rgb(140, 110, 80)),
        );
    }

    // ── Requisites ────────────────────────────────────────────────────
    for item in run.collectibles.iter().filter(|c| !c.collected) {
        view.fill(&mut buffer, &item.bounds, Cell::new('◆', Color::LightCyan));
    }

    // ── Finish gate ───────────────────────────────────────────────────
    view.fill(
        &mut buffer,
        &run.finish_gate,
        Cell::new('▒', Color::LightBlue),
    );

    // ── Pursuer ───────────────────────────────────────────────────────
    view.fill(&mut buffer, &PURSUER_BOUNDS, Cell::new('T', Color::LightMagenta));

    // ── Player ────────────────────────────────────────────────────────
    let body = if run.player.motion == MotionState::Grounded {
        '█'
    } else {
        '▀'
    };
    view.fill(
        &mut buffer,
        &run.player.bounds(),
        Cell::new(body, PLAYER_COLOR),
    );

    // ── Pickup notice (top row, centered) ─────────────────────────────
    if let Some(notice) = &run.notice {
        let text: Vec<char> = notice.text.chars().take(width).collect();
        let start = (width - text.len()) / 2;
        for (i, ch) in text.into_iter().enumerate() {
            buffer[0][start + i] = Cell::new(ch, Color::LightGreen);
        }
    }

    // ── Render buffer to terminal ─────────────────────────────────────
    for (row_idx, row_data) in buffer.iter().enumerate() {
        let mut spans: Vec<Span> = Vec::new();
        let mut current_fg = Color::Reset;
        let mut current_bg = Color::Reset;
        let mut current_text = String::new();

        for &cell in row_data.iter() {
            if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut current_text),
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }
            current_fg = cell.fg;
            current_bg = cell.bg;
            current_text.push(cell.ch);
        }
        if !current_text.is_empty() {
            spans.push(Span::styled(
                current_text,
                Style::default().fg(current_fg).bg(current_bg),
            ));
        }

        let line = Paragraph::new(Line::from(spans));
        let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
        frame.render_widget(line, row_area);
    }
}

/// Render the status bar below the play field.
fn render_status_bar_content(frame: &mut Frame, area: Rect, run: &RunState, waiting: bool) {
    if waiting {
        render_status_bar(
            frame,
            area,
            "Ready",
            run,
            &[("[Space/Up]", "Start"), ("[Q]", "Quit")],
        );
        return;
    }

    let status = match run.player.motion {
        MotionState::Grounded => "Run!",
        MotionState::Rising => "Jump!",
        MotionState::Falling => "Falling...",
    };
    render_status_bar(
        frame,
        area,
        status,
        run,
        &[
            ("[Space/Up]", "Jump (x2: double)"),
            ("[R]", "Restart"),
            ("[Q]", "Quit"),
        ],
    );
}

/// Render the info panel on the right side.
fn render_info_panel(frame: &mut Frame, area: Rect, run: &RunState) {
    let inner = render_panel_frame(frame, area);

    let to_gate = (run.finish_gate.x - run.player.bounds().right()).max(0.0);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Progress: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.0}%", run.progress() * 100.0),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("To gate: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.0}", to_gate),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];

    let room = (inner.height as usize).saturating_sub(lines.len());
    let label_width = (inner.width as usize).saturating_sub(3);
    for item in run.collectibles.iter().take(room) {
        let (mark, color) = if item.collected {
            ("\u{2714} ", Color::LightGreen)
        } else {
            ("\u{00b7} ", Color::DarkGray)
        };
        let label: String = item.label.chars().take(label_width).collect();
        lines.push(Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::styled(label, Style::default().fg(color)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the "Press Space to Start" prompt centered on the play field.
fn render_start_prompt(frame: &mut Frame, area: Rect) {
    if area.height < 5 || area.width < 30 {
        return;
    }

    let center_y = area.y + area.height / 2;
    let prompt = "[ Press Space/Up to Start ]";
    let x = area.x + area.width.saturating_sub(prompt.len() as u16) / 2;

    let line = Paragraph::new(Line::from(vec![Span::styled(
        prompt,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )]));

    frame.render_widget(line, Rect::new(x, center_y, prompt.len() as u16, 1));
}
