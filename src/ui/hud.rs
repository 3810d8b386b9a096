//! Screen frame around the play field: border, status bar, requisite panel,
//! and the end-of-run overlay.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use requisite_run::{RunOutcome, RunState};

const BORDER_COLOR: Color = Color::LightYellow;
const PLAY_FIELD_MIN_HEIGHT: u16 = 12;
const PANEL_WIDTH: u16 = 30;

/// Screen areas for one frame.
pub struct HudLayout {
    pub play_field: Rect,
    /// Two lines under the play field.
    pub status_bar: Rect,
    /// Requisite checklist on the right.
    pub panel: Rect,
}

/// Clear `area`, draw the titled border, and split the inside.
///
/// ```text
/// ┌─ Requisite Run ─────────────────┬─ Requisites ┐
/// │   [play field]                  │  [checklist]│
/// │ [status + controls]             │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
pub fn create_hud_layout(frame: &mut Frame, area: Rect, title: &str) -> HudLayout {
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [left, panel] = split(
        inner,
        Direction::Horizontal,
        Constraint::Min(20),
        Constraint::Length(PANEL_WIDTH),
    );
    let [play_field, status_bar] = split(
        left,
        Direction::Vertical,
        Constraint::Min(PLAY_FIELD_MIN_HEIGHT),
        Constraint::Length(2),
    );

    HudLayout {
        play_field,
        status_bar,
        panel,
    }
}

fn split(area: Rect, direction: Direction, first: Constraint, second: Constraint) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(direction)
        .constraints([first, second])
        .split(area);
    [chunks[0], chunks[1]]
}

/// First line: motion status and requisite count. Second line: key hints.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: &str,
    run: &RunState,
    controls: &[(&str, &str)],
) {
    if area.height == 0 {
        return;
    }

    let count_color = if run.has_all_requisites() {
        Color::LightGreen
    } else {
        Color::White
    };
    let status_line = Line::from(vec![
        Span::styled(status, Style::default().fg(BORDER_COLOR)),
        Span::styled("   Requisites ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/{}", run.total_collected, run.required()),
            Style::default().fg(count_color).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).alignment(Alignment::Center),
        Rect { height: 1, ..area },
    );

    if area.height < 2 || controls.is_empty() {
        return;
    }
    let hints: Vec<Span> = controls
        .iter()
        .enumerate()
        .flat_map(|(i, (key, action))| {
            let gap = if i == 0 { "" } else { "  " };
            [
                Span::raw(gap),
                Span::styled(*key, Style::default().fg(Color::White)),
                Span::styled(format!(" {action}"), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(hints)).alignment(Alignment::Center),
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

/// Bordered " Requisites " panel; returns the area inside the border.
pub fn render_panel_frame(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Requisites ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Full-screen result for a finished run.
pub fn render_run_over(frame: &mut Frame, area: Rect, run: &RunState) {
    let (color, title) = match run.outcome {
        RunOutcome::Victory => (Color::Green, ":: ENLISTED! ::"),
        _ => (Color::Red, "RUN FAILED"),
    };

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let missing: Vec<&str> = run
        .collectibles
        .iter()
        .filter(|c| !c.collected)
        .map(|c| c.label.as_str())
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            run.outcome.message(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Requisites collected: {}/{}",
                run.total_collected,
                run.required()
            ),
            Style::default().fg(Color::Cyan),
        )),
    ];
    if !missing.is_empty() && run.outcome != RunOutcome::Victory {
        lines.push(Line::from(Span::styled(
            format!("Missing: {}", missing.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[R] Run again   [Q] Quit",
        Style::default().fg(Color::DarkGray),
    )));

    let height = (lines.len() as u16).min(inner.height);
    let y = inner.y + inner.height.saturating_sub(height) / 2;
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true }),
        Rect::new(inner.x, y, inner.width, height),
    );
}
