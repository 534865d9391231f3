//! Rendering for the maze, HUD, and completion popups.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::{GamePhase, GameSession};
use crate::maze::{Cell, Position};
use crate::stage::StageSession;

/// Renders one frame of the game.
///
/// The maze and HUD are always drawn from the current session state, so the
/// last good state stays visible behind any popup or failure indicator.
pub fn draw(frame: &mut Frame, session: &GameSession) {
    let [hud, maze, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_hud(frame, hud, session);
    draw_maze(frame, maze, session.stage());
    draw_help(frame, help, session.phase());

    match session.phase() {
        GamePhase::Playing => {}
        GamePhase::StageComplete => draw_stage_complete(frame, session),
        GamePhase::GameComplete => draw_game_complete(frame, session),
        GamePhase::LoadFailed { stage } => draw_load_failed(frame, stage),
    }
}

fn draw_hud(frame: &mut Frame, area: Rect, session: &GameSession) {
    let stage = session.stage();
    let line = Line::from(vec![
        Span::styled(
            format!("Stage {}/{}", session.current_stage(), session.total_stages()),
            Style::default().fg(Color::White),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Moves: {}", stage.moves()),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Time: {:.1}s", stage.elapsed().as_secs_f64()),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let badge = Paragraph::new(Line::from(Span::styled(
        "LOCAL-FIRST MODE",
        Style::default().fg(Color::Yellow),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(badge, area);
}

fn draw_maze(frame: &mut Frame, area: Rect, stage: &StageSession) {
    let grid = stage.grid();
    let mut lines = Vec::with_capacity(grid.height());

    for y in 0..grid.height() {
        let row = grid.row(y).unwrap_or(&[]);
        let mut spans = Vec::with_capacity(grid.width());
        for x in 0..grid.width() {
            let pos = Position::new(x as i32, y as i32);
            let span = if stage.player() == pos {
                Span::styled("<>", Style::default().fg(Color::Blue))
            } else if stage.goal() == pos {
                Span::styled("[]", Style::default().fg(Color::Green))
            } else {
                match row.get(x) {
                    Some(Cell::Wall) => Span::styled("██", Style::default().fg(Color::DarkGray)),
                    _ => Span::raw("  "),
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let width = grid.width() as u16 * 2 + 2;
    let height = grid.height() as u16 + 2;
    let rect = centered(area, width, height);
    frame.render_widget(Paragraph::new(lines).block(Block::bordered()), rect);
}

fn draw_help(frame: &mut Frame, area: Rect, phase: GamePhase) {
    let text = match phase {
        GamePhase::Playing => "Arrow keys to move · q to quit",
        GamePhase::StageComplete => "Enter or click to continue · q to quit",
        GamePhase::GameComplete => "Enter or click to play again · q to quit",
        GamePhase::LoadFailed { .. } => "Enter or click to retry · q to quit",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray))),
        area,
    );
}

fn draw_stage_complete(frame: &mut Frame, session: &GameSession) {
    let rect = centered(frame.area(), 40, 7);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from(Span::styled(
            "Congratulations!",
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::raw(format!("You completed Stage {}!", session.current_stage())),
        Line::raw(""),
        Line::from(Span::styled(
            "[ Continue ]",
            Style::default().fg(Color::Green),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title("Stage Complete")),
        rect,
    );
}

fn draw_game_complete(frame: &mut Frame, session: &GameSession) {
    let rect = centered(frame.area(), 46, 9);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from(Span::styled(
            "GAME COMPLETE!",
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::raw(format!(
            "You completed all {} stages!",
            session.total_stages()
        )),
        Line::raw(format!(
            "Total moves: {} | Time: {:.1}s",
            session.total_moves(),
            session.game_elapsed().as_secs_f64()
        )),
        Line::raw("Well done, maze master!"),
        Line::raw(""),
        Line::from(Span::styled(
            "[ Play Again ]",
            Style::default().fg(Color::Green),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title("Game Complete")),
        rect,
    );
}

fn draw_load_failed(frame: &mut Frame, stage: u32) {
    let rect = centered(frame.area(), 44, 6);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from(Span::styled(
            format!("Failed to load stage {}", stage),
            Style::default().fg(Color::Red),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "[ Retry ]",
            Style::default().fg(Color::Yellow),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title("Load Error")),
        rect,
    );
}

/// Centers a `width` x `height` box inside `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
