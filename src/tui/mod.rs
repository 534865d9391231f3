//! Terminal UI for mazebound.

mod input;
mod ui;

pub use input::map_event;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::game::{GamePhase, GameSession, InputEvent};
use crate::maze::Direction;
use crate::progress::ProgressService;

/// Saves player progress after each stage completion; used by the offline
/// client only.
pub struct ProgressHook {
    service: ProgressService,
    player_name: String,
}

impl ProgressHook {
    /// Creates a hook saving progress for `player_name`.
    pub fn new(service: ProgressService, player_name: String) -> Self {
        Self {
            service,
            player_name,
        }
    }
}

/// Runs the TUI game loop over an already-started session until the user
/// quits.
///
/// `remote_rx`, when present, feeds externally sourced directions through
/// the same state machine as keyboard input. Sets up the terminal and
/// restores it on exit.
pub async fn run_tui(
    mut session: GameSession,
    mut remote_rx: Option<mpsc::UnboundedReceiver<Direction>>,
    progress: Option<ProgressHook>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = game_loop(
        &mut terminal,
        &mut session,
        remote_rx.as_mut(),
        progress.as_ref(),
    )
    .await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        error!(error = ?err, "Game loop error");
    }
    result
}

async fn game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut GameSession,
    mut remote_rx: Option<&mut mpsc::UnboundedReceiver<Direction>>,
    progress: Option<&ProgressHook>,
) -> Result<()> {
    info!("Starting game loop");

    loop {
        terminal.draw(|frame| ui::draw(frame, session))?;

        let phase_before = session.phase();

        // Remote-control directions go through the same transition table as
        // keyboard input.
        if let Some(rx) = remote_rx.as_mut() {
            while let Ok(direction) = rx.try_recv() {
                session.handle(InputEvent::Direction(direction)).await;
            }
        }

        // Short poll timeout keeps the timer display live.
        if event::poll(Duration::from_millis(100))? {
            let raw = event::read()?;
            if let Some(event) = input::map_event(&raw) {
                if event == InputEvent::Quit {
                    info!("User quit");
                    return Ok(());
                }
                session.handle(event).await;
            }
        }

        maybe_save_progress(session, phase_before, progress);
    }
}

/// Upserts saved progress when a stage completion happened this tick.
fn maybe_save_progress(
    session: &GameSession,
    phase_before: GamePhase,
    progress: Option<&ProgressHook>,
) {
    let Some(hook) = progress else {
        return;
    };
    if phase_before != GamePhase::Playing {
        return;
    }

    let result = match session.phase() {
        GamePhase::StageComplete => {
            let completed = session.current_stage();
            hook.service
                .record(&hook.player_name, completed + 1, completed)
        }
        GamePhase::GameComplete => {
            let total = session.total_stages();
            hook.service.record(&hook.player_name, total, total)
        }
        _ => return,
    };

    if let Err(e) = result {
        warn!(error = %e, "Failed to save progress");
    }
}
