//! Fixed-step update and input handling
//!
//! The phase gates everything: physics and slicing only run while Playing,
//! and the remaining inputs drive the GameOver/Leaderboard screens.

use glam::DVec2;

use super::collision::{Motion, resolve_slices};
use super::physics::step_pool;
use super::state::{GamePhase, GameSession, PointerState};

/// Keyboard commands the core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Escape,
    Restart,
    /// Toggle the leaderboard screen
    Leaderboard,
}

/// Discrete input events from the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f64, y: f64 },
    PointerDown,
    PointerUp,
    Key(KeyCommand),
    /// Restart button activated
    RestartRequested,
    /// Leaderboard button activated
    ShowLeaderboard,
    /// Back button on the leaderboard screen
    HideLeaderboard,
}

/// Advance the session by one frame
///
/// Returns the number of slots retired. No-op outside Playing.
pub fn tick(session: &mut GameSession) -> usize {
    if !session.is_playing() {
        return 0;
    }

    session.frame += 1;
    let dt = session.effects.time_scale();
    session.effects.tick();

    let retired = step_pool(&mut session.pool, dt);

    // Health only changes in the resolver, but re-check in case it was set directly
    session.check_game_over();
    retired
}

/// Apply one input event; returns the number of projectiles sliced
pub fn handle_input(session: &mut GameSession, event: InputEvent) -> usize {
    match event {
        InputEvent::PointerMoved { x, y } => pointer_moved(session, DVec2::new(x, y)),
        InputEvent::PointerDown => {
            session.pointer.down = true;
            0
        }
        InputEvent::PointerUp => {
            // The next motion starts a fresh stroke rather than joining the old one
            session.pointer = PointerState::default();
            0
        }
        InputEvent::RestartRequested | InputEvent::Key(KeyCommand::Restart) => {
            session.restart();
            0
        }
        InputEvent::ShowLeaderboard => {
            session.show_leaderboard();
            0
        }
        InputEvent::HideLeaderboard => {
            session.hide_leaderboard();
            0
        }
        InputEvent::Key(KeyCommand::Leaderboard) => {
            if !session.show_leaderboard() {
                session.hide_leaderboard();
            }
            0
        }
        InputEvent::Key(KeyCommand::Escape) => {
            if session.phase == GamePhase::Leaderboard {
                session.hide_leaderboard();
            } else {
                session.quit_requested = true;
            }
            0
        }
    }
}

fn pointer_moved(session: &mut GameSession, to: DVec2) -> usize {
    let sliced = match session.pointer.last {
        Some(from) if session.is_playing() => {
            let motion = Motion {
                from,
                to,
                before: session.pointer.before,
            };
            resolve_slices(session, &motion)
        }
        _ => 0,
    };

    session.pointer.before = session.pointer.last;
    session.pointer.last = Some(to);
    sliced
}
