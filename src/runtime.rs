//! Real-time driver: advances a game's virtual clock against wall time.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::GameError;
use crate::game::Game;

/// Drive `game` for `span` of wall time, advancing once per frame.
///
/// Each tick advances by the time measured since the previous one, so a
/// stalled frame is caught up in a single step rather than replayed.
///
/// # Errors
///
/// Propagates any error raised while advancing the game.
pub async fn run_for(game: &mut Game, span: Duration) -> Result<(), GameError> {
    let frame = game.frame_interval().min(span).max(Duration::from_nanos(1));
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(frame_ms = frame.as_secs_f64() * 1000.0, span_ms = span.as_secs_f64() * 1000.0, "game loop started");

    let start = Instant::now();
    let mut advanced = Duration::ZERO;
    let mut frames = 0_u64;
    while advanced < span {
        let tick = ticker.tick().await;
        let reached = tick.saturating_duration_since(start).min(span);
        game.advance(reached.saturating_sub(advanced))?;
        advanced = reached;
        frames += 1;
    }

    debug!(frames, pending = game.pending_tasks(), "game loop finished");
    Ok(())
}
