//! Frame subscriber that logs every published frame.
//!
//! Stands in for a renderer: one structured `info` line per tick with the
//! score and the positions a board view would draw.

use futures::StreamExt as _;
use snake_core::Subscription;
use snake_types::Frame;
use tokio::task::JoinHandle;
use tracing::info;

/// Log one frame.
pub fn log_frame(frame: &Frame) {
    info!(
        tick = frame.tick,
        score = frame.score,
        length_target = frame.length_target,
        len = frame.state.snake.len(),
        head = ?frame.state.head(),
        food = ?frame.state.food,
        "Frame"
    );
}

/// Spawn a task that logs frames until the simulation ends.
///
/// The task resolves to the number of frames it logged.
pub fn spawn_frame_logger(subscription: Subscription) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut frames = subscription.into_stream();
        let mut logged: u64 = 0;
        while let Some(frame) = frames.next().await {
            log_frame(&frame);
            logged = logged.saturating_add(1);
        }
        logged
    })
}
