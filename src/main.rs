//! Headless demo driver
//!
//! Runs a scripted session at a fixed timestep and logs what happens.
//! Useful for eyeballing balance changes without a renderer:
//!
//! ```sh
//! RUST_LOG=info cargo run --bin modefall-demo
//! ```

use modefall::consts::SIM_DT;
use modefall::highscores::FileScores;
use modefall::{GameSession, Mode, NullEffects};

const VIEWPORT_WIDTH: f32 = 1000.0;
const VIEWPORT_HEIGHT: f32 = 1600.0;
const RUN_SECONDS: f32 = 30.0;
const SEED: u64 = 0xC0FFEE;

fn main() {
    env_logger::init();

    let scores = FileScores::in_dir(std::env::temp_dir());
    let mut session = GameSession::with_ports(Box::new(NullEffects), Box::new(scores))
        .with_seed(SEED);
    session.initialize(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    session.start();

    let total_ticks = (RUN_SECONDS / SIM_DT) as u32;
    let mut pressed_at: Option<u32> = None;

    for tick in 0..total_ticks {
        // Scripted input: a short hop most of the time, with the
        // occasional long hold to cycle through the special modes
        let elapsed_ms = (tick as f32 * SIM_DT * 1000.0) as u32;
        match pressed_at {
            None => {
                let due_to_press = session.mode() == Mode::Base
                    && session.actor_pos().is_some_and(|pos| {
                        pos.y > VIEWPORT_HEIGHT * 0.6
                    });
                if due_to_press {
                    session.on_press_start();
                    pressed_at = Some(elapsed_ms);
                }
            }
            Some(started_ms) => {
                // Every eighth press is held into band 2 for a Speed burst
                let target_ms = if (started_ms / 1000) % 8 == 7 { 450 } else { 150 };
                if elapsed_ms - started_ms >= target_ms {
                    session.on_press_end(elapsed_ms - started_ms);
                    pressed_at = None;
                }
            }
        }

        session.update(SIM_DT);
        if !session.is_running() {
            break;
        }
    }

    if let Some(snap) = session.snapshot() {
        log::info!(
            "Run finished: score {}, high score {}, level {}, running {}",
            snap.score,
            snap.high_score,
            snap.level,
            snap.running
        );
        println!(
            "score={} high={} level={} survived={}",
            snap.score,
            snap.high_score,
            snap.level,
            if snap.running { "yes" } else { "no" }
        );
    }
}
