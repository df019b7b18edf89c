//! Headless session runner
//!
//! Drives the simulation with a scripted autopilot, useful for balance checks
//! and soak runs without a renderer attached. Logs periodic snapshots and
//! prints the final result as JSON.
//!
//! Usage: star-barrage [seed] [max_frames]

use glam::Vec2;

use star_barrage::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use star_barrage::leaderboard::{Leaderboard, ScoreRecord};
use star_barrage::sim::{FrameInput, SimulationState, advance_frame};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let max_frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(36_000);

    log::info!("Session start: seed {seed}, up to {max_frames} frames");

    let mut state = SimulationState::new(seed);
    let mut board = Leaderboard::new();
    let mut result = None;

    for frame in 1..=max_frames {
        let input = autopilot(&state, frame);
        let report = advance_frame(&mut state, &input);

        for event in &report.events {
            log::debug!("Event: {event:?}");
        }
        if frame.is_multiple_of(600) {
            let s = &report.snapshot;
            log::info!(
                "Frame {frame}: score {}, hp {}, level {}, kills {}",
                s.score,
                s.hp,
                s.level,
                s.kills
            );
        }

        if let Some(over) = report.game_over {
            result = Some(over);
            break;
        }
    }

    // Survived the whole run: report the state as it stands
    let result = result.unwrap_or_else(|| state.progression.final_result());

    if let Some(rank) = board.add_record(ScoreRecord::from_result("autopilot", &result)) {
        log::info!("Run ranked #{rank}");
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Failed to serialize result: {err}");
            std::process::exit(1);
        }
    }
}

/// Scripted input: sweep the ship across the arena on a slow sine while
/// holding fire. Dumb but enough to exercise every system over a long run.
fn autopilot(state: &SimulationState, frame: u64) -> FrameInput {
    let t = frame as f32 * 0.01;
    let x = ARENA_WIDTH / 2.0 + t.sin() * (ARENA_WIDTH / 3.0);

    // Drift toward the nearest power-up when one is falling
    let x = state
        .power_ups
        .first()
        .map(|p| p.pos.x)
        .unwrap_or(x);

    FrameInput {
        move_target: Vec2::new(x, ARENA_HEIGHT - 80.0),
        firing: true,
    }
}
