//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-frame units only (no wall-clock time)
//! - Seeded RNG only
//! - Removal-safe pool iteration (rebuild or retain, never splice-in-place)
//! - No rendering or platform dependencies

pub mod collision;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{aabb_overlap, circle_rect_overlap, point_in_rect};
pub use progression::Progression;
pub use state::{
    Bullet, Enemy, EnemyBullet, EnemyKind, GameEvent, GameOverResult, Hazard, Missile, MovePattern,
    Particle, Player, PowerUp, PowerUpKind, SimulationState, StatsSnapshot, Tint,
};
pub use tick::{FrameInput, FrameReport, advance_frame};
