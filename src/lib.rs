//! Star Barrage - wave-defense arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (entities, collisions, progression)
//! - `leaderboard`: Score records matching the external leaderboard service
//!
//! Rendering, raw input capture and the HUD are external collaborators: the
//! host feeds one `FrameInput` per rendered frame and draws from the returned
//! snapshot and events. All velocities and timers are expressed in per-frame
//! units; the simulation is never told wall-clock time, so host cadence sets
//! effective game speed.

pub mod leaderboard;
pub mod sim;

pub use leaderboard::{Leaderboard, ScoreRecord};
pub use sim::{FrameInput, FrameReport, GameEvent, SimulationState, advance_frame};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (world units; the renderer scales to the screen)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player ship bounding box (square)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Exponential smoothing factor for pointer-follow movement
    pub const PLAYER_FOLLOW_FACTOR: f32 = 0.15;
    /// Hull points; hp is clamped to [0, PLAYER_MAX_HP]
    pub const PLAYER_MAX_HP: u32 = 100;

    /// Blaster fires on frames where `frame % cadence == 0`
    pub const BLASTER_CADENCE_FRAMES: u64 = 7;
    /// Faster cadence while the rapid-fire buff is active
    pub const RAPID_CADENCE_FRAMES: u64 = 4;
    pub const BULLET_SPEED: f32 = 18.0;
    pub const BULLET_DAMAGE: i32 = 1;

    /// Missiles fire independently of the blaster cadence
    pub const MISSILE_CADENCE_FRAMES: u64 = 30;
    /// Constant-magnitude steering acceleration toward the target
    pub const MISSILE_STEER_ACCEL: f32 = 0.5;
    /// Missile velocity magnitude clamp
    pub const MISSILE_MAX_SPEED: f32 = 8.0;
    pub const MISSILE_DAMAGE: i32 = 5;

    /// Per-firing-frame chance the laser array spins up
    pub const LASER_ACTIVATION_CHANCE: f64 = 0.005;
    /// Beam duration once active
    pub const LASER_DURATION_FRAMES: u32 = 60;
    pub const LASER_DAMAGE_PER_FRAME: i32 = 2;
    /// Half-width of the beam column anchored to the player's center
    pub const LASER_HALF_WIDTH: f32 = 10.0;

    /// Base enemy bounding box; bosses are doubled
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_COLLISION_DAMAGE: u32 = 20;
    pub const ENEMY_BULLET_DAMAGE: u32 = 10;
    /// Enemies only start shooting back at this player level
    pub const ENEMY_SHOOT_MIN_LEVEL: u32 = 2;

    /// Boss slot opens every N levels
    pub const BOSS_LEVEL_INTERVAL: u32 = 5;
    /// Coarse frame gate for the boss slot (see spawner)
    pub const BOSS_GATE_FRAMES: u64 = 300;

    /// Asteroids appear once level exceeds this
    pub const HAZARD_MIN_LEVEL: u32 = 3;
    /// One hazard roll per window of this many frames
    pub const HAZARD_WINDOW_FRAMES: u64 = 120;
    pub const HAZARD_SPAWN_CHANCE: f64 = 0.4;
    pub const HAZARD_DAMAGE: u32 = 15;
    pub const HAZARD_HP: i32 = 3;
    /// Flat score for shooting down an asteroid (no combo credit)
    pub const HAZARD_SCORE: u64 = 25;

    /// Chance a killed enemy drops a power-up
    pub const POWER_UP_DROP_CHANCE: f64 = 0.1;
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.5;
    pub const HEALTH_PICKUP_AMOUNT: u32 = 25;

    /// Buff durations (independent countdowns)
    pub const SHIELD_DURATION_FRAMES: u32 = 300;
    pub const RAPID_DURATION_FRAMES: u32 = 360;
    pub const MULTIPLIER_DURATION_FRAMES: u32 = 480;
    /// Score multiplier value while the buff runs
    pub const MULTIPLIER_VALUE: u64 = 2;

    /// Kills within this window chain into a combo
    pub const COMBO_WINDOW_FRAMES: u32 = 120;
    /// Level-up fires once score reaches `level * LEVEL_SCORE_STEP`
    pub const LEVEL_SCORE_STEP: u64 = 1000;

    /// Entities fully past an edge by this margin are culled
    pub const OFFSCREEN_MARGIN: f32 = 60.0;

    /// Particles per explosion burst
    pub const EXPLOSION_PARTICLES: usize = 12;
    /// Per-frame particle life decay
    pub const PARTICLE_DECAY: f32 = 0.04;
    /// Soft cap on live particles (oldest evicted first)
    pub const MAX_PARTICLES: usize = 512;
}
