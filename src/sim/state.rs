//! Game state and core simulation types
//!
//! One `SimulationState` is owned by the host for the session's lifetime and
//! mutated only through `advance_frame`. Entity pools are plain vectors with
//! no cross-frame references into them; the one indirection (missile targets)
//! goes through enemy ids and is revalidated every frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::progression::Progression;

/// Enemy variants, each with its own stat scaling and score value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Tank,
    Shooter,
    Boss,
}

/// Horizontal movement style, drawn at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePattern {
    Wiggle,
    Zigzag,
    Circle,
    Orbit,
    Straight,
}

/// A hostile ship descending from the top of the arena
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub kind: EnemyKind,
    pub pattern: MovePattern,
    /// Per-frame chance of firing at the player
    pub shoot_chance: f64,
    /// Phase offset so same-pattern enemies don't move in lockstep
    pub phase: f32,
    /// Spawn column, the anchor for Orbit movement
    pub home_x: f32,
}

impl Enemy {
    /// Advance one frame of pattern movement. `frame` is the global counter.
    pub fn advance(&mut self, frame: u64) {
        let t = frame as f32;
        match self.pattern {
            MovePattern::Straight => self.pos.y += self.speed,
            MovePattern::Wiggle => {
                self.pos.y += self.speed;
                self.pos.x += (t * 0.05 + self.phase).sin() * 3.0;
            }
            MovePattern::Zigzag => {
                self.pos.y += self.speed;
                let dir = if (frame / 40) % 2 == 0 { 1.0 } else { -1.0 };
                self.pos.x += dir * 2.0;
            }
            MovePattern::Circle => {
                self.pos.y += self.speed * 0.6;
                self.pos.x += (t * 0.08 + self.phase).cos() * 4.0;
            }
            MovePattern::Orbit => {
                self.pos.y += self.speed * 0.4;
                self.pos.x = self.home_x + (t * 0.04 + self.phase).cos() * 60.0;
            }
        }
    }

    /// Bounding box as (min, max) corners
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.pos, self.pos + Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// A player-owned blaster or drone shot
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A homing missile. `target` is an enemy id, not a reference: the enemy may
/// die to an unrelated collision at any time, so it is re-resolved every frame.
#[derive(Debug, Clone, Copy)]
pub struct Missile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Option<u32>,
}

/// A shot fired by an enemy toward the player
#[derive(Debug, Clone, Copy)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    Rapid,
    Multiplier,
}

/// A falling pickup dropped by a killed enemy
#[derive(Debug, Clone, Copy)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub vel_y: f32,
}

impl PowerUp {
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.pos, self.pos + Vec2::splat(POWER_UP_SIZE))
    }
}

/// A tumbling asteroid
#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub vel_y: f32,
    pub hp: i32,
}

/// Color tag for particles; the renderer maps these to actual colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Ember,
    Crimson,
    Cyan,
    Gold,
}

/// A cosmetic explosion fragment. Never participates in gameplay collision.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every frame
    pub life: f32,
    pub tint: Tint,
}

/// The player ship and its upgrade flags
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// 1 = single, 2 = dual, 3 = triple
    pub blaster_level: u8,
    /// 0 = none, 1 or 2 missiles per volley
    pub missile_level: u8,
    pub has_drones: bool,
    pub has_laser: bool,
    /// Frames of beam remaining while the laser is active
    pub laser_frames: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(
                (ARENA_WIDTH - PLAYER_SIZE) / 2.0,
                ARENA_HEIGHT - PLAYER_SIZE * 2.0,
            ),
            blaster_level: 1,
            missile_level: 0,
            has_drones: false,
            has_laser: false,
            laser_frames: 0,
        }
    }

    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.pos, self.pos + Vec2::splat(PLAYER_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_SIZE / 2.0)
    }

    /// Move toward the input target with exponential smoothing, then clamp to
    /// the arena. Clamping also neutralizes out-of-range input coordinates.
    pub fn follow(&mut self, target: Vec2) {
        let goal = target - Vec2::splat(PLAYER_SIZE / 2.0);
        self.pos += (goal - self.pos) * PLAYER_FOLLOW_FACTOR;
        self.pos.x = self.pos.x.clamp(0.0, ARENA_WIDTH - PLAYER_SIZE);
        self.pos.y = self.pos.y.clamp(0.0, ARENA_HEIGHT - PLAYER_SIZE);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient event for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Upgrade / pickup / combo-milestone banner text (shown ~2s by the HUD)
    PowerUpMessage(String),
    /// Fired at most once per achievement id
    AchievementUnlocked(String),
}

/// Per-frame stats for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub score: u64,
    pub hp: u32,
    pub level: u32,
    pub kills: u32,
}

/// Final stats handed to the presentation layer for score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverResult {
    pub score: u64,
    pub level: u32,
    pub kills: u32,
    pub achievements: Vec<String>,
}

/// Complete session state, owned by the frame stepper
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Frames advanced so far (incremented at the top of each frame)
    pub frame: u64,
    /// The only randomness source in the simulation
    pub rng: Pcg32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub missiles: Vec<Missile>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub power_ups: Vec<PowerUp>,
    pub hazards: Vec<Hazard>,
    pub particles: Vec<Particle>,
    pub progression: Progression,
    /// Events staged during the frame, drained into the frame report
    pub events: Vec<GameEvent>,
    /// Set once hp reaches zero; further frames are no-ops
    pub over: bool,
    next_id: u32,
}

impl SimulationState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(),
            bullets: Vec::new(),
            missiles: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            hazards: Vec::new(),
            particles: Vec::new(),
            progression: Progression::new(),
            events: Vec::new(),
            over: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Look up a live enemy by id (missile target revalidation)
    pub fn enemy_by_id(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Burst of explosion particles at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, tint: Tint) {
        for _ in 0..EXPLOSION_PARTICLES {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vx: f32 = self.rng.random_range(-7.5..7.5);
            let vy: f32 = self.rng.random_range(-7.5..7.5);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(vx, vy),
                life: 1.0,
                tint,
            });
        }
    }
}
