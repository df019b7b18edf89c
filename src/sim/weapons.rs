//! Weapon system: blaster tiers, drones, homing missiles and the laser
//!
//! Translates the continuous fire input plus the player's upgrade flags into
//! new projectiles on fixed frame cadences. Missile targets are enemy ids
//! revalidated every frame; a dead target is silently dropped and the missile
//! reacquires the nearest live enemy.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::state::{Bullet, Missile, SimulationState};

/// Emit blaster/drone shots, missiles and the laser activation roll for this
/// frame. Runs only while the fire input is held.
pub fn fire_weapons(state: &mut SimulationState, firing: bool) {
    if !firing {
        return;
    }

    let cadence = if state.progression.rapid_fire {
        RAPID_CADENCE_FRAMES
    } else {
        BLASTER_CADENCE_FRAMES
    };

    if state.frame.is_multiple_of(cadence) {
        fire_blaster(state);
        if state.player.has_drones {
            fire_drones(state);
        }
    }

    if state.player.missile_level > 0 && state.frame.is_multiple_of(MISSILE_CADENCE_FRAMES) {
        fire_missiles(state);
    }

    // The laser array is temperamental: a small per-frame chance to spin up,
    // then a fixed-length beam.
    if state.player.has_laser
        && state.player.laser_frames == 0
        && state.rng.random_bool(LASER_ACTIVATION_CHANCE)
    {
        state.player.laser_frames = LASER_DURATION_FRAMES;
        log::debug!("Laser active at frame {}", state.frame);
    }
}

/// Tiered blaster volley. Offsets are relative to the player's top-left corner.
fn fire_blaster(state: &mut SimulationState) {
    let p = state.player.pos;
    match state.player.blaster_level {
        1 => {
            state.bullets.push(bullet(p + Vec2::new(22.0, 0.0), 0.0, -BULLET_SPEED));
        }
        2 => {
            state.bullets.push(bullet(p + Vec2::new(5.0, 10.0), -1.0, -BULLET_SPEED));
            state.bullets.push(bullet(p + Vec2::new(40.0, 10.0), 1.0, -BULLET_SPEED));
        }
        _ => {
            state.bullets.push(bullet(p + Vec2::new(22.0, 0.0), 0.0, -BULLET_SPEED));
            state.bullets.push(bullet(p + Vec2::new(0.0, 10.0), -2.0, -16.0));
            state.bullets.push(bullet(p + Vec2::new(45.0, 10.0), 2.0, -16.0));
        }
    }
}

/// Two parallel side shots flanking the ship
fn fire_drones(state: &mut SimulationState) {
    let p = state.player.pos;
    state.bullets.push(bullet(p + Vec2::new(-15.0, 20.0), 0.0, -BULLET_SPEED));
    state
        .bullets
        .push(bullet(p + Vec2::new(PLAYER_SIZE + 15.0, 20.0), 0.0, -BULLET_SPEED));
}

fn bullet(pos: Vec2, vx: f32, vy: f32) -> Bullet {
    Bullet {
        pos,
        vel: Vec2::new(vx, vy),
    }
}

/// One or two missiles per volley depending on the missile tier. They launch
/// with no target and acquire one on the next steering pass.
fn fire_missiles(state: &mut SimulationState) {
    let center = state.player.center();
    let count = state.player.missile_level.min(2);
    for i in 0..count {
        let kick = if count == 1 {
            0.0
        } else if i == 0 {
            -1.0
        } else {
            1.0
        };
        state.missiles.push(Missile {
            pos: center,
            vel: Vec2::new(kick, -5.0),
            target: None,
        });
    }
}

/// Steer, move and cull all missiles for this frame.
///
/// Targets are revalidated against the live enemy pool before use: the
/// referenced enemy may have died to an unrelated collision. Acquisition picks
/// the nearest on-screen enemy (`y > 0`) by Euclidean distance.
pub fn advance_missiles(state: &mut SimulationState) {
    let candidates: Vec<(u32, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| e.pos.y > 0.0)
        .map(|e| (e.id, e.center()))
        .collect();

    for missile in &mut state.missiles {
        let tracked = missile.target.and_then(|id| {
            candidates
                .iter()
                .find(|(eid, _)| *eid == id)
                .map(|(_, pos)| *pos)
        });

        let target_pos = match tracked {
            Some(pos) => Some(pos),
            None => {
                let nearest = candidates.iter().min_by(|a, b| {
                    let da = (a.1 - missile.pos).length_squared();
                    let db = (b.1 - missile.pos).length_squared();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                });
                missile.target = nearest.map(|(id, _)| *id);
                nearest.map(|(_, pos)| *pos)
            }
        };

        if let Some(pos) = target_pos {
            let dir = (pos - missile.pos).normalize_or_zero();
            missile.vel += dir * MISSILE_STEER_ACCEL;
        }
        if missile.vel.length() > MISSILE_MAX_SPEED {
            missile.vel = missile.vel.normalize() * MISSILE_MAX_SPEED;
        }
        missile.pos += missile.vel;
    }

    state.missiles.retain(|m| {
        m.pos.x > -OFFSCREEN_MARGIN
            && m.pos.x < ARENA_WIDTH + OFFSCREEN_MARGIN
            && m.pos.y > -OFFSCREEN_MARGIN
            && m.pos.y < ARENA_HEIGHT + OFFSCREEN_MARGIN
    });
}

/// Beam column extents at the player's center
pub fn laser_column(player: &crate::sim::state::Player) -> (f32, f32) {
    let cx = player.center().x;
    (cx - LASER_HALF_WIDTH, cx + LASER_HALF_WIDTH)
}

/// Continuous beam damage: every enemy above the ship whose box overlaps the
/// column takes fixed damage this frame. Deaths are resolved by the caller's
/// compaction pass.
pub fn apply_laser(state: &mut SimulationState) {
    if state.player.laser_frames == 0 {
        return;
    }
    state.player.laser_frames -= 1;

    let (min_x, max_x) = laser_column(&state.player);
    let beam_bottom = state.player.pos.y;
    for enemy in &mut state.enemies {
        let (lo, hi) = enemy.rect();
        if hi.x > min_x && lo.x < max_x && lo.y < beam_bottom {
            enemy.hp -= LASER_DAMAGE_PER_FRAME;
        }
    }
}
