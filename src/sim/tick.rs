//! Per-frame simulation step
//!
//! `advance_frame` is the single entry point the host calls once per rendered
//! frame. The order of stages is fixed and load-bearing: later stages read
//! state mutated by earlier ones. Pool removals always go through a
//! rebuild-survivors or retain pass so that a removal never skips or
//! double-processes a neighbor, and an enemy death is accounted exactly once
//! even when several projectiles connect in the same frame.

use glam::Vec2;

use crate::consts::*;
use crate::sim::collision::{aabb_overlap, circle_rect_overlap, point_in_rect};
use crate::sim::spawner;
use crate::sim::state::{
    EnemyBullet, EnemyKind, GameEvent, GameOverResult, SimulationState, StatsSnapshot, Tint,
};
use crate::sim::weapons;
use rand::Rng;

/// Aggregated input signals for one frame, produced by the input collaborator
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Point the ship steers toward (out-of-range values are harmless; the
    /// ship clamps to the arena)
    pub move_target: Vec2,
    pub firing: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            move_target: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - PLAYER_SIZE * 2.0),
            firing: false,
        }
    }
}

/// Everything the host needs out of one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub snapshot: StatsSnapshot,
    /// Transient events staged this frame, in emission order
    pub events: Vec<GameEvent>,
    /// Present exactly when the session ended; the host stops scheduling
    pub game_over: Option<GameOverResult>,
}

/// Advance the simulation by one frame
pub fn advance_frame(state: &mut SimulationState, input: &FrameInput) -> FrameReport {
    if state.over {
        // Session already ended; no further state changes
        return FrameReport {
            snapshot: state.progression.snapshot(),
            events: Vec::new(),
            game_over: Some(state.progression.final_result()),
        };
    }

    state.frame += 1;

    // 1. Player movement (smooth follow, clamped to arena)
    state.player.follow(input.move_target);

    // 2. Weapons
    weapons::fire_weapons(state, input.firing);

    // 3. Level-up thresholds and unlock side effects
    state
        .progression
        .try_level_up(&mut state.player, &mut state.events);

    // 4. Spawner
    let level = state.progression.level;
    let frame = state.frame;
    if let Some(mut enemy) = spawner::maybe_spawn_enemy(&mut state.rng, level, frame) {
        enemy.id = state.next_entity_id();
        state.enemies.push(enemy);
    }
    if let Some(mut hazard) = spawner::maybe_spawn_hazard(&mut state.rng, level, frame) {
        hazard.id = state.next_entity_id();
        state.hazards.push(hazard);
    }

    // 5. Buff and combo countdowns
    state.progression.tick_timers();

    // 6. Advance and collide every pool, fixed order
    advance_player_bullets(state);
    weapons::advance_missiles(state);
    advance_enemies(state);
    collide_projectiles_with_enemies(state);
    resolve_enemy_deaths(state);
    collide_enemies_with_player(state);
    advance_enemy_bullets(state);
    advance_power_ups(state);
    advance_hazards(state);
    advance_particles(state);

    // 7. Laser continuous damage
    weapons::apply_laser(state);
    resolve_enemy_deaths(state);

    // 8. Achievements
    state.progression.check_achievements(&mut state.events);

    // 9/10. Snapshot and terminal decision
    let snapshot = state.progression.snapshot();
    let events = std::mem::take(&mut state.events);
    let game_over = if state.progression.is_dead() {
        state.over = true;
        let result = state.progression.final_result();
        log::info!(
            "Game over at frame {}: score {}, level {}, kills {}",
            state.frame,
            result.score,
            result.level,
            result.kills
        );
        Some(result)
    } else {
        None
    };

    FrameReport {
        snapshot,
        events,
        game_over,
    }
}

fn advance_player_bullets(state: &mut SimulationState) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(|b| {
        b.pos.y > -OFFSCREEN_MARGIN
            && b.pos.x > -OFFSCREEN_MARGIN
            && b.pos.x < ARENA_WIDTH + OFFSCREEN_MARGIN
    });
}

/// Pattern movement plus return fire. Enemies hold their fire until the
/// player reaches level 2.
fn advance_enemies(state: &mut SimulationState) {
    let frame = state.frame;
    let player_center = state.player.center();
    let can_shoot = state.progression.level >= ENEMY_SHOOT_MIN_LEVEL;

    for enemy in &mut state.enemies {
        enemy.advance(frame);

        if can_shoot && state.rng.random_bool(enemy.shoot_chance) {
            let origin = enemy.center();
            state.enemy_bullets.push(EnemyBullet {
                pos: origin,
                vel: Vec2::new((player_center.x - origin.x) * 0.015, 7.0),
            });
        }
    }
}

/// Bullets and missiles against the enemy pool. A projectile is consumed by
/// the first enemy it overlaps; damage lands immediately but removal is
/// deferred to the death-resolution pass.
fn collide_projectiles_with_enemies(state: &mut SimulationState) {
    let mut impacts: Vec<Vec2> = Vec::new();

    let bullets = std::mem::take(&mut state.bullets);
    let mut surviving = Vec::with_capacity(bullets.len());
    for bullet in bullets {
        let mut consumed = false;
        for enemy in &mut state.enemies {
            if enemy.hp > 0 && point_in_rect(bullet.pos, enemy.rect()) {
                enemy.hp -= BULLET_DAMAGE;
                impacts.push(bullet.pos);
                consumed = true;
                break;
            }
        }
        if !consumed {
            surviving.push(bullet);
        }
    }
    state.bullets = surviving;

    let missiles = std::mem::take(&mut state.missiles);
    let mut surviving = Vec::with_capacity(missiles.len());
    for missile in missiles {
        let mut consumed = false;
        for enemy in &mut state.enemies {
            if enemy.hp > 0 && point_in_rect(missile.pos, enemy.rect()) {
                enemy.hp -= MISSILE_DAMAGE;
                impacts.push(missile.pos);
                consumed = true;
                break;
            }
        }
        if !consumed {
            surviving.push(missile);
        }
    }
    state.missiles = surviving;

    for pos in impacts {
        state.spawn_explosion(pos, Tint::Ember);
    }
}

/// Compact the enemy pool, crediting each death exactly once. Also rolls the
/// power-up drop per kill.
fn resolve_enemy_deaths(state: &mut SimulationState) {
    if state.enemies.iter().all(|e| e.hp > 0) {
        return;
    }

    let enemies = std::mem::take(&mut state.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());
    let mut deaths: Vec<(EnemyKind, Vec2)> = Vec::new();
    for enemy in enemies {
        if enemy.hp <= 0 {
            deaths.push((enemy.kind, enemy.center()));
        } else {
            survivors.push(enemy);
        }
    }
    state.enemies = survivors;

    for (kind, pos) in deaths {
        state.progression.record_kill(kind, &mut state.events);
        let tint = if kind == EnemyKind::Boss {
            Tint::Gold
        } else {
            Tint::Ember
        };
        state.spawn_explosion(pos, tint);
        if let Some(power_up) = spawner::maybe_drop_power_up(&mut state.rng, pos) {
            state.power_ups.push(power_up);
        }
    }
}

/// Ramming enemies are removed either way; the shield absorbs the damage and
/// preserves the combo chain.
fn collide_enemies_with_player(state: &mut SimulationState) {
    let player_rect = state.player.rect();
    let shielded = state.progression.shield;

    let enemies = std::mem::take(&mut state.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());
    let mut rams: Vec<Vec2> = Vec::new();
    for enemy in enemies {
        if aabb_overlap(enemy.rect(), player_rect) {
            rams.push(enemy.center());
        } else if enemy.pos.y < ARENA_HEIGHT + OFFSCREEN_MARGIN {
            survivors.push(enemy);
        }
        // Off the bottom: gone without ceremony
    }
    state.enemies = survivors;

    for pos in rams {
        state.spawn_explosion(pos, Tint::Crimson);
        if !shielded {
            state.progression.apply_damage(ENEMY_COLLISION_DAMAGE);
        }
    }
}

fn advance_enemy_bullets(state: &mut SimulationState) {
    let player_rect = state.player.rect();
    let player_center = state.player.center();
    let shielded = state.progression.shield;

    let bullets = std::mem::take(&mut state.enemy_bullets);
    let mut surviving = Vec::with_capacity(bullets.len());
    let mut hits = 0u32;
    for mut bullet in bullets {
        bullet.pos += bullet.vel;
        if point_in_rect(bullet.pos, player_rect) {
            hits += 1; // consumed even when shielded
        } else if bullet.pos.y < ARENA_HEIGHT + OFFSCREEN_MARGIN {
            surviving.push(bullet);
        }
    }
    state.enemy_bullets = surviving;

    if hits > 0 {
        state.spawn_explosion(player_center, Tint::Crimson);
        if !shielded {
            for _ in 0..hits {
                state.progression.apply_damage(ENEMY_BULLET_DAMAGE);
            }
        }
    }
}

fn advance_power_ups(state: &mut SimulationState) {
    let player_rect = state.player.rect();

    let power_ups = std::mem::take(&mut state.power_ups);
    let mut surviving = Vec::with_capacity(power_ups.len());
    let mut collected = Vec::new();
    for mut power_up in power_ups {
        power_up.pos.y += power_up.vel_y;
        if aabb_overlap(power_up.rect(), player_rect) {
            collected.push((power_up.kind, power_up.pos));
        } else if power_up.pos.y < ARENA_HEIGHT + OFFSCREEN_MARGIN {
            surviving.push(power_up);
        }
    }
    state.power_ups = surviving;

    for (kind, pos) in collected {
        state.progression.apply_power_up(kind, &mut state.events);
        state.spawn_explosion(pos, Tint::Cyan);
    }
}

/// Asteroids tumble down, soak bullets and smash into the ship
fn advance_hazards(state: &mut SimulationState) {
    for hazard in &mut state.hazards {
        hazard.pos.y += hazard.vel_y;
        hazard.rotation += hazard.rotation_speed;
    }

    // Player bullets chip away at hazards
    let bullets = std::mem::take(&mut state.bullets);
    let mut surviving = Vec::with_capacity(bullets.len());
    for bullet in bullets {
        let mut consumed = false;
        for hazard in &mut state.hazards {
            if hazard.hp > 0 && (bullet.pos - hazard.pos).length() < hazard.radius {
                hazard.hp -= BULLET_DAMAGE;
                consumed = true;
                break;
            }
        }
        if !consumed {
            surviving.push(bullet);
        }
    }
    state.bullets = surviving;

    let player_rect = state.player.rect();
    let shielded = state.progression.shield;

    let hazards = std::mem::take(&mut state.hazards);
    let mut survivors = Vec::with_capacity(hazards.len());
    let mut broken: Vec<Vec2> = Vec::new();
    let mut rams: Vec<Vec2> = Vec::new();
    for hazard in hazards {
        if hazard.hp <= 0 {
            broken.push(hazard.pos);
        } else if circle_rect_overlap(hazard.pos, hazard.radius, player_rect) {
            rams.push(hazard.pos);
        } else if hazard.pos.y - hazard.radius < ARENA_HEIGHT + OFFSCREEN_MARGIN {
            survivors.push(hazard);
        }
    }
    state.hazards = survivors;

    for pos in broken {
        state.progression.award(HAZARD_SCORE);
        state.spawn_explosion(pos, Tint::Ember);
    }
    for pos in rams {
        state.spawn_explosion(pos, Tint::Crimson);
        if !shielded {
            state.progression.apply_damage(HAZARD_DAMAGE);
        }
    }
}

fn advance_particles(state: &mut SimulationState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Arbitrary (including wildly out-of-range) inputs never break the
        /// hp clamp, the arena clamp or score monotonicity.
        #[test]
        fn frame_invariants_hold(
            seed in any::<u64>(),
            targets in proptest::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 200),
        ) {
            let mut state = SimulationState::new(seed);
            let mut last_score = 0u64;

            for (i, (tx, ty)) in targets.into_iter().enumerate() {
                let input = FrameInput {
                    move_target: Vec2::new(tx, ty),
                    firing: i % 3 != 0,
                };
                let report = advance_frame(&mut state, &input);

                prop_assert!(report.snapshot.hp <= crate::consts::PLAYER_MAX_HP);
                prop_assert!(report.snapshot.score >= last_score);
                last_score = report.snapshot.score;

                let p = state.player.pos;
                prop_assert!(p.x >= 0.0 && p.x <= crate::consts::ARENA_WIDTH - crate::consts::PLAYER_SIZE);
                prop_assert!(p.y >= 0.0 && p.y <= crate::consts::ARENA_HEIGHT - crate::consts::PLAYER_SIZE);

                if report.game_over.is_some() {
                    break;
                }
            }
        }
    }
}
