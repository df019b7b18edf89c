//! Difficulty-driven spawn scheduling
//!
//! The spawner never fails; every call either produces an entity or `None`.
//! All randomness comes from the caller-supplied generator, so a fixed seed
//! yields a reproducible spawn sequence.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::state::{Enemy, EnemyKind, Hazard, MovePattern, PowerUp, PowerUpKind};

/// Frames between enemy spawns at a given level, floored at 10
pub fn spawn_interval(level: u32) -> u64 {
    (60_i64 - 3 * level as i64).max(10) as u64
}

/// Spawn an enemy if this frame is on the cadence for the current level.
///
/// The boss slot opens when `level % 5 == 0` and the frame falls in the first
/// `interval` frames of a 300-frame window. Spawn frames are multiples of the
/// interval, so every window contains exactly one eligible spawn frame and
/// each boss level is guaranteed at least one boss.
pub fn maybe_spawn_enemy(rng: &mut Pcg32, level: u32, frame: u64) -> Option<Enemy> {
    let interval = spawn_interval(level);
    if frame == 0 || !frame.is_multiple_of(interval) {
        return None;
    }

    let boss_slot = level.is_multiple_of(BOSS_LEVEL_INTERVAL) && frame % BOSS_GATE_FRAMES < interval;
    let kind = if boss_slot {
        log::info!("Boss spawn at level {level}, frame {frame}");
        EnemyKind::Boss
    } else {
        roll_kind(rng, level)
    };

    Some(build_enemy(rng, kind, level))
}

/// Weighted variant draw: fast 15%, tank 15%, shooter 15%, normal remainder.
/// Variants are locked until level > 2, shooters until level > 3.
fn roll_kind(rng: &mut Pcg32, level: u32) -> EnemyKind {
    if level <= 2 {
        return EnemyKind::Normal;
    }
    let roll: u32 = rng.random_range(0..100);
    match roll {
        0..15 => EnemyKind::Fast,
        15..30 => EnemyKind::Tank,
        30..45 if level > 3 => EnemyKind::Shooter,
        _ => EnemyKind::Normal,
    }
}

/// Per-kind stats: (hp, speed, shoot chance). Hp and speed scale with level.
fn kind_stats(kind: EnemyKind, level: u32) -> (i32, f32, f64) {
    let lvl = level as i32;
    let lf = level as f32;
    match kind {
        EnemyKind::Normal => (1 + lvl / 2, 2.0 + 0.5 * lf, 0.02),
        EnemyKind::Fast => (1 + lvl / 3, 4.0 + 0.5 * lf, 0.01),
        EnemyKind::Tank => (3 + lvl, 1.0 + 0.25 * lf, 0.015),
        EnemyKind::Shooter => (2 + lvl / 2, 2.0 + 0.3 * lf, 0.05),
        EnemyKind::Boss => (20 + 3 * lvl, 1.2, 0.08),
    }
}

fn build_enemy(rng: &mut Pcg32, kind: EnemyKind, level: u32) -> Enemy {
    let size = if kind == EnemyKind::Boss {
        ENEMY_SIZE * 2.0
    } else {
        ENEMY_SIZE
    };
    let (hp, speed, shoot_chance) = kind_stats(kind, level);
    let x = rng.random_range(0.0..(ARENA_WIDTH - size));
    let pattern = match kind {
        EnemyKind::Normal | EnemyKind::Boss => MovePattern::Wiggle,
        EnemyKind::Tank => MovePattern::Straight,
        EnemyKind::Fast => {
            if rng.random_bool(0.5) {
                MovePattern::Zigzag
            } else {
                MovePattern::Straight
            }
        }
        EnemyKind::Shooter => {
            if rng.random_bool(0.5) {
                MovePattern::Circle
            } else {
                MovePattern::Orbit
            }
        }
    };
    let phase = rng.random_range(0.0..std::f32::consts::TAU);

    Enemy {
        id: 0, // assigned by the state when pushed
        pos: Vec2::new(x, -size - 10.0),
        size,
        speed,
        hp,
        max_hp: hp,
        kind,
        pattern,
        shoot_chance,
        phase,
        home_x: x,
    }
}

/// Spawn an asteroid if the 120-frame window opens and the roll passes.
/// Hazards only appear once level exceeds the threshold.
pub fn maybe_spawn_hazard(rng: &mut Pcg32, level: u32, frame: u64) -> Option<Hazard> {
    if level <= HAZARD_MIN_LEVEL {
        return None;
    }
    if frame == 0 || !frame.is_multiple_of(HAZARD_WINDOW_FRAMES) {
        return None;
    }
    if !rng.random_bool(HAZARD_SPAWN_CHANCE) {
        return None;
    }

    let radius = rng.random_range(15.0..35.0);
    let x = rng.random_range(radius..(ARENA_WIDTH - radius));
    Some(Hazard {
        id: 0,
        pos: Vec2::new(x, -radius),
        radius,
        rotation: 0.0,
        rotation_speed: rng.random_range(-0.05..0.05),
        vel_y: 2.0,
        hp: HAZARD_HP,
    })
}

/// Roll the 10% drop on an enemy death; kind is uniform over the four buffs.
pub fn maybe_drop_power_up(rng: &mut Pcg32, pos: Vec2) -> Option<PowerUp> {
    if !rng.random_bool(POWER_UP_DROP_CHANCE) {
        return None;
    }
    let kind = match rng.random_range(0..4u32) {
        0 => PowerUpKind::Health,
        1 => PowerUpKind::Shield,
        2 => PowerUpKind::Rapid,
        _ => PowerUpKind::Multiplier,
    };
    log::debug!("Power-up drop: {kind:?} at {pos}");
    Some(PowerUp {
        pos,
        kind,
        vel_y: POWER_UP_FALL_SPEED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_interval_formula() {
        assert_eq!(spawn_interval(1), 57);
        assert_eq!(spawn_interval(10), 30);
        // Floor at 10 for high levels
        assert_eq!(spawn_interval(17), 10);
        assert_eq!(spawn_interval(50), 10);
    }

    #[test]
    fn test_no_spawn_off_cadence() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(maybe_spawn_enemy(&mut rng, 1, 56).is_none());
        assert!(maybe_spawn_enemy(&mut rng, 1, 58).is_none());
        assert!(maybe_spawn_enemy(&mut rng, 1, 0).is_none());
        assert!(maybe_spawn_enemy(&mut rng, 1, 57).is_some());
    }

    #[test]
    fn test_variants_locked_at_low_level() {
        let mut rng = Pcg32::seed_from_u64(99);
        for i in 1..=50 {
            let enemy = maybe_spawn_enemy(&mut rng, 1, 57 * i).unwrap();
            assert_eq!(enemy.kind, EnemyKind::Normal);
        }
    }

    #[test]
    fn test_boss_slot_at_gate() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Level 5: interval 45. Frame 315 is a spawn frame with 315 % 300 < 45.
        let boss = maybe_spawn_enemy(&mut rng, 5, 315).unwrap();
        assert_eq!(boss.kind, EnemyKind::Boss);
        assert_eq!(boss.hp, 20 + 3 * 5);
        assert_eq!(boss.size, ENEMY_SIZE * 2.0);

        // Frame 90 is on cadence but outside the gate window
        let other = maybe_spawn_enemy(&mut rng, 5, 90).unwrap();
        assert_ne!(other.kind, EnemyKind::Boss);
    }

    #[test]
    fn test_every_boss_level_has_a_slot() {
        for level in [5u32, 10, 15, 20, 25] {
            let interval = spawn_interval(level);
            let has_slot = (1..=BOSS_GATE_FRAMES)
                .filter(|f| f.is_multiple_of(interval))
                .any(|f| f % BOSS_GATE_FRAMES < interval);
            assert!(has_slot, "level {level} has no boss slot");
        }
    }

    #[test]
    fn test_variant_mix_at_high_level() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut fast = 0;
        let mut tank = 0;
        let mut shooter = 0;
        // Level 9 is not boss-eligible; all spawns are weighted draws
        for i in 1..=300 {
            let enemy = maybe_spawn_enemy(&mut rng, 9, 33 * i).unwrap();
            match enemy.kind {
                EnemyKind::Fast => fast += 1,
                EnemyKind::Tank => tank += 1,
                EnemyKind::Shooter => shooter += 1,
                _ => {}
            }
        }
        assert!(fast > 0 && tank > 0 && shooter > 0);
    }

    #[test]
    fn test_hazard_gating() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Level must exceed the threshold
        for i in 1..100 {
            assert!(maybe_spawn_hazard(&mut rng, 3, 120 * i).is_none());
        }
        // Off-window frames never spawn
        assert!(maybe_spawn_hazard(&mut rng, 5, 121).is_none());

        // On-window at level 5: roughly 40% over many windows
        let hits = (1..=200)
            .filter(|i| maybe_spawn_hazard(&mut rng, 5, 120 * i).is_some())
            .count();
        assert!((40..=120).contains(&hits), "hazard rate off: {hits}/200");
    }

    #[test]
    fn test_power_up_drop_rate() {
        let mut rng = Pcg32::seed_from_u64(5);
        let drops = (0..1000)
            .filter_map(|_| maybe_drop_power_up(&mut rng, Vec2::new(100.0, 100.0)))
            .count();
        assert!((50..=200).contains(&drops), "drop rate off: {drops}/1000");
    }

    #[test]
    fn test_spawn_sequence_reproducible() {
        let mut a = Pcg32::seed_from_u64(1234);
        let mut b = Pcg32::seed_from_u64(1234);
        for i in 1..=100 {
            let ea = maybe_spawn_enemy(&mut a, 6, 42 * i);
            let eb = maybe_spawn_enemy(&mut b, 6, 42 * i);
            match (ea, eb) {
                (Some(x), Some(y)) => {
                    assert_eq!(x.kind, y.kind);
                    assert_eq!(x.pos, y.pos);
                    assert_eq!(x.pattern, y.pattern);
                }
                (None, None) => {}
                _ => panic!("spawn divergence at {i}"),
            }
        }
    }
}
