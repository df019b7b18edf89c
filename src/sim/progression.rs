//! Score, level, combo, buff and achievement tracking
//!
//! A layered state machine over one mutable `Progression` owned by the
//! simulation. Score and level are monotonic; hp is clamped to
//! [0, PLAYER_MAX_HP]; each achievement id unlocks at most once.

use crate::consts::*;
use crate::sim::state::{EnemyKind, GameEvent, GameOverResult, Player, StatsSnapshot};

/// Achievement ids and HUD labels. Order here is unlock-check order.
const ACHIEVEMENTS: &[(&str, &str)] = &[
    ("first_blood", "First Blood"),
    ("exterminator", "Exterminator"),
    ("high_roller", "High Roller"),
    ("veteran", "Veteran"),
    ("chain_reaction", "Chain Reaction"),
    ("unstoppable", "Unstoppable"),
    ("boss_slayer", "Boss Slayer"),
    ("nemesis", "Nemesis"),
    ("untouchable", "Untouchable"),
];

/// Session-long progression state
#[derive(Debug, Clone)]
pub struct Progression {
    pub score: u64,
    pub level: u32,
    pub kills: u32,
    hp: u32,
    pub combo: u32,
    pub combo_timer: u32,
    pub score_multiplier: u64,
    pub multiplier_timer: u32,
    pub rapid_fire: bool,
    pub rapid_timer: u32,
    pub shield: bool,
    pub shield_timer: u32,
    pub max_combo: u32,
    pub bosses_killed: u32,
    pub total_damage_taken: u64,
    /// Unlocked achievement ids, in unlock order
    unlocked: Vec<&'static str>,
}

impl Progression {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            kills: 0,
            hp: PLAYER_MAX_HP,
            combo: 0,
            combo_timer: 0,
            score_multiplier: 1,
            multiplier_timer: 0,
            rapid_fire: false,
            rapid_timer: 0,
            shield: false,
            shield_timer: 0,
            max_combo: 0,
            bosses_killed: 0,
            total_damage_taken: 0,
            unlocked: Vec::new(),
        }
    }

    /// Current hull points, always within [0, PLAYER_MAX_HP]
    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Apply an unshielded hit: clamp hp, track cumulative damage, break the
    /// combo chain immediately.
    pub fn apply_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
        self.total_damage_taken += amount as u64;
        self.combo = 0;
        self.combo_timer = 0;
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = (self.hp + amount).min(PLAYER_MAX_HP);
    }

    /// Base score for a kill, before combo bonus and multiplier
    fn base_score(&self, kind: EnemyKind) -> u64 {
        match kind {
            EnemyKind::Boss => 500,
            EnemyKind::Tank => 100,
            EnemyKind::Fast => 75,
            EnemyKind::Shooter => 85,
            EnemyKind::Normal => 50 * self.level as u64,
        }
    }

    /// Credit a kill: extends the combo chain, applies the score formula and
    /// emits combo-milestone / boss-down banners.
    pub fn record_kill(&mut self, kind: EnemyKind, events: &mut Vec<GameEvent>) {
        self.kills += 1;
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW_FRAMES;
        self.max_combo = self.max_combo.max(self.combo);

        let combo_bonus = if self.combo > 3 {
            self.combo as u64 * 10
        } else {
            0
        };
        self.score += (self.base_score(kind) + combo_bonus) * self.score_multiplier;

        if kind == EnemyKind::Boss {
            self.bosses_killed += 1;
            events.push(GameEvent::PowerUpMessage("BOSS DOWN!".into()));
        }
        if self.combo >= 5 && self.combo.is_multiple_of(5) {
            events.push(GameEvent::PowerUpMessage(format!("COMBO x{}!", self.combo)));
        }
    }

    /// Flat score award with no kill or combo credit (hazards)
    pub fn award(&mut self, points: u64) {
        self.score += points;
    }

    /// Countdown the combo window and buff timers; clear flags at zero.
    /// Runs once per frame before the entity pools advance.
    pub fn tick_timers(&mut self) {
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo = 0;
            }
        }
        if self.multiplier_timer > 0 {
            self.multiplier_timer -= 1;
            if self.multiplier_timer == 0 {
                self.score_multiplier = 1;
            }
        }
        if self.rapid_timer > 0 {
            self.rapid_timer -= 1;
            if self.rapid_timer == 0 {
                self.rapid_fire = false;
            }
        }
        if self.shield_timer > 0 {
            self.shield_timer -= 1;
            if self.shield_timer == 0 {
                self.shield = false;
            }
        }
    }

    /// Level-up check. At most one level per frame even if the score jumped
    /// past several thresholds; unlocks key off the resulting level value.
    /// Reaching the threshold exactly counts.
    pub fn try_level_up(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) {
        if self.score < self.level as u64 * LEVEL_SCORE_STEP {
            return;
        }
        self.level += 1;
        log::info!("Level up: {} (score {})", self.level, self.score);

        let banner = match self.level {
            2 => {
                player.blaster_level = 2;
                Some("DOUBLE BLASTER!")
            }
            4 => {
                player.blaster_level = 3;
                Some("TRIPLE BLASTER!")
            }
            6 => {
                player.missile_level = 1;
                Some("MISSILES ONLINE!")
            }
            8 => {
                player.has_drones = true;
                Some("DRONES DEPLOYED!")
            }
            10 => {
                player.missile_level = 2;
                Some("MISSILES UPGRADED!")
            }
            12 => {
                player.has_laser = true;
                Some("LASER ARRAY!")
            }
            _ => None,
        };
        if let Some(text) = banner {
            events.push(GameEvent::PowerUpMessage(text.into()));
        }
    }

    /// Apply a collected power-up
    pub fn apply_power_up(
        &mut self,
        kind: crate::sim::state::PowerUpKind,
        events: &mut Vec<GameEvent>,
    ) {
        use crate::sim::state::PowerUpKind;
        let text = match kind {
            PowerUpKind::Health => {
                self.heal(HEALTH_PICKUP_AMOUNT);
                "HULL +25"
            }
            PowerUpKind::Shield => {
                self.shield = true;
                self.shield_timer = SHIELD_DURATION_FRAMES;
                "SHIELD UP!"
            }
            PowerUpKind::Rapid => {
                self.rapid_fire = true;
                self.rapid_timer = RAPID_DURATION_FRAMES;
                "RAPID FIRE!"
            }
            PowerUpKind::Multiplier => {
                self.score_multiplier = MULTIPLIER_VALUE;
                self.multiplier_timer = MULTIPLIER_DURATION_FRAMES;
                "SCORE x2!"
            }
        };
        events.push(GameEvent::PowerUpMessage(text.into()));
    }

    fn condition_met(&self, id: &str) -> bool {
        match id {
            "first_blood" => self.kills >= 1,
            "exterminator" => self.kills >= 100,
            "high_roller" => self.score >= 10_000,
            "veteran" => self.level >= 10,
            "chain_reaction" => self.max_combo >= 10,
            "unstoppable" => self.max_combo >= 25,
            "boss_slayer" => self.bosses_killed >= 1,
            "nemesis" => self.bosses_killed >= 5,
            // Zero damage for the entire session up to this point; no rolling
            // window.
            "untouchable" => self.total_damage_taken == 0 && self.score > 5000,
            _ => false,
        }
    }

    /// Evaluate all achievement conditions; each id unlocks at most once.
    pub fn check_achievements(&mut self, events: &mut Vec<GameEvent>) {
        for &(id, label) in ACHIEVEMENTS {
            if self.unlocked.contains(&id) {
                continue;
            }
            if self.condition_met(id) {
                self.unlocked.push(id);
                log::info!("Achievement unlocked: {label}");
                events.push(GameEvent::AchievementUnlocked(label.to_string()));
            }
        }
    }

    /// Labels of unlocked achievements, in unlock order
    pub fn achievement_labels(&self) -> Vec<String> {
        self.unlocked
            .iter()
            .filter_map(|id| {
                ACHIEVEMENTS
                    .iter()
                    .find(|(aid, _)| aid == id)
                    .map(|(_, label)| label.to_string())
            })
            .collect()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            score: self.score,
            hp: self.hp,
            level: self.level,
            kills: self.kills,
        }
    }

    pub fn final_result(&self) -> GameOverResult {
        GameOverResult {
            score: self.score,
            level: self.level,
            kills: self.kills,
            achievements: self.achievement_labels(),
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;

    #[test]
    fn test_hp_clamped() {
        let mut p = Progression::new();
        p.heal(50);
        assert_eq!(p.hp(), PLAYER_MAX_HP);
        p.apply_damage(10_000);
        assert_eq!(p.hp(), 0);
        assert!(p.is_dead());
    }

    #[test]
    fn test_first_kill_score_no_bonus() {
        let mut p = Progression::new();
        let mut events = Vec::new();
        p.record_kill(EnemyKind::Normal, &mut events);
        // Level 1, combo 1 (<= 3, no bonus): 50 * 1
        assert_eq!(p.score, 50);
        assert_eq!(p.kills, 1);
        assert_eq!(p.combo, 1);
        assert_eq!(p.combo_timer, COMBO_WINDOW_FRAMES);
    }

    #[test]
    fn test_combo_bonus_and_multiplier() {
        let mut p = Progression::new();
        let mut events = Vec::new();
        p.score_multiplier = 2;
        p.combo = 3;
        p.record_kill(EnemyKind::Tank, &mut events);
        // Combo becomes 4 -> bonus 40; (100 + 40) * 2
        assert_eq!(p.score, 280);
        assert_eq!(p.max_combo, 4);
    }

    #[test]
    fn test_combo_breaks_on_hit_and_on_expiry() {
        let mut p = Progression::new();
        let mut events = Vec::new();
        p.record_kill(EnemyKind::Normal, &mut events);
        assert_eq!(p.combo, 1);
        p.apply_damage(10);
        assert_eq!(p.combo, 0);
        assert_eq!(p.combo_timer, 0);

        p.record_kill(EnemyKind::Normal, &mut events);
        for _ in 0..COMBO_WINDOW_FRAMES {
            p.tick_timers();
        }
        assert_eq!(p.combo, 0);
    }

    #[test]
    fn test_level_up_one_step_per_frame() {
        let mut p = Progression::new();
        let mut player = Player::new();
        let mut events = Vec::new();

        // Jump far past several thresholds in one frame
        p.score = 5000;
        p.try_level_up(&mut player, &mut events);
        assert_eq!(p.level, 2);
        p.try_level_up(&mut player, &mut events);
        assert_eq!(p.level, 3);
    }

    #[test]
    fn test_level_two_unlocks_dual_blaster_once() {
        let mut p = Progression::new();
        let mut player = Player::new();
        let mut events = Vec::new();

        p.score = 999;
        p.try_level_up(&mut player, &mut events);
        assert_eq!(p.level, 1);

        // Reaching the threshold exactly levels up
        p.score = 1000;
        p.try_level_up(&mut player, &mut events);
        assert_eq!(p.level, 2);
        assert_eq!(player.blaster_level, 2);
        let banners: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpMessage(m) if m.contains("DOUBLE BLASTER")))
            .collect();
        assert_eq!(banners.len(), 1);

        // Re-check does not re-fire
        p.try_level_up(&mut player, &mut events);
        assert_eq!(p.level, 2);
    }

    #[test]
    fn test_buff_timers_independent() {
        let mut p = Progression::new();
        let mut events = Vec::new();
        p.apply_power_up(PowerUpKind::Shield, &mut events);
        p.apply_power_up(PowerUpKind::Rapid, &mut events);
        p.apply_power_up(PowerUpKind::Multiplier, &mut events);
        assert!(p.shield && p.rapid_fire);
        assert_eq!(p.score_multiplier, MULTIPLIER_VALUE);

        for _ in 0..SHIELD_DURATION_FRAMES {
            p.tick_timers();
        }
        assert!(!p.shield);
        assert!(p.rapid_fire, "rapid outlasts shield");

        for _ in 0..(RAPID_DURATION_FRAMES - SHIELD_DURATION_FRAMES) {
            p.tick_timers();
        }
        assert!(!p.rapid_fire);
        assert_eq!(p.score_multiplier, MULTIPLIER_VALUE, "multiplier still up");

        for _ in 0..(MULTIPLIER_DURATION_FRAMES - RAPID_DURATION_FRAMES) {
            p.tick_timers();
        }
        assert_eq!(p.score_multiplier, 1);
    }

    #[test]
    fn test_achievements_unlock_once() {
        let mut p = Progression::new();
        let mut events = Vec::new();
        p.kills = 1;
        p.check_achievements(&mut events);
        p.check_achievements(&mut events);
        let unlocks: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AchievementUnlocked(l) if l == "First Blood"))
            .collect();
        assert_eq!(unlocks.len(), 1);
        assert_eq!(p.achievement_labels(), vec!["First Blood".to_string()]);
    }

    #[test]
    fn test_untouchable_requires_zero_cumulative_damage() {
        let mut events = Vec::new();

        let mut clean = Progression::new();
        clean.score = 5001;
        clean.check_achievements(&mut events);
        assert!(clean.achievement_labels().contains(&"Untouchable".to_string()));

        let mut scratched = Progression::new();
        scratched.score = 5001;
        scratched.apply_damage(1);
        scratched.heal(1);
        scratched.check_achievements(&mut events);
        assert!(!scratched.achievement_labels().contains(&"Untouchable".to_string()));
    }
}
