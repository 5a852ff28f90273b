use glam::Vec2;
use kq_core::time::Countdown;
use serde::Deserialize;

use crate::collision::Rect;
use crate::event::GameEvent;
use crate::player::Player;

pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 60.0;
pub const PATROL_SPEED: f32 = 2.0;
pub const DEFAULT_PATROL_RANGE: f32 = 200.0;
/// Coins awarded for the killing blow.
pub const KILL_BONUS: u32 = 10;
/// Damage dealt to the player per tick of contact.
pub const CONTACT_DAMAGE: u32 = 1;
const HIT_FLASH_TICKS: u32 = 10;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Knight,
    Skeleton,
}

impl EnemyKind {
    pub fn max_health(self) -> u32 {
        match self {
            Self::Knight => 3,
            Self::Skeleton => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Knight => "knight",
            Self::Skeleton => "skeleton",
        }
    }
}

impl std::fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A patrolling foe. Walks back and forth around its spawn point and hurts
/// the player on contact. Death is permanent for the room object: a dead
/// enemy stays in the room's list but never updates or draws again.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    /// +1 walks right, -1 walks left.
    pub direction: f32,
    pub anchor_x: f32,
    pub patrol_range: f32,
    pub speed: f32,
    pub dead: bool,
    pub hit_flash: Countdown,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            health: kind.max_health(),
            direction: 1.0,
            anchor_x: x,
            patrol_range: DEFAULT_PATROL_RANGE,
            speed: PATROL_SPEED,
            dead: false,
            hit_flash: Countdown::default(),
        }
    }

    pub fn with_patrol_range(mut self, range: f32) -> Self {
        self.patrol_range = range;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.kind.max_health() as f32
    }

    pub fn update(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) {
        if self.dead {
            return;
        }
        self.hit_flash.tick();

        self.pos.x += self.speed * self.direction;
        let offset = self.pos.x - self.anchor_x;
        if offset < -self.patrol_range || offset > self.patrol_range {
            self.direction = -self.direction;
        }

        if !player.is_invincible() && self.rect().overlaps(&player.rect()) {
            player.take_damage(CONTACT_DAMAGE, events);
        }
    }

    /// Apply a hit. Returns the coin bonus on the killing blow only; hits on
    /// an already dead enemy do nothing.
    pub fn take_damage(&mut self, amount: u32) -> Option<u32> {
        if self.dead {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        self.hit_flash.start(HIT_FLASH_TICKS);
        if self.health == 0 {
            self.dead = true;
            Some(KILL_BONUS)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhysicsConfig, PlayerConfig};

    fn far_away_player() -> Player {
        let mut player = Player::new(PlayerConfig::default(), PhysicsConfig::default());
        player.pos = Vec2::new(1000.0, 100.0);
        player
    }

    #[test]
    fn patrol_reverses_past_range() {
        let mut enemy = Enemy::new(EnemyKind::Knight, 300.0, 400.0).with_patrol_range(10.0);
        let mut player = far_away_player();
        let mut events = Vec::new();
        for _ in 0..6 {
            enemy.update(&mut player, &mut events);
        }
        // 6 steps of 2px puts it 12px out, past the 10px range.
        assert_eq!(enemy.pos.x, 312.0);
        assert_eq!(enemy.direction, -1.0);
        enemy.update(&mut player, &mut events);
        assert_eq!(enemy.pos.x, 310.0);
    }

    #[test]
    fn contact_damages_player_once_per_invincibility_window() {
        let mut enemy = Enemy::new(EnemyKind::Knight, 100.0, 100.0);
        let mut player = Player::new(PlayerConfig::default(), PhysicsConfig::default());
        player.pos = Vec2::new(110.0, 100.0);
        let mut events = Vec::new();

        enemy.update(&mut player, &mut events);
        assert_eq!(player.health, 4);
        assert!(player.is_invincible());

        enemy.update(&mut player, &mut events);
        assert_eq!(player.health, 4);
    }

    #[test]
    fn knight_dies_on_third_hit_and_awards_bonus_once() {
        let mut enemy = Enemy::new(EnemyKind::Knight, 0.0, 0.0);
        assert_eq!(enemy.take_damage(1), None);
        assert_eq!(enemy.take_damage(1), None);
        assert_eq!(enemy.take_damage(1), Some(KILL_BONUS));
        assert!(enemy.dead);
        assert_eq!(enemy.take_damage(1), None);
        assert_eq!(enemy.take_damage(5), None);
        assert!(enemy.dead);
    }

    #[test]
    fn skeleton_has_less_health() {
        let mut enemy = Enemy::new(EnemyKind::Skeleton, 0.0, 0.0);
        assert_eq!(enemy.health_fraction(), 1.0);
        assert_eq!(enemy.take_damage(1), None);
        assert!((enemy.health_fraction() - 0.5).abs() < f32::EPSILON);
        assert_eq!(enemy.take_damage(1), Some(KILL_BONUS));
    }

    #[test]
    fn dead_enemy_is_inert() {
        let mut enemy = Enemy::new(EnemyKind::Skeleton, 100.0, 100.0);
        enemy.dead = true;
        let mut player = Player::new(PlayerConfig::default(), PhysicsConfig::default());
        player.pos = Vec2::new(100.0, 100.0);
        let mut events = Vec::new();

        enemy.update(&mut player, &mut events);
        assert_eq!(enemy.pos.x, 100.0);
        assert_eq!(player.health, player.max_health);
        assert!(events.is_empty());
    }

    #[test]
    fn hit_starts_flash() {
        let mut enemy = Enemy::new(EnemyKind::Knight, 0.0, 0.0);
        enemy.take_damage(1);
        assert!(enemy.hit_flash.is_active());
    }
}
