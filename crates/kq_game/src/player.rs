//! The knight: movement, combat and the action-state machine.
//!
//! Each tick is handled by the first matching branch, top-down:
//!
//!   1. **Dying** -- count down the death window, then ask for a respawn.
//!   2. **PickingUp** -- count down the pickup pose; no physics.
//!   3. **Dashing** -- hold still until the dash window runs out; no
//!      gravity, no input, no movement.
//!   4. **Normal** -- attack progress, horizontal control, jump / attack /
//!      dash triggers, gravity, integration and contact resolution.
//!
//! Invincible and Hurt are overlay timers that tick inside branches 3 and 4
//! regardless of which action is playing.

use glam::Vec2;
use kq_core::animation::{AnimationId, AnimationState, AttackVariant};
use kq_core::input::{InputState, Key};
use kq_core::time::Countdown;
use rand::Rng;

use crate::collision::{resolve_contacts, Bounds, Rect};
use crate::config::{PhysicsConfig, PlayerConfig};
use crate::event::GameEvent;
use crate::room::Room;
use crate::session::FrameContext;

/// Ticks between flicker phases while invincible.
const FLICKER_PERIOD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStep {
    Continue,
    /// The death window ran out; the session must reset.
    Respawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attack {
    pub variant: AttackVariant,
    /// Ticks since the swing started.
    pub frame: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub facing_right: bool,
    pub on_ground: bool,
    pub air_jumps: u32,
    pub attack: Option<Attack>,
    pub defending: bool,
    pub dashing: Countdown,
    pub invincible: Countdown,
    pub hurt: Countdown,
    pub picking_up: Countdown,
    pub dying: Countdown,
    pub animation: AnimationState,
    pub config: PlayerConfig,
    pub physics: PhysicsConfig,
}

impl Player {
    pub fn new(config: PlayerConfig, physics: PhysicsConfig) -> Self {
        Self {
            pos: Vec2::new(config.spawn_x, config.spawn_y),
            vel: Vec2::ZERO,
            size: Vec2::new(config.width, config.height),
            health: config.max_health,
            max_health: config.max_health,
            facing_right: true,
            on_ground: false,
            air_jumps: 0,
            attack: None,
            defending: false,
            dashing: Countdown::default(),
            invincible: Countdown::default(),
            hurt: Countdown::default(),
            picking_up: Countdown::default(),
            dying: Countdown::default(),
            animation: AnimationState::new(AnimationId::Idle),
            config,
            physics,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_dying(&self) -> bool {
        self.dying.is_active()
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible.is_active()
    }

    /// Drawn at reduced opacity on alternating phases of the invincibility window.
    pub fn is_flickering(&self) -> bool {
        self.invincible.is_active() && (self.invincible.remaining() / FLICKER_PERIOD) % 2 == 0
    }

    pub fn update(
        &mut self,
        input: &InputState,
        room: &mut Room,
        ctx: &mut FrameContext<'_>,
    ) -> PlayerStep {
        if self.dying.is_active() {
            if self.dying.tick() {
                return PlayerStep::Respawn;
            }
            self.refresh_animation();
            return PlayerStep::Continue;
        }

        if self.picking_up.is_active() {
            self.picking_up.tick();
            self.refresh_animation();
            return PlayerStep::Continue;
        }

        self.invincible.tick();
        self.hurt.tick();
        self.defending = input.is_held(Key::Defend) && self.on_ground;

        if self.dashing.is_active() {
            if self.dashing.tick() {
                self.vel.x = 0.0;
            }
            self.refresh_animation();
            return PlayerStep::Continue;
        }

        if let Some(attack) = &mut self.attack {
            attack.frame += 1;
            let swing_ticks =
                attack.variant.animation().frame_count() as u32 * self.config.frame_delay;
            if attack.frame >= swing_ticks {
                self.attack = None;
            }
            self.vel.x *= self.physics.attack_damping;
        }

        if self.attack.is_none() && !self.defending {
            self.steer(input);
        } else if self.defending {
            self.vel.x *= self.physics.defend_friction;
        }

        if input.is_just_pressed(Key::Up) {
            self.jump(ctx.progress.abilities.double_jump);
        }

        if input.is_just_pressed(Key::Attack) && self.attack.is_none() {
            let variant = random_variant(ctx.rng);
            self.attack = Some(Attack { variant, frame: 0 });
            self.strike(room, ctx);
        }

        if input.is_just_pressed(Key::Dash) && ctx.progress.abilities.dash {
            self.dashing.start(self.physics.dash_duration);
            self.vel.x = if self.facing_right {
                self.physics.dash_speed
            } else {
                -self.physics.dash_speed
            };
            self.vel.y = 0.0;
        }

        self.vel.y += self.physics.gravity;
        self.pos += self.vel;
        self.resolve_contacts(
            &room.platforms,
            ctx.bounds,
            ctx.progress.abilities.double_jump,
        );
        self.refresh_animation();
        PlayerStep::Continue
    }

    fn steer(&mut self, input: &InputState) {
        let speed = if input.is_held(Key::Run) {
            self.physics.run_speed
        } else {
            self.physics.walk_speed
        };

        if input.is_held(Key::Left) {
            self.vel.x = -speed;
            self.facing_right = false;
        } else if input.is_held(Key::Right) {
            self.vel.x = speed;
            self.facing_right = true;
        } else {
            self.vel.x *= self.physics.ground_friction;
            if self.vel.x.abs() < self.physics.stop_threshold {
                self.vel.x = 0.0;
            }
        }
    }

    fn jump(&mut self, double_jump: bool) {
        if self.on_ground {
            self.vel.y = self.physics.jump_power;
            self.air_jumps = u32::from(double_jump);
        } else if self.air_jumps > 0 {
            self.vel.y = self.physics.jump_power;
            self.air_jumps -= 1;
        }
    }

    /// Reach of a swing: a box in front of the leading edge, as tall as the player.
    pub fn attack_reach(&self) -> Rect {
        let range = self.config.attack_range;
        let x = if self.facing_right {
            self.pos.x + self.size.x
        } else {
            self.pos.x - range
        };
        Rect::new(x, self.pos.y, range, self.size.y)
    }

    /// One-shot hit test at the start of a swing.
    fn strike(&self, room: &mut Room, ctx: &mut FrameContext<'_>) {
        let reach = self.attack_reach();
        for enemy in room.enemies.iter_mut().filter(|e| !e.dead) {
            if !enemy.rect().overlaps(&reach) {
                continue;
            }
            if let Some(bonus) = enemy.take_damage(1) {
                ctx.progress.coins += bonus;
                log::debug!("{} slain in '{}' (+{bonus} coins)", enemy.kind, room.id);
                ctx.events.push(GameEvent::EnemyKilled {
                    kind: enemy.kind,
                    bonus,
                });
            } else {
                log::debug!("{} hit, {} health left", enemy.kind, enemy.health);
            }
        }
    }

    fn resolve_contacts(&mut self, platforms: &[Rect], bounds: Bounds, double_jump: bool) {
        let result = resolve_contacts(
            self.pos,
            self.vel,
            self.size,
            platforms,
            bounds,
            self.physics.landing_tolerance,
        );
        self.pos = result.position;
        self.vel = result.velocity;
        self.on_ground = result.contacts.grounded();
        // Landing refills one more jump than a ground take-off grants, so a
        // body that walks off a ledge keeps an air jump.
        if self.on_ground {
            self.air_jumps = if double_jump { 2 } else { 1 };
        }
    }

    pub fn take_damage(&mut self, amount: u32, events: &mut Vec<GameEvent>) -> bool {
        if self.invincible.is_active() || self.dying.is_active() {
            return false;
        }

        let blocked = self.defending;
        let amount = if blocked { amount.div_ceil(2) } else { amount };
        if blocked {
            events.push(GameEvent::Notice("Blocked!".to_string()));
        }

        self.health = self.health.saturating_sub(amount);
        self.invincible.start(self.config.invincible_ticks);
        self.hurt.start(self.config.hurt_ticks);
        events.push(GameEvent::PlayerDamaged {
            amount,
            health: self.health,
            blocked,
        });
        log::debug!(
            "Player took {amount} damage ({}/{})",
            self.health,
            self.max_health
        );

        if self.health == 0 {
            self.die(events);
        }
        true
    }

    pub fn die(&mut self, events: &mut Vec<GameEvent>) {
        self.dying.start(self.config.death_ticks);
        self.vel = Vec2::ZERO;
        events.push(GameEvent::PlayerDied);
        log::info!("Player died");
    }

    /// Freeze in the pickup pose for the configured window.
    pub fn begin_pickup(&mut self) {
        self.picking_up.start(self.config.pickup_ticks);
        self.vel.x = 0.0;
    }

    pub fn raise_max_health(&mut self, amount: u32) {
        self.max_health += amount;
        self.health = self.max_health;
    }

    /// Back to the spawn point at full health. Only the death window is
    /// cleared; invincibility and hurt from the lethal hit run on.
    pub fn respawn(&mut self) {
        self.health = self.max_health;
        self.pos = Vec2::new(self.config.spawn_x, self.config.spawn_y);
        self.vel = Vec2::ZERO;
        self.dying.clear();
    }

    fn select_animation(&self) -> AnimationId {
        let speed = self.vel.x.abs();
        if self.dying.is_active() {
            AnimationId::Dead
        } else if self.picking_up.is_active() {
            AnimationId::Pickup
        } else if self.defending {
            AnimationId::Defend
        } else if self.hurt.is_active() {
            AnimationId::Hurt
        } else if self.dashing.is_active() {
            AnimationId::Run
        } else if let Some(attack) = self.attack {
            attack.variant.animation()
        } else if !self.on_ground {
            AnimationId::Jump
        } else if speed > self.physics.run_anim_threshold {
            AnimationId::Run
        } else if speed > self.physics.walk_anim_threshold {
            AnimationId::Walk
        } else {
            AnimationId::Idle
        }
    }

    fn refresh_animation(&mut self) {
        let id = self.select_animation();
        self.animation.select(id);
        self.animation.advance(self.config.frame_delay);
    }
}

fn random_variant<R: Rng>(rng: &mut R) -> AttackVariant {
    match rng.gen_range(0..3) {
        0 => AttackVariant::One,
        1 => AttackVariant::Two,
        _ => AttackVariant::Three,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::session::Progress;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Rig {
        player: Player,
        room: Room,
        progress: Progress,
        rng: StdRng,
        events: Vec<GameEvent>,
        input: InputState,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                player: Player::new(PlayerConfig::default(), PhysicsConfig::default()),
                room: Room {
                    id: "test".to_string(),
                    name: "Test".to_string(),
                    platforms: Vec::new(),
                    enemies: Vec::new(),
                    items: Vec::new(),
                    exits: Vec::new(),
                },
                progress: Progress::default(),
                rng: StdRng::seed_from_u64(3),
                events: Vec::new(),
                input: InputState::new(),
            }
        }

        fn on_floor() -> Self {
            let mut rig = Self::new();
            rig.player.pos.y = 720.0 - 60.0;
            rig.step(&[]);
            assert!(rig.player.on_ground);
            rig
        }

        fn step(&mut self, keys: &[Key]) -> PlayerStep {
            self.input.set_held(keys.iter().copied());
            let mut ctx = FrameContext {
                bounds: Bounds::default(),
                progress: &mut self.progress,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            let step = self.player.update(&self.input, &mut self.room, &mut ctx);
            self.input.end_frame();
            step
        }
    }

    #[test]
    fn walking_and_running_set_speed_and_facing() {
        let mut rig = Rig::on_floor();
        rig.step(&[Key::Left]);
        assert_eq!(rig.player.vel.x, -5.0);
        assert!(!rig.player.facing_right);
        assert_eq!(rig.player.animation.current, AnimationId::Walk);

        rig.step(&[Key::Right, Key::Run]);
        assert_eq!(rig.player.vel.x, 8.0);
        assert!(rig.player.facing_right);
        assert_eq!(rig.player.animation.current, AnimationId::Run);
    }

    #[test]
    fn released_keys_let_friction_stop_the_player() {
        let mut rig = Rig::on_floor();
        rig.step(&[Key::Right]);
        for _ in 0..40 {
            rig.step(&[]);
        }
        assert_eq!(rig.player.vel.x, 0.0);
        assert_eq!(rig.player.animation.current, AnimationId::Idle);
    }

    #[test]
    fn defend_only_on_ground_and_blocks_steering() {
        let mut rig = Rig::on_floor();
        rig.step(&[Key::Defend, Key::Right]);
        assert!(rig.player.defending);
        assert_eq!(rig.player.vel.x, 0.0);
        assert_eq!(rig.player.animation.current, AnimationId::Defend);

        rig.step(&[Key::Up]);
        rig.step(&[Key::Defend]);
        assert!(!rig.player.defending, "no defending in the air");
    }

    #[test]
    fn landing_restores_air_jump_with_ability() {
        let mut rig = Rig::on_floor();
        rig.progress.abilities.double_jump = true;
        rig.step(&[Key::Up]);
        rig.step(&[]);
        rig.step(&[Key::Up]);
        assert_eq!(rig.player.air_jumps, 0);

        let mut frames = 0;
        while !rig.player.on_ground {
            rig.step(&[]);
            frames += 1;
            assert!(frames < 200, "never landed");
        }
        assert_eq!(rig.player.air_jumps, 2);
    }

    #[test]
    fn walking_off_a_ledge_keeps_one_air_jump() {
        let mut rig = Rig::new();
        rig.room.platforms.push(Rect::new(200.0, 600.0, 400.0, 20.0));
        rig.player.pos = Vec2::new(550.0, 540.0);
        rig.step(&[]);
        assert!(rig.player.on_ground);
        assert_eq!(rig.player.air_jumps, 1);

        let mut frames = 0;
        while rig.player.on_ground {
            rig.step(&[Key::Right]);
            frames += 1;
            assert!(frames < 50, "never left the platform");
        }
        rig.step(&[]);
        assert!(!rig.player.on_ground);

        rig.step(&[Key::Up]);
        let physics = rig.player.physics;
        assert_eq!(rig.player.vel.y, physics.jump_power + physics.gravity);
        assert_eq!(rig.player.air_jumps, 0);
    }

    #[test]
    fn dash_moves_only_on_the_starting_frame() {
        let mut rig = Rig::on_floor();
        rig.progress.abilities.dash = true;
        rig.player.pos.x = 300.0;

        rig.step(&[Key::Dash]);
        assert_eq!(rig.player.pos.x, 320.0);
        for _ in 0..14 {
            rig.step(&[]);
            assert!(rig.player.dashing.is_active());
            assert_eq!(rig.player.pos.x, 320.0);
            assert_eq!(rig.player.vel.x, 20.0);
        }

        rig.step(&[]);
        assert!(!rig.player.dashing.is_active());
        assert_eq!(rig.player.pos.x, 320.0);
        assert_eq!(rig.player.vel.x, 0.0);
    }

    #[test]
    fn attack_picks_a_variant_and_locks_steering() {
        let mut rig = Rig::on_floor();
        rig.step(&[Key::Attack]);
        let attack = rig.player.attack.expect("swing started");
        assert!(AttackVariant::ALL.contains(&attack.variant));
        assert_eq!(rig.player.animation.current, attack.variant.animation());

        rig.step(&[Key::Left]);
        assert_eq!(rig.player.vel.x, 0.0);
        assert!(rig.player.facing_right);

        let swing = attack.variant.animation().frame_count() as u32 * 5;
        for _ in 0..swing {
            rig.step(&[]);
        }
        assert!(rig.player.attack.is_none());
    }

    #[test]
    fn attack_reach_follows_facing() {
        let mut player = Player::new(PlayerConfig::default(), PhysicsConfig::default());
        player.pos = Vec2::new(200.0, 300.0);
        assert_eq!(player.attack_reach(), Rect::new(240.0, 300.0, 80.0, 60.0));
        player.facing_right = false;
        assert_eq!(player.attack_reach(), Rect::new(120.0, 300.0, 80.0, 60.0));
    }

    #[test]
    fn killing_blow_awards_coins_and_reports() {
        let mut rig = Rig::on_floor();
        let mut enemy = Enemy::new(EnemyKind::Skeleton, 160.0, 660.0);
        enemy.health = 1;
        rig.room.enemies.push(enemy);

        rig.step(&[Key::Attack]);
        assert!(rig.room.enemies[0].dead);
        assert_eq!(rig.progress.coins, 10);
        assert!(rig.events.contains(&GameEvent::EnemyKilled {
            kind: EnemyKind::Skeleton,
            bonus: 10
        }));
    }

    #[test]
    fn hurt_outranks_attack_but_not_defend() {
        let mut rig = Rig::on_floor();
        rig.step(&[Key::Attack]);
        rig.player.take_damage(1, &mut rig.events);
        rig.step(&[]);
        assert_eq!(rig.player.animation.current, AnimationId::Hurt);

        rig.player.invincible.clear();
        rig.step(&[Key::Defend]);
        assert_eq!(rig.player.animation.current, AnimationId::Defend);
    }

    #[test]
    fn death_window_ends_in_respawn_request() {
        let mut rig = Rig::on_floor();
        rig.player.health = 1;
        rig.player.take_damage(3, &mut rig.events);
        assert_eq!(rig.player.health, 0);

        for _ in 0..89 {
            assert_eq!(rig.step(&[Key::Right]), PlayerStep::Continue);
        }
        assert_eq!(rig.player.vel, Vec2::ZERO);
        assert_eq!(rig.step(&[]), PlayerStep::Respawn);

        rig.player.respawn();
        assert_eq!(rig.player.health, 5);
        assert_eq!(rig.player.pos, Vec2::new(100.0, 100.0));
        assert!(!rig.player.is_dying());
        assert_eq!(rig.player.invincible.remaining(), 60);
        assert_eq!(rig.player.hurt.remaining(), 20);
    }
}
