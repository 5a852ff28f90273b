//! Gameplay tuning. All durations are in simulation ticks (60 per second),
//! all speeds in pixels per tick.
//!
//! Both structs deserialize with `#[serde(default)]`, so a world file only
//! needs to name the values it overrides.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Negative: up is toward y = 0.
    pub jump_power: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub dash_speed: f32,
    pub dash_duration: u32,
    /// Horizontal velocity multiplier per idle tick.
    pub ground_friction: f32,
    pub defend_friction: f32,
    pub attack_damping: f32,
    /// Below this magnitude an idle body snaps to a standstill.
    pub stop_threshold: f32,
    pub landing_tolerance: f32,
    pub run_anim_threshold: f32,
    pub walk_anim_threshold: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_power: -15.0,
            walk_speed: 5.0,
            run_speed: 8.0,
            dash_speed: 20.0,
            dash_duration: 15,
            ground_friction: 0.8,
            defend_friction: 0.9,
            attack_damping: 0.8,
            stop_threshold: 0.1,
            landing_tolerance: 20.0,
            run_anim_threshold: 6.0,
            walk_anim_threshold: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub max_health: u32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub attack_range: f32,
    pub invincible_ticks: u32,
    pub hurt_ticks: u32,
    pub death_ticks: u32,
    pub pickup_ticks: u32,
    pub frame_delay: u32,
    /// Sprite overdraw around the hitbox on every side.
    pub sprite_margin: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 60.0,
            max_health: 5,
            spawn_x: 100.0,
            spawn_y: 100.0,
            attack_range: 80.0,
            invincible_ticks: 60,
            hurt_ticks: 20,
            death_ticks: 90,
            pickup_ticks: 30,
            frame_delay: 5,
            sprite_margin: 10.0,
        }
    }
}

/// Where the player reappears after taking an exit.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Distance of the player's left edge from the opposite screen edge.
    pub reentry_margin: f32,
    pub reentry_y: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            reentry_margin: 100.0,
            reentry_y: 100.0,
        }
    }
}
