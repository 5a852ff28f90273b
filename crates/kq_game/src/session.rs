//! Game session: owns the player, the room graph and session-wide progress,
//! and runs one frame at a time.
//!
//! Frame order is fixed:
//!
//!   1. restart check (edge-triggered)
//!   2. player update (may hit enemies, may request a respawn)
//!   3. enemy updates (may damage the player)
//!   4. item updates (may unlock abilities / add coins)
//!   5. draw
//!   6. room transition check
//!
//! Entities never reach back into the session. Anything they need to touch
//! (abilities, coins, the event queue, the RNG) is lent to them for the
//! duration of a call through `FrameContext` or a plain `&mut` argument.

use glam::Vec2;
use kq_core::input::{InputState, Key};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::Bounds;
use crate::config::TransitionConfig;
use crate::event::GameEvent;
use crate::hud::HudStatus;
use crate::player::{Player, PlayerStep};
use crate::render::{self, Renderer};
use crate::room::{reentry_position, Room, RoomGraph, World};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Abilities {
    pub double_jump: bool,
    pub dash: bool,
}

/// Session-wide state that outlives individual rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub abilities: Abilities,
    pub coins: u32,
}

/// Session state lent to the player for one update call.
pub struct FrameContext<'a> {
    pub bounds: Bounds,
    pub progress: &'a mut Progress,
    pub rng: &'a mut StdRng,
    pub events: &'a mut Vec<GameEvent>,
}

pub struct Session {
    pub player: Player,
    pub progress: Progress,
    /// Kept for renderers; the playfield is a single screen and never scrolls.
    pub camera: Vec2,
    pub tick: u64,
    rooms: RoomGraph,
    current_room: usize,
    bounds: Bounds,
    transition: TransitionConfig,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(world: World, seed: u64) -> Self {
        let current_room = world.rooms.start();
        Self {
            player: Player::new(world.player, world.physics),
            progress: Progress::default(),
            camera: Vec2::ZERO,
            tick: 0,
            rooms: world.rooms,
            current_room,
            bounds: world.bounds,
            transition: world.transition,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn current_room(&self) -> &Room {
        self.rooms.room(self.current_room)
    }

    #[cfg(test)]
    pub fn current_room_mut(&mut self) -> &mut Room {
        self.rooms.room_mut(self.current_room)
    }

    pub fn rooms(&self) -> &RoomGraph {
        &self.rooms
    }

    /// Run one full frame: simulate, draw, then check exits.
    pub fn step<R: Renderer>(&mut self, input: &InputState, renderer: &mut R) {
        self.update(input);
        render::draw_frame(&render::build_frame(self), renderer);
        self.check_room_transition();
    }

    /// Simulation half of a frame (everything before the draw). A restart
    /// press while the player is already dying is ignored; the death window
    /// is not restarted.
    pub fn update(&mut self, input: &InputState) {
        if input.is_just_pressed(Key::Restart) && !self.player.is_dying() {
            log::info!("Restart requested");
            self.player.die(&mut self.events);
        }

        let room = self.rooms.room_mut(self.current_room);
        let mut ctx = FrameContext {
            bounds: self.bounds,
            progress: &mut self.progress,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        if self.player.update(input, room, &mut ctx) == PlayerStep::Respawn {
            self.respawn();
        }

        let room = self.rooms.room_mut(self.current_room);
        for enemy in &mut room.enemies {
            enemy.update(&mut self.player, &mut self.events);
        }
        for item in &mut room.items {
            item.update(&mut self.player, &mut self.progress, &mut self.events);
        }

        self.tick += 1;
    }

    /// Full reset after death: player back to spawn, coins lost, back to the
    /// starting room. Abilities and room contents are kept.
    pub fn respawn(&mut self) {
        self.player.respawn();
        self.progress.coins = 0;
        self.current_room = self.rooms.start();
        self.events.push(GameEvent::PlayerRespawned);
        log::info!("Respawned in '{}'", self.current_room().id);
    }

    /// Move to the destination of the first exit the player overlaps.
    /// Returns whether a transition happened.
    pub fn check_room_transition(&mut self) -> bool {
        let player_rect = self.player.rect();
        let Some(exit) = self
            .current_room()
            .exits
            .iter()
            .find(|exit| exit.rect.overlaps(&player_rect))
        else {
            return false;
        };

        let target = exit.target;
        let landing = reentry_position(&exit.rect, self.bounds, self.transition);
        self.current_room = target;
        self.player.pos = landing;

        let room = self.current_room();
        log::info!("Entered '{}' ({})", room.name, room.id);
        let room_id = room.id.clone();
        self.events.push(GameEvent::RoomEntered { room_id });
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud_status(&self) -> HudStatus {
        HudStatus {
            health: self.player.health,
            max_health: self.player.max_health,
            coins: self.progress.coins,
            room_name: self.current_room().name.clone(),
        }
    }
}
