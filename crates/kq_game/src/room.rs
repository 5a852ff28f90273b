//! Room graph: static geometry, the live enemy/item lists and the exits
//! linking rooms together.
//!
//! Rooms are loaded once and kept for the whole session. Killing an enemy or
//! collecting an item mutates the room object itself, so leaving and
//! re-entering a room does not bring anything back.
//!
//! Exit targets are resolved to indices at load time. A world that names a
//! missing room, or whose exits would drop the player straight into a return
//! exit, is rejected before the game starts.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use crate::collision::{Bounds, Rect};
use crate::config::{PhysicsConfig, PlayerConfig, TransitionConfig};
use crate::enemy::{Enemy, EnemyKind};
use crate::error::LoadError;
use crate::item::{Item, ItemKind};

pub const WORLD_VERSION: &str = "0.1";

/// The stock five-room castle, used when no world file is given.
pub const DEFAULT_WORLD_JSON: &str = include_str!("../../../assets/worlds/knights_quest.json");

#[derive(Debug, Clone)]
pub struct Exit {
    pub rect: Rect,
    pub to: String,
    /// Index of the destination in the owning `RoomGraph`.
    pub target: usize,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub platforms: Vec<Rect>,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub exits: Vec<Exit>,
}

#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    start: usize,
}

impl RoomGraph {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, index: usize) -> &Room {
        &self.rooms[index]
    }

    pub fn room_mut(&mut self, index: usize) -> &mut Room {
        &mut self.rooms[index]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }
}

/// A fully validated world, ready to start a session.
#[derive(Debug, Clone)]
pub struct World {
    pub world_id: String,
    pub bounds: Bounds,
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
    pub transition: TransitionConfig,
    pub rooms: RoomGraph,
}

/// Where the player lands after taking `exit`: near the screen edge opposite
/// the side the exit sits on, at the fixed re-entry height.
pub fn reentry_position(exit: &Rect, bounds: Bounds, transition: TransitionConfig) -> Vec2 {
    let x = if exit.x < bounds.width / 2.0 {
        bounds.width - transition.reentry_margin
    } else {
        transition.reentry_margin
    };
    Vec2::new(x, transition.reentry_y)
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct WorldFileJson {
    version: String,
    world_id: String,
    start_room: String,
    #[serde(default)]
    screen: Bounds,
    #[serde(default)]
    player: PlayerConfig,
    #[serde(default)]
    physics: PhysicsConfig,
    #[serde(default)]
    transition: TransitionConfig,
    rooms: Vec<RoomJson>,
}

#[derive(Debug, Deserialize)]
struct RoomJson {
    id: String,
    name: String,
    #[serde(default)]
    platforms: Vec<Rect>,
    #[serde(default)]
    enemies: Vec<EnemyJson>,
    #[serde(default)]
    items: Vec<ItemJson>,
    #[serde(default)]
    exits: Vec<ExitJson>,
}

#[derive(Debug, Deserialize)]
struct EnemyJson {
    kind: EnemyKind,
    x: f32,
    y: f32,
    #[serde(default)]
    patrol_range: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ItemJson {
    kind: ItemKind,
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct ExitJson {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    to: String,
}

pub fn load_world_from_path(path: &Path) -> Result<World, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_world(&raw)
}

pub fn parse_world(raw: &str) -> Result<World, LoadError> {
    let json: WorldFileJson =
        serde_json::from_str(raw).map_err(|source| LoadError::Parse {
            what: "world",
            source,
        })?;
    validate_world_json(&json)?;
    let world = build_world(json)?;
    validate_reentry(&world)?;

    log::info!(
        "Loaded world '{}' ({} rooms, start '{}')",
        world.world_id,
        world.rooms.len(),
        world.rooms.room(world.rooms.start()).id
    );
    Ok(world)
}

fn validate_world_json(json: &WorldFileJson) -> Result<(), LoadError> {
    let invalid = |reason: String| LoadError::invalid("World", reason);

    if json.version != WORLD_VERSION {
        return Err(invalid(format!("unsupported version '{}'", json.version)));
    }
    if json.rooms.is_empty() {
        return Err(invalid("rooms array is empty".to_string()));
    }
    if json.screen.width <= 0.0 || json.screen.height <= 0.0 {
        return Err(invalid("screen width and height must be > 0".to_string()));
    }

    let mut room_ids = HashSet::new();
    for room in &json.rooms {
        if !room_ids.insert(room.id.as_str()) {
            return Err(invalid(format!("duplicate room id '{}'", room.id)));
        }
    }
    if !room_ids.contains(json.start_room.as_str()) {
        return Err(invalid(format!(
            "start room '{}' does not exist",
            json.start_room
        )));
    }

    for room in &json.rooms {
        for platform in &room.platforms {
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(invalid(format!(
                    "room '{}' has a platform with non-positive size",
                    room.id
                )));
            }
        }
        for exit in &room.exits {
            if exit.width <= 0.0 || exit.height <= 0.0 {
                return Err(invalid(format!(
                    "room '{}' has an exit with non-positive size",
                    room.id
                )));
            }
            if !room_ids.contains(exit.to.as_str()) {
                return Err(invalid(format!(
                    "exit in '{}' targets missing room '{}'",
                    room.id, exit.to
                )));
            }
        }
        if room.platforms.is_empty() {
            log::warn!("Room '{}' has no platforms.", room.id);
        }
        if room.exits.is_empty() {
            log::warn!("Room '{}' has no exits. The player cannot leave it.", room.id);
        }
    }
    Ok(())
}

fn build_world(json: WorldFileJson) -> Result<World, LoadError> {
    let index: HashMap<&str, usize> = json
        .rooms
        .iter()
        .enumerate()
        .map(|(i, room)| (room.id.as_str(), i))
        .collect();
    let lookup = |id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| LoadError::invalid("World", format!("unknown room '{id}'")))
    };

    let start = lookup(&json.start_room)?;
    let mut rooms = Vec::with_capacity(json.rooms.len());
    for room in &json.rooms {
        let mut exits = Vec::with_capacity(room.exits.len());
        for exit in &room.exits {
            exits.push(Exit {
                rect: Rect::new(exit.x, exit.y, exit.width, exit.height),
                to: exit.to.clone(),
                target: lookup(&exit.to)?,
            });
        }
        rooms.push(Room {
            id: room.id.clone(),
            name: room.name.clone(),
            platforms: room.platforms.clone(),
            enemies: room
                .enemies
                .iter()
                .map(|e| {
                    let enemy = Enemy::new(e.kind, e.x, e.y);
                    match e.patrol_range {
                        Some(range) => enemy.with_patrol_range(range),
                        None => enemy,
                    }
                })
                .collect(),
            items: room
                .items
                .iter()
                .map(|i| Item::new(i.kind, i.x, i.y))
                .collect(),
            exits,
        });
    }

    Ok(World {
        world_id: json.world_id,
        bounds: json.screen,
        player: json.player,
        physics: json.physics,
        transition: json.transition,
        rooms: RoomGraph { rooms, start },
    })
}

/// Reject exits whose landing box overlaps an exit of the destination room;
/// such a pair would bounce the player between rooms every frame.
fn validate_reentry(world: &World) -> Result<(), LoadError> {
    let size = Vec2::new(world.player.width, world.player.height);
    for room in world.rooms.iter() {
        for exit in &room.exits {
            let landing = Rect::from_pos_size(
                reentry_position(&exit.rect, world.bounds, world.transition),
                size,
            );
            let destination = world.rooms.room(exit.target);
            if let Some(bounce) = destination
                .exits
                .iter()
                .find(|other| other.rect.overlaps(&landing))
            {
                return Err(LoadError::invalid(
                    "World",
                    format!(
                        "exit '{}' -> '{}' lands inside the exit back to '{}'",
                        room.id, destination.id, bounce.to
                    ),
                ));
            }
        }
    }
    Ok(())
}
