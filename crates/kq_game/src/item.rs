use glam::Vec2;
use serde::Deserialize;

use crate::collision::Rect;
use crate::event::GameEvent;
use crate::player::Player;
use crate::session::Progress;

pub const ITEM_SIZE: f32 = 30.0;
pub const COIN_VALUE: u32 = 50;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    DoubleJump,
    Dash,
    Coin,
    HeartContainer,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::DoubleJump => "double jump",
            Self::Dash => "dash",
            Self::Coin => "coin",
            Self::HeartContainer => "heart container",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Item {
    pub fn new(kind: ItemKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::splat(ITEM_SIZE),
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn update(
        &mut self,
        player: &mut Player,
        progress: &mut Progress,
        events: &mut Vec<GameEvent>,
    ) {
        if self.collected || !self.rect().overlaps(&player.rect()) {
            return;
        }
        self.collected = true;
        player.begin_pickup();

        match self.kind {
            ItemKind::DoubleJump => {
                progress.abilities.double_jump = true;
                events.push(GameEvent::Notice("Double Jump unlocked!".to_string()));
            }
            ItemKind::Dash => {
                progress.abilities.dash = true;
                events.push(GameEvent::Notice("Dash unlocked!".to_string()));
            }
            ItemKind::Coin => {
                progress.coins += COIN_VALUE;
            }
            ItemKind::HeartContainer => {
                player.raise_max_health(1);
                events.push(GameEvent::Notice("Max health increased!".to_string()));
            }
        }
        log::info!("Collected {}", self.kind);
        events.push(GameEvent::ItemCollected { kind: self.kind });
    }
}
