//! Frame snapshot handed to the renderer.
//!
//! The simulation never talks to a graphics API. Each frame it flattens the
//! visible state into a `Frame` (a back-to-front list of `Drawable`s) and
//! hands that to whatever implements `Renderer`. Sheets that have not
//! finished loading are skipped for that frame only.

use std::collections::HashSet;

use glam::Vec2;
use kq_core::animation::AnimationId;

use crate::collision::Rect;
use crate::enemy::EnemyKind;
use crate::item::ItemKind;
use crate::session::Session;

/// One frame cut from a horizontal sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub animation: AnimationId,
    pub frame: usize,
    pub source_x: u32,
    pub source_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Platform,
    Exit,
    Item(ItemKind),
    Enemy(EnemyKind),
    Player,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub kind: DrawableKind,
    /// Destination rectangle in screen space.
    pub rect: Rect,
    /// Sprites face right on the sheet; false means mirror horizontally.
    pub facing_right: bool,
    pub sprite: Option<SpriteFrame>,
    pub alpha: f32,
    /// Fill of the health bar drawn above enemies.
    pub health_fraction: Option<f32>,
    /// Tint for a freshly hit enemy.
    pub flash: bool,
}

impl Drawable {
    fn solid(kind: DrawableKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            facing_right: true,
            sprite: None,
            alpha: 1.0,
            health_fraction: None,
            flash: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub camera: Vec2,
    pub drawables: Vec<Drawable>,
}

pub trait Renderer {
    /// Whether the sheet for `animation` is loaded and drawable.
    fn is_ready(&self, animation: AnimationId) -> bool;
    fn begin_frame(&mut self, _camera: Vec2) {}
    fn draw(&mut self, drawable: &Drawable);
}

/// Snapshot the current room, back to front: platforms, exits, live items,
/// live enemies, then the player on top.
pub fn build_frame(session: &Session) -> Frame {
    let room = session.current_room();
    let mut drawables = Vec::with_capacity(
        room.platforms.len() + room.exits.len() + room.items.len() + room.enemies.len() + 1,
    );

    drawables.extend(
        room.platforms
            .iter()
            .map(|platform| Drawable::solid(DrawableKind::Platform, *platform)),
    );
    drawables.extend(
        room.exits
            .iter()
            .map(|exit| Drawable::solid(DrawableKind::Exit, exit.rect)),
    );
    drawables.extend(
        room.items
            .iter()
            .filter(|item| !item.collected)
            .map(|item| Drawable::solid(DrawableKind::Item(item.kind), item.rect())),
    );
    for enemy in room.enemies.iter().filter(|enemy| !enemy.dead) {
        drawables.push(Drawable {
            facing_right: enemy.direction > 0.0,
            health_fraction: Some(enemy.health_fraction()),
            flash: enemy.hit_flash.is_active(),
            ..Drawable::solid(DrawableKind::Enemy(enemy.kind), enemy.rect())
        });
    }

    let player = &session.player;
    let animation = player.animation.current;
    drawables.push(Drawable {
        kind: DrawableKind::Player,
        rect: player.rect().inflate(player.config.sprite_margin),
        facing_right: player.facing_right,
        sprite: Some(SpriteFrame {
            animation,
            frame: player.animation.frame,
            source_x: player.animation.source_x(),
            source_width: animation.frame_width(),
        }),
        alpha: if player.is_flickering() { 0.5 } else { 1.0 },
        health_fraction: None,
        flash: false,
    });

    Frame {
        camera: session.camera,
        drawables,
    }
}

pub fn draw_frame<R: Renderer>(frame: &Frame, renderer: &mut R) {
    renderer.begin_frame(frame.camera);
    for drawable in &frame.drawables {
        if let Some(sprite) = drawable.sprite {
            if !renderer.is_ready(sprite.animation) {
                log::trace!("Sheet '{}' not ready; skipping sprite", sprite.animation.sheet_name());
                continue;
            }
        }
        renderer.draw(drawable);
    }
}

/// Renderer for runs without a window: counts what would have been drawn.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub drawn: u64,
    /// Sheets treated as still loading.
    pub pending: HashSet<AnimationId>,
}

impl Renderer for HeadlessRenderer {
    fn is_ready(&self, animation: AnimationId) -> bool {
        !self.pending.contains(&animation)
    }

    fn begin_frame(&mut self, _camera: Vec2) {
        self.frames += 1;
    }

    fn draw(&mut self, _drawable: &Drawable) {
        self.drawn += 1;
    }
}
