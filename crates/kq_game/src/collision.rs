//! Axis-aligned rectangles and the platformer contact rules.
//!
//! Coordinates are screen space: origin top-left, y grows downward. Every
//! overlap test in the game (body vs body, attack reach, item pickup, exit
//! triggers) goes through `Rect::overlaps`.
//!
//! Contact resolution runs after position integration and is deliberately
//! one-way: platforms only catch a body that is falling onto their top
//! surface, so bodies jump up through them from below.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow the rect by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// Playfield extents. The floor is the bottom edge; the side walls and
/// ceiling are the other edges.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub floor: bool,
    pub platform: bool,
    pub left_wall: bool,
    pub right_wall: bool,
    pub ceiling: bool,
}

impl ContactState {
    pub fn grounded(&self) -> bool {
        self.floor || self.platform
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContactResult {
    pub position: Vec2,
    pub velocity: Vec2,
    pub contacts: ContactState,
}

/// Resolve a body of `size` that has just moved to `position` with
/// `velocity` against the playfield and the room's platforms.
///
/// `landing_tolerance` is how far below a platform's top surface the body's
/// feet may already be and still get snapped onto it.
pub fn resolve_contacts(
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    platforms: &[Rect],
    bounds: Bounds,
    landing_tolerance: f32,
) -> ContactResult {
    let mut pos = position;
    let mut vel = velocity;
    let mut contacts = ContactState::default();

    if pos.y + size.y >= bounds.height {
        pos.y = bounds.height - size.y;
        vel.y = 0.0;
        contacts.floor = true;
    }

    for platform in platforms {
        let feet = pos.y + size.y;
        if vel.y >= 0.0
            && pos.x + size.x > platform.x
            && pos.x < platform.right()
            && feet >= platform.y
            && feet <= platform.y + landing_tolerance
        {
            pos.y = platform.y - size.y;
            vel.y = 0.0;
            contacts.platform = true;
        }
    }

    if pos.x < 0.0 {
        pos.x = 0.0;
        contacts.left_wall = true;
    }
    if pos.x + size.x > bounds.width {
        pos.x = bounds.width - size.x;
        contacts.right_wall = true;
    }
    // Only the position is clamped at the ceiling; gravity brings the body down.
    if pos.y < 0.0 {
        pos.y = 0.0;
        contacts.ceiling = true;
    }

    ContactResult {
        position: pos,
        velocity: vel,
        contacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(40.0, 60.0);

    fn bounds() -> Bounds {
        Bounds {
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn overlap_requires_shared_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)), "touching edges");
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn inflate_grows_every_side() {
        let r = Rect::new(100.0, 100.0, 40.0, 60.0).inflate(10.0);
        assert_eq!(r, Rect::new(90.0, 90.0, 60.0, 80.0));
    }

    #[test]
    fn floor_stops_falling_body() {
        let result = resolve_contacts(
            Vec2::new(100.0, 560.0),
            Vec2::new(0.0, 12.0),
            SIZE,
            &[],
            bounds(),
            20.0,
        );
        assert_eq!(result.position.y, 540.0);
        assert_eq!(result.velocity.y, 0.0);
        assert!(result.contacts.floor);
        assert!(result.contacts.grounded());
    }

    #[test]
    fn platform_catches_body_falling_onto_top() {
        let platform = Rect::new(50.0, 400.0, 200.0, 20.0);
        let result = resolve_contacts(
            Vec2::new(100.0, 350.0),
            Vec2::new(0.0, 5.0),
            SIZE,
            &[platform],
            bounds(),
            20.0,
        );
        assert_eq!(result.position.y, 340.0);
        assert!(result.contacts.platform);
    }

    #[test]
    fn platform_ignores_body_moving_up() {
        let platform = Rect::new(50.0, 400.0, 200.0, 20.0);
        let result = resolve_contacts(
            Vec2::new(100.0, 350.0),
            Vec2::new(0.0, -5.0),
            SIZE,
            &[platform],
            bounds(),
            20.0,
        );
        assert_eq!(result.position.y, 350.0);
        assert!(!result.contacts.grounded());
    }

    #[test]
    fn platform_ignores_feet_below_tolerance_band() {
        let platform = Rect::new(50.0, 400.0, 200.0, 20.0);
        let result = resolve_contacts(
            Vec2::new(100.0, 365.0),
            Vec2::new(0.0, 5.0),
            SIZE,
            &[platform],
            bounds(),
            20.0,
        );
        assert_eq!(result.position.y, 365.0);
        assert!(!result.contacts.platform);
    }

    #[test]
    fn side_walls_and_ceiling_clamp_position() {
        let left = resolve_contacts(
            Vec2::new(-8.0, -3.0),
            Vec2::new(-5.0, -10.0),
            SIZE,
            &[],
            bounds(),
            20.0,
        );
        assert_eq!(left.position, Vec2::new(0.0, 0.0));
        assert!(left.contacts.left_wall);
        assert!(left.contacts.ceiling);
        assert_eq!(left.velocity.y, -10.0);

        let right = resolve_contacts(
            Vec2::new(790.0, 100.0),
            Vec2::new(5.0, 0.0),
            SIZE,
            &[],
            bounds(),
            20.0,
        );
        assert_eq!(right.position.x, 760.0);
        assert!(right.contacts.right_wall);
    }
}
