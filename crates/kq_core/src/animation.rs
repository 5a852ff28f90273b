//! Sprite-sheet animation ids and deterministic frame stepping.
//!
//! Every animation is a horizontal strip on its own sprite sheet. Frames
//! advance on a fixed number of simulation ticks (`frame_delay`), so the
//! visible frame is a pure function of the tick history.

/// Closed set of character animations, one sprite sheet each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationId {
    #[default]
    Idle,
    Walk,
    Run,
    Attack1,
    Attack2,
    Attack3,
    Hurt,
    Jump,
    Dead,
    Defend,
    Pickup,
}

impl AnimationId {
    pub const ALL: &'static [AnimationId] = &[
        AnimationId::Idle,
        AnimationId::Walk,
        AnimationId::Run,
        AnimationId::Attack1,
        AnimationId::Attack2,
        AnimationId::Attack3,
        AnimationId::Hurt,
        AnimationId::Jump,
        AnimationId::Dead,
        AnimationId::Defend,
        AnimationId::Pickup,
    ];

    pub fn frame_count(self) -> usize {
        match self {
            Self::Idle => 4,
            Self::Walk => 8,
            Self::Run => 7,
            Self::Attack1 => 5,
            Self::Attack2 | Self::Attack3 => 4,
            Self::Hurt => 2,
            Self::Jump | Self::Dead => 6,
            Self::Defend | Self::Pickup => 5,
        }
    }

    /// Width of one frame on the sheet, in source pixels.
    pub fn frame_width(self) -> u32 {
        match self {
            Self::Attack1 | Self::Attack2 | Self::Attack3 | Self::Dead => 60,
            _ => 50,
        }
    }

    /// File stem of the sprite sheet (`sprites/<name>.jpg`).
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Attack1 => "attack1",
            Self::Attack2 => "attack2",
            Self::Attack3 => "attack3",
            Self::Hurt => "hurt",
            Self::Jump => "jump",
            Self::Dead => "dead",
            Self::Defend => "defend",
            Self::Pickup => "pickup",
        }
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// The three interchangeable sword swings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttackVariant {
    #[default]
    One,
    Two,
    Three,
}

impl AttackVariant {
    pub const ALL: &'static [AttackVariant] =
        &[AttackVariant::One, AttackVariant::Two, AttackVariant::Three];

    pub fn animation(self) -> AnimationId {
        match self {
            Self::One => AnimationId::Attack1,
            Self::Two => AnimationId::Attack2,
            Self::Three => AnimationId::Attack3,
        }
    }
}

/// Runtime state for one animated entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationState {
    pub current: AnimationId,
    pub frame: usize,
    pub frame_timer: u32,
}

impl AnimationState {
    pub fn new(id: AnimationId) -> Self {
        Self {
            current: id,
            frame: 0,
            frame_timer: 0,
        }
    }

    /// Switch to `id`. Re-selecting the playing animation keeps its progress.
    pub fn select(&mut self, id: AnimationId) {
        if id != self.current {
            self.current = id;
            self.frame = 0;
            self.frame_timer = 0;
        }
    }

    /// Advance one tick; the frame moves every `frame_delay` ticks and wraps.
    pub fn advance(&mut self, frame_delay: u32) {
        self.frame_timer += 1;
        if self.frame_timer >= frame_delay {
            self.frame_timer = 0;
            self.frame = (self.frame + 1) % self.current.frame_count();
        }
    }

    /// Horizontal offset of the current frame on its sheet.
    pub fn source_x(&self) -> u32 {
        self.frame as u32 * self.current.frame_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_frame_every_delay_ticks() {
        let mut state = AnimationState::new(AnimationId::Walk);
        for _ in 0..4 {
            state.advance(5);
        }
        assert_eq!(state.frame, 0);
        state.advance(5);
        assert_eq!(state.frame, 1);
        assert_eq!(state.frame_timer, 0);
    }

    #[test]
    fn frames_wrap_modulo_frame_count() {
        let mut state = AnimationState::new(AnimationId::Hurt);
        for _ in 0..(2 * 5) {
            state.advance(5);
        }
        assert_eq!(state.frame, 0);
        for _ in 0..5 {
            state.advance(5);
        }
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn selecting_new_animation_resets_progress() {
        let mut state = AnimationState::new(AnimationId::Run);
        for _ in 0..12 {
            state.advance(5);
        }
        assert_eq!(state.frame, 2);
        state.select(AnimationId::Jump);
        assert_eq!(state.current, AnimationId::Jump);
        assert_eq!(state.frame, 0);
        assert_eq!(state.frame_timer, 0);
    }

    #[test]
    fn reselecting_same_animation_keeps_progress() {
        let mut state = AnimationState::new(AnimationId::Idle);
        for _ in 0..7 {
            state.advance(5);
        }
        state.select(AnimationId::Idle);
        assert_eq!(state.frame, 1);
        assert_eq!(state.frame_timer, 2);
    }

    #[test]
    fn source_x_uses_sheet_frame_width() {
        let mut state = AnimationState::new(AnimationId::Attack2);
        for _ in 0..10 {
            state.advance(5);
        }
        assert_eq!(state.frame, 2);
        assert_eq!(state.source_x(), 120);
    }

    #[test]
    fn attack_variants_map_to_distinct_sheets() {
        let sheets: Vec<&str> = AttackVariant::ALL
            .iter()
            .map(|v| v.animation().sheet_name())
            .collect();
        assert_eq!(sheets, vec!["attack1", "attack2", "attack3"]);
    }

    #[test]
    fn every_animation_has_frames() {
        for &id in AnimationId::ALL {
            assert!(id.frame_count() > 0, "{id} has no frames");
            assert!(id.frame_width() > 0);
        }
    }
}
