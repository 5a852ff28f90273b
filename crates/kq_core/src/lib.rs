//! Engine-agnostic building blocks shared by the game crate: logical input,
//! the fixed-rate frame clock and sprite-sheet animation stepping.

pub mod animation;
pub mod input;
pub mod time;
