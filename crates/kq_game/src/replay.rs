use kq_core::input::Key;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::LoadError;

/// A scripted input run: each frame lists the keys held on that tick.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One held-key list per simulated tick.
    pub fn expanded_inputs(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.held.clone());
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_replay(&raw)
}

pub fn parse_replay(raw: &str) -> Result<ReplaySequence, LoadError> {
    let replay: ReplaySequence = serde_json::from_str(raw).map_err(|source| LoadError::Parse {
        what: "replay",
        source,
    })?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), LoadError> {
    if replay.fixed_dt <= 0.0 {
        return Err(LoadError::invalid("Replay", "fixed_dt must be > 0"));
    }
    if replay.frames.is_empty() {
        return Err(LoadError::invalid("Replay", "frames list is empty"));
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
