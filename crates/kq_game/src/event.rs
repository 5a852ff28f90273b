use crate::enemy::EnemyKind;
use crate::item::ItemKind;

/// Something observable that happened during a frame. The session queues
/// these; the driver drains them to refresh the HUD and show notices.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDamaged {
        amount: u32,
        health: u32,
        blocked: bool,
    },
    PlayerDied,
    PlayerRespawned,
    EnemyKilled {
        kind: EnemyKind,
        bonus: u32,
    },
    ItemCollected {
        kind: ItemKind,
    },
    RoomEntered {
        room_id: String,
    },
    Notice(String),
}

impl GameEvent {
    /// Whether the HUD (health, coins, room name) may be stale after this event.
    pub fn refreshes_hud(&self) -> bool {
        !matches!(self, GameEvent::PlayerDied | GameEvent::Notice(_))
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerDamaged {
                amount,
                health,
                blocked,
            } => {
                write!(f, "player took {amount} damage, {health} health left")?;
                if *blocked {
                    f.write_str(" (blocked)")?;
                }
                Ok(())
            }
            Self::PlayerDied => f.write_str("player died"),
            Self::PlayerRespawned => f.write_str("player respawned"),
            Self::EnemyKilled { kind, bonus } => write!(f, "{kind} slain (+{bonus} coins)"),
            Self::ItemCollected { kind } => write!(f, "collected {kind}"),
            Self::RoomEntered { room_id } => write!(f, "entered '{room_id}'"),
            Self::Notice(text) => write!(f, "notice: {text}"),
        }
    }
}
