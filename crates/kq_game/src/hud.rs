//! HUD readout and transient notices.
//!
//! The session only queues `GameEvent`s. After each frame the driver drains
//! them through `dispatch_events`, which forwards notice text to a
//! `Notifier` and refreshes the `Hud` at most once per frame.

use kq_core::time::Countdown;

use crate::event::GameEvent;

/// How long a notice stays on screen: two seconds at 60 ticks per second.
pub const NOTICE_TICKS: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudStatus {
    pub health: u32,
    pub max_health: u32,
    pub coins: u32,
    pub room_name: String,
}

impl std::fmt::Display for HudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Health: {}/{} | Coins: {} | Room: {}",
            self.health, self.max_health, self.coins, self.room_name
        )
    }
}

pub trait Hud {
    fn refresh(&mut self, status: &HudStatus);
}

pub trait Notifier {
    fn show(&mut self, text: &str);
}

/// Notices currently on screen, each with its own expiry.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<(String, Countdown)>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Age every notice by one tick and drop the expired ones.
    pub fn tick(&mut self) {
        self.notices.retain_mut(|(_, countdown)| !countdown.tick());
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.notices.iter().map(|(text, _)| text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Notifier for NoticeBoard {
    fn show(&mut self, text: &str) {
        log::info!("Notice: {text}");
        let mut countdown = Countdown::default();
        countdown.start(NOTICE_TICKS);
        self.notices.push((text.to_string(), countdown));
    }
}

/// HUD that writes the status line to the log whenever it changes.
#[derive(Debug, Default)]
pub struct LogHud {
    last: Option<HudStatus>,
}

impl Hud for LogHud {
    fn refresh(&mut self, status: &HudStatus) {
        if self.last.as_ref() == Some(status) {
            return;
        }
        log::info!("{status}");
        self.last = Some(status.clone());
    }
}

pub fn dispatch_events<H: Hud, N: Notifier>(
    events: &[GameEvent],
    status: &HudStatus,
    hud: &mut H,
    notifier: &mut N,
) {
    let mut refresh = false;
    for event in events {
        if let GameEvent::Notice(text) = event {
            notifier.show(text);
        }
        refresh |= event.refreshes_hud();
    }
    if refresh {
        hud.refresh(status);
    }
}
