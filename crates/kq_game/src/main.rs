//! Knight's Quest -- headless driver.
//!
//! Loads a world (the stock castle unless a path is given) and plays a
//! scripted replay through it at the fixed 60 Hz tick:
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_tick()` -- one session step per owed tick
//!   3. drain events into the HUD and notice board
//!
//! `--fast` skips the wall clock and runs every tick back to back.
//!
//! Usage: kq_game [world.json] [replay.json] [--fast]

mod collision;
mod config;
mod enemy;
mod error;
mod event;
mod hud;
mod item;
mod player;
mod render;
mod replay;
mod room;
mod session;

use std::path::PathBuf;
use std::time::Instant;

use kq_core::input::{InputState, Key};
use kq_core::time::FrameClock;

use error::LoadError;
use hud::{dispatch_events, Hud, LogHud, NoticeBoard, Notifier};
use render::HeadlessRenderer;
use replay::{load_replay_from_path, parse_replay, ReplaySequence};
use room::{load_world_from_path, parse_world, World, DEFAULT_WORLD_JSON};
use session::Session;

const DEFAULT_REPLAY_JSON: &str = include_str!("../../../assets/replays/tour.json");
/// Seed for attack variant selection; fixed so replays are reproducible.
const SESSION_SEED: u64 = 0x6b71;

struct Args {
    world: Option<PathBuf>,
    replay: Option<PathBuf>,
    fast: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        world: None,
        replay: None,
        fast: false,
    };
    for arg in std::env::args().skip(1) {
        if arg == "--fast" {
            args.fast = true;
        } else if args.world.is_none() {
            args.world = Some(PathBuf::from(arg));
        } else if args.replay.is_none() {
            args.replay = Some(PathBuf::from(arg));
        } else {
            log::warn!("Ignoring extra argument '{arg}'");
        }
    }
    args
}

fn load_world(path: Option<&PathBuf>) -> Result<World, LoadError> {
    match path {
        Some(path) => load_world_from_path(path),
        None => parse_world(DEFAULT_WORLD_JSON),
    }
}

fn load_replay(path: Option<&PathBuf>) -> Result<ReplaySequence, LoadError> {
    match path {
        Some(path) => load_replay_from_path(path),
        None => parse_replay(DEFAULT_REPLAY_JSON),
    }
}

struct Driver {
    session: Session,
    input: InputState,
    renderer: HeadlessRenderer,
    hud: LogHud,
    notices: NoticeBoard,
}

impl Driver {
    fn new(session: Session) -> Self {
        Self {
            session,
            input: InputState::new(),
            renderer: HeadlessRenderer::default(),
            hud: LogHud::default(),
            notices: NoticeBoard::new(),
        }
    }

    fn tick(&mut self, held: &[Key]) {
        self.input.set_held(held.iter().copied());
        self.session.step(&self.input, &mut self.renderer);
        self.input.end_frame();

        let events = self.session.drain_events();
        for event in &events {
            log::debug!("[tick {}] {event}", self.session.tick);
        }
        if !events.is_empty() {
            let status = self.session.hud_status();
            dispatch_events(&events, &status, &mut self.hud, &mut self.notices);
        }
        self.notices.tick();
    }
}

fn run() -> Result<(), LoadError> {
    let args = parse_args();
    let world = load_world(args.world.as_ref())?;
    let replay = load_replay(args.replay.as_ref())?;
    let inputs = replay.expanded_inputs();

    let session = Session::new(world, SESSION_SEED);
    let mut driver = Driver::new(session);
    let status = driver.session.hud_status();
    driver.notices.show(&format!("Welcome to {}", status.room_name));
    driver.hud.refresh(&status);

    log::info!(
        "Playing {} ticks{}",
        inputs.len(),
        if args.fast { " (fast)" } else { "" }
    );

    if args.fast {
        for held in &inputs {
            driver.tick(held);
        }
    } else {
        let mut clock = FrameClock::new(Instant::now());
        let mut remaining = inputs.iter();
        'frames: loop {
            clock.begin_frame(Instant::now());
            while clock.should_tick() {
                let Some(held) = remaining.next() else {
                    break 'frames;
                };
                driver.tick(held);
            }
            std::thread::sleep(clock.time_until_tick());
        }
    }

    if !driver.notices.is_empty() {
        let texts: Vec<&str> = driver.notices.active().collect();
        log::info!("Still on screen: {}", texts.join(", "));
    }
    let remaining_enemies = driver
        .session
        .rooms()
        .iter()
        .flat_map(|room| &room.enemies)
        .filter(|enemy| !enemy.dead)
        .count();
    log::info!("{remaining_enemies} enemies remain in the castle");

    let status = driver.session.hud_status();
    log::info!(
        "Replay finished after {} ticks ({} frames drawn, {} draw calls): {status}",
        driver.session.tick,
        driver.renderer.frames,
        driver.renderer.drawn
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Knight's Quest starting...");
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
