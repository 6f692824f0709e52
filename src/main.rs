//! Lunar Oasis runner (default binary).
//!
//! Loads the sprite atlas and level, then runs the lander at a fixed 60 Hz
//! tick, drawing the 64×64 frame as half-block cells through crossterm.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use lunar_oasis::config::{init_tracing, load_atlas, GameConfig};
use lunar_oasis::core::Simulation;
use lunar_oasis::engine::{Game, Hud, Phase};
use lunar_oasis::input::{should_quit, InputHandler};
use lunar_oasis::term::{CellBuffer, PixelView, TerminalRenderer, Viewport};
use lunar_oasis::types::TICK_MS;

fn main() -> Result<()> {
    let config = GameConfig::from_env();
    init_tracing(config.log_path.as_deref())?;
    info!(?config, "starting");

    // A missing or malformed atlas is fatal before the terminal is touched.
    let atlas = load_atlas(&config.atlas_path)?;
    let source = config.level_source()?;
    let sim = Simulation::new(Arc::new(atlas), config.shading, config.seed);
    let mut game = Game::new(sim, source);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    info!(level = game.level(), "exiting");
    result
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let view = PixelView::new();
    let mut input = InputHandler::new();
    let mut cells = CellBuffer::new(0, 0);
    let mut hud = String::with_capacity(64);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut dirty = true;
    game.render();

    loop {
        if dirty {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            hud.clear();
            write_hud(&mut hud, &game.hud());
            view.render_into(game.sim().fb(), &hud, Viewport::new(w, h), &mut cells);
            term.draw_swap(&mut cells)?;
            dirty = false;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        input.handle_key_press(key.code);
                    }
                    // OS auto-repeat keeps the held latch alive.
                    KeyEventKind::Repeat => {
                        input.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => input.handle_key_release(key.code),
                },
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let actions = input.update();
            game.frame(&actions);
            dirty = true;
        }
    }
}

fn write_hud(out: &mut String, hud: &Hud) {
    let status = match hud.phase {
        Phase::Flying => "",
        Phase::Landed => "LANDED",
        Phase::Crashed => "CRASHED",
        Phase::Cleared => "CLEARED",
    };
    let _ = write!(
        out,
        "LV {:<2} FUEL {:>3.0} SPD {:>4.1} {}",
        hud.level, hud.fuel, hud.speed, status
    );
}
