//! Token Tetris terminal runner (default binary).
//!
//! Keys are read with crossterm on the main thread; the drop loop runs on the
//! tokio runtime. Both go through the same `GameSession`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use token_tetris::engine::{EngineConfig, GameSession};
use token_tetris::input::{handle_key_event, should_quit};
use token_tetris::logging;
use token_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    logging::init(config.log_path.as_deref(), config.log_level)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut term = TerminalRenderer::enter()?;
    let result = run(&mut term, &config);
    // Leave the alternate screen before printing anything.
    drop(term);

    let best = result?;
    if best > 0 {
        println!("best score: {}", best);
    }
    Ok(())
}

/// Play until the user quits. Returns the best final score seen.
fn run(term: &mut TerminalRenderer, config: &EngineConfig) -> Result<u32> {
    let mut session = GameSession::new(config)?;

    let best = Arc::new(AtomicU32::new(0));
    {
        let best = Arc::clone(&best);
        session.on_game_over(move |score| {
            info!("final score {}", score);
            best.fetch_max(score, Ordering::Relaxed);
        });
    }

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = config.tick();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&session.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    break;
                }
                if let Some(action) = handle_key_event(key) {
                    session.dispatch(action);
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }

    session.shutdown();
    Ok(best.load(Ordering::Relaxed))
}
