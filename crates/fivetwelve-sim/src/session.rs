use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{ensure, Result};
use log::{debug, info};

use fivetwelve_model::Grid;

use crate::config::Config;
use crate::event_log::EventTally;

/// Outcome of one simulated session.
#[derive(Debug)]
pub struct SessionSummary {
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u32,
    pub game_over: bool,
    pub events: EventTally,
    pub grid: Grid,
}

/// Play a session by cycling through `config.moves` until the game is over
/// or `config.max_moves` moves were made.
pub fn run_session(config: &Config) -> Result<SessionSummary> {
    config.validate()?;
    let mut grid = Grid::from_config(&config.grid)?;
    let tally = Rc::new(RefCell::new(EventTally::default()));
    grid.add_listener(Rc::clone(&tally));

    for _ in 0..config.initial_tiles {
        grid.spawn(None)?;
    }
    info!(
        "Starting {}x{} session with {} tile(s)",
        grid.rows(),
        grid.cols(),
        config.initial_tiles
    );

    let mut moves = 0u64;
    let mut stalled = 0usize;
    let mut cycle = config.moves.iter().cycle();
    while moves < config.max_moves && !grid.is_game_over() {
        let Some(&dir) = cycle.next() else { break };
        if grid.play(dir)? {
            moves += 1;
            stalled = 0;
            debug!("move {moves}: {dir:?}, score {}", grid.score());
        } else {
            stalled += 1;
            // Every direction in the cycle failed to change the board.
            if stalled >= config.moves.len() {
                break;
            }
        }
    }

    let events = *tally.borrow();
    ensure!(
        events.live_tiles() == grid.tiles().count() as u64,
        "event stream disagrees with the grid: {} live tiles announced, {} present",
        events.live_tiles(),
        grid.tiles().count()
    );

    Ok(SessionSummary {
        moves,
        score: grid.score(),
        highest_tile: grid.highest_tile(),
        game_over: grid.is_game_over(),
        events,
        grid,
    })
}
