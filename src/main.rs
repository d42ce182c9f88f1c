use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    env,
    io::stdout,
    path::PathBuf,
    time::{Duration, Instant},
};

use blockfall::constants::{DEFAULT_SAVE_PATH, POLL_MS, TICK_MS};
use blockfall::game::{Direction, Game, GameEvent, Phase, TableSize};
use blockfall::input::{map_key, Command};
use blockfall::persistence::{load_game, save_game, DataAccessError};
use blockfall::ui::ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let save_path = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_SAVE_PATH.to_string()),
    );

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Save/load run on this runtime; the game loop blocks on them, so no
    // tick can interleave with a snapshot being written or applied.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut game = Game::new();
    let events = game.subscribe();
    game.new_game(TableSize::Medium);

    let mut status: Option<String> = None;
    let mut last_tick = Instant::now();

    // Game loop
    loop {
        terminal.draw(|f| ui(f, &game, status.as_deref()))?;

        if event::poll(Duration::from_millis(POLL_MS))? {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match map_key(code) {
                    Some(Command::Quit) => break,
                    Some(Command::MoveLeft) => game.shift(Direction::Left),
                    Some(Command::MoveRight) => game.shift(Direction::Right),
                    Some(Command::MoveDown) => game.shift(Direction::Down),
                    Some(Command::Rotate) => game.rotate(),
                    Some(Command::TogglePause) => match game.phase() {
                        Phase::Running => game.pause(),
                        Phase::Paused => {
                            game.resume();
                            last_tick = Instant::now();
                        }
                        _ => {}
                    },
                    Some(Command::NewGame) => {
                        status = None;
                        game.new_game(game.table_size());
                        last_tick = Instant::now();
                    }
                    Some(Command::Resize(size)) => {
                        status = None;
                        game.new_game(size);
                        last_tick = Instant::now();
                    }
                    Some(Command::Save) => {
                        let result = runtime.block_on(save_game(&save_path, &game.snapshot()));
                        status = Some(match result {
                            Ok(()) => format!("Saved to {}", save_path.display()),
                            Err(DataAccessError::FinishedGame) => {
                                "Nothing to save: the game is over".to_string()
                            }
                            Err(err) => {
                                log::warn!("save failed: {err}");
                                format!("Couldn't save the game: {err}")
                            }
                        });
                        last_tick = Instant::now();
                    }
                    Some(Command::Load) => {
                        status = Some(match runtime.block_on(load_game(&save_path)) {
                            Ok(snapshot) => match game.restore(&snapshot) {
                                Ok(()) => format!("Loaded {}", save_path.display()),
                                Err(err) => format!("Couldn't load the game: {err}"),
                            },
                            Err(err) => {
                                log::warn!("load failed: {err}");
                                format!("Couldn't load the game: {err}")
                            }
                        });
                        last_tick = Instant::now();
                    }
                    None => {}
                }
            }
        }

        // Timer-driven tick: one gravity step and clock second per interval
        if game.phase() == Phase::Running && last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            game.tick();
            last_tick = Instant::now();
        }

        while let Ok(event) = events.try_recv() {
            if let GameEvent::GameOver { elapsed_secs } = event {
                status = Some(format!("Game over after {elapsed_secs} seconds"));
            }
        }
    }

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
