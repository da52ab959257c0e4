#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use blockfall::Time;
use blockfall::app::{App, AppResult};
use blockfall::components::{GamePhase, GameState, Input};
use blockfall::config;
use blockfall::stats::StatsSink;
use blockfall::{systems, ui};
use crossterm::event::KeyCode;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it; the TUI owns the terminal
    let log_path = "blockfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .expect("Failed to create log file");

    let stderr_handle = std::io::stderr();
    let stderr_fd = stderr_handle.as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Blockfall");

    // Initialize configuration system
    match config::loader::load_config_from_file() {
        Ok(loaded) => {
            if let Ok(mut current) = config::CONFIG.write() {
                *current = loaded;
            }
            info!("Configuration loaded successfully");
        }
        Err(e) => {
            error!("Failed to load configuration: {e:?}");
            // Continue with default configuration
        }
    }

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(33); // ~30 FPS
    let game_tick_rate = Duration::from_millis(50); // Game logic updates less often

    let app = App::new();
    let res = run_app(&mut terminal, app, tick_rate, game_tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
    game_tick_rate: Duration,
) -> AppResult<()> {
    let mut last_render = Instant::now();
    let mut last_game_tick = Instant::now();

    // Session summaries go to the background history writer
    app.world.insert_resource(StatsSink::spawn_writer());

    // Explicitly flush any pending input events that might be in the buffer
    while crossterm::event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    // Set the hard_drop_released flag to true initially
    {
        let mut input = app.world.resource_mut::<Input>();
        input.hard_drop_released = true;
    }

    debug!("Resources initialized");

    loop {
        // Draw the UI
        if last_render.elapsed() >= tick_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        // Advance game systems
        if last_game_tick.elapsed() >= game_tick_rate {
            let delta_seconds = last_game_tick.elapsed().as_secs_f32();
            last_game_tick = Instant::now();

            {
                let mut time = app.world.resource_mut::<Time>();
                time.update();
            }

            if app.should_quit {
                return Ok(());
            }

            systems::input_system(&mut app.world);
            systems::game_tick_system(&mut app.world, delta_seconds);
        }

        // Process keyboard input
        if crossterm::event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");

                // Check for key release events
                if key.kind == event::KeyEventKind::Release {
                    let mut input = app.world.resource_mut::<Input>();
                    if key.code == KeyCode::Enter {
                        input.hard_drop_released = true;
                    }
                    continue; // Skip the rest of the input processing for release events
                }

                // Allow quitting with 'q' regardless of game state
                if key.code == KeyCode::Char('q') {
                    app.should_quit = true;
                    continue;
                }

                let phase = app.world.resource::<GameState>().phase;

                match key.code {
                    KeyCode::Enter => match phase {
                        // Enter starts a session outside of play and hard
                        // drops during it
                        GamePhase::NotStarted | GamePhase::GameOver => {
                            systems::start_game(&mut app.world);
                        }
                        GamePhase::Running => {
                            let mut input = app.world.resource_mut::<Input>();
                            if input.hard_drop_released {
                                input.hard_drop = true;
                                input.hard_drop_released = false;
                            }
                        }
                        GamePhase::Paused => {}
                    },
                    KeyCode::Char('r') => {
                        if config::Config::force_reload() {
                            info!("Configuration reloaded");
                        } else {
                            error!("Configuration reload failed");
                        }
                    }
                    KeyCode::Char('p') => {
                        let mut input = app.world.resource_mut::<Input>();
                        input.toggle_pause = true;
                    }
                    KeyCode::Left | KeyCode::Char('a') => {
                        let mut input = app.world.resource_mut::<Input>();
                        input.left = true;
                        input.right = false;
                    }
                    KeyCode::Right | KeyCode::Char('d') => {
                        let mut input = app.world.resource_mut::<Input>();
                        input.right = true;
                        input.left = false;
                    }
                    KeyCode::Down | KeyCode::Char('s') => {
                        let mut input = app.world.resource_mut::<Input>();
                        input.down = true;
                    }
                    KeyCode::Up | KeyCode::Char('w' | ' ') => {
                        let mut input = app.world.resource_mut::<Input>();
                        input.rotate = true;
                    }
                    _ => {}
                }
            }
        }
    }
}
