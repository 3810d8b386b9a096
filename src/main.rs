//! Requisite Run - terminal side-scroller.
//!
//! Presentation layer over the `requisite_run` simulation: reads keys, feeds
//! jump presses and fixed-length ticks into the run, and draws snapshots.

mod ui;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use requisite_run::{request_jump, reset_run, tick, ConfigError, LevelConfig, RunState};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Physics tick interval in milliseconds (~60 FPS).
const PHYSICS_TICK_MS: u64 = 16;

/// Clamp frame time so a stall does not fast-forward the run.
const MAX_FRAME_MS: u64 = 100;

/// Environment variable naming the log file. Unset means no logging.
const LOG_ENV: &str = "REQUISITE_RUN_LOG";

struct Options {
    level_path: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        level_path: None,
        seed: None,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--level" => {
                i += 1;
                let path = args.get(i).ok_or("--level requires a file")?;
                options.level_path = Some(path.clone());
            }
            "--seed" => {
                i += 1;
                let seed = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .ok_or("--seed requires a number")?;
                options.seed = Some(seed);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(options)
}

/// Log to the file named by `REQUISITE_RUN_LOG`, never to the terminal.
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(path)?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Interactive session: one run plus the clock that drives it.
struct App {
    run: RunState,
    rng: ChaCha8Rng,
    waiting_to_start: bool,
    /// Run clock at the last applied tick.
    clock_ms: u64,
    /// Time not yet consumed by whole ticks.
    accumulated_ms: u64,
}

impl App {
    fn new(config: LevelConfig, mut rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        let run = RunState::new(config, &mut rng)?;
        Ok(Self {
            run,
            rng,
            waiting_to_start: true,
            clock_ms: 0,
            accumulated_ms: 0,
        })
    }

    fn press_jump(&mut self) {
        if self.waiting_to_start {
            self.waiting_to_start = false;
            info!("run started");
            return;
        }
        request_jump(&mut self.run, self.clock_ms + self.accumulated_ms);
    }

    fn restart(&mut self) {
        reset_run(&mut self.run, &mut self.rng);
        self.waiting_to_start = true;
        self.clock_ms = 0;
        self.accumulated_ms = 0;
    }

    /// Step physics in fixed increments for `dt_ms` of wall time.
    fn advance(&mut self, dt_ms: u64) {
        if self.waiting_to_start || self.run.is_over() {
            return;
        }

        self.accumulated_ms += dt_ms.min(MAX_FRAME_MS);
        while self.accumulated_ms >= PHYSICS_TICK_MS {
            self.accumulated_ms -= PHYSICS_TICK_MS;
            self.clock_ms += PHYSICS_TICK_MS;
            let result = tick(&mut self.run);
            if result.outcome().is_some() {
                self.accumulated_ms = 0;
                break;
            }
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw_ui(frame, &app.run, app.waiting_to_start))?;

        if event::poll(Duration::from_millis(PHYSICS_TICK_MS))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    match key_event.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
                        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up => app.press_jump(),
                        _ => {}
                    }
                }
            }
        }

        let elapsed = last_frame.elapsed().as_millis() as u64;
        last_frame = Instant::now();
        app.advance(elapsed);
    }
}

fn main() -> io::Result<()> {
    let options = parse_args().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    init_logging()?;

    let config = match &options.level_path {
        Some(path) => LevelConfig::load(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{path}: {e}")))?,
        None => LevelConfig::default(),
    };
    let rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut app = App::new(config, rng)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
