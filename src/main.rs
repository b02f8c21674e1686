mod display;
mod input;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use tracing_subscriber::EnvFilter;

use jump_mania::assets::SpriteSheet;
use jump_mania::audio::{Audio, Muted};
use jump_mania::clock::{MonotonicClock, RepeatingTimer};
use jump_mania::compute::SPAWN_INTERVAL_MS;
use jump_mania::config::Config;
use jump_mania::game::{Flow, Game, GameEvent, TITLE};
use jump_mania::score_store::ScoreStore;

use display::TerminalCanvas;
use input::KeyTracker;

#[derive(Debug, Parser)]
#[command(name = "jump_mania", about = "Endless-runner arcade game for the terminal")]
struct Args {
    /// RON config file (default: ./jump_mania.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where last/high scores are kept
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Sprite sheet to draw with
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Disable sound
    #[arg(long)]
    mute: bool,
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit event.  Any error escaping a frame ends the program.
fn game_loop<W: Write>(
    canvas: &mut TerminalCanvas<W>,
    game: &mut Game<ThreadRng>,
    audio: &mut Box<dyn Audio>,
    rx: &mpsc::Receiver<Event>,
    frame: Duration,
) -> Result<()> {
    let clock = MonotonicClock::start();
    let mut timer = RepeatingTimer::new(SPAWN_INTERVAL_MS, clock.now_ms());
    let mut keys = KeyTracker::new();

    loop {
        let frame_start = Instant::now();
        let now = clock.now_ms();
        keys.begin_frame();

        // Everything the reader thread delivered since the last frame.
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(Event::Resize(cols, rows)) => canvas.resize(cols, rows),
                Ok(ev) => events.extend(keys.feed(&ev)),
                Err(TryRecvError::Empty) => break,
                // Reader thread is gone: the terminal closed under us.
                Err(TryRecvError::Disconnected) => {
                    events.push(GameEvent::Quit);
                    break;
                }
            }
        }
        events.extend((0..timer.poll(now)).map(|_| GameEvent::SpawnTimer));

        if game.handle_events(events, now) == Flow::Quit {
            return Ok(());
        }
        game.frame(now, keys.jump_held(), canvas, audio)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn init_tracing(path: &Path) -> Result<()> {
    // stdout is the game screen, so logs go to a file.
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::discover(args.config.as_deref()).context("failed to load config")?;
    if let Some(scores) = &args.scores {
        config.score_path = scores.clone();
    }
    if let Some(assets) = &args.assets {
        config.assets_path = Some(assets.clone());
    }
    config.muted |= args.mute;
    Ok(config)
}

#[cfg(feature = "audio")]
fn open_audio(config: &Config) -> Result<Box<dyn Audio>> {
    if config.muted {
        return Ok(Box::new(Muted::default()));
    }
    let synth = jump_mania::audio::Synth::open(config.jump_volume, config.music_volume)
        .context("failed to open audio output")?;
    Ok(Box::new(synth))
}

#[cfg(not(feature = "audio"))]
fn open_audio(config: &Config) -> Result<Box<dyn Audio>> {
    if !config.muted {
        tracing::info!("built without the `audio` feature, running silent");
    }
    Ok(Box::new(Muted::default()))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config.log_path)?;
    tracing::info!(?config, "starting");

    // Resources load before the terminal is touched; any failure is fatal.
    let loaded = match &config.assets_path {
        Some(path) => SpriteSheet::load(path),
        None => SpriteSheet::bundled(),
    };
    let sheet = match loaded {
        Ok(sheet) => sheet,
        Err(err) => {
            tracing::error!(error = %err, "failed to load resources");
            return Err(err).context("failed to load resources");
        }
    };
    let mut audio = open_audio(&config)?;
    audio.start_music();

    let mut game = Game::new(ScoreStore::new(&config.score_path), rand::thread_rng());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::SetTitle(TITLE))?;

    // Ask for press/repeat/release kinds so a held jump key is known exactly.
    // If the terminal refuses, `KeyTracker` works from presses alone.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // `event::read` blocks, so it runs on its own thread and the frame loop
    // drains whatever has arrived with `try_recv`.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(out, sheet, cols, rows);
    let frame = Duration::from_millis(config.frame_millis());
    let result = game_loop(&mut canvas, &mut game, &mut audio, &rx, frame);

    // Runs on every exit from the loop, error or not.
    let out = canvas.writer();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match &result {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(err) => tracing::error!(error = %format!("{err:#}"), "fatal error, terminating"),
    }
    result
}
