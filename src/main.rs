use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use meteor_shooter::assets::Assets;
use meteor_shooter::config::{Tuning, SESSION_SECONDS};
use meteor_shooter::display::{render, TerminalSurface};
use meteor_shooter::input::{Binding, HoldPolicy, Key};
use meteor_shooter::session::Session;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

#[derive(Parser, Debug)]
#[command(name = "meteor_shooter")]
#[command(about = "Shoot falling meteors before the clock runs out")]
struct Cli {
    /// Seed for meteor spawning (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Session length in seconds
    #[arg(long, default_value_t = SESSION_SECONDS)]
    duration: u32,
    /// Write logs to this file (filter with RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Text-art file drawn behind the play field
    #[arg(long)]
    background: Option<PathBuf>,
    /// Text-art file used for the ship
    #[arg(long)]
    ship_sprite: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // stderr belongs to the alternate screen, so logs only go to a file.
    let Some(path) = path else { return Ok(()) };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Each iteration drains pending key events
/// into the session, fires any due spawn/clock ticks, advances one frame and
/// redraws.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    surface: &mut TerminalSurface,
    assets: &Assets,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else { continue };
            let Some(binding) = Binding::from_event(code, modifiers) else { continue };
            match kind {
                KeyEventKind::Press if binding.key == Key::Quit => {
                    session.shutdown();
                    return Ok(());
                }
                KeyEventKind::Press => session.key_down(binding, frame_start),
                KeyEventKind::Repeat => session.key_repeat(binding),
                KeyEventKind::Release => session.key_up(binding),
            }
        }

        session.advance_timers(Instant::now());
        session.frame();

        surface.clear();
        render(surface, session.world(), assets);
        surface.present(out).context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let assets = Assets::load(cli.background.as_deref(), cli.ship_sprite.as_deref());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back to
    // hold expiry.  Pushing the flags only writes an escape sequence, so
    // support is queried first; this must happen before the reader thread
    // starts consuming events.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &cli, &assets, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    assets: &Assets,
    keyboard_enhanced: bool,
) -> Result<()> {
    let (cols, rows) = terminal::size().context("failed to read terminal size")?;
    let mut surface = TerminalSurface::new(cols, rows);
    let (width, height) = surface.viewport();

    let tuning = Tuning {
        session_seconds: cli.duration,
        ..Tuning::for_viewport(width, height)
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let policy = HoldPolicy::for_terminal(keyboard_enhanced);
    info!("terminal {cols}x{rows}, key releases reported: {keyboard_enhanced}");

    let mut session = Session::start(tuning, policy, rng, Instant::now())
        .context("terminal too small for the play field")?;
    game_loop(out, &mut session, &mut surface, assets, rx)
}
