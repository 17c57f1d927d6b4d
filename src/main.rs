mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use battle_city::compute::{check_start_level, init_state, tick, Mode, Session};
use battle_city::config::Rules;
use battle_city::entities::Facing;
use battle_city::input::{Key, KeyState};
use battle_city::level::LevelDir;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Terminals without release events keep a key alive only
/// through OS auto-repeat (≥ 15 Hz), so 8 frames (≈130 ms) always bridges
/// two repeats.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(name = "battle_city", about = "Terminal Battle City")]
struct Cli {
    /// Directory holding the level layouts `1`, `2`, ...
    #[arg(long, default_value = "levels")]
    levels: PathBuf,

    /// Level to start from.
    #[arg(long, default_value_t = 1)]
    level: usize,

    /// Preselect two-player mode on the title screen.
    #[arg(long)]
    two_player: bool,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Key bindings ──────────────────────────────────────────────────────────────

fn bindings(code: &KeyCode) -> &'static [Key] {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => &[Key::Move(0, Facing::Up)],
        KeyCode::Char('d') | KeyCode::Char('D') => &[Key::Move(0, Facing::Right)],
        KeyCode::Char('s') | KeyCode::Char('S') => &[Key::Move(0, Facing::Down)],
        KeyCode::Char('a') | KeyCode::Char('A') => &[Key::Move(0, Facing::Left)],
        KeyCode::Char('f') | KeyCode::Char('F') => &[Key::Fire(0)],
        KeyCode::Up => &[Key::Move(1, Facing::Up), Key::ToggleMode],
        KeyCode::Right => &[Key::Move(1, Facing::Right)],
        KeyCode::Down => &[Key::Move(1, Facing::Down), Key::ToggleMode],
        KeyCode::Left => &[Key::Move(1, Facing::Left)],
        KeyCode::Enter => &[Key::Fire(1)],
        KeyCode::Char(' ') => &[Key::Start],
        _ => &[],
    }
}

/// Fold the raw key history into the logical keys for this frame.
fn key_state(key_frame: &HashMap<KeyCode, u64>, pressed: &[KeyCode], frame: u64) -> KeyState {
    let mut keys = KeyState::new();
    for (code, &last) in key_frame {
        if frame.saturating_sub(last) <= HOLD_WINDOW {
            for &key in bindings(code) {
                keys.hold(key);
            }
        }
    }
    for code in pressed {
        for &key in bindings(code) {
            keys.press(key);
        }
    }
    keys
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".battle_city_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        log::warn!("could not save high score: {}", err);
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: `key_frame` records the frame of the last press/repeat event
/// for every key, and `pressed` the keys that went down this frame. Both are
/// folded into a [`KeyState`] before each tick, so the simulation never sees
/// raw terminal events.
///
/// Terminals with keyboard enhancement send `Release` and keys are dropped at
/// once; classic terminals only send `Press`, and keys expire after
/// `HOLD_WINDOW` frames of silence.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    rules: &Rules,
    levels: &LevelDir,
    rng: &mut StdRng,
) -> Result<()> {
    let mut high_score = load_high_score();
    let fresh = || {
        let mut state = init_state(rules.clone(), cli.level);
        state.two_player = cli.two_player;
        state
    };
    let mut state: Session = fresh();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_mode = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain pending input events (non-blocking) ─────────────────────────
        let mut pressed = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.mode == Mode::GameOver =>
                        {
                            state = fresh();
                            continue;
                        }
                        _ => {}
                    }
                    key_frame.insert(code.clone(), frame);
                    pressed.push(code);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let keys = key_state(&key_frame, &pressed, frame);
        state = tick(&state, &keys, levels, rng)?;

        if state.mode == Mode::GameOver && state.score > high_score {
            high_score = state.score;
            save_high_score(high_score);
        }

        if last_mode != Some(state.mode) {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            last_mode = Some(state.mode);
        }
        display::render(out, &state, high_score)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let levels = LevelDir::open(&cli.levels)
        .with_context(|| format!("cannot load levels from {}", cli.levels.display()))?;
    let rules = Rules::default();
    check_start_level(&rules, &levels, cli.level)
        .with_context(|| format!("cannot start at level {}", cli.level))?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; unsupported terminals ignore the request.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame clock never stalls.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &cli, &rules, &levels, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
