mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{error, info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::config::{Difficulty, GameConfig};
use space_invaders::entities::{Avatar, StartMod};
use space_invaders::input::{FrameInput, NavIntent, PlayerInput};
use space_invaders::progress::Profile;
use space_invaders::save::{SaveError, SaveStore};
use space_invaders::session::{Session, SessionSetup};

/// Longest simulated step; a stalled terminal must not teleport entities.
const MAX_DT: f32 = 0.1;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn nav_intent(code: KeyCode) -> NavIntent {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => NavIntent::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => NavIntent::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => NavIntent::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => NavIntent::Right,
        KeyCode::Enter | KeyCode::Char(' ') => NavIntent::Confirm,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => NavIntent::Back,
        _ => NavIntent::None,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum MenuRow {
    Mode,
    Difficulty,
    Avatar,
    SecondAvatar,
    StartMod,
}

const MENU_ROWS: [MenuRow; 5] = [
    MenuRow::Mode,
    MenuRow::Difficulty,
    MenuRow::Avatar,
    MenuRow::SecondAvatar,
    MenuRow::StartMod,
];

struct MenuState {
    row: usize,
    multiplayer: bool,
    difficulty: Difficulty,
    avatars: [Avatar; 2],
    start_mod: StartMod,
    message: Option<(String, Color)>,
}

impl Default for MenuState {
    fn default() -> Self {
        MenuState {
            row: 0,
            multiplayer: false,
            difficulty: Difficulty::Medium,
            avatars: [Avatar::Blue, Avatar::Blue],
            start_mod: StartMod::None,
            message: None,
        }
    }
}

impl MenuState {
    fn current(&self) -> MenuRow {
        MENU_ROWS[self.row]
    }

    fn setup(&self) -> SessionSetup {
        if self.multiplayer {
            SessionSetup::multiplayer(self.avatars[0], self.avatars[1], self.difficulty)
        } else {
            SessionSetup::single("Player", self.avatars[0], self.start_mod, self.difficulty)
        }
    }

    fn cycle(&mut self, step: isize) {
        fn next<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
            let at = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
            all[(at + step).rem_euclid(all.len() as isize) as usize]
        }
        match self.current() {
            MenuRow::Mode => self.multiplayer = !self.multiplayer,
            MenuRow::Difficulty => {
                self.difficulty = next(&Difficulty::ALL, self.difficulty, step)
            }
            MenuRow::Avatar => self.avatars[0] = next(&Avatar::ALL, self.avatars[0], step),
            MenuRow::SecondAvatar => self.avatars[1] = next(&Avatar::ALL, self.avatars[1], step),
            MenuRow::StartMod => self.start_mod = next(&StartMod::ALL, self.start_mod, step),
        }
    }

    /// Buy whatever locked item the cursor is on.
    fn purchase(&mut self, profile: &mut Profile) -> bool {
        let result = match self.current() {
            MenuRow::Avatar => profile.purchase_avatar(self.avatars[0]),
            MenuRow::SecondAvatar => profile.purchase_avatar(self.avatars[1]),
            MenuRow::StartMod => profile.purchase_mod(self.start_mod),
            MenuRow::Mode | MenuRow::Difficulty => return false,
        };
        match result {
            Ok(true) => {
                self.message = Some(("Unlocked!".to_string(), Color::Green));
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.message = Some((e.to_string(), Color::Red));
                false
            }
        }
    }

    fn locked_choice(&self, profile: &Profile) -> Option<String> {
        let players = if self.multiplayer { 2 } else { 1 };
        if let Some(avatar) =
            self.avatars[..players].iter().find(|a| !profile.is_avatar_unlocked(**a))
        {
            return Some(format!("{:?} avatar is locked (B to buy)", avatar));
        }
        if !self.multiplayer && !profile.is_mod_unlocked(self.start_mod) {
            return Some(format!("{:?} start mod is locked (B to buy)", self.start_mod));
        }
        None
    }
}

enum MenuResult {
    Start(SessionSetup),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    menu: &mut MenuState,
    profile: &mut Profile,
    store: &SaveStore,
) -> std::io::Result<MenuResult> {
    loop {
        draw_menu(out, menu, profile)?;

        let (code, kind) = match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => (code, kind),
            Ok(_) => continue,
            Err(_) => return Ok(MenuResult::Quit),
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        menu.message = None;

        if matches!(code, KeyCode::Char('b') | KeyCode::Char('B')) {
            if menu.purchase(profile) {
                if let Err(e) = store.save(profile) {
                    error!("Failed to save purchase: {}", e);
                }
            }
            continue;
        }

        match nav_intent(code) {
            NavIntent::Up => menu.row = (menu.row + MENU_ROWS.len() - 1) % MENU_ROWS.len(),
            NavIntent::Down => menu.row = (menu.row + 1) % MENU_ROWS.len(),
            NavIntent::Left => menu.cycle(-1),
            NavIntent::Right => menu.cycle(1),
            NavIntent::Confirm => match menu.locked_choice(profile) {
                Some(reason) => menu.message = Some((reason, Color::Red)),
                None => return Ok(MenuResult::Start(menu.setup())),
            },
            NavIntent::Back => return Ok(MenuResult::Quit),
            NavIntent::None => {}
        }
    }
}

fn draw_menu<W: Write>(out: &mut W, menu: &MenuState, profile: &Profile) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(18);

    let title = "★  SPACE  INVADERS  ★";
    out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), cy.saturating_sub(8)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let info = format!("Coins: {}   Best: {}", profile.coins, profile.best_score());
    out.queue(cursor::MoveTo(cx.saturating_sub(info.chars().count() as u16 / 2), cy.saturating_sub(7)))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(info))?;

    let lock = |unlocked: bool| if unlocked { "" } else { "  [locked, 30 coins]" };
    for (i, row) in MENU_ROWS.iter().enumerate() {
        let (label, value) = match row {
            MenuRow::Mode => (
                "Mode",
                if menu.multiplayer { "Two players".to_string() } else { "Single player".to_string() },
            ),
            MenuRow::Difficulty => ("Difficulty", menu.difficulty.label().to_string()),
            MenuRow::Avatar => (
                "Avatar P1",
                format!("{:?}{}", menu.avatars[0], lock(profile.is_avatar_unlocked(menu.avatars[0]))),
            ),
            MenuRow::SecondAvatar if menu.multiplayer => (
                "Avatar P2",
                format!("{:?}{}", menu.avatars[1], lock(profile.is_avatar_unlocked(menu.avatars[1]))),
            ),
            MenuRow::SecondAvatar => ("Avatar P2", "-".to_string()),
            MenuRow::StartMod if !menu.multiplayer => (
                "Start mod",
                format!("{:?}{}", menu.start_mod, lock(profile.is_mod_unlocked(menu.start_mod))),
            ),
            MenuRow::StartMod => ("Start mod", "-".to_string()),
        };
        let selected = i == menu.row;
        out.queue(cursor::MoveTo(left, cy.saturating_sub(4) + i as u16))?;
        out.queue(style::SetForegroundColor(if selected { Color::White } else { Color::DarkGrey }))?;
        out.queue(Print(format!("{} {:<11} < {} >", if selected { "▶" } else { " " }, label, value)))?;
    }

    if let Some((message, color)) = &menu.message {
        out.queue(cursor::MoveTo(left, cy + 2))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(message))?;
    }

    let stats = &profile.statistics;
    out.queue(cursor::MoveTo(left, cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(format!(
        "Games {}  Kills {}  Bosses {}  Avg {:.0}",
        stats.games_played,
        stats.total_kills,
        stats.boss_defeats,
        stats.average_score()
    )))?;
    for (i, entry) in profile.highscores.iter().take(3).enumerate() {
        out.queue(cursor::MoveTo(left, cy + 5 + i as u16))?;
        out.queue(Print(format!(
            "{}. {:<8} {:>6}  {:?}/{}",
            i + 1,
            entry.name,
            entry.score,
            entry.avatar,
            entry.difficulty.label()
        )))?;
    }

    out.queue(cursor::MoveTo(left, cy + 9))?;
    out.queue(Print("↑ ↓ : Select   ← → : Change   B : Buy   ENTER : Play   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopResult {
    Menu,
    Quit,
}

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key, and each frame every key still
/// "fresh" is applied at once.  This lets movement and shooting be held
/// together, and lets two players share one keyboard.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    profile: &mut Profile,
    store: &SaveStore,
    frame_time: Duration,
) -> std::io::Result<LoopResult> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut paused = false;
    let mut recorded = false;
    let mut best_score = profile.best_score();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(LoopResult::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopResult::Quit);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') if !session.is_over() => {
                            paused = !paused;
                            info!("{}", if paused { "Paused" } else { "Resumed" });
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if session.is_over() => {
                            session.restart();
                            recorded = false;
                            best_score = profile.best_score();
                        }
                        KeyCode::Char('m') | KeyCode::Char('M')
                            if session.is_over() || paused =>
                        {
                            session.clear_all();
                            return Ok(LoopResult::Menu);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32().min(MAX_DT);
        last = now;

        if !session.is_over() {
            let arrows = PlayerInput {
                left: is_held(&key_frame, &[KeyCode::Left], frame),
                right: is_held(&key_frame, &[KeyCode::Right], frame),
                shoot: is_held(&key_frame, &[KeyCode::Char(' '), KeyCode::Up], frame),
            };
            let wasd = PlayerInput {
                left: is_held(&key_frame, &[KeyCode::Char('a'), KeyCode::Char('A')], frame),
                right: is_held(&key_frame, &[KeyCode::Char('d'), KeyCode::Char('D')], frame),
                shoot: is_held(&key_frame, &[KeyCode::Char('w'), KeyCode::Char('W')], frame),
            };
            let input = if session.setup.is_multiplayer() {
                FrameInput { players: [arrows, wasd], pause: paused }
            } else {
                FrameInput {
                    pause: paused,
                    ..FrameInput::single(PlayerInput {
                        left: arrows.left || wasd.left,
                        right: arrows.right || wasd.right,
                        shoot: arrows.shoot || wasd.shoot,
                    })
                }
            };
            session.step(&input, dt, rng);
        }

        if session.is_over() && !recorded {
            recorded = true;
            let report = session.report();
            let earned = profile.record_session(&report);
            info!("Run finished: {} points, {} coins", report.total_score, earned);
            if let Err(e) = store.save(profile) {
                error!("Failed to save profile: {}", e);
            }
        }

        let snapshot = session.snapshot();
        display::render(
            out,
            &display::Frame {
                snapshot: &snapshot,
                difficulty: session.difficulty,
                best_score,
                paused,
            },
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let config = GameConfig::load_or_default();
    simple_logging::log_to_file(&config.log_path, LevelFilter::Info)?;
    info!("Starting with {:?}", config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events are only available on kitty-protocol terminals.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the game loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Exiting");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let store = SaveStore::new(&config.save_path);
    let mut profile = match store.load() {
        Ok(profile) => profile,
        Err(SaveError::Format(e)) => {
            warn!("Corrupt save file {}: {}, starting fresh", store.path().display(), e);
            match store.back_up() {
                Ok(backup) => warn!("Kept the unreadable save as {}", backup.display()),
                Err(e) => error!("Could not back up corrupt save: {}", e),
            }
            Profile::default()
        }
        Err(e) => {
            warn!("Could not load {}: {}, starting fresh", store.path().display(), e);
            Profile::default()
        }
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(config.target_fps));
    let mut menu = MenuState::default();

    loop {
        match show_menu(out, rx, &mut menu, &mut profile, &store)? {
            MenuResult::Quit => break,
            MenuResult::Start(setup) => {
                let mut session = Session::new(setup);
                let result =
                    game_loop(out, &mut session, rx, &mut rng, &mut profile, &store, frame_time)?;
                if let LoopResult::Quit = result {
                    break;
                }
            }
        }
    }
    Ok(())
}
