//! Rendering layer.  All terminal I/O lives here.
//!
//! The renderer only sees a `Snapshot`; world rectangles (1280x800 pixels)
//! are scaled into the bordered play area of whatever terminal size we have.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::config::{Difficulty, SCREEN_HEIGHT, SCREEN_WIDTH};
use space_invaders::entities::{Avatar, BulletColor, BulletKind, PowerUpKind};
use space_invaders::session::SessionStatus;
use space_invaders::snapshot::{BossHud, PlayerHud, Snapshot, SpriteKind};
use space_invaders::types::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_BOSS: Color = Color::Red;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_SLOW_MOTION: Color = Color::Cyan;

/// Everything besides the snapshot that a frame needs.
pub struct Frame<'a> {
    pub snapshot: &'a Snapshot,
    pub difficulty: Difficulty,
    pub best_score: u32,
    pub paused: bool,
}

/// Terminal cell rectangle holding the play field (inside the border).
#[derive(Clone, Copy)]
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn from_terminal(width: u16, height: u16) -> Self {
        Viewport {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    /// Map a world point to a cell, or `None` when it falls outside.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(0.0..SCREEN_WIDTH).contains(&x) || !(0.0..SCREEN_HEIGHT).contains(&y) {
            return None;
        }
        let col = (x / SCREEN_WIDTH * self.cols as f32) as u16;
        let row = (y / SCREEN_HEIGHT * self.rows as f32) as u16;
        Some((self.left + col.min(self.cols - 1), self.top + row.min(self.rows - 1)))
    }

    fn center_cell(&self, bounds: &Rect) -> Option<(u16, u16)> {
        let c = bounds.center();
        self.cell(c.x, c.y)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::from_terminal(width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, frame, width)?;

    for sprite in &frame.snapshot.sprites {
        match sprite.kind {
            SpriteKind::Boss => draw_boss(out, &view, &sprite.bounds)?,
            kind => draw_glyph(out, &view, &sprite.bounds, kind)?,
        }
    }

    if let Some(boss) = &frame.snapshot.boss {
        draw_boss_bar(out, boss, width)?;
    }
    draw_controls_hint(out, height)?;

    if frame.snapshot.status == SessionStatus::GameOver {
        draw_game_over(out, frame, width, height)?;
    } else if frame.paused {
        draw_centered(out, &[("PAUSED - P to resume", Color::White)], width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame, width: u16) -> std::io::Result<()> {
    let snapshot = frame.snapshot;

    out.queue(cursor::MoveTo(1, 0))?;
    for (i, hud) in snapshot.players.iter().enumerate() {
        if i > 0 {
            out.queue(Print("  "))?;
        }
        draw_player_hud(out, hud)?;
    }

    let level_str = format!("[ {} ]", frame.difficulty.label().to_uppercase());
    let level_color = match frame.difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    let right = match snapshot.slow_motion {
        Some(progress) => format!("SLOW {:>3}%  {}", (progress * 100.0) as u32, level_str),
        None => format!("{:>5.0}s  {}", snapshot.elapsed, level_str),
    };
    out.queue(cursor::MoveTo(width.saturating_sub(right.chars().count() as u16 + 1), 0))?;
    out.queue(style::SetForegroundColor(if snapshot.slow_motion.is_some() {
        C_SLOW_MOTION
    } else {
        level_color
    }))?;
    out.queue(Print(right))?;
    Ok(())
}

fn draw_player_hud<W: Write>(out: &mut W, hud: &PlayerHud) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("{} {:>6} ", hud.name, hud.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!(
        "{}{}",
        "♥".repeat(hud.lives as usize),
        "·".repeat(hud.max_lives.saturating_sub(hud.lives) as usize)
    )))?;

    let effects = [
        (hud.shield, "S", Color::Blue),
        (hud.triple_shot, "T", Color::Green),
        (hud.fast_fire, "F", Color::Magenta),
    ];
    for (progress, tag, color) in effects {
        if progress > 0.0 {
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(format!(" {}{}", tag, (progress * 5.0).ceil() as u32)))?;
        }
    }
    if hud.shield_strength > 0 {
        out.queue(Print(format!("x{}", hud.shield_strength)))?;
    }
    Ok(())
}

fn draw_boss_bar<W: Write>(out: &mut W, boss: &BossHud, width: u16) -> std::io::Result<()> {
    let bar_width = (width / 3).max(10) as usize;
    let filled = (boss.ratio * bar_width as f32).round() as usize;
    let bar = format!(
        "BOSS [{}{}] {}/{}",
        "█".repeat(filled),
        " ".repeat(bar_width.saturating_sub(filled)),
        boss.health,
        boss.max_health
    );
    out.queue(cursor::MoveTo((width / 2).saturating_sub(bar.chars().count() as u16 / 2), 1))?;
    out.queue(style::SetForegroundColor(C_BOSS))?;
    out.queue(Print(bar))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    view: &Viewport,
    bounds: &Rect,
    kind: SpriteKind,
) -> std::io::Result<()> {
    let Some((col, row)) = view.center_cell(bounds) else {
        return Ok(());
    };
    let (glyph, color) = match kind {
        SpriteKind::Player { avatar, shielded, .. } => {
            (if shielded { "(▲)" } else { "/▲\\" }, avatar_color(avatar))
        }
        SpriteKind::Enemy { kind } => {
            const ENEMY_GLYPHS: [&str; 5] = ["«▼»", "(◎)", "<Ψ>", "[¤]", "{Ж}"];
            (ENEMY_GLYPHS[kind % ENEMY_GLYPHS.len()], enemy_color(kind))
        }
        SpriteKind::Bullet(kind) => match kind {
            BulletKind::Normal => ("║", Color::Cyan),
            BulletKind::FastFire => ("¦", Color::Magenta),
            BulletKind::TripleShot => ("|", Color::Green),
        },
        SpriteKind::EnemyBullet(color) => ("↓", bullet_color(color)),
        SpriteKind::PowerUp(kind) => match kind {
            PowerUpKind::Shield => ("◈", Color::Blue),
            PowerUpKind::TripleShot => ("★", Color::Yellow),
            PowerUpKind::SlowMotion => ("⧗", Color::Cyan),
        },
        SpriteKind::Explosion(progress) => (if progress > 0.5 { "✹" } else { "·" }, C_EXPLOSION),
        SpriteKind::Boss => ("B", C_BOSS),
    };

    let half = glyph.chars().count() as u16 / 2;
    out.queue(cursor::MoveTo(col.saturating_sub(half).max(view.left), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// The boss is big enough to be drawn as a filled block.
fn draw_boss<W: Write>(out: &mut W, view: &Viewport, bounds: &Rect) -> std::io::Result<()> {
    let (Some((left, top)), Some((right, bottom))) = (
        view.cell(bounds.x.max(0.0), bounds.y.max(0.0)),
        view.cell(
            (bounds.x + bounds.w).min(SCREEN_WIDTH - 1.0),
            (bounds.y + bounds.h).min(SCREEN_HEIGHT - 1.0),
        ),
    ) else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(C_BOSS))?;
    for row in top..=bottom {
        out.queue(cursor::MoveTo(left, row))?;
        let body = if row == bottom { "▼" } else { "█" };
        out.queue(Print(body.repeat((right - left + 1) as usize)))?;
    }
    Ok(())
}

fn avatar_color(avatar: Avatar) -> Color {
    match avatar {
        Avatar::Blue => Color::Blue,
        Avatar::Green => Color::Green,
        Avatar::Red => Color::Red,
        Avatar::Yellow => Color::Yellow,
        Avatar::Purple => Color::Magenta,
    }
}

fn enemy_color(kind: usize) -> Color {
    match kind {
        0 => Color::Magenta,
        1 => Color::DarkGreen,
        2 => Color::DarkYellow,
        3 => Color::Red,
        _ => Color::Cyan,
    }
}

fn bullet_color(color: BulletColor) -> Color {
    match color {
        BulletColor::Purple => Color::Magenta,
        BulletColor::DarkGreen => Color::DarkGreen,
        BulletColor::Orange => Color::DarkYellow,
        BulletColor::Pink => Color::Red,
        BulletColor::SkyBlue => Color::Cyan,
        BulletColor::Blue => Color::Blue,
        BulletColor::DarkBlue => Color::DarkBlue,
    }
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "P1: ← → SPACE   P2: A D W   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    frame: &Frame,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score: u32 = frame.snapshot.players.iter().map(|p| p.score).sum();
    let new_best = score > frame.best_score && score > 0;

    let score_line = format!("Final Score: {:>6}", score);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", frame.best_score)
    };

    let lines = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  M - Menu  Q - Quit", Color::White),
    ];
    draw_centered(out, &lines, width, height)
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
