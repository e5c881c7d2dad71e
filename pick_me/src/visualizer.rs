//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │        ◜‾‾◝              ◜‾‾◝                                │
//! │       (  ● )  progress  ( ●  )   one ring per held contact   │
//! │        ◟__◞              ◟_                                  │
//! │                                                              │
//! │  status bar                                                  │
//! │  key legend                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the input adapter: mouse and digit keys are turned
//! into [`SimInput`] and sent to the simulation touch source.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use pick_session::Position;

use crate::error::AppError;
use crate::rings::{arc_point, blend, sweep_degrees, Halo, Ring, RingBoard};
use crate::touch::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 900;
pub const WIN_H:     usize = 600;
const STATUS_Y:      usize = WIN_H - 44;
const RING_RADIUS:   f32   = 55.0;
const RING_WIDTH:    f32   = 8.0;
const RING_SPACING:  f32   = 4.0;
const BG_COLOR:      u32   = 0xFF101018;
const TEXT_BG:       u32   = 0xFF1C1C2A;
const HALO_COLOR:    u32   = 0xFFFFD700;  // gold
const GLYPH_SCALE:   usize = 2;

const PIN_KEYS: [(u8, Key); 9] = [
    (1, Key::Key1), (2, Key::Key2), (3, Key::Key3),
    (4, Key::Key4), (5, Key::Key5), (6, Key::Key6),
    (7, Key::Key7), (8, Key::Key8), (9, Key::Key9),
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    mouse_down: bool,
    last_mouse: Option<Position>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Pick Me — hold a finger, wait for the pick",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            mouse_down: false,
            last_mouse: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keyboard and translate to SimInput events.
    /// Returns false once the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let pos  = self.window.get_mouse_pos(MouseMode::Clamp).map(|(x, y)| [x, y]);
        let down = self.window.get_mouse_down(MouseButton::Left);

        if let Some(p) = pos {
            if down && !self.mouse_down {
                let _ = self.sim_tx.send(SimInput::MouseDown(p));
            } else if pos != self.last_mouse {
                let _ = self.sim_tx.send(SimInput::MouseMove(p));
            }
            for (slot, key) in PIN_KEYS {
                if one_shot(key) {
                    let _ = self.sim_tx.send(SimInput::TogglePin { slot, position: p });
                }
            }
        }
        if !down && self.mouse_down {
            let _ = self.sim_tx.send(SimInput::MouseUp);
        }

        // A press outside the window is not a touch.
        self.mouse_down = down && (self.mouse_down || pos.is_some());
        self.last_mouse = pos;
        true
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        board:  &RingBoard,
        halo:   Option<&Halo>,
        status: &str,
    ) -> Result<(), AppError> {
        self.buf.fill(BG_COLOR);

        // ── Halo behind the winner ────────────────────────────────────────
        if let Some(h) = halo {
            if let Some(ring) = board.get(h.id) {
                self.draw_halo(ring, h.progress);
            }
        }

        // ── Rings ─────────────────────────────────────────────────────────
        for (_, ring) in board.iter() {
            self.draw_ring(ring);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 6, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "hold mouse = finger   1-9 = pin/unpin finger at cursor   q = quit",
            10, WIN_H - 16, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H)?;
        Ok(())
    }

    // ── Ring ──────────────────────────────────────────────────────────────

    fn draw_ring(&mut self, ring: &Ring) {
        let track = blend(ring.color, BG_COLOR, 0.8);
        self.draw_arc(ring.position, RING_RADIUS, RING_WIDTH, 360.0, track);
        self.draw_arc(ring.position, RING_RADIUS, RING_WIDTH, sweep_degrees(ring.progress), ring.color);
        let inner = RING_RADIUS - RING_WIDTH - RING_SPACING;
        self.fill_disc(ring.position, inner, ring.color);
    }

    fn draw_halo(&mut self, ring: &Ring, progress: f32) {
        let radius = RING_RADIUS + 6.0 + 40.0 * progress;
        let color  = blend(HALO_COLOR, BG_COLOR, progress);
        self.draw_arc(ring.position, radius, 3.0, 360.0, color);
    }

    /// Thick arc clockwise from 12 o'clock; `radius` is the outer edge.
    fn draw_arc(&mut self, center: Position, radius: f32, width: f32, degrees: f32, color: u32) {
        if degrees <= 0.0 { return; }
        let steps = (degrees * 2.0).ceil() as usize;
        let rings = (width * 2.0).ceil() as usize;
        for s in 0..=steps {
            let deg = (s as f32 * 0.5).min(degrees);
            for w in 0..rings {
                let p = arc_point(center, radius - w as f32 * 0.5, deg);
                self.set_pixel_f(p, color);
            }
        }
    }

    fn fill_disc(&mut self, center: Position, radius: f32, color: u32) {
        let r = radius.max(0.0);
        let r2 = r * r;
        let y0 = (center[1] - r).floor() as isize;
        let y1 = (center[1] + r).ceil() as isize;
        for y in y0..=y1 {
            let dy = y as f32 - center[1];
            let half = (r2 - dy * dy).max(0.0).sqrt();
            let x0 = (center[0] - half).ceil() as isize;
            let x1 = (center[0] + half).floor() as isize;
            for x in x0..=x1 {
                if x >= 0 && y >= 0 {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_f(&mut self, p: Position, color: u32) {
        if p[0] >= 0.0 && p[1] >= 0.0 {
            self.set_pixel(p[0].round() as usize, p[1].round() as usize, color);
        }
    }

    /// Minimal bitmap font — 3×5 glyphs drawn at `GLYPH_SCALE`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let advance = 4 * GLYPH_SCALE;
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > WIN_W { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(
                            cx + col * GLYPH_SCALE, y + row * GLYPH_SCALE,
                            GLYPH_SCALE, GLYPH_SCALE, color,
                        );
                    }
                }
            }
            cx += advance;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
