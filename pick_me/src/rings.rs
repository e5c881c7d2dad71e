//! Ring presentation state.
//!
//! [`RingBoard`] is the presenter the session renders into: it keeps the
//! latest frame of every ring on screen.  The visualizer reads it once per
//! frame; the session never reads it back.

use std::collections::BTreeMap;

use pick_session::{ContactId, Position, Presenter, RingFrame};

// ════════════════════════════════════════════════════════════════════════════
// Colour palette — viridis, 256 entries
// ════════════════════════════════════════════════════════════════════════════

/// Viridis sampled at nine evenly spaced stops (index 0, 32, … 256).
const VIRIDIS_STOPS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

/// Map a palette index (0–255) to an ARGB colour.  Index 0 is deep purple,
/// 255 bright yellow.
pub fn viridis(index: usize) -> u32 {
    let t = index.min(255) as f32 / 255.0 * (VIRIDIS_STOPS.len() - 1) as f32;
    let lo = (t as usize).min(VIRIDIS_STOPS.len() - 2);
    let f = t - lo as f32;
    let (r0, g0, b0) = VIRIDIS_STOPS[lo];
    let (r1, g1, b1) = VIRIDIS_STOPS[lo + 1];
    let lerp = |a: u8, b: u8| (a as f32 * (1.0 - f) + b as f32 * f).round() as u32;
    0xFF000000 | (lerp(r0, r1) << 16) | (lerp(g0, g1) << 8) | lerp(b0, b1)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |shift: u32| {
        let ca = (a >> shift) & 0xFF;
        let cb = (b >> shift) & 0xFF;
        ((ca as f32 * (1.0 - t) + cb as f32 * t) as u32) << shift
    };
    0xFF000000 | lerp(16) | lerp(8) | lerp(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Ring geometry
// ════════════════════════════════════════════════════════════════════════════

/// Arc sweep for a progress value: a full circle at 100.
pub fn sweep_degrees(progress: f32) -> f32 {
    3.6 * progress.clamp(0.0, 100.0)
}

/// Point on a circle, measured clockwise from 12 o'clock (screen y grows down).
pub fn arc_point(center: Position, radius: f32, degrees: f32) -> Position {
    let rad = degrees.to_radians();
    [center[0] + radius * rad.sin(), center[1] - radius * rad.cos()]
}

// ════════════════════════════════════════════════════════════════════════════
// Ring / RingBoard
// ════════════════════════════════════════════════════════════════════════════

/// What is currently drawn for one contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub position: Position,
    pub progress: f32,
    pub color:    u32,
}

impl From<RingFrame> for Ring {
    fn from(frame: RingFrame) -> Self {
        Ring {
            position: frame.position,
            progress: frame.progress,
            color:    viridis(frame.color_index),
        }
    }
}

/// Every ring on screen, keyed by contact id.
#[derive(Debug, Default)]
pub struct RingBoard {
    rings: BTreeMap<ContactId, Ring>,
}

impl RingBoard {
    pub fn get(&self, id: ContactId) -> Option<&Ring> { self.rings.get(&id) }
    pub fn len(&self) -> usize { self.rings.len() }
    pub fn is_empty(&self) -> bool { self.rings.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&ContactId, &Ring)> { self.rings.iter() }
}

impl Presenter for RingBoard {
    fn draw(&mut self, frame: RingFrame) {
        self.rings.insert(frame.id, Ring::from(frame));
    }
    fn clear(&mut self, id: ContactId) {
        self.rings.remove(&id);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Halo — expanding highlight around the winner
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Halo {
    pub id:       ContactId,
    /// 0.0–1.0; drives radius and fade.
    pub progress: f32,
}

impl Halo {
    pub fn new(id: ContactId) -> Self { Halo { id, progress: 0.0 } }
    pub fn tick(&mut self) { self.progress = (self.progress + 0.03).min(1.0); }
    pub fn done(&self) -> bool { self.progress >= 1.0 }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: ContactId, progress: f32, color_index: usize) -> RingFrame {
        RingFrame { id, position: [10.0, 10.0], progress, color_index }
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0),   0xFF440154);
        assert_eq!(viridis(255), 0xFFFDE725);
        assert_eq!(viridis(999), viridis(255));
    }

    #[test]
    fn viridis_is_opaque_and_distinct() {
        let colors: Vec<u32> = (0..256).step_by(32).map(viridis).collect();
        for w in colors.windows(2) { assert_ne!(w[0], w[1]); }
        assert!(colors.iter().all(|c| c >> 24 == 0xFF));
    }

    #[test]
    fn sweep_is_clamped() {
        assert_eq!(sweep_degrees(50.0), 180.0);
        assert_eq!(sweep_degrees(150.0), 360.0);
        assert_eq!(sweep_degrees(-1.0), 0.0);
    }

    #[test]
    fn arc_starts_at_twelve_oclock() {
        let p = arc_point([100.0, 100.0], 10.0, 0.0);
        assert!((p[0] - 100.0).abs() < 1e-4 && (p[1] - 90.0).abs() < 1e-4);
        let q = arc_point([100.0, 100.0], 10.0, 90.0);
        assert!((q[0] - 110.0).abs() < 1e-4 && (q[1] - 100.0).abs() < 1e-4);
    }

    #[test]
    fn board_tracks_draw_and_clear() {
        let mut board = RingBoard::default();
        board.draw(frame(1, 5.0, 0));
        board.draw(frame(2, 5.0, 255));
        board.draw(frame(1, 6.0, 0));
        assert_eq!(board.len(), 2);
        assert_eq!(board.get(1).unwrap().progress, 6.0);
        assert_eq!(board.get(2).unwrap().color, viridis(255));
        board.clear(1);
        board.clear(1);
        assert!(board.get(1).is_none());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn halo_completes() {
        let mut h = Halo::new(3);
        for _ in 0..100 { h.tick(); }
        assert!(h.done());
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }
}
