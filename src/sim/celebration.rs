//! Score celebration tween
//!
//! Visual-only. Runs on its own fixed frame interval, independent of the
//! physics step, and stops itself after a fixed number of frames. It never
//! touches the projectile or game state.

use crate::consts::{CELEBRATION_FRAMES, CELEBRATION_FRAME_S};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celebration {
    frame: u32,
    accumulator: f64,
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            frame: 0,
            accumulator: 0.0,
        }
    }

    /// Advance one animation frame. Returns false once the budget is spent.
    pub fn tick(&mut self) -> bool {
        if self.frame < CELEBRATION_FRAMES {
            self.frame += 1;
        }
        !self.is_finished()
    }

    /// Advance by wall-clock time, ticking every `CELEBRATION_FRAME_S`
    pub fn advance(&mut self, dt: f64) -> bool {
        self.accumulator += dt.max(0.0);
        while self.accumulator >= CELEBRATION_FRAME_S && !self.is_finished() {
            self.accumulator -= CELEBRATION_FRAME_S;
            self.tick();
        }
        !self.is_finished()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= CELEBRATION_FRAMES
    }

    /// 0 at start, 1 when finished
    pub fn progress(&self) -> f64 {
        self.frame as f64 / CELEBRATION_FRAMES as f64
    }

    /// Pulse strength for the renderer: rises to 1 mid-animation, then back to 0
    pub fn intensity(&self) -> f64 {
        (self.progress() * std::f64::consts::PI).sin().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_frame_budget() {
        let mut c = Celebration::new();
        let mut ticks = 0;
        while c.tick() {
            ticks += 1;
        }
        assert_eq!(ticks + 1, CELEBRATION_FRAMES);
        assert!(c.is_finished());
        assert_eq!(c.progress(), 1.0);
        // Further ticks are no-ops
        assert!(!c.tick());
        assert_eq!(c.frame(), CELEBRATION_FRAMES);
    }

    #[test]
    fn test_advance_uses_own_interval() {
        let mut c = Celebration::new();
        assert!(c.advance(0.010));
        assert_eq!(c.frame(), 0);
        assert!(c.advance(0.010));
        assert_eq!(c.frame(), 1);
        // 0.64 s = 40 frames at 16 ms
        assert!(!c.advance(1.0));
        assert!(c.is_finished());
    }

    #[test]
    fn test_intensity_peaks_mid_animation() {
        let mut c = Celebration::new();
        assert_eq!(c.intensity(), 0.0);
        for _ in 0..CELEBRATION_FRAMES / 2 {
            c.tick();
        }
        assert!((c.intensity() - 1.0).abs() < 1e-9);
    }
}
