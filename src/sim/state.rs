//! Shot and session state types
//!
//! Everything the host reads back for display lives here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimResult, require_non_negative};
use crate::launch_velocity;

/// Play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Land as close as possible to a target distance
    #[default]
    Target,
    /// Drop the ball through a ring at rim height
    Basket,
}

impl Mode {
    /// Release height for this mode (meters)
    pub fn launch_height(&self) -> f64 {
        match self {
            Mode::Target => TARGET_LAUNCH_HEIGHT_M,
            Mode::Basket => BASKET_LAUNCH_HEIGHT_M,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Target => "target",
            Mode::Basket => "basket",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "target" => Some(Mode::Target),
            "basket" | "ring" => Some(Mode::Basket),
            _ => None,
        }
    }
}

/// Where the shot should end up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Landing target distance (Target mode)
    pub target_distance_m: f64,
    /// Ring horizontal position (Basket mode)
    pub ring_x_m: f64,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            target_distance_m: DEFAULT_TARGET_DISTANCE_M,
            ring_x_m: DEFAULT_RING_X_M,
        }
    }
}

impl TargetParams {
    pub fn validate(&self) -> SimResult<()> {
        require_non_negative("target_distance_m", self.target_distance_m)?;
        require_non_negative("ring_x_m", self.ring_x_m)?;
        Ok(())
    }

    /// Horizontal distance the solver aims for in `mode`
    pub fn aim_distance(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Target => self.target_distance_m,
            Mode::Basket => self.ring_x_m,
        }
    }
}

/// The projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Position (m)
    pub pos: DVec2,
    /// Velocity (m/s)
    pub vel: DVec2,
    pub mode: Mode,
    /// Passed through the ring this shot
    pub scored: bool,
    /// Simulated flight time (s)
    pub elapsed_s: f64,
}

impl Projectile {
    /// Spawn at the mode's launch point with the given speed and angle
    pub fn launch(mode: Mode, speed: f64, angle: f64) -> Self {
        Self {
            pos: DVec2::new(0.0, mode.launch_height()),
            vel: launch_velocity(speed, angle),
            mode,
            scored: false,
            elapsed_s: 0.0,
        }
    }
}

/// Progress across shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub level: u32,
    pub points: u64,
    /// Only meaningful when the rules enable lives
    pub lives: u8,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl GameState {
    pub fn new(starting_lives: u8) -> Self {
        Self {
            level: STARTING_LEVEL,
            points: 0,
            lives: starting_lives,
        }
    }

    /// Add points and advance a level
    pub fn award_score(&mut self, points: u64) {
        self.points += points;
        self.level += 1;
    }

    /// Take a life. Returns true when that was the last one and the game
    /// has been reset.
    pub fn lose_life(&mut self, starting_lives: u8) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.reset(starting_lives);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self, starting_lives: u8) {
        *self = Self::new(starting_lives);
    }
}

/// Where a shot is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotPhase {
    /// No shot has been fired since start or reset
    #[default]
    Idle,
    /// Projectile airborne
    InFlight,
    /// Passed through the ring (terminal)
    Scored,
    /// Touched the ground (terminal)
    Landed,
    /// Integration produced a non-finite state; no score change (terminal)
    Abandoned,
}

impl ShotPhase {
    /// True once the shot has resolved
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ShotPhase::Scored | ShotPhase::Landed | ShotPhase::Abandoned
        )
    }
}

/// Notifications for the host, drained after each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotEvent {
    /// Shot left the launcher
    Launched {
        angle: f64,
        speed: f64,
        boosts: u32,
        fallback: bool,
    },
    /// Fire ignored because a shot is already in flight
    Rejected,
    /// Ring capture
    Scored { points: u64, level: u32 },
    /// Ground contact at `distance`; `hit` if within tolerance
    Landed { distance: f64, hit: bool },
    /// A miss cost a life
    LifeLost { remaining: u8 },
    /// Lives exhausted, progress and target reset
    GameReset,
    /// Flight diverged numerically and was dropped
    Abandoned,
}
