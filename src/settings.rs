//! Shot configuration and scoring rules
//!
//! The host reads its input controls into a `SimulationConfig` snapshot at
//! shot start; the core never reaches back into the host mid-flight.
//! Persisted as JSON alongside the scoring rules and target placement.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult, require_non_negative, require_positive};
use crate::sim::solver::{ArcChoice, RetryPolicy};
use crate::sim::state::{Mode, TargetParams};

/// Physical parameters for one shot (immutable during flight)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravitational acceleration (m/s², > 0)
    pub gravity: f64,
    /// Quadratic drag coefficient (≥ 0)
    pub drag: f64,
    /// Projectile mass (kg, > 0). 1.0 recovers the unnormalized drag model.
    pub mass: f64,
    /// Launch speed (m/s, > 0)
    pub speed: f64,
    /// Play mode
    pub mode: Mode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            drag: 0.0,
            mass: 1.0,
            speed: 30.0,
            mode: Mode::Target,
        }
    }
}

impl SimulationConfig {
    /// Fail fast on inputs that would otherwise turn the flight into NaN
    pub fn validate(&self) -> SimResult<()> {
        require_positive("gravity", self.gravity)?;
        require_non_negative("drag", self.drag)?;
        require_positive("mass", self.mass)?;
        require_positive("speed", self.speed)?;
        Ok(())
    }

    /// Copy of this config with a different launch speed
    pub fn with_speed(self, speed: f64) -> Self {
        Self { speed, ..self }
    }

    /// Copy of this config with a different mode
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }
}

/// Scoring tolerances, awards and aiming policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Max |landing - target| that still counts as a hit (inclusive)
    pub landing_tolerance_m: f64,
    /// Capture window half-extent along x around the ring
    pub capture_half_width_m: f64,
    /// Capture window half-extent along y around the rim plane
    pub capture_half_height_m: f64,
    /// Capture requires vy strictly below this (near apex or descending)
    pub capture_max_vy: f64,
    /// Points for a ring capture
    pub basket_points: u64,
    /// Points for a landing within tolerance
    pub landing_points: u64,
    /// Whether missed landings cost a life
    pub lives_enabled: bool,
    /// Lives at session start and after a game reset
    pub starting_lives: u8,
    /// Which root of the angle solver to fire with
    pub arc: ArcChoice,
    /// Speed-boost retry policy when the target is out of reach
    pub retry: RetryPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            landing_tolerance_m: 6.0,
            capture_half_width_m: 0.6,
            capture_half_height_m: 0.5,
            capture_max_vy: 2.0,
            basket_points: 200,
            landing_points: 100,
            lives_enabled: true,
            starting_lives: STARTING_LIVES,
            arc: ArcChoice::High,
            retry: RetryPolicy::default(),
        }
    }
}

impl Rules {
    /// The simpler historical rule set: 5 m tolerance, no lives, low arc
    pub fn classic() -> Self {
        Self {
            landing_tolerance_m: 5.0,
            lives_enabled: false,
            arc: ArcChoice::Low,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        require_non_negative("landing_tolerance_m", self.landing_tolerance_m)?;
        require_non_negative("capture_half_width_m", self.capture_half_width_m)?;
        require_non_negative("capture_half_height_m", self.capture_half_height_m)?;
        if !self.capture_max_vy.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "capture_max_vy",
                value: self.capture_max_vy,
                reason: "must be finite",
            });
        }
        if self.lives_enabled && self.starting_lives == 0 {
            return Err(SimError::InvalidParameter {
                name: "starting_lives",
                value: 0.0,
                reason: "must be >= 1 when lives are enabled",
            });
        }
        self.retry.validate()
    }
}

/// Everything a session needs to start: shot config, rules, target placement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub config: SimulationConfig,
    pub rules: Rules,
    pub target: TargetParams,
}

impl Settings {
    pub fn validate(&self) -> SimResult<()> {
        self.config.validate()?;
        self.rules.validate()?;
        self.target.validate()
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SimError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Settings(e.to_string()))
    }

    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Could not load {}: {} - using defaults", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
