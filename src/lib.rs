//! Lob Shot - projectile-motion simulation with an auto-aim solver
//!
//! Core modules:
//! - `sim`: Deterministic simulation (solver, drag integrator, scoring, shot session)
//! - `settings`: Per-shot configuration snapshot and scoring rules
//! - `scenario`: Seeded shot generator for demo/idle play
//! - `error`: Precondition violations
//!
//! Rendering, input widgets and UI text live outside this crate. The core only
//! consumes numeric configuration and produces positions, paths and events.

pub mod error;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::{Rules, Settings, SimulationConfig};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed live-flight timestep (~60 Hz)
    pub const SHOT_DT: f64 = 0.016;
    /// Maximum fixed steps per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta `advance` will accept before clamping
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Prediction preview timestep
    pub const PREDICTION_DT: f64 = 0.02;
    /// Prediction preview horizon (simulated seconds)
    pub const PREDICTION_HORIZON_S: f64 = 30.0;

    /// Launch heights per mode (meters)
    pub const TARGET_LAUNCH_HEIGHT_M: f64 = 1.0;
    pub const BASKET_LAUNCH_HEIGHT_M: f64 = 1.6;

    /// Height of the ring's capture plane (regulation rim)
    pub const RIM_HEIGHT_M: f64 = 3.05;

    /// Target distance restored on reset
    pub const DEFAULT_TARGET_DISTANCE_M: f64 = 100.0;
    /// Ring position used until the host moves it
    pub const DEFAULT_RING_X_M: f64 = 50.0;

    /// Session defaults
    pub const STARTING_LEVEL: u32 = 1;
    pub const STARTING_LIVES: u8 = 3;

    /// Celebration tween: frame interval and frame budget
    pub const CELEBRATION_FRAME_S: f64 = 0.016;
    pub const CELEBRATION_FRAMES: u32 = 40;
}

/// Velocity vector for a launch at `speed` along `angle` (radians above horizontal)
#[inline]
pub fn launch_velocity(speed: f64, angle: f64) -> DVec2 {
    DVec2::new(speed * angle.cos(), speed * angle.sin())
}

/// Radians to whole degrees, the way the angle readout displays them
#[inline]
pub fn rounded_degrees(angle: f64) -> f64 {
    angle.to_degrees().round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_launch_velocity_components() {
        let v = launch_velocity(10.0, FRAC_PI_4);
        assert!((v.x - v.y).abs() < 1e-12);
        assert!((v.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_rounded_degrees() {
        assert_eq!(rounded_degrees(FRAC_PI_4), 45.0);
        assert_eq!(rounded_degrees(0.3), 17.0);
    }
}
