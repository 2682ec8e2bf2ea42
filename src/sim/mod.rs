//! Deterministic simulation module
//!
//! All shot logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No rendering, input or platform dependencies
//! - Host reads state back and drains events; the core never calls out

pub mod celebration;
pub mod integrator;
pub mod scoring;
pub mod session;
pub mod solver;
pub mod state;

pub use celebration::Celebration;
pub use integrator::{acceleration, landing_x, predict, predict_with, step};
pub use scoring::{Resolution, evaluate, in_capture_window};
pub use session::Session;
pub use solver::{Aim, ArcChoice, ArcRoots, RetryPolicy, aim, arc_roots, solve, solve_with};
pub use state::{GameState, Mode, Projectile, ShotEvent, ShotPhase, TargetParams};
