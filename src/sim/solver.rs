//! Closed-form auto-aim solver
//!
//! For a flat-ground shot under gravity alone, range is `v² sin(2θ) / g`.
//! Inverting gives two roots per reachable distance: a low arc `θ` and a
//! high (lob) arc `π/2 - θ`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Which root of the range equation to fire with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArcChoice {
    /// Flat, fast trajectory
    Low,
    /// Steep lob
    #[default]
    High,
}

/// Both launch angles (radians) that reach the same distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRoots {
    pub low: f64,
    pub high: f64,
}

impl ArcRoots {
    pub fn pick(&self, arc: ArcChoice) -> f64 {
        match arc {
            ArcChoice::Low => self.low,
            ArcChoice::High => self.high,
        }
    }
}

/// Both solutions of the range equation, or `None` when the target is
/// unreachable (`d·g/v² > 1`) or the inputs are degenerate.
pub fn arc_roots(distance: f64, speed: f64, gravity: f64) -> Option<ArcRoots> {
    if !(distance.is_finite() && speed.is_finite() && gravity.is_finite()) {
        return None;
    }
    if distance < 0.0 || speed <= 0.0 || gravity <= 0.0 {
        return None;
    }

    let val = distance * gravity / (speed * speed);
    if val > 1.0 {
        return None;
    }

    let two_theta = val.asin();
    Some(ArcRoots {
        low: two_theta / 2.0,
        high: (PI - two_theta) / 2.0,
    })
}

/// Launch angle on the canonical (high) arc
pub fn solve(distance: f64, speed: f64, gravity: f64) -> Option<f64> {
    solve_with(distance, speed, gravity, ArcChoice::High)
}

/// Launch angle on the requested arc
pub fn solve_with(distance: f64, speed: f64, gravity: f64, arc: ArcChoice) -> Option<f64> {
    arc_roots(distance, speed, gravity).map(|roots| roots.pick(arc))
}

/// Speed-boost retry policy for unreachable targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Speed multiplier per retry
    pub multiplier: f64,
    /// Retries before giving up
    pub max_attempts: u32,
    /// Angle fired when every retry fails (degrees)
    pub fallback_angle_deg: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            multiplier: 1.1,
            max_attempts: 6,
            fallback_angle_deg: 45.0,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.multiplier.is_finite() && self.multiplier > 1.0) {
            return Err(SimError::InvalidParameter {
                name: "retry.multiplier",
                value: self.multiplier,
                reason: "must be a finite number > 1",
            });
        }
        if !(self.fallback_angle_deg.is_finite()
            && self.fallback_angle_deg > 0.0
            && self.fallback_angle_deg < 90.0)
        {
            return Err(SimError::InvalidParameter {
                name: "retry.fallback_angle_deg",
                value: self.fallback_angle_deg,
                reason: "must be between 0 and 90 degrees",
            });
        }
        Ok(())
    }
}

/// Resolved aim for a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    /// Launch angle (radians)
    pub angle: f64,
    /// Launch speed after any boosts (m/s)
    pub speed: f64,
    /// Number of speed boosts applied
    pub boosts: u32,
    /// True when no boost found a solution and the fallback angle was used
    pub fallback: bool,
}

/// Solve for `distance`, boosting speed on failure. Never fails: when the
/// retries run out the fallback angle is fired at the last boosted speed.
pub fn aim(
    distance: f64,
    speed: f64,
    gravity: f64,
    arc: ArcChoice,
    policy: &RetryPolicy,
) -> Aim {
    let mut speed = speed;
    if let Some(angle) = solve_with(distance, speed, gravity, arc) {
        return Aim {
            angle,
            speed,
            boosts: 0,
            fallback: false,
        };
    }

    for boost in 1..=policy.max_attempts {
        speed *= policy.multiplier;
        log::debug!(
            "Target {:.2} m out of reach, boost {} -> {:.3} m/s",
            distance,
            boost,
            speed
        );
        if let Some(angle) = solve_with(distance, speed, gravity, arc) {
            return Aim {
                angle,
                speed,
                boosts: boost,
                fallback: false,
            };
        }
    }

    log::warn!(
        "No solution for {:.2} m after {} boosts, firing at {}°",
        distance,
        policy.max_attempts,
        policy.fallback_angle_deg
    );
    Aim {
        angle: policy.fallback_angle_deg.to_radians(),
        speed,
        boosts: policy.max_attempts,
        fallback: true,
    }
}

/// Flat-ground range of a drag-free shot
pub fn ideal_range(speed: f64, angle: f64, gravity: f64) -> f64 {
    speed * speed * (2.0 * angle).sin() / gravity
}
