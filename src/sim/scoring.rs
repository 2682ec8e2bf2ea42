//! Per-step terminal checks
//!
//! Called after every integration step. Ring capture is checked before ground
//! contact, and at most one of them resolves a shot in a given step.

use glam::DVec2;

use super::state::{GameState, Mode, Projectile, ShotEvent, ShotPhase, TargetParams};
use crate::consts::{DEFAULT_TARGET_DISTANCE_M, RIM_HEIGHT_M};
use crate::settings::Rules;

/// What the evaluator decided for this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Keep flying
    InFlight,
    /// Passed through the ring
    Scored,
    /// Touched the ground at `distance`
    Landed { distance: f64, hit: bool },
}

impl Resolution {
    pub fn phase(&self) -> ShotPhase {
        match self {
            Resolution::InFlight => ShotPhase::InFlight,
            Resolution::Scored => ShotPhase::Scored,
            Resolution::Landed { .. } => ShotPhase::Landed,
        }
    }
}

/// Axis-aligned capture box around the rim, plus the "not still rising
/// fast" velocity bound
pub fn in_capture_window(pos: DVec2, vel: DVec2, ring_x: f64, rules: &Rules) -> bool {
    (pos.x - ring_x).abs() < rules.capture_half_width_m
        && (pos.y - RIM_HEIGHT_M).abs() < rules.capture_half_height_m
        && vel.y < rules.capture_max_vy
}

/// Landing within tolerance of the target (inclusive)
pub fn landing_hits(distance: f64, target_distance: f64, rules: &Rules) -> bool {
    (distance - target_distance).abs() <= rules.landing_tolerance_m
}

/// Check the projectile's current state against the terminal conditions,
/// updating progress and emitting events on resolution.
pub fn evaluate(
    projectile: &mut Projectile,
    target: &mut TargetParams,
    rules: &Rules,
    game: &mut GameState,
    events: &mut Vec<ShotEvent>,
) -> Resolution {
    if projectile.mode == Mode::Basket
        && !projectile.scored
        && in_capture_window(projectile.pos, projectile.vel, target.ring_x_m, rules)
    {
        projectile.scored = true;
        game.award_score(rules.basket_points);
        log::info!(
            "Basket at x={:.2} (vy={:.2}) -> level {}, {} points",
            projectile.pos.x,
            projectile.vel.y,
            game.level,
            game.points
        );
        events.push(ShotEvent::Scored {
            points: game.points,
            level: game.level,
        });
        return Resolution::Scored;
    }

    if projectile.pos.y <= 0.0 {
        return land(projectile, target, rules, game, events);
    }

    Resolution::InFlight
}

/// Resolve the shot as a landing at the projectile's current x
pub fn land(
    projectile: &Projectile,
    target: &mut TargetParams,
    rules: &Rules,
    game: &mut GameState,
    events: &mut Vec<ShotEvent>,
) -> Resolution {
    let distance = projectile.pos.x;
    let hit = landing_hits(distance, target.target_distance_m, rules);
    events.push(ShotEvent::Landed { distance, hit });

    if hit {
        game.award_score(rules.landing_points);
        log::info!(
            "Landed at {:.2} m (target {:.2}) -> level {}, {} points",
            distance,
            target.target_distance_m,
            game.level,
            game.points
        );
    } else {
        log::info!(
            "Missed: landed at {:.2} m, target {:.2} m",
            distance,
            target.target_distance_m
        );
        if rules.lives_enabled {
            let exhausted = game.lose_life(rules.starting_lives);
            if exhausted {
                target.target_distance_m = DEFAULT_TARGET_DISTANCE_M;
                log::info!("Out of lives, game reset");
                events.push(ShotEvent::LifeLost { remaining: 0 });
                events.push(ShotEvent::GameReset);
            } else {
                log::info!("Life lost, {} remaining", game.lives);
                events.push(ShotEvent::LifeLost {
                    remaining: game.lives,
                });
            }
        }
    }

    Resolution::Landed { distance, hit }
}
