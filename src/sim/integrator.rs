//! Fixed-step drag integrator
//!
//! Quadratic drag opposing velocity, normalized by mass:
//! `a = (0, -g) - (drag / mass) * |v| * v`
//!
//! Semi-implicit Euler: velocity first, then position from the new velocity.

use glam::DVec2;

use super::state::Projectile;
use crate::consts::{PREDICTION_DT, PREDICTION_HORIZON_S};
use crate::error::{SimResult, require_positive};
use crate::settings::SimulationConfig;

/// Acceleration acting on a projectile moving at `vel`
#[inline]
pub fn acceleration(vel: DVec2, config: &SimulationConfig) -> DVec2 {
    let drag = vel * (config.drag * vel.length() / config.mass);
    DVec2::new(-drag.x, -config.gravity - drag.y)
}

/// Advance the projectile by one fixed step
pub fn step(projectile: &mut Projectile, config: &SimulationConfig, dt: f64) {
    projectile.vel += acceleration(projectile.vel, config) * dt;
    projectile.pos += projectile.vel * dt;
    projectile.elapsed_s += dt;
}

/// Preview of a shot fired at `angle`, sampled every `PREDICTION_DT`
/// for up to `PREDICTION_HORIZON_S`. Stops before the first sample below
/// ground, so every point has `y >= 0`.
pub fn predict(config: &SimulationConfig, angle: f64) -> Vec<DVec2> {
    run_prediction(config, angle, PREDICTION_DT, PREDICTION_HORIZON_S)
}

/// `predict` with a caller-chosen step and horizon
pub fn predict_with(
    config: &SimulationConfig,
    angle: f64,
    dt: f64,
    horizon_s: f64,
) -> SimResult<Vec<DVec2>> {
    let dt = require_positive("dt", dt)?;
    let horizon_s = require_positive("horizon_s", horizon_s)?;
    Ok(run_prediction(config, angle, dt, horizon_s))
}

fn run_prediction(config: &SimulationConfig, angle: f64, dt: f64, horizon_s: f64) -> Vec<DVec2> {
    let mut projectile = Projectile::launch(config.mode, config.speed, angle);
    let steps = (horizon_s / dt).round() as usize;
    let mut points = Vec::with_capacity(steps.min(2048));

    for _ in 0..steps {
        step(&mut projectile, config, dt);
        if projectile.pos.y < 0.0 {
            break;
        }
        points.push(projectile.pos);
    }

    points
}

/// Fly `projectile` until it reaches the ground and return the x where its
/// path crosses y = 0 (linearly interpolated within the last step).
/// `Ok(None)` if it is still airborne after `max_time_s`.
pub fn landing_x(
    mut projectile: Projectile,
    config: &SimulationConfig,
    dt: f64,
    max_time_s: f64,
) -> SimResult<Option<f64>> {
    let dt = require_positive("dt", dt)?;
    let max_time_s = require_positive("max_time_s", max_time_s)?;

    let end = projectile.elapsed_s + max_time_s;
    while projectile.elapsed_s < end {
        let prev = projectile.pos;
        step(&mut projectile, config, dt);
        if projectile.pos.y <= 0.0 {
            let drop = prev.y - projectile.pos.y;
            if drop <= 0.0 {
                return Ok(Some(projectile.pos.x));
            }
            let t = prev.y / drop;
            return Ok(Some(prev.x + (projectile.pos.x - prev.x) * t));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::solver::{self, ArcChoice};
    use crate::sim::state::Mode;
    use proptest::prelude::*;

    fn config(speed: f64, drag: f64, mass: f64) -> SimulationConfig {
        SimulationConfig {
            gravity: 9.8,
            drag,
            mass,
            speed,
            mode: Mode::Target,
        }
    }

    /// Launch from ground level so the flat-ground range formula applies
    fn ground_launch(speed: f64, angle: f64) -> Projectile {
        Projectile {
            pos: DVec2::ZERO,
            ..Projectile::launch(Mode::Target, speed, angle)
        }
    }

    fn lands_at(projectile: Projectile, cfg: &SimulationConfig, dt: f64) -> f64 {
        landing_x(projectile, cfg, dt, 60.0)
            .expect("valid step")
            .expect("shot should come down")
    }

    #[test]
    fn test_step_is_semi_implicit() {
        let cfg = config(10.0, 0.0, 1.0);
        let mut p = ground_launch(10.0, 0.0);
        step(&mut p, &cfg, 0.1);
        // Velocity updated first, then position uses the new velocity
        assert!((p.vel.y - -0.98).abs() < 1e-12);
        assert!((p.pos.y - -0.098).abs() < 1e-12);
        assert!((p.pos.x - 1.0).abs() < 1e-12);
        assert!((p.elapsed_s - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let cfg = config(10.0, 0.1, 1.0);
        let a = acceleration(DVec2::new(10.0, 0.0), &cfg);
        assert!((a.x - -10.0).abs() < 1e-12);
        assert!((a.y - -9.8).abs() < 1e-12);

        let a = acceleration(DVec2::new(0.0, -10.0), &cfg);
        assert!((a.y - (-9.8 + 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_mass_scales_drag() {
        let light = config(30.0, 0.02, 1.0);
        let heavy = config(30.0, 0.02, 4.0);
        let v = DVec2::new(20.0, 5.0);
        let a_light = acceleration(v, &light);
        let a_heavy = acceleration(v, &heavy);
        assert!((a_light.x - 4.0 * a_heavy.x).abs() < 1e-12);
    }

    #[test]
    fn test_zero_drag_lands_at_solved_distance() {
        // Scenario: speed 20, gravity 9.8, target 30 m
        let angle = solver::solve_with(30.0, 20.0, 9.8, ArcChoice::Low).unwrap();
        let cfg = config(20.0, 0.0, 1.0);
        let x = lands_at(ground_launch(20.0, angle), &cfg, 1e-4);
        assert!((x - 30.0).abs() < 0.01, "landed at {x}");
    }

    #[test]
    fn test_zero_drag_high_arc_lands_at_solved_distance() {
        let angle = solver::solve(30.0, 20.0, 9.8).unwrap();
        let cfg = config(20.0, 0.0, 1.0);
        let x = lands_at(ground_launch(20.0, angle), &cfg, 1e-4);
        assert!((x - 30.0).abs() < 0.01, "landed at {x}");
    }

    #[test]
    fn test_landing_error_halves_with_step() {
        let angle = solver::solve_with(30.0, 20.0, 9.8, ArcChoice::Low).unwrap();
        let cfg = config(20.0, 0.0, 1.0);
        let err = |dt: f64| (lands_at(ground_launch(20.0, angle), &cfg, dt) - 30.0).abs();
        let coarse = err(4e-4);
        let fine = err(2e-4);
        assert!(fine < coarse);
        let ratio = coarse / fine;
        assert!((1.8..2.2).contains(&ratio), "ratio {ratio}");
        assert!(fine < 0.01);
    }

    #[test]
    fn test_drag_shortens_range() {
        let angle = 40f64.to_radians();
        let free = lands_at(ground_launch(30.0, angle), &config(30.0, 0.0, 1.0), 0.001);
        let dragged = lands_at(ground_launch(30.0, angle), &config(30.0, 0.01, 1.0), 0.001);
        let heavy = lands_at(ground_launch(30.0, angle), &config(30.0, 0.01, 5.0), 0.001);
        assert!(dragged < free);
        assert!(heavy > dragged && heavy < free);
    }

    #[test]
    fn test_prediction_stays_above_ground() {
        let cfg = config(25.0, 0.0, 1.0);
        let points = predict(&cfg, 45f64.to_radians());
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.y >= 0.0));
        // Launch point itself is not a sample
        assert!(points[0].x > 0.0);
        // Flight of ~3.7 s at 0.02 s per sample
        assert!(points.len() < 200);
    }

    #[test]
    fn test_prediction_respects_horizon() {
        // Near-vertical slow shot under weak gravity stays up past the horizon
        let cfg = SimulationConfig {
            gravity: 0.5,
            ..config(100.0, 0.0, 1.0)
        };
        let points = predict(&cfg, 85f64.to_radians());
        assert_eq!(points.len(), 1500);
    }

    #[test]
    fn test_prediction_uses_mode_launch_height() {
        let cfg = config(10.0, 0.0, 1.0).with_mode(Mode::Basket);
        let points = predict_with(&cfg, 0.0, 0.001, 1.0).unwrap();
        assert!((points[0].y - 1.6).abs() < 0.01);
    }

    #[test]
    fn test_non_positive_step_is_rejected() {
        let cfg = SimulationConfig::default();
        for dt in [0.0, -0.02, f64::NAN] {
            assert!(matches!(
                predict_with(&cfg, 0.5, dt, 1.0),
                Err(SimError::InvalidParameter { name: "dt", .. })
            ));
            assert!(matches!(
                landing_x(ground_launch(20.0, 0.5), &cfg, dt, 60.0),
                Err(SimError::InvalidParameter { name: "dt", .. })
            ));
        }
        assert!(predict_with(&cfg, 0.5, 0.02, 0.0).is_err());
        assert!(landing_x(ground_launch(20.0, 0.5), &cfg, 0.01, 0.0).is_err());
    }

    #[test]
    fn test_landing_x_gives_up_after_max_time() {
        let cfg = config(100.0, 0.0, 1.0);
        let p = ground_launch(100.0, 80f64.to_radians());
        assert_eq!(landing_x(p, &cfg, 0.01, 1.0).unwrap(), None);
    }

    proptest! {
        #[test]
        fn prop_horizontal_speed_never_grows(
            speed in 1.0f64..80.0,
            angle_deg in 1.0f64..89.0,
            drag in 0.0f64..0.05,
            mass in 0.2f64..10.0,
        ) {
            let cfg = config(speed, drag, mass);
            let mut p = ground_launch(speed, angle_deg.to_radians());
            let mut last_vx = p.vel.x;
            for _ in 0..200 {
                step(&mut p, &cfg, 0.016);
                prop_assert!(p.vel.x <= last_vx + 1e-12);
                prop_assert!(p.vel.x >= 0.0);
                last_vx = p.vel.x;
            }
        }
    }
}
