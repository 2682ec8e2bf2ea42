//! Shot session: aims, launches and drives one shot at a time
//!
//! The host calls `fire` with a config snapshot, then `advance(frame_dt)`
//! (or `tick()` for exactly one fixed step) every frame until the returned
//! phase is terminal. `reset` is safe to call at any point, mid-flight included.

use glam::DVec2;

use super::celebration::Celebration;
use super::integrator;
use super::scoring::{self, Resolution};
use super::solver::{self, Aim};
use super::state::{GameState, Projectile, ShotEvent, ShotPhase, TargetParams};
use crate::consts::*;
use crate::error::{SimError, SimResult, require_non_negative};
use crate::rounded_degrees;
use crate::settings::{Rules, Settings, SimulationConfig};

/// Owns all mutable shot and progress state
#[derive(Debug, Clone)]
pub struct Session {
    rules: Rules,
    /// Target placement as the host last set it
    target: TargetParams,
    /// Target placement captured at fire, used for the shot in flight
    flight_target: TargetParams,
    game: GameState,
    phase: ShotPhase,
    /// Config snapshot of the shot in flight
    flight_config: Option<SimulationConfig>,
    projectile: Option<Projectile>,
    path: Vec<DVec2>,
    prediction: Vec<DVec2>,
    /// Angle the preview is drawn at (radians): the last solved angle,
    /// rounded to whole degrees the way the angle readout shows it
    preview_angle: f64,
    last_aim: Option<Aim>,
    landing_distance_m: f64,
    accumulator: f64,
    celebration: Option<Celebration>,
    events: Vec<ShotEvent>,
}

impl Session {
    pub fn new(rules: Rules, target: TargetParams) -> SimResult<Self> {
        rules.validate()?;
        target.validate()?;
        Ok(Self {
            rules,
            target,
            flight_target: target,
            game: GameState::new(rules.starting_lives),
            phase: ShotPhase::Idle,
            flight_config: None,
            projectile: None,
            path: Vec::new(),
            prediction: Vec::new(),
            preview_angle: rules.retry.fallback_angle_deg.to_radians(),
            last_aim: None,
            landing_distance_m: 0.0,
            accumulator: 0.0,
            celebration: None,
            events: Vec::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> SimResult<Self> {
        Self::new(settings.rules, settings.target)
    }

    /// Auto-aim at the mode's target and launch.
    ///
    /// Returns `Ok(None)` without touching any state if a shot is already in
    /// flight. An invalid config fails fast, also without touching state.
    pub fn fire(&mut self, config: SimulationConfig) -> SimResult<Option<Aim>> {
        if self.reject_if_in_flight() {
            return Ok(None);
        }
        config.validate()?;

        let distance = self.target.aim_distance(config.mode);
        let aim = solver::aim(
            distance,
            config.speed,
            config.gravity,
            self.rules.arc,
            &self.rules.retry,
        );
        self.launch(config, aim);
        Ok(Some(aim))
    }

    /// Launch at a caller-chosen angle (radians), skipping the solver
    pub fn fire_with_angle(&mut self, config: SimulationConfig, angle: f64) -> SimResult<Option<Aim>> {
        if self.reject_if_in_flight() {
            return Ok(None);
        }
        config.validate()?;
        if !angle.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "angle",
                value: angle,
                reason: "must be finite",
            });
        }

        let aim = Aim {
            angle,
            speed: config.speed,
            boosts: 0,
            fallback: false,
        };
        self.launch(config, aim);
        Ok(Some(aim))
    }

    fn reject_if_in_flight(&mut self) -> bool {
        if self.projectile.is_some() {
            log::debug!("Fire ignored, shot already in flight");
            self.events.push(ShotEvent::Rejected);
            true
        } else {
            false
        }
    }

    fn launch(&mut self, config: SimulationConfig, aim: Aim) {
        let projectile = Projectile::launch(config.mode, aim.speed, aim.angle);

        self.preview_angle = rounded_degrees(aim.angle).to_radians();
        // Preview is drawn with the configured speed, not the boosted one
        self.prediction = integrator::predict(&config, self.preview_angle);
        self.path.clear();
        self.path.push(projectile.pos);

        self.flight_target = self.target;
        self.flight_config = Some(config);
        self.projectile = Some(projectile);
        self.phase = ShotPhase::InFlight;
        self.last_aim = Some(aim);
        self.accumulator = 0.0;

        log::info!(
            "Fired ({}) at {:.1}° and {:.2} m/s after {} boost(s){}",
            config.mode.as_str(),
            aim.angle.to_degrees(),
            aim.speed,
            aim.boosts,
            if aim.fallback { ", fallback angle" } else { "" }
        );
        self.events.push(ShotEvent::Launched {
            angle: aim.angle,
            speed: aim.speed,
            boosts: aim.boosts,
            fallback: aim.fallback,
        });
    }

    /// Run exactly one fixed `SHOT_DT` step of the shot in flight
    pub fn tick(&mut self) -> ShotPhase {
        let (Some(projectile), Some(config)) = (self.projectile.as_mut(), self.flight_config) else {
            return self.phase;
        };

        integrator::step(projectile, &config, SHOT_DT);
        if !projectile.pos.is_finite() || !projectile.vel.is_finite() {
            log::warn!(
                "Shot diverged after {:.2} s, abandoning",
                projectile.elapsed_s
            );
            self.events.push(ShotEvent::Abandoned);
            self.finish(ShotPhase::Abandoned);
            return self.phase;
        }
        self.path.push(projectile.pos);

        let first_new_event = self.events.len();
        let resolution = scoring::evaluate(
            projectile,
            &mut self.flight_target,
            &self.rules,
            &mut self.game,
            &mut self.events,
        );

        match resolution {
            Resolution::InFlight => {}
            Resolution::Scored => {
                self.celebration = Some(Celebration::new());
                self.finish(ShotPhase::Scored);
            }
            Resolution::Landed { distance, .. } => {
                self.landing_distance_m = distance;
                if self.events[first_new_event..].contains(&ShotEvent::GameReset) {
                    self.target.target_distance_m = self.flight_target.target_distance_m;
                }
                self.finish(ShotPhase::Landed);
            }
        }

        self.phase
    }

    fn finish(&mut self, phase: ShotPhase) {
        self.projectile = None;
        self.flight_config = None;
        self.accumulator = 0.0;
        self.phase = phase;
    }

    /// Advance by a frame's worth of wall-clock time in fixed steps.
    /// Also drives the celebration tween on its own timer.
    pub fn advance(&mut self, frame_dt: f64) -> ShotPhase {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        if let Some(celebration) = self.celebration.as_mut() {
            if !celebration.advance(frame_dt) {
                self.celebration = None;
            }
        }

        if self.projectile.is_none() {
            return self.phase;
        }

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SHOT_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SHOT_DT;
            substeps += 1;
            if self.tick().is_terminal() {
                break;
            }
        }

        self.phase
    }

    /// Drop the shot in flight and all progress. Idempotent.
    pub fn reset(&mut self) {
        self.projectile = None;
        self.flight_config = None;
        self.phase = ShotPhase::Idle;
        self.path.clear();
        self.prediction.clear();
        self.game.reset(self.rules.starting_lives);
        self.target.target_distance_m = DEFAULT_TARGET_DISTANCE_M;
        self.flight_target = self.target;
        self.landing_distance_m = 0.0;
        self.accumulator = 0.0;
        self.celebration = None;
        log::info!("Session reset");
    }

    /// Recompute the preview for `config` at the current preview angle
    pub fn preview(&mut self, config: &SimulationConfig) -> SimResult<&[DVec2]> {
        config.validate()?;
        self.prediction = integrator::predict(config, self.preview_angle);
        Ok(self.prediction.as_slice())
    }

    /// Set the angle (radians) the preview is drawn at
    pub fn set_preview_angle(&mut self, angle: f64) -> SimResult<()> {
        if !angle.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "angle",
                value: angle,
                reason: "must be finite",
            });
        }
        self.preview_angle = angle;
        Ok(())
    }

    /// Move the ring. Takes effect from the next shot.
    pub fn set_ring_x(&mut self, ring_x_m: f64) -> SimResult<()> {
        self.target.ring_x_m = require_non_negative("ring_x_m", ring_x_m)?;
        Ok(())
    }

    /// Move the landing target. Takes effect from the next shot.
    pub fn set_target_distance(&mut self, distance_m: f64) -> SimResult<()> {
        self.target.target_distance_m = require_non_negative("target_distance_m", distance_m)?;
        Ok(())
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<ShotEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.projectile.is_some()
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    /// Traveled path of the current (or last) shot
    pub fn path(&self) -> &[DVec2] {
        &self.path
    }

    /// Preview path computed at the last fire or `preview` call
    pub fn prediction(&self) -> &[DVec2] {
        &self.prediction
    }

    pub fn preview_angle(&self) -> f64 {
        self.preview_angle
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn target(&self) -> &TargetParams {
        &self.target
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn last_aim(&self) -> Option<&Aim> {
        self.last_aim.as_ref()
    }

    /// Last solved angle in whole degrees, for the angle readout
    pub fn angle_deg(&self) -> Option<f64> {
        self.last_aim.map(|aim| rounded_degrees(aim.angle))
    }

    /// Where the last shot landed (0 after reset or before any landing)
    pub fn landing_distance_m(&self) -> f64 {
        self.landing_distance_m
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }
}
