//! Lob Shot headless runner
//!
//! Plays a seeded batch of shots through a `Session` at a simulated 60 fps
//! and logs every event. Rendering hosts drive `Session` the same way.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use lob_shot::scenario::ScenarioGenerator;
use lob_shot::sim::{Mode, Session, ShotEvent, ShotPhase};
use lob_shot::{Rules, Settings, SimResult};

/// Simulated display refresh
const FRAME_DT: f64 = 1.0 / 60.0;
/// Frames before the runner gives up on a shot (about half an hour of flight)
const MAX_FRAMES_PER_SHOT: u32 = 100_000;

#[derive(Parser, Debug)]
#[command(name = "lob-shot", version, about = "Play seeded Lob Shot scenarios headlessly")]
struct Args {
    /// Settings JSON file (missing file means defaults)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings to this path before playing
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Scenario seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of shots to play
    #[arg(long, default_value_t = 10)]
    shots: u32,

    /// Classic rules: 5 m tolerance, no lives, low arc
    #[arg(long)]
    classic: bool,
}

fn describe(event: &ShotEvent) -> String {
    match event {
        ShotEvent::Launched {
            angle,
            speed,
            boosts,
            fallback,
        } => {
            let mut text = format!("launched at {:.0}° / {:.2} m/s", angle.to_degrees(), speed);
            if *boosts > 0 {
                text.push_str(&format!(" ({boosts} boost(s))"));
            }
            if *fallback {
                text.push_str(" [fallback]");
            }
            text
        }
        ShotEvent::Rejected => "rejected (shot in flight)".to_string(),
        ShotEvent::Scored { points, level } => format!("BASKET! level {level}, {points} points"),
        ShotEvent::Landed { distance, hit } => {
            format!("landed at {distance:.2} m ({})", if *hit { "hit" } else { "miss" })
        }
        ShotEvent::LifeLost { remaining } => format!("life lost, {remaining} left"),
        ShotEvent::GameReset => "out of lives, game reset".to_string(),
        ShotEvent::Abandoned => "abandoned (flight diverged)".to_string(),
    }
}

fn run(args: Args) -> SimResult<()> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.classic {
        settings.rules = Rules::classic();
    }
    settings.validate()?;
    if let Some(path) = &args.save_settings {
        settings.save(path)?;
    }

    let mut session = Session::from_settings(&settings)?;
    let scenarios = ScenarioGenerator::new(args.seed);
    log::info!("Playing {} shots with seed {}", args.shots, args.seed);

    for (index, scenario) in scenarios.take(args.shots as usize).enumerate() {
        match scenario.mode {
            Mode::Target => session.set_target_distance(scenario.distance_m)?,
            Mode::Basket => session.set_ring_x(scenario.distance_m)?,
        }
        session.fire(scenario.config(settings.config))?;

        let mut phase = session.phase();
        let mut frames = 0;
        while !phase.is_terminal() && frames < MAX_FRAMES_PER_SHOT {
            phase = session.advance(FRAME_DT);
            frames += 1;
        }
        if phase == ShotPhase::InFlight {
            log::warn!("Shot {} abandoned after {} frames", index + 1, frames);
            session.reset();
        }

        println!(
            "Shot {:>2} [{} @ {:.1} m]",
            index + 1,
            scenario.mode.as_str(),
            scenario.distance_m
        );
        for event in session.drain_events() {
            println!("    {}", describe(&event));
        }
    }

    let game = session.game();
    println!(
        "\nLevel {} | Points {} | Lives {}",
        game.level, game.points, game.lives
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "lob-shot", "--seed", "7", "--shots", "3", "--classic", "--settings", "shots.json",
        ])
        .expect("arguments should parse");
        assert_eq!(args.seed, 7);
        assert_eq!(args.shots, 3);
        assert!(args.classic);
        assert_eq!(args.settings, Some(PathBuf::from("shots.json")));
        assert!(args.save_settings.is_none());
    }

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["lob-shot"]).expect("no flags is valid");
        assert_eq!(args.seed, 42);
        assert_eq!(args.shots, 10);
        assert!(!args.classic);
        assert!(args.settings.is_none());
    }

    #[test]
    fn help_is_reported() {
        let err = Args::try_parse_from(["lob-shot", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Args::try_parse_from(["lob-shot", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["lob-shot", "--shots"]).is_err());
        assert!(Args::try_parse_from(["lob-shot", "--bogus"]).is_err());
    }
}
