//! Tulkun Defense entry point
//!
//! Headless driver: loads settings, runs the simulation under a fixed-step
//! clock with the autopilot at the controls, and routes audio triggers to a
//! logging sink. Usage: `tulkun-defense [settings.json]`

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tulkun_defense::audio::{self, LogAudio};
use tulkun_defense::persistence::{JsonFileStorage, ScoreStorage};
use tulkun_defense::platform::FixedStepClock;
use tulkun_defense::sim::{GamePhase, TickInput, autopilot_input};
use tulkun_defense::{LoopControl, Session, Settings};

fn main() {
    env_logger::init();
    log::info!("Tulkun Defense (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tulkun.json"));
    let settings = Settings::load_from(&settings_path);

    let seed = settings.seed.unwrap_or_else(time_seed);
    let storage = JsonFileStorage::new(settings.highscore_path.clone());
    log::info!("High score file: {}", storage.path().display());
    let mut session = Session::new(seed, settings.tuning.clone(), storage);

    let mut sink = LogAudio::new(
        settings.master_volume,
        settings.sfx_volume,
        settings.music_volume,
    );
    sink.set_muted(settings.muted);

    let mut clock = FixedStepClock::new(settings.tick_seconds());
    let mut last_frame = Instant::now();
    let mut ticks_run: u64 = 0;
    let mut runs_finished: u32 = 0;

    'frames: loop {
        let ticks = if settings.realtime {
            let now = Instant::now();
            let elapsed = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;
            clock.advance(elapsed)
        } else {
            1
        };

        for _ in 0..ticks {
            let input = next_input(&session, &settings, ticks_run, runs_finished);
            let before = session.phase();
            if session.step(&input) == LoopControl::Quit {
                break 'frames;
            }
            ticks_run += 1;

            audio::dispatch(&mut sink, &session.drain_events());

            if before == GamePhase::Playing && session.phase() == GamePhase::GameOver {
                runs_finished += 1;
                log::info!(
                    "Run {} over: score {}, high score {}",
                    runs_finished,
                    session.score(),
                    session.high_score()
                );
            }
        }

        if settings.realtime {
            std::thread::sleep(Duration::from_secs_f32(clock.until_next_tick()));
        }
    }

    log::info!(
        "Exiting after {} ticks, {} runs; high score {}",
        ticks_run,
        runs_finished,
        session.high_score()
    );
}

/// Autopilot input plus the session-level commands: restart between runs,
/// quit once all runs are played or the tick budget is spent
fn next_input<S: ScoreStorage>(
    session: &Session<S>,
    settings: &Settings,
    ticks_run: u64,
    runs_finished: u32,
) -> TickInput {
    let out_of_ticks = settings.max_ticks.is_some_and(|max| ticks_run >= max);
    let out_of_runs = runs_finished >= settings.runs;

    if out_of_ticks || out_of_runs {
        return TickInput {
            quit: true,
            ..Default::default()
        };
    }
    if session.phase() == GamePhase::GameOver {
        return TickInput {
            restart: true,
            ..Default::default()
        };
    }
    autopilot_input(session.state())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
