//! Game session driver
//!
//! Wraps the deterministic simulation with the parts that touch the outside
//! world: quit handling and high score persistence on game over.

use crate::audio::MusicTrack;
use crate::highscores::HighScores;
use crate::persistence::ScoreStorage;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Whether the caller's loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// One play session: simulation state plus the high score store
#[derive(Debug)]
pub struct Session<S> {
    state: GameState,
    highscores: HighScores<S>,
}

impl<S: ScoreStorage> Session<S> {
    /// Start a session. Reads the stored high score once and queues the
    /// normal music track.
    pub fn new(seed: u64, tuning: Tuning, storage: S) -> Self {
        let highscores = HighScores::load(storage);
        let mut state = GameState::new(seed, tuning);
        state.events.push(GameEvent::Music(MusicTrack::Normal));
        log::info!(
            "Session started with seed {} (high score {})",
            seed,
            highscores.high_score()
        );
        Self { state, highscores }
    }

    /// Run one tick. Quit is honored before anything else.
    pub fn step(&mut self, input: &TickInput) -> LoopControl {
        if input.quit {
            log::info!("Quit requested at score {}", self.state.score());
            return LoopControl::Quit;
        }

        let before = self.state.phase;
        tick(&mut self.state, input);

        if before == GamePhase::Playing && self.state.phase == GamePhase::GameOver {
            let score = self.state.score();
            if self.highscores.save(score) {
                log::info!("Run ended with a new high score: {}", score);
            }
        }

        LoopControl::Continue
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.highscores.high_score())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn high_score(&self) -> u64 {
        self.highscores.high_score()
    }

    pub fn highscores(&self) -> &HighScores<S> {
        &self.highscores
    }
}
