//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one frame deterministically
//! and drives the Playing/GameOver state machine.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::state::{Body, Entity, EntityKind, GameEvent, GamePhase, GameState};
use crate::audio::{MusicTrack, SoundEffect};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction flags (opposites cancel)
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire a sonic wave (edge-triggered)
    pub fire: bool,
    /// Start a new run (only honored on the game over screen)
    pub restart: bool,
    /// Leave the game (checked by the session driver)
    pub quit: bool,
}

impl TickInput {
    /// Movement direction with components in {-1, 0, 1}
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        if input.restart {
            restart(state);
        }
        return;
    }

    state.time_ticks += 1;

    move_player(state, input.direction());

    if input.fire {
        fire_wave(state);
    }

    let score = state.score();
    state
        .spawner
        .step(score, &state.tuning, &mut state.rng, &mut state.store);

    state.store.advance_all(&state.tuning);
    state.spawner.fire_harpoons(
        &state.tuning,
        &mut state.rng,
        &mut state.store,
        &mut state.events,
    );

    resolve_collisions(state);

    reap(state);

    if state.player_health() == 0 {
        game_over(state);
    }
}

/// Apply one step of movement and clamp the player inside the arena
fn move_player(state: &mut GameState, direction: Vec2) {
    let arena = state.tuning.arena_size();
    let player = state.store.player_mut();
    let step = match player.body {
        Body::Player { step, .. } => step,
        _ => 0.0,
    };

    let half = player.size * 0.5;
    let moved = player.pos + direction * step;
    player.pos = Vec2::new(
        moved.x.min(arena.x - half.x).max(half.x),
        moved.y.min(arena.y - half.y).max(half.y),
    );
}

/// Launch a sonic wave from the player's front edge
fn fire_wave(state: &mut GameState) {
    let player = state.store.player();
    let pos = Vec2::new(
        player.pos.x + player.size.x / 2.0 + state.tuning.wave_muzzle_offset,
        player.pos.y,
    );
    let wave = Entity::wave(pos, state.tuning.wave_speed, state.tuning.wave_start_radius);
    state.store.spawn(wave);
    state.events.push(GameEvent::Sound(SoundEffect::Wave));
}

/// Drop expired and off-screen entities
fn reap(state: &mut GameState) {
    let tuning = &state.tuning;
    for kind in EntityKind::ALL {
        let removed = state.store.retain(kind, |entity| {
            if !entity.pos.is_finite() {
                log::warn!("Dropping {:?} {} with invalid position", kind, entity.id);
                return false;
            }
            !entity.is_expired(tuning)
        });
        if removed > 0 && kind != EntityKind::Particle {
            log::trace!("Reaped {} {:?}", removed, kind);
        }
    }
}

/// Playing -> GameOver. Only reachable from Playing, so it fires once per run.
fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let score = state.score();
    state.events.push(GameEvent::GameOver { score });
    state.events.push(GameEvent::Music(MusicTrack::GameOver));
    log::info!("Game over after {} ticks, score {}", state.time_ticks, score);
}

/// GameOver -> Playing
fn restart(state: &mut GameState) {
    state.reset_run();
    state.events.push(GameEvent::Restarted);
    state.events.push(GameEvent::Music(MusicTrack::Normal));
    log::info!("Run restarted");
}
