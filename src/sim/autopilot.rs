//! Idle/demo mode - derives input from the current state so the game plays itself
//!
//! Priorities: dodge the nearest incoming harpoon, grab a close coin,
//! otherwise line up with the nearest ship. Fires whenever a ship is in lane.

use super::state::{Entity, EntityKind, GamePhase, GameState};
use super::tick::TickInput;

/// Minimum ticks between autopilot shots
const FIRE_COOLDOWN: u64 = 12;
/// How far ahead of the player a harpoon counts as a threat
const THREAT_RANGE: f32 = 220.0;
/// How far ahead a coin is worth chasing
const COIN_RANGE: f32 = 300.0;

pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.phase != GamePhase::Playing {
        return input;
    }

    let player = state.store.player();
    let front = player.rect().max.x;
    let ahead = |entity: &&Entity, range: f32| {
        entity.pos.x > player.pos.x && entity.pos.x - front < range
    };

    let threat = state
        .store
        .iter(EntityKind::Harpoon)
        .filter(|h| ahead(h, THREAT_RANGE))
        .filter(|h| (h.pos.y - player.pos.y).abs() < (player.size.y + h.size.y) / 2.0 + 10.0)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
    let coin = state
        .store
        .iter(EntityKind::Coin)
        .filter(|c| ahead(c, COIN_RANGE))
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
    let ship = state
        .store
        .iter(EntityKind::Ship)
        .filter(|s| s.pos.x > player.pos.x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let target_y = if let Some(harpoon) = threat {
        // Step out of the harpoon's path, toward the roomier side
        let room_above = player.rect().min.y;
        let room_below = state.tuning.arena_height - player.rect().max.y;
        if (harpoon.pos.y >= player.pos.y && room_above > 0.0) || room_below <= 0.0 {
            player.pos.y - player.size.y
        } else {
            player.pos.y + player.size.y
        }
    } else if let Some(coin) = coin {
        coin.pos.y
    } else if let Some(ship) = ship {
        ship.pos.y
    } else {
        state.tuning.arena_height / 2.0
    };

    let deadband = state.tuning.player_step;
    let dy = target_y - player.pos.y;
    input.up = dy < -deadband;
    input.down = dy > deadband;

    let home_x = state.tuning.player_start.0;
    input.left = player.pos.x > home_x + deadband;
    input.right = player.pos.x < home_x - deadband;

    input.fire = state.time_ticks % FIRE_COOLDOWN == 0
        && state
            .store
            .iter(EntityKind::Ship)
            .any(|s| s.pos.x > front && (s.pos.y - player.pos.y).abs() < s.size.y);

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_idle_when_game_over() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::GameOver;
        assert_eq!(autopilot_input(&state), TickInput::default());
    }

    #[test]
    fn test_dodges_incoming_harpoon() {
        let mut state = GameState::new(1, Tuning::default());
        let player = state.store.player().pos;
        let size = state.tuning.harpoon_size();
        state.store.spawn(Entity::harpoon(
            player + Vec2::new(200.0, 10.0),
            size,
            Vec2::new(-12.0, 0.0),
        ));

        let input = autopilot_input(&state);
        assert!(input.up);
        assert!(!input.down);
    }

    #[test]
    fn test_lines_up_and_fires_at_ship() {
        let mut state = GameState::new(1, Tuning::default());
        let player = state.store.player().pos;
        let size = state.tuning.ship_size();
        state
            .store
            .spawn(Entity::ship(player + Vec2::new(400.0, 20.0), size, 2.0, 100));

        let input = autopilot_input(&state);
        assert!(input.down);
        assert!(input.fire);
    }

    #[test]
    fn test_autopilot_scores_points() {
        let mut state = GameState::new(2024, Tuning::default());
        for _ in 0..3000 {
            let input = autopilot_input(&state);
            tick(&mut state, &input);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(state.score() > 0);
    }
}
