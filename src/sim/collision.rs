//! Collision detection and resolution
//!
//! Runs once per tick after everything has moved. Three passes, each in
//! insertion order:
//! 1. waves against ships (distance vs. radius, one kill per wave per tick)
//! 2. harpoons against the player (rectangles)
//! 3. the player against coins (rectangles)

use glam::Vec2;

use super::spawn::{spawn_coin, spawn_explosion};
use super::state::{EntityKind, GameEvent, GameState};
use crate::audio::SoundEffect;

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Positions of ships destroyed by waves
    pub ships_destroyed: Vec<Vec2>,
    /// Harpoons that struck the player
    pub player_hits: u32,
    pub coins_collected: u32,
}

/// A wave reaches a ship when the center distance is strictly less than
/// `radius + padding`
#[inline]
pub fn wave_hits_ship(wave_pos: Vec2, wave_radius: f32, ship_pos: Vec2, padding: f32) -> bool {
    wave_pos.distance(ship_pos) < wave_radius + padding
}

/// Detect and resolve every interaction for this tick
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let GameState {
        store,
        rng,
        tuning,
        scoreboard,
        events,
        ..
    } = state;
    let mut report = CollisionReport::default();

    // --- WAVES vs SHIPS ---
    let mut doomed_ships: Vec<usize> = Vec::new();
    for wave in store.iter(EntityKind::Wave) {
        let Some(radius) = wave.radius() else {
            continue;
        };
        let hit = store
            .iter(EntityKind::Ship)
            .enumerate()
            .filter(|(index, _)| !doomed_ships.contains(index))
            .find(|(_, ship)| wave_hits_ship(wave.pos, radius, ship.pos, tuning.wave_ship_padding));
        if let Some((index, ship)) = hit {
            doomed_ships.push(index);
            report.ships_destroyed.push(ship.pos);
        }
    }
    store.remove_indices(EntityKind::Ship, &doomed_ships);

    for &pos in &report.ships_destroyed {
        scoreboard.award(tuning.ship_score);
        spawn_explosion(store, rng, tuning, pos);
        spawn_coin(store, rng, tuning, Some(pos));
        events.push(GameEvent::Sound(SoundEffect::Explosion));
        log::debug!("Ship destroyed at ({:.0}, {:.0})", pos.x, pos.y);
    }

    // --- HARPOONS vs PLAYER ---
    let player_rect = store.player().rect();
    let harpoon_hits: Vec<usize> = store
        .iter(EntityKind::Harpoon)
        .enumerate()
        .filter(|(_, harpoon)| harpoon.rect().intersects(&player_rect))
        .map(|(index, _)| index)
        .collect();
    store.remove_indices(EntityKind::Harpoon, &harpoon_hits);

    let player_pos = store.player().pos;
    for _ in &harpoon_hits {
        let health = store.player_mut().damage(1).unwrap_or(0);
        spawn_explosion(store, rng, tuning, player_pos);
        events.push(GameEvent::Sound(SoundEffect::Explosion));
        report.player_hits += 1;
        log::debug!("Player hit, health {}", health);
    }

    // --- PLAYER vs COINS ---
    let coin_hits: Vec<usize> = store
        .iter(EntityKind::Coin)
        .enumerate()
        .filter(|(_, coin)| coin.rect().intersects(&player_rect))
        .map(|(index, _)| index)
        .collect();
    store.remove_indices(EntityKind::Coin, &coin_hits);

    for _ in &coin_hits {
        scoreboard.award(tuning.coin_score);
        events.push(GameEvent::Sound(SoundEffect::Coin));
        report.coins_collected += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Body, Entity};
    use crate::tuning::Tuning;

    fn empty_state() -> GameState {
        GameState::new(42, Tuning::default())
    }

    fn add_wave(state: &mut GameState, pos: Vec2, radius: f32) {
        state.store.spawn(Entity::wave(pos, 18.0, radius));
    }

    fn add_ship(state: &mut GameState, pos: Vec2) -> u32 {
        let size = state.tuning.ship_size();
        state.store.spawn(Entity::ship(pos, size, 2.0, 100))
    }

    fn add_harpoon_on_player(state: &mut GameState) {
        let pos = state.store.player().pos;
        let size = state.tuning.harpoon_size();
        state
            .store
            .spawn(Entity::harpoon(pos, size, Vec2::new(-10.0, 0.0)));
    }

    #[test]
    fn test_wave_hits_ship_boundary() {
        let wave = Vec2::new(400.0, 300.0);
        assert!(wave_hits_ship(wave, 15.0, Vec2::new(450.0, 300.0), 40.0));
        assert!(wave_hits_ship(wave, 15.0, Vec2::new(454.9, 300.0), 40.0));
        assert!(!wave_hits_ship(wave, 15.0, Vec2::new(455.0, 300.0), 40.0));
        assert!(!wave_hits_ship(wave, 15.0, Vec2::new(400.0, 360.0), 40.0));
    }

    #[test]
    fn test_wave_destroys_ship_scenario() {
        let mut state = empty_state();
        add_wave(&mut state, Vec2::new(400.0, 300.0), 15.0);
        add_ship(&mut state, Vec2::new(450.0, 300.0));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.ships_destroyed, vec![Vec2::new(450.0, 300.0)]);
        assert_eq!(state.score(), 50);
        assert_eq!(state.store.len(EntityKind::Ship), 0);
        assert_eq!(state.store.len(EntityKind::Wave), 1, "waves survive hits");
        assert_eq!(state.store.len(EntityKind::Coin), 1);
        let coin = state.store.iter(EntityKind::Coin).next().unwrap();
        assert_eq!(coin.pos, Vec2::new(450.0, 300.0));
        assert_eq!(state.store.len(EntityKind::Particle), 30);
        assert!(state.events.contains(&GameEvent::Sound(SoundEffect::Explosion)));
    }

    #[test]
    fn test_ship_at_exact_reach_survives() {
        let mut state = empty_state();
        add_wave(&mut state, Vec2::new(400.0, 300.0), 15.0);
        add_ship(&mut state, Vec2::new(455.0, 300.0));

        let report = resolve_collisions(&mut state);

        assert!(report.ships_destroyed.is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.store.len(EntityKind::Ship), 1);
        assert_eq!(state.store.len(EntityKind::Coin), 0);
    }

    #[test]
    fn test_one_kill_per_wave_per_tick() {
        let mut state = empty_state();
        add_wave(&mut state, Vec2::new(500.0, 300.0), 30.0);
        let first = add_ship(&mut state, Vec2::new(520.0, 300.0));
        let second = add_ship(&mut state, Vec2::new(480.0, 300.0));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.ships_destroyed.len(), 1);
        assert_eq!(state.score(), 50);
        assert_eq!(state.store.len(EntityKind::Coin), 1);
        let survivors: Vec<u32> = state.store.iter(EntityKind::Ship).map(|s| s.id).collect();
        assert_eq!(survivors, vec![second], "insertion order decides, ship {} dies", first);
    }

    #[test]
    fn test_two_waves_split_two_ships() {
        let mut state = empty_state();
        add_wave(&mut state, Vec2::new(500.0, 300.0), 30.0);
        add_wave(&mut state, Vec2::new(505.0, 300.0), 30.0);
        add_ship(&mut state, Vec2::new(520.0, 300.0));
        add_ship(&mut state, Vec2::new(480.0, 300.0));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.ships_destroyed.len(), 2);
        assert_eq!(state.score(), 100);
        assert_eq!(state.store.len(EntityKind::Ship), 0);
        assert_eq!(state.store.len(EntityKind::Coin), 2);
    }

    #[test]
    fn test_harpoons_each_damage_player() {
        let mut state = empty_state();
        add_harpoon_on_player(&mut state);
        add_harpoon_on_player(&mut state);

        let report = resolve_collisions(&mut state);

        assert_eq!(report.player_hits, 2);
        assert_eq!(state.player_health(), 3);
        assert_eq!(state.store.len(EntityKind::Harpoon), 0);
        assert_eq!(state.store.len(EntityKind::Particle), 60);
    }

    #[test]
    fn test_health_never_underflows() {
        let mut state = empty_state();
        if let Body::Player { health, .. } = &mut state.store.player_mut().body {
            *health = 1;
        }
        add_harpoon_on_player(&mut state);
        add_harpoon_on_player(&mut state);

        resolve_collisions(&mut state);

        assert_eq!(state.player_health(), 0);
    }

    #[test]
    fn test_harpoon_missing_player_survives() {
        let mut state = empty_state();
        let size = state.tuning.harpoon_size();
        state
            .store
            .spawn(Entity::harpoon(Vec2::new(600.0, 50.0), size, Vec2::new(-10.0, 0.0)));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.player_hits, 0);
        assert_eq!(state.store.len(EntityKind::Harpoon), 1);
        assert_eq!(state.player_health(), 5);
    }

    #[test]
    fn test_coin_collection() {
        let mut state = empty_state();
        let player = state.store.player().pos;
        let size = state.tuning.coin_size();
        let far = state
            .store
            .spawn(Entity::coin(Vec2::new(700.0, 100.0), size, 2.0, 0.0));
        state.store.spawn(Entity::coin(player, size, 2.0, 0.0));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.coins_collected, 1);
        assert_eq!(state.score(), 10);
        let left: Vec<u32> = state.store.iter(EntityKind::Coin).map(|c| c.id).collect();
        assert_eq!(left, vec![far]);
        assert_eq!(state.events, vec![GameEvent::Sound(SoundEffect::Coin)]);
    }
}
