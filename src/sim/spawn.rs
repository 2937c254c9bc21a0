//! Spawn scheduling and difficulty progression
//!
//! Ships and coins arrive on per-tick countdowns. Ships get faster and more
//! frequent as the score climbs, bounded by a spawn-interval floor.

use glam::Vec2;
use rand::Rng;

use super::state::{Body, Entity, EntityKind, EntityStore, GameEvent};
use crate::audio::SoundEffect;
use crate::tuning::Tuning;

/// Ticks between ship spawns at the given score.
///
/// Non-increasing in score and never below `ship_min_interval`.
pub fn ship_spawn_interval(tuning: &Tuning, score: u64) -> u32 {
    let reduction = score / tuning.ship_interval_divisor.max(1);
    let interval = u64::from(tuning.ship_base_interval)
        .saturating_sub(reduction)
        .max(u64::from(tuning.ship_min_interval));
    u32::try_from(interval).unwrap_or(u32::MAX)
}

/// Base speed for ships spawned at the given score (before per-ship jitter)
pub fn ship_base_speed(tuning: &Tuning, score: u64) -> f32 {
    let steps = score / tuning.ship_speed_divisor.max(1);
    tuning.ship_base_speed + steps as f32 * tuning.ship_speed_increment
}

/// Countdown timers for ship and coin creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnScheduler {
    ship_timer: u32,
    coin_timer: u32,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ship_timer: ship_spawn_interval(tuning, 0),
            coin_timer: tuning.coin_interval,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Ticks until the next ship
    pub fn ship_timer(&self) -> u32 {
        self.ship_timer
    }

    /// Ticks until the next coin
    pub fn coin_timer(&self) -> u32 {
        self.coin_timer
    }

    /// Run both countdowns for one tick, spawning whatever comes due
    pub fn step(
        &mut self,
        score: u64,
        tuning: &Tuning,
        rng: &mut impl Rng,
        store: &mut EntityStore,
    ) {
        self.ship_timer = self.ship_timer.saturating_sub(1);
        if self.ship_timer == 0 {
            spawn_ship(store, rng, tuning, score);
            self.ship_timer = ship_spawn_interval(tuning, score);
        }

        self.coin_timer = self.coin_timer.saturating_sub(1);
        if self.coin_timer == 0 {
            spawn_coin(store, rng, tuning, None);
            self.coin_timer = tuning.coin_interval.max(1);
        }
    }

    /// Fire a harpoon from every ship whose shoot countdown ran out, then
    /// reload those ships. Call after entities have advanced.
    pub fn fire_harpoons(
        &self,
        tuning: &Tuning,
        rng: &mut impl Rng,
        store: &mut EntityStore,
        events: &mut Vec<GameEvent>,
    ) {
        let target = store.player().pos;
        let mut muzzles = Vec::new();

        for ship in store.iter_mut(EntityKind::Ship) {
            if let Body::Ship { shoot_timer, .. } = &mut ship.body {
                if *shoot_timer == 0 {
                    *shoot_timer = rng.random_range(tuning.ship_reload.0..=tuning.ship_reload.1);
                    muzzles.push((ship.pos, ship.size));
                }
            }
        }

        for (ship_pos, ship_size) in muzzles {
            let lead = (target - ship_pos) / tuning.harpoon_aim_divisor;
            let vel = Vec2::new(-tuning.harpoon_speed + lead.x, lead.y);
            let pos = Vec2::new(
                ship_pos.x - ship_size.x / 2.0 - tuning.harpoon_muzzle_offset,
                ship_pos.y,
            );
            store.spawn(Entity::harpoon(pos, tuning.harpoon_size(), vel));
            events.push(GameEvent::Sound(SoundEffect::Harpoon));
        }
    }
}

/// Random center height for an entity of the given height
fn spawn_height(tuning: &Tuning, rng: &mut impl Rng, height: f32) -> f32 {
    let lo = tuning.spawn_margin + height / 2.0;
    let hi = tuning.arena_height - tuning.spawn_margin - height / 2.0;
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        tuning.arena_height / 2.0
    }
}

/// Spawn a ship just past the right edge
pub fn spawn_ship(store: &mut EntityStore, rng: &mut impl Rng, tuning: &Tuning, score: u64) -> u32 {
    let size = tuning.ship_size();
    let pos = Vec2::new(
        tuning.arena_width + tuning.spawn_offset + size.x / 2.0,
        spawn_height(tuning, rng, size.y),
    );
    let jitter = rng.random_range(tuning.ship_speed_jitter.0..=tuning.ship_speed_jitter.1);
    let speed = ship_base_speed(tuning, score) + jitter;
    let shoot_timer = rng.random_range(tuning.ship_first_shot.0..=tuning.ship_first_shot.1);

    let id = store.spawn(Entity::ship(pos, size, speed, shoot_timer));
    log::debug!("Ship {} spawned at y={:.0} speed={:.2}", id, pos.y, speed);
    id
}

/// Spawn a coin at `at`, or just past the right edge at a random height
pub fn spawn_coin(
    store: &mut EntityStore,
    rng: &mut impl Rng,
    tuning: &Tuning,
    at: Option<Vec2>,
) -> u32 {
    let size = tuning.coin_size();
    let pos = at.unwrap_or_else(|| {
        Vec2::new(
            tuning.arena_width + tuning.spawn_offset + size.x / 2.0,
            spawn_height(tuning, rng, size.y),
        )
    });
    let speed = rng.random_range(tuning.coin_speed.0..=tuning.coin_speed.1);
    let glow_phase = rng.random_range(0.0..std::f32::consts::TAU);
    store.spawn(Entity::coin(pos, size, speed, glow_phase))
}

/// Burst of cosmetic particles
pub fn spawn_explosion(store: &mut EntityStore, rng: &mut impl Rng, tuning: &Tuning, at: Vec2) {
    let speed = tuning.particle_speed.abs();
    let (min_size, max_size) = tuning.particle_size;
    for _ in 0..tuning.explosion_particles {
        let vel = Vec2::new(
            rng.random_range(-speed..=speed),
            rng.random_range(-speed..=speed),
        );
        let size = Vec2::new(
            rng.random_range(min_size..=max_size),
            rng.random_range(min_size..=max_size),
        );
        store.spawn(Entity::particle(at, size, vel, tuning.particle_life));
    }
}
