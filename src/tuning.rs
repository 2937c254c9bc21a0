//! Data-driven game balance
//!
//! Every gameplay constant lives here so difficulty can be tuned from a
//! settings file without touching the simulation. Defaults reproduce the
//! classic arcade feel (800x600 arena, 60 ticks per second).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Vertical margin kept free when picking a spawn height
    pub spawn_margin: f32,
    /// Distance past the right edge where new ships and coins appear
    pub spawn_offset: f32,
    /// Leftward movers are reaped once their center passes `-exit_margin`
    pub exit_margin: f32,
    /// Waves are reaped once their center passes `arena_width + wave_exit_margin`
    pub wave_exit_margin: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Pixels moved per tick for each held direction
    pub player_step: f32,
    pub player_max_health: u8,
    /// Player center at session start and after restart
    pub player_start: (f32, f32),

    // === Ships ===
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_base_interval: u32,
    pub ship_min_interval: u32,
    /// Score needed to shave one tick off the spawn interval
    pub ship_interval_divisor: u64,
    pub ship_base_speed: f32,
    /// Score needed for each speed increment
    pub ship_speed_divisor: u64,
    pub ship_speed_increment: f32,
    /// Random bonus speed added to every new ship
    pub ship_speed_jitter: (f32, f32),
    /// Shoot countdown of a freshly spawned ship
    pub ship_first_shot: (u32, u32),
    /// Shoot countdown after each harpoon
    pub ship_reload: (u32, u32),

    // === Harpoons ===
    pub harpoon_width: f32,
    pub harpoon_height: f32,
    pub harpoon_speed: f32,
    /// Aim lead: velocity gained per pixel of offset toward the player
    pub harpoon_aim_divisor: f32,
    /// Gap between a ship's front edge and its harpoon
    pub harpoon_muzzle_offset: f32,

    // === Waves ===
    pub wave_speed: f32,
    pub wave_start_radius: f32,
    pub wave_growth: f32,
    /// Extra reach added to the wave radius when testing ships
    pub wave_ship_padding: f32,
    /// Gap between the player's front edge and a new wave
    pub wave_muzzle_offset: f32,

    // === Coins ===
    pub coin_size: f32,
    pub coin_interval: u32,
    pub coin_speed: (f32, f32),
    pub coin_glow_rate: f32,

    // === Particles ===
    pub explosion_particles: u32,
    pub particle_life: u32,
    pub particle_speed: f32,
    pub particle_size: (f32, f32),
    pub particle_gravity: f32,

    // === Scoring ===
    pub ship_score: u64,
    pub coin_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            spawn_margin: 80.0,
            spawn_offset: 50.0,
            exit_margin: 100.0,
            wave_exit_margin: 200.0,

            player_width: 200.0,
            player_height: 100.0,
            player_step: 5.0,
            player_max_health: 5,
            player_start: (200.0, ARENA_HEIGHT / 2.0),

            ship_width: 120.0,
            ship_height: 60.0,
            ship_base_interval: 120,
            ship_min_interval: 50,
            ship_interval_divisor: 150,
            ship_base_speed: 2.0,
            ship_speed_divisor: 400,
            ship_speed_increment: 0.6,
            ship_speed_jitter: (0.5, 2.0),
            ship_first_shot: (80, 160),
            ship_reload: (100, 200),

            harpoon_width: 40.0,
            harpoon_height: 10.0,
            harpoon_speed: 10.0,
            harpoon_aim_divisor: 150.0,
            harpoon_muzzle_offset: 20.0,

            wave_speed: 18.0,
            wave_start_radius: 15.0,
            wave_growth: 10.0,
            wave_ship_padding: 40.0,
            wave_muzzle_offset: 20.0,

            coin_size: 40.0,
            coin_interval: 150,
            coin_speed: (1.5, 3.5),
            coin_glow_rate: 0.15,

            explosion_particles: 30,
            particle_life: 50,
            particle_speed: 6.0,
            particle_size: (4.0, 10.0),
            particle_gravity: 0.3,

            ship_score: 50,
            coin_score: 10,
        }
    }
}

impl Tuning {
    /// Clamp values that would break the simulation (non-finite floats, zero
    /// divisors, inverted ranges, bodies larger than the arena, floor above
    /// the base interval).
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(positive(self.arena_width) && positive(self.arena_height)) {
            log::warn!(
                "Invalid arena {}x{}, using {}x{}",
                self.arena_width,
                self.arena_height,
                defaults.arena_width,
                defaults.arena_height
            );
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }

        finite_or(&mut self.spawn_margin, defaults.spawn_margin);
        finite_or(&mut self.spawn_offset, defaults.spawn_offset);
        finite_or(&mut self.exit_margin, defaults.exit_margin);
        finite_or(&mut self.wave_exit_margin, defaults.wave_exit_margin);
        finite_or(&mut self.player_step, defaults.player_step);
        finite_or(&mut self.ship_base_speed, defaults.ship_base_speed);
        finite_or(&mut self.ship_speed_increment, defaults.ship_speed_increment);
        finite_or(&mut self.harpoon_speed, defaults.harpoon_speed);
        finite_or(&mut self.harpoon_aim_divisor, defaults.harpoon_aim_divisor);
        finite_or(&mut self.harpoon_muzzle_offset, defaults.harpoon_muzzle_offset);
        finite_or(&mut self.wave_speed, defaults.wave_speed);
        finite_or(&mut self.wave_start_radius, defaults.wave_start_radius);
        finite_or(&mut self.wave_growth, defaults.wave_growth);
        finite_or(&mut self.wave_ship_padding, defaults.wave_ship_padding);
        finite_or(&mut self.wave_muzzle_offset, defaults.wave_muzzle_offset);
        finite_or(&mut self.coin_glow_rate, defaults.coin_glow_rate);
        finite_or(&mut self.particle_speed, defaults.particle_speed);
        finite_or(&mut self.particle_gravity, defaults.particle_gravity);
        finite_pair_or(&mut self.ship_speed_jitter, defaults.ship_speed_jitter);
        finite_pair_or(&mut self.coin_speed, defaults.coin_speed);
        finite_pair_or(&mut self.particle_size, defaults.particle_size);
        finite_pair_or(&mut self.player_start, defaults.player_start);

        // Bodies must have area and fit inside the arena
        self.player_width = body_extent(self.player_width, defaults.player_width, self.arena_width);
        self.player_height =
            body_extent(self.player_height, defaults.player_height, self.arena_height);
        self.ship_width = body_extent(self.ship_width, defaults.ship_width, self.arena_width);
        self.ship_height = body_extent(self.ship_height, defaults.ship_height, self.arena_height);
        self.harpoon_width =
            body_extent(self.harpoon_width, defaults.harpoon_width, self.arena_width);
        self.harpoon_height =
            body_extent(self.harpoon_height, defaults.harpoon_height, self.arena_height);
        self.coin_size = body_extent(
            self.coin_size,
            defaults.coin_size,
            self.arena_width.min(self.arena_height),
        );

        let half = self.player_size() * 0.5;
        self.player_start = (
            self.player_start.0.clamp(half.x, self.arena_width - half.x),
            self.player_start.1.clamp(half.y, self.arena_height - half.y),
        );

        self.player_max_health = self.player_max_health.max(1);
        self.ship_base_interval = self.ship_base_interval.max(1);
        self.ship_min_interval = self.ship_min_interval.clamp(1, self.ship_base_interval);
        self.ship_interval_divisor = self.ship_interval_divisor.max(1);
        self.ship_speed_divisor = self.ship_speed_divisor.max(1);
        self.coin_interval = self.coin_interval.max(1);
        self.particle_life = self.particle_life.max(1);
        if self.harpoon_aim_divisor.abs() < f32::EPSILON {
            self.harpoon_aim_divisor = defaults.harpoon_aim_divisor;
        }

        self.ship_speed_jitter = ordered(self.ship_speed_jitter);
        self.coin_speed = ordered(self.coin_speed);
        self.particle_size = ordered(self.particle_size);
        self.ship_first_shot = ordered_ticks(self.ship_first_shot);
        self.ship_reload = ordered_ticks(self.ship_reload);

        self
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    pub fn ship_size(&self) -> Vec2 {
        Vec2::new(self.ship_width, self.ship_height)
    }

    pub fn harpoon_size(&self) -> Vec2 {
        Vec2::new(self.harpoon_width, self.harpoon_height)
    }

    pub fn coin_size(&self) -> Vec2 {
        Vec2::splat(self.coin_size)
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn finite_or(value: &mut f32, default: f32) {
    if !value.is_finite() {
        log::warn!("Non-finite tuning value {}, using {}", value, default);
        *value = default;
    }
}

fn finite_pair_or(value: &mut (f32, f32), default: (f32, f32)) {
    if !(value.0.is_finite() && value.1.is_finite()) {
        log::warn!("Non-finite tuning range {:?}, using {:?}", value, default);
        *value = default;
    }
}

/// Width or height of a body: positive, finite and no larger than the arena
fn body_extent(value: f32, default: f32, arena: f32) -> f32 {
    let value = if positive(value) { value } else { default };
    value.min(arena)
}

fn ordered((lo, hi): (f32, f32)) -> (f32, f32) {
    if lo <= hi { (lo, hi) } else { (hi, lo) }
}

/// Shoot countdowns must be at least one tick so a ship can't fire every frame
fn ordered_ticks((lo, hi): (u32, u32)) -> (u32, u32) {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    (lo.max(1), hi.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "ship_score": 75 }"#).unwrap();
        assert_eq!(tuning.ship_score, 75);
        assert_eq!(tuning.coin_score, 10);
        assert_eq!(tuning.ship_min_interval, 50);
    }

    #[test]
    fn test_validated_fixes_nonsense() {
        let tuning = Tuning {
            ship_interval_divisor: 0,
            ship_min_interval: 500,
            coin_speed: (3.5, 1.5),
            ship_reload: (0, 0),
            arena_width: -1.0,
            ..Default::default()
        }
        .validated();

        assert_eq!(tuning.ship_interval_divisor, 1);
        assert_eq!(tuning.ship_min_interval, tuning.ship_base_interval);
        assert_eq!(tuning.coin_speed, (1.5, 3.5));
        assert_eq!(tuning.ship_reload, (1, 1));
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        // 1e39 overflows f32 and parses as infinity
        let tuning: Tuning = serde_json::from_str(
            r#"{ "particle_speed": 1e39, "coin_speed": [1.0, 1e39], "wave_growth": -1e39 }"#,
        )
        .unwrap();
        assert!(tuning.particle_speed.is_infinite());

        let tuning = tuning.validated();
        let defaults = Tuning::default();
        assert_eq!(tuning.particle_speed, defaults.particle_speed);
        assert_eq!(tuning.coin_speed, defaults.coin_speed);
        assert_eq!(tuning.wave_growth, defaults.wave_growth);
    }

    #[test]
    fn test_explosion_with_overflowing_speed_does_not_panic() {
        use crate::sim::{Entity, EntityKind, GameState, TickInput, tick};

        let tuning: Tuning = serde_json::from_str(r#"{ "particle_speed": 1e39 }"#).unwrap();
        let mut state = GameState::new(3, tuning);
        let player = state.store.player().pos;
        let size = state.tuning.ship_size();
        state
            .store
            .spawn(Entity::ship(player + Vec2::new(150.0, 0.0), size, 0.0, 500));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire);
        tick(&mut state, &TickInput::default());

        assert!(state.store.iter(EntityKind::Particle).count() > 0);
        assert!(
            state
                .store
                .iter(EntityKind::Particle)
                .all(|p| p.pos.is_finite())
        );
    }

    #[test]
    fn test_bodies_are_capped_to_arena() {
        let tuning = Tuning {
            player_width: 1000.0,
            player_height: f32::NAN,
            ship_height: 900.0,
            coin_size: -4.0,
            player_start: (5000.0, -20.0),
            ..Default::default()
        }
        .validated();

        assert_eq!(tuning.player_width, tuning.arena_width);
        assert_eq!(tuning.player_height, Tuning::default().player_height);
        assert_eq!(tuning.ship_height, tuning.arena_height);
        assert_eq!(tuning.coin_size, Tuning::default().coin_size);
        assert_eq!(tuning.player_start.0, tuning.arena_width / 2.0);
        assert_eq!(tuning.player_start.1, tuning.player_height / 2.0);
    }

    #[test]
    fn test_defaults_survive_validation() {
        assert_eq!(Tuning::default().validated(), Tuning::default());
    }
}
