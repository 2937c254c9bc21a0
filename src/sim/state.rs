//! Game state and core simulation types
//!
//! Entities are a single struct carrying a kind-specific [`Body`]; all of them
//! are owned by the [`EntityStore`], which in turn lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::score::ScoreBoard;
use super::spawn::SpawnScheduler;
use crate::audio::{MusicTrack, SoundEffect};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Events produced by a tick for the audio/rendering collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    Music(MusicTrack),
    /// Player health reached zero (emitted once per run)
    GameOver { score: u64 },
    /// A new run started from the game over screen
    Restarted,
}

/// Entity kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Ship,
    Harpoon,
    Wave,
    Coin,
    Particle,
}

impl EntityKind {
    /// All kinds in draw/iteration order
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Player,
        EntityKind::Ship,
        EntityKind::Harpoon,
        EntityKind::Wave,
        EntityKind::Coin,
        EntityKind::Particle,
    ];
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True when the rectangles overlap with positive area (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Kind-specific entity data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Player {
        step: f32,
        health: u8,
        max_health: u8,
    },
    Ship {
        speed: f32,
        /// Ticks until the next harpoon
        shoot_timer: u32,
    },
    Harpoon {
        vel: Vec2,
    },
    Wave {
        speed: f32,
        radius: f32,
    },
    Coin {
        speed: f32,
        /// Visual pulse phase (radians), not gameplay-affecting
        glow_phase: f32,
    },
    Particle {
        vel: Vec2,
        life: u32,
        max_life: u32,
    },
}

/// A simulation entity. `pos` is the center; the rectangle is derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub body: Body,
}

impl Entity {
    pub fn player(tuning: &Tuning) -> Self {
        Self {
            id: 0,
            pos: Vec2::new(tuning.player_start.0, tuning.player_start.1),
            size: tuning.player_size(),
            body: Body::Player {
                step: tuning.player_step,
                health: tuning.player_max_health,
                max_health: tuning.player_max_health,
            },
        }
    }

    pub fn ship(pos: Vec2, size: Vec2, speed: f32, shoot_timer: u32) -> Self {
        Self {
            id: 0,
            pos,
            size,
            body: Body::Ship { speed, shoot_timer },
        }
    }

    pub fn harpoon(pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            id: 0,
            pos,
            size,
            body: Body::Harpoon { vel },
        }
    }

    pub fn wave(pos: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            id: 0,
            pos,
            size: Vec2::ONE,
            body: Body::Wave { speed, radius },
        }
    }

    pub fn coin(pos: Vec2, size: Vec2, speed: f32, glow_phase: f32) -> Self {
        Self {
            id: 0,
            pos,
            size,
            body: Body::Coin { speed, glow_phase },
        }
    }

    pub fn particle(pos: Vec2, size: Vec2, vel: Vec2, life: u32) -> Self {
        Self {
            id: 0,
            pos,
            size,
            body: Body::Particle {
                vel,
                life,
                max_life: life,
            },
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Player { .. } => EntityKind::Player,
            Body::Ship { .. } => EntityKind::Ship,
            Body::Harpoon { .. } => EntityKind::Harpoon,
            Body::Wave { .. } => EntityKind::Wave,
            Body::Coin { .. } => EntityKind::Coin,
            Body::Particle { .. } => EntityKind::Particle,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Player health (None for other kinds)
    pub fn health(&self) -> Option<u8> {
        match self.body {
            Body::Player { health, .. } => Some(health),
            _ => None,
        }
    }

    /// Take damage, saturating at zero. Returns remaining health for the player.
    pub fn damage(&mut self, amount: u8) -> Option<u8> {
        match &mut self.body {
            Body::Player { health, .. } => {
                *health = health.saturating_sub(amount);
                Some(*health)
            }
            _ => None,
        }
    }

    /// Wave radius (None for other kinds)
    pub fn radius(&self) -> Option<f32> {
        match self.body {
            Body::Wave { radius, .. } => Some(radius),
            _ => None,
        }
    }

    /// Advance one tick of free motion. The player only moves through input.
    pub fn advance(&mut self, tuning: &Tuning) {
        match &mut self.body {
            Body::Player { .. } => {}
            Body::Ship { speed, shoot_timer } => {
                self.pos.x -= *speed;
                *shoot_timer = shoot_timer.saturating_sub(1);
            }
            Body::Harpoon { vel } => {
                self.pos += *vel;
            }
            Body::Wave { speed, radius } => {
                self.pos.x += *speed;
                *radius += tuning.wave_growth;
            }
            Body::Coin { speed, glow_phase } => {
                self.pos.x -= *speed;
                *glow_phase = (*glow_phase + tuning.coin_glow_rate) % std::f32::consts::TAU;
            }
            Body::Particle { vel, life, .. } => {
                self.pos += *vel;
                vel.y += tuning.particle_gravity;
                *life = life.saturating_sub(1);
            }
        }
    }

    /// Whether the reap pass should drop this entity
    pub fn is_expired(&self, tuning: &Tuning) -> bool {
        match self.body {
            Body::Player { .. } => false,
            Body::Ship { .. } | Body::Harpoon { .. } | Body::Coin { .. } => {
                self.pos.x < -tuning.exit_margin
            }
            Body::Wave { .. } => self.pos.x > tuning.arena_width + tuning.wave_exit_margin,
            Body::Particle { life, .. } => life == 0,
        }
    }
}

/// Owner of every live entity, one collection per kind
#[derive(Debug, Clone)]
pub struct EntityStore {
    player: Entity,
    ships: Vec<Entity>,
    harpoons: Vec<Entity>,
    waves: Vec<Entity>,
    coins: Vec<Entity>,
    particles: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Entity::player(tuning),
            ships: Vec::new(),
            harpoons: Vec::new(),
            waves: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    /// Put the player back at its start position with full health
    pub fn reset_player(&mut self, tuning: &Tuning) {
        self.player = Entity::player(tuning);
    }

    fn pool(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Player => std::slice::from_ref(&self.player),
            EntityKind::Ship => &self.ships,
            EntityKind::Harpoon => &self.harpoons,
            EntityKind::Wave => &self.waves,
            EntityKind::Coin => &self.coins,
            EntityKind::Particle => &self.particles,
        }
    }

    fn pool_mut(&mut self, kind: EntityKind) -> Option<&mut Vec<Entity>> {
        match kind {
            EntityKind::Player => None,
            EntityKind::Ship => Some(&mut self.ships),
            EntityKind::Harpoon => Some(&mut self.harpoons),
            EntityKind::Wave => Some(&mut self.waves),
            EntityKind::Coin => Some(&mut self.coins),
            EntityKind::Particle => Some(&mut self.particles),
        }
    }

    /// Append an entity to its kind's collection and return its new id.
    /// The player is not spawnable; use [`EntityStore::reset_player`].
    pub fn spawn(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        entity.id = id;
        match self.pool_mut(entity.kind()) {
            Some(pool) => {
                pool.push(entity);
                self.next_id += 1;
                id
            }
            None => {
                log::warn!("Ignoring attempt to spawn a second player");
                self.player.id
            }
        }
    }

    pub fn iter(&self, kind: EntityKind) -> std::slice::Iter<'_, Entity> {
        self.pool(kind).iter()
    }

    /// Every live entity, player first, then by kind in insertion order
    pub fn iter_all(&self) -> impl Iterator<Item = &Entity> {
        EntityKind::ALL.into_iter().flat_map(|kind| self.pool(kind))
    }

    pub fn iter_mut(&mut self, kind: EntityKind) -> std::slice::IterMut<'_, Entity> {
        match kind {
            EntityKind::Player => std::slice::from_mut(&mut self.player).iter_mut(),
            EntityKind::Ship => self.ships.iter_mut(),
            EntityKind::Harpoon => self.harpoons.iter_mut(),
            EntityKind::Wave => self.waves.iter_mut(),
            EntityKind::Coin => self.coins.iter_mut(),
            EntityKind::Particle => self.particles.iter_mut(),
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.pool(kind).len()
    }

    /// Number of live non-player entities
    pub fn live_count(&self) -> usize {
        self.ships.len()
            + self.harpoons.len()
            + self.waves.len()
            + self.coins.len()
            + self.particles.len()
    }

    /// Advance every non-player entity by one tick
    pub fn advance_all(&mut self, tuning: &Tuning) {
        for pool in [
            &mut self.ships,
            &mut self.harpoons,
            &mut self.waves,
            &mut self.coins,
            &mut self.particles,
        ] {
            for entity in pool.iter_mut() {
                entity.advance(tuning);
            }
        }
    }

    /// Remove the entities at `indices` (collected during an earlier pass),
    /// keeping the survivors in insertion order. Returns how many were removed.
    pub fn remove_indices(&mut self, kind: EntityKind, indices: &[usize]) -> usize {
        if indices.is_empty() {
            return 0;
        }
        let Some(pool) = self.pool_mut(kind) else {
            return 0;
        };

        let mut doomed = vec![false; pool.len()];
        for &index in indices {
            if let Some(slot) = doomed.get_mut(index) {
                *slot = true;
            }
        }

        let before = pool.len();
        let mut flags = doomed.into_iter();
        pool.retain(|_| !flags.next().unwrap_or(false));
        before - pool.len()
    }

    /// Keep only entities of `kind` matching the predicate. Returns how many were removed.
    pub fn retain(&mut self, kind: EntityKind, mut keep: impl FnMut(&Entity) -> bool) -> usize {
        let Some(pool) = self.pool_mut(kind) else {
            return 0;
        };
        let before = pool.len();
        pool.retain(|e| keep(e));
        before - pool.len()
    }

    /// Drop every non-player entity
    pub fn clear(&mut self) {
        self.ships.clear();
        self.harpoons.clear();
        self.waves.clear();
        self.coins.clear();
        self.particles.clear();
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter (ticks spent Playing)
    pub time_ticks: u64,
    pub store: EntityStore,
    pub scoreboard: ScoreBoard,
    pub spawner: SpawnScheduler,
    /// Pending events, drained by the caller
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.validated();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            store: EntityStore::new(&tuning),
            scoreboard: ScoreBoard::default(),
            spawner: SpawnScheduler::new(&tuning),
            events: Vec::new(),
            tuning,
        }
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    pub fn player_health(&self) -> u8 {
        self.store.player().health().unwrap_or(0)
    }

    /// Reset everything a restart resets. The RNG stream carries on.
    pub fn reset_run(&mut self) {
        self.store.clear();
        self.store.reset_player(&self.tuning);
        self.scoreboard.reset();
        self.spawner.reset(&self.tuning);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
