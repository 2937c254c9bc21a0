//! Read-only view of the simulation for a renderer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, Entity, EntityKind, GamePhase, GameState};

/// Kind-specific display attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SnapshotDetail {
    Player { health: u8, max_health: u8 },
    Ship,
    Harpoon,
    Wave { radius: f32 },
    Coin { glow_phase: f32 },
    /// Remaining life as a 0-1 ratio (for fading)
    Particle { life_ratio: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub detail: SnapshotDetail,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        let detail = match entity.body {
            Body::Player {
                health, max_health, ..
            } => SnapshotDetail::Player { health, max_health },
            Body::Ship { .. } => SnapshotDetail::Ship,
            Body::Harpoon { .. } => SnapshotDetail::Harpoon,
            Body::Wave { radius, .. } => SnapshotDetail::Wave { radius },
            Body::Coin { glow_phase, .. } => SnapshotDetail::Coin { glow_phase },
            Body::Particle { life, max_life, .. } => SnapshotDetail::Particle {
                life_ratio: if max_life == 0 {
                    0.0
                } else {
                    life as f32 / max_life as f32
                },
            },
        };
        Self {
            id: entity.id,
            kind: entity.kind(),
            pos: entity.pos,
            size: entity.size,
            detail,
        }
    }
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub health: u8,
    pub max_health: u8,
    /// Player first, then ships, harpoons, waves, coins, particles
    pub entities: Vec<EntitySnapshot>,
}

impl Snapshot {
    pub fn capture(state: &GameState, high_score: u64) -> Self {
        Self {
            phase: state.phase,
            score: state.score(),
            high_score,
            health: state.player_health(),
            max_health: state.tuning.player_max_health,
            entities: state.store.iter_all().map(EntitySnapshot::from).collect(),
        }
    }

    /// Health as a 0-1 ratio for the health bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_lists_player_first() {
        let mut state = GameState::new(1, Tuning::default());
        state.store.spawn(Entity::wave(Vec2::new(400.0, 300.0), 18.0, 15.0));
        state
            .store
            .spawn(Entity::particle(Vec2::ZERO, Vec2::splat(4.0), Vec2::ZERO, 50));

        let snapshot = Snapshot::capture(&state, 900);

        assert_eq!(snapshot.high_score, 900);
        assert_eq!(snapshot.entities.len(), 3);
        assert_eq!(snapshot.entities[0].kind, EntityKind::Player);
        assert_eq!(
            snapshot.entities[0].detail,
            SnapshotDetail::Player {
                health: 5,
                max_health: 5
            }
        );
        assert_eq!(snapshot.entities[1].detail, SnapshotDetail::Wave { radius: 15.0 });
        assert_eq!(
            snapshot.entities[2].detail,
            SnapshotDetail::Particle { life_ratio: 1.0 }
        );
        assert_eq!(snapshot.health_ratio(), 1.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1, Tuning::default());
        let json = serde_json::to_string(&Snapshot::capture(&state, 0)).unwrap();
        assert!(json.contains("\"Playing\""));
    }
}
