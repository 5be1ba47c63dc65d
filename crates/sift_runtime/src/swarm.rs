//! Enemy swarm driven by the demo loop.

use sift_core::glam::Vec2;
use sift_core::math::DeterministicRng;
use sift_core::{EntityRef, GridConfig, TrackedEntity};
use sift_services::SimulationSettings;

/// How far past the grid edge enemies may wander before turning back,
/// as a fraction of the grid extent.
const ROAM_MARGIN: f32 = 0.1;

#[derive(Debug, Clone)]
struct Enemy {
    entity: EntityRef,
    position: Vec2,
    velocity: Vec2,
}

pub struct Swarm {
    enemies: Vec<Enemy>,
    roam_min: Vec2,
    roam_max: Vec2,
    speed: f32,
    rng: DeterministicRng,
}

impl Swarm {
    pub fn spawn(config: &GridConfig, settings: &SimulationSettings) -> Self {
        let (min, max) = config.bounds();
        let margin = (max - min) * ROAM_MARGIN;
        let mut swarm = Self {
            enemies: Vec::with_capacity(settings.enemy_count as usize),
            roam_min: min - margin,
            roam_max: max + margin,
            speed: settings.enemy_speed,
            rng: DeterministicRng::new(settings.seed),
        };

        for index in 0..settings.enemy_count {
            let (position, velocity) = swarm.random_motion();
            swarm.enemies.push(Enemy {
                entity: EntityRef::new(index, 0),
                position,
                velocity,
            });
        }
        swarm
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    fn random_motion(&mut self) -> (Vec2, Vec2) {
        let position = self.rng.point_in(self.roam_min, self.roam_max);
        let angle = self.rng.range_f32(0.0, std::f32::consts::TAU);
        (position, Vec2::from_angle(angle) * self.speed)
    }

    /// Integrate one step, bouncing off the roaming area's edges.
    pub fn step(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            enemy.position += enemy.velocity * dt;
            if enemy.position.x < self.roam_min.x || enemy.position.x > self.roam_max.x {
                enemy.velocity.x = -enemy.velocity.x;
            }
            if enemy.position.y < self.roam_min.y || enemy.position.y > self.roam_max.y {
                enemy.velocity.y = -enemy.velocity.y;
            }
            enemy.position = enemy.position.clamp(self.roam_min, self.roam_max);
        }
    }

    /// Replace a destroyed enemy: same slot, next generation, new position.
    ///
    /// Returns `false` for handles that are already stale.
    pub fn respawn(&mut self, entity: EntityRef) -> bool {
        let (position, velocity) = self.random_motion();
        let Some(enemy) = self
            .enemies
            .get_mut(entity.index() as usize)
            .filter(|enemy| enemy.entity == entity)
        else {
            return false;
        };

        enemy.entity = EntityRef::new(entity.index(), entity.generation().wrapping_add(1));
        enemy.position = position;
        enemy.velocity = velocity;
        true
    }

    /// Write this tick's positions into a reusable snapshot buffer.
    pub fn snapshot_into(&self, out: &mut Vec<TrackedEntity>) {
        out.clear();
        out.extend(
            self.enemies
                .iter()
                .map(|enemy| TrackedEntity::new(enemy.entity, enemy.position)),
        );
    }
}
