//! The player's avatar.
//!
//! The hunter never decides where to go; the player's controls push it
//! around. Its own step only flies the bullets: a bullet landing on an
//! animal kills it with a probability that drops with distance, and every
//! animal a bullet passes near gets scared.

use rand::Rng;

use super::{Effect, Entity, Kind, Neighbour, StepContext};
use crate::settings::{HunterSettings, ShootingRange};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub position: Vec2,
    /// Displacement per step.
    pub direction: Vec2,
    pub origin: Vec2,
}

impl Bullet {
    pub fn travelled(&self) -> f32 {
        self.origin.distance(self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Fired,
    /// Still reloading; ammunition remains.
    Reloading,
    OutOfAmmo,
    NoHunter,
}

#[derive(Debug, Clone)]
pub struct Hunter {
    aim: Vec2,
    bullets: Vec<Bullet>,
    ammunition: u32,
    since_last_shot: f32,
    reload: f32,
    bullet_speed: f32,
}

impl Hunter {
    pub fn new(settings: &HunterSettings) -> Self {
        Self {
            aim: Vec2::ZERO,
            bullets: Vec::new(),
            ammunition: settings.ammunition,
            // The gun starts loaded.
            since_last_shot: settings.reload,
            reload: settings.reload,
            bullet_speed: settings.bullet_speed,
        }
    }

    /// Unit vector from the hunter toward the pointer.
    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn ammunition(&self) -> u32 {
        self.ammunition
    }

    /// 0.0 right after a shot, 1.0 once the gun can fire again.
    pub fn reload_progress(&self) -> f32 {
        if self.reload <= 0.0 {
            1.0
        } else {
            (self.since_last_shot / self.reload).min(1.0)
        }
    }

    pub fn update_pointer(&mut self, pointer: Vec2, position: Vec2) {
        self.aim = (pointer - position).normalize_or_zero();
    }

    pub fn shoot(&mut self, position: Vec2) -> ShotOutcome {
        if self.ammunition == 0 {
            return ShotOutcome::OutOfAmmo;
        }
        if self.since_last_shot < self.reload {
            return ShotOutcome::Reloading;
        }

        self.ammunition -= 1;
        self.since_last_shot = 0.0;
        self.bullets.push(Bullet {
            position,
            direction: self.aim * self.bullet_speed,
            origin: position,
        });
        tracing::debug!(ammunition = self.ammunition, "hunter fired");
        ShotOutcome::Fired
    }
}

/// Shooting ranges shrunk by how fast the hunter is moving.
pub fn shooting_ranges(
    velocity: Vec2,
    max_speed: f32,
    settings: &HunterSettings,
) -> Vec<ShootingRange> {
    let shrink = settings.ranges_delta * velocity.length() / max_speed;
    settings
        .shooting_ranges
        .iter()
        .map(|range| ShootingRange::new(range.distance - shrink, range.probability))
        .collect()
}

pub(super) fn step(
    entity: &mut Entity,
    neighbours: &[Neighbour],
    ctx: &mut StepContext<'_>,
) -> Vec<Effect> {
    let settings = &ctx.settings.hunter_behaviour;
    let ranges = shooting_ranges(entity.velocity, entity.traits.physics.max_speed, settings);
    let max_distance = ctx.settings.max_shooting_distance();
    let scare_radius = settings.scare_radius;

    let Kind::Hunter(hunter) = &mut entity.kind else {
        return Vec::new();
    };
    hunter.since_last_shot += ctx.dt;

    let mut effects = Vec::new();
    let mut bullets = std::mem::take(&mut hunter.bullets);
    bullets.retain_mut(|bullet| {
        bullet.position += bullet.direction;

        for target in neighbours.iter().filter(|n| n.is_alive()) {
            let distance = bullet.position.distance(target.position);
            if distance <= target.radius && lands(bullet.travelled(), &ranges, ctx.rng) {
                effects.push(Effect::Kill(target.id));
                return false;
            }
            if distance <= scare_radius && !target.scared {
                effects.push(Effect::Scare(target.id));
            }
        }

        bullet.travelled() <= max_distance && ctx.info.check_position(bullet.position, 0.0)
    });
    hunter.bullets = bullets;

    effects
}

/// Roll for a hit using the first range that covers `distance`.
fn lands(distance: f32, ranges: &[ShootingRange], rng: &mut dyn rand::RngCore) -> bool {
    ranges
        .iter()
        .find(|range| distance <= range.distance)
        .is_some_and(|range| range.probability > rng.gen_range(0.0f32..1.0))
}
