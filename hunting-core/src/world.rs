//! The simulated world.
//!
//! Owns every entity, the spatial index that finds their neighbours, and
//! the delayed "scared" reactions bullets trigger. One `step` moves every
//! entity once, in id order, applying what each step did to the others
//! before the next entity moves.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::box_search::BoxSearch;
use crate::entity::{Effect, Entity, EntityId, Neighbour, ShotOutcome, Species, StepContext};
use crate::settings::GameSettings;
use glam::Vec2;

/// World extents plus the size of the screen it is shown on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldInfo {
    pub width: f32,
    pub height: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl WorldInfo {
    pub fn new(width: f32, height: f32, screen_width: f32, screen_height: f32) -> Self {
        Self {
            width,
            height,
            screen_width,
            screen_height,
        }
    }

    /// A world `scale` times larger than the screen.
    pub fn from_screen(screen_width: f32, screen_height: f32, scale: f32) -> Self {
        Self::new(
            screen_width * scale,
            screen_height * scale,
            screen_width,
            screen_height,
        )
    }

    /// Clamp `to` into the world.
    pub fn adjust_bounds(&self, to: Vec2) -> Vec2 {
        Vec2::new(to.x.clamp(0.0, self.width), to.y.clamp(0.0, self.height))
    }

    /// True if `to` is inside the world and at least `margin` from every wall.
    pub fn check_position(&self, to: Vec2, margin: f32) -> bool {
        to.x >= margin
            && to.x <= self.width - margin
            && to.y >= margin
            && to.y <= self.height - margin
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// The hunter is gone; the game should start over.
    Restart,
}

#[derive(Debug, Clone, Copy)]
struct PendingScare {
    target: EntityId,
    source: EntityId,
    remaining: f32,
}

pub struct World {
    info: WorldInfo,
    settings: GameSettings,
    entities: BTreeMap<EntityId, Entity>,
    box_search: BoxSearch,
    pending_scares: Vec<PendingScare>,
    hunter_id: Option<EntityId>,
    next_id: EntityId,
    rng: StdRng,
}

impl World {
    /// A populated world: the hunter in the centre, animals scattered.
    pub fn new(info: WorldInfo, settings: &GameSettings, rng: StdRng) -> Self {
        let mut world = Self::empty(info, settings, rng);

        world.spawn(Species::Hunter, info.center());
        let population = settings.population;
        for (species, count) in [
            (Species::Rabbit, population.rabbits),
            (Species::Wolf, population.wolves),
            (Species::Deer, population.deer),
        ] {
            for _ in 0..count {
                world.spawn_random(species);
            }
        }

        tracing::info!(
            width = info.width,
            height = info.height,
            entities = world.entities.len(),
            "World populated"
        );
        world
    }

    /// A world with nobody in it.
    pub fn empty(info: WorldInfo, settings: &GameSettings, rng: StdRng) -> Self {
        let chunk = settings.chunk_size.max(1);
        let horizontal_chunks = (info.width / chunk as f32) as u32 + 1;

        Self {
            info,
            settings: settings.clone(),
            entities: BTreeMap::new(),
            box_search: BoxSearch::new(horizontal_chunks, chunk, chunk),
            pending_scares: Vec::new(),
            hunter_id: None,
            next_id: 0,
            rng,
        }
    }

    pub fn with_seed(info: WorldInfo, settings: &GameSettings, seed: u64) -> Self {
        Self::new(info, settings, StdRng::seed_from_u64(seed))
    }

    /// Place a new entity. A second hunter replaces the first as the
    /// player-controlled one.
    pub fn spawn(&mut self, species: Species, position: Vec2) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;

        let entity = Entity::new(id, species, position, &self.settings);
        self.box_search.update_point(id, position.x, position.y);
        self.entities.insert(id, entity);

        if species == Species::Hunter {
            self.hunter_id = Some(id);
        }
        id
    }

    fn spawn_random(&mut self, species: Species) -> EntityId {
        let radius = match species {
            Species::Rabbit => self.settings.rabbit.radius,
            Species::Wolf => self.settings.wolf.radius,
            Species::Deer => self.settings.deer.radius,
            Species::Hunter => self.settings.hunter.radius,
        };
        let position = Entity::generate_position(&self.info, radius, &mut self.rng);
        self.spawn(species, position)
    }

    pub fn info(&self) -> &WorldInfo {
        &self.info
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, species: Species) -> usize {
        self.entities
            .values()
            .filter(|e| e.species() == species)
            .count()
    }

    pub fn hunter(&self) -> Option<&Entity> {
        self.hunter_id.and_then(|id| self.entities.get(&id))
    }

    /// Advance the simulation by `dt` seconds of real time.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        if self.hunter().is_none() {
            return StepOutcome::Restart;
        }

        let dt = dt * self.settings.world_speed;
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();

        for id in ids {
            let neighbours = self.neighbours_of(id);
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };

            let mut ctx = StepContext {
                dt,
                info: &self.info,
                settings: &self.settings,
                rng: &mut self.rng,
            };
            let effects = entity.ask_to_move(&neighbours, &mut ctx);
            self.apply_effects(id, effects);
        }

        self.tick_scares(dt);
        self.remove_dead();
        self.update_box_search();
        StepOutcome::Continue
    }

    /// Push the hunter with the player's force and aim it at `pointer`.
    /// Returns the hunter's new position.
    pub fn move_hunter(&mut self, force: Vec2, dt: f32, pointer: Vec2) -> Option<Vec2> {
        let id = self.hunter_id?;
        let hunter = self.entities.get_mut(&id)?;

        let position = hunter.position();
        if let Some(gun) = hunter.hunter_mut() {
            gun.update_pointer(pointer, position);
        }
        hunter.apply_world_force(force, dt, &self.info);
        Some(hunter.position())
    }

    pub fn hunter_shoot(&mut self) -> ShotOutcome {
        let Some(hunter) = self.hunter_id.and_then(|id| self.entities.get_mut(&id)) else {
            return ShotOutcome::NoHunter;
        };
        let position = hunter.position();
        match hunter.hunter_mut() {
            Some(gun) => gun.shoot(position),
            None => ShotOutcome::NoHunter,
        }
    }

    /// Convert a screen position (y pointing down) into world coordinates,
    /// for a camera of `camera_width`×`camera_height` centred on the hunter.
    pub fn translate_mouse_position(
        &self,
        x: f32,
        y: f32,
        camera_width: f32,
        camera_height: f32,
    ) -> Vec2 {
        let centre = self.hunter().map(Entity::position).unwrap_or(Vec2::ZERO);
        Vec2::new(
            x + centre.x - camera_width / 2.0,
            camera_height - y + centre.y - camera_height / 2.0,
        )
    }

    fn neighbours_of(&self, id: EntityId) -> Vec<Neighbour> {
        let mut neighbours: Vec<Neighbour> = self
            .box_search
            .neighbours(id, self.settings.neighbour_radius)
            .into_iter()
            .filter_map(|point| self.entities.get(&point.id))
            .map(Entity::as_neighbour)
            .collect();
        neighbours.sort_by_key(|n| n.id);
        neighbours
    }

    fn apply_effects(&mut self, source: EntityId, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Kill(target) => {
                    if let Some(victim) = self.entities.get_mut(&target) {
                        tracing::debug!(source, target, species = ?victim.species(), "killed");
                        victim.die();
                    }
                }
                Effect::Scare(target) => {
                    let Some(victim) = self.entities.get_mut(&target) else {
                        continue;
                    };
                    if victim.is_scared() {
                        continue;
                    }
                    victim.set_scared(true);
                    self.pending_scares.push(PendingScare {
                        target,
                        source,
                        remaining: self.settings.hunter_behaviour.scare_delay,
                    });
                }
            }
        }
    }

    fn tick_scares(&mut self, dt: f32) {
        let mut due = Vec::new();
        self.pending_scares.retain_mut(|scare| {
            scare.remaining -= dt;
            if scare.remaining <= 0.0 {
                due.push(*scare);
                false
            } else {
                true
            }
        });

        for scare in due {
            let danger = self.entities.get(&scare.source).map(Entity::position);
            let Some(target) = self.entities.get_mut(&scare.target) else {
                continue;
            };
            target.set_scared(false);
            let Some(danger) = danger else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }

            let ctx = StepContext {
                dt,
                info: &self.info,
                settings: &self.settings,
                rng: &mut self.rng,
            };
            target.run_from_danger(&[danger], &ctx);
        }
    }

    fn remove_dead(&mut self) {
        let dead: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| !e.is_alive())
            .map(Entity::id)
            .collect();

        for id in dead {
            self.entities.remove(&id);
            self.box_search.remove_point(id);
            self.pending_scares.retain(|scare| scare.target != id);
        }
    }

    fn update_box_search(&mut self) {
        for (id, entity) in &self.entities {
            let position = entity.position();
            self.box_search.update_point(*id, position.x, position.y);
        }
    }
}
