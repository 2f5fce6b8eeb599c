//! Animals and the hunter.
//!
//! Every creature shares one `Entity` body (position, velocity, physics
//! and a behaviour `State`). What differs per species lives in `Kind`
//! and in the species modules, which decide how a creature reacts to the
//! neighbours the world hands it each step.
//!
//! Entities never touch each other directly. A step returns `Effect`s
//! (a wolf biting, a bullet landing) and the world applies them.

mod deer;
mod hunter;
mod rabbit;
mod wolf;

use std::f32::consts::FRAC_PI_2;

use rand::{Rng, RngCore};

use crate::settings::{GameSettings, PhysicsInfo, SpeciesSettings, WallSettings};
use crate::steering::compute_steering_force;
use glam::Vec2;
use crate::world::WorldInfo;

pub use hunter::{Bullet, Hunter, ShotOutcome, shooting_ranges};
pub use wolf::Wolf;

pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Rabbit,
    Wolf,
    Deer,
    Hunter,
}

/// Species-specific data.
#[derive(Debug, Clone)]
pub enum Kind {
    Rabbit,
    Wolf(Wolf),
    Deer,
    Hunter(Hunter),
}

impl Kind {
    pub fn species(&self) -> Species {
        match self {
            Kind::Rabbit => Species::Rabbit,
            Kind::Wolf(_) => Species::Wolf,
            Kind::Deer => Species::Deer,
            Kind::Hunter(_) => Species::Hunter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    /// Wandering toward `to`. A `copy` target was borrowed from another
    /// deer and is stored relative to the current position.
    Idle { to: Option<Vec2>, copy: bool },
    Run { countdown: f32, heading: Vec2 },
    Eat { countdown: f32 },
    Death,
}

impl Default for State {
    fn default() -> Self {
        State::Idle {
            to: None,
            copy: false,
        }
    }
}

/// Read-only view of another entity, as seen by the one being stepped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub id: EntityId,
    pub species: Species,
    pub position: Vec2,
    pub radius: f32,
    pub state: State,
    pub scared: bool,
}

impl Neighbour {
    pub fn is_alive(&self) -> bool {
        self.state != State::Death
    }
}

/// Something a step did to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Kill(EntityId),
    /// A bullet flew past; the target flees from the shooter shortly after.
    Scare(EntityId),
}

/// Everything an entity may consult while it moves.
pub struct StepContext<'a> {
    pub dt: f32,
    pub info: &'a WorldInfo,
    pub settings: &'a GameSettings,
    pub rng: &'a mut dyn RngCore,
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: Kind,
    position: Vec2,
    velocity: Vec2,
    state: State,
    scared: bool,
    traits: SpeciesSettings,
}

impl Entity {
    pub fn new(id: EntityId, species: Species, position: Vec2, settings: &GameSettings) -> Self {
        let (kind, traits) = match species {
            Species::Rabbit => (Kind::Rabbit, settings.rabbit),
            Species::Wolf => (
                Kind::Wolf(Wolf::new(&settings.wolf_behaviour)),
                settings.wolf,
            ),
            Species::Deer => (Kind::Deer, settings.deer),
            Species::Hunter => (
                Kind::Hunter(Hunter::new(&settings.hunter_behaviour)),
                settings.hunter,
            ),
        };

        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            state: State::default(),
            scared: false,
            traits,
        }
    }

    /// Random position at least one radius away from every wall.
    pub fn generate_position(info: &WorldInfo, radius: f32, rng: &mut dyn RngCore) -> Vec2 {
        let span_x = (info.width - 2.0 * radius).max(0.0);
        let span_y = (info.height - 2.0 * radius).max(0.0);
        Vec2::new(
            rng.gen_range(0.0f32..1.0) * span_x + radius,
            rng.gen_range(0.0f32..1.0) * span_y + radius,
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn radius(&self) -> f32 {
        self.traits.radius
    }

    pub fn vision_radius(&self) -> f32 {
        self.traits.vision_radius
    }

    pub fn physics(&self) -> PhysicsInfo {
        self.traits.physics
    }

    pub fn hunter(&self) -> Option<&Hunter> {
        match &self.kind {
            Kind::Hunter(hunter) => Some(hunter),
            _ => None,
        }
    }

    pub fn hunter_mut(&mut self) -> Option<&mut Hunter> {
        match &mut self.kind {
            Kind::Hunter(hunter) => Some(hunter),
            _ => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != State::Death
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Run { .. })
    }

    pub fn is_scared(&self) -> bool {
        self.scared
    }

    pub fn set_scared(&mut self, scared: bool) {
        self.scared = scared;
    }

    pub fn die(&mut self) {
        self.state = State::Death;
    }

    pub fn as_neighbour(&self) -> Neighbour {
        Neighbour {
            id: self.id,
            species: self.species(),
            position: self.position,
            radius: self.traits.radius,
            state: self.state,
            scared: self.scared,
        }
    }

    /// One simulation step. Entities outside the world die; dead ones
    /// stay still.
    pub fn ask_to_move(
        &mut self,
        neighbours: &[Neighbour],
        ctx: &mut StepContext<'_>,
    ) -> Vec<Effect> {
        if !ctx.info.check_position(self.position, 0.0) {
            self.die();
        }
        if !self.is_alive() {
            return Vec::new();
        }

        match self.species() {
            Species::Rabbit => {
                rabbit::step(self, neighbours, ctx);
                Vec::new()
            }
            Species::Deer => {
                deer::step(self, neighbours, ctx);
                Vec::new()
            }
            Species::Wolf => wolf::step(self, neighbours, ctx),
            Species::Hunter => hunter::step(self, neighbours, ctx),
        }
    }

    /// Push from outside the behaviour logic (the player's controls).
    pub fn apply_world_force(&mut self, force: Vec2, dt: f32, info: &WorldInfo) {
        self.apply_force(force, dt, info);
    }

    /// Flee from the average direction of `dangers`.
    pub fn run_from_danger(&mut self, dangers: &[Vec2], ctx: &StepContext<'_>) {
        let heading = -dangers
            .iter()
            .map(|danger| *danger - self.position)
            .sum::<Vec2>()
            .normalize_or_zero();
        self.state = State::Run {
            countdown: self.traits.run_duration,
            heading,
        };
        let to = self.position + heading + self.walls_force(ctx.info, &ctx.settings.walls);
        self.apply_desire_position(to, self.traits.physics.max_speed, ctx);
    }

    fn has_run_left(&self) -> bool {
        matches!(self.state, State::Run { countdown, .. } if countdown > 0.0)
    }

    /// Flee direction scaled by the share of the run still left. Zero
    /// when not running.
    pub fn run_heading(&self) -> Vec2 {
        match self.state {
            State::Run { countdown, heading } if self.traits.run_duration > 0.0 => {
                heading * (countdown / self.traits.run_duration)
            }
            _ => Vec2::ZERO,
        }
    }

    fn continue_running(&mut self, ctx: &StepContext<'_>) {
        let State::Run { countdown, heading } = self.state else {
            return;
        };
        let faded = self.run_heading();
        self.state = State::Run {
            countdown: countdown - ctx.dt,
            heading,
        };

        let to = self.position + faded + self.walls_force(ctx.info, &ctx.settings.walls);
        self.apply_desire_position(to, self.traits.physics.max_speed, ctx);
    }

    fn move_idle(&mut self, ctx: &mut StepContext<'_>) {
        if !matches!(self.state, State::Idle { copy: false, .. }) {
            self.state = State::default();
        }

        let target = match self.state {
            State::Idle { to: Some(to), .. } if self.position.distance(to) > self.traits.radius => {
                to
            }
            _ => {
                let to = self.choose_idle_point(ctx);
                self.state = State::Idle {
                    to: Some(to),
                    copy: false,
                };
                to
            }
        };

        let physics = self.traits.physics;
        let force = compute_steering_force(
            self.position,
            target,
            self.velocity,
            physics.max_idle_speed,
            physics.max_idle_force,
        );
        self.apply_force(force, ctx.dt, ctx.info);
    }

    /// Steer toward `to` at up to `max_speed` with the species' full force.
    fn apply_desire_position(&mut self, to: Vec2, max_speed: f32, ctx: &StepContext<'_>) {
        let force = compute_steering_force(
            self.position,
            to,
            self.velocity,
            max_speed,
            self.traits.physics.max_force,
        );
        self.apply_force(force, ctx.dt, ctx.info);
    }

    fn apply_force(&mut self, acc: Vec2, dt: f32, info: &WorldInfo) {
        let physics = self.traits.physics;
        self.velocity += acc.clamp_length_max(physics.max_force) / physics.mass;

        let friction = self.velocity.length().min(physics.mass * physics.friction_k);
        self.velocity -= self.velocity.normalize_or_zero() * friction;

        self.velocity = self.velocity.clamp_length_max(physics.max_speed);
        self.position = info.adjust_bounds(self.position + self.velocity * dt);
    }

    /// Living neighbours inside the vision radius.
    fn entities_nearby<'n>(
        &self,
        neighbours: &'n [Neighbour],
    ) -> impl Iterator<Item = &'n Neighbour> + use<'n> {
        let position = self.position;
        let vision = self.traits.vision_radius;
        neighbours
            .iter()
            .filter(move |n| n.is_alive() && position.distance(n.position) < vision)
    }

    /// Push away from walls closer than the trigger distance, growing
    /// linearly to `max_push` at the wall itself.
    pub fn walls_force(&self, info: &WorldInfo, walls: &WallSettings) -> Vec2 {
        let trigger = walls.trigger_distance;
        if trigger <= 0.0 {
            return Vec2::ZERO;
        }
        let axis = |pos: f32, extent: f32| {
            if pos < trigger {
                (trigger - pos) / trigger * walls.max_push
            } else if pos > extent - trigger {
                (extent - trigger - pos) / trigger * walls.max_push
            } else {
                0.0
            }
        };
        Vec2::new(
            axis(self.position.x, info.width),
            axis(self.position.y, info.height),
        )
    }

    /// Pick a random point within vision, one candidate per quadrant,
    /// keeping clear of the walls by `mass * radius`. With no candidate
    /// clear of the walls, head for the middle of the world.
    pub fn choose_idle_point(&self, ctx: &mut StepContext<'_>) -> Vec2 {
        let margin = self.traits.physics.mass * self.traits.radius;
        let vision = self.traits.vision_radius;

        let candidates: Vec<Vec2> = (0..4)
            .map(|quadrant| {
                let angle = (quadrant as f32 + ctx.rng.gen_range(0.0f32..1.0)) * FRAC_PI_2;
                let distance = ctx.rng.gen_range(0.0f32..1.0) * vision;
                self.position + Vec2::new(angle.cos() * distance, angle.sin() * distance)
            })
            .filter(|to| ctx.info.check_position(*to, margin))
            .collect();

        if candidates.is_empty() {
            return ctx.info.center();
        }
        candidates[ctx.rng.gen_range(0..candidates.len())]
    }
}
