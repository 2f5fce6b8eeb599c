use super::{Effect, Entity, Kind, Neighbour, Species, State, StepContext};
use crate::settings::WolfSettings;
use glam::Vec2;

/// A wolf starves unless it eats before `hunger` runs out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wolf {
    hunger: f32,
}

impl Wolf {
    pub fn new(settings: &WolfSettings) -> Self {
        Self {
            hunger: settings.life_time_without_meal,
        }
    }

    /// Seconds left before starving.
    pub fn time_without_meal_left(&self) -> f32 {
        self.hunger
    }
}

pub(super) fn step(
    wolf: &mut Entity,
    neighbours: &[Neighbour],
    ctx: &mut StepContext<'_>,
) -> Vec<Effect> {
    let behaviour = ctx.settings.wolf_behaviour;

    if let State::Eat { countdown } = wolf.state {
        eat(wolf, countdown, ctx.dt, &behaviour);
        return Vec::new();
    }

    if let Kind::Wolf(data) = &mut wolf.kind {
        data.hunger -= ctx.dt;
        if data.hunger < 0.0 {
            tracing::debug!(id = wolf.id, "wolf starved");
            wolf.die();
            return Vec::new();
        }
    }

    let position = wolf.position;
    let victim = wolf
        .entities_nearby(neighbours)
        .filter(|n| matches!(n.species, Species::Rabbit | Species::Deer | Species::Hunter))
        .min_by(|a, b| position.distance(a.position).total_cmp(&position.distance(b.position)))
        .copied();

    let Some(victim) = victim else {
        wolf.move_idle(ctx);
        return Vec::new();
    };

    if victim.position.distance(position) < victim.radius + wolf.traits.radius {
        wolf.state = State::Eat {
            countdown: behaviour.eat_duration,
        };
        wolf.velocity = Vec2::ZERO;
        vec![Effect::Kill(victim.id)]
    } else {
        chase(wolf, victim.position, ctx);
        Vec::new()
    }
}

fn eat(wolf: &mut Entity, countdown: f32, dt: f32, behaviour: &WolfSettings) {
    if let Kind::Wolf(data) = &mut wolf.kind {
        data.hunger = behaviour.life_time_without_meal;
    }
    let left = countdown - dt;
    wolf.state = if left <= 0.0 {
        State::default()
    } else {
        State::Eat { countdown: left }
    };
}

fn chase(wolf: &mut Entity, target: Vec2, ctx: &StepContext<'_>) {
    let direction = (target - wolf.position).normalize_or_zero();
    wolf.state = State::Run {
        countdown: 0.0,
        heading: Vec2::ZERO,
    };
    let to = wolf.position + direction + wolf.walls_force(ctx.info, &ctx.settings.walls);
    wolf.apply_desire_position(to, wolf.traits.physics.max_speed, ctx);
}
