//! Herd behaviour.
//!
//! Deer flee from wolves and the hunter. When nothing threatens them they
//! look for company: a lone deer walks toward the herd it can see, and a
//! deer inside a herd borrows the wandering target of a herd member so the
//! group drifts in one direction.

use super::{Entity, Neighbour, Species, State, StepContext};
use crate::steering::compute_steering_force;
use glam::Vec2;

pub(super) fn step(deer: &mut Entity, neighbours: &[Neighbour], ctx: &mut StepContext<'_>) {
    let nearby: Vec<&Neighbour> = deer.entities_nearby(neighbours).collect();

    let dangers: Vec<Vec2> = nearby
        .iter()
        .filter(|n| matches!(n.species, Species::Wolf | Species::Hunter))
        .map(|n| n.position)
        .collect();

    if !dangers.is_empty() {
        deer.run_from_danger(&dangers, ctx);
        return;
    }
    if deer.has_run_left() {
        deer.continue_running(ctx);
        return;
    }

    let herd: Vec<&Neighbour> = nearby
        .into_iter()
        .filter(|n| n.species == Species::Deer)
        .collect();

    let behaviour = ctx.settings.deer_behaviour;
    if herd.is_empty() {
        deer.move_idle(ctx);
    } else if herd.len() < behaviour.min_group
        && !herd_close(deer, &herd, behaviour.nearby_radius)
    {
        go_to_herd(deer, &herd, ctx);
    } else {
        follow_herd(deer, &herd, ctx);
    }
}

fn herd_close(deer: &Entity, herd: &[&Neighbour], radius: f32) -> bool {
    herd.iter().any(|n| deer.position.distance(n.position) < radius)
}

/// Walk slowly toward the centre of the visible herd.
fn go_to_herd(deer: &mut Entity, herd: &[&Neighbour], ctx: &StepContext<'_>) {
    let centre = herd.iter().map(|n| n.position).sum::<Vec2>() / herd.len() as f32;
    let to = centre + deer.walls_force(ctx.info, &ctx.settings.walls);
    deer.apply_desire_position(to, ctx.settings.deer_behaviour.max_search_speed, ctx);
}

/// Borrow a herd member's own wandering target, relative to that member.
fn follow_herd(deer: &mut Entity, herd: &[&Neighbour], ctx: &mut StepContext<'_>) {
    let borrowed = herd.iter().find_map(|n| match n.state {
        State::Idle {
            to: Some(to),
            copy: false,
        } => Some(to - n.position),
        _ => None,
    });

    let Some(offset) = borrowed else {
        deer.move_idle(ctx);
        return;
    };

    deer.state = State::Idle {
        to: Some(offset),
        copy: true,
    };
    let to = offset + deer.position + deer.walls_force(ctx.info, &ctx.settings.walls);

    let physics = deer.traits.physics;
    let force = compute_steering_force(
        deer.position,
        to,
        deer.velocity,
        physics.max_idle_speed,
        physics.max_idle_force,
    );
    deer.apply_force(force, ctx.dt, ctx.info);
}
