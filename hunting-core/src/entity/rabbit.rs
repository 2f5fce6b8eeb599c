use super::{Entity, Neighbour, StepContext};
use glam::Vec2;

/// Rabbits trust nobody: anything in sight is a reason to run.
pub(super) fn step(rabbit: &mut Entity, neighbours: &[Neighbour], ctx: &mut StepContext<'_>) {
    let dangers: Vec<Vec2> = rabbit
        .entities_nearby(neighbours)
        .map(|n| n.position)
        .collect();

    if !dangers.is_empty() {
        rabbit.run_from_danger(&dangers, ctx);
    } else if rabbit.has_run_left() {
        rabbit.continue_running(ctx);
    } else {
        rabbit.move_idle(ctx);
    }
}
