use glam::Vec2;

/// Classic "seek" steering: the force that turns `velocity` toward
/// `desired_position` at `max_speed`, capped at `max_force`.
pub fn compute_steering_force(
    position: Vec2,
    desired_position: Vec2,
    velocity: Vec2,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    let desired = (desired_position - position).normalize_or_zero() * max_speed;
    (desired - velocity).clamp_length_max(max_force)
}
