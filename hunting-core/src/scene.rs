//! Scene compositor.
//!
//! Turns the world into a flat list of world-space shapes. The desktop
//! renderer only knows how to tessellate `Shape`s; it never sees entities.

use crate::entity::{Entity, Kind, Species, State, shooting_ranges};
use crate::settings::GameSettings;
use glam::Vec2;
use crate::world::World;

/// RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
    pub const GOLD: Color = Color::rgb8(255, 215, 0);
    pub const GOLDENROD: Color = Color::rgb8(218, 165, 32);
    pub const SALMON: Color = Color::rgb8(250, 128, 114);
    pub const BROWN: Color = Color::rgb8(139, 69, 19);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }
}

const GRID_COLOR: Color = Color::rgb8(52, 89, 56);
const RANGE_COLOR: Color = Color::rgba(105.0 / 255.0, 16.0 / 255.0, 13.0 / 255.0, 0.5);
const VISION_COLOR: Color = Color::rgba(1.0, 1.0, 1.0, 0.1);
const TARGET_SIZE: f32 = 5.0;
const VELOCITY_WIDTH: f32 = 5.0;
const GRID_LINE_WIDTH: f32 = 1.0;
const RELOAD_RING: f32 = 2.0;
pub const MAX_GRID_LINES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Solid,
    Outline,
}

/// A primitive in world coordinates (y up).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        fill: Fill,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Color,
        fill: Fill,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Filled pie slice, `degrees` counter-clockwise from `start_degrees`.
    Arc {
        center: Vec2,
        radius: f32,
        start_degrees: f32,
        degrees: f32,
        color: Color,
    },
    /// Closed outline through `points`.
    Polygon { points: Vec<Vec2>, color: Color },
}

/// Orthographic camera: `position` is the centre of the visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    /// A camera looking at the lower-left `width`×`height` of the world.
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::new(viewport_width / 2.0, viewport_height / 2.0),
            viewport_width,
            viewport_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear: Color,
    pub camera: Camera,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn empty(camera: Camera) -> Self {
        Self {
            clear: Color::BLACK,
            camera,
            shapes: Vec::new(),
        }
    }
}

/// Draw the whole world as seen by `camera`.
pub fn compose(world: &World, camera: Camera) -> Scene {
    let mut scene = Scene::empty(camera);
    let settings = world.settings();

    draw_background(world, settings, &mut scene.shapes);
    for entity in world.entities() {
        draw_entity(entity, settings, &mut scene.shapes);
    }
    scene
}

fn draw_background(world: &World, settings: &GameSettings, shapes: &mut Vec<Shape>) {
    let info = world.info();

    shapes.push(Shape::Rect {
        origin: Vec2::ZERO,
        size: Vec2::new(info.width, info.height),
        color: Color::WHITE,
        fill: Fill::Outline,
    });

    let spacing = settings.grid_spacing;
    for x in grid_offsets(info.width, spacing) {
        shapes.push(Shape::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, info.height),
            width: GRID_LINE_WIDTH,
            color: GRID_COLOR,
        });
    }
    for y in grid_offsets(info.height, spacing) {
        shapes.push(Shape::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(info.width, y),
            width: GRID_LINE_WIDTH,
            color: GRID_COLOR,
        });
    }
}

/// Offsets `0, spacing, 2 * spacing, ...` below `extent`, at most `MAX_GRID_LINES` of them.
fn grid_offsets(extent: f32, spacing: f32) -> impl Iterator<Item = f32> {
    let count = if spacing > 0.0 {
        ((extent / spacing).ceil() as usize).min(MAX_GRID_LINES)
    } else {
        0
    };
    (0..count).map(move |i| i as f32 * spacing)
}

pub fn species_color(species: Species) -> Color {
    match species {
        Species::Rabbit => Color::WHITE,
        Species::Wolf => Color::BROWN,
        Species::Deer => Color::YELLOW,
        Species::Hunter => Color::SALMON,
    }
}

fn draw_entity(entity: &Entity, settings: &GameSettings, shapes: &mut Vec<Shape>) {
    if !entity.is_alive() {
        return;
    }

    match entity.kind() {
        Kind::Hunter(_) => draw_hunter(entity, settings, shapes),
        Kind::Deer => {
            draw_body(entity, settings, shapes);
            if let State::Idle { copy: true, .. } = entity.state() {
                shapes.push(Shape::Circle {
                    center: entity.position(),
                    radius: entity.radius(),
                    color: Color::GOLDENROD,
                    fill: Fill::Solid,
                });
            }
        }
        Kind::Rabbit | Kind::Wolf(_) => draw_body(entity, settings, shapes),
    }
}

/// Debug overlays plus the filled body.
fn draw_body(entity: &Entity, settings: &GameSettings, shapes: &mut Vec<Shape>) {
    let position = entity.position();
    let debug = settings.debug;

    if debug.vision_circle {
        shapes.push(Shape::Circle {
            center: position,
            radius: entity.vision_radius(),
            color: VISION_COLOR,
            fill: Fill::Outline,
        });
    }

    if debug.idle_target {
        if let State::Idle {
            to: Some(to),
            copy: false,
        } = entity.state()
        {
            shapes.push(Shape::Rect {
                origin: Vec2::new(to.x - TARGET_SIZE / 2.0, to.y - TARGET_SIZE / 2.0),
                size: Vec2::new(TARGET_SIZE, TARGET_SIZE),
                color: Color::RED,
                fill: Fill::Solid,
            });
        }
    }

    if debug.velocity_vector {
        shapes.push(Shape::Line {
            from: position,
            to: position + entity.velocity(),
            width: VELOCITY_WIDTH,
            color: Color::GOLD,
        });
    }

    shapes.push(Shape::Circle {
        center: position,
        radius: entity.radius(),
        color: species_color(entity.species()),
        fill: Fill::Solid,
    });
}

fn draw_hunter(entity: &Entity, settings: &GameSettings, shapes: &mut Vec<Shape>) {
    let Some(hunter) = entity.hunter() else {
        return;
    };
    let position = entity.position();
    let behaviour = &settings.hunter_behaviour;

    for range in shooting_ranges(entity.velocity(), entity.physics().max_speed, behaviour) {
        shapes.push(Shape::Circle {
            center: position,
            radius: range.distance,
            color: RANGE_COLOR,
            fill: Fill::Outline,
        });
    }

    shapes.push(Shape::Polygon {
        points: gun_outline(position, hunter.aim(), behaviour.gun_width, behaviour.gun_height),
        color: Color::GOLD,
    });

    draw_body(entity, settings, shapes);

    for bullet in hunter.bullets() {
        shapes.push(Shape::Circle {
            center: bullet.position,
            radius: behaviour.bullet_radius,
            color: Color::GOLD,
            fill: Fill::Solid,
        });
    }

    shapes.push(Shape::Arc {
        center: position,
        radius: entity.radius() + RELOAD_RING,
        start_degrees: 90.0,
        degrees: 360.0 * hunter.reload_progress(),
        color: Color::GOLD,
    });
}

/// The barrel: a `width`×`length` rectangle from the hunter toward `aim`.
/// Without an aim the barrel points up.
pub fn gun_outline(position: Vec2, aim: Vec2, width: f32, length: f32) -> Vec<Vec2> {
    let forward = if aim == Vec2::ZERO { Vec2::new(0.0, 1.0) } else { aim.normalize_or_zero() };
    let side = Vec2::new(forward.y, -forward.x) * (width / 2.0);
    let tip = forward * length;

    vec![
        position - side,
        position + side,
        position + side + tip,
        position - side + tip,
    ]
}
