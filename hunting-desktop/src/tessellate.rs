//! Shape tessellation.
//!
//! Every `Shape` becomes a run of coloured triangles in world coordinates.
//! The camera transform happens in the vertex shader, so nothing here
//! depends on the window size.

use hunting_core::Vec2;
use hunting_core::scene::{Color, Fill, Shape};

/// Segments used for a full circle.
pub const CIRCLE_SEGMENTS: usize = 32;
/// Stroke width of outlined circles, rectangles and polygons.
pub const OUTLINE_WIDTH: f32 = 1.5;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    fn new(pos: Vec2, color: [f32; 4]) -> Self {
        Self {
            pos: [pos.x, pos.y],
            color,
        }
    }
}

/// Append the triangles of `shape` to `out`.
pub fn tessellate(shape: &Shape, out: &mut Vec<Vertex>) {
    match shape {
        Shape::Circle {
            center,
            radius,
            color,
            fill: Fill::Solid,
        } => fan(*center, *radius, 0.0, 360.0, CIRCLE_SEGMENTS, rgba(*color), out),
        Shape::Circle {
            center,
            radius,
            color,
            fill: Fill::Outline,
        } => ring(*center, *radius, OUTLINE_WIDTH, rgba(*color), out),
        Shape::Rect {
            origin,
            size,
            color,
            fill: Fill::Solid,
        } => {
            let c = rgba(*color);
            let (x0, y0) = (origin.x, origin.y);
            let (x1, y1) = (origin.x + size.x, origin.y + size.y);
            quad(
                [
                    Vec2::new(x0, y0),
                    Vec2::new(x1, y0),
                    Vec2::new(x1, y1),
                    Vec2::new(x0, y1),
                ],
                c,
                out,
            );
        }
        Shape::Rect {
            origin,
            size,
            color,
            fill: Fill::Outline,
        } => {
            let corners = [
                *origin,
                Vec2::new(origin.x + size.x, origin.y),
                *origin + *size,
                Vec2::new(origin.x, origin.y + size.y),
            ];
            outline(&corners, OUTLINE_WIDTH, rgba(*color), out);
        }
        Shape::Line {
            from,
            to,
            width,
            color,
        } => segment(*from, *to, *width, rgba(*color), out),
        Shape::Arc {
            center,
            radius,
            start_degrees,
            degrees,
            color,
        } => {
            if *degrees == 0.0 {
                return;
            }
            let sweep = CIRCLE_SEGMENTS as f32 * degrees.abs() / 360.0;
            let segments = (sweep.ceil() as usize).max(1);
            fan(*center, *radius, *start_degrees, *degrees, segments, rgba(*color), out);
        }
        Shape::Polygon { points, color } => outline(points, OUTLINE_WIDTH, rgba(*color), out),
    }
}

/// Tessellate a whole list of shapes into one vertex buffer.
pub fn tessellate_all<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Vec<Vertex> {
    let mut out = Vec::new();
    for shape in shapes {
        tessellate(shape, &mut out);
    }
    out
}

fn rgba(color: Color) -> [f32; 4] {
    [color.r, color.g, color.b, color.a]
}

fn point_on_circle(center: Vec2, radius: f32, degrees: f32) -> Vec2 {
    let angle = degrees.to_radians();
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Pie slice from the centre, counter-clockwise for positive `degrees`.
fn fan(
    center: Vec2,
    radius: f32,
    start: f32,
    degrees: f32,
    segments: usize,
    color: [f32; 4],
    out: &mut Vec<Vertex>,
) {
    let step = degrees / segments as f32;
    for i in 0..segments {
        let a = point_on_circle(center, radius, start + step * i as f32);
        let b = point_on_circle(center, radius, start + step * (i + 1) as f32);
        out.push(Vertex::new(center, color));
        out.push(Vertex::new(a, color));
        out.push(Vertex::new(b, color));
    }
}

fn ring(center: Vec2, radius: f32, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let inner = (radius - width / 2.0).max(0.0);
    let outer = radius + width / 2.0;
    let step = 360.0 / CIRCLE_SEGMENTS as f32;
    for i in 0..CIRCLE_SEGMENTS {
        let from = step * i as f32;
        let to = step * (i + 1) as f32;
        quad(
            [
                point_on_circle(center, inner, from),
                point_on_circle(center, outer, from),
                point_on_circle(center, outer, to),
                point_on_circle(center, inner, to),
            ],
            color,
            out,
        );
    }
}

/// Closed stroke through `points`.
fn outline(points: &[Vec2], width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    if points.len() < 2 {
        return;
    }
    for (i, from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        segment(*from, to, width, color, out);
    }
}

fn segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let direction = to - from;
    if direction.length() == 0.0 {
        return;
    }
    let side = Vec2::new(-direction.y, direction.x).normalize_or_zero() * (width / 2.0);
    quad([from - side, from + side, to + side, to - side], color, out);
}

/// Two triangles over a convex quad given in winding order.
fn quad(corners: [Vec2; 4], color: [f32; 4], out: &mut Vec<Vertex>) {
    let [a, b, c, d] = corners;
    out.extend([a, b, c, a, c, d].map(|p| Vertex::new(p, color)));
}
