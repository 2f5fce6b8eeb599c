//! Chunked spatial index.
//!
//! The world is cut into square-ish chunks. Each tracked point lives in
//! exactly one chunk; a neighbour query scans the block of chunks around
//! the point's own chunk instead of the whole population.

use std::collections::{HashMap, HashSet};

pub type PointId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedPoint {
    chunk: i64,
    x: i64,
    y: i64,
}

/// A point returned by a neighbour query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultPoint {
    pub id: PointId,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone)]
pub struct BoxSearch {
    horizontal_chunks: i64,
    chunk_size_h: i64,
    chunk_size_w: i64,
    chunks: HashMap<i64, HashSet<PointId>>,
    points: HashMap<PointId, TrackedPoint>,
}

impl BoxSearch {
    /// Chunk sizes are clamped to at least one unit.
    pub fn new(horizontal_chunks: u32, chunk_size_h: u32, chunk_size_w: u32) -> Self {
        Self {
            horizontal_chunks: i64::from(horizontal_chunks),
            chunk_size_h: i64::from(chunk_size_h.max(1)),
            chunk_size_w: i64::from(chunk_size_w.max(1)),
            chunks: HashMap::new(),
            points: HashMap::new(),
        }
    }

    /// Insert a point or move an existing one. Coordinates are truncated.
    pub fn update_point(&mut self, id: PointId, x: f32, y: f32) {
        let x = x as i64;
        let y = y as i64;
        let chunk = self.chunk_of(x, y);

        match self.points.get_mut(&id) {
            Some(point) => {
                point.x = x;
                point.y = y;
                if point.chunk != chunk {
                    let old = point.chunk;
                    point.chunk = chunk;
                    if let Some(members) = self.chunks.get_mut(&old) {
                        members.remove(&id);
                        if members.is_empty() {
                            self.chunks.remove(&old);
                        }
                    }
                    self.chunks.entry(chunk).or_default().insert(id);
                }
            }
            None => {
                self.points.insert(id, TrackedPoint { chunk, x, y });
                self.chunks.entry(chunk).or_default().insert(id);
            }
        }
    }

    pub fn remove_point(&mut self, id: PointId) {
        if let Some(point) = self.points.remove(&id) {
            if let Some(members) = self.chunks.get_mut(&point.chunk) {
                members.remove(&id);
                if members.is_empty() {
                    self.chunks.remove(&point.chunk);
                }
            }
        }
    }

    /// Every other point within `radius` chunks (in both axes) of the
    /// chunk holding `id`. Unknown ids have no neighbours.
    pub fn neighbours(&self, id: PointId, radius: u32) -> Vec<ResultPoint> {
        let Some(origin) = self.points.get(&id) else {
            return Vec::new();
        };

        let radius = i64::from(radius);
        let chunk_h = origin.x / self.chunk_size_h;
        let chunk_w = origin.y / self.chunk_size_w;

        // Columns past either edge would alias into the neighbouring row.
        let first = (chunk_h - radius).max(0);
        let last = (chunk_h + radius).min(self.horizontal_chunks - 1);

        let mut result = Vec::new();
        for i in first..=last {
            for j in (chunk_w - radius)..=(chunk_w + radius) {
                let Some(members) = self.chunks.get(&(self.horizontal_chunks * j + i)) else {
                    continue;
                };
                result.extend(
                    members
                        .iter()
                        .filter(|other| **other != id)
                        .filter_map(|other| {
                            self.points.get(other).map(|p| ResultPoint {
                                id: *other,
                                x: p.x,
                                y: p.y,
                            })
                        }),
                );
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    fn chunk_of(&self, x: i64, y: i64) -> i64 {
        self.horizontal_chunks * (y / self.chunk_size_w) + x / self.chunk_size_h
    }
}
