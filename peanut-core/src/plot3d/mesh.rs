//! Surface meshes

use alloc::vec::Vec;

use crate::geometry::Point3D;
use crate::traits::{Cooperate, PlotValue, SurfaceEvaluator};

/// Largest grid edge; keeps vertex indices within `u16`
pub const MAX_RESOLUTION: u16 = 255;

/// Grid rows between cooperative checkpoints
pub const ROWS_PER_CHECKPOINT: usize = 4;

/// Sampled surface: vertices plus triangle index triples
///
/// Built once and never modified.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Point3D>,
    triangles: Vec<[u16; 3]>,
}

impl Mesh {
    pub const fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Point3D] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u16; 3]] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }
}

/// Sample `eval` on a `resolution × resolution` grid
///
/// Vertex `i * resolution + j` sits at
/// `(x_min + i·Δx, y_min + j·Δy, f(x, y))`; non-finite heights become 0.
/// Each grid cell yields triangles `(p1, p2, p3)` and `(p2, p4, p3)`.
///
/// Returns an empty mesh for a resolution outside `2..=MAX_RESOLUTION`, an
/// invalid range, or when memory for the mesh cannot be reserved. Returns
/// `None` if a checkpoint cancelled generation.
pub fn generate_mesh<S, C>(
    eval: &mut S,
    x_range: (f32, f32),
    y_range: (f32, f32),
    resolution: u16,
    coop: &mut C,
) -> Option<Mesh>
where
    S: SurfaceEvaluator + ?Sized,
    C: Cooperate,
{
    let valid_range = |(lo, hi): (f32, f32)| lo.is_finite() && hi.is_finite() && hi > lo;
    if !(2..=MAX_RESOLUTION).contains(&resolution) || !valid_range(x_range) || !valid_range(y_range)
    {
        return Some(Mesh::empty());
    }

    let n = usize::from(resolution);
    let cells = (n - 1) * (n - 1);
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    if vertices.try_reserve_exact(n * n).is_err() || triangles.try_reserve_exact(cells * 2).is_err()
    {
        return Some(Mesh::empty());
    }

    let x_step = (x_range.1 - x_range.0) / (n - 1) as f32;
    let y_step = (y_range.1 - y_range.0) / (n - 1) as f32;

    for i in 0..n {
        if i > 0 && i % ROWS_PER_CHECKPOINT == 0 && coop.checkpoint().is_break() {
            return None;
        }
        let x = x_range.0 + i as f32 * x_step;
        for j in 0..n {
            let y = y_range.0 + j as f32 * y_step;
            let z = eval.evaluate3d(x, y).plot_value();
            vertices.push(Point3D::new(x, y, if z.is_finite() { z } else { 0.0 }));
        }
    }

    // n <= 255 so every index fits in u16
    let idx = |i: usize, j: usize| (i * n + j) as u16;
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            let p1 = idx(i, j);
            let p2 = idx(i, j + 1);
            let p3 = idx(i + 1, j);
            let p4 = idx(i + 1, j + 1);
            triangles.push([p1, p2, p3]);
            triangles.push([p2, p4, p3]);
        }
    }

    Some(Mesh {
        vertices,
        triangles,
    })
}
