//! Perspective projection and wireframe drawing
//!
//! Points are rotated about X (tilt), then Y (azimuth), then Z (roll), and
//! divided by depth relative to the camera distance.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use libm::{cosf, sinf};
use peanut_display::{palette, DisplaySurface, Rgb565};

use super::mesh::Mesh;
use crate::geometry::{Point3D, ScreenPoint};
use crate::graph::Viewport;

/// Pixels per model unit at unit perspective factor
pub const SCALE: f32 = 20.0;

/// Substitute depth when a point sits exactly on the camera plane
pub const DEPTH_EPSILON: f32 = 0.001;

/// Triangles whose mean depth is below this are behind the viewer
pub const CULL_DEPTH: f32 = -2.0;

/// Closest the camera may get
pub const MIN_DISTANCE: f32 = 0.1;

/// Rotation applied per key press (radians)
pub const ROTATE_STEP: f32 = 0.1;

/// Length of the drawn axes in model units
pub const AXIS_LENGTH: f32 = 5.0;

/// Viewing angles and distance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Camera {
    /// Rotation about X
    pub tilt: f32,
    /// Rotation about Y
    pub azimuth: f32,
    /// Rotation about Z
    pub roll: f32,
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            tilt: 0.3,
            azimuth: 0.8,
            roll: 0.0,
            distance: 15.0,
        }
    }
}

/// A projected point and its depth after rotation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Projected {
    pub screen: ScreenPoint,
    pub depth: f32,
}

/// Result of a wireframe pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireframeStats {
    pub triangles_drawn: usize,
    pub triangles_culled: usize,
    pub edges_drawn: usize,
    /// Edges skipped because an endpoint fell off the surface
    pub edges_clipped: usize,
}

/// Camera plus where the projection lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector3D {
    camera: Camera,
    center: ScreenPoint,
    scale: f32,
}

impl Projector3D {
    /// Projector centred on `center` with the default camera
    pub fn new(center: ScreenPoint) -> Self {
        Self {
            camera: Camera::default(),
            center,
            scale: SCALE,
        }
    }

    /// Projector centred on a surface of the given size
    pub fn for_surface(width: u16, height: u16) -> Self {
        Self::new(ScreenPoint::new(
            i32::from(width) / 2,
            i32::from(height) / 2,
        ))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Add to tilt and azimuth
    pub fn rotate(&mut self, d_tilt: f32, d_azimuth: f32) {
        self.camera.tilt += d_tilt;
        self.camera.azimuth += d_azimuth;
    }

    /// Multiply the camera distance, never closer than [`MIN_DISTANCE`]
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.camera.distance = (self.camera.distance * factor).max(MIN_DISTANCE);
        }
    }

    pub fn reset_view(&mut self) {
        self.camera = Camera::default();
    }

    /// Project one point
    pub fn project_point(&self, p: Point3D) -> Projected {
        let c = &self.camera;
        let (sin_x, cos_x) = (sinf(c.tilt), cosf(c.tilt));
        let (sin_y, cos_y) = (sinf(c.azimuth), cosf(c.azimuth));
        let (sin_z, cos_z) = (sinf(c.roll), cosf(c.roll));

        let y1 = p.y * cos_x - p.z * sin_x;
        let z1 = p.y * sin_x + p.z * cos_x;

        let x2 = p.x * cos_y + z1 * sin_y;
        let mut z2 = -p.x * sin_y + z1 * cos_y;

        let x3 = x2 * cos_z - y1 * sin_z;
        let y3 = x2 * sin_z + y1 * cos_z;

        if z2 + c.distance == 0.0 {
            z2 = DEPTH_EPSILON;
        }
        let factor = c.distance / (z2 + c.distance);

        Projected {
            screen: ScreenPoint::new(
                self.center.x.saturating_add((x3 * factor * self.scale) as i32),
                self.center.y.saturating_add((-y3 * factor * self.scale) as i32),
            ),
            depth: z2,
        }
    }

    /// Draw every visible triangle edge once
    ///
    /// Vertices are projected once up front. Triangles with mean depth
    /// below [`CULL_DEPTH`] are skipped, as are triangles referencing
    /// missing vertices. An edge with either endpoint off the surface is
    /// not drawn.
    pub fn draw_wireframe(
        &self,
        surface: &mut DisplaySurface,
        mesh: &Mesh,
        color: Rgb565,
    ) -> WireframeStats {
        let mut stats = WireframeStats::default();
        if mesh.is_empty() {
            return stats;
        }

        let mut projected = Vec::new();
        if projected.try_reserve_exact(mesh.vertices().len()).is_err() {
            return stats;
        }
        projected.extend(mesh.vertices().iter().map(|&v| self.project_point(v)));

        let on_surface = |p: ScreenPoint| {
            p.x >= 0
                && p.y >= 0
                && p.x < i32::from(surface.width())
                && p.y < i32::from(surface.height())
        };

        let mut drawn: BTreeSet<(u16, u16)> = BTreeSet::new();
        let mut lines: Vec<(ScreenPoint, ScreenPoint)> = Vec::new();

        for &[a, b, c] in mesh.triangles() {
            let (Some(pa), Some(pb), Some(pc)) = (
                projected.get(usize::from(a)),
                projected.get(usize::from(b)),
                projected.get(usize::from(c)),
            ) else {
                continue;
            };
            if (pa.depth + pb.depth + pc.depth) / 3.0 < CULL_DEPTH {
                stats.triangles_culled += 1;
                continue;
            }
            stats.triangles_drawn += 1;

            for (i, j, pi, pj) in [(a, b, pa, pb), (b, c, pb, pc), (c, a, pc, pa)] {
                if !drawn.insert((i.min(j), i.max(j))) {
                    continue;
                }
                if on_surface(pi.screen) && on_surface(pj.screen) {
                    lines.push((pi.screen, pj.screen));
                } else {
                    stats.edges_clipped += 1;
                }
            }
        }

        for (p, q) in lines {
            surface.draw_line(p.x, p.y, q.x, q.y, color);
            stats.edges_drawn += 1;
        }
        stats
    }

    /// X, Y and Z axes from the origin
    pub fn draw_axes(&self, surface: &mut DisplaySurface) {
        let origin = self.project_point(Point3D::new(0.0, 0.0, 0.0)).screen;
        for (tip, color) in [
            (Point3D::new(AXIS_LENGTH, 0.0, 0.0), palette::AXIS_X),
            (Point3D::new(0.0, AXIS_LENGTH, 0.0), palette::AXIS_Y),
            (Point3D::new(0.0, 0.0, AXIS_LENGTH), palette::AXIS_Z),
        ] {
            let end = self.project_point(tip).screen;
            surface.draw_line(origin.x, origin.y, end.x, end.y, color);
        }
    }

    /// Parametric curve t ↦ (x, y, z) over `t_range` in `steps` steps
    ///
    /// Non-finite points are dropped. Each on-screen point is joined to the
    /// previous kept point. Returns the number of segments drawn.
    pub fn plot_parametric<F>(
        &self,
        surface: &mut DisplaySurface,
        mut curve: F,
        t_range: (f32, f32),
        steps: usize,
        color: Rgb565,
    ) -> usize
    where
        F: FnMut(f32) -> Point3D,
    {
        let steps = steps.max(1);
        let step = (t_range.1 - t_range.0) / steps as f32;
        let (w, h) = (i32::from(surface.width()), i32::from(surface.height()));
        let mut prev: Option<ScreenPoint> = None;
        let mut segments = 0;

        for i in 0..=steps {
            let p = curve(t_range.0 + i as f32 * step);
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                continue;
            }
            let s = self.project_point(p).screen;
            if let Some(q) = prev {
                if s.x >= 0 && s.y >= 0 && s.x < w && s.y < h {
                    surface.draw_line(q.x, q.y, s.x, s.y, color);
                    segments += 1;
                }
            }
            prev = Some(s);
        }
        segments
    }

    /// Clear `area`, then draw axes and the wireframe as requested
    pub fn render_scene(
        &self,
        surface: &mut DisplaySurface,
        area: &Viewport,
        mesh: Option<&Mesh>,
        show_axes: bool,
        show_wireframe: bool,
    ) -> WireframeStats {
        surface.fill_rect(
            area.x,
            area.y,
            u32::from(area.width),
            u32::from(area.height),
            palette::BACKGROUND,
        );
        if show_axes {
            self.draw_axes(surface);
        }
        match mesh {
            Some(mesh) if show_wireframe => self.draw_wireframe(surface, mesh, palette::WIREFRAME),
            _ => WireframeStats::default(),
        }
    }
}
