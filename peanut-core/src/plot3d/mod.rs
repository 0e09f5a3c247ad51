//! 3D surface plotting
//!
//! A surface z = f(x, y) is sampled into a [`Mesh`] on a square grid,
//! memoized by [`MeshCache`], and drawn as a wireframe by
//! [`Projector3D`] with a simple perspective camera.

mod cache;
mod mesh;
mod projector;

pub use cache::{CacheStats, MeshCache, MeshKey, CACHE_CAPACITY};
pub use mesh::{generate_mesh, Mesh, MAX_RESOLUTION};
pub use projector::{Camera, Projected, Projector3D, WireframeStats, ROTATE_STEP};
