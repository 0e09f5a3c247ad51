//! Mesh cache
//!
//! Meshing is the most expensive step of a 3D redraw, while most redraws
//! only change the camera. The cache keeps the last few meshes in a fixed
//! ring; the oldest-inserted entry is replaced first, regardless of how
//! recently it was used.

use alloc::string::String;

use super::mesh::{generate_mesh, Mesh};
use crate::traits::{Cooperate, SurfaceEvaluator};

/// Meshes kept at once
pub const CACHE_CAPACITY: usize = 5;

static EMPTY_MESH: Mesh = Mesh::empty();

/// Everything that determines a mesh
#[derive(Debug, Clone)]
pub struct MeshKey {
    pub source: String,
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
    pub resolution: u16,
}

impl MeshKey {
    fn matches(
        &self,
        source: &str,
        x_range: (f32, f32),
        y_range: (f32, f32),
        resolution: u16,
    ) -> bool {
        // Bitwise so that a key always equals itself, NaN included
        let same = |a: (f32, f32), b: (f32, f32)| {
            a.0.to_bits() == b.0.to_bits() && a.1.to_bits() == b.1.to_bits()
        };
        self.resolution == resolution
            && same(self.x_range, x_range)
            && same(self.y_range, y_range)
            && self.source == source
    }
}

/// Hit/miss/eviction counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub evictions: u32,
}

struct Entry {
    key: MeshKey,
    mesh: Mesh,
}

/// Fixed-capacity ring of generated meshes
pub struct MeshCache {
    entries: [Option<Entry>; CACHE_CAPACITY],
    next: usize,
    stats: CacheStats,
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshCache {
    pub fn new() -> Self {
        Self {
            entries: Default::default(),
            next: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every mesh, keeping the counters
    pub fn clear(&mut self) {
        self.entries = Default::default();
        self.next = 0;
    }

    /// Whether a mesh for this key is cached
    pub fn contains(
        &self,
        source: &str,
        x_range: (f32, f32),
        y_range: (f32, f32),
        resolution: u16,
    ) -> bool {
        self.find(source, x_range, y_range, resolution).is_some()
    }

    /// Cached mesh for the key, generating and inserting it on a miss
    ///
    /// Empty meshes (invalid input) are returned but not cached. Returns
    /// `None` if generation was cancelled; nothing is cached then either.
    pub fn get_or_generate<S, C>(
        &mut self,
        eval: &mut S,
        x_range: (f32, f32),
        y_range: (f32, f32),
        resolution: u16,
        coop: &mut C,
    ) -> Option<&Mesh>
    where
        S: SurfaceEvaluator + ?Sized,
        C: Cooperate,
    {
        if let Some(index) = self.find(eval.source(), x_range, y_range, resolution) {
            self.stats.hits = self.stats.hits.wrapping_add(1);
            return self.entries[index].as_ref().map(|e| &e.mesh);
        }

        self.stats.misses = self.stats.misses.wrapping_add(1);
        let mesh = generate_mesh(eval, x_range, y_range, resolution, coop)?;
        if mesh.is_empty() {
            return Some(&EMPTY_MESH);
        }

        let key = MeshKey {
            source: String::from(eval.source()),
            x_range,
            y_range,
            resolution,
        };
        let slot = self.next;
        if self.entries[slot].is_some() {
            self.stats.evictions = self.stats.evictions.wrapping_add(1);
        }
        self.entries[slot] = Some(Entry { key, mesh });
        self.next = (slot + 1) % CACHE_CAPACITY;

        self.entries[slot].as_ref().map(|e| &e.mesh)
    }

    fn find(
        &self,
        source: &str,
        x_range: (f32, f32),
        y_range: (f32, f32),
        resolution: u16,
    ) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry
                .as_ref()
                .is_some_and(|e| e.key.matches(source, x_range, y_range, resolution))
        })
    }
}
