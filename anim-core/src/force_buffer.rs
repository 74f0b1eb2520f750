use crate::types::ParticleId;
use glam::Vec2;

/// A per-tick buffer that accumulates velocity changes per particle.
///
/// Forces are summed, not averaged: two pulls of `(1, 0)` move a particle
/// twice as fast as one.
#[derive(Debug)]
pub struct ForceBuffer {
    /// Accumulated velocity deltas for each particle.
    force: Vec<Vec2>,
}

impl ForceBuffer {
    /// Creates a new [`ForceBuffer`] with the given length.
    ///
    /// ### Parameters
    /// - `len` - Number of particles this buffer can store forces for.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
        }
    }

    /// Resizes the buffer to `len` entries and clears every entry,
    /// even if the length was already correct.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    pub fn clear(&mut self) {
        self.force.fill(Vec2::ZERO);
    }

    /// Adds one velocity contribution for the given particle.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds for the internal array.
    #[inline]
    pub fn add(&mut self, id: ParticleId, delta: Vec2) {
        self.force[id] += delta;
    }

    /// Returns the summed velocity change for a particle, `Vec2::ZERO`
    /// if nothing was added.
    #[inline]
    pub fn total(&self, id: ParticleId) -> Vec2 {
        self.force[id]
    }
}
