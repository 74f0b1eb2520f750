//! Distance tests between particles and the cursor.
//!
//! Pair checks are quadratic in the particle count; the count is capped by
//! [`crate::config::MAX_PARTICLES`].

use glam::Vec2;

use crate::{particle::ParticleSet, types::ParticleId};

/// Line between two particles within linking distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleLink {
    pub a: ParticleId,
    pub b: ParticleId,
    pub opacity: f32,
}

/// Line between a particle and the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorLink {
    pub particle: ParticleId,
    pub opacity: f32,
}

/// Linear falloff: 1 at distance 0, 0 at and beyond `threshold`.
#[inline]
pub fn link_opacity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / threshold).clamp(0.0, 1.0)
}

/// Velocity change pulling `pos` toward `cursor`, if within `radius`.
///
/// The pull is the separation vector scaled by
/// `strength / max(min_distance, distance)`, so it never divides by less
/// than `min_distance`.
pub fn attraction(
    pos: Vec2,
    cursor: Vec2,
    radius: f32,
    strength: f32,
    min_distance: f32,
) -> Option<Vec2> {
    let delta = cursor - pos;
    let distance = delta.length();
    if distance >= radius {
        return None;
    }
    Some(delta * (strength / distance.max(min_distance)))
}

/// Every unordered particle pair strictly closer than `threshold`.
pub fn particle_links(particles: &ParticleSet, threshold: f32) -> Vec<ParticleLink> {
    let t2 = threshold * threshold;
    let mut links = Vec::new();
    for (i, a) in particles.points.iter().enumerate() {
        for b in &particles.points[i + 1..] {
            let d2 = a.pos.distance_squared(b.pos);
            if d2 < t2 {
                let opacity = link_opacity(d2.sqrt(), threshold);
                if opacity > 0.0 {
                    links.push(ParticleLink {
                        a: a.id,
                        b: b.id,
                        opacity,
                    });
                }
            }
        }
    }
    links
}

/// Every particle strictly closer than `threshold` to `cursor`.
pub fn cursor_links(particles: &ParticleSet, cursor: Vec2, threshold: f32) -> Vec<CursorLink> {
    particles
        .points
        .iter()
        .filter_map(|p| {
            let opacity = link_opacity(p.pos.distance(cursor), threshold);
            (opacity > 0.0).then_some(CursorLink {
                particle: p.id,
                opacity,
            })
        })
        .collect()
}
