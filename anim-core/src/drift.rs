use crate::{
    config::DriftConfig,
    scheduler::{JitteredInterval, centered, sample},
    types::Rgba,
};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Box,
    Torus,
    Sphere,
    Icosahedron,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Box, Shape::Torus, Shape::Sphere, Shape::Icosahedron];
}

/// Destination a floating object eases toward. Replaced wholesale on
/// retarget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftTarget {
    pub pos: Vec3,
}

#[derive(Clone, Debug)]
pub struct FloatingObject {
    pub id: usize,
    pub shape: Shape,
    pub color: Rgba,
    /// Spawn position; targets stay within `max_wander` of it.
    pub anchor: Vec3,
    pub pos: Vec3,
    pub target: DriftTarget,
    /// Euler angles in radians, monotonically increasing.
    pub rotation: Vec3,
    pub scale: f32,
    pub target_scale: f32,
    pub speed: f32,
    pub rotation_speed: f32,
    pub wobble: f32,
    /// Phase offset of the idle bob, seconds.
    pub time_offset: f32,
    pub retarget: JitteredInterval,
}

impl FloatingObject {
    /// Picks the next drift target: a uniform offset of
    /// `±retarget_offset / 2` per axis from the current target, clamped to
    /// the anchor's wander box.
    pub fn choose_target(&self, cfg: &DriftConfig, rng: &mut impl Rng) -> DriftTarget {
        let offset = Vec3::new(
            centered(rng, cfg.retarget_offset),
            centered(rng, cfg.retarget_offset),
            centered(rng, cfg.retarget_offset),
        );
        let wander = Vec3::splat(cfg.max_wander);
        DriftTarget {
            pos: (self.target.pos + offset).clamp(self.anchor - wander, self.anchor + wander),
        }
    }
}

/// Spawns `cfg.object_count` objects at random positions with random
/// shape, palette color and motion parameters.
///
/// Objects start at scale 0 and grow to their target scale.
pub fn spawn_objects(
    cfg: &DriftConfig,
    palette: &[Rgba],
    now: f64,
    rng: &mut impl Rng,
) -> Vec<FloatingObject> {
    (0..cfg.object_count)
        .map(|id| {
            let anchor = Vec3::new(
                centered(rng, cfg.spawn_extent.x),
                centered(rng, cfg.spawn_extent.y),
                centered(rng, cfg.spawn_extent.z),
            );
            let shape = Shape::ALL[rng.random_range(0..Shape::ALL.len())];
            let color = palette[rng.random_range(0..palette.len())];
            FloatingObject {
                id,
                shape,
                color,
                anchor,
                pos: anchor,
                target: DriftTarget { pos: anchor },
                rotation: Vec3::ZERO,
                scale: 0.0,
                target_scale: sample(rng, cfg.scale_range),
                speed: sample(rng, cfg.speed_range),
                rotation_speed: sample(rng, cfg.rotation_speed_range),
                wobble: sample(rng, cfg.wobble_range),
                time_offset: rng.random::<f32>() * 100.0,
                retarget: JitteredInterval::start(
                    cfg.retarget_interval,
                    cfg.retarget_jitter,
                    now,
                    rng,
                ),
            }
        })
        .collect()
}
