//! Per-tick motion rules.
//!
//! The cursor-particle update runs in three steps:
//! 1. [`attraction_phase`] — particles near the cursor accumulate a pull
//!    into a [`ForceBuffer`].
//! 2. [`jitter_phase`] — every particle gets bounded random jitter.
//! 3. [`integrate_particles`] — forces are applied, damped, clamped and
//!    bounced off the viewport edges.
//!
//! Floating objects use [`integrate_drift`]; network signals use
//! [`advance_signals`].

use std::ops::{Add, Mul, Sub};

use glam::Vec2;
use rand::Rng;

use crate::{
    config::{CursorConfig, DriftConfig},
    drift::FloatingObject,
    force_buffer::ForceBuffer,
    interaction,
    network::Edge,
    particle::{ParticleSet, clamp_to},
    scheduler::centered,
    types::{EdgeId, Viewport},
};

/// Exponential smoothing: moves `current` a `factor` fraction of the way
/// to `target`.
#[inline]
pub fn ease<T>(current: T, target: T, factor: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    current + (target - current) * factor
}

/// Accumulates cursor attraction for every particle within
/// `cfg.attraction_radius` of `cursor`.
///
/// The buffer is resized (and cleared) to `particles.len()` first.
pub fn attraction_phase(
    particles: &ParticleSet,
    cursor: Vec2,
    cfg: &CursorConfig,
    forces: &mut ForceBuffer,
) {
    forces.ensure_len(particles.len());

    for (i, p) in particles.points.iter().enumerate() {
        if let Some(pull) = interaction::attraction(
            p.pos,
            cursor,
            cfg.attraction_radius,
            cfg.attraction_strength,
            cfg.min_distance,
        ) {
            forces.add(i, pull);
        }
    }
}

/// Adds uniform jitter in `±cfg.jitter / 2` per axis to every particle.
pub fn jitter_phase(
    particles: &ParticleSet,
    cfg: &CursorConfig,
    forces: &mut ForceBuffer,
    rng: &mut impl Rng,
) {
    if cfg.jitter <= 0.0 {
        return;
    }
    for i in 0..particles.len() {
        forces.add(
            i,
            Vec2::new(centered(rng, cfg.jitter), centered(rng, cfg.jitter)),
        );
    }
}

/// Applies accumulated forces and advances every particle one tick.
///
/// Per particle:
/// 1. `vel += force`, then `vel *= friction`.
/// 2. Speed is clamped to `cfg.max_speed`.
/// 3. `pos += vel`; a component that left the viewport flips its
///    velocity sign and the position is clamped back inside.
///
/// After this call every particle lies within `viewport`.
pub fn integrate_particles(
    particles: &mut ParticleSet,
    forces: &ForceBuffer,
    cfg: &CursorConfig,
    viewport: Viewport,
) {
    for (i, p) in particles.points.iter_mut().enumerate() {
        let force = if i < forces.len() {
            forces.total(i)
        } else {
            Vec2::ZERO
        };

        let mut vel = ((p.vel + force) * cfg.friction).clamp_length_max(cfg.max_speed);
        if !vel.is_finite() {
            vel = Vec2::ZERO;
        }

        let next = p.pos + vel;
        if next.x < 0.0 || next.x > viewport.width {
            vel.x = -vel.x;
        }
        if next.y < 0.0 || next.y > viewport.height {
            vel.y = -vel.y;
        }

        p.vel = vel;
        p.pos = clamp_to(next, viewport);
    }
}

/// Advances one floating object by a tick.
///
/// `t` is the widget clock in seconds; the object's own `time_offset` is
/// added for the idle bob phase.
pub fn integrate_drift(obj: &mut FloatingObject, t: f32, cfg: &DriftConfig) {
    obj.pos = ease(obj.pos, obj.target.pos, cfg.smoothing * obj.speed);
    obj.pos.y += ((t + obj.time_offset) * cfg.bob_frequency).sin() * cfg.bob_amplitude;
    obj.rotation += cfg.rotation_step * obj.rotation_speed;
}

/// Eases `scale` toward `target_scale`, snapping once within `1e-3`.
///
/// Runs on every tick, including ticks whose drift update is skipped.
pub fn integrate_scale(obj: &mut FloatingObject, cfg: &DriftConfig) {
    if (obj.target_scale - obj.scale).abs() <= 1e-3 {
        obj.scale = obj.target_scale;
    } else {
        obj.scale = ease(obj.scale, obj.target_scale, cfg.scale_smoothing);
    }
}

/// Moves every active signal forward by `step`.
///
/// An edge whose progress reaches 1 is switched off with progress reset
/// to 0, and reported as delivered.
///
/// ### Returns
/// `(edge, target node)` for each delivered signal, in edge order.
pub fn advance_signals(edges: &mut [Edge], step: f32) -> Vec<(EdgeId, usize)> {
    let mut delivered = Vec::new();
    for (id, e) in edges.iter_mut().enumerate().filter(|(_, e)| e.active) {
        let progress = e.progress + step;
        if progress >= 1.0 {
            e.active = false;
            e.progress = 0.0;
            delivered.push((id, e.target));
        } else {
            e.progress = progress;
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{drift::spawn_objects, types::Rgba};
    use glam::Vec3;
    use rand::{SeedableRng, rngs::SmallRng};

    fn particles_at(positions: Vec<Vec2>) -> ParticleSet {
        ParticleSet::from_positions(positions, 2.0, Rgba::opaque(255, 255, 255))
    }

    fn calm_cfg() -> CursorConfig {
        CursorConfig {
            jitter: 0.0,
            ..CursorConfig::default()
        }
    }

    #[test]
    fn ease_interpolates_scalars_and_vectors() {
        assert_eq!(ease(0.0_f32, 10.0, 0.1), 1.0);
        assert_eq!(
            ease(Vec3::ZERO, Vec3::new(2.0, 4.0, -6.0), 0.5),
            Vec3::new(1.0, 2.0, -3.0)
        );
    }

    #[test]
    fn attraction_phase_pulls_only_within_radius() {
        let set = particles_at(vec![Vec2::new(100.0, 0.0), Vec2::new(1000.0, 0.0)]);
        let cfg = calm_cfg();
        let mut forces = ForceBuffer::with_len(0);

        attraction_phase(&set, Vec2::ZERO, &cfg, &mut forces);

        assert_eq!(forces.len(), 2);
        // 0.6 / max(50, 100) along (-100, 0).
        let pull = forces.total(0);
        assert!((pull.x + 0.6).abs() < 1e-6 && pull.y == 0.0, "pull {pull}");
        assert_eq!(forces.total(1), Vec2::ZERO);
    }

    #[test]
    fn jitter_phase_is_bounded() {
        let mut rng = SmallRng::seed_from_u64(31);
        let set = particles_at(vec![Vec2::ZERO; 4]);
        let cfg = CursorConfig::default();
        let mut forces = ForceBuffer::with_len(4);

        for _ in 0..50 {
            forces.clear();
            jitter_phase(&set, &cfg, &mut forces, &mut rng);
            for i in 0..4 {
                let j = forces.total(i);
                assert!(j.x.abs() <= cfg.jitter / 2.0 && j.y.abs() <= cfg.jitter / 2.0);
            }
        }
    }

    #[test]
    fn integrate_applies_force_then_friction() {
        let mut set = particles_at(vec![Vec2::new(50.0, 50.0)]);
        let cfg = calm_cfg();
        let mut forces = ForceBuffer::with_len(1);
        forces.add(0, Vec2::new(2.0, 0.0));

        integrate_particles(&mut set, &forces, &cfg, Viewport::new(100.0, 100.0));

        let p = &set.points[0];
        assert!((p.vel.x - 1.9).abs() < 1e-6);
        assert!((p.pos.x - 51.9).abs() < 1e-5);
    }

    #[test]
    fn velocity_is_clamped_to_max_speed() {
        let mut set = particles_at(vec![Vec2::new(500.0, 500.0)]);
        set.points[0].vel = Vec2::new(1e6, -1e6);
        let cfg = calm_cfg();
        let forces = ForceBuffer::with_len(1);

        integrate_particles(&mut set, &forces, &cfg, Viewport::new(1000.0, 1000.0));

        assert!(set.points[0].vel.length() <= cfg.max_speed + 1e-4);
    }

    #[test]
    fn boundary_collision_flips_velocity_and_clamps() {
        let mut set = particles_at(vec![Vec2::new(99.0, 1.0)]);
        set.points[0].vel = Vec2::new(4.0, -4.0);
        let cfg = calm_cfg();
        let forces = ForceBuffer::with_len(1);

        integrate_particles(&mut set, &forces, &cfg, Viewport::new(100.0, 100.0));

        let p = &set.points[0];
        assert_eq!(p.pos, Vec2::new(100.0, 0.0));
        assert!(p.vel.x < 0.0 && p.vel.y > 0.0);
    }

    #[test]
    fn drift_moves_toward_target_and_rotates() {
        let mut rng = SmallRng::seed_from_u64(32);
        let cfg = DriftConfig::default();
        let palette = cfg.parsed_palette().unwrap();
        let mut obj = spawn_objects(&cfg, &palette, 0.0, &mut rng).remove(0);
        obj.target.pos = obj.anchor + Vec3::new(2.0, 0.0, 0.0);

        let before = obj.pos.distance(obj.target.pos);
        let rot_before = obj.rotation;
        integrate_drift(&mut obj, 0.0, &cfg);

        assert!(obj.pos.x > obj.anchor.x);
        assert!(obj.pos.distance(obj.target.pos) < before + cfg.bob_amplitude);
        assert!(obj.rotation.x > rot_before.x);
        assert!(obj.rotation.y > rot_before.y);
        assert!(obj.rotation.z > rot_before.z);
    }

    #[test]
    fn scale_grows_monotonically_and_snaps() {
        let mut rng = SmallRng::seed_from_u64(33);
        let cfg = DriftConfig::default();
        let palette = cfg.parsed_palette().unwrap();
        let mut obj = spawn_objects(&cfg, &palette, 0.0, &mut rng).remove(0);

        let mut last = obj.scale;
        for _ in 0..400 {
            integrate_scale(&mut obj, &cfg);
            assert!(obj.scale >= last);
            last = obj.scale;
        }
        assert_eq!(obj.scale, obj.target_scale);
    }

    #[test]
    fn signals_progress_then_deliver_once() {
        let mut edges = vec![
            Edge {
                source: 0,
                target: 3,
                weight: 0.5,
                active: true,
                progress: 0.0,
            },
            Edge {
                source: 1,
                target: 4,
                weight: 0.5,
                active: false,
                progress: 0.0,
            },
        ];

        let mut ticks = 0;
        let delivered = loop {
            let before = edges[0].progress;
            let d = advance_signals(&mut edges, 0.25);
            ticks += 1;
            if !d.is_empty() {
                break d;
            }
            assert!(edges[0].progress > before);
        };

        assert_eq!(ticks, 4);
        assert_eq!(delivered, vec![(0, 3)]);
        assert!(!edges[0].active);
        assert_eq!(edges[0].progress, 0.0);
        // Inactive edges never move.
        assert_eq!(edges[1].progress, 0.0);
    }
}
