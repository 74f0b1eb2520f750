use crate::{
    config::CursorConfig,
    scheduler::{centered, sample},
    types::{ParticleId, Rgba, Viewport},
};
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub points: Vec<Particle>,
}

impl ParticleSet {
    pub fn from_positions(positions: Vec<Vec2>, radius: f32, color: Rgba) -> Self {
        let points = positions
            .into_iter()
            .enumerate()
            .map(|(id, pos)| Particle {
                id,
                pos,
                vel: Vec2::ZERO,
                radius,
                color,
            })
            .collect();

        Self { points }
    }

    /// Scatters `cfg.particle_count` particles uniformly over the viewport
    /// with small random velocities and blue-violet colors.
    pub fn random_in_viewport(cfg: &CursorConfig, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let points = (0..cfg.particle_count)
            .map(|id| Particle {
                id,
                pos: Vec2::new(
                    rng.random::<f32>() * viewport.width,
                    rng.random::<f32>() * viewport.height,
                ),
                vel: Vec2::new(
                    centered(rng, cfg.initial_speed),
                    centered(rng, cfg.initial_speed),
                ),
                radius: sample(rng, cfg.radius_range),
                color: Rgba::new(
                    rng.random_range(50..=150),
                    rng.random_range(50..=150),
                    rng.random(),
                    rng.random_range(0.5..=1.0),
                ),
            })
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pulls every particle back inside `viewport`.
    pub fn clamp_into(&mut self, viewport: Viewport) {
        for p in &mut self.points {
            p.pos = clamp_to(p.pos, viewport);
        }
    }

    pub fn mean_position(&self) -> Option<Vec2> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vec2 = self.points.iter().map(|p| p.pos).sum();
        Some(sum / self.points.len() as f32)
    }
}

/// Clamps into `[0, width] x [0, height]` without panicking on a
/// degenerate viewport.
pub fn clamp_to(p: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        p.x.max(0.0).min(viewport.width.max(0.0)),
        p.y.max(0.0).min(viewport.height.max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn random_in_viewport_respects_config() {
        let mut rng = SmallRng::seed_from_u64(11);
        let cfg = CursorConfig::default();
        let vp = Viewport::new(800.0, 600.0);
        let set = ParticleSet::random_in_viewport(&cfg, vp, &mut rng);

        assert_eq!(set.len(), cfg.particle_count);
        for (i, p) in set.points.iter().enumerate() {
            assert_eq!(p.id, i);
            assert!(vp.contains(p.pos));
            assert!(p.vel.x.abs() <= 0.75 && p.vel.y.abs() <= 0.75);
            assert!((2.0..=6.0).contains(&p.radius));
            assert!((0.5..=1.0).contains(&p.color.a));
        }
    }

    #[test]
    fn clamp_into_shrinks_to_new_viewport() {
        let mut set = ParticleSet::from_positions(
            vec![Vec2::new(500.0, 20.0), Vec2::new(-3.0, 900.0)],
            2.0,
            Rgba::opaque(0, 0, 0),
        );
        set.clamp_into(Viewport::new(400.0, 300.0));
        assert_eq!(set.points[0].pos, Vec2::new(400.0, 20.0));
        assert_eq!(set.points[1].pos, Vec2::new(0.0, 300.0));
    }

    #[test]
    fn mean_position_of_empty_set_is_none() {
        assert_eq!(ParticleSet::default().mean_position(), None);

        let set = ParticleSet::from_positions(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)],
            1.0,
            Rgba::opaque(0, 0, 0),
        );
        assert_eq!(set.mean_position(), Some(Vec2::new(5.0, 2.0)));
    }
}
