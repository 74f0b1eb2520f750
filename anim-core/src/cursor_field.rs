//! Particles drifting around an eased cursor, linked by proximity lines.

use glam::Vec2;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::{
    config::CursorConfig,
    cursor::CursorTarget,
    force_buffer::ForceBuffer,
    integrator::{attraction_phase, integrate_particles, jitter_phase},
    interaction::{CursorLink, ParticleLink, cursor_links, particle_links},
    particle::ParticleSet,
    projector::{Backend, DrawList, project_particles},
    scheduler::Throttle,
    types::Viewport,
    widget::{Lifecycle, Widget},
};

/// RNG salt for [`crate::config::Config::rng_for`].
pub const SALT: u64 = 1;

pub struct CursorField {
    cfg: CursorConfig,
    viewport: Viewport,
    particles: ParticleSet,
    cursor: CursorTarget,
    forces: ForceBuffer,
    links: Vec<ParticleLink>,
    cursor_links: Vec<CursorLink>,
    pointer: Throttle,
    resize: Throttle,
    rng: SmallRng,
    life: Lifecycle,
}

impl CursorField {
    /// Scatters `cfg.particle_count` particles over `viewport`.
    ///
    /// The cursor starts at the origin until the first pointer sample.
    pub fn mount(cfg: CursorConfig, viewport: Viewport, mut rng: SmallRng) -> Self {
        let particles = ParticleSet::random_in_viewport(&cfg, viewport, &mut rng);
        let cursor = CursorTarget::default();
        let links = particle_links(&particles, cfg.particle_link_distance);
        let clinks = cursor_links(&particles, cursor.eased, cfg.cursor_link_distance);
        debug!(
            particles = particles.len(),
            width = viewport.width,
            height = viewport.height,
            "mounted cursor field"
        );

        Self {
            forces: ForceBuffer::with_len(particles.len()),
            pointer: Throttle::new(cfg.pointer_interval),
            resize: Throttle::new(cfg.resize_interval),
            cfg,
            viewport,
            particles,
            cursor,
            links,
            cursor_links: clinks,
            rng,
            life: Lifecycle::mounted(),
        }
    }

    /// One simulation step, ignoring liveness.
    ///
    /// Order: cursor easing, attraction and jitter into the force buffer,
    /// integration, then link evaluation.
    pub fn step(&mut self) {
        self.cursor.follow(self.cfg.cursor_easing);

        attraction_phase(&self.particles, self.cursor.eased, &self.cfg, &mut self.forces);
        jitter_phase(&self.particles, &self.cfg, &mut self.forces, &mut self.rng);
        integrate_particles(&mut self.particles, &self.forces, &self.cfg, self.viewport);

        self.links = particle_links(&self.particles, self.cfg.particle_link_distance);
        self.cursor_links = cursor_links(
            &self.particles,
            self.cursor.eased,
            self.cfg.cursor_link_distance,
        );
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn cursor(&self) -> &CursorTarget {
        &self.cursor
    }

    pub fn links(&self) -> &[ParticleLink] {
        &self.links
    }

    pub fn cursor_links(&self) -> &[CursorLink] {
        &self.cursor_links
    }
}

impl Widget for CursorField {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn tick(&mut self, _now: f64) {
        if self.life.is_live() {
            self.step();
        }
    }

    fn project(&self) -> DrawList {
        if !self.life.is_live() {
            return DrawList::empty(Backend::Retained);
        }
        project_particles(
            &self.particles,
            &self.cursor,
            &self.links,
            &self.cursor_links,
        )
    }

    fn set_visible(&mut self, visible: bool) {
        self.life.set_visible(visible);
    }

    /// Bounds take effect immediately; the throttled handler pulls
    /// particles inside.
    fn resize(&mut self, viewport: Viewport, now: f64) {
        if !self.life.is_mounted() {
            return;
        }
        self.viewport = viewport;
        if self.resize.try_accept(now) {
            self.particles.clamp_into(viewport);
            debug!(
                width = viewport.width,
                height = viewport.height,
                "cursor field resized"
            );
        }
    }

    fn pointer_moved(&mut self, pos: Vec2, now: f64) {
        if self.life.is_mounted() && self.pointer.try_accept(now) {
            self.cursor.set_raw(pos);
        }
    }

    fn unmount(&mut self) {
        if self.life.unmount() {
            self.pointer.cancel();
            self.resize.cancel();
            debug!("unmounted cursor field");
        }
    }

    fn is_mounted(&self) -> bool {
        self.life.is_mounted()
    }

    fn is_visible(&self) -> bool {
        self.life.is_visible()
    }
}
