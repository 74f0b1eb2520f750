//! Slowly drifting 3D shapes, perspective-projected onto the viewport.

use rand::{Rng, rngs::SmallRng};
use tracing::{debug, trace};

use crate::{
    config::{ConfigError, DriftConfig},
    drift::{FloatingObject, spawn_objects},
    integrator::{integrate_drift, integrate_scale},
    projector::{Backend, DrawList, project_objects},
    types::Viewport,
    widget::{Lifecycle, Widget},
};

pub const SALT: u64 = 2;

pub struct FloatingField {
    cfg: DriftConfig,
    viewport: Viewport,
    objects: Vec<FloatingObject>,
    mounted_at: f64,
    rng: SmallRng,
    life: Lifecycle,
}

impl FloatingField {
    /// Spawns `cfg.object_count` objects and starts their retarget timers
    /// relative to `now`.
    ///
    /// ### Errors
    /// [`ConfigError::InvalidColor`] or [`ConfigError::EmptyPalette`] when
    /// the palette does not parse.
    pub fn mount(
        cfg: DriftConfig,
        viewport: Viewport,
        now: f64,
        mut rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        let palette = cfg.parsed_palette()?;
        let objects = spawn_objects(&cfg, &palette, now, &mut rng);
        debug!(objects = objects.len(), "mounted floating field");

        Ok(Self {
            cfg,
            viewport,
            objects,
            mounted_at: now,
            rng,
            life: Lifecycle::mounted(),
        })
    }

    /// One step at host time `now`, ignoring liveness.
    ///
    /// Due retarget timers fire first. Each object then skips its drift
    /// update with probability `skip_probability`; the scale intro runs
    /// every step.
    pub fn step(&mut self, now: f64) {
        let t = (now - self.mounted_at) as f32;
        for obj in &mut self.objects {
            if obj.retarget.fire(now, &mut self.rng) {
                obj.target = obj.choose_target(&self.cfg, &mut self.rng);
                trace!(object = obj.id, pos = ?obj.target.pos, "retargeted");
            }
            if self.rng.random::<f32>() >= self.cfg.skip_probability {
                integrate_drift(obj, t, &self.cfg);
            }
            integrate_scale(obj, &self.cfg);
        }
    }

    pub fn objects(&self) -> &[FloatingObject] {
        &self.objects
    }
}

impl Widget for FloatingField {
    fn name(&self) -> &'static str {
        "floating"
    }

    fn tick(&mut self, now: f64) {
        if self.life.is_live() {
            self.step(now);
        }
    }

    fn project(&self) -> DrawList {
        if !self.life.is_live() {
            return DrawList::empty(Backend::Retained);
        }
        project_objects(&self.objects, self.viewport, &self.cfg)
    }

    fn set_visible(&mut self, visible: bool) {
        self.life.set_visible(visible);
    }

    fn resize(&mut self, viewport: Viewport, _now: f64) {
        if self.life.is_mounted() {
            self.viewport = viewport;
            debug!(
                width = viewport.width,
                height = viewport.height,
                "floating field resized"
            );
        }
    }

    fn unmount(&mut self) {
        if self.life.unmount() {
            for obj in &mut self.objects {
                obj.retarget.cancel();
            }
            debug!("unmounted floating field");
        }
    }

    fn is_mounted(&self) -> bool {
        self.life.is_mounted()
    }

    fn is_visible(&self) -> bool {
        self.life.is_visible()
    }
}
