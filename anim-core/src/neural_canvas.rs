//! Layered network with signals travelling along edges and decaying node
//! activations, drawn on a frame-limited raster canvas.

use rand::rngs::SmallRng;
use tracing::debug;

use crate::{
    activation::ActivationPool,
    config::NetworkConfig,
    integrator::advance_signals,
    network::Network,
    projector::{Backend, DrawList, project_network},
    scheduler::{self, Throttle, delivery, log_eviction, sample},
    types::Viewport,
    widget::{Lifecycle, Widget},
};

pub const SALT: u64 = 3;

pub struct NeuralCanvas {
    cfg: NetworkConfig,
    network: Network,
    pool: ActivationPool,
    frame: Throttle,
    rng: SmallRng,
    life: Lifecycle,
}

impl NeuralCanvas {
    /// Builds the topology for `viewport` and activates the first
    /// `cfg.initial_active` input nodes at full intensity.
    pub fn mount(cfg: NetworkConfig, viewport: Viewport, mut rng: SmallRng) -> Self {
        let network = Network::build(&cfg, viewport, &mut rng);
        let mut pool = ActivationPool::with_capacity(cfg.activation_capacity);
        for node in network.layer(0).take(cfg.initial_active) {
            let decay = sample(&mut rng, cfg.initial_decay);
            log_eviction(pool.push(node, 1.0, decay));
        }
        debug!(
            nodes = network.nodes.len(),
            edges = network.edges.len(),
            active = pool.len(),
            "mounted neural canvas"
        );

        Self {
            frame: Throttle::new(cfg.frame_interval),
            cfg,
            network,
            pool,
            rng,
            life: Lifecycle::mounted(),
        }
    }

    /// One simulation step, ignoring liveness and the frame limiter.
    ///
    /// Edges fire and inputs spawn first. Existing activations then decay,
    /// signals advance, and each delivered signal adds a fresh activation at
    /// its target.
    pub fn step(&mut self) {
        scheduler::fire_edges(&mut self.network, &self.pool, &self.cfg, &mut self.rng);
        scheduler::spawn_input(&self.network, &mut self.pool, &self.cfg, &mut self.rng);

        self.pool.decay_all(self.cfg.activation_floor);
        for (_, target) in advance_signals(&mut self.network.edges, self.cfg.progress_step) {
            let (intensity, decay) = delivery(&mut self.rng, &self.cfg);
            log_eviction(self.pool.push(target, intensity, decay));
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn activations(&self) -> &ActivationPool {
        &self.pool
    }
}

impl Widget for NeuralCanvas {
    fn name(&self) -> &'static str {
        "network"
    }

    /// Steps at most once per `cfg.frame_interval` of host time.
    fn tick(&mut self, now: f64) {
        if self.life.is_live() && self.frame.try_accept(now) {
            self.step();
        }
    }

    fn project(&self) -> DrawList {
        if !self.life.is_live() {
            return DrawList::empty(Backend::Immediate);
        }
        project_network(&self.network, &self.pool)
    }

    fn set_visible(&mut self, visible: bool) {
        self.life.set_visible(visible);
    }

    /// Topology is fixed at mount; nodes are re-spaced for the new surface.
    fn resize(&mut self, viewport: Viewport, _now: f64) {
        if self.life.is_mounted() {
            self.network.relayout(viewport);
            debug!(
                width = viewport.width,
                height = viewport.height,
                "neural canvas resized"
            );
        }
    }

    fn unmount(&mut self) {
        if self.life.unmount() {
            self.frame.cancel();
            debug!("unmounted neural canvas");
        }
    }

    fn is_mounted(&self) -> bool {
        self.life.is_mounted()
    }

    fn is_visible(&self) -> bool {
        self.life.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn canvas(seed: u64) -> NeuralCanvas {
        NeuralCanvas::mount(
            NetworkConfig::default(),
            Viewport::new(800.0, 500.0),
            SmallRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn mount_activates_first_inputs() {
        let c = canvas(61);
        let nodes: Vec<_> = c.activations().iter().map(|a| a.node).collect();
        assert_eq!(nodes.len(), 3);
        for n in 0..3 {
            assert!(nodes.contains(&n));
        }
        assert!(c.activations().iter().all(|a| a.intensity == 1.0));
    }

    #[test]
    fn initial_active_is_capped_by_input_layer() {
        let cfg = NetworkConfig {
            layers: vec![2, 3],
            initial_active: 3,
            ..NetworkConfig::default()
        };
        let c = NeuralCanvas::mount(cfg, Viewport::default(), SmallRng::seed_from_u64(62));
        assert_eq!(c.activations().len(), 2);
    }

    #[test]
    fn resize_lays_nodes_out_inside_new_surface() {
        let mut c = NeuralCanvas::mount(
            NetworkConfig::default(),
            Viewport::default(),
            SmallRng::seed_from_u64(65),
        );
        let topology = |c: &NeuralCanvas| {
            let net = c.network();
            let edges: Vec<_> = net.edges.iter().map(|e| (e.source, e.target)).collect();
            let layers: Vec<_> = net.nodes.iter().map(|n| n.layer).collect();
            (edges, layers)
        };
        let before = topology(&c);

        let small = Viewport::new(400.0, 300.0);
        c.resize(small, 0.0);
        for n in &c.network().nodes {
            assert!(small.contains(n.pos), "node {} at {} outside 400x300", n.id, n.pos);
        }
        assert_eq!(before, topology(&c));
    }

    #[test]
    fn frame_limiter_caps_step_rate() {
        let mut c = canvas(63);
        let mut steps = 0;
        let mut last = c.activations().iter().map(|a| a.intensity).sum::<f32>();
        // 120 Hz host for 1 s.
        for i in 0..120 {
            c.tick(i as f64 / 120.0);
            let total: f32 = c.activations().iter().map(|a| a.intensity).sum();
            if total != last {
                steps += 1;
            }
            last = total;
        }
        // 33 ms interval admits about 30 steps a second, never one per host frame.
        assert!((25..=31).contains(&steps), "steps {steps}");
    }

    #[test]
    fn visible_canvas_projects_clear_first() {
        let mut c = canvas(64);
        assert_eq!(c.project().backend, Backend::Immediate);
        assert!(!c.project().is_empty());

        c.set_visible(false);
        assert!(c.project().is_empty());
        c.unmount();
        c.set_visible(true);
        assert!(c.project().is_empty());
    }
}
