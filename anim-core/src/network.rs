use crate::{
    config::NetworkConfig,
    scheduler::sample,
    types::{NodeId, Viewport},
};
use glam::Vec2;
use rand::{Rng, seq::index};
use std::ops::Range;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub pos: Vec2,
    pub radius: f32,
    pub layer: usize,
}

/// Directed connection from a node to one in the next layer.
///
/// `source` and `target` index into `Network::nodes`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
    pub active: bool,
    /// Signal position along the edge, `[0, 1)` while active.
    pub progress: f32,
}

/// Layered node/edge topology, fixed once built.
#[derive(Clone, Debug)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    layer_starts: Vec<NodeId>,
}

impl Network {
    /// Lays out `cfg.layers` across `viewport` and wires each node to
    /// `min(previous layer size, cfg.max_fan_in)` distinct random nodes of
    /// the previous layer.
    ///
    /// Layers are spaced evenly on the x axis (`width / (layers + 1)`),
    /// nodes evenly on the y axis within their layer.
    pub fn build(cfg: &NetworkConfig, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let total: usize = cfg.layers.iter().sum();

        let mut nodes = Vec::with_capacity(total);
        let mut edges = Vec::new();
        let mut layer_starts = Vec::with_capacity(cfg.layers.len() + 1);

        for (layer, &size) in cfg.layers.iter().enumerate() {
            let start = nodes.len();
            layer_starts.push(start);

            for i in 0..size {
                let id = nodes.len();
                nodes.push(Node {
                    id,
                    pos: slot(viewport, cfg.layers.len(), layer, size, i),
                    radius: sample(rng, cfg.node_radius_range),
                    layer,
                });

                if layer == 0 {
                    continue;
                }
                let prev_start = layer_starts[layer - 1];
                let prev_size = cfg.layers[layer - 1];
                let fan_in = prev_size.min(cfg.max_fan_in);

                for j in index::sample(rng, prev_size, fan_in) {
                    edges.push(Edge {
                        source: prev_start + j,
                        target: id,
                        weight: rng.random(),
                        active: false,
                        progress: 0.0,
                    });
                }
            }
        }
        layer_starts.push(nodes.len());

        debug!(
            layers = cfg.layers.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "built network topology"
        );

        Self {
            nodes,
            edges,
            layer_starts,
        }
    }

    /// Moves every node to its slot for `viewport`; ids, radii and edges
    /// are left as built.
    pub fn relayout(&mut self, viewport: Viewport) {
        let layers = self.layer_count();
        for layer in 0..layers {
            let range = self.layer(layer);
            let size = range.len();
            for (i, node) in self.nodes[range].iter_mut().enumerate() {
                node.pos = slot(viewport, layers, layer, size, i);
            }
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_starts.len().saturating_sub(1)
    }

    /// Node ids of layer `layer`, empty if out of range.
    pub fn layer(&self, layer: usize) -> Range<NodeId> {
        if layer >= self.layer_count() {
            return 0..0;
        }
        self.layer_starts[layer]..self.layer_starts[layer + 1]
    }

    pub fn active_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.active)
    }

    /// Edge count a topology built from `layers` and `max_fan_in` has.
    pub fn expected_edge_count(layers: &[usize], max_fan_in: usize) -> usize {
        layers
            .windows(2)
            .map(|w| w[0].min(max_fan_in) * w[1])
            .sum()
    }
}

/// Position of node `i` of a `size`-node `layer` among `layers` columns.
fn slot(viewport: Viewport, layers: usize, layer: usize, size: usize, i: usize) -> Vec2 {
    let layer_spacing = viewport.width / (layers as f32 + 1.0);
    let vertical_spacing = viewport.height / (size as f32 + 1.0);
    Vec2::new(
        layer_spacing * (layer as f32 + 1.0),
        vertical_spacing * (i as f32 + 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::collections::HashSet;

    fn build(layers: Vec<usize>, seed: u64) -> (Network, NetworkConfig) {
        let cfg = NetworkConfig {
            layers,
            ..NetworkConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        (Network::build(&cfg, Viewport::new(600.0, 400.0), &mut rng), cfg)
    }

    #[test]
    fn node_layout_matches_spacing() {
        let (net, _) = build(vec![1, 3], 1);
        assert_eq!(net.nodes.len(), 4);

        // Two layers over 600px: columns at 200 and 400.
        assert_eq!(net.nodes[0].pos, Vec2::new(200.0, 200.0));
        assert_eq!(net.nodes[1].pos, Vec2::new(400.0, 100.0));
        assert_eq!(net.nodes[3].pos, Vec2::new(400.0, 300.0));

        for n in &net.nodes {
            assert!((4.0..=6.0).contains(&n.radius));
        }
    }

    #[test]
    fn relayout_moves_nodes_and_keeps_topology() {
        let (mut net, _) = build(vec![1, 3], 5);
        let radii: Vec<f32> = net.nodes.iter().map(|n| n.radius).collect();
        let edges = net.edges.clone();

        net.relayout(Viewport::new(300.0, 800.0));
        assert_eq!(net.nodes[0].pos, Vec2::new(100.0, 400.0));
        assert_eq!(net.nodes[1].pos, Vec2::new(200.0, 200.0));
        assert_eq!(net.nodes[3].pos, Vec2::new(200.0, 600.0));
        let after: Vec<f32> = net.nodes.iter().map(|n| n.radius).collect();
        assert_eq!(radii, after);
        assert_eq!(edges, net.edges);
    }

    #[test]
    fn ids_match_indices_and_layers_partition_nodes() {
        let (net, cfg) = build(vec![6, 8, 12, 8, 4], 2);
        for (i, n) in net.nodes.iter().enumerate() {
            assert_eq!(n.id, i);
        }
        assert_eq!(net.layer_count(), cfg.layers.len());
        for (l, &size) in cfg.layers.iter().enumerate() {
            let range = net.layer(l);
            assert_eq!(range.len(), size);
            assert!(range.clone().all(|id| net.nodes[id].layer == l));
        }
        assert!(net.layer(99).is_empty());
    }

    #[test]
    fn edges_join_consecutive_layers_without_duplicates() {
        let (net, cfg) = build(vec![6, 8, 12, 8, 4], 3);
        assert_eq!(
            net.edges.len(),
            Network::expected_edge_count(&cfg.layers, cfg.max_fan_in)
        );
        assert_eq!(net.edges.len(), 160);

        let mut seen = HashSet::new();
        for e in &net.edges {
            assert_eq!(net.nodes[e.target].layer, net.nodes[e.source].layer + 1);
            assert!((0.0..1.0).contains(&e.weight));
            assert!(!e.active);
            assert!(seen.insert((e.source, e.target)), "duplicate edge {e:?}");
        }
    }

    #[test]
    fn fan_in_is_capped_by_small_previous_layer() {
        let (net, _) = build(vec![2, 3], 4);
        // Every node of layer 1 connects to both nodes of layer 0.
        assert_eq!(net.edges.len(), 6);
    }
}
