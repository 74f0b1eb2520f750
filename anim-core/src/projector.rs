//! Simulation state → draw commands.
//!
//! Every function here only reads state, so projecting the same state
//! twice yields equal [`DrawList`]s. Hosts translate commands into their
//! own painter calls.

use glam::{Vec2, Vec3};

use crate::{
    activation::ActivationPool,
    config::DriftConfig,
    cursor::CursorTarget,
    drift::{FloatingObject, Shape},
    interaction::{CursorLink, ParticleLink},
    network::Network,
    particle::ParticleSet,
    types::{ParticleId, Rgba, Viewport},
};

/// How a host should treat a list between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Vector overlay; the list fully describes the scene.
    Retained,
    /// Raster canvas; the list starts with a [`DrawCommand::Clear`] and
    /// redraws everything.
    Immediate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Rgba,
    },
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Polygon {
        points: Vec<Vec2>,
        fill: Rgba,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Rgba,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    pub backend: Backend,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn empty(backend: Backend) -> Self {
        Self {
            backend,
            commands: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }
}

const PARTICLE_LINK: Rgba = Rgba::opaque(99, 102, 241);
const CURSOR_LINK: Rgba = Rgba::opaque(139, 92, 246);
const CURSOR_RING: Rgba = Rgba::new(59, 130, 246, 0.8);
const CURSOR_DOT: Rgba = Rgba::opaque(99, 102, 241);

/// Cursor overlay: particle links, cursor links, particles, then the eased
/// cursor ring and a dot at the raw pointer.
pub fn project_particles(
    particles: &ParticleSet,
    cursor: &CursorTarget,
    links: &[ParticleLink],
    cursor_links: &[CursorLink],
) -> DrawList {
    let mut list = DrawList::empty(Backend::Retained);
    let pos_of = |id: ParticleId| particles.points.get(id).map(|p| p.pos);

    for l in links {
        if let (Some(a), Some(b)) = (pos_of(l.a), pos_of(l.b)) {
            list.push(DrawCommand::Line {
                from: a,
                to: b,
                width: l.opacity * 0.8,
                color: PARTICLE_LINK.with_alpha(l.opacity * 0.4),
            });
        }
    }

    for l in cursor_links {
        if let Some(p) = pos_of(l.particle) {
            list.push(DrawCommand::Line {
                from: p,
                to: cursor.eased,
                width: l.opacity * 1.5,
                color: CURSOR_LINK.with_alpha(l.opacity * 0.6),
            });
        }
    }

    for p in &particles.points {
        list.push(DrawCommand::Circle {
            center: p.pos,
            radius: p.radius,
            fill: p.color,
        });
    }

    list.push(DrawCommand::Ring {
        center: cursor.eased,
        radius: 12.0,
        width: 2.0,
        color: CURSOR_RING,
    });
    list.push(DrawCommand::Circle {
        center: cursor.raw,
        radius: 4.0,
        fill: CURSOR_DOT,
    });
    list
}

const NETWORK_BACKGROUND: Rgba = Rgba::new(0, 0, 0, 0.0);
const IDLE_EDGE: Rgba = Rgba::new(50, 50, 200, 0.03);
const IDLE_NODE: Rgba = Rgba::new(50, 50, 150, 0.2);

/// Network canvas frame: clear, idle edges, active edges with their signal
/// dots, idle nodes, then active nodes colored by intensity.
pub fn project_network(network: &Network, pool: &ActivationPool) -> DrawList {
    let mut list = DrawList::empty(Backend::Immediate);
    list.push(DrawCommand::Clear {
        color: NETWORK_BACKGROUND,
    });

    for e in network.edges.iter().filter(|e| !e.active) {
        list.push(DrawCommand::Line {
            from: network.nodes[e.source].pos,
            to: network.nodes[e.target].pos,
            width: 0.5,
            color: IDLE_EDGE,
        });
    }

    for e in network.active_edges() {
        let from = network.nodes[e.source].pos;
        let to = network.nodes[e.target].pos;
        list.push(DrawCommand::Line {
            from,
            to,
            width: 0.5 + e.weight,
            color: Rgba::new(100, 100, 255, 0.1 + e.weight * 0.2),
        });
        list.push(DrawCommand::Circle {
            center: from.lerp(to, e.progress),
            radius: 2.0 + e.weight * 2.0,
            fill: Rgba::new(100, 200, 255, 0.7 + e.progress * 0.3),
        });
    }

    let mut active = Vec::new();
    for n in &network.nodes {
        match pool.strongest_at(n.id) {
            Some(intensity) => active.push((n, intensity)),
            None => list.push(DrawCommand::Circle {
                center: n.pos,
                radius: n.radius,
                fill: IDLE_NODE,
            }),
        }
    }

    for (n, intensity) in active {
        if intensity > 0.5 {
            list.push(DrawCommand::Circle {
                center: n.pos,
                radius: n.radius + 8.0 * intensity * 0.5,
                fill: Rgba::new(100, 200, 255, intensity * 0.25),
            });
        }
        list.push(DrawCommand::Circle {
            center: n.pos,
            radius: n.radius,
            fill: Rgba::new(
                100,
                (100.0 + intensity * 155.0) as u8,
                255,
                0.4 + intensity * 0.6,
            ),
        });
    }
    list
}

/// Perspective-projects `p` for a camera on the +z axis looking at the
/// origin.
///
/// ### Returns
/// Screen position and pixels per world unit at that depth, or `None`
/// when the point is at or behind the camera.
pub fn perspective(p: Vec3, viewport: Viewport, cfg: &DriftConfig) -> Option<(Vec2, f32)> {
    let depth = cfg.camera_distance - p.z;
    if depth <= 1e-3 {
        return None;
    }
    let focal = (viewport.height * 0.5) / (cfg.fov_degrees.to_radians() * 0.5).tan();
    let ppu = focal / depth;
    let screen = viewport.center() + Vec2::new(p.x, -p.y) * ppu;
    Some((screen, ppu))
}

fn regular_polygon(center: Vec2, radius: f32, sides: usize, angle: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let t = angle + (i as f32) / (sides as f32) * std::f32::consts::TAU;
            center + Vec2::new(t.cos(), t.sin()) * radius
        })
        .collect()
}

/// Floating objects, farthest first.
pub fn project_objects(
    objects: &[FloatingObject],
    viewport: Viewport,
    cfg: &DriftConfig,
) -> DrawList {
    let mut list = DrawList::empty(Backend::Retained);

    let mut order: Vec<&FloatingObject> = objects.iter().collect();
    order.sort_by(|a, b| a.pos.z.total_cmp(&b.pos.z));

    for obj in order {
        let Some((center, ppu)) = perspective(obj.pos, viewport, cfg) else {
            continue;
        };
        let wobble = 1.0 + (obj.rotation.y * 10.0).sin() * obj.wobble * 0.05;
        let unit = obj.scale * ppu * wobble;
        if unit <= 0.0 {
            continue;
        }

        match obj.shape {
            Shape::Sphere => list.push(DrawCommand::Circle {
                center,
                radius: 0.5 * unit,
                fill: obj.color,
            }),
            Shape::Torus => list.push(DrawCommand::Ring {
                center,
                radius: 0.5 * unit,
                width: 0.4 * unit,
                color: obj.color,
            }),
            Shape::Box => list.push(DrawCommand::Polygon {
                points: regular_polygon(
                    center,
                    0.5 * unit * std::f32::consts::SQRT_2,
                    4,
                    obj.rotation.z + std::f32::consts::FRAC_PI_4,
                ),
                fill: obj.color,
            }),
            Shape::Icosahedron => list.push(DrawCommand::Polygon {
                points: regular_polygon(center, 0.7 * unit, 6, obj.rotation.y),
                fill: obj.color,
            }),
        }
    }
    list
}

pub fn project_text(pos: Vec2, text: &str, size: f32, glitching: bool) -> DrawList {
    let color = if glitching {
        Rgba::opaque(239, 68, 68)
    } else {
        Rgba::opaque(226, 232, 240)
    };
    DrawList {
        backend: Backend::Retained,
        commands: vec![DrawCommand::Text {
            pos,
            text: text.to_owned(),
            size,
            color,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::NetworkConfig,
        interaction::{cursor_links, particle_links},
    };
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn particle_projection_orders_lines_before_shapes() {
        let set = ParticleSet::from_positions(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            3.0,
            Rgba::opaque(1, 2, 3),
        );
        let cursor = CursorTarget::at(Vec2::new(5.0, 5.0));
        let links = particle_links(&set, 80.0);
        let clinks = cursor_links(&set, cursor.eased, 120.0);

        let list = project_particles(&set, &cursor, &links, &clinks);

        assert_eq!(list.backend, Backend::Retained);
        // 1 pair line + 2 cursor lines + 2 particles + ring + dot.
        assert_eq!(list.len(), 7);
        assert!(matches!(list.commands[0], DrawCommand::Line { .. }));
        assert!(matches!(list.commands[3], DrawCommand::Circle { radius, .. } if radius == 3.0));
        assert!(matches!(list.commands[5], DrawCommand::Ring { .. }));
    }

    #[test]
    fn network_projection_starts_with_clear() {
        let mut rng = SmallRng::seed_from_u64(41);
        let cfg = NetworkConfig::default();
        let mut net = Network::build(&cfg, Viewport::new(600.0, 400.0), &mut rng);
        net.edges[0].active = true;
        net.edges[0].progress = 0.5;
        let mut pool = ActivationPool::with_capacity(4);
        pool.push(0, 0.9, 0.95);

        let list = project_network(&net, &pool);

        assert_eq!(list.backend, Backend::Immediate);
        assert!(matches!(list.commands[0], DrawCommand::Clear { .. }));
        // Edges (one of them doubled for its signal) + glow + nodes.
        assert_eq!(list.len(), 1 + net.edges.len() + 1 + 1 + net.nodes.len());

        let e = &net.edges[0];
        let mid = net.nodes[e.source].pos.lerp(net.nodes[e.target].pos, 0.5);
        assert!(list.commands.iter().any(
            |c| matches!(c, DrawCommand::Circle { center, .. } if center.distance(mid) < 1e-4)
        ));
    }

    #[test]
    fn perspective_centers_origin_and_rejects_behind_camera() {
        let cfg = DriftConfig::default();
        let vp = Viewport::new(800.0, 600.0);
        let (c, ppu) = perspective(Vec3::ZERO, vp, &cfg).unwrap();
        assert_eq!(c, vp.center());
        assert!(ppu > 0.0);

        let (up, _) = perspective(Vec3::new(0.0, 1.0, 0.0), vp, &cfg).unwrap();
        assert!(up.y < c.y, "+y in world is up on screen");

        let (_, near_ppu) = perspective(Vec3::new(0.0, 0.0, 5.0), vp, &cfg).unwrap();
        assert!(near_ppu > ppu);

        assert!(perspective(Vec3::new(0.0, 0.0, cfg.camera_distance), vp, &cfg).is_none());
    }

    #[test]
    fn glitching_text_turns_red() {
        let calm = project_text(Vec2::ZERO, "hi", 20.0, false);
        let glitch = project_text(Vec2::ZERO, "hi", 20.0, true);
        assert_ne!(calm, glitch);
    }
}
