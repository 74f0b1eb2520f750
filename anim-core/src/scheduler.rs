//! Rate limiting and randomized triggers.
//!
//! Everything here works on a host-supplied clock (`now`, seconds) and an
//! injected RNG, so schedules are reproducible under a fixed seed and a
//! fixed timestep.

use rand::Rng;
use tracing::trace;

use crate::{
    activation::{Activation, ActivationPool},
    config::NetworkConfig,
    network::Network,
};

/// Draws uniformly from an inclusive `[min, max]` pair.
///
/// Pairs are validated `min <= max` by [`crate::config`].
pub fn sample(rng: &mut impl Rng, r: [f32; 2]) -> f32 {
    if r[0] >= r[1] {
        r[0]
    } else {
        rng.random_range(r[0]..=r[1])
    }
}

/// Uniform draw from `[-width / 2, width / 2)`.
pub fn centered(rng: &mut impl Rng, width: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * width
}

/// Accepts at most one event per `interval` seconds.
///
/// The first event is always accepted; later events are accepted once
/// `interval` has elapsed since the last accepted one. Rejected events are
/// dropped, not queued.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: f64,
    last: Option<f64>,
    cancelled: bool,
}

impl Throttle {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last: None,
            cancelled: false,
        }
    }

    pub fn try_accept(&mut self, now: f64) -> bool {
        if self.cancelled {
            return false;
        }
        match self.last {
            Some(last) if now - last < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Permanently rejects all further events.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Repeating timer whose period is `base + U[0, jitter)`, re-drawn after
/// every firing.
#[derive(Clone, Debug)]
pub struct JitteredInterval {
    base: f64,
    jitter: f64,
    next_at: Option<f64>,
}

impl JitteredInterval {
    /// Creates a timer whose first deadline is one period after `now`.
    pub fn start(base: f64, jitter: f64, now: f64, rng: &mut impl Rng) -> Self {
        let mut timer = Self {
            base,
            jitter,
            next_at: None,
        };
        timer.next_at = Some(now + timer.period(rng));
        timer
    }

    fn period(&self, rng: &mut impl Rng) -> f64 {
        if self.jitter > 0.0 {
            self.base + rng.random::<f64>() * self.jitter
        } else {
            self.base
        }
    }

    pub fn next_at(&self) -> Option<f64> {
        self.next_at
    }

    /// Returns `true` once per elapsed deadline and schedules the next one
    /// relative to `now`.
    pub fn fire(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        match self.next_at {
            Some(at) if now >= at => {
                self.next_at = Some(now + self.period(rng));
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.next_at = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.next_at.is_none()
    }
}

/// Stochastically switches inactive edges on.
///
/// The whole batch only runs on a `cfg.batch_probability` fraction of
/// calls. Within a batch, each inactive edge whose source node holds an
/// activation fires with probability `cfg.edge_fire_scale * intensity`,
/// using the strongest activation at that node.
///
/// ### Returns
/// The number of edges switched on.
pub fn fire_edges(
    network: &mut Network,
    pool: &ActivationPool,
    cfg: &NetworkConfig,
    rng: &mut impl Rng,
) -> usize {
    if rng.random::<f32>() >= cfg.batch_probability {
        return 0;
    }

    let mut fired = 0;
    for edge in network.edges.iter_mut().filter(|e| !e.active) {
        let Some(intensity) = pool.strongest_at(edge.source) else {
            continue;
        };
        if rng.random::<f32>() < cfg.edge_fire_scale * intensity {
            edge.active = true;
            edge.progress = 0.0;
            fired += 1;
        }
    }
    fired
}

/// Occasionally injects a fresh activation at a random input-layer node.
///
/// Only fires while the pool holds fewer than `cfg.spawn_limit`
/// activations.
///
/// ### Returns
/// The node that received the activation, if any.
pub fn spawn_input(
    network: &Network,
    pool: &mut ActivationPool,
    cfg: &NetworkConfig,
    rng: &mut impl Rng,
) -> Option<usize> {
    if pool.len() >= cfg.spawn_limit || rng.random::<f32>() >= cfg.spawn_probability {
        return None;
    }
    let inputs = network.layer(0);
    if inputs.is_empty() {
        return None;
    }
    let node = rng.random_range(inputs);
    let intensity = sample(rng, cfg.spawn_intensity);
    let decay = sample(rng, cfg.spawn_decay);
    log_eviction(pool.push(node, intensity, decay));
    Some(node)
}

/// Draws a delivered activation's intensity and decay.
pub fn delivery(rng: &mut impl Rng, cfg: &NetworkConfig) -> (f32, f32) {
    (
        sample(rng, cfg.delivery_intensity),
        sample(rng, cfg.delivery_decay),
    )
}

/// Evicted activations are reported for tracing only.
pub(crate) fn log_eviction(evicted: Option<Activation>) {
    if let Some(a) = evicted {
        trace!(node = a.node, intensity = a.intensity, "evicted weakest activation");
    }
}

const BINARY_CHARS: &[u8] = b"01";
const CODE_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+{}:\"<>?|[]\\;',./-=`~";
const GENERAL_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+{}:\"<>?|[]\\;',./-=";

/// Random replacement glyph: binary 40% of the time, code symbols 30%,
/// general printable characters otherwise.
pub fn glitch_char(rng: &mut impl Rng) -> char {
    let roll = rng.random::<f32>();
    let pool = if roll < 0.4 {
        BINARY_CHARS
    } else if roll < 0.7 {
        CODE_CHARS
    } else {
        GENERAL_CHARS
    };
    pool[rng.random_range(0..pool.len())] as char
}

/// Replaces each character of `original` with a glitch glyph with
/// probability `p`. Character count is preserved.
pub fn scramble(original: &[char], p: f32, rng: &mut impl Rng) -> String {
    original
        .iter()
        .map(|&c| {
            if rng.random::<f32>() < p {
                glitch_char(rng)
            } else {
                c
            }
        })
        .collect()
}
