//! Per-widget configuration.
//!
//! Each widget reads its section once at mount. Defaults reproduce the
//! tuning of the portfolio widgets; every section accepts partial JSON
//! through `#[serde(default)]`.

use glam::Vec3;
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Rgba;

/// Hard cap on cursor particles; pair checks are quadratic.
pub const MAX_PARTICLES: usize = 64;
/// Hard cap on floating objects.
pub const MAX_OBJECTS: usize = 32;
/// Hard cap on nodes in a single network layer.
pub const MAX_LAYER_SIZE: usize = 64;
/// Hard cap on live activations in the network pool.
pub const MAX_ACTIVATIONS: usize = 512;

/// Errors raised when validating a [`Config`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid color token {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("{field} = {value} is outside {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("{field} has min {min} greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} = {count} exceeds the cap of {max}")]
    TooMany {
        field: &'static str,
        count: usize,
        max: usize,
    },
    #[error("network needs at least one layer")]
    EmptyLayers,
    #[error("network layer {index} has no nodes")]
    ZeroSizedLayer { index: usize },
    #[error("drift palette is empty")]
    EmptyPalette,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "(0, inf)",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "[0, inf)",
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "[0, 1]",
        })
    }
}

/// Multipliers that must shrink their input every tick.
fn damping(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "(0, 1)",
        })
    }
}

fn range(field: &'static str, r: [f32; 2]) -> Result<(), ConfigError> {
    non_negative(field, r[0])?;
    non_negative(field, r[1])?;
    if r[0] > r[1] {
        return Err(ConfigError::InvertedRange {
            field,
            min: r[0],
            max: r[1],
        });
    }
    Ok(())
}

fn count(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::OutOfRange {
            field,
            value: 0.0,
            expected: "[1, cap]",
        });
    }
    if value > max {
        return Err(ConfigError::TooMany {
            field,
            count: value,
            max,
        });
    }
    Ok(())
}

/// Cursor-attraction particle overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub particle_count: usize,
    pub radius_range: [f32; 2],
    /// Initial velocity components are drawn from `±initial_speed / 2`.
    pub initial_speed: f32,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    /// Floor on the distance used in the force denominator.
    pub min_distance: f32,
    /// Width of the uniform jitter added to each velocity component.
    pub jitter: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub particle_link_distance: f32,
    pub cursor_link_distance: f32,
    /// Fraction of the remaining gap the eased cursor closes per tick.
    pub cursor_easing: f32,
    /// Seconds between accepted pointer samples.
    pub pointer_interval: f64,
    /// Seconds between accepted resize events.
    pub resize_interval: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            particle_count: 8,
            radius_range: [2.0, 6.0],
            initial_speed: 1.5,
            attraction_radius: 180.0,
            attraction_strength: 0.6,
            min_distance: 50.0,
            jitter: 0.2,
            friction: 0.95,
            max_speed: 6.0,
            particle_link_distance: 80.0,
            cursor_link_distance: 120.0,
            cursor_easing: 0.15,
            pointer_interval: 0.016,
            resize_interval: 0.1,
        }
    }
}

impl CursorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        count("cursor.particle_count", self.particle_count, MAX_PARTICLES)?;
        range("cursor.radius_range", self.radius_range)?;
        non_negative("cursor.initial_speed", self.initial_speed)?;
        positive("cursor.attraction_radius", self.attraction_radius)?;
        non_negative("cursor.attraction_strength", self.attraction_strength)?;
        positive("cursor.min_distance", self.min_distance)?;
        non_negative("cursor.jitter", self.jitter)?;
        damping("cursor.friction", self.friction)?;
        positive("cursor.max_speed", self.max_speed)?;
        positive("cursor.particle_link_distance", self.particle_link_distance)?;
        positive("cursor.cursor_link_distance", self.cursor_link_distance)?;
        probability("cursor.cursor_easing", self.cursor_easing)?;
        non_negative("cursor.pointer_interval", self.pointer_interval as f32)?;
        non_negative("cursor.resize_interval", self.resize_interval as f32)?;
        Ok(())
    }
}

/// Floating 3-D shapes drifting behind the hero section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub object_count: usize,
    /// `#rrggbb` tokens objects pick their color from.
    pub palette: Vec<String>,
    /// Full extent of the box objects spawn in, centered on the origin.
    pub spawn_extent: Vec3,
    pub speed_range: [f32; 2],
    pub rotation_speed_range: [f32; 2],
    pub wobble_range: [f32; 2],
    pub scale_range: [f32; 2],
    pub smoothing: f32,
    pub scale_smoothing: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    /// Per-tick orientation increment before rotation-speed scaling.
    pub rotation_step: Vec3,
    /// Full width of the uniform offset applied to the previous target.
    pub retarget_offset: f32,
    /// Targets never leave `anchor ± max_wander` on any axis.
    pub max_wander: f32,
    pub retarget_interval: f64,
    pub retarget_jitter: f64,
    pub skip_probability: f32,
    pub camera_distance: f32,
    pub fov_degrees: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            object_count: 3,
            palette: [
                "#5eead4", "#0ea5e9", "#8b5cf6", "#c084fc", "#f472b6", "#cbd5e1", "#60a5fa",
                "#34d399",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            spawn_extent: Vec3::new(10.0, 10.0, 6.0),
            speed_range: [0.5, 1.3],
            rotation_speed_range: [0.5, 1.5],
            wobble_range: [0.2, 0.5],
            scale_range: [0.4, 0.7],
            smoothing: 0.005,
            scale_smoothing: 0.05,
            bob_frequency: 0.3,
            bob_amplitude: 0.005,
            rotation_step: Vec3::new(0.001, 0.002, 0.0005),
            retarget_offset: 4.0,
            max_wander: 4.0,
            retarget_interval: 5.0,
            retarget_jitter: 2.0,
            skip_probability: 0.3,
            camera_distance: 15.0,
            fov_degrees: 60.0,
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        count("drift.object_count", self.object_count, MAX_OBJECTS)?;
        self.parsed_palette()?;
        for (field, v) in [
            ("drift.spawn_extent.x", self.spawn_extent.x),
            ("drift.spawn_extent.y", self.spawn_extent.y),
            ("drift.spawn_extent.z", self.spawn_extent.z),
        ] {
            non_negative(field, v)?;
        }
        range("drift.speed_range", self.speed_range)?;
        range("drift.rotation_speed_range", self.rotation_speed_range)?;
        range("drift.wobble_range", self.wobble_range)?;
        range("drift.scale_range", self.scale_range)?;
        probability("drift.smoothing", self.smoothing)?;
        probability("drift.scale_smoothing", self.scale_smoothing)?;
        non_negative("drift.bob_frequency", self.bob_frequency)?;
        non_negative("drift.bob_amplitude", self.bob_amplitude)?;
        non_negative("drift.retarget_offset", self.retarget_offset)?;
        non_negative("drift.max_wander", self.max_wander)?;
        positive("drift.retarget_interval", self.retarget_interval as f32)?;
        non_negative("drift.retarget_jitter", self.retarget_jitter as f32)?;
        probability("drift.skip_probability", self.skip_probability)?;
        positive("drift.camera_distance", self.camera_distance)?;
        if !(1.0..179.0).contains(&self.fov_degrees) {
            return Err(ConfigError::OutOfRange {
                field: "drift.fov_degrees",
                value: self.fov_degrees as f64,
                expected: "[1, 179)",
            });
        }
        Ok(())
    }

    pub fn parsed_palette(&self) -> Result<Vec<Rgba>, ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        self.palette.iter().map(|t| Rgba::from_hex(t)).collect()
    }
}

/// Neural-network canvas animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub layers: Vec<usize>,
    /// Upper bound on edges from the previous layer into each node.
    pub max_fan_in: usize,
    pub node_radius_range: [f32; 2],
    pub progress_step: f32,
    pub activation_floor: f32,
    pub activation_capacity: usize,
    /// Fraction of ticks on which inactive edges are considered for firing.
    pub batch_probability: f32,
    /// Edge fires with `edge_fire_scale * source_intensity`.
    pub edge_fire_scale: f32,
    pub spawn_probability: f32,
    /// Input activations are only injected while fewer than this many exist.
    pub spawn_limit: usize,
    pub initial_active: usize,
    pub frame_interval: f64,
    pub initial_decay: [f32; 2],
    pub delivery_intensity: [f32; 2],
    pub delivery_decay: [f32; 2],
    pub spawn_intensity: [f32; 2],
    pub spawn_decay: [f32; 2],
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layers: vec![6, 8, 12, 8, 4],
            max_fan_in: 5,
            node_radius_range: [4.0, 6.0],
            progress_step: 0.05,
            activation_floor: 0.1,
            activation_capacity: 20,
            batch_probability: 0.7,
            edge_fire_scale: 0.02,
            spawn_probability: 0.01,
            spawn_limit: 15,
            initial_active: 3,
            frame_interval: 0.033,
            initial_decay: [0.95, 0.99],
            delivery_intensity: [0.8, 1.0],
            delivery_decay: [0.95, 0.98],
            spawn_intensity: [0.7, 1.0],
            spawn_decay: [0.94, 0.98],
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::EmptyLayers);
        }
        for (index, &size) in self.layers.iter().enumerate() {
            if size == 0 {
                return Err(ConfigError::ZeroSizedLayer { index });
            }
            if size > MAX_LAYER_SIZE {
                return Err(ConfigError::TooMany {
                    field: "network.layers",
                    count: size,
                    max: MAX_LAYER_SIZE,
                });
            }
        }
        count("network.max_fan_in", self.max_fan_in, MAX_LAYER_SIZE)?;
        range("network.node_radius_range", self.node_radius_range)?;
        if !(self.progress_step > 0.0 && self.progress_step <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "network.progress_step",
                value: self.progress_step as f64,
                expected: "(0, 1]",
            });
        }
        damping("network.activation_floor", self.activation_floor)?;
        count("network.activation_capacity", self.activation_capacity, MAX_ACTIVATIONS)?;
        probability("network.batch_probability", self.batch_probability)?;
        non_negative("network.edge_fire_scale", self.edge_fire_scale)?;
        probability("network.spawn_probability", self.spawn_probability)?;
        positive("network.frame_interval", self.frame_interval as f32)?;
        for (field, decay) in [
            ("network.initial_decay", self.initial_decay),
            ("network.delivery_decay", self.delivery_decay),
            ("network.spawn_decay", self.spawn_decay),
        ] {
            range(field, decay)?;
            damping(field, decay[0])?;
            damping(field, decay[1])?;
        }
        for (field, intensity) in [
            ("network.delivery_intensity", self.delivery_intensity),
            ("network.spawn_intensity", self.spawn_intensity),
        ] {
            range(field, intensity)?;
            // Fresh activations must survive at least their first decay.
            let weakest_decay = self.delivery_decay[0].min(self.spawn_decay[0]);
            if intensity[0] * weakest_decay <= self.activation_floor || intensity[1] > 1.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: intensity[0] as f64,
                    expected: "(activation_floor, 1]",
                });
            }
        }
        Ok(())
    }
}

/// Scrambling headline text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphTextConfig {
    pub text: String,
    /// Seconds between revealed characters while typing.
    pub char_interval: f64,
    /// Probability of a scramble burst after each idle delay, and of a
    /// glitch after each burst.
    pub glitch_intensity: f32,
    pub idle_delay: [f32; 2],
    pub scramble_frames: usize,
    pub scramble_interval: f64,
    pub scramble_char_probability: f32,
    pub burst_duration: [f32; 2],
    pub glitch_duration: f64,
    pub font_size: f32,
}

impl Default for MorphTextConfig {
    fn default() -> Self {
        Self {
            text: "Building things that move".to_owned(),
            char_interval: 0.04,
            glitch_intensity: 0.3,
            idle_delay: [3.0, 8.0],
            scramble_frames: 10,
            scramble_interval: 0.1,
            scramble_char_probability: 0.3,
            burst_duration: [0.8, 2.0],
            glitch_duration: 0.15,
            font_size: 28.0,
        }
    }
}

impl MorphTextConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("text.char_interval", self.char_interval as f32)?;
        probability("text.glitch_intensity", self.glitch_intensity)?;
        range("text.idle_delay", self.idle_delay)?;
        positive("text.scramble_interval", self.scramble_interval as f32)?;
        probability(
            "text.scramble_char_probability",
            self.scramble_char_probability,
        )?;
        range("text.burst_duration", self.burst_duration)?;
        non_negative("text.glitch_duration", self.glitch_duration as f32)?;
        positive("text.font_size", self.font_size)?;
        Ok(())
    }
}

/// Configuration for every widget the host can mount.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional RNG seed for reproducible animation.
    pub seed: Option<u64>,
    pub cursor: CursorConfig,
    pub drift: DriftConfig,
    pub network: NetworkConfig,
    pub text: MorphTextConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cursor.validate()?;
        self.drift.validate()?;
        self.network.validate()?;
        self.text.validate()?;
        Ok(())
    }

    /// Returns an RNG for one widget, seeded from `seed` and `salt` when a
    /// seed is configured, from OS entropy otherwise.
    pub fn rng_for(&self, salt: u64) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => SmallRng::from_os_rng(),
        }
    }
}
