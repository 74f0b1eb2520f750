//! Simulation core for a set of decorative animated widgets.
//!
//! Main components:
//! - [`integrator`] — per-tick motion rules for particles, floating objects
//!   and network signals.
//! - [`interaction`] — distance checks producing attraction and link lines.
//! - [`scheduler`] — throttles, jittered timers and stochastic triggers.
//! - [`projector`] — pure state → [`projector::DrawList`] mapping.
//! - [`config`] — per-widget configuration and validation.
//! - [`types`] — shared ids, viewport and color token.
//!
//! State:
//! - [`particle`], [`cursor`], [`force_buffer`] — cursor-field state.
//! - [`drift`] — floating objects and their drift targets.
//! - [`network`], [`activation`] — layered topology and decaying activations.
//!
//! Widgets, each implementing [`widget::Widget`]:
//! - [`cursor_field::CursorField`]
//! - [`floating_field::FloatingField`]
//! - [`neural_canvas::NeuralCanvas`]
//! - [`morph_text::MorphingText`]

pub mod activation;
pub mod config;
pub mod cursor;
pub mod cursor_field;
pub mod drift;
pub mod floating_field;
pub mod force_buffer;
pub mod integrator;
pub mod interaction;
pub mod morph_text;
pub mod network;
pub mod neural_canvas;
pub mod particle;
pub mod projector;
pub mod scheduler;
pub mod types;
pub mod widget;
