//! Typed-out headline that occasionally scrambles and glitches.
//!
//! Phases cycle `Typing → Idle → (Scramble → (Glitch)?)? → Idle → ...`.
//! Every transition is driven by host time, so a fixed clock and seed
//! replay the same sequence.

use glam::Vec2;
use rand::{Rng, rngs::SmallRng};
use tracing::{debug, trace};

use crate::{
    config::MorphTextConfig,
    projector::{Backend, DrawList, project_text},
    scheduler::{centered, sample, scramble},
    types::Viewport,
    widget::{Lifecycle, Widget},
};

pub const SALT: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Typing { revealed: usize, next_at: f64 },
    Idle { until: f64 },
    Scramble { frame: usize, next_at: f64, ends_at: f64 },
    Glitch { until: f64, shake: Vec2 },
}

pub struct MorphingText {
    cfg: MorphTextConfig,
    chars: Vec<char>,
    viewport: Viewport,
    phase: Phase,
    display: String,
    rng: SmallRng,
    life: Lifecycle,
}

impl MorphingText {
    pub fn mount(cfg: MorphTextConfig, viewport: Viewport, now: f64, rng: SmallRng) -> Self {
        let chars: Vec<char> = cfg.text.chars().collect();
        debug!(len = chars.len(), "mounted morphing text");
        Self {
            phase: Phase::Typing {
                revealed: 0,
                next_at: now,
            },
            chars,
            cfg,
            viewport,
            display: String::new(),
            rng,
            life: Lifecycle::mounted(),
        }
    }

    fn idle(&mut self, now: f64) -> Phase {
        Phase::Idle {
            until: now + sample(&mut self.rng, self.cfg.idle_delay) as f64,
        }
    }

    fn settle(&mut self) {
        self.display = self.chars.iter().collect();
    }

    /// Advances the phase machine to host time `now`, ignoring liveness.
    pub fn step(&mut self, now: f64) {
        let phase = self.phase;
        self.phase = match phase {
            Phase::Typing {
                mut revealed,
                mut next_at,
            } => {
                while now >= next_at && revealed < self.chars.len() {
                    revealed += 1;
                    next_at += self.cfg.char_interval;
                }
                self.display = self.chars[..revealed].iter().collect();
                if revealed == self.chars.len() && now >= next_at {
                    self.idle(now)
                } else {
                    Phase::Typing { revealed, next_at }
                }
            }
            Phase::Idle { until } if now >= until => {
                if self.rng.random::<f32>() < self.cfg.glitch_intensity {
                    trace!("scramble burst");
                    Phase::Scramble {
                        frame: 0,
                        next_at: now,
                        ends_at: now + sample(&mut self.rng, self.cfg.burst_duration) as f64,
                    }
                } else {
                    self.idle(now)
                }
            }
            Phase::Scramble { ends_at, .. } if now >= ends_at => {
                self.settle();
                if self.rng.random::<f32>() < self.cfg.glitch_intensity {
                    let shake = Vec2::new(
                        centered(&mut self.rng, 6.0),
                        centered(&mut self.rng, 4.0),
                    );
                    Phase::Glitch {
                        until: now + self.cfg.glitch_duration,
                        shake,
                    }
                } else {
                    self.idle(now)
                }
            }
            Phase::Scramble {
                frame,
                next_at,
                ends_at,
            } if now >= next_at => {
                if frame > self.cfg.scramble_frames {
                    self.settle();
                } else {
                    self.display =
                        scramble(&self.chars, self.cfg.scramble_char_probability, &mut self.rng);
                }
                Phase::Scramble {
                    frame: frame + 1,
                    next_at: now + self.cfg.scramble_interval,
                    ends_at,
                }
            }
            Phase::Glitch { until, .. } if now >= until => self.idle(now),
            unchanged => unchanged,
        };
    }

    /// Current text; the first character while nothing is revealed yet.
    pub fn text(&self) -> String {
        if self.display.is_empty() {
            return self.chars.first().map(|c| c.to_string()).unwrap_or_default();
        }
        self.display.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_glitching(&self) -> bool {
        matches!(self.phase, Phase::Glitch { .. })
    }
}

impl Widget for MorphingText {
    fn name(&self) -> &'static str {
        "text"
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
        let shake = match self.phase {
            Phase::Glitch { shake, .. } => shake,
            _ => Vec2::ZERO,
        };
        project_text(
            self.viewport.center() + shake,
            &self.text(),
            self.cfg.font_size,
            self.is_glitching(),
        )
    }

    fn set_visible(&mut self, visible: bool) {
        self.life.set_visible(visible);
    }

    fn resize(&mut self, viewport: Viewport, _now: f64) {
        if self.life.is_mounted() {
            self.viewport = viewport;
        }
    }

    fn unmount(&mut self) {
        if self.life.unmount() {
            debug!("unmounted morphing text");
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

    fn text(cfg: MorphTextConfig) -> MorphingText {
        MorphingText::mount(cfg, Viewport::default(), 0.0, SmallRng::seed_from_u64(71))
    }

    fn always_glitch() -> MorphTextConfig {
        MorphTextConfig {
            text: "hello".to_owned(),
            glitch_intensity: 1.0,
            scramble_char_probability: 1.0,
            ..MorphTextConfig::default()
        }
    }

    #[test]
    fn typing_reveals_one_char_per_interval() {
        let mut t = text(MorphTextConfig {
            text: "abc".to_owned(),
            ..MorphTextConfig::default()
        });
        assert_eq!(t.text(), "a");

        t.step(0.0);
        assert_eq!(t.text(), "a");
        t.step(0.045);
        assert_eq!(t.text(), "ab");
        t.step(0.2);
        assert_eq!(t.text(), "abc");
        assert!(matches!(t.phase(), Phase::Idle { .. }));
    }

    #[test]
    fn full_cycle_scrambles_glitches_and_returns_to_idle() {
        let mut t = text(always_glitch());
        let mut saw_scrambled = false;
        let mut saw_glitch = false;
        let mut back_to_idle = false;

        // 60 Hz for 15 s: typing, idle of at most 8 s, burst of at most 2 s.
        for i in 0..900 {
            t.step(i as f64 / 60.0);
            match t.phase() {
                Phase::Scramble { .. } if t.text() != "hello" => saw_scrambled = true,
                Phase::Glitch { .. } => saw_glitch = true,
                Phase::Idle { .. } if saw_glitch => back_to_idle = true,
                _ => {}
            }
        }

        assert!(saw_scrambled && saw_glitch && back_to_idle);
        assert_eq!(t.text().chars().count(), 5);
    }

    #[test]
    fn burst_settles_to_original_text() {
        let mut t = text(always_glitch());
        for i in 0..900 {
            t.step(i as f64 / 60.0);
            if let Phase::Glitch { .. } = t.phase() {
                assert_eq!(t.text(), "hello");
                return;
            }
        }
        panic!("never glitched");
    }

    #[test]
    fn zero_intensity_never_scrambles() {
        let mut t = text(MorphTextConfig {
            glitch_intensity: 0.0,
            ..MorphTextConfig::default()
        });
        for i in 0..1200 {
            t.step(i as f64 / 30.0);
            assert!(!matches!(t.phase(), Phase::Scramble { .. } | Phase::Glitch { .. }));
        }
        assert_eq!(t.text(), MorphTextConfig::default().text);
    }

    #[test]
    fn glitch_projects_in_a_different_color() {
        let mut t = text(always_glitch());
        let calm = t.project();
        for i in 0..900 {
            t.tick(i as f64 / 60.0);
            if t.is_glitching() {
                assert_ne!(t.project(), calm);
                return;
            }
        }
        panic!("never glitched");
    }
}
