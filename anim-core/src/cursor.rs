use glam::Vec2;

use crate::integrator::ease;

/// The point cursor particles are attracted to.
///
/// `raw` is the latest accepted pointer sample. `eased` trails it and is
/// what forces and links are computed against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorTarget {
    pub raw: Vec2,
    pub eased: Vec2,
}

impl CursorTarget {
    pub fn at(pos: Vec2) -> Self {
        Self {
            raw: pos,
            eased: pos,
        }
    }

    pub fn set_raw(&mut self, pos: Vec2) {
        self.raw = pos;
    }

    /// Moves `eased` a `factor` fraction of the way toward `raw`.
    pub fn follow(&mut self, factor: f32) {
        self.eased = ease(self.eased, self.raw, factor);
    }
}

impl Default for CursorTarget {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}
