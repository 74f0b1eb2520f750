//! Host-facing surface shared by every animated widget.

use glam::Vec2;

use crate::{projector::DrawList, types::Viewport};

/// One mounted widget instance.
///
/// Widgets own all of their state; nothing is shared between instances.
/// After [`Widget::unmount`] every method is a no-op and [`Widget::project`]
/// returns an empty list.
pub trait Widget {
    fn name(&self) -> &'static str;

    /// Advances the widget to host time `now`, in seconds.
    fn tick(&mut self, now: f64);

    /// Draw commands for the current state. Never mutates.
    fn project(&self) -> DrawList;

    fn set_visible(&mut self, visible: bool);

    fn resize(&mut self, viewport: Viewport, now: f64);

    /// Pointer sample in viewport coordinates. Ignored by default.
    fn pointer_moved(&mut self, _pos: Vec2, _now: f64) {}

    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;

    fn is_visible(&self) -> bool;
}

/// Liveness and visibility flags checked at the top of every callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    mounted: bool,
    visible: bool,
}

impl Lifecycle {
    pub fn mounted() -> Self {
        Self {
            mounted: true,
            visible: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mounted and visible: the only state in which ticks advance.
    pub fn is_live(&self) -> bool {
        self.mounted && self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// ### Returns
    /// `true` if this call performed the unmount.
    pub fn unmount(&mut self) -> bool {
        std::mem::replace(&mut self.mounted, false)
    }
}
