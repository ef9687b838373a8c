//! Outside-click dismissal routed to the top layer only.
//!
//! Each layer reports the screen rectangle it painted (its surface) and the
//! handler to fire when the user clicks outside of it. The gate is attached to
//! one layer at a time, the current top, and is re-attached by
//! [`OutsideClickGate::sync`] whenever the top changes. Surfaces of layers that
//! left the stack are dropped during the same sync.
//!
//! A click dismisses the top layer only when it lands outside the top surface
//! *and* outside every other active surface. The second check keeps a form
//! open while the user clicks a picker painted beside it rather than inside
//! it.

use std::collections::HashMap;

use super::provider::StackSnapshot;
use super::registry::LayerId;

/// A cell position in the plugin pane, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Column.
    pub x: usize,
    /// Line.
    pub y: usize,
}

impl Point {
    /// Creates a point from column and line.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pane cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left column.
    pub x: usize,
    /// Top line.
    pub y: usize,
    /// Width in columns.
    pub width: usize,
    /// Height in lines.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First column past the right edge.
    #[must_use]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// First line past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Whether `point` falls inside the rectangle.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Painted area of a layer and what to do when it is dismissed.
#[derive(Debug, Clone)]
pub struct Surface<H> {
    /// Screen area the layer occupies.
    pub rect: Rect,
    /// Handler fired on outside click while the layer is on top.
    pub on_close: H,
}

/// Result of a click that dismisses the top layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dismissal<H> {
    /// Layer being dismissed.
    pub layer: LayerId,
    /// Its registered close handler.
    pub handler: H,
}

/// Routes outside clicks to the current top layer.
#[derive(Debug)]
pub struct OutsideClickGate<H> {
    surfaces: HashMap<LayerId, Surface<H>>,
    attached: Option<LayerId>,
}

impl<H> Default for OutsideClickGate<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> OutsideClickGate<H> {
    /// Creates a gate with no surfaces and no attachment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            attached: None,
        }
    }

    /// Records the surface and close handler of a layer.
    pub fn set_surface(&mut self, id: impl Into<LayerId>, rect: Rect, on_close: H) {
        self.surfaces.insert(id.into(), Surface { rect, on_close });
    }

    /// Forgets a layer's surface.
    pub fn clear_surface(&mut self, id: &str) {
        self.surfaces.remove(id);
        if self.attached.as_ref().is_some_and(|attached| attached.as_str() == id) {
            tracing::debug!(layer_id = %id, "outside-click gate detached");
            self.attached = None;
        }
    }

    /// Surface recorded for `id`.
    #[must_use]
    pub fn surface(&self, id: &str) -> Option<&Surface<H>> {
        self.surfaces.get(id)
    }

    /// Layer the gate currently listens for.
    #[must_use]
    pub const fn attached(&self) -> Option<&LayerId> {
        self.attached.as_ref()
    }

    /// Aligns the gate with the stack.
    ///
    /// Drops surfaces of layers that are no longer active and re-attaches to
    /// the new top layer. Returns `true` when the attachment changed.
    pub fn sync(&mut self, snapshot: &StackSnapshot) -> bool {
        self.surfaces.retain(|id, _| snapshot.contains(id.as_str()));

        let top = snapshot.top().cloned();
        if top == self.attached {
            return false;
        }
        tracing::debug!(
            from = ?self.attached.as_ref().map(LayerId::as_str),
            to = ?top.as_ref().map(LayerId::as_str),
            "outside-click gate re-attached"
        );
        self.attached = top;
        true
    }
}

impl<H: Clone> OutsideClickGate<H> {
    /// Decides whether a pointer-down at `point` dismisses the top layer.
    ///
    /// Returns `None` when the gate is unattached or stale, when the top layer
    /// has no surface yet, or when the point lands on any active surface.
    #[must_use]
    pub fn pointer_down(&self, snapshot: &StackSnapshot, point: Point) -> Option<Dismissal<H>> {
        let top = self.attached.as_ref()?;
        if !snapshot.is_top(top.as_str()) {
            tracing::debug!(layer_id = %top, "gate attached to a layer that is no longer top");
            return None;
        }

        let surface = self.surfaces.get(top)?;
        if surface.rect.contains(point) {
            return None;
        }

        let on_other_layer = snapshot
            .iter()
            .filter(|(id, _)| *id != top)
            .filter_map(|(id, _)| self.surfaces.get(id))
            .any(|other| other.rect.contains(point));
        if on_other_layer {
            tracing::debug!(layer_id = %top, x = point.x, y = point.y, "click landed on another layer");
            return None;
        }

        Some(Dismissal {
            layer: top.clone(),
            handler: surface.on_close.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerKind, LayerProvider};

    #[test]
    fn rect_edges_are_exclusive() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 4)));
        assert!(!rect.contains(Point::new(6, 4)));
        assert!(!rect.contains(Point::new(5, 5)));
    }

    #[test]
    fn sync_drops_surfaces_of_released_layers() {
        let provider: LayerProvider = LayerProvider::new();
        let mut gate = OutsideClickGate::new();
        provider.register("a", LayerKind::Form);
        provider.register("b", LayerKind::Form);
        gate.set_surface("a", Rect::new(0, 0, 10, 10), "close-a");
        gate.set_surface("b", Rect::new(2, 2, 4, 4), "close-b");
        assert!(gate.sync(&provider.snapshot()));
        assert_eq!(gate.attached().map(LayerId::as_str), Some("b"));

        provider.unregister("b");
        assert!(gate.sync(&provider.snapshot()));
        assert!(gate.surface("b").is_none());
        assert_eq!(gate.attached().map(LayerId::as_str), Some("a"));
        assert!(!gate.sync(&provider.snapshot()));
    }

    #[test]
    fn unattached_gate_never_dismisses() {
        let provider: LayerProvider = LayerProvider::new();
        provider.register("a", LayerKind::Form);
        let mut gate = OutsideClickGate::new();
        gate.set_surface("a", Rect::new(0, 0, 1, 1), ());
        assert!(gate.pointer_down(&provider.snapshot(), Point::new(40, 40)).is_none());
    }

    #[test]
    fn handlers_need_not_be_clone_to_track_surfaces() {
        #[derive(Debug, PartialEq)]
        struct CloseOnce(&'static str);

        let provider: LayerProvider = LayerProvider::new();
        provider.register("a", LayerKind::Form);
        let mut gate: OutsideClickGate<CloseOnce> = OutsideClickGate::default();
        gate.set_surface("a", Rect::new(0, 0, 3, 3), CloseOnce("close-a"));
        assert!(gate.sync(&provider.snapshot()));
        assert_eq!(gate.surface("a").map(|surface| &surface.on_close), Some(&CloseOnce("close-a")));

        gate.clear_surface("a");
        assert!(gate.attached().is_none());
    }
}
