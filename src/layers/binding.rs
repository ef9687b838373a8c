//! Per-layer binding used by forms and pickers.
//!
//! A [`LayerBinding`] is the mount/cleanup pair of one layer in a single
//! value: creating it registers the layer, dropping it unregisters the layer.
//! The owner keeps the binding for as long as it is open, so a form removed
//! by its parent releases its slot the same way as a form closed by the user.

use super::provider::LayerScope;
use super::registry::{LayerId, LayerKind};
use crate::domain::error::Result;

/// How a layer should present itself given its position in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Top layer: fully interactive.
    Active,
    /// Covered by another layer: dimmed and inert, but still mounted.
    Background,
}

/// Registration of one layer, released on drop.
#[derive(Debug)]
pub struct LayerBinding<R = ()> {
    scope: LayerScope<R>,
    id: LayerId,
    kind: LayerKind,
}

impl<R> LayerScope<R> {
    /// Registers `id` and returns the binding that owns the registration.
    ///
    /// Binding an id that is already active keeps the existing entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] when the scope's
    /// provider is not mounted.
    pub fn bind(&self, id: impl Into<LayerId>, kind: LayerKind) -> Result<LayerBinding<R>> {
        let id = id.into();
        self.register(id.clone(), kind)?;
        Ok(LayerBinding {
            scope: self.clone(),
            id,
            kind,
        })
    }
}

impl<R> LayerBinding<R> {
    /// Id this binding registered.
    #[must_use]
    pub const fn id(&self) -> &LayerId {
        &self.id
    }

    /// Kind this binding registered.
    #[must_use]
    pub const fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Scope the binding was created through.
    #[must_use]
    pub const fn scope(&self) -> &LayerScope<R> {
        &self.scope
    }

    /// Whether this layer is the top layer.
    ///
    /// An unmounted provider has an empty stack, so this is `false` then.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.scope.is_top(self.id.as_str()).unwrap_or(false)
    }

    /// Whether another layer sits above this one.
    #[must_use]
    pub fn is_any_above(&self) -> bool {
        self.scope.is_any_above(self.id.as_str()).unwrap_or(false)
    }

    /// Zero-based count of layers below this one, `None` once released.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.scope.depth(self.id.as_str()).ok().flatten()
    }

    /// `base_z + depth`, monotonic with registration order.
    #[must_use]
    pub fn z_index(&self) -> Option<u32> {
        let state = self.scope.state().ok()?;
        let z = state.read().z_index(self.id.as_str());
        z
    }

    /// Active when on top, background otherwise.
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        if self.is_top() {
            RenderMode::Active
        } else {
            RenderMode::Background
        }
    }
}

impl<R> Drop for LayerBinding<R> {
    fn drop(&mut self) {
        if let Ok(state) = self.scope.state() {
            state.release(self.id.clone());
        }
    }
}
