//! Provider owning the layer registry for one UI subtree.
//!
//! The provider is created when the subtree mounts and owns exactly one
//! [`LayerRegistry`]. Descendants never touch the registry directly: they
//! receive a [`LayerScope`] (a weak handle) and go through its operations.
//!
//! # Change Propagation
//!
//! Every effective mutation bumps a revision counter. The plugin runtime polls
//! [`LayerProvider::take_changed`] after handling an event to decide whether to
//! re-render, and each render pass reads one [`StackSnapshot`]. Because every
//! mutation completes inside a single `RefCell` borrow and the snapshot is
//! taken under one borrow, no render pass can observe a half-applied change.
//!
//! # Unmounting
//!
//! Dropping the provider (or calling [`LayerProvider::unmount`]) resets the
//! registry to empty. Scopes handed out earlier then report
//! [`GardeniaError::ProviderUnavailable`], while bindings that outlive the
//! provider drop silently.
//!
//! # Releasing While Busy
//!
//! A binding may be dropped while the stack is borrowed, for example when a
//! component owning a nested form's binding is replaced. Such releases are
//! queued and applied before the next read or write, so a dropped binding
//! always leaves the stack.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::registry::{Layer, LayerId, LayerKind, LayerRegistry};
use crate::domain::error::{GardeniaError, Result};

/// Default z-index of the bottom-most layer.
pub const DEFAULT_BASE_Z: u32 = 1000;

/// Highest accepted base z-index.
///
/// Leaves `u32::MAX / 2` slots above the base, more than any stack can hold.
pub const MAX_BASE_Z: u32 = u32::MAX / 2;

/// Z-index of the layer at `depth`, `None` when it does not fit a `u32`.
pub(crate) fn layer_z(base_z: u32, depth: usize) -> Option<u32> {
    u32::try_from(depth)
        .ok()
        .and_then(|depth| base_z.checked_add(depth))
}

/// Registry and counters, guarded by [`SharedStack`].
#[derive(Debug)]
pub(crate) struct StackState<R> {
    pub(crate) registry: LayerRegistry<R>,
    revision: u64,
    seen_revision: u64,
    pub(crate) base_z: u32,
}

impl<R> StackState<R> {
    const fn new(base_z: u32) -> Self {
        Self {
            registry: LayerRegistry::new(),
            revision: 0,
            seen_revision: 0,
            base_z,
        }
    }

    pub(crate) fn insert(&mut self, layer: Layer<R>) -> bool {
        let id = layer.id.clone();
        let kind = layer.kind;
        let inserted = self.registry.register_with(layer);
        if inserted {
            self.revision += 1;
            tracing::debug!(
                layer_id = %id,
                ?kind,
                depth = self.registry.len() - 1,
                revision = self.revision,
                "layer registered"
            );
        } else {
            tracing::debug!(layer_id = %id, "layer already active, register ignored");
        }
        inserted
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Layer<R>> {
        let removed = self.registry.unregister(id);
        if removed.is_some() {
            self.revision += 1;
            tracing::debug!(
                layer_id = %id,
                remaining = self.registry.len(),
                revision = self.revision,
                "layer unregistered"
            );
        }
        removed
    }

    fn reset(&mut self) {
        if !self.registry.is_empty() {
            self.registry.clear();
            self.revision += 1;
        }
    }

    pub(crate) fn z_index(&self, id: &str) -> Option<u32> {
        self.registry
            .depth(id)
            .and_then(|depth| layer_z(self.base_z, depth))
    }

    fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            revision: self.revision,
            base_z: self.base_z,
            entries: self
                .registry
                .iter()
                .map(|layer| (layer.id.clone(), layer.kind))
                .collect(),
        }
    }
}

/// Stack state plus the bindings released while it was borrowed.
#[derive(Debug)]
pub(crate) struct SharedStack<R> {
    stack: RefCell<StackState<R>>,
    released: RefCell<Vec<LayerId>>,
}

impl<R> SharedStack<R> {
    const fn new(base_z: u32) -> Self {
        Self {
            stack: RefCell::new(StackState::new(base_z)),
            released: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn read(&self) -> Ref<'_, StackState<R>> {
        self.settle();
        self.stack.borrow()
    }

    pub(crate) fn write(&self) -> RefMut<'_, StackState<R>> {
        self.settle();
        self.stack.borrow_mut()
    }

    /// Unregisters `id` now, or as soon as the stack is free.
    pub(crate) fn release(&self, id: LayerId) {
        self.released.borrow_mut().push(id);
        self.settle();
    }

    /// Applies queued releases unless the stack is borrowed.
    ///
    /// Removing a layer may drop a component that owns further bindings;
    /// those land in the queue and are drained by the same loop.
    fn settle(&self) {
        let Ok(mut stack) = self.stack.try_borrow_mut() else {
            let queued = self.released.borrow().len();
            if queued > 0 {
                tracing::debug!(queued, "stack busy, binding release deferred");
            }
            return;
        };
        loop {
            let released = self.released.take();
            if released.is_empty() {
                break;
            }
            for id in released {
                stack.remove(id.as_str());
            }
        }
    }
}

/// Owner of the registry for one subtree.
#[derive(Debug)]
pub struct LayerProvider<R = ()> {
    state: Rc<SharedStack<R>>,
}

impl<R> Default for LayerProvider<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> LayerProvider<R> {
    /// Mounts a provider with the default base z-index.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_z(DEFAULT_BASE_Z)
    }

    /// Mounts a provider whose bottom layer renders at `base_z`.
    ///
    /// Values above [`MAX_BASE_Z`] are clamped to it.
    #[must_use]
    pub fn with_base_z(base_z: u32) -> Self {
        let base_z = if base_z > MAX_BASE_Z {
            tracing::warn!(base_z, max = MAX_BASE_Z, "base z-index too large, clamped");
            MAX_BASE_Z
        } else {
            base_z
        };
        tracing::debug!(base_z, "layer provider mounted");
        Self {
            state: Rc::new(SharedStack::new(base_z)),
        }
    }

    /// Hands out a handle descendants use to reach this provider.
    #[must_use]
    pub fn scope(&self) -> LayerScope<R> {
        LayerScope {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Registers `id`; a no-op if it is already active.
    pub fn register(&self, id: impl Into<LayerId>, kind: LayerKind) -> bool {
        self.state.write().insert(Layer::new(id, kind))
    }

    /// Unregisters `id`; a no-op if it is not active.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.state.write().remove(id);
        removed.is_some()
    }

    /// True iff `id` is the top layer.
    #[must_use]
    pub fn is_top(&self, id: &str) -> bool {
        self.state.read().registry.is_top(id)
    }

    /// True iff `id` is active with at least one layer above it.
    #[must_use]
    pub fn is_any_above(&self, id: &str) -> bool {
        self.state.read().registry.is_any_above(id)
    }

    /// Depth of `id`, `None` when inactive.
    #[must_use]
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.state.read().registry.depth(id)
    }

    /// `base_z + depth` for an active layer.
    #[must_use]
    pub fn z_index(&self, id: &str) -> Option<u32> {
        self.state.read().z_index(id)
    }

    /// Active ids in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<LayerId> {
        self.state.read().registry.list()
    }

    /// Id of the top layer.
    #[must_use]
    pub fn top(&self) -> Option<LayerId> {
        self.state.read().registry.top().cloned()
    }

    /// Number of active layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().registry.len()
    }

    /// True when no layer is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().registry.is_empty()
    }

    /// Z-index of the bottom layer.
    #[must_use]
    pub fn base_z(&self) -> u32 {
        self.state.read().base_z
    }

    /// Consistent view of the whole stack for one render pass.
    #[must_use]
    pub fn snapshot(&self) -> StackSnapshot {
        self.state.read().snapshot()
    }

    /// Current mutation counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Returns `true` once per batch of mutations since the previous call.
    pub fn take_changed(&self) -> bool {
        let mut state = self.state.write();
        let changed = state.revision != state.seen_revision;
        state.seen_revision = state.revision;
        changed
    }

    /// Unmounts the provider, resetting the registry to empty.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<R> Drop for LayerProvider<R> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.stack.try_borrow_mut() {
            let active = state.registry.len();
            state.reset();
            tracing::debug!(active, "layer provider unmounted, registry reset");
        }
    }
}

/// Weak handle to a mounted provider.
///
/// Every operation fails with [`GardeniaError::ProviderUnavailable`] once the
/// provider has been unmounted.
#[derive(Debug)]
pub struct LayerScope<R = ()> {
    state: Weak<SharedStack<R>>,
}

impl<R> Clone for LayerScope<R> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<R> LayerScope<R> {
    /// A scope that was never attached to a provider.
    ///
    /// Useful for components constructed before any provider exists; every
    /// operation on it reports [`GardeniaError::ProviderUnavailable`].
    #[must_use]
    pub const fn detached() -> Self {
        Self { state: Weak::new() }
    }

    pub(crate) fn state(&self) -> Result<Rc<SharedStack<R>>> {
        self.state.upgrade().ok_or(GardeniaError::ProviderUnavailable)
    }

    /// True while the provider is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// Registers `id` through the provider.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn register(&self, id: impl Into<LayerId>, kind: LayerKind) -> Result<bool> {
        let state = self.state()?;
        let inserted = state.write().insert(Layer::new(id, kind));
        Ok(inserted)
    }

    /// Unregisters `id` through the provider.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn unregister(&self, id: &str) -> Result<bool> {
        let state = self.state()?;
        let removed = state.write().remove(id);
        Ok(removed.is_some())
    }

    /// Reads a consistent snapshot of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn snapshot(&self) -> Result<StackSnapshot> {
        let state = self.state()?;
        let snapshot = state.read().snapshot();
        Ok(snapshot)
    }

    /// Whether `id` is the top layer.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn is_top(&self, id: &str) -> Result<bool> {
        let state = self.state()?;
        let top = state.read().registry.is_top(id);
        Ok(top)
    }

    /// Whether any layer sits above `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn is_any_above(&self, id: &str) -> Result<bool> {
        let state = self.state()?;
        let above = state.read().registry.is_any_above(id);
        Ok(above)
    }

    /// Depth of `id`, `None` when inactive.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::ProviderUnavailable`] outside a live provider.
    pub fn depth(&self, id: &str) -> Result<Option<usize>> {
        let state = self.state()?;
        let depth = state.read().registry.depth(id);
        Ok(depth)
    }
}

/// Frozen view of the stack taken under a single borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSnapshot {
    revision: u64,
    base_z: u32,
    entries: Vec<(LayerId, LayerKind)>,
}

impl StackSnapshot {
    /// Revision the snapshot was taken at.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Top layer id.
    #[must_use]
    pub fn top(&self) -> Option<&LayerId> {
        self.entries.last().map(|(id, _)| id)
    }

    /// True iff `id` is the top layer.
    #[must_use]
    pub fn is_top(&self, id: &str) -> bool {
        self.top().is_some_and(|top| top.as_str() == id)
    }

    /// True iff `id` is active with a layer above it.
    #[must_use]
    pub fn is_any_above(&self, id: &str) -> bool {
        self.depth(id)
            .is_some_and(|depth| depth + 1 < self.entries.len())
    }

    /// Depth of `id`, `None` when inactive.
    #[must_use]
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|(entry, _)| entry.as_str() == id)
    }

    /// `base_z + depth` for an active layer.
    #[must_use]
    pub fn z_index(&self, id: &str) -> Option<u32> {
        self.depth(id).and_then(|depth| layer_z(self.base_z, depth))
    }

    /// Kind of an active layer.
    #[must_use]
    pub fn kind(&self, id: &str) -> Option<LayerKind> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_str() == id)
            .map(|(_, kind)| *kind)
    }

    /// True iff `id` is active.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.depth(id).is_some()
    }

    /// Entries bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (&LayerId, LayerKind)> {
        self.entries.iter().map(|(id, kind)| (id, *kind))
    }

    /// Number of active layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no layer is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
