//! Ordered registry of active layers.
//!
//! The registry is the single source of truth for stacking order. Entries are
//! kept in insertion order: the last entry is the top layer, and an entry's
//! depth is its position in the sequence.
//!
//! # Invariants
//!
//! - Ids are unique among active entries; registering an active id is a no-op.
//! - Entries are never reordered. Only append and remove-from-anywhere exist,
//!   so removing a non-top entry keeps the relative order of the others.
//! - Exactly one entry is top whenever the registry is non-empty.
//!
//! # Example
//!
//! ```rust
//! use gardenia::layers::{LayerKind, LayerRegistry};
//!
//! let mut registry: LayerRegistry = LayerRegistry::new();
//! registry.register("plant-form", LayerKind::Form);
//! registry.register("time-picker", LayerKind::Picker);
//!
//! assert!(registry.is_top("time-picker"));
//! assert_eq!(registry.depth("plant-form"), Some(0));
//! assert_eq!(registry.depth("missing"), None);
//! ```

use std::borrow::Borrow;
use std::fmt;

/// Caller-supplied identifier of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(String);

impl LayerId {
    /// Creates a layer id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for LayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Distinguishes a full modal form from an ephemeral nested picker.
///
/// Both kinds share the same ordering semantics; the tag only informs the
/// rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A modal form that renders itself and uses the registry for bookkeeping.
    Form,
    /// A short-lived picker injected above its owning form.
    Picker,
}

/// One active entry of the registry.
///
/// `R` is the renderable carried by injected pickers. Forms leave it `None`.
#[derive(Debug)]
pub struct Layer<R = ()> {
    /// Unique id among active layers.
    pub id: LayerId,
    /// Form or picker.
    pub kind: LayerKind,
    /// Component to mount for injected layers.
    pub renderable: Option<R>,
}

impl<R> Layer<R> {
    /// Creates a layer entry without a renderable.
    pub fn new(id: impl Into<LayerId>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            renderable: None,
        }
    }

    /// Attaches a renderable component to the entry.
    #[must_use]
    pub fn with_renderable(mut self, renderable: R) -> Self {
        self.renderable = Some(renderable);
        self
    }
}

/// Insertion-ordered collection of active layers.
#[derive(Debug)]
pub struct LayerRegistry<R = ()> {
    layers: Vec<Layer<R>>,
}

impl<R> Default for LayerRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> LayerRegistry<R> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends `id` if it is not already active.
    ///
    /// Returns `true` if an entry was appended, `false` if the id was already
    /// active (in which case nothing changes).
    pub fn register(&mut self, id: impl Into<LayerId>, kind: LayerKind) -> bool {
        self.register_with(Layer::new(id, kind))
    }

    /// Appends a fully built entry if its id is not already active.
    ///
    /// A duplicate entry is dropped together with its renderable.
    pub fn register_with(&mut self, layer: Layer<R>) -> bool {
        if self.contains(layer.id.as_str()) {
            return false;
        }
        self.layers.push(layer);
        true
    }

    /// Removes `id` from wherever it sits in the sequence.
    ///
    /// Returns the removed entry, or `None` if the id was not active.
    pub fn unregister(&mut self, id: &str) -> Option<Layer<R>> {
        let index = self.position(id)?;
        Some(self.layers.remove(index))
    }

    /// True iff `id` is active and is the most recently registered entry.
    #[must_use]
    pub fn is_top(&self, id: &str) -> bool {
        self.layers.last().is_some_and(|top| top.id.as_str() == id)
    }

    /// True iff `id` is active and at least one entry sits above it.
    #[must_use]
    pub fn is_any_above(&self, id: &str) -> bool {
        self.position(id)
            .is_some_and(|index| index + 1 < self.layers.len())
    }

    /// Number of active entries registered before `id`.
    ///
    /// Returns `None` when `id` is not active.
    #[must_use]
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.position(id)
    }

    /// Snapshot of active ids in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<LayerId> {
        self.layers.iter().map(|layer| layer.id.clone()).collect()
    }

    /// Id of the top layer, if any.
    #[must_use]
    pub fn top(&self) -> Option<&LayerId> {
        self.layers.last().map(|layer| &layer.id)
    }

    /// Kind of the layer registered under `id`.
    #[must_use]
    pub fn kind(&self, id: &str) -> Option<LayerKind> {
        self.get(id).map(|layer| layer.kind)
    }

    /// Looks up an active entry.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Layer<R>> {
        self.layers.iter().find(|layer| layer.id.as_str() == id)
    }

    /// Renderable of an injected layer.
    #[must_use]
    pub fn renderable(&self, id: &str) -> Option<&R> {
        self.get(id).and_then(|layer| layer.renderable.as_ref())
    }

    /// Mutable renderable of an injected layer.
    pub fn renderable_mut(&mut self, id: &str) -> Option<&mut R> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id.as_str() == id)
            .and_then(|layer| layer.renderable.as_mut())
    }

    /// Moves the renderable out of `id`'s entry, leaving the entry in place.
    pub fn take_renderable(&mut self, id: &str) -> Option<R> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id.as_str() == id)
            .and_then(|layer| layer.renderable.take())
    }

    /// Puts a renderable taken with [`Self::take_renderable`] back.
    ///
    /// Hands `renderable` back when `id` is no longer active or already
    /// carries another component.
    pub fn restore_renderable(&mut self, id: &str, renderable: R) -> Option<R> {
        match self.layers.iter_mut().find(|layer| layer.id.as_str() == id) {
            Some(layer) if layer.renderable.is_none() => {
                layer.renderable = Some(renderable);
                None
            }
            _ => Some(renderable),
        }
    }

    /// Iterates entries bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Layer<R>> {
        self.layers.iter()
    }

    /// True iff `id` is active.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Number of active entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when no layer is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[&str]) -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        for id in ids {
            registry.register(*id, LayerKind::Form);
        }
        registry
    }

    #[test]
    fn register_appends_in_order() {
        let registry = registry_with(&["a", "b", "c"]);
        assert_eq!(registry.list(), vec![LayerId::from("a"), "b".into(), "c".into()]);
        assert_eq!(registry.top().map(LayerId::as_str), Some("c"));
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = registry_with(&["a", "b"]);
        assert!(!registry.register("a", LayerKind::Form));
        assert!(!registry.register("b", LayerKind::Picker));
        assert_eq!(registry.list(), vec![LayerId::from("a"), "b".into()]);
        assert_eq!(registry.kind("b"), Some(LayerKind::Form));
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.unregister("zz").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_middle_keeps_relative_order() {
        let mut registry = registry_with(&["a", "b", "c", "d"]);
        let removed = registry.unregister("b");
        assert_eq!(removed.map(|l| l.id), Some(LayerId::from("b")));
        assert_eq!(registry.list(), vec![LayerId::from("a"), "c".into(), "d".into()]);
        assert_eq!(registry.depth("c"), Some(1));
        assert!(registry.is_top("d"));
    }

    #[test]
    fn queries_on_absent_id_return_sentinels() {
        let registry = registry_with(&["a"]);
        assert!(!registry.is_top("x"));
        assert!(!registry.is_any_above("x"));
        assert_eq!(registry.depth("x"), None);
    }

    #[test]
    fn empty_registry_has_no_top() {
        let registry: LayerRegistry = LayerRegistry::new();
        assert!(registry.top().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn renderable_travels_with_entry() {
        let mut registry: LayerRegistry<&'static str> = LayerRegistry::new();
        registry.register("form", LayerKind::Form);
        registry.register_with(Layer::new("picker", LayerKind::Picker).with_renderable("clock"));

        assert_eq!(registry.renderable("picker"), Some(&"clock"));
        assert_eq!(registry.renderable("form"), None);

        if let Some(r) = registry.renderable_mut("picker") {
            *r = "dial";
        }
        let removed = registry.unregister("picker");
        assert_eq!(removed.and_then(|l| l.renderable), Some("dial"));
    }
}
