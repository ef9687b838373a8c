//! Injection of short-lived picker layers above an open form.
//!
//! A form that needs a nested picker does not render it itself. It hands the
//! component to [`LayerScope::add_layer`], which registers a new entry carrying
//! the component as its renderable. The rendering layer mounts every entry
//! that has a renderable, at the entry's own z-index, independently of the
//! form's layout.
//!
//! A picker goes `absent → active → absent`, driven only by
//! [`LayerScope::add_layer`] and [`LayerScope::remove_layer`]. The component
//! reports its result through [`PickerOutcome`]; the caller turns `Selected`
//! and `Cancelled` into `remove_layer`.

use super::provider::{layer_z, LayerScope};
use super::registry::{Layer, LayerId, LayerKind};
use crate::domain::error::Result;

/// What a picker reports after handling input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome<V> {
    /// Still open, nothing chosen yet.
    Pending,
    /// The user picked a value.
    Selected(V),
    /// The user backed out.
    Cancelled,
}

impl<R> LayerScope<R> {
    /// Registers an injected layer above `owner` and returns its z-index.
    ///
    /// While `owner` is the top layer the new entry lands at
    /// `depth(owner) + 1`. Injecting an id that is already active keeps the
    /// existing component and drops `component`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] outside a live
    /// provider.
    pub fn add_layer(
        &self,
        id: impl Into<LayerId>,
        kind: LayerKind,
        owner: &str,
        component: R,
    ) -> Result<Option<u32>> {
        let state = self.state()?;
        let mut state = state.write();
        let id = id.into();

        if !state.registry.is_top(owner) {
            tracing::warn!(layer_id = %id, owner = %owner, "injecting above a layer that is not on top");
        }

        state.insert(Layer::new(id.clone(), kind).with_renderable(component));
        Ok(state.z_index(id.as_str()))
    }

    /// Unregisters an injected layer and hands back its component.
    ///
    /// Unknown ids are a no-op and return `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] outside a live
    /// provider.
    pub fn remove_layer(&self, id: &str) -> Result<Option<R>> {
        let state = self.state()?;
        let removed = state.write().remove(id);
        Ok(removed.and_then(|layer| layer.renderable))
    }

    /// Runs `f` against the component of an injected layer.
    ///
    /// The component is moved out of the stack while `f` runs, so `f` may use
    /// the scope and may drop bindings. The layer renders without its
    /// component until `f` returns; if `f` removes the layer, the component is
    /// dropped afterwards. Returns `None` if `id` has no component.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] outside a live
    /// provider.
    pub fn with_picker<T>(&self, id: &str, f: impl FnOnce(&mut R) -> T) -> Result<Option<T>> {
        let state = self.state()?;
        let Some(mut component) = state.write().registry.take_renderable(id) else {
            return Ok(None);
        };

        let output = f(&mut component);

        let orphan = state.write().registry.restore_renderable(id, component);
        if orphan.is_some() {
            tracing::debug!(layer_id = %id, "layer left the stack while its component was in use");
        }
        drop(orphan);
        Ok(Some(output))
    }

    /// Visits every injected layer bottom to top with its z-index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] outside a live
    /// provider.
    pub fn for_each_injected(&self, mut f: impl FnMut(&LayerId, u32, &R)) -> Result<()> {
        let state = self.state()?;
        let state = state.read();
        for (depth, layer) in state.registry.iter().enumerate() {
            let Some(component) = layer.renderable.as_ref() else {
                continue;
            };
            if let Some(z) = layer_z(state.base_z, depth) {
                f(&layer.id, z, component);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerBinding, LayerProvider};

    /// Component that keeps a nested form open for as long as it lives.
    struct Holder(Option<LayerBinding<Holder>>);

    #[test]
    fn picker_lands_one_above_its_form() {
        let provider: LayerProvider<&'static str> = LayerProvider::with_base_z(100);
        let scope = provider.scope();
        let form = scope.bind("zone-form", LayerKind::Form).unwrap();

        let z = scope
            .add_layer("start-time", LayerKind::Picker, "zone-form", "clock")
            .unwrap();
        assert_eq!(z, Some(101));
        assert_eq!(provider.depth("start-time"), form.depth().map(|d| d + 1));
        assert!(!form.is_top());

        assert_eq!(scope.remove_layer("start-time").unwrap(), Some("clock"));
        assert!(form.is_top());
        assert_eq!(scope.remove_layer("start-time").unwrap(), None);
    }

    #[test]
    fn with_picker_reaches_component() {
        let provider: LayerProvider<u32> = LayerProvider::new();
        let scope = provider.scope();
        provider.register("form", LayerKind::Form);
        scope.add_layer("counter", LayerKind::Picker, "form", 1).unwrap();

        let seen = scope
            .with_picker("counter", |n| {
                *n += 1;
                *n
            })
            .unwrap();
        assert_eq!(seen, Some(2));
        assert_eq!(scope.with_picker("form", |n| *n).unwrap(), None);
    }

    #[test]
    fn component_replaced_inside_with_picker_releases_its_binding() {
        let provider: LayerProvider<Holder> = LayerProvider::new();
        let scope = provider.scope();
        let _form = scope.bind("form", LayerKind::Form).unwrap();
        let nested = scope.bind("nested", LayerKind::Form).unwrap();
        scope
            .add_layer("holder", LayerKind::Picker, "nested", Holder(Some(nested)))
            .unwrap();

        let on_top = scope
            .with_picker("holder", |holder| {
                holder.0 = None;
                scope.is_top("holder").unwrap()
            })
            .unwrap();
        assert_eq!(on_top, Some(true));
        assert_eq!(provider.list(), vec![LayerId::from("form"), LayerId::from("holder")]);

        assert!(scope.remove_layer("holder").unwrap().is_some());
        assert_eq!(provider.list(), vec![LayerId::from("form")]);
    }

    #[test]
    fn component_of_a_layer_removed_inside_with_picker_is_dropped() {
        let provider: LayerProvider<Holder> = LayerProvider::new();
        let scope = provider.scope();
        let nested = scope.bind("nested", LayerKind::Form).unwrap();
        scope
            .add_layer("holder", LayerKind::Picker, "nested", Holder(Some(nested)))
            .unwrap();

        let handed_back = scope
            .with_picker("holder", |_| scope.remove_layer("holder").unwrap().is_some())
            .unwrap();
        assert_eq!(handed_back, Some(false));
        assert!(provider.is_empty());
    }
}
