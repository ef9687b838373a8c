//! Application state management and view model computation.
//!
//! [`AppState`] owns the layer provider and everything mounted under it: the
//! open forms (each holding its own layer binding), the outside-click gate,
//! and the per-session form preferences. It is the single source of truth the
//! event handler mutates and the renderer reads.
//!
//! # Layout
//!
//! Screen rectangles are recomputed by [`AppState::relayout`] after every
//! event and handed to the gate, so hit-testing always uses the geometry of
//! the frame that is currently on screen.
//!
//! # Example
//!
//! ```rust
//! use gardenia::app::AppState;
//! use gardenia::domain::ResourceKind;
//! use gardenia::layers::DEFAULT_BASE_Z;
//! use gardenia::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), DEFAULT_BASE_Z);
//! state.open_form(ResourceKind::Zone, None)?;
//! state.relayout()?;
//! let viewmodel = state.compute_viewmodel();
//! assert_eq!(viewmodel.layers.len(), 1);
//! # Ok::<(), gardenia::GardeniaError>(())
//! ```

use std::collections::HashMap;

use super::forms::{FieldTarget, FormState, FormStatus};
use super::handler::Event;
use super::layout::{self, Viewport};
use super::session::FormSession;
use crate::domain::{FieldValue, ResourceKind, Result};
use crate::layers::{
    LayerId, LayerKind, LayerProvider, LayerScope, OutsideClickGate, Rect, RenderMode, StackSnapshot,
};
use crate::pickers::{PickerBox, PickerLine};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    EmptyState, FieldView, FooterInfo, FormView, HeaderInfo, LayerBody, LayerView, StatusLine, UIViewModel,
};

/// Central application state container.
///
/// Field order matters: forms are dropped before the provider so their
/// bindings unregister against a live registry.
#[derive(Debug)]
pub struct AppState {
    /// Open forms in the order they were opened.
    ///
    /// Each form owns its layer binding, so removing a form from this list
    /// removes its layer (and its picker) from the stack.
    pub forms: Vec<FormState>,

    provider: LayerProvider<PickerBox>,

    /// Outside-click routing for the current top layer.
    pub gate: OutsideClickGate<Event>,

    /// Placement mode and recently picked values.
    pub session: FormSession,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Location names offered by the location picker.
    ///
    /// Loaded from the API once web access is granted, extended as locations
    /// are created.
    pub locations: Vec<String>,

    /// Application-wide status (request errors with no form to show them).
    pub status: Option<FormStatus>,

    /// Size of the plugin pane.
    pub viewport: Viewport,

    next_form_id: u32,
}

impl AppState {
    /// Creates the state with an empty stack whose bottom layer renders at
    /// `base_z`.
    #[must_use]
    pub fn new(theme: Theme, base_z: u32) -> Self {
        Self {
            forms: Vec::new(),
            provider: LayerProvider::with_base_z(base_z),
            gate: OutsideClickGate::new(),
            session: FormSession::new(),
            theme,
            locations: Vec::new(),
            status: None,
            viewport: Viewport::default(),
            next_form_id: 1,
        }
    }

    /// Provider owning the layer stack.
    #[must_use]
    pub const fn provider(&self) -> &LayerProvider<PickerBox> {
        &self.provider
    }

    /// Handle to the provider for code mounted beneath it.
    #[must_use]
    pub fn scope(&self) -> LayerScope<PickerBox> {
        self.provider.scope()
    }

    /// Stack snapshot for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> StackSnapshot {
        self.provider.snapshot()
    }

    /// Opens a form for `resource` on top of the stack.
    ///
    /// `target` names the parent field a nested form fills on success.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::GardeniaError::ProviderUnavailable`] from the
    /// binding.
    pub fn open_form(&mut self, resource: ResourceKind, target: Option<FieldTarget>) -> Result<LayerId> {
        let id = LayerId::new(format!("{}-{}", resource.endpoint(), self.next_form_id));
        self.next_form_id += 1;

        let form = FormState::open(&self.provider.scope(), id.clone(), resource, target)?;
        self.forms.push(form);
        self.status = None;
        Ok(id)
    }

    /// Index of the form owning the top layer (the form itself or its picker).
    #[must_use]
    pub fn top_form_index(&self) -> Option<usize> {
        let snapshot = self.provider.snapshot();
        let top = snapshot.top()?;
        self.forms.iter().rposition(|form| form.owns_layer(top.as_str()))
    }

    /// Index of the form with layer id `id`.
    #[must_use]
    pub fn form_index(&self, id: &str) -> Option<usize> {
        self.forms.iter().position(|form| form.id().as_str() == id)
    }

    /// Index of the form owning picker `id`.
    #[must_use]
    pub fn picker_owner(&self, id: &str) -> Option<usize> {
        self.forms
            .iter()
            .position(|form| form.picker_id().is_some_and(|picker| picker.as_str() == id))
    }

    /// Closes the form `id`, releasing its layer and picker.
    pub fn close_form(&mut self, id: &str) -> Option<FormState> {
        let index = self.form_index(id)?;
        let form = self.forms.remove(index);
        if let Some(picker) = form.picker_id() {
            self.gate.clear_surface(picker.as_str());
        }
        self.gate.clear_surface(id);
        tracing::debug!(form_id = %id, remaining = self.forms.len(), "form closed");
        Some(form)
    }

    /// Fills the parent field named by `target` and focuses it.
    pub fn fill_target(&mut self, target: &FieldTarget, value: FieldValue) -> bool {
        let Some(index) = self.form_index(target.form.as_str()) else {
            tracing::debug!(form_id = %target.form, "target form already closed");
            return false;
        };
        let form = &mut self.forms[index];
        form.set_value(target.field, value);
        form.focus(target.field);
        true
    }

    /// Adds a location name offered by the location picker.
    pub fn add_location(&mut self, name: String) {
        if !self.locations.contains(&name) {
            self.locations.push(name);
        }
    }

    /// Updates the pane size.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`AppState::relayout`].
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let viewport = Viewport { rows, cols };
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        self.relayout()
    }

    /// Rectangle of the form at `slot`.
    #[must_use]
    pub fn form_rect(&self, slot: usize) -> Option<Rect> {
        let form = self.forms.get(slot)?;
        Some(layout::form_rect(slot, form.fields().len(), self.viewport))
    }

    /// Rectangle of the picker of the form at `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] if the picker's
    /// provider has unmounted.
    pub fn picker_rect(&self, slot: usize) -> Result<Option<Rect>> {
        let Some(form) = self.forms.get(slot) else {
            return Ok(None);
        };
        let (Some(picker), Some(field), Some(form_rect)) = (form.picker_id(), form.picker_field(), self.form_rect(slot))
        else {
            return Ok(None);
        };

        let size = self
            .provider
            .scope()
            .with_picker(picker.as_str(), |picker| (picker.width(), picker.lines().len()))?;
        Ok(size.map(|(width, lines)| {
            layout::picker_rect(form_rect, layout::field_line(form_rect, field), width, lines, self.viewport)
        }))
    }

    /// Records the painted rectangle of every layer and re-attaches the gate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] if a picker's
    /// provider has unmounted.
    pub fn relayout(&mut self) -> Result<()> {
        for slot in 0..self.forms.len() {
            let form_id = self.forms[slot].id().clone();
            if let Some(rect) = self.form_rect(slot) {
                self.gate.set_surface(form_id.clone(), rect, Event::DismissLayer(form_id));
            }
            if let (Some(picker), Some(rect)) = (self.forms[slot].picker_id().cloned(), self.picker_rect(slot)?) {
                self.gate.set_surface(picker.clone(), rect, Event::DismissLayer(picker));
            }
        }

        let snapshot = self.provider.snapshot();
        self.gate.sync(&snapshot);
        Ok(())
    }

    /// Lines of the picker on top of the stack, if the top layer is a picker.
    #[must_use]
    pub fn top_picker_lines(&self) -> Option<Vec<PickerLine>> {
        let snapshot = self.provider.snapshot();
        let top = snapshot.top()?;
        if snapshot.kind(top.as_str()) != Some(LayerKind::Picker) {
            return None;
        }
        self.provider
            .scope()
            .with_picker(top.as_str(), |picker| picker.lines())
            .ok()
            .flatten()
    }

    /// Transforms the state into a renderable view model.
    ///
    /// Every active layer appears once, bottom to top, with the render mode
    /// and z-index of one consistent stack snapshot.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let snapshot = self.provider.snapshot();

        // Pickers are mounted from the registry entries that carry them.
        let mut injected = HashMap::new();
        let mounted = self.provider.scope().for_each_injected(|id, _, picker| {
            injected.insert(id.clone(), (picker.title().to_string(), picker.lines()));
        });
        if let Err(e) = mounted {
            tracing::warn!(error = %e, "injected layers unavailable");
        }

        let layers: Vec<LayerView> = snapshot
            .iter()
            .filter_map(|(id, kind)| self.compute_layer(&snapshot, &mut injected, id, kind))
            .collect();

        let empty_state = self.forms.is_empty().then(|| self.compute_empty_state());

        UIViewModel {
            header: self.compute_header(&snapshot),
            footer: self.compute_footer(&snapshot),
            empty_state,
            layers,
        }
    }

    fn compute_layer(
        &self,
        snapshot: &StackSnapshot,
        injected: &mut HashMap<LayerId, (String, Vec<PickerLine>)>,
        id: &LayerId,
        kind: LayerKind,
    ) -> Option<LayerView> {
        let z_index = snapshot.z_index(id.as_str())?;
        let mode = if snapshot.is_top(id.as_str()) {
            RenderMode::Active
        } else {
            RenderMode::Background
        };

        match kind {
            LayerKind::Form => {
                let slot = self.form_index(id.as_str())?;
                let form = &self.forms[slot];
                Some(LayerView {
                    id: id.to_string(),
                    title: Self::form_title(form),
                    z_index,
                    rect: self.form_rect(slot)?,
                    mode,
                    body: LayerBody::Form(self.compute_form(form)),
                })
            }
            LayerKind::Picker => {
                let slot = self.picker_owner(id.as_str())?;
                let rect = self.picker_rect(slot).ok().flatten()?;
                let (title, lines) = injected.remove(id)?;
                Some(LayerView {
                    id: id.to_string(),
                    title,
                    z_index,
                    rect,
                    mode,
                    body: LayerBody::Picker(lines),
                })
            }
        }
    }

    fn form_title(form: &FormState) -> String {
        let label = form.resource().label();
        match form.target() {
            Some(target) => format!("New {label} (for {})", target.form),
            None => format!("New {label}"),
        }
    }

    fn compute_form(&self, form: &FormState) -> FormView {
        let placement = self.session.placement();
        let fields = form
            .fields()
            .iter()
            .zip(form.values())
            .enumerate()
            .map(|(index, (spec, value))| FieldView {
                label: spec.label.to_string(),
                value: value.display(),
                is_focused: index == form.focused(),
                is_required: form.is_required(spec, placement),
                has_picker: spec.kind.has_picker(),
            })
            .collect();

        FormView {
            fields,
            status: form.status().map(Self::status_line),
        }
    }

    fn status_line(status: &FormStatus) -> StatusLine {
        StatusLine {
            text: status.text().to_string(),
            is_error: status.is_error(),
        }
    }

    fn compute_header(&self, snapshot: &StackSnapshot) -> HeaderInfo {
        let trail = snapshot
            .iter()
            .filter_map(|(id, kind)| match kind {
                LayerKind::Form => {
                    let form = &self.forms[self.form_index(id.as_str())?];
                    Some(form.resource().label().to_string())
                }
                LayerKind::Picker => {
                    let form = &self.forms[self.picker_owner(id.as_str())?];
                    let field = form.fields().get(form.picker_field()?)?;
                    Some(field.label.to_string())
                }
            })
            .collect();

        HeaderInfo {
            title: format!("Gardenia · placement: {}", self.session.placement().as_str()),
            trail,
        }
    }

    fn compute_footer(&self, snapshot: &StackSnapshot) -> FooterInfo {
        let top_kind = snapshot.top().and_then(|top| snapshot.kind(top.as_str()));
        let keybindings = match top_kind {
            None => "p plant • z zone • l location • s schedule • r reload • q quit",
            Some(LayerKind::Form) => {
                "tab/↑↓ field • enter pick • ^s save • ^n new location • ^t placement • esc close"
            }
            Some(LayerKind::Picker) => "↑↓ change • ←→ column • type to filter • enter select • esc cancel",
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
            status: self.status.as_ref().map(Self::status_line),
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let menu: Vec<String> = ResourceKind::ALL
            .iter()
            .map(|kind| format!("{} {}", kind.shortcut(), kind.label().to_lowercase()))
            .collect();
        EmptyState {
            message: "Nothing open".to_string(),
            subtitle: format!(
                "{} · {} locations known",
                menu.join("  "),
                self.locations.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::DEFAULT_BASE_Z;

    fn state() -> AppState {
        AppState::new(Theme::default(), DEFAULT_BASE_Z)
    }

    #[test]
    fn forms_cascade_with_increasing_z() {
        let mut state = state();
        let plant = state.open_form(ResourceKind::Plant, None).unwrap();
        let location = state
            .open_form(
                ResourceKind::Location,
                Some(FieldTarget {
                    form: plant.clone(),
                    field: 2,
                }),
            )
            .unwrap();
        state.relayout().unwrap();

        let vm = state.compute_viewmodel();
        assert_eq!(vm.layers.len(), 2);
        assert_eq!(vm.layers[0].id, plant.as_str());
        assert_eq!(vm.layers[0].mode, RenderMode::Background);
        assert_eq!(vm.layers[1].id, location.as_str());
        assert_eq!(vm.layers[1].mode, RenderMode::Active);
        assert_eq!(vm.layers[1].z_index, vm.layers[0].z_index + 1);
        assert!(vm.layers[1].rect.x > vm.layers[0].rect.x);
        assert_eq!(vm.layers[1].title, "New Location (for plants-1)");
        assert_eq!(state.gate.attached(), Some(&location));
    }

    #[test]
    fn closing_top_form_reactivates_parent() {
        let mut state = state();
        let plant = state.open_form(ResourceKind::Plant, None).unwrap();
        let location = state.open_form(ResourceKind::Location, None).unwrap();

        assert!(state.close_form(location.as_str()).is_some());
        state.relayout().unwrap();

        assert_eq!(state.top_form_index(), Some(0));
        assert!(state.forms[0].is_top());
        assert_eq!(state.gate.attached(), Some(&plant));
        assert!(state.gate.surface(location.as_str()).is_none());
    }

    #[test]
    fn picker_layer_renders_above_its_form() {
        let mut state = state();
        state.open_form(ResourceKind::Zone, None).unwrap();
        state.forms[0].focus(3);
        let session = state.session.clone();
        state.forms[0].open_picker(&session, &[]).unwrap();
        state.relayout().unwrap();

        let vm = state.compute_viewmodel();
        assert_eq!(vm.layers.len(), 2);
        assert!(matches!(vm.layers[1].body, LayerBody::Picker(_)));
        assert_eq!(vm.layers[1].mode, RenderMode::Active);
        assert_eq!(vm.layers[0].mode, RenderMode::Background);
        assert_eq!(state.top_form_index(), Some(0));
        assert!(state.top_picker_lines().is_some());
        assert_eq!(vm.header.trail, vec!["Zone".to_string(), "Run time".to_string()]);
    }

    #[test]
    fn empty_state_lists_shortcuts() {
        let state = state();
        let vm = state.compute_viewmodel();
        let empty = vm.empty_state.unwrap();
        assert!(empty.subtitle.contains("p plant"));
        assert!(vm.layers.is_empty());
        assert!(vm.footer.keybindings.contains("q quit"));
        assert!(vm.header.trail.is_empty());
    }
}
