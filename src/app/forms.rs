//! Modal resource forms.
//!
//! A [`FormState`] is one open form: the layer binding that keeps it in the
//! stack, the values typed or picked so far, and at most one injected picker.
//! Dropping the form releases both its picker and its own layer.

use crate::app::session::{FormSession, PlacementMode};
use crate::domain::{FieldKind, FieldSpec, FieldValue, ResourceKind, Result};
use crate::layers::{LayerBinding, LayerId, LayerKind, LayerScope, PickerOutcome, RenderMode};
use crate::pickers::{DurationPicker, LocationPicker, PickerBox, PickerKey, TimePicker};

/// Field of another form that a nested form fills in once it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTarget {
    /// Form that opened the nested form.
    pub form: LayerId,
    /// Index of the field to fill.
    pub field: usize,
}

/// Message shown on a form's status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Progress or hint.
    Info(String),
    /// Validation or API failure.
    Error(String),
}

impl FormStatus {
    /// Message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Error(text) => text,
        }
    }

    /// Whether the message reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone)]
struct OpenPicker {
    layer: LayerId,
    field: usize,
}

/// One open form.
#[derive(Debug)]
pub struct FormState {
    binding: LayerBinding<PickerBox>,
    resource: ResourceKind,
    values: Vec<FieldValue>,
    focused: usize,
    picker: Option<OpenPicker>,
    status: Option<FormStatus>,
    submitting: bool,
    target: Option<FieldTarget>,
}

impl FormState {
    /// Opens a form for `resource`, registering it as the new top layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] when `scope` has
    /// no mounted provider.
    pub fn open(
        scope: &LayerScope<PickerBox>,
        id: impl Into<LayerId>,
        resource: ResourceKind,
        target: Option<FieldTarget>,
    ) -> Result<Self> {
        let binding = scope.bind(id, LayerKind::Form)?;
        tracing::debug!(form_id = %binding.id(), %resource, nested = target.is_some(), "form opened");
        Ok(Self {
            binding,
            resource,
            values: vec![FieldValue::Empty; resource.fields().len()],
            focused: 0,
            picker: None,
            status: None,
            submitting: false,
            target,
        })
    }

    /// Layer id of the form.
    #[must_use]
    pub const fn id(&self) -> &LayerId {
        self.binding.id()
    }

    /// Resource the form creates.
    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Field declarations, top to bottom.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.resource.fields()
    }

    /// Current values, parallel to [`FormState::fields`].
    #[must_use]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Value of one field.
    #[must_use]
    pub fn value(&self, field: usize) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Index of the focused field.
    #[must_use]
    pub const fn focused(&self) -> usize {
        self.focused
    }

    /// Declaration of the focused field.
    #[must_use]
    pub fn focused_spec(&self) -> Option<&'static FieldSpec> {
        self.fields().get(self.focused)
    }

    /// Field a nested form fills in on success.
    #[must_use]
    pub const fn target(&self) -> Option<&FieldTarget> {
        self.target.as_ref()
    }

    /// Status line message.
    #[must_use]
    pub const fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    /// Whether a create request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the form is the top layer.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.binding.is_top()
    }

    /// Active while on top, background otherwise.
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        self.binding.render_mode()
    }

    /// Z-index of the form's layer.
    #[must_use]
    pub fn z_index(&self) -> Option<u32> {
        self.binding.z_index()
    }

    /// Layer id of the open picker.
    #[must_use]
    pub fn picker_id(&self) -> Option<&LayerId> {
        self.picker.as_ref().map(|open| &open.layer)
    }

    /// Field the open picker edits.
    #[must_use]
    pub fn picker_field(&self) -> Option<usize> {
        self.picker.as_ref().map(|open| open.field)
    }

    /// Whether `id` is this form or its picker.
    #[must_use]
    pub fn owns_layer(&self, id: &str) -> bool {
        self.id().as_str() == id || self.picker_id().is_some_and(|picker| picker.as_str() == id)
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.values.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.values.len() - 1) % self.values.len();
    }

    /// Focuses `field`; out-of-range indices are ignored.
    pub fn focus(&mut self, field: usize) -> bool {
        if field < self.values.len() {
            self.focused = field;
            true
        } else {
            false
        }
    }

    /// Types a character into the focused field.
    ///
    /// Picker-backed fields ignore typing, number fields accept digits only.
    pub fn type_char(&mut self, c: char) -> bool {
        let Some(spec) = self.focused_spec() else {
            return false;
        };
        if !spec.kind.accepts_typing() || (spec.kind == FieldKind::Number && !c.is_ascii_digit()) {
            tracing::debug!(field = spec.key, %c, "character ignored by field");
            return false;
        }

        let value = &mut self.values[self.focused];
        match value {
            FieldValue::Text(text) => text.push(c),
            _ => *value = FieldValue::Text(c.to_string()),
        }
        self.status = None;
        true
    }

    /// Deletes the last character, or clears a picked value.
    pub fn backspace(&mut self) -> bool {
        let Some(value) = self.values.get_mut(self.focused) else {
            return false;
        };
        match value {
            FieldValue::Empty => false,
            FieldValue::Text(text) => {
                text.pop();
                if text.is_empty() {
                    *value = FieldValue::Empty;
                }
                true
            }
            _ => {
                *value = FieldValue::Empty;
                true
            }
        }
    }

    /// Sets a field's value.
    pub fn set_value(&mut self, field: usize, value: FieldValue) {
        if let Some(slot) = self.values.get_mut(field) {
            *slot = value;
        }
    }

    /// Opens the picker of the focused field above this form.
    ///
    /// Returns the picker's z-index, or `None` when the focused field has no
    /// picker or one is already open.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] when the provider
    /// has unmounted.
    pub fn open_picker(&mut self, session: &FormSession, locations: &[String]) -> Result<Option<u32>> {
        if self.picker.is_some() {
            return Ok(None);
        }
        let Some(spec) = self.focused_spec() else {
            return Ok(None);
        };
        let current = &self.values[self.focused];

        let component: PickerBox = match spec.kind {
            FieldKind::Time => {
                let initial = match current {
                    FieldValue::Time(time) => *time,
                    _ => session.seed_time(),
                };
                Box::new(TimePicker::new(initial))
            }
            FieldKind::Duration => {
                let initial = match current {
                    FieldValue::Duration(duration) => *duration,
                    _ => session.seed_duration(),
                };
                Box::new(DurationPicker::new(initial))
            }
            FieldKind::Location => {
                let current = match current {
                    FieldValue::Location(name) => Some(name.as_str()),
                    _ => None,
                };
                Box::new(LocationPicker::new(locations.to_vec(), current))
            }
            FieldKind::Text | FieldKind::Number => return Ok(None),
        };

        let layer = LayerId::new(format!("{}/{}", self.id(), spec.key));
        let z = self
            .binding
            .scope()
            .add_layer(layer.clone(), LayerKind::Picker, self.id().as_str(), component)?;
        tracing::debug!(picker_id = %layer, field = spec.key, z_index = ?z, "picker opened");

        self.picker = Some(OpenPicker {
            layer,
            field: self.focused,
        });
        Ok(z)
    }

    /// Forwards a key to the open picker and applies its outcome.
    ///
    /// A selection is written to the field and remembered in `session`; a
    /// selection or cancellation removes the picker layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] when the provider
    /// has unmounted.
    pub fn forward_key(&mut self, key: PickerKey, session: &mut FormSession) -> Result<PickerOutcome<()>> {
        let Some(open) = self.picker.clone() else {
            return Ok(PickerOutcome::Cancelled);
        };

        let outcome = self
            .binding
            .scope()
            .with_picker(open.layer.as_str(), |picker| picker.handle_key(key))?;

        match outcome {
            Some(PickerOutcome::Pending) => Ok(PickerOutcome::Pending),
            Some(PickerOutcome::Selected(value)) => {
                match &value {
                    FieldValue::Time(time) => session.remember_time(*time),
                    FieldValue::Duration(duration) => session.remember_duration(*duration),
                    _ => {}
                }
                tracing::debug!(picker_id = %open.layer, value = %value.display(), "picker selected");
                self.set_value(open.field, value);
                self.status = None;
                self.close_picker()?;
                Ok(PickerOutcome::Selected(()))
            }
            Some(PickerOutcome::Cancelled) => {
                self.close_picker()?;
                Ok(PickerOutcome::Cancelled)
            }
            None => {
                tracing::warn!(picker_id = %open.layer, "picker layer vanished");
                self.picker = None;
                Ok(PickerOutcome::Cancelled)
            }
        }
    }

    /// Removes the open picker layer, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GardeniaError::ProviderUnavailable`] when the provider
    /// has unmounted.
    pub fn close_picker(&mut self) -> Result<bool> {
        let Some(open) = self.picker.take() else {
            return Ok(false);
        };
        let removed = self.binding.scope().remove_layer(open.layer.as_str())?;
        Ok(removed.is_some())
    }

    /// Labels of required fields that are still empty.
    #[must_use]
    pub fn missing_fields(&self, placement: PlacementMode) -> Vec<&'static str> {
        self.fields()
            .iter()
            .zip(&self.values)
            .filter(|(spec, value)| self.is_required(spec, placement) && value.is_empty())
            .map(|(spec, _)| spec.label)
            .collect()
    }

    /// Whether `spec` must be filled in before submit under `placement`.
    #[must_use]
    pub fn is_required(&self, spec: &FieldSpec, placement: PlacementMode) -> bool {
        let suggested_location = self.resource == ResourceKind::Plant
            && spec.kind == FieldKind::Location
            && placement == PlacementMode::Suggested;
        spec.required && !suggested_location
    }

    /// JSON body of the create request.
    #[must_use]
    pub fn request_body(&self, session: &FormSession) -> serde_json::Value {
        let mut body: serde_json::Map<String, serde_json::Value> = self
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| !value.is_empty())
            .map(|(spec, value)| (spec.key.to_string(), value.to_json(spec.kind)))
            .collect();

        if self.resource == ResourceKind::Plant {
            body.insert(
                "placement".to_string(),
                serde_json::Value::from(session.placement().as_str()),
            );
        }
        serde_json::Value::Object(body)
    }

    /// Validates the form and marks it as submitting.
    ///
    /// Returns the request body, or `None` with an error status when required
    /// fields are missing or a request is already in flight.
    pub fn begin_submit(&mut self, session: &FormSession) -> Option<serde_json::Value> {
        if self.submitting {
            return None;
        }
        let missing = self.missing_fields(session.placement());
        if !missing.is_empty() {
            self.status = Some(FormStatus::Error(format!("Missing: {}", missing.join(", "))));
            return None;
        }

        self.submitting = true;
        self.status = Some(FormStatus::Info(format!("Saving {}…", self.resource.label().to_lowercase())));
        Some(self.request_body(session))
    }

    /// Records a failed submit; the form stays open for another attempt.
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.status = Some(FormStatus::Error(message.into()));
    }

    /// Name typed into the form, used when a nested form fills its parent.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.fields()
            .iter()
            .position(|spec| spec.key == "name")
            .and_then(|index| self.values.get(index))
            .filter(|value| !value.is_empty())
            .map(FieldValue::display)
    }
}

impl Drop for FormState {
    fn drop(&mut self) {
        if let Some(open) = self.picker.take() {
            if let Err(e) = self.binding.scope().remove_layer(open.layer.as_str()) {
                tracing::debug!(picker_id = %open.layer, error = %e, "picker outlived its provider");
            }
        }
    }
}
