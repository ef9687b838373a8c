//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place the application state changes. Key
//! events are routed by what sits on top of the layer stack:
//!
//! - **Picker on top**: keys go to the picker through its owning form
//! - **Form on top**: keys edit the form, open pickers or nested forms, submit
//! - **Nothing open**: keys act as the resource menu
//!
//! Pointer events go through the outside-click gate first; a click that lands
//! outside every open layer dismisses the top one and nothing else.
//!
//! # Example
//!
//! ```rust
//! use gardenia::app::{handle_event, AppState, Event};
//! use gardenia::domain::ResourceKind;
//! use gardenia::layers::DEFAULT_BASE_Z;
//! use gardenia::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), DEFAULT_BASE_Z);
//! let (should_render, actions) = handle_event(&mut state, &Event::OpenForm(ResourceKind::Plant))?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), gardenia::GardeniaError>(())
//! ```

use super::forms::{FieldTarget, FormStatus};
use super::layout;
use crate::api::{ApiRequest, ApiResponse};
use crate::app::{Action, AppState};
use crate::domain::{FieldKind, FieldValue, ResourceKind, Result};
use crate::layers::{LayerId, LayerKind, Point};
use crate::pickers::PickerKey;

/// Events triggered by user input, pointer clicks, or API responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Opens a blank form for a resource on top of the stack.
    OpenForm(ResourceKind),
    /// Focuses the next field of the top form.
    NextField,
    /// Focuses the previous field of the top form.
    PrevField,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// A typed character.
    Char(char),
    /// Deletes the last character, or clears a picked value.
    Backspace,
    /// Opens the focused field's picker, or confirms the picker on top.
    Enter,
    /// Submits the top form.
    Submit,
    /// Closes whatever is on top; hides the plugin when nothing is open.
    Escape,
    /// Opens a nested location form for the focused location field.
    NewLocation,
    /// Switches plant placement between manual and suggested.
    TogglePlacement,
    /// Reloads the location list.
    Refresh,

    /// Pointer-down at a cell of the plugin pane.
    Click {
        /// Zero-based line.
        line: usize,
        /// Zero-based column.
        col: usize,
    },

    /// Dismisses one layer; registered as the gate's close handler.
    DismissLayer(LayerId),

    /// Hides the plugin pane.
    CloseFocus,

    /// Result of the web access permission request.
    PermissionsResult {
        /// Whether web access was granted.
        granted: bool,
    },

    /// A decoded REST response.
    ApiResponse(ApiResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the UI needs re-rendering together with the actions to run,
/// in order. Screen geometry and the outside-click gate are brought up to date
/// before returning.
///
/// # Errors
///
/// Returns [`crate::GardeniaError::ProviderUnavailable`] if a form outlived
/// the layer provider.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let result = dispatch(state, event)?;
    state.relayout()?;
    Ok(result)
}

fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Click { line, col } => handle_click(state, Point::new(*col, *line)),
        Event::DismissLayer(id) => dismiss_layer(state, id.as_str()),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::OpenForm(resource) => {
            state.open_form(*resource, None)?;
            Ok((true, vec![]))
        }
        Event::Refresh => {
            tracing::debug!("reloading locations");
            Ok((false, vec![Action::SendRequest(ApiRequest::list_locations())]))
        }
        Event::PermissionsResult { granted } => {
            if *granted {
                tracing::debug!("web access granted, loading locations");
                Ok((false, vec![Action::SendRequest(ApiRequest::list_locations())]))
            } else {
                tracing::warn!("web access denied");
                state.status = Some(FormStatus::Error(
                    "Web access denied: forms cannot be saved".to_string(),
                ));
                Ok((true, vec![]))
            }
        }
        Event::ApiResponse(response) => handle_response(state, response),
        _ => handle_key(state, event),
    }
}

fn handle_key(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let snapshot = state.snapshot();
    let top_kind = snapshot.top().and_then(|top| snapshot.kind(top.as_str()));

    match (top_kind, state.top_form_index()) {
        (Some(LayerKind::Picker), Some(index)) => picker_key(state, index, event),
        (Some(LayerKind::Form), Some(index)) => form_key(state, index, event),
        _ => menu_key(state, event),
    }
}

fn picker_key(state: &mut AppState, index: usize, event: &Event) -> Result<(bool, Vec<Action>)> {
    let key = match event {
        Event::Up => PickerKey::Up,
        Event::Down => PickerKey::Down,
        Event::Left => PickerKey::Left,
        Event::Right => PickerKey::Right,
        Event::Enter => PickerKey::Enter,
        Event::Escape => PickerKey::Escape,
        Event::Backspace => PickerKey::Backspace,
        Event::Char(c) => PickerKey::Char(*c),
        _ => return Ok((false, vec![])),
    };

    let AppState { forms, session, .. } = state;
    let outcome = forms[index].forward_key(key, session)?;
    tracing::trace!(?key, ?outcome, "picker key handled");
    Ok((true, vec![]))
}

fn form_key(state: &mut AppState, index: usize, event: &Event) -> Result<(bool, Vec<Action>)> {
    let form = &mut state.forms[index];
    if form.is_submitting() && *event != Event::Escape {
        tracing::debug!(form_id = %form.id(), "form is saving, input ignored");
        return Ok((false, vec![]));
    }

    match event {
        Event::Down | Event::NextField => {
            form.focus_next();
            Ok((true, vec![]))
        }
        Event::Up | Event::PrevField => {
            form.focus_prev();
            Ok((true, vec![]))
        }
        Event::Char(c) => Ok((form.type_char(*c), vec![])),
        Event::Backspace => Ok((form.backspace(), vec![])),
        Event::Enter => {
            if form.focused_spec().is_some_and(|spec| spec.kind.has_picker()) {
                form.open_picker(&state.session, &state.locations)?;
            } else {
                form.focus_next();
            }
            Ok((true, vec![]))
        }
        Event::Submit => {
            let Some(body) = form.begin_submit(&state.session) else {
                return Ok((true, vec![]));
            };
            tracing::debug!(form_id = %form.id(), resource = %form.resource(), "submitting form");
            let request = ApiRequest::create(form.resource(), form.id().clone(), body);
            Ok((true, vec![Action::SendRequest(request)]))
        }
        Event::Escape => {
            let id = form.id().clone();
            state.close_form(id.as_str());
            Ok((true, vec![]))
        }
        Event::NewLocation => {
            if form.focused_spec().map(|spec| spec.kind) != Some(FieldKind::Location) {
                return Ok((false, vec![]));
            }
            let target = FieldTarget {
                form: form.id().clone(),
                field: form.focused(),
            };
            state.open_form(ResourceKind::Location, Some(target))?;
            Ok((true, vec![]))
        }
        Event::TogglePlacement => {
            let mode = state.session.toggle_placement();
            tracing::debug!(placement = mode.as_str(), "placement mode changed");
            Ok((true, vec![]))
        }
        _ => Ok((false, vec![])),
    }
}

fn menu_key(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Char('q') | Event::Escape => Ok((false, vec![Action::CloseFocus])),
        Event::Char('r') => dispatch(state, &Event::Refresh),
        Event::Char(c) => match ResourceKind::from_shortcut(*c) {
            Some(resource) => dispatch(state, &Event::OpenForm(resource)),
            None => Ok((false, vec![])),
        },
        _ => Ok((false, vec![])),
    }
}

fn handle_click(state: &mut AppState, point: Point) -> Result<(bool, Vec<Action>)> {
    let snapshot = state.snapshot();
    if let Some(dismissal) = state.gate.pointer_down(&snapshot, point) {
        tracing::debug!(layer_id = %dismissal.layer, x = point.x, y = point.y, "outside click");
        return dispatch(state, &dismissal.handler);
    }

    let top_is_form = snapshot
        .top()
        .is_some_and(|top| snapshot.kind(top.as_str()) == Some(LayerKind::Form));
    let Some(index) = state.top_form_index().filter(|_| top_is_form) else {
        return Ok((false, vec![]));
    };
    let Some(rect) = state.form_rect(index) else {
        return Ok((false, vec![]));
    };

    let form = &mut state.forms[index];
    match layout::field_at(rect, form.fields().len(), point) {
        Some(field) => Ok((form.focus(field), vec![])),
        None => Ok((false, vec![])),
    }
}

fn dismiss_layer(state: &mut AppState, id: &str) -> Result<(bool, Vec<Action>)> {
    if let Some(index) = state.picker_owner(id) {
        let closed = state.forms[index].close_picker()?;
        return Ok((closed, vec![]));
    }

    if state.form_index(id).is_some() {
        if !state.snapshot().is_top(id) {
            tracing::warn!(layer_id = %id, "dismissal of a layer that is not on top ignored");
            return Ok((false, vec![]));
        }
        state.close_form(id);
        return Ok((true, vec![]));
    }

    tracing::debug!(layer_id = %id, "dismissal of an unknown layer");
    Ok((false, vec![]))
}

fn handle_response(state: &mut AppState, response: &ApiResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        ApiResponse::LocationsLoaded { locations } => {
            state.locations = locations
                .iter()
                .map(|record| record.name.clone())
                .filter(|name| !name.is_empty())
                .collect();
            tracing::debug!(count = state.locations.len(), "locations loaded");
            Ok((true, vec![]))
        }
        ApiResponse::Created {
            resource,
            origin,
            record,
        } => {
            let name = record
                .as_ref()
                .map(|record| record.name.clone())
                .filter(|name| !name.is_empty())
                .or_else(|| {
                    state
                        .form_index(origin.as_str())
                        .and_then(|index| state.forms[index].name())
                });

            let Some(form) = state.close_form(origin.as_str()) else {
                tracing::debug!(form_id = %origin, "created record for a form that is gone");
                if let (ResourceKind::Location, Some(name)) = (resource, name) {
                    state.add_location(name);
                }
                return Ok((true, vec![]));
            };

            if *resource == ResourceKind::Location {
                if let Some(name) = &name {
                    state.add_location(name.clone());
                    if let Some(target) = form.target() {
                        state.fill_target(target, FieldValue::Location(name.clone()));
                    }
                }
            }
            drop(form);

            tracing::debug!(%resource, form_id = %origin, name = ?name, "record created");
            state.status = Some(FormStatus::Info(match name {
                Some(name) => format!("{} '{name}' saved", resource.label()),
                None => format!("{} saved", resource.label()),
            }));
            Ok((true, vec![]))
        }
        ApiResponse::Failed { origin, message } => {
            match origin.as_ref().and_then(|origin| state.form_index(origin.as_str())) {
                Some(index) => state.forms[index].fail_submit(message.clone()),
                None => state.status = Some(FormStatus::Error(message.clone())),
            }
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamedRecord;
    use crate::layers::DEFAULT_BASE_Z;
    use crate::ui::Theme;

    fn state() -> AppState {
        AppState::new(Theme::default(), DEFAULT_BASE_Z)
    }

    fn send(state: &mut AppState, events: &[Event]) -> Vec<Action> {
        events
            .iter()
            .flat_map(|event| handle_event(state, event).unwrap().1)
            .collect()
    }

    fn type_text(text: &str) -> Vec<Event> {
        text.chars().map(Event::Char).collect()
    }

    #[test]
    fn menu_shortcuts_open_forms_and_quit() {
        let mut state = state();
        assert_eq!(send(&mut state, &[Event::Char('x')]), vec![]);
        assert!(state.forms.is_empty());

        send(&mut state, &[Event::Char('z')]);
        assert_eq!(state.forms.len(), 1);
        assert_eq!(state.forms[0].resource(), ResourceKind::Zone);

        send(&mut state, &[Event::Escape]);
        assert!(state.forms.is_empty());
        assert_eq!(send(&mut state, &[Event::Escape]), vec![Action::CloseFocus]);
    }

    #[test]
    fn picker_keys_go_to_picker_until_it_closes() {
        let mut state = state();
        send(&mut state, &[Event::Char('z'), Event::Down, Event::Down, Event::Enter]);
        assert!(state.forms[0].picker_id().is_some());
        assert!(!state.forms[0].is_top());

        send(&mut state, &[Event::Escape]);
        assert!(state.forms[0].picker_id().is_none());
        assert!(state.forms[0].is_top());
        assert_eq!(state.forms[0].value(2), Some(&FieldValue::Empty));

        send(&mut state, &[Event::Escape]);
        assert!(state.forms.is_empty());
        assert!(state.provider().is_empty());
    }

    #[test]
    fn nested_location_fills_parent_field() {
        let mut state = state();
        let mut events = vec![Event::Char('p')];
        events.extend(type_text("Fern"));
        events.extend([Event::Down, Event::Down, Event::NewLocation]);
        events.extend(type_text("Orchard"));
        events.push(Event::Submit);
        let actions = send(&mut state, &events);

        assert_eq!(state.forms.len(), 2);
        let [Action::SendRequest(request)] = actions.as_slice() else {
            panic!("expected one request, got {actions:?}");
        };
        assert_eq!(request.resource(), ResourceKind::Location);
        let origin = request.origin().cloned().unwrap();
        assert_eq!(origin.as_str(), "locations-2");

        send(
            &mut state,
            &[Event::ApiResponse(ApiResponse::Created {
                resource: ResourceKind::Location,
                origin,
                record: Some(NamedRecord {
                    id: Some(serde_json::json!(7)),
                    name: "Orchard".to_string(),
                }),
            })],
        );

        assert_eq!(state.forms.len(), 1);
        let plant = &state.forms[0];
        assert!(plant.is_top());
        assert_eq!(plant.focused(), 2);
        assert_eq!(plant.value(2), Some(&FieldValue::Location("Orchard".into())));
        assert_eq!(state.locations, vec!["Orchard".to_string()]);
        assert_eq!(state.status, Some(FormStatus::Info("Location 'Orchard' saved".into())));
    }

    #[test]
    fn outside_click_dismisses_only_the_top_form() {
        let mut state = state();
        send(&mut state, &[Event::Char('p'), Event::Down, Event::Down, Event::NewLocation]);
        assert_eq!(state.forms.len(), 2);

        // Parent form only: another layer's surface, not outside.
        send(&mut state, &[Event::Click { line: 3, col: 3 }]);
        assert_eq!(state.forms.len(), 2);

        send(&mut state, &[Event::Click { line: 18, col: 70 }]);
        assert_eq!(state.forms.len(), 1);
        assert!(state.forms[0].is_top());
    }

    #[test]
    fn outside_click_closes_picker_before_form() {
        let mut state = state();
        send(&mut state, &[Event::Char('z'), Event::Down, Event::Down, Event::Down, Event::Enter]);
        assert!(state.forms[0].picker_id().is_some());

        send(&mut state, &[Event::Click { line: 20, col: 0 }]);
        assert_eq!(state.forms.len(), 1);
        assert!(state.forms[0].picker_id().is_none());
        assert!(state.forms[0].is_top());
    }

    #[test]
    fn dismissing_a_background_form_is_ignored() {
        let mut state = state();
        send(&mut state, &[Event::Char('p'), Event::Char('x')]);
        let plant = state.forms[0].id().clone();
        send(&mut state, &[Event::Down, Event::Down, Event::NewLocation]);

        let (render, _) = handle_event(&mut state, &Event::DismissLayer(plant)).unwrap();
        assert!(!render);
        assert_eq!(state.forms.len(), 2);
    }

    #[test]
    fn failed_submit_reopens_form_for_editing() {
        let mut state = state();
        let mut events = vec![Event::Char('l')];
        events.extend(type_text("Shed"));
        events.push(Event::Submit);
        let actions = send(&mut state, &events);
        let origin = match &actions[..] {
            [Action::SendRequest(request)] => request.origin().cloned(),
            other => panic!("unexpected {other:?}"),
        };

        send(&mut state, &[Event::Char('!')]);
        assert_eq!(state.forms[0].name().as_deref(), Some("Shed"));

        send(
            &mut state,
            &[Event::ApiResponse(ApiResponse::Failed {
                origin,
                message: "API error (409): duplicate".to_string(),
            })],
        );
        let form = &state.forms[0];
        assert!(!form.is_submitting());
        assert_eq!(form.status(), Some(&FormStatus::Error("API error (409): duplicate".into())));
    }

    #[test]
    fn permission_grant_loads_locations() {
        let mut state = state();
        let actions = send(&mut state, &[Event::PermissionsResult { granted: true }]);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendRequest(ApiRequest::ListLocations { .. })]
        ));

        send(
            &mut state,
            &[Event::ApiResponse(ApiResponse::LocationsLoaded {
                locations: vec![NamedRecord {
                    id: None,
                    name: "Greenhouse".to_string(),
                }],
            })],
        );
        assert_eq!(state.locations, vec!["Greenhouse".to_string()]);
    }
}
