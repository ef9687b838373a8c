use chrono::NaiveTime;
use gardenia::app::FormStatus;
use gardenia::domain::{FieldValue, RunDuration};
use gardenia::layers::{LayerKind, RenderMode};
use gardenia::ui::LayerBody;
use gardenia::{handle_event, initialize, Action, ApiRequest, ApiResponse, AppState, Config, Event, ResourceKind};
use serde_json::json;

fn state() -> AppState {
    initialize(&Config::default())
}

fn send(state: &mut AppState, events: &[Event]) -> Vec<Action> {
    events
        .iter()
        .flat_map(|event| handle_event(state, event).unwrap().1)
        .collect()
}

fn chars(text: &str) -> Vec<Event> {
    text.chars().map(Event::Char).collect()
}

#[test]
fn schedule_is_filled_through_pickers_and_saved() {
    let mut state = state();
    let mut events = vec![Event::OpenForm(ResourceKind::Schedule)];
    events.extend(chars("North bed"));
    events.extend([Event::NextField, Event::Enter]);
    send(&mut state, &events);

    let form_id = state.forms[0].id().clone();
    let picker_id = state.forms[0].picker_id().cloned().unwrap();
    let snapshot = state.snapshot();
    assert_eq!(snapshot.kind(picker_id.as_str()), Some(LayerKind::Picker));
    assert_eq!(snapshot.depth(picker_id.as_str()), Some(1));
    assert!(state.provider().is_any_above(form_id.as_str()));
    assert_eq!(state.forms[0].render_mode(), RenderMode::Background);

    // Digits go to the time picker, which closes on the fourth.
    send(&mut state, &chars("0630"));
    assert!(state.forms[0].picker_id().is_none());
    assert!(state.forms[0].is_top());
    assert_eq!(
        state.forms[0].value(1),
        NaiveTime::from_hms_opt(6, 30, 0).map(FieldValue::Time).as_ref()
    );
    assert!(!state.snapshot().contains(picker_id.as_str()));

    send(&mut state, &[Event::NextField, Event::Enter, Event::Down, Event::Enter]);
    assert_eq!(state.forms[0].value(2), Some(&FieldValue::Duration(RunDuration(20))));
    assert_eq!(state.provider().len(), 1);

    let actions = send(&mut state, &[Event::Submit]);
    let [Action::SendRequest(ApiRequest::Create { resource, origin, body, .. })] = actions.as_slice() else {
        panic!("expected a create request, got {actions:?}");
    };
    assert_eq!(*resource, ResourceKind::Schedule);
    assert_eq!(*origin, form_id);
    assert_eq!(body, &json!({ "zone": "North bed", "start_time": "06:30", "run_minutes": 20 }));
    assert!(state.forms[0].is_submitting());

    // Typing while the request is in flight changes nothing.
    send(&mut state, &chars("x"));
    assert_eq!(state.forms[0].value(0), Some(&FieldValue::Text("North bed".into())));

    send(
        &mut state,
        &[Event::ApiResponse(ApiResponse::Created {
            resource: ResourceKind::Schedule,
            origin: form_id,
            record: None,
        })],
    );
    assert!(state.forms.is_empty());
    assert!(state.provider().is_empty());
    assert_eq!(state.status, Some(FormStatus::Info("Schedule saved".into())));
}

#[test]
fn missing_required_fields_block_submit() {
    let mut state = state();
    let actions = send(&mut state, &[Event::OpenForm(ResourceKind::Zone), Event::Submit]);
    assert!(actions.is_empty());

    let status = state.forms[0].status().cloned().unwrap();
    assert!(status.is_error());
    assert!(status.text().starts_with("Missing: Name"));
}

#[test]
fn view_model_follows_the_stack() {
    let mut state = state();
    send(
        &mut state,
        &[
            Event::OpenForm(ResourceKind::Plant),
            Event::NextField,
            Event::NextField,
            Event::NewLocation,
        ],
    );
    send(&mut state, &chars("Shed"));

    let view = state.compute_viewmodel();
    let summary: Vec<(&str, RenderMode)> = view.layers.iter().map(|layer| (layer.title.as_str(), layer.mode)).collect();
    assert_eq!(
        summary,
        vec![
            ("New Plant", RenderMode::Background),
            ("New Location (for plants-1)", RenderMode::Active),
        ]
    );
    assert!(view.empty_state.is_none());
    assert_eq!(view.layers[1].z_index, view.layers[0].z_index + 1);

    let LayerBody::Form(location) = &view.layers[1].body else {
        panic!("expected a form body");
    };
    assert_eq!(location.fields[0].value, "Shed");
    assert!(location.fields[0].is_focused);
    assert!(location.fields[0].is_required);

    send(&mut state, &[Event::Escape, Event::Escape]);
    let view = state.compute_viewmodel();
    assert!(view.layers.is_empty());
    assert!(view.empty_state.is_some());
}

#[test]
fn failed_request_without_form_reports_on_the_app() {
    let mut state = state();
    send(
        &mut state,
        &[Event::ApiResponse(ApiResponse::Failed {
            origin: None,
            message: "API error (503): controller offline".into(),
        })],
    );
    assert_eq!(
        state.status,
        Some(FormStatus::Error("API error (503): controller offline".into()))
    );

    let view = state.compute_viewmodel();
    let footer_status = view.footer.status.unwrap();
    assert!(footer_status.is_error);
}
