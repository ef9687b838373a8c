use gardenia::layers::{LayerKind, LayerProvider, OutsideClickGate, Point, Rect};

const FAR_AWAY: Point = Point::new(79, 23);

fn gate_for(provider: &LayerProvider<()>, surfaces: &[(&str, Rect)]) -> OutsideClickGate<String> {
    let mut gate = OutsideClickGate::new();
    for (id, rect) in surfaces {
        gate.set_surface(*id, *rect, format!("close {id}"));
    }
    gate.sync(&provider.snapshot());
    gate
}

#[test]
fn only_the_top_layer_is_ever_dismissed() {
    let provider: LayerProvider<()> = LayerProvider::new();
    provider.register("plants-1", LayerKind::Form);
    provider.register("locations-2", LayerKind::Form);
    provider.register("locations-2/name", LayerKind::Picker);

    let mut gate = gate_for(
        &provider,
        &[
            ("plants-1", Rect::new(0, 2, 40, 10)),
            ("locations-2", Rect::new(4, 5, 40, 10)),
            ("locations-2/name", Rect::new(50, 2, 20, 6)),
        ],
    );

    let mut dismissed = Vec::new();
    while let Some(dismissal) = gate.pointer_down(&provider.snapshot(), FAR_AWAY) {
        assert!(provider.is_top(dismissal.layer.as_str()));
        dismissed.push(dismissal.handler);
        provider.unregister(dismissal.layer.as_str());
        gate.sync(&provider.snapshot());
    }

    assert_eq!(dismissed, vec!["close locations-2/name", "close locations-2", "close plants-1"]);
    assert!(provider.is_empty());
    assert!(gate.attached().is_none());
}

#[test]
fn click_on_a_portal_picker_outside_its_form_keeps_everything_open() {
    let provider: LayerProvider<()> = LayerProvider::new();
    provider.register("zones-1", LayerKind::Form);
    provider.register("zones-1/start_time", LayerKind::Picker);
    let gate = gate_for(
        &provider,
        &[
            ("zones-1", Rect::new(0, 2, 40, 10)),
            ("zones-1/start_time", Rect::new(50, 2, 14, 7)),
        ],
    );

    let snapshot = provider.snapshot();
    assert!(gate.pointer_down(&snapshot, Point::new(55, 4)).is_none());
    // The form below the picker is another active surface, not outside.
    assert!(gate.pointer_down(&snapshot, Point::new(10, 5)).is_none());
}

#[test]
fn background_form_handler_never_fires() {
    let provider: LayerProvider<()> = LayerProvider::new();
    provider.register("plants-1", LayerKind::Form);
    provider.register("locations-2", LayerKind::Form);
    let gate = gate_for(
        &provider,
        &[
            ("plants-1", Rect::new(0, 2, 30, 8)),
            ("locations-2", Rect::new(40, 2, 30, 8)),
        ],
    );

    // Outside the background form but inside the top one.
    let snapshot = provider.snapshot();
    assert!(gate.pointer_down(&snapshot, Point::new(45, 4)).is_none());

    let dismissal = gate.pointer_down(&snapshot, Point::new(0, 20)).unwrap();
    assert_eq!(dismissal.handler, "close locations-2");
}

#[test]
fn stale_gate_waits_for_sync() {
    let provider: LayerProvider<()> = LayerProvider::new();
    provider.register("plants-1", LayerKind::Form);
    let mut gate = gate_for(&provider, &[("plants-1", Rect::new(0, 2, 30, 8))]);

    provider.register("schedules-2", LayerKind::Form);
    assert!(gate.pointer_down(&provider.snapshot(), FAR_AWAY).is_none());

    // Synced but the new top has not been laid out yet.
    gate.sync(&provider.snapshot());
    assert!(gate.pointer_down(&provider.snapshot(), FAR_AWAY).is_none());

    gate.set_surface("schedules-2", Rect::new(2, 3, 30, 8), "close schedules-2".to_string());
    let dismissal = gate.pointer_down(&provider.snapshot(), FAR_AWAY).unwrap();
    assert_eq!(dismissal.layer.as_str(), "schedules-2");
}
