use gardenia::layers::{LayerId, LayerKind, LayerProvider, RenderMode};
use gardenia::GardeniaError;

/// Small deterministic generator so the sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

const IDS: [&str; 6] = ["plants-1", "zones-2", "zones-2/start_time", "locations-3", "a", "b"];

fn assert_matches_model(provider: &LayerProvider<()>, model: &[&str]) {
    let listed: Vec<String> = provider.list().iter().map(ToString::to_string).collect();
    assert_eq!(listed, model);

    for id in IDS {
        match model.iter().position(|active| *active == id) {
            Some(depth) => {
                let top = depth + 1 == model.len();
                assert_eq!(provider.depth(id), Some(depth), "depth of {id}");
                assert_eq!(provider.is_top(id), top, "is_top of {id}");
                assert_eq!(provider.is_any_above(id), !top, "is_any_above of {id}");
                assert_eq!(provider.z_index(id), Some(provider.base_z() + depth as u32));
            }
            None => {
                assert_eq!(provider.depth(id), None);
                assert!(!provider.is_top(id));
                assert!(!provider.is_any_above(id));
                assert_eq!(provider.z_index(id), None);
            }
        }
    }

    let z: Vec<u32> = model.iter().filter_map(|id| provider.z_index(id)).collect();
    assert!(z.windows(2).all(|pair| pair[0] < pair[1]), "z-indices not increasing: {z:?}");
}

#[test]
fn random_sequences_agree_with_ordered_model() {
    for seed in 1..=20 {
        let provider: LayerProvider<()> = LayerProvider::with_base_z(500);
        let mut model: Vec<&str> = Vec::new();
        let mut rng = Lcg(seed);

        for _ in 0..200 {
            let id = IDS[(rng.next() % IDS.len() as u64) as usize];
            if rng.next() % 2 == 0 {
                let added = provider.register(id, LayerKind::Form);
                assert_eq!(added, !model.contains(&id));
                if added {
                    model.push(id);
                }
            } else {
                let removed = provider.unregister(id);
                assert_eq!(removed, model.contains(&id));
                model.retain(|active| *active != id);
            }
            assert_matches_model(&provider, &model);
        }
    }
}

#[test]
fn registering_twice_is_idempotent() {
    let provider: LayerProvider<()> = LayerProvider::new();
    provider.register("a", LayerKind::Form);
    provider.register("b", LayerKind::Form);
    let revision = provider.revision();

    assert!(!provider.register("b", LayerKind::Form));
    assert!(!provider.register("a", LayerKind::Form));
    assert_eq!(provider.len(), 2);
    assert_eq!(provider.top().as_ref().map(|id| id.as_str()), Some("b"));
    assert_eq!(provider.revision(), revision);
}

#[test]
fn scenario_three_forms_unwinding() {
    let provider: LayerProvider<()> = LayerProvider::new();
    for id in ["A", "B", "C"] {
        provider.register(id, LayerKind::Form);
    }
    assert!(provider.is_top("C"));
    assert_eq!(provider.depth("B"), Some(1));
    assert!(provider.is_any_above("A"));

    provider.unregister("C");
    assert!(provider.is_top("B"));

    provider.unregister("A");
    assert_eq!(provider.list(), vec![LayerId::from("B")]);
    assert!(provider.is_top("B"));
    assert_eq!(provider.depth("B"), Some(0));
}

#[test]
fn scenario_picker_above_form() {
    let provider: LayerProvider<&'static str> = LayerProvider::new();
    let scope = provider.scope();
    let form = scope.bind("zones-1", LayerKind::Form).unwrap();
    assert_eq!(form.depth(), Some(0));

    let z = scope.add_layer("picker-1", LayerKind::Picker, "zones-1", "time").unwrap();
    assert_eq!(provider.depth("picker-1"), Some(1));
    assert_eq!(z, provider.z_index("picker-1"));
    assert!(!form.is_top());
    assert_eq!(form.render_mode(), RenderMode::Background);

    assert_eq!(scope.remove_layer("picker-1").unwrap(), Some("time"));
    assert!(form.is_top());
    assert_eq!(form.render_mode(), RenderMode::Active);
    assert_eq!(scope.remove_layer("picker-1").unwrap(), None);
}

#[test]
fn bindings_release_on_drop_in_any_order() {
    let provider: LayerProvider<()> = LayerProvider::new();
    let scope = provider.scope();
    let plant = scope.bind("plants-1", LayerKind::Form).unwrap();
    let location = scope.bind("locations-2", LayerKind::Form).unwrap();
    let schedule = scope.bind("schedules-3", LayerKind::Form).unwrap();

    drop(location);
    assert_eq!(plant.depth(), Some(0));
    assert_eq!(schedule.depth(), Some(1));
    assert!(schedule.is_top());

    drop(schedule);
    assert!(plant.is_top());
    drop(plant);
    assert!(provider.is_empty());
}

#[test]
fn scope_outlives_provider() {
    let provider: LayerProvider<()> = LayerProvider::new();
    let scope = provider.scope();
    let binding = scope.bind("plants-1", LayerKind::Form).unwrap();

    provider.unmount();
    assert!(matches!(scope.bind("zones-2", LayerKind::Form), Err(GardeniaError::ProviderUnavailable)));
    assert!(matches!(scope.snapshot(), Err(GardeniaError::ProviderUnavailable)));
    assert!(!binding.is_top());
    assert_eq!(binding.depth(), None);
    drop(binding);
}

#[test]
fn snapshot_reports_kinds_in_stack_order() {
    let provider: LayerProvider<u8> = LayerProvider::new();
    let scope = provider.scope();
    let _form = scope.bind("zones-1", LayerKind::Form).unwrap();
    scope.add_layer("zones-1/run_minutes", LayerKind::Picker, "zones-1", 1).unwrap();

    let snapshot = provider.snapshot();
    let entries: Vec<(String, LayerKind)> = snapshot.iter().map(|(id, kind)| (id.to_string(), kind)).collect();
    assert_eq!(
        entries,
        vec![
            ("zones-1".to_string(), LayerKind::Form),
            ("zones-1/run_minutes".to_string(), LayerKind::Picker),
        ]
    );

    scope.remove_layer("zones-1/run_minutes").unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.revision() < provider.revision());
}
