use pretty_assertions::assert_eq;
use sheen_core::events::event_types;
use sheen_core::{Color, Event, PseudoState, WidgetId, WidgetSpec};
use sheen_style::{
    EngineConfig, ParseErrorKind, PropertyId, RecordingSink, Scope, SinkCall, StyleEngine,
    StyleTarget, TypeDefaults, UnsupportedPropertyPolicy, Value,
};

fn engine() -> StyleEngine<RecordingSink> {
    StyleEngine::new(EngineConfig::default(), RecordingSink::new())
}

fn color_of(engine: &StyleEngine<RecordingSink>, node: WidgetId, property: PropertyId) -> Option<Color> {
    engine.computed(node).and_then(|map| map.color(&property))
}

#[test]
fn hover_switches_color_and_back() {
    let mut engine = engine();
    engine
        .set_stylesheet(
            Scope::Global,
            "Button { color: red; } Button:hover { color: blue; }",
        )
        .unwrap();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::RED));

    engine.sink_mut().clear();
    assert!(engine.set_state(button, PseudoState::Hover, true).unwrap());
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::BLUE));
    assert_eq!(
        engine.sink().calls(),
        &[
            SinkCall::Set {
                target: StyleTarget::body(button),
                property: PropertyId::Color,
                value: Value::Color(Color::BLUE),
            },
            SinkCall::Repaint(button),
        ]
    );

    engine.set_state(button, PseudoState::Hover, false).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::RED));
}

#[test]
fn id_selector_wins_in_both_registration_orders() {
    for css in [
        "#specialButton { background: green; } Button { background: blue; }",
        "Button { background: blue; } #specialButton { background: green; }",
    ] {
        let mut engine = engine();
        engine.set_stylesheet(Scope::Global, css).unwrap();
        let button = engine
            .create_widget(WidgetSpec::new("Button").id("specialButton"))
            .unwrap();
        assert_eq!(
            color_of(&engine, button, PropertyId::Background),
            Some(Color::GREEN),
            "{css}"
        );
    }
}

#[test]
fn equal_specificity_later_registration_wins() {
    let mut engine = engine();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    engine
        .add_stylesheet(Scope::Global, "Button { color: red; }")
        .unwrap();
    engine
        .add_stylesheet(Scope::Global, "Button { color: blue; }")
        .unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::BLUE));
}

#[test]
fn resolve_is_idempotent() {
    let mut engine = engine();
    engine
        .set_stylesheet(
            Scope::Global,
            "* { font-size: 10pt; } Button { padding: 2px 4px; color: #333; } Button:hover { color: #555; }",
        )
        .unwrap();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();

    let first = engine.resolve(button).unwrap();
    let second = engine.resolve(button).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(engine.computed(button), Some(&first));
}

#[test]
fn state_round_trip_restores_exact_map() {
    let mut engine = engine();
    engine
        .set_stylesheet(
            Scope::Global,
            r#"
            Button { color: red; border: 1px solid gray; }
            Button:pressed { color: white; background: navy; }
            Button:hover:pressed { border-color: black; }
            "#,
        )
        .unwrap();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    let before = engine.resolve(button).unwrap();

    engine
        .update_states(button, |s| {
            s.set(PseudoState::Hover, true);
            s.set(PseudoState::Pressed, true);
        })
        .unwrap();
    assert_ne!(engine.resolve(button).unwrap(), before);

    engine
        .update_states(button, |s| {
            s.set(PseudoState::Hover, false);
            s.set(PseudoState::Pressed, false);
        })
        .unwrap();
    assert_eq!(engine.resolve(button).unwrap(), before);
    assert_eq!(engine.computed(button), Some(&before));
}

#[test]
fn malformed_rule_is_skipped() {
    let mut engine = engine();
    let diagnostics = engine
        .set_stylesheet(
            Scope::Global,
            "Label { color: red; }\nButton{{bad}}\nFrame { color: blue; }",
        )
        .unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ParseErrorKind::Syntax);
    assert_eq!(diagnostics[0].line, 2);
    assert_eq!(engine.store().len(), 2);

    let frame = engine.create_widget(WidgetSpec::new("Frame")).unwrap();
    assert_eq!(color_of(&engine, frame, PropertyId::Color), Some(Color::BLUE));
}

#[test]
fn higher_scope_wins_and_lower_scope_fills() {
    let mut engine = engine();
    let window = engine.create_widget(WidgetSpec::new("QMainWindow")).unwrap();
    let button = engine
        .create_widget(WidgetSpec::new("Button").id("ok").parent(window))
        .unwrap();

    engine
        .set_stylesheet(Scope::Global, "Button#ok { color: red; padding: 3px; }")
        .unwrap();
    engine
        .set_stylesheet(Scope::Window(window), "Button { color: green; margin: 1px; }")
        .unwrap();
    engine.set_widget_stylesheet(button, "color: blue;").unwrap();

    let computed = engine.computed(button).unwrap();
    assert_eq!(computed.color(&PropertyId::Color), Some(Color::BLUE));
    assert_eq!(computed.get(&PropertyId::Padding).map(Value::to_string), Some("3px".into()));
    assert_eq!(computed.get(&PropertyId::Margin).map(Value::to_string), Some("1px".into()));

    engine.clear_scope(Scope::Widget(button)).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::GREEN));
}

#[test]
fn removed_property_resets_to_default_with_one_repaint() {
    let mut engine = StyleEngine::new(EngineConfig::default(), RecordingSink::new())
        .with_defaults(TypeDefaults::new().with(
            "Button",
            PropertyId::Background,
            Value::Color(Color::from_hex(0xF0F0F0)),
        ));
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    engine
        .set_stylesheet(Scope::Global, "Button { background: blue; color: white; }")
        .unwrap();
    engine.sink_mut().clear();

    engine
        .set_stylesheet(Scope::Global, "Button { color: white; }")
        .unwrap();
    assert_eq!(
        engine.sink().sets(),
        vec![("background".to_string(), "#f0f0f0".to_string())]
    );
    assert_eq!(engine.sink().repaints(), vec![button]);
}

#[test]
fn net_zero_batch_requests_nothing() {
    let mut engine = engine();
    engine
        .set_stylesheet(Scope::Global, "Button:hover { color: blue; }")
        .unwrap();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    engine.sink_mut().clear();

    engine
        .update_states(button, |s| {
            s.set(PseudoState::Hover, true);
            s.set(PseudoState::Hover, false);
        })
        .unwrap();
    assert!(engine.sink().calls().is_empty());

    // Setting an active state again is a no-op
    engine.set_state(button, PseudoState::Hover, true).unwrap();
    engine.sink_mut().clear();
    assert!(!engine.set_state(button, PseudoState::Hover, true).unwrap());
    assert!(engine.sink().calls().is_empty());
}

#[test]
fn disabled_masks_hover_until_reenabled() {
    let mut engine = engine();
    engine
        .set_stylesheet(
            Scope::Global,
            "Button { color: red; } Button:hover { color: blue; } Button:disabled { background: gray; }",
        )
        .unwrap();
    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();

    engine.handle_event(&Event::new(event_types::POINTER_ENTER, button)).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::BLUE));

    engine.handle_event(&Event::enabled(button, false)).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::RED));
    assert!(engine.computed(button).unwrap().contains(&PropertyId::Background));

    engine.handle_event(&Event::enabled(button, true)).unwrap();
    assert_eq!(color_of(&engine, button, PropertyId::Color), Some(Color::BLUE));
}

#[test]
fn ancestor_state_restyles_descendants() {
    let mut engine = engine();
    engine
        .set_stylesheet(Scope::Global, "QFrame:hover > QLabel { color: blue; }")
        .unwrap();
    let frame = engine.create_widget(WidgetSpec::new("QFrame")).unwrap();
    let label = engine
        .create_widget(WidgetSpec::new("QLabel").parent(frame))
        .unwrap();
    assert!(engine.computed(label).is_none());

    engine.set_state(frame, PseudoState::Hover, true).unwrap();
    assert_eq!(color_of(&engine, label, PropertyId::Color), Some(Color::BLUE));
    assert_eq!(engine.sink().repaints(), vec![label]);
}

#[test]
fn subcontrol_follows_toggle() {
    let mut engine = engine();
    engine
        .set_stylesheet(
            Scope::Global,
            r#"
            QCheckBox::indicator { width: 16px; }
            QCheckBox::indicator:checked { image: url(:/check.png); }
            "#,
        )
        .unwrap();
    let check = engine.create_widget(WidgetSpec::new("QCheckBox")).unwrap();
    assert!(engine.computed(check).is_none());
    assert_eq!(engine.computed_part(check, "indicator").unwrap().len(), 1);

    engine.handle_event(&Event::toggle(check, None)).unwrap();
    let indicator = engine.computed_part(check, "indicator").unwrap();
    assert_eq!(
        indicator.get(&PropertyId::Image).map(Value::to_string),
        Some("url(:/check.png)".to_string())
    );

    engine.sink_mut().clear();
    engine.handle_event(&Event::toggle(check, None)).unwrap();
    assert_eq!(
        engine.sink().sets(),
        vec![("image".to_string(), "none".to_string())]
    );
}

#[test]
fn pass_through_policy_reaches_sink() {
    let config = EngineConfig {
        unsupported_properties: UnsupportedPropertyPolicy::PassThrough,
        ..EngineConfig::default()
    };
    let mut engine = StyleEngine::new(config, RecordingSink::new());
    let diagnostics = engine
        .set_stylesheet(Scope::Global, "Button { box-shadow: 0 2px 4px black; }")
        .unwrap();
    assert!(diagnostics.is_empty());

    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    assert_eq!(
        engine.sink().sets(),
        vec![("box-shadow".to_string(), "0 2px 4px black".to_string())]
    );
    assert_eq!(engine.sink().repaints(), vec![button]);
}

#[test]
fn unsupported_property_warns_by_default() {
    let mut engine = engine();
    let diagnostics = engine
        .set_stylesheet(Scope::Global, "Button { transition: all 0.2s; color: red; }")
        .unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ParseErrorKind::UnsupportedProperty);
    assert!(!diagnostics[0].is_error());

    let button = engine.create_widget(WidgetSpec::new("Button")).unwrap();
    assert_eq!(engine.computed(button).unwrap().len(), 1);
}
