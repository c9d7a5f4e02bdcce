use escapeview_app::{driver, EventOutcome, InputEvent, KeyCommand, Preferences, RenderMode};

fn small_prefs() -> Preferences {
    Preferences::from_json(r#"{"width": 96, "height": 64, "max_iterations": 64}"#).unwrap()
}

#[test]
fn scripted_session_round_trips_through_undo() {
    let prefs = small_prefs();
    let mut explorer = driver::build_explorer(&prefs).unwrap();
    let home = *explorer.controller().viewport();

    let events: Vec<InputEvent> = serde_json::from_str(
        r#"[
            {"event": "pointer_move", "x": 40, "y": 30},
            {"event": "drag_start", "x": 20, "y": 10},
            {"event": "drag_update", "x": 60, "y": 40},
            {"event": "drag_end", "x": 60, "y": 40},
            {"event": "double_click", "x": 48, "y": 32},
            {"event": "wheel", "x": 48, "y": 32, "direction": "in"},
            {"event": "key", "command": "undo"},
            {"event": "key", "command": "undo"},
            {"event": "key", "command": "undo"}
        ]"#,
    )
    .unwrap();
    let outcomes = driver::replay(&mut explorer, &events);

    assert_eq!(outcomes[3], EventOutcome::ViewChanged);
    assert_eq!(outcomes[8], EventOutcome::NothingToUndo);
    assert_eq!(*explorer.controller().viewport(), home);
}

#[test]
fn reset_restores_home_after_navigation() {
    let prefs = small_prefs();
    let mut explorer = driver::build_explorer(&prefs).unwrap();
    let home = *explorer.controller().viewport();

    explorer.handle(InputEvent::DoubleClick { x: 5.0, y: 5.0 });
    explorer.handle(InputEvent::Key { command: KeyCommand::IncreaseIterations });
    explorer.handle(InputEvent::Key { command: KeyCommand::Reset });
    explorer.handle(InputEvent::Key { command: KeyCommand::Reset });

    let controller = explorer.controller();
    assert_eq!(*controller.viewport(), home);
    assert_eq!(controller.params().max_iterations, 64);
    assert_eq!(controller.history_len(), 0);
}

#[test]
fn escape_time_frame_is_written() {
    let prefs = small_prefs();
    let mut explorer = driver::build_explorer(&prefs).unwrap();
    let dir = std::env::temp_dir().join("escapeview_session_escape");
    let _ = std::fs::create_dir_all(&dir);
    let out = dir.join("frame.png");

    driver::write_frame(&mut explorer, &prefs, &out).unwrap();
    assert!(out.exists());
    assert_eq!(explorer.controller().render_stats().renders, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_device_in_preferences_still_writes_a_frame() {
    let prefs =
        Preferences::from_json(r#"{"width": 0, "height": 0, "max_iterations": 32}"#).unwrap();
    let mut explorer = driver::build_explorer(&prefs).unwrap();
    let dir = std::env::temp_dir().join("escapeview_session_empty_device");
    let _ = std::fs::create_dir_all(&dir);
    let out = dir.join("frame.png");

    driver::write_frame(&mut explorer, &prefs, &out).unwrap();
    assert!(out.exists());
    assert_eq!(explorer.controller().device_size(), (960, 540));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inverse_iteration_frame_is_written() {
    let mut prefs = Preferences::from_json(
        r#"{
            "width": 80,
            "height": 80,
            "render_mode": "inverse-iteration",
            "inverse": {"c": {"re": -0.39, "im": -0.58}, "max_depth": 10}
        }"#,
    )
    .unwrap();
    assert_eq!(prefs.render_mode, RenderMode::InverseIteration);
    prefs.region = Some(escapeview_core::Viewport::JULIA);

    let mut explorer = driver::build_explorer(&prefs).unwrap();
    let dir = std::env::temp_dir().join("escapeview_session_inverse");
    let _ = std::fs::create_dir_all(&dir);
    let out = dir.join("inverse.png");

    driver::write_frame(&mut explorer, &prefs, &out).unwrap();
    assert!(out.exists());
    // Inverse mode never runs the escape-time fill.
    assert_eq!(explorer.controller().render_stats().renders, 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_script_is_an_error() {
    let dir = std::env::temp_dir().join("escapeview_session_bad_script");
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("events.json");
    std::fs::write(&path, r#"[{"event": "teleport"}]"#).unwrap();

    let err = driver::load_events(&path).unwrap_err();
    assert!(matches!(err, escapeview_app::AppError::Json(_)));

    let missing = driver::load_events(&dir.join("missing.json")).unwrap_err();
    assert!(matches!(missing, escapeview_app::AppError::Io { .. }));

    let _ = std::fs::remove_dir_all(&dir);
}
