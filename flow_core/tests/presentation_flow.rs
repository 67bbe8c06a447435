// End-to-end walk through the data-flow presentation via the public API.

use flow_core::{
    Flavor, FlowError, LayoutDescriptor, NavigationEvent, Presentation, PresentationConfig,
    SceneObjectId, Side,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

const TWO_STEP_CONFIG: &str = r#"{
    "scenes": [
        { "label": "profile", "objects": {
            "input_form": { "x": 0, "y": 0, "opacity": 1, "scale": 1.1, "z_index": 10, "visible": true },
            "decomp_tasks": { "x": 500, "y": -200, "scale": 0.5 },
            "decomp_skills": { "x": 500, "y": 200, "scale": 0.5 }
        } },
        { "label": "decomposition", "objects": {
            "input_form": { "x": -600, "opacity": 1, "scale": 0.8, "z_index": 5, "visible": true },
            "decomp_tasks": { "x": 100, "y": -250, "opacity": 1, "scale": 1.1, "z_index": 10, "visible": true },
            "decomp_skills": { "x": 100, "y": 250, "opacity": 1, "scale": 1.1, "z_index": 10, "visible": true }
        } }
    ],
    "anchors": { "widths": { "input_form": 700, "decomp_tasks": 500, "decomp_skills": 500 } },
    "edges": [
        { "step": 0, "kind": "link",
          "from": { "object": "input_form", "side": "right" },
          "to": { "object": "decomp_tasks", "side": "left" } },
        { "step": 0, "kind": "link",
          "from": { "object": "input_form", "side": "right" },
          "to": { "object": "decomp_skills", "side": "left" } },
        { "step": 1, "kind": "link",
          "from": { "object": "input_form", "side": "right" },
          "to": { "object": "decomp_tasks", "side": "left" } },
        { "step": 1, "kind": "link",
          "from": { "object": "input_form", "side": "right" },
          "to": { "object": "decomp_skills", "side": "left" } }
    ],
    "viewport": { "width": 1600, "height": 900 }
}"#;

#[test]
fn walk_the_showcase_forward_and_back() {
    init_tracing();
    let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
    let expected_edges = [0, 0, 0, 2, 8, 4, 2, 0];

    for (step, expected) in expected_edges.iter().enumerate() {
        let frame = presentation.frame().unwrap();
        assert_eq!(frame.step, step);
        assert_eq!(frame.edges.len(), *expected, "edges at step {step}");
        assert_eq!(frame.layouts.len(), SceneObjectId::ALL.len());
        for edge in &frame.edges {
            assert!(edge.active);
        }
        presentation.advance();
    }
    assert_eq!(presentation.step(), 7);

    while presentation.retreat() {}
    assert_eq!(presentation.step(), 0);
}

#[test]
fn decomposition_edges_wait_for_visible_targets() {
    init_tracing();
    let mut presentation = Presentation::from_json(TWO_STEP_CONFIG).unwrap();
    assert_eq!(presentation.origin().x, 800.0);

    // Targets are parked and invisible on the profile step.
    assert!(presentation.edges().unwrap().is_empty());

    presentation.navigate(NavigationEvent::Next).unwrap();
    let layouts = presentation.layouts().unwrap();
    let start = presentation
        .engine()
        .anchor_of(SceneObjectId::InputForm, Side::Right, &layouts, presentation.origin())
        .unwrap();
    // 800 - 600 + 350 * 0.8
    assert!((start.x - 480.0).abs() < 1e-9);

    let edges = presentation.edges().unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|edge| edge.start == start));
    assert_ne!(edges[0].end, edges[1].end);
}

#[test]
fn task_fan_out_hits_each_agent() {
    init_tracing();
    let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
    presentation.jump_to(4).unwrap();
    let layouts = presentation.layouts().unwrap();
    let engine = presentation.engine();
    let origin = presentation.origin();

    let source = engine
        .anchor_of(SceneObjectId::DecompTasks, Side::Right, &layouts, origin)
        .unwrap();
    let task_edges: Vec<_> = presentation
        .edges()
        .unwrap()
        .into_iter()
        .filter(|edge| edge.start == source)
        .collect();
    assert_eq!(task_edges.len(), 4);

    for (i, edge) in task_edges.iter().enumerate() {
        let target = engine
            .grid_anchor_of(SceneObjectId::AgentsTasks, i, Side::Left, &layouts, origin)
            .unwrap();
        assert_eq!(edge.end, target);
    }
}

#[test]
fn uneven_content_lists_change_fan_arity() {
    let mut presentation = Presentation::preset(Flavor::Standard, 3, 5).unwrap();
    presentation.jump_to(3).unwrap();
    assert_eq!(presentation.edges().unwrap().len(), 8);

    // Right column of a 3-grid is member 1; of a 5-grid members 1 and 3.
    presentation.advance();
    assert_eq!(presentation.frame().unwrap().label.as_deref(), Some("scoring"));
    assert_eq!(presentation.edges().unwrap().len(), 3);
}

#[test]
fn config_errors_surface_before_first_frame() {
    let json = TWO_STEP_CONFIG.replace("decomp_skills\", \"side\"", "decomp_widgets\", \"side\"");
    let err = PresentationConfig::from_json(&json)
        .and_then(Presentation::from_config)
        .unwrap_err();
    assert!(matches!(err, FlowError::UnknownObjectId(ref name) if name == "decomp_widgets"));
}

#[test]
fn unmentioned_objects_resolve_hidden() {
    let presentation = Presentation::from_json(TWO_STEP_CONFIG).unwrap();
    let layouts = presentation.layouts().unwrap();
    assert_eq!(layouts[&SceneObjectId::Outro], LayoutDescriptor::hidden());
    assert_eq!(layouts[&SceneObjectId::Outro].scale, 0.8);
}
