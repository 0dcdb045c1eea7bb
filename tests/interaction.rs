//! Pointer interaction: resize drags, buttons, panning and the label editor.

use tree_explorer::storage::MemoryStore;
use tree_explorer::{
    handle_event, Action, Config, Cursor, Effect, Event, KeyValueStore, LayoutSettings, Node,
    NodeId, PointerState, SizeIndicator, TreeSession, TreeStore, Viewport, Workspace,
};

/// A lone root at (250, 250) with radius 200 and border 7.
fn root_only() -> TreeSession {
    let store = TreeStore::from_history(vec![Action::Add(Node::root("root", "New"))]).unwrap();
    TreeSession::new("te_tree_1", store, LayoutSettings::default(), Viewport::new(500.0, 500.0))
}

fn send(session: &mut TreeSession, event: Event) -> (bool, Vec<Effect>) {
    handle_event(session, &event).unwrap()
}

fn root_size(session: &TreeSession) -> SizeIndicator {
    session.store().node(&NodeId::from("root")).unwrap().size_indicator
}

#[test]
fn dragging_the_border_to_the_medium_radius_commits_one_modify() {
    let mut session = root_only();

    let (redraw, _) = send(&mut session, Event::PointerDown { x: 450.0, y: 250.0 });
    assert!(redraw);
    assert!(matches!(session.pointer(), PointerState::DraggingNode { target } if target.as_str() == "root"));

    let (_, effects) = send(&mut session, Event::PointerMove { x: 400.0, y: 250.0 });
    assert!(!effects.contains(&Effect::Persist));
    assert_eq!(root_size(&session), SizeIndicator::Medium);
    assert_eq!(session.store().history().len(), 2);

    // Still nearest to 150: no further action.
    send(&mut session, Event::PointerMove { x: 395.0, y: 250.0 });
    assert_eq!(session.store().history().len(), 2);

    let (_, effects) = send(&mut session, Event::PointerUp { x: 395.0, y: 250.0 });
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(session.pointer(), &PointerState::Idle);
}

#[test]
fn each_tier_crossing_appends_its_own_modify() {
    let mut session = root_only();

    send(&mut session, Event::PointerDown { x: 450.0, y: 250.0 });
    send(&mut session, Event::PointerMove { x: 400.0, y: 250.0 });
    send(&mut session, Event::PointerMove { x: 300.0, y: 250.0 });
    assert_eq!(root_size(&session), SizeIndicator::Small);
    assert_eq!(session.store().history().len(), 3);

    send(&mut session, Event::PointerMove { x: 460.0, y: 250.0 });
    assert_eq!(root_size(&session), SizeIndicator::Large);
    assert_eq!(session.store().history().len(), 4);
    assert!(session.store().is_consistent());

    let (_, effects) = send(&mut session, Event::PointerUp { x: 460.0, y: 250.0 });
    assert_eq!(effects, vec![Effect::Persist]);
}

#[test]
fn drag_without_tier_change_does_not_persist() {
    let mut session = root_only();

    send(&mut session, Event::PointerDown { x: 450.0, y: 250.0 });
    send(&mut session, Event::PointerMove { x: 448.0, y: 250.0 });
    let (_, effects) = send(&mut session, Event::PointerUp { x: 448.0, y: 250.0 });

    assert!(effects.is_empty());
    assert_eq!(session.store().history().len(), 1);
}

#[test]
fn pressing_empty_space_pans_and_swallows_the_click() {
    let mut session = root_only();

    send(&mut session, Event::PointerDown { x: 10.0, y: 10.0 });
    assert!(matches!(session.pointer(), PointerState::Panning { .. }));

    let (redraw, effects) = send(&mut session, Event::PointerMove { x: 20.0, y: 30.0 });
    assert!(redraw);
    assert_eq!(effects, vec![Effect::SetCursor { cursor: Cursor::Move }]);
    assert!((session.camera().pan_x - 10.0).abs() < 1e-9);
    assert!((session.camera().pan_y - 20.0).abs() < 1e-9);

    send(&mut session, Event::PointerUp { x: 20.0, y: 30.0 });
    let (redraw, effects) = send(&mut session, Event::Click { x: 20.0, y: 30.0 });
    assert!(!redraw && effects.is_empty());

    let root = session.node_layout(&NodeId::from("root")).unwrap();
    assert!((root.x - 260.0).abs() < 1e-9);
    assert!((root.y - 270.0).abs() < 1e-9);
}

#[test]
fn add_then_remove_through_buttons() {
    let mut session = root_only();

    // Add button of the root sits at 1.75π on its border.
    let (redraw, effects) = send(&mut session, Event::Click { x: 391.42, y: 108.58 });
    assert!(redraw);
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(session.store().table().len(), 2);

    let child_id = session.store().children(&NodeId::from("root"))[0].clone();
    let child = session.store().node(&child_id).unwrap().clone();
    assert_eq!(child.text, "New");
    assert_eq!(child.size_indicator, SizeIndicator::Large);

    // The only child sits on the root centre with radius 110; remove is at 1.25π.
    let (_, effects) = send(&mut session, Event::Click { x: 172.22, y: 172.22 });
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(session.store().table().len(), 1);
    assert_eq!(session.store().history().len(), 3);
}

#[test]
fn hovering_a_button_shows_the_pointer_cursor() {
    let mut session = root_only();

    let (_, effects) = send(&mut session, Event::PointerMove { x: 391.42, y: 108.58 });
    assert_eq!(effects, vec![Effect::SetCursor { cursor: Cursor::Pointer }]);
    assert_eq!(session.hovering(), &[NodeId::from("root")]);

    let (_, effects) = send(&mut session, Event::PointerMove { x: 451.0, y: 250.0 });
    assert_eq!(effects, vec![Effect::SetCursor { cursor: Cursor::Crosshair }]);

    let (_, effects) = send(&mut session, Event::PointerMove { x: 250.0, y: 250.0 });
    assert_eq!(effects, vec![Effect::SetCursor { cursor: Cursor::Default }]);
}

#[test]
fn label_click_opens_the_editor_and_blocks_pointer_input() {
    let mut session = root_only();
    send(
        &mut session,
        Event::LabelBox {
            id: NodeId::from("root"),
            x: 220.0,
            y: 240.0,
            width: 60.0,
            height: 20.0,
        },
    );

    let (_, effects) = send(&mut session, Event::PointerMove { x: 250.0, y: 250.0 });
    assert_eq!(effects, vec![Effect::SetCursor { cursor: Cursor::Text }]);

    let (_, effects) = send(&mut session, Event::Click { x: 250.0, y: 250.0 });
    assert_eq!(
        effects,
        vec![Effect::OpenTextEditor {
            id: NodeId::from("root"),
            text: "New".to_string(),
        }]
    );
    assert!(session.pointer().is_modal());

    let (redraw, effects) = send(&mut session, Event::PointerDown { x: 450.0, y: 250.0 });
    assert!(!redraw && effects.is_empty());
    assert!(session.pointer().is_modal());

    let (_, effects) = send(&mut session, Event::TextEdited { text: "  Plans ".to_string() });
    assert_eq!(
        effects,
        vec![
            Effect::Persist,
            Effect::TreeTitleChanged {
                title: "Plans".to_string()
            },
        ]
    );
    assert_eq!(session.store().node(&NodeId::from("root")).unwrap().text, "Plans");

    let (_, effects) = send(&mut session, Event::CloseModal);
    assert_eq!(effects, vec![Effect::CloseTextEditor]);
    assert_eq!(session.pointer(), &PointerState::Idle);
}

#[test]
fn wheel_zooms_and_biases_toward_the_pointer() {
    let mut session = root_only();

    send(&mut session, Event::Wheel { x: 350.0, y: 150.0, delta_y: -100.0 });

    assert!((session.camera().zoom - 1.25).abs() < 1e-9);
    assert!((session.camera().pan_x + 10.0).abs() < 1e-9);
    assert!((session.camera().pan_y - 10.0).abs() < 1e-9);
}

#[test]
fn workspace_persists_clicks_to_the_store() {
    let config = Config {
        viewport_width: 500.0,
        viewport_height: 500.0,
        ..Default::default()
    };
    let mut workspace = Workspace::open(MemoryStore::new(), &config).unwrap();
    let key = workspace.selected_key().to_string();
    let before = workspace.store().get(&key).unwrap().unwrap();

    workspace.dispatch(&Event::Click { x: 391.42, y: 108.58 }).unwrap();

    let after = workspace.store().get(&key).unwrap().unwrap();
    assert_ne!(before, after);
    assert_eq!(after, workspace.session().document().to_json().unwrap());
}
