//! Radial layout geometry and cache invalidation.

use tree_explorer::domain::NodeChanges;
use tree_explorer::layout::child_angle;
use tree_explorer::tree::NodeTable;
use tree_explorer::{Action, Camera, LayoutEngine, LayoutSettings, Node, NodeId, SizeIndicator, Viewport};

const EPS: f64 = 1e-9;

fn add(id: &str, parent: &str) -> Action {
    Action::Add(Node::child(id, parent, id, SizeIndicator::Large))
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(LayoutSettings::default(), Viewport::new(500.0, 500.0))
}

fn camera() -> Camera {
    Camera::reset(&Viewport::new(500.0, 500.0))
}

#[test]
fn reset_camera_on_square_500_viewport_is_unit_zoom() {
    let table = NodeTable::replay(&[Action::Add(Node::root("root", "Root"))]).unwrap();
    let camera = camera();
    assert!((camera.zoom - 1.0).abs() < EPS);

    let root = engine()
        .layout(&table, &camera, &NodeId::from("root"))
        .cloned()
        .unwrap();
    assert!((root.x - 250.0).abs() < EPS);
    assert!((root.y - 250.0).abs() < EPS);
    assert!((root.radius - 200.0).abs() < EPS);
    assert!((root.border_width - 7.0).abs() < EPS);
}

#[test]
fn three_children_sit_at_minus_90_30_and_150_degrees() {
    let table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        add("a", "root"),
        add("b", "root"),
        add("c", "root"),
    ])
    .unwrap();
    let mut engine = engine();
    let nodes = engine.layout_all(&table, &camera());

    let root = &nodes[0];
    let degrees: Vec<f64> = nodes[1..]
        .iter()
        .map(|child| (child.y - root.y).atan2(child.x - root.x).to_degrees())
        .collect();

    for (actual, expected) in degrees.iter().zip([-90.0, 30.0, 150.0]) {
        assert!((actual - expected).abs() < 1e-6, "{actual} vs {expected}");
    }
    for child in &nodes[1..] {
        assert_eq!(child.sibling_count, 3);
        let distance = (child.x - root.x).hypot(child.y - root.y);
        assert!((distance - root.inner_ring_radius).abs() < 1e-6);
    }
}

#[test]
fn two_children_sit_left_and_right() {
    assert!((child_angle(2, 0) - std::f64::consts::PI).abs() < EPS);
    assert!((child_angle(2, 1) - 2.0 * std::f64::consts::PI).abs() < EPS);
    assert!((child_angle(1, 0) + std::f64::consts::FRAC_PI_2).abs() < EPS);
}

#[test]
fn radius_grows_with_size_tier() {
    let table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        Action::Add(Node::child("s", "root", "s", SizeIndicator::Small)),
        Action::Add(Node::child("m", "root", "m", SizeIndicator::Medium)),
        Action::Add(Node::child("l", "root", "l", SizeIndicator::Large)),
    ])
    .unwrap();
    let nodes = engine().layout_all(&table, &camera());

    let (small, medium, large) = (&nodes[1], &nodes[2], &nodes[3]);
    assert!(small.radius < medium.radius && medium.radius < large.radius);
    assert!((small.base_radius - large.base_radius).abs() < EPS);
    assert!((medium.radius - 0.75 * large.radius).abs() < EPS);
}

#[test]
fn layout_is_a_pure_function_of_table_and_camera() {
    let table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        add("a", "root"),
        add("b", "root"),
        add("a1", "a"),
    ])
    .unwrap();
    let camera = Camera::new(12.0, -7.0, 1.3);

    let mut warm = engine();
    warm.layout_all(&table, &Camera::default());
    warm.invalidate_all();
    let from_warm = warm.layout_all(&table, &camera);
    let from_cold = engine().layout_all(&table, &camera);

    assert_eq!(from_warm, from_cold);
}

#[test]
fn size_change_recomputes_only_the_changed_subtree() {
    let mut table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        add("a", "root"),
        add("b", "root"),
        add("a1", "a"),
    ])
    .unwrap();
    let camera = camera();
    let mut engine = engine();
    engine.layout_all(&table, &camera);
    assert_eq!(engine.computed_count(), 4);

    let change = table
        .apply(&Action::Modify(NodeChanges::size("a", SizeIndicator::Small)))
        .unwrap();
    engine.apply_change(&table, &change);

    assert!(engine.cached(&NodeId::from("root")).is_some());
    assert!(engine.cached(&NodeId::from("b")).is_some());
    assert!(engine.cached(&NodeId::from("a")).is_none());
    assert!(engine.cached(&NodeId::from("a1")).is_none());

    let after = engine.layout_all(&table, &camera);
    assert_eq!(engine.computed_count(), 6);
    assert_eq!(after, self::engine().layout_all(&table, &camera));
}

#[test]
fn text_change_keeps_every_entry() {
    let mut table = NodeTable::replay(&[Action::Add(Node::root("root", "Root")), add("a", "root")]).unwrap();
    let camera = camera();
    let mut engine = engine();
    engine.layout_all(&table, &camera);

    let change = table
        .apply(&Action::Modify(NodeChanges::text("a", "Renamed")))
        .unwrap();
    engine.apply_change(&table, &change);
    engine.layout_all(&table, &camera);

    assert_eq!(engine.computed_count(), 2);
}

#[test]
fn adding_a_child_relays_its_siblings() {
    let mut table = NodeTable::replay(&[Action::Add(Node::root("root", "Root")), add("a", "root")]).unwrap();
    let camera = camera();
    let mut engine = engine();
    let before = engine.layout_all(&table, &camera);

    let change = table.apply(&add("b", "root")).unwrap();
    engine.apply_change(&table, &change);
    let after = engine.layout_all(&table, &camera);

    assert_ne!(before[1].x, after[1].x);
    assert_eq!(after[1].sibling_count, 2);
    assert!(after[1].radius < before[1].radius);
}

#[test]
fn small_parents_restrict_their_children() {
    let table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        add("a", "root"),
        add("a1", "a"),
        add("a1x", "a1"),
    ])
    .unwrap();
    let nodes = engine().layout_all(&table, &camera());

    // root 200, a 110, a1 60.5
    assert!(!nodes[1].interactivity_restricted);
    assert!(nodes[2].interactivity_restricted && !nodes[2].visibility_restricted);
    assert!(nodes[3].interactivity_restricted);
    assert!(!nodes[3].visibility_restricted);
}

#[test]
fn camera_change_marks_everything_stale() {
    let table = NodeTable::replay(&[Action::Add(Node::root("root", "Root")), add("a", "root")]).unwrap();
    let mut engine = engine();
    engine.layout_all(&table, &camera());

    engine.invalidate_all();

    assert!(engine.cached(&NodeId::from("root")).is_none());
    assert!(engine.cached(&NodeId::from("a")).is_none());
}

#[test]
fn deep_chains_do_not_overflow() {
    let mut history = vec![Action::Add(Node::root("n0", "n0"))];
    for i in 1..20_000 {
        history.push(add(&format!("n{i}"), &format!("n{}", i - 1)));
    }
    let table = NodeTable::replay(&history).unwrap();

    let leaf = engine().layout(&table, &camera(), &NodeId::from("n19999")).cloned();
    assert!(leaf.is_some());
    assert_eq!(table.post_order().len(), 20_000);
}

#[test]
fn removal_relays_the_parent_subtree_and_forgets_the_removed() {
    let mut table = NodeTable::replay(&[
        Action::Add(Node::root("root", "Root")),
        add("a", "root"),
        add("b", "root"),
        add("c", "root"),
        add("a1", "a"),
        add("b1", "b"),
    ])
    .unwrap();
    let camera = camera();
    let mut engine = engine();
    engine.layout_all(&table, &camera);
    assert_eq!(engine.computed_count(), 6);

    let change = table.apply(&Action::remove("b")).unwrap();
    engine.apply_change(&table, &change);

    assert!(engine.cached(&NodeId::from("b")).is_none());
    assert!(engine.cached(&NodeId::from("b1")).is_none());
    assert!(engine.cached(&NodeId::from("a")).is_none());

    let after = engine.layout_all(&table, &camera);
    // root, a, a1 and c; nothing for the removed pair.
    assert_eq!(engine.computed_count(), 10);
    assert!(engine.cached(&NodeId::from("b")).is_none());
    assert_eq!(after.len(), 4);
    assert_eq!(after, self::engine().layout_all(&table, &camera));
    assert_eq!(after[1].sibling_count, 2);
}
