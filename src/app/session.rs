//! The live state of one open tree.
//!
//! A [`TreeSession`] owns everything that belongs to the tree currently being
//! edited: its [`TreeStore`], the layout cache, the camera and the pointer
//! gesture. Switching trees replaces the whole value, so nothing leaks from
//! one tree to the next.
//!
//! All tree mutations made by the interaction layer go through
//! [`TreeSession::commit`], which keeps the layout cache and the hit-test
//! order in step with the node table.

use super::modes::{Cursor, Gesture, PointerState};
use crate::domain::{Action, IdGenerator, NodeId, Result};
use crate::hit::{Point, TextBox};
use crate::layout::{Camera, LayoutEngine, LayoutNode, LayoutSettings, Viewport};
use crate::render::RenderSnapshot;
use crate::storage::TreeDocument;
use crate::tree::{TreeChange, TreeStore};
use std::collections::HashMap;

/// Default wheel zoom sensitivity.
pub const DEFAULT_ZOOM_MULTIPLIER: f64 = 0.25;

/// One open tree with its view and interaction state.
#[derive(Debug, Clone)]
pub struct TreeSession {
    storage_key: String,
    store: TreeStore,
    layout: LayoutEngine,
    camera: Camera,
    zoom_multiplier: f64,
    ids: IdGenerator,
    /// Node ids with children before parents; the innermost hit wins.
    hit_order: Vec<NodeId>,
    text_boxes: HashMap<NodeId, TextBox>,

    pub(crate) pointer: PointerState,
    pub(crate) gesture: Gesture,
    pub(crate) hovering: Vec<NodeId>,
    pub(crate) hover_text: Option<NodeId>,
    pub(crate) cursor: Cursor,
}

impl TreeSession {
    /// Opens `store` under `storage_key` with a freshly reset camera.
    #[must_use]
    pub fn new(
        storage_key: impl Into<String>,
        store: TreeStore,
        settings: LayoutSettings,
        viewport: Viewport,
    ) -> Self {
        let storage_key = storage_key.into();
        tracing::debug!(
            storage_key = %storage_key,
            node_count = store.table().len(),
            "opening tree session"
        );

        let hit_order = store.table().post_order();
        Self {
            storage_key,
            store,
            layout: LayoutEngine::new(settings, viewport),
            camera: Camera::reset(&viewport),
            zoom_multiplier: DEFAULT_ZOOM_MULTIPLIER,
            ids: IdGenerator::new(),
            hit_order,
            text_boxes: HashMap::new(),
            pointer: PointerState::Idle,
            gesture: Gesture::default(),
            hovering: Vec::new(),
            hover_text: None,
            cursor: Cursor::Default,
        }
    }

    /// Sets the wheel zoom sensitivity.
    #[must_use]
    pub fn with_zoom_multiplier(mut self, zoom_multiplier: f64) -> Self {
        self.zoom_multiplier = zoom_multiplier;
        self
    }

    /// Storage key the session persists to.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The tree's history and node table.
    #[must_use]
    pub const fn store(&self) -> &TreeStore {
        &self.store
    }

    /// The layout cache.
    #[must_use]
    pub const fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Current camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        self.layout.viewport()
    }

    /// Layout tunables.
    #[must_use]
    pub const fn settings(&self) -> &LayoutSettings {
        self.layout.settings()
    }

    /// Wheel zoom sensitivity.
    #[must_use]
    pub const fn zoom_multiplier(&self) -> f64 {
        self.zoom_multiplier
    }

    /// Current pointer state.
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Cursor last reported to the host.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Nodes under the pointer, innermost first.
    #[must_use]
    pub fn hovering(&self) -> &[NodeId] {
        &self.hovering
    }

    /// Node whose label box is under the pointer.
    #[must_use]
    pub const fn hover_text(&self) -> Option<&NodeId> {
        self.hover_text.as_ref()
    }

    /// Hit-test traversal order: every node after all of its descendants.
    #[must_use]
    pub fn hit_order(&self) -> &[NodeId] {
        &self.hit_order
    }

    /// Geometry of one node.
    pub fn node_layout(&mut self, id: &NodeId) -> Option<LayoutNode> {
        self.layout.layout(self.store.table(), &self.camera, id).cloned()
    }

    /// Geometry of every node in table order.
    pub fn layout_all(&mut self) -> Vec<LayoutNode> {
        self.layout.layout_all(self.store.table(), &self.camera)
    }

    /// Applies `action` through the validated history path.
    ///
    /// Layout entries the change affects are invalidated, and state that
    /// refers to removed nodes is dropped.
    ///
    /// # Errors
    ///
    /// Propagates the [`TreeStore::append`] error; nothing changes then.
    pub fn commit(&mut self, action: Action) -> Result<TreeChange> {
        let change = self.store.append(action)?;
        self.layout.apply_change(self.store.table(), &change);

        match &change {
            TreeChange::Added { .. } => {
                self.hit_order = self.store.table().post_order();
            }
            TreeChange::Removed { removed, .. } => {
                self.hit_order = self.store.table().post_order();
                for id in removed {
                    self.text_boxes.remove(id);
                }
                self.hovering.retain(|id| !removed.contains(id));
                if self.hover_text.as_ref().is_some_and(|id| removed.contains(id)) {
                    self.hover_text = None;
                }
            }
            TreeChange::Modified { .. } => {}
        }

        Ok(change)
    }

    /// Replaces the camera; every cached position becomes stale.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.layout.invalidate_all();
    }

    /// Pans by a pointer delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.camera.pan_by(dx, dy);
        self.layout.invalidate_all();
    }

    /// Changes the zoom by `delta`.
    pub fn zoom_by(&mut self, delta: f64) {
        self.camera.zoom_by(delta);
        self.layout.invalidate_all();
    }

    /// Puts the camera back to its initial position for the current viewport.
    pub fn reset_camera(&mut self) {
        let camera = Camera::reset(self.layout.viewport());
        self.set_camera(camera);
    }

    /// Resizes the viewport; the root recentres.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.layout.set_viewport(viewport);
    }

    /// Records where the renderer drew a node's label.
    ///
    /// Boxes for unknown ids are ignored.
    pub fn set_text_box(&mut self, id: NodeId, text_box: TextBox) {
        if self.store.table().contains(&id) {
            self.text_boxes.insert(id, text_box);
        }
    }

    /// Forgets a node's label box.
    pub fn clear_text_box(&mut self, id: &NodeId) {
        self.text_boxes.remove(id);
        if self.hover_text.as_ref() == Some(id) {
            self.hover_text = None;
        }
    }

    /// Label box of a node, if the renderer reported one.
    #[must_use]
    pub fn text_box(&self, id: &NodeId) -> Option<&TextBox> {
        self.text_boxes.get(id)
    }

    /// First node in table order whose label box strictly contains `p`.
    #[must_use]
    pub fn text_box_at(&self, p: Point) -> Option<NodeId> {
        self.store
            .table()
            .ids()
            .iter()
            .find(|id| self.text_boxes.get(*id).is_some_and(|b| b.contains(p)))
            .cloned()
    }

    /// A node id not present in the tree.
    pub fn next_node_id(&mut self) -> NodeId {
        let table = self.store.table();
        self.ids.next_id(|candidate| table.contains(candidate))
    }

    /// Persistable form of the history.
    #[must_use]
    pub fn document(&self) -> TreeDocument {
        TreeDocument::new(self.store.history().to_vec())
    }

    /// Everything the renderer needs for one frame.
    pub fn render_snapshot(&mut self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }
}
