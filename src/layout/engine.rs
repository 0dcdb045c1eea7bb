//! Memoized radial layout.
//!
//! [`LayoutEngine`] maps `(node table, camera)` to per-node geometry. Results
//! are cached per id together with the epoch they were computed in:
//!
//! - Camera or viewport changes bump the epoch, which makes every entry stale
//!   without touching the map.
//! - Structural and size changes drop the affected subtree's entries by
//!   walking it explicitly.
//!
//! The cache never influences results: computing against an empty cache gives
//! bit-identical geometry.
//!
//! # Geometry
//!
//! ```text
//! root:   x = panX + centerX, y = panY + centerY, base = max(0, baseSize * zoom)
//! child:  angle = a0 + (2π / n) * k          (a0 = π if n == 2, else -π/2)
//!         x = parent.x + cos(angle) * parent.innerRing
//!         base = parent.radius * 0.55 * sqrt(n) / n
//! all:    radius = base * tier,  innerRing = radius * 0.4 * (c < 2 ? 0 : c^0.25)
//! ```

use super::camera::{Camera, Viewport};
use super::geometry::{button_anchors, child_angle, LayoutNode, LayoutSettings};
use crate::domain::NodeId;
use crate::hit::border_width;
use crate::tree::{NodeTable, TreeChange};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CacheEntry {
    node: LayoutNode,
    epoch: u64,
}

/// Per-node geometry cache with explicit invalidation.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    settings: LayoutSettings,
    viewport: Viewport,
    epoch: u64,
    entries: HashMap<NodeId, CacheEntry>,
    computed: u64,
}

impl LayoutEngine {
    /// Creates an engine with an empty cache.
    #[must_use]
    pub fn new(settings: LayoutSettings, viewport: Viewport) -> Self {
        Self {
            settings,
            viewport,
            epoch: 0,
            entries: HashMap::new(),
            computed: 0,
        }
    }

    /// Layout tunables.
    #[must_use]
    pub const fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current cache epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of node geometries computed so far.
    #[must_use]
    pub const fn computed_count(&self) -> u64 {
        self.computed
    }

    /// Changes the viewport; every cached entry becomes stale.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.invalidate_all();
        }
    }

    /// Marks every cached entry stale. Called on any camera change.
    pub fn invalidate_all(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        tracing::trace!(epoch = self.epoch, "layout cache epoch bumped");
    }

    /// Drops all entries, stale or not.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.invalidate_all();
    }

    /// Drops the entries of `id` and its entire descendant subtree.
    pub fn invalidate_subtree(&mut self, table: &NodeTable, id: &NodeId) {
        let subtree = table.subtree_pre_order(id);
        if subtree.is_empty() {
            self.entries.remove(id);
            return;
        }
        for member in &subtree {
            self.entries.remove(member);
        }
        tracing::trace!(root = %id, dropped = subtree.len(), "layout subtree invalidated");
    }

    /// Drops the entries of ids that no longer exist.
    pub fn forget(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.entries.remove(id);
        }
    }

    /// Invalidates exactly what a tree change affects.
    ///
    /// - Add/remove: the parent's subtree (sibling count and angles change).
    /// - Size change: the node's subtree.
    /// - Text change: nothing.
    pub fn apply_change(&mut self, table: &NodeTable, change: &TreeChange) {
        match change {
            TreeChange::Added { id, parent } => match parent {
                Some(parent) => self.invalidate_subtree(table, parent),
                None => self.invalidate_subtree(table, id),
            },
            TreeChange::Removed { parent, removed } => {
                self.forget(removed);
                if let Some(parent) = parent {
                    self.invalidate_subtree(table, parent);
                }
            }
            TreeChange::Modified {
                id, size_changed, ..
            } => {
                if *size_changed {
                    self.invalidate_subtree(table, id);
                }
            }
        }
    }

    /// Cached geometry for `id`, only if it is current.
    #[must_use]
    pub fn cached(&self, id: &NodeId) -> Option<&LayoutNode> {
        self.entries
            .get(id)
            .filter(|entry| entry.epoch == self.epoch)
            .map(|entry| &entry.node)
    }

    /// Geometry of `id`, computing it and any stale ancestors first.
    ///
    /// Returns `None` if `id` is not in `table`.
    pub fn layout(&mut self, table: &NodeTable, camera: &Camera, id: &NodeId) -> Option<&LayoutNode> {
        if !self.ensure(table, camera, id) {
            return None;
        }
        self.cached(id)
    }

    /// Geometry of every node in table order.
    pub fn layout_all(&mut self, table: &NodeTable, camera: &Camera) -> Vec<LayoutNode> {
        table
            .ids()
            .iter()
            .filter_map(|id| self.layout(table, camera, id).cloned())
            .collect()
    }

    fn is_fresh(&self, id: &NodeId) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.epoch == self.epoch)
    }

    /// Computes stale entries from the nearest fresh ancestor down to `id`.
    fn ensure(&mut self, table: &NodeTable, camera: &Camera, id: &NodeId) -> bool {
        let mut pending = Vec::new();
        let mut cursor = Some(id);

        while let Some(current) = cursor {
            if self.is_fresh(current) {
                break;
            }
            let Some(node) = table.get(current) else {
                return false;
            };
            pending.push(current);
            cursor = node.parent_id.as_ref();
        }

        for current in pending.into_iter().rev() {
            let Some(node) = self.compute(table, camera, current) else {
                return false;
            };
            self.computed += 1;
            self.entries.insert(
                current.clone(),
                CacheEntry {
                    node,
                    epoch: self.epoch,
                },
            );
        }

        true
    }

    /// Geometry of one node; its parent must already be fresh in the cache.
    #[allow(clippy::cast_precision_loss)]
    fn compute(&self, table: &NodeTable, camera: &Camera, id: &NodeId) -> Option<LayoutNode> {
        let node = table.get(id)?;
        let settings = &self.settings;

        let (x, y, base_radius, sibling_count, parent_radius) = match &node.parent_id {
            None => (
                camera.pan_x + self.viewport.center_x(),
                camera.pan_y + self.viewport.center_y(),
                (settings.base_size * camera.zoom).max(0.0),
                0,
                None,
            ),
            Some(parent_id) => {
                let parent = self.cached(parent_id)?;
                let count = parent.child_ids.len();
                let index = parent.child_ids.iter().position(|child| child == id)?;
                let angle = child_angle(count, index);
                let siblings = count as f64;
                (
                    angle.cos() * parent.inner_ring_radius + parent.x,
                    angle.sin() * parent.inner_ring_radius + parent.y,
                    (parent.radius * settings.child_scale * siblings.sqrt()) * (1.0 / siblings),
                    count,
                    Some(parent.radius),
                )
            }
        };

        let radius = base_radius * node.size_indicator.multiplier();
        let child_ids = table.children(id).to_vec();
        let ring_spread = if child_ids.len() < 2 {
            0.0
        } else {
            (child_ids.len() as f64).sqrt().sqrt()
        };

        Some(LayoutNode {
            id: id.clone(),
            parent_id: node.parent_id.clone(),
            x,
            y,
            radius,
            base_radius,
            inner_ring_radius: radius * settings.inner_ring_factor * ring_spread,
            border_width: border_width(radius),
            child_ids,
            sibling_count,
            buttons: button_anchors(settings, x, y, radius, node.is_root()),
            visibility_restricted: parent_radius.is_some_and(|r| r < settings.visibility_cutoff),
            interactivity_restricted: parent_radius
                .is_some_and(|r| r < settings.interactivity_cutoff),
        })
    }
}
