//! Tree catalog over a key-value store.
//!
//! A [`Workspace`] owns the persistence backend and the one live
//! [`TreeSession`]. It implements the operations around the editor: listing
//! trees, switching, creating, deleting, import and export. Switching trees
//! replaces the session wholesale, which also resets the camera.
//!
//! # Keys
//!
//! - `te_tree_<YYYYMMDDhhmmssSSS>`: one [`TreeDocument`] per tree
//! - `te_lastselected`: storage key of the selected tree

use super::backend::KeyValueStore;
use super::models::{TreeDocument, SELECTED_TREE_KEY, TREE_KEY_PREFIX};
use crate::app::{handle_event, Effect, Event, TreeSession};
use crate::domain::{flat_timestamp, Result, TreeError};
use crate::layout::{LayoutSettings, Viewport};
use crate::tree::{NodeTable, TreeStore};
use crate::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of the tree list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeTab {
    /// Storage key of the tree.
    pub storage_key: String,
    /// Root label.
    pub title: String,
    /// Whether this is the open tree.
    pub selected: bool,
}

/// An exported tree document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedTree {
    /// Suggested file name, `<key>__<title>__<timestamp>.json`.
    pub file_name: String,
    /// Compact JSON document.
    pub json: String,
}

/// The persisted trees and the one that is open.
#[derive(Debug)]
pub struct Workspace<S: KeyValueStore> {
    kv: S,
    settings: LayoutSettings,
    viewport: Viewport,
    zoom_multiplier: f64,
    session: TreeSession,
}

impl<S: KeyValueStore> Workspace<S> {
    /// Opens the selected tree, creating a first tree if none exist.
    ///
    /// A missing or stale selection falls back to the first stored tree and
    /// is written back.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`TreeError::CorruptedHistory`] if the
    /// selected tree does not replay.
    pub fn open(mut kv: S, config: &Config) -> Result<Self> {
        let _span = tracing::info_span!("workspace_open").entered();

        let settings = config.layout_settings();
        let viewport = config.viewport();
        let key = resolve_selection(&mut kv)?;
        let session = load_session(&kv, &key, settings, viewport, config.zoom_multiplier)?;

        tracing::info!(storage_key = %key, "workspace opened");
        Ok(Self {
            kv,
            settings,
            viewport,
            zoom_multiplier: config.zoom_multiplier,
            session,
        })
    }

    /// The open tree.
    #[must_use]
    pub const fn session(&self) -> &TreeSession {
        &self.session
    }

    /// The open tree, mutably.
    pub fn session_mut(&mut self) -> &mut TreeSession {
        &mut self.session
    }

    /// The persistence backend.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.kv
    }

    /// Storage key of the open tree.
    #[must_use]
    pub fn selected_key(&self) -> &str {
        self.session.storage_key()
    }

    /// Runs one input event and executes its persistence effects.
    ///
    /// A `Resize` also applies to trees opened afterwards.
    ///
    /// All effects are returned, including [`Effect::Persist`] after it has
    /// been carried out.
    ///
    /// # Errors
    ///
    /// Returns rejected history actions and storage failures.
    pub fn dispatch(&mut self, event: &Event) -> Result<(bool, Vec<Effect>)> {
        let (redraw, effects) = handle_event(&mut self.session, event)?;
        if let Event::Resize { width, height } = event {
            self.viewport = Viewport::new(*width, *height);
        }
        if effects.contains(&Effect::Persist) {
            self.persist()?;
        }
        Ok((redraw, effects))
    }

    /// Writes the open tree's history to its key.
    ///
    /// # Errors
    ///
    /// Returns storage failures.
    pub fn persist(&mut self) -> Result<()> {
        let _span =
            tracing::debug_span!("persist", storage_key = %self.session.storage_key()).entered();

        let json = self.session.document().to_json()?;
        self.kv.set(self.session.storage_key(), &json)?;

        tracing::debug!(
            history_len = self.session.store().history().len(),
            bytes = json.len(),
            "tree persisted"
        );
        Ok(())
    }

    /// Resizes the viewport of the open tree and of trees opened later.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.session.set_viewport(self.viewport);
    }

    /// Every stored tree, sorted by key.
    ///
    /// Trees whose documents do not decode or replay are skipped.
    ///
    /// # Errors
    ///
    /// Returns storage failures.
    pub fn trees(&self) -> Result<Vec<TreeTab>> {
        let mut tabs = Vec::new();
        for key in self.kv.list_keys(TREE_KEY_PREFIX)? {
            match self.title_of(&key) {
                Ok(title) => tabs.push(TreeTab {
                    selected: key == self.session.storage_key(),
                    storage_key: key,
                    title,
                }),
                Err(e) => tracing::warn!(storage_key = %key, error = %e, "skipping unreadable tree"),
            }
        }
        Ok(tabs)
    }

    /// Opens the tree stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Storage`] if no tree is stored under `key`, or the
    /// replay error if it is corrupted. The open tree is unchanged on error.
    pub fn select_tree(&mut self, key: &str) -> Result<()> {
        let _span = tracing::info_span!("select_tree", storage_key = %key).entered();

        if !key.starts_with(TREE_KEY_PREFIX) {
            return Err(TreeError::Storage(format!("'{key}' is not a tree key")));
        }
        let session = self.load(key)?;
        self.kv.set(SELECTED_TREE_KEY, key)?;
        self.session = session;

        tracing::info!("tree selected");
        Ok(())
    }

    /// Creates and opens a new tree with a single root labelled "New".
    ///
    /// # Errors
    ///
    /// Returns storage failures.
    pub fn new_tree(&mut self) -> Result<String> {
        let _span = tracing::info_span!("new_tree").entered();

        let key = new_tree_key(&self.kv, Utc::now())?;
        self.kv.set(&key, &TreeDocument::new_tree().to_json()?)?;
        self.select_tree(&key)?;

        tracing::info!(storage_key = %key, "tree created");
        Ok(key)
    }

    /// Deletes the open tree and opens the first remaining one.
    ///
    /// A new tree is created if none remain.
    ///
    /// # Errors
    ///
    /// Returns storage failures, or the replay error of the fallback tree.
    pub fn delete_current_tree(&mut self) -> Result<()> {
        let key = self.session.storage_key().to_string();
        let _span = tracing::info_span!("delete_tree", storage_key = %key).entered();

        self.kv.delete(&key)?;
        let next = resolve_selection(&mut self.kv)?;
        self.session = self.load(&next)?;

        tracing::info!(next = %next, "tree deleted");
        Ok(())
    }

    /// Imports a tree document and opens it.
    ///
    /// `content` must be JSON that decodes as a tree document whose history
    /// replays into a rooted tree. The storage key is the part of `file_name`
    /// before the first `__` when that starts with `te_tree_`; otherwise a new
    /// key is generated. The document is stored compactly re-serialized.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Import`] for a non-`.json` file name, malformed
    /// JSON, an invalid document, or an existing key when `overwrite` is
    /// false. Nothing is written when an error is returned.
    pub fn import(&mut self, file_name: &str, content: &str, overwrite: bool) -> Result<String> {
        let _span = tracing::info_span!("import_tree", file_name = %file_name).entered();

        let result = self.import_inner(file_name, content, overwrite);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "import rejected");
        }
        result
    }

    fn import_inner(&mut self, file_name: &str, content: &str, overwrite: bool) -> Result<String> {
        let Some(stem) = file_name.strip_suffix(".json") else {
            return Err(TreeError::Import(format!(
                "expected a .json file but got '{file_name}'"
            )));
        };

        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| TreeError::Import(format!("malformed JSON: {e}")))?;
        let document: TreeDocument = serde_json::from_value(value.clone())
            .map_err(|e| TreeError::Import(format!("not a tree document: {e}")))?;
        let store = TreeStore::from_history(document.history)
            .map_err(|e| TreeError::Import(e.to_string()))?;
        if store.root().is_none() {
            return Err(TreeError::Import("document has no root node".to_string()));
        }

        let key = match stem.split("__").next() {
            Some(prefix) if prefix.starts_with(TREE_KEY_PREFIX) => prefix.to_string(),
            _ => new_tree_key(&self.kv, Utc::now())?,
        };
        if !overwrite && self.kv.get(&key)?.is_some() {
            return Err(TreeError::Import(format!(
                "tree '{key}' already exists and overwrite was not requested"
            )));
        }

        let json = serde_json::to_string(&value)
            .map_err(|e| TreeError::Import(format!("failed to re-serialize: {e}")))?;
        let session = TreeSession::new(key.clone(), store, self.settings, self.viewport)
            .with_zoom_multiplier(self.zoom_multiplier);

        self.kv.set(&key, &json)?;
        self.kv.set(SELECTED_TREE_KEY, &key)?;
        self.session = session;

        tracing::info!(storage_key = %key, bytes = json.len(), "tree imported");
        Ok(key)
    }

    /// Exports the open tree's stored document.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Storage`] if the document is missing or unreadable.
    pub fn export(&self) -> Result<ExportedTree> {
        self.export_at(Utc::now())
    }

    /// Exports the open tree, stamping the file name with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Storage`] if the document is missing or unreadable.
    pub fn export_at(&self, now: DateTime<Utc>) -> Result<ExportedTree> {
        let key = self.session.storage_key();
        let _span = tracing::debug_span!("export_tree", storage_key = %key).entered();

        let stored = self
            .kv
            .get(key)?
            .ok_or_else(|| TreeError::Storage(format!("no tree stored under '{key}'")))?;
        let value: serde_json::Value = serde_json::from_str(&stored)
            .map_err(|e| TreeError::Storage(format!("stored tree is not JSON: {e}")))?;
        let json = serde_json::to_string(&value)
            .map_err(|e| TreeError::Storage(format!("failed to serialize export: {e}")))?;

        let title = self
            .session
            .store()
            .root()
            .and_then(|root| self.session.store().node(root))
            .map(|node| node.text.trim().replace(' ', "_"))
            .unwrap_or_default();
        let file_name = format!(
            "{key}__{title}__{}.json",
            now.format("%Y_%m_%d_%H_%M_%S_%3f")
        );

        tracing::debug!(file_name = %file_name, "tree exported");
        Ok(ExportedTree { file_name, json })
    }

    fn load(&self, key: &str) -> Result<TreeSession> {
        load_session(&self.kv, key, self.settings, self.viewport, self.zoom_multiplier)
    }

    fn title_of(&self, key: &str) -> Result<String> {
        let json = self
            .kv
            .get(key)?
            .ok_or_else(|| TreeError::Storage(format!("no tree stored under '{key}'")))?;
        let table = NodeTable::replay(&TreeDocument::from_json(&json)?.history)?;
        table
            .root()
            .and_then(|root| table.get(root))
            .map(|node| node.text.clone())
            .ok_or_else(|| TreeError::Storage(format!("tree '{key}' has no root")))
    }
}

/// Selected tree key, falling back to the first stored tree.
fn resolve_selection<S: KeyValueStore>(kv: &mut S) -> Result<String> {
    let mut keys = kv.list_keys(TREE_KEY_PREFIX)?;
    if keys.is_empty() {
        let key = new_tree_key(kv, Utc::now())?;
        kv.set(&key, &TreeDocument::new_tree().to_json()?)?;
        tracing::info!(storage_key = %key, "created initial tree");
        keys.push(key);
    }

    if let Some(selected) = kv.get(SELECTED_TREE_KEY)? {
        if keys.contains(&selected) {
            return Ok(selected);
        }
        tracing::debug!(stale = %selected, "selected tree no longer exists");
    }

    let first = keys.swap_remove(0);
    kv.set(SELECTED_TREE_KEY, &first)?;
    Ok(first)
}

/// Fresh `te_tree_<timestamp>` key, suffixed `_n` on collision.
fn new_tree_key<S: KeyValueStore>(kv: &S, now: DateTime<Utc>) -> Result<String> {
    let base = format!("{TREE_KEY_PREFIX}{}", flat_timestamp(now));
    if kv.get(&base)?.is_none() {
        return Ok(base);
    }
    let mut n = 1_u32;
    loop {
        let candidate = format!("{base}_{n}");
        if kv.get(&candidate)?.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

fn load_session<S: KeyValueStore>(
    kv: &S,
    key: &str,
    settings: LayoutSettings,
    viewport: Viewport,
    zoom_multiplier: f64,
) -> Result<TreeSession> {
    let json = kv
        .get(key)?
        .ok_or_else(|| TreeError::Storage(format!("no tree stored under '{key}'")))?;
    let document = TreeDocument::from_json(&json)?;
    let store = TreeStore::from_history(document.history)?;
    Ok(TreeSession::new(key, store, settings, viewport).with_zoom_multiplier(zoom_multiplier))
}
