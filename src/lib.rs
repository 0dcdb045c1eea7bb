//! Tree Explorer: the editing core of a radial tree diagram.
//!
//! Tree Explorer keeps a hierarchy of labelled circles in which every child is
//! drawn inside its parent, arranged on a ring. It provides:
//! - Event-sourced tree state: an append-only action history and the node
//!   table derived from it
//! - A memoized radial layout under a pan/zoom camera
//! - Geometric hit-testing for node borders, bodies, buttons and labels
//! - A pointer interaction state machine (pan, zoom, drag-resize, add, remove,
//!   edit) producing effects for the host
//! - Persistence of many trees in a key-value store, with import and export

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  JSON-lines driver (main.rs)                        │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Workspace (storage/workspace)                      │  ← Tree catalog
//! │  - Select / create / delete trees                   │
//! │  - Import / export                                  │
//! │  - Executes Persist effects                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Pointer modes and cursor                         │
//! │  - Effects for the host                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Tree (tree/)  │   │ Layout        │   │ Render        │
//! │ - History     │   │ (layout/, hit)│   │ (render/)     │
//! │ - Node table  │   │ - Radial math │   │ - Snapshots   │
//! │ - Replay      │   │ - Camera      │   │ - Palette     │
//! │               │   │ - Hit tests   │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Storage backends, Infrastructure           │
//! │  - Actions, nodes, ids, errors (domain/)            │
//! │  - JSON file and in-memory stores (storage/)        │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry bridge, JSON-lines span file       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: pointer interaction state machine
//! - [`domain`]: actions, nodes, ids and errors
//! - [`hit`]: geometric hit tests
//! - [`infrastructure`]: platform paths
//! - [`layout`]: radial layout engine and camera
//! - [`observability`]: span export to a local file
//! - [`render`]: per-frame render snapshots
//! - [`storage`]: key-value persistence and the tree catalog
//! - [`tree`]: event-sourced tree state
//!
//! # Configuration
//!
//! Settings come from `key=value` pairs or a TOML file with the same keys:
//!
//! ```toml
//! viewport_width = 1280
//! viewport_height = 800
//! store_path = "~/.local/share/tree-explorer/trees.json"
//! trace_level = "debug"
//! zoom_multiplier = 0.25
//! show_edit_button = true
//! ```
//!
//! # Example
//!
//! ```rust
//! use tree_explorer::storage::MemoryStore;
//! use tree_explorer::{Config, Effect, Event, Workspace};
//!
//! let config = Config {
//!     viewport_width: 500.0,
//!     viewport_height: 500.0,
//!     ..Default::default()
//! };
//! let mut workspace = Workspace::open(MemoryStore::new(), &config)?;
//!
//! // The add button of a fresh root sits up and to the right of it.
//! workspace.dispatch(&Event::PointerMove { x: 391.42, y: 108.58 })?;
//! let (_, effects) = workspace.dispatch(&Event::Click { x: 391.42, y: 108.58 })?;
//!
//! assert!(effects.contains(&Effect::Persist));
//! assert_eq!(workspace.session().store().table().len(), 2);
//! # Ok::<(), tree_explorer::TreeError>(())
//! ```

pub mod app;
pub mod domain;
pub mod hit;
pub mod infrastructure;
pub mod layout;
pub mod observability;
pub mod render;
pub mod storage;
pub mod tree;

pub use app::{handle_event, Cursor, Effect, Event, PointerState, TreeSession};
pub use domain::{Action, Node, NodeId, Result, SizeIndicator, TreeError};
pub use layout::{Camera, LayoutEngine, LayoutSettings, Viewport};
pub use render::RenderSnapshot;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, Workspace};
pub use tree::TreeStore;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Drawing area width in pixels. Default: `1280`
    pub viewport_width: f64,

    /// Drawing area height in pixels. Default: `800`
    pub viewport_height: f64,

    /// JSON file holding every tree.
    ///
    /// A leading `~` is expanded. Default: `<data dir>/trees.json`
    pub store_path: PathBuf,

    /// Span filter directive, e.g. `"debug"`. Default: `"info"` when unset.
    pub trace_level: Option<String>,

    /// Wheel zoom sensitivity. Default: `0.25`
    pub zoom_multiplier: f64,

    /// Whether nodes carry an edit button. Default: `false`
    pub show_edit_button: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            store_path: infrastructure::default_store_path(),
            trace_level: None,
            zoom_multiplier: app::DEFAULT_ZOOM_MULTIPLIER,
            show_edit_button: false,
        }
    }
}

/// TOML form of [`Config`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    store_path: Option<String>,
    trace_level: Option<String>,
    zoom_multiplier: Option<f64>,
    show_edit_button: Option<bool>,
}

impl Config {
    /// Parses configuration from string pairs.
    ///
    /// Values that fail to parse fall back to their defaults; unknown keys
    /// are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tree_explorer::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("viewport_width".to_string(), "500".to_string());
    /// map.insert("show_edit_button".to_string(), "true".to_string());
    /// map.insert("zoom_multiplier".to_string(), "fast".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.viewport_width, 500.0);
    /// assert!(config.show_edit_button);
    /// assert_eq!(config.zoom_multiplier, 0.25);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let number = |key: &str, fallback: f64| {
            config
                .get(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(fallback)
        };

        Self {
            viewport_width: number("viewport_width", defaults.viewport_width),
            viewport_height: number("viewport_height", defaults.viewport_height),
            store_path: config
                .get("store_path")
                .map_or(defaults.store_path, |s| infrastructure::expand_tilde(s)),
            trace_level: config.get("trace_level").cloned(),
            zoom_multiplier: number("zoom_multiplier", defaults.zoom_multiplier),
            show_edit_button: config
                .get("show_edit_button")
                .and_then(|s| s.trim().parse::<bool>().ok())
                .unwrap_or(defaults.show_edit_button),
        }
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Io`] if the file cannot be read and
    /// [`TreeError::Config`] if it is not valid TOML or has unknown keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| TreeError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Config`] if the text is not valid TOML or has
    /// unknown keys.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| TreeError::Config(e.to_string()))?;
        let defaults = Self::default();

        Ok(Self {
            viewport_width: file.viewport_width.unwrap_or(defaults.viewport_width),
            viewport_height: file.viewport_height.unwrap_or(defaults.viewport_height),
            store_path: file
                .store_path
                .as_deref()
                .map_or(defaults.store_path, infrastructure::expand_tilde),
            trace_level: file.trace_level,
            zoom_multiplier: file.zoom_multiplier.unwrap_or(defaults.zoom_multiplier),
            show_edit_button: file.show_edit_button.unwrap_or(defaults.show_edit_button),
        })
    }

    /// Layout tunables with this configuration applied.
    #[must_use]
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            show_edit_button: self.show_edit_button,
            ..LayoutSettings::default()
        }
    }

    /// Initial viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

/// Opens the workspace stored at `config.store_path`.
///
/// # Errors
///
/// Returns storage errors from opening the file or loading the selected tree.
pub fn initialize(config: &Config) -> Result<Workspace<JsonFileStore>> {
    let _span = tracing::debug_span!("initialize", store_path = %config.store_path.display())
        .entered();

    let kv = JsonFileStore::open(&config.store_path)?;
    Workspace::open(kv, config)
}
