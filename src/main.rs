//! Headless driver and entry point.
//!
//! Opens the workspace on the JSON file store and speaks a line-oriented JSON
//! protocol on stdin/stdout, so any UI (or a test script) can drive the editor
//! core without linking against it.
//!
//! # Usage
//!
//! ```text
//! tree-explorer [key=value ...] [config=path.toml]
//! ```
//!
//! Keys are those of [`Config`]; pairs given on the command line override the
//! config file.
//!
//! # Protocol
//!
//! One request per line, one response per line:
//!
//! ```text
//! → {"op":"event","event":{"type":"click","x":391.42,"y":108.58}}
//! ← {"ok":true,"redraw":true,"effects":[{"type":"persist"}]}
//!
//! → {"op":"import","file_name":"te_tree_1__Plans.json","content":"{…}","overwrite":false}
//! ← {"ok":true,"storage_key":"te_tree_1"}
//!
//! → {"op":"snapshot"}
//! ← {"ok":true,"snapshot":{"nodes":[…],"buttons":[],…}}
//!
//! → {"op":"select_tree","key":"missing"}
//! ← {"ok":false,"error":"Storage error: 'missing' is not a tree key"}
//! ```
//!
//! Other ops: `new_tree`, `delete_tree`, `export`, `trees`, `resize`.

#![allow(clippy::multiple_crate_versions)]

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use tree_explorer::{Config, Event, JsonFileStore, Workspace};

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Event {
        event: Event,
    },
    NewTree,
    SelectTree {
        key: String,
    },
    DeleteTree,
    Import {
        file_name: String,
        content: String,
        #[serde(default)]
        overwrite: bool,
    },
    Export,
    Trees,
    Snapshot,
    Resize {
        width: f64,
        height: f64,
    },
}

impl Request {
    const fn name(&self) -> &'static str {
        match self {
            Self::Event { .. } => "event",
            Self::NewTree => "new_tree",
            Self::SelectTree { .. } => "select_tree",
            Self::DeleteTree => "delete_tree",
            Self::Import { .. } => "import",
            Self::Export => "export",
            Self::Trees => "trees",
            Self::Snapshot => "snapshot",
            Self::Resize { .. } => "resize",
        }
    }
}

fn main() {
    let config = match load_config(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tree-explorer: {e}");
            std::process::exit(2);
        }
    };
    tree_explorer::observability::init_tracing(&config);

    let span = tracing::debug_span!("driver_start");
    let guard = span.entered();
    tracing::debug!(store_path = %config.store_path.display(), "parsed configuration");

    let mut workspace = match tree_explorer::initialize(&config) {
        Ok(workspace) => workspace,
        Err(e) => {
            tracing::error!(error = %e, "failed to open workspace");
            eprintln!("tree-explorer: {e}");
            std::process::exit(1);
        }
    };
    drop(guard);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = respond(&mut workspace, &line);
        if writeln!(stdout, "{response}").and_then(|()| stdout.flush()).is_err() {
            break;
        }
    }

    tracing::debug!("input closed, shutting down");
}

/// Builds the configuration from `config=<file>` and `key=value` arguments.
fn load_config(args: impl Iterator<Item = String>) -> tree_explorer::Result<Config> {
    let mut pairs = BTreeMap::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(tree_explorer::TreeError::Config(format!(
                "expected key=value but got '{arg}'"
            )));
        };
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }

    let Some(path) = pairs.remove("config") else {
        return Ok(Config::from_map(&pairs));
    };
    let base = Config::from_file(tree_explorer::infrastructure::expand_tilde(&path))?;
    Ok(merge(base, &pairs))
}

/// Applies command-line pairs on top of a file configuration.
fn merge(base: Config, pairs: &BTreeMap<String, String>) -> Config {
    let parsed = Config::from_map(pairs);
    Config {
        viewport_width: pick(pairs, "viewport_width", parsed.viewport_width, base.viewport_width),
        viewport_height: pick(pairs, "viewport_height", parsed.viewport_height, base.viewport_height),
        store_path: pick(pairs, "store_path", parsed.store_path, base.store_path),
        trace_level: parsed.trace_level.or(base.trace_level),
        zoom_multiplier: pick(pairs, "zoom_multiplier", parsed.zoom_multiplier, base.zoom_multiplier),
        show_edit_button: pick(pairs, "show_edit_button", parsed.show_edit_button, base.show_edit_button),
    }
}

fn pick<T>(pairs: &BTreeMap<String, String>, key: &str, given: T, fallback: T) -> T {
    if pairs.contains_key(key) {
        given
    } else {
        fallback
    }
}

/// Handles one request line and renders the response.
fn respond(workspace: &mut Workspace<JsonFileStore>, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable request");
            return json!({ "ok": false, "error": format!("bad request: {e}") });
        }
    };

    let op = request.name();
    let span = tracing::debug_span!("driver_request", otel.name = %format!("driver::{op}"), op = %op);
    let _guard = span.entered();

    match execute(workspace, request) {
        Ok(mut body) => {
            if let Value::Object(map) = &mut body {
                map.insert("ok".to_string(), Value::Bool(true));
            }
            body
        }
        Err(e) => {
            tracing::debug!(error = %e, "request failed");
            json!({ "ok": false, "error": e.to_string() })
        }
    }
}

fn execute(workspace: &mut Workspace<JsonFileStore>, request: Request) -> tree_explorer::Result<Value> {
    Ok(match request {
        Request::Event { event } => {
            let (redraw, effects) = workspace.dispatch(&event)?;
            tracing::debug!(
                event = event.kind(),
                effect_count = effects.len(),
                redraw = redraw,
                "event handled successfully"
            );
            json!({ "redraw": redraw, "effects": effects })
        }
        Request::NewTree => json!({ "storage_key": workspace.new_tree()? }),
        Request::SelectTree { key } => {
            workspace.select_tree(&key)?;
            json!({ "storage_key": key })
        }
        Request::DeleteTree => {
            workspace.delete_current_tree()?;
            json!({ "storage_key": workspace.selected_key() })
        }
        Request::Import {
            file_name,
            content,
            overwrite,
        } => json!({ "storage_key": workspace.import(&file_name, &content, overwrite)? }),
        Request::Export => {
            let exported = workspace.export()?;
            json!({ "file_name": exported.file_name, "json": exported.json })
        }
        Request::Trees => json!({ "trees": workspace.trees()? }),
        Request::Snapshot => json!({ "snapshot": workspace.session_mut().render_snapshot() }),
        Request::Resize { width, height } => {
            workspace.resize(width, height);
            json!({ "width": width, "height": height })
        }
    })
}
