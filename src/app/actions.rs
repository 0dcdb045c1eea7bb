//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) mutates the session directly and
//! returns [`Effect`]s for everything it cannot do itself: talking to the host
//! (cursor, text editor, tab titles) and writing to persistence.
//!
//! # Example
//!
//! ```
//! use tree_explorer::app::{Cursor, Effect};
//!
//! let json = serde_json::to_string(&Effect::SetCursor { cursor: Cursor::Move }).unwrap();
//! assert_eq!(json, r#"{"type":"set_cursor","cursor":"move"}"#);
//! ```

use super::modes::Cursor;
use crate::domain::NodeId;
use serde::Serialize;

/// Commands for the host, executed in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Show a different pointer cursor.
    SetCursor {
        /// The new cursor.
        cursor: Cursor,
    },

    /// Open the label editor for a node, pre-filled with its text.
    OpenTextEditor {
        /// Node being edited.
        id: NodeId,
        /// Current label.
        text: String,
    },

    /// Hide the label editor.
    CloseTextEditor,

    /// Write the session's history to its storage key.
    ///
    /// Emitted once per committed click or edit, and once per resize gesture
    /// on pointer release.
    Persist,

    /// The root label changed; tab titles need refreshing.
    TreeTitleChanged {
        /// New root label.
        title: String,
    },
}
