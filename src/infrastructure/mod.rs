//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where persisted trees and trace files live.

pub mod paths;

pub use paths::{default_store_path, expand_tilde, get_data_dir};
