//! Event-sourced tree state.
//!
//! - [`table`]: the derived node table and the fold step for one action
//! - [`store`]: the history-owning [`TreeStore`]

pub mod store;
pub mod table;

pub use store::TreeStore;
pub use table::{NodeTable, TreeChange};
