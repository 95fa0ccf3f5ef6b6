//! Built-in Handlers
//!
//! Ready-made handlers layered on `walk::dispatch`:
//! - outline: indented tree of node kinds
//! - stats: node counts per kind
//! - rename: rename a variable across assignments and expansions

pub mod outline;
pub mod rename;
pub mod stats;

pub use outline::{outline, Outline, OutlineError};
pub use rename::{rename_variable, RenameError, RenameRule, Renamer};
pub use stats::{kind_stats, render_stats};
