//! Tree Walking
//!
//! `dispatch` enumerates the immediate children of one node and hands each
//! to a `Handler`. Depth is up to the handler: it recurses by calling
//! `dispatch` on the child it was given, prunes by returning `Ok(())`
//! without doing so, and aborts the whole walk by returning an error.

pub mod dispatch;
pub mod handler;
pub mod recursive;

pub use dispatch::dispatch;
pub use handler::{handler_fn, Handler};
pub use recursive::{children, descend_word, walk_all, walk_all_with_words, Flow, Recursive};
