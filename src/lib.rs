//! shell-walk - One-level dispatch over a shell syntax tree
//!
//! `walk::dispatch` hands each immediate child of a node to a caller-supplied
//! `Handler`, in grammar order. The handler decides whether to go deeper by
//! dispatching the child in turn, and may edit nodes in place as it goes.

pub mod ast;
pub mod cli;
pub mod handlers;
pub mod walk;

pub use ast::node::{Node, NodeKind};
pub use ast::types::*;
pub use walk::{
    children, descend_word, dispatch, handler_fn, walk_all, walk_all_with_words, Flow, Handler, Recursive,
};
