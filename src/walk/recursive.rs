//! Opt-in Recursion Helpers
//!
//! `dispatch` only ever goes one level down. The helpers here are ordinary
//! handlers and functions built on top of it for callers that want a full
//! pre-order walk, a list of child kinds, or a way into word internals.

use crate::ast::node::{Node, NodeKind};
use crate::ast::types::Word;
use crate::walk::dispatch::dispatch;
use crate::walk::handler::{handler_fn, Handler};
use std::convert::Infallible;

/// What a `Recursive` callback wants done with the node it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Dispatch the node's children next
    Descend,
    /// Skip the node's subtree
    Prune,
}

/// Handler that calls `visit` on every node and keeps descending until the
/// callback prunes or fails.
///
/// Words are leaves for the dispatcher. With `into_words` set, a word that
/// gets `Flow::Descend` has its parts walked through `descend_word`.
pub struct Recursive<F> {
    visit: F,
    into_words: bool,
}

impl<F, E> Recursive<F>
where
    F: FnMut(&mut Node<'_>) -> Result<Flow, E>,
{
    pub fn new(visit: F) -> Self {
        Self {
            visit,
            into_words: false,
        }
    }

    /// Walk word parts as well; see `descend_word`.
    pub fn descend_words(mut self, into_words: bool) -> Self {
        self.into_words = into_words;
        self
    }
}

impl<F, E> Handler for Recursive<F>
where
    F: FnMut(&mut Node<'_>) -> Result<Flow, E>,
{
    type Error = E;

    fn handle(&mut self, mut node: Node<'_>) -> Result<(), E> {
        if (self.visit)(&mut node)? == Flow::Prune {
            return Ok(());
        }
        match node {
            Node::Word(word) if self.into_words => descend_word(word, self),
            node => dispatch(node, self),
        }
    }
}

/// Pre-order walk of `root` and everything below it.
///
/// The root itself is passed to `visit` first.
pub fn walk_all<'n, F, E>(root: impl Into<Node<'n>>, visit: F) -> Result<(), E>
where
    F: FnMut(&mut Node<'_>) -> Result<Flow, E>,
{
    Recursive::new(visit).handle(root.into())
}

/// Like `walk_all`, but also walks the expansion parts inside words.
pub fn walk_all_with_words<'n, F, E>(root: impl Into<Node<'n>>, visit: F) -> Result<(), E>
where
    F: FnMut(&mut Node<'_>) -> Result<Flow, E>,
{
    Recursive::new(visit).descend_words(true).handle(root.into())
}

/// Offers each part of `word` to `handler`: literals, parameter expansions,
/// command substitutions, arithmetic and brace expansions.
pub fn descend_word<H>(word: &mut Word, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    for part in &mut word.parts {
        handler.handle(Node::from(part))?;
    }
    Ok(())
}

/// Kinds of the immediate children of `node`, in dispatch order.
pub fn children<'n>(node: impl Into<Node<'n>>) -> Vec<NodeKind> {
    let mut kinds = Vec::new();
    let result = dispatch(
        node,
        &mut handler_fn(|child| {
            kinds.push(child.kind());
            Ok::<(), Infallible>(())
        }),
    );
    match result {
        Ok(()) => kinds,
        Err(never) => match never {},
    }
}
