//! Handler Abstraction
//!
//! A handler is invoked once per child the dispatcher enumerates. It decides
//! whether to go deeper by calling `dispatch` on the child it received.

use crate::ast::node::Node;

/// Capability invoked on each enumerated child.
///
/// Returning an error stops the enclosing enumeration at once and the error
/// reaches the caller of `dispatch` unchanged.
pub trait Handler {
    type Error;

    fn handle(&mut self, node: Node<'_>) -> Result<(), Self::Error>;
}

impl<F, E> Handler for F
where
    F: FnMut(Node<'_>) -> Result<(), E>,
{
    type Error = E;

    fn handle(&mut self, node: Node<'_>) -> Result<(), E> {
        self(node)
    }
}

/// Pins a closure to the handler signature so its argument lifetime and
/// error type are inferred without annotations at the call site.
pub fn handler_fn<F, E>(f: F) -> F
where
    F: FnMut(Node<'_>) -> Result<(), E>,
{
    f
}
