//! Node counts per kind, in first-seen order.

use crate::ast::node::{Node, NodeKind};
use crate::walk::{Flow, Handler, Recursive};
use indexmap::IndexMap;
use std::convert::Infallible;

/// Counts every node under `root`, the root included.
///
/// With `include_words` the parts inside words are counted as well.
pub fn kind_stats<'n>(root: impl Into<Node<'n>>, include_words: bool) -> IndexMap<NodeKind, usize> {
    let mut counts: IndexMap<NodeKind, usize> = IndexMap::new();
    let result = Recursive::new(|node: &mut Node<'_>| {
        *counts.entry(node.kind()).or_insert(0) += 1;
        Ok::<_, Infallible>(Flow::Descend)
    })
    .descend_words(include_words)
    .handle(root.into());
    match result {
        Ok(()) => counts,
        Err(never) => match never {},
    }
}

/// One `kind count` line per entry, names padded to a common width.
pub fn render_stats(counts: &IndexMap<NodeKind, usize>) -> String {
    let width = counts.keys().map(|kind| kind.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for (kind, count) in counts {
        out.push_str(&format!("{:<width$} {}\n", kind.name(), count, width = width));
    }
    out
}
