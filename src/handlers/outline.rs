//! Outline Handler
//!
//! Writes one line per node, indented by depth, with a short label where
//! the node carries a name or text.

use crate::ast::node::Node;
use crate::ast::types::Script;
use crate::walk::{dispatch, Handler};
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("failed to write outline: {0}")]
    Write(#[from] fmt::Error),
}

pub struct Outline<W> {
    out: W,
    depth: usize,
    /// Levels below the starting node to print; `None` for all
    max_depth: Option<usize>,
}

impl<W: Write> Outline<W> {
    pub fn new(out: W, max_depth: Option<usize>) -> Self {
        Self {
            out,
            depth: 0,
            max_depth,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_node(&mut self, node: &Node<'_>) -> fmt::Result {
        write!(self.out, "{:indent$}{}", "", node.kind(), indent = self.depth * 2)?;
        if let Some(label) = label(node) {
            write!(self.out, " {}", label)?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> Handler for Outline<W> {
    type Error = OutlineError;

    fn handle(&mut self, node: Node<'_>) -> Result<(), OutlineError> {
        self.write_node(&node)?;
        if self.max_depth.map_or(true, |max| self.depth < max) {
            self.depth += 1;
            let result = dispatch(node, self);
            self.depth -= 1;
            result?;
        }
        Ok(())
    }
}

fn label(node: &Node<'_>) -> Option<String> {
    match node {
        Node::Statement(n) => n.next.as_ref().map(|chain| chain.operator.to_string()),
        Node::Pipeline(n) if n.negated => Some("!".to_string()),
        Node::Assignment(n) => Some(format!("{}{}", n.name, if n.append { "+=" } else { "=" })),
        Node::Redirection(n) => Some(match n.fd {
            Some(fd) => format!("{}{}", fd, n.operator),
            None => n.operator.to_string(),
        }),
        Node::ForLoop(n) => n.variable.as_ref().map(|v| v.name.clone()),
        Node::SelectMenu(n) => Some(n.variable.name.clone()),
        Node::FunctionDef(n) => Some(n.name.name.clone()),
        Node::WhileLoop(n) if n.until => Some("until".to_string()),
        Node::Grouping(n) => Some(if n.subshell { "( )" } else { "{ }" }.to_string()),
        Node::TestExpr(n) => {
            let words: Vec<String> = n.words.iter().map(|w| w.to_plain_string()).collect();
            let (open, close) = if n.extended { ("[[", "]]") } else { ("[", "]") };
            Some(format!("{} {} {}", open, words.join(" "), close))
        }
        Node::ParameterExpansion(n) if !n.operator.is_empty() => Some(n.operator.clone()),
        Node::Word(n) => Some(n.to_plain_string()),
        Node::Literal(n) => Some(format!("{:?}", n.value)),
        Node::Token(n) => Some(n.text.clone()),
        Node::Identifier(n) => Some(n.name.clone()),
        _ => None,
    }
}

/// Outline of a whole script as a string.
pub fn outline(script: &mut Script, max_depth: Option<usize>) -> Result<String, OutlineError> {
    let mut outline = Outline::new(String::new(), max_depth);
    outline.handle(Node::Script(script))?;
    Ok(outline.into_inner())
}
