//! Variable Renaming
//!
//! Renames a shell variable everywhere it is named: assignments, `$VAR` and
//! `${VAR...}` expansions (including those nested in words, test
//! expressions and command substitutions), for/select loop variables and
//! bare names inside arithmetic. Function names are left alone, and so are
//! bare words in assignment subscripts, since `assoc[key]=v` may be a
//! string key.

use crate::ast::node::Node;
use crate::ast::types::*;
use crate::walk::{descend_word, dispatch, Handler};
use log::debug;
use std::convert::Infallible;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("expected OLD=NEW, got '{0}'")]
    MissingSeparator(String),

    #[error("'{0}' is not a valid variable name")]
    InvalidName(String),
}

/// A parsed `OLD=NEW` rename request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
}

impl FromStr for RenameRule {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('=')
            .ok_or_else(|| RenameError::MissingSeparator(s.to_string()))?;
        for name in [from, to] {
            if !is_valid_name(name) {
                return Err(RenameError::InvalidName(name.to_string()));
            }
        }
        Ok(RenameRule {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub struct Renamer<'s> {
    rule: &'s RenameRule,
    renamed: usize,
}

impl<'s> Renamer<'s> {
    pub fn new(rule: &'s RenameRule) -> Self {
        Self { rule, renamed: 0 }
    }

    /// Number of names changed so far
    pub fn renamed(&self) -> usize {
        self.renamed
    }

    fn rename(&mut self, ident: &mut Identifier) {
        if ident.name == self.rule.from {
            ident.name.clone_from(&self.rule.to);
            self.renamed += 1;
        }
    }

    /// An arithmetic word naming the variable without `$`: `$((i + 1))`
    fn rename_bare(&mut self, word: &mut Word) -> bool {
        match word.parts.as_mut_slice() {
            [WordPart::Literal(literal)]
                if literal.quoting == Quoting::Unquoted && literal.value == self.rule.from =>
            {
                literal.value.clone_from(&self.rule.to);
                self.renamed += 1;
                true
            }
            _ => false,
        }
    }

    fn arithmetic(&mut self, tokens: &mut [ArithToken]) -> Result<(), Infallible> {
        for token in tokens {
            if let ArithToken::Word(word) = &mut *token {
                if self.rename_bare(word) {
                    continue;
                }
            }
            self.handle(Node::from(token))?;
        }
        Ok(())
    }
}

impl Handler for Renamer<'_> {
    type Error = Infallible;

    fn handle(&mut self, node: Node<'_>) -> Result<(), Infallible> {
        match node {
            Node::Identifier(ident) => {
                self.rename(ident);
                Ok(())
            }
            Node::ForLoop(for_loop) => {
                if let Some(variable) = &mut for_loop.variable {
                    self.rename(variable);
                }
                dispatch(Node::ForLoop(for_loop), self)
            }
            Node::SelectMenu(select) => {
                self.rename(&mut select.variable);
                dispatch(Node::SelectMenu(select), self)
            }
            Node::Arithmetic(arith) => self.arithmetic(&mut arith.tokens),
            Node::Word(word) => descend_word(word, self),
            Node::TestExpr(test) => {
                for word in &mut test.words {
                    descend_word(word, self)?;
                }
                Ok(())
            }
            node => dispatch(node, self),
        }
    }
}

/// Renames `rule.from` to `rule.to` throughout `script` and returns the
/// number of names changed.
pub fn rename_variable(script: &mut Script, rule: &RenameRule) -> usize {
    let mut renamer = Renamer::new(rule);
    match renamer.handle(Node::Script(script)) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    debug!("renamed {} occurrence(s) of {} to {}", renamer.renamed(), rule.from, rule.to);
    renamer.renamed()
}
