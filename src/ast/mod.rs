//! Abstract Syntax Tree (AST) Types for Shell Scripts
//!
//! `types` holds the owned node model; `node` holds the borrowed `Node`
//! view the walker hands to handlers.

pub mod node;
pub mod types;
