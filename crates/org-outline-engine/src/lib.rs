//! Document structure engine for org-style outline markup.
//!
//! Parses a live text buffer into a tree of sections, headlines, lists,
//! control lines, and verbatim blocks, and provides the node-relative query
//! and mutation primitives (point containment, sibling lookup, region swap
//! with cursor/fold projection) that editing commands build on. Every
//! operation parses fresh from the buffer; trees are never cached across
//! edits.

pub mod editing;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, EditError, Patch, swap_spans};
pub use parsing::{NodeId, NodeKind, OutlineTree, parse_document};
pub use parsing::rope::Span;
