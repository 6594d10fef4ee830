//! # Structure Parsing
//!
//! Scans buffer lines into a navigable tree of typed nodes. Two phases:
//!
//! 1. **Line classification** (`classify`): each line is classified
//!    independently into a [`LineClass`]: headline, list-entry start,
//!    control line, verbatim marker, colon literal, or plain text.
//! 2. **Tree construction** (`builder`): a stack machine consumes the
//!    classified stream and produces an [`OutlineTree`] of span-carrying
//!    nodes.
//!
//! A tree is built fresh for every query and discarded with it; there is no
//! caching across edits. Headline and control-line text extraction is
//! derived on demand from the line text, never stored in the tree.

pub mod builder;
pub mod classify;
pub mod inline;
pub mod rope;
pub mod snapshot;
pub mod tree;

use xi_rope::Rope;

pub use classify::{LineClass, MAX_HEADLINE_LEVEL, OutlineLineClassifier};
pub use tree::{NodeId, NodeKind, OutlineTree};

use rope::{Span, full_lines_in_span, slice_to_string};

/// Parses the given region of the buffer with the default keyword set.
pub fn parse_document(rope: &Rope, region: Span) -> OutlineTree {
    parse_document_with(&OutlineLineClassifier::default(), rope, region)
}

/// Parses the given region with a caller-supplied classifier (custom
/// headline keyword set).
pub fn parse_document_with(
    classifier: &OutlineLineClassifier,
    rope: &Rope,
    region: Span,
) -> OutlineTree {
    let lines = full_lines_in_span(rope, region);
    builder::build(classifier, &lines)
}

/// The node's literal text.
pub fn node_text(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<String> {
    Some(slice_to_string(rope, tree.span(id)?))
}

/// A headline's title, with the keyword and priority stripped when
/// recognized and trailing whitespace removed. Uses the default keyword set.
pub fn headline_title(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<String> {
    match headline_class(rope, tree, id)? {
        (line, LineClass::Headline { title, .. }) => {
            Some(line[title].trim_end().to_string())
        }
        _ => None,
    }
}

/// A headline's tag list, in source order with duplicates preserved.
pub fn headline_tags(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Vec<String> {
    match headline_class(rope, tree, id) {
        Some((_, LineClass::Headline { tags, .. })) => tags,
        _ => Vec::new(),
    }
}

/// A headline's recognized keyword (`TODO`/`DONE` by default), if any.
pub fn headline_keyword(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<String> {
    match headline_class(rope, tree, id)? {
        (_, LineClass::Headline { keyword, .. }) => keyword,
        _ => None,
    }
}

/// A headline's single-letter priority, if any.
pub fn headline_priority(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<char> {
    match headline_class(rope, tree, id)? {
        (_, LineClass::Headline { priority, .. }) => priority,
        _ => None,
    }
}

/// The `(key, value)` of a control-line node.
pub fn control_key_value(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<(String, String)> {
    if !matches!(tree.kind(id), NodeKind::ControlLine) {
        return None;
    }
    let line = node_text(rope, tree, id)?;
    match OutlineLineClassifier::default().classify(&line) {
        LineClass::ControlLine { key, value } => Some((key, value)),
        _ => None,
    }
}

fn headline_class(rope: &Rope, tree: &OutlineTree, id: NodeId) -> Option<(String, LineClass)> {
    if !matches!(tree.kind(id), NodeKind::Headline { .. }) {
        return None;
    }
    let line = node_text(rope, tree, id)?;
    let class = OutlineLineClassifier::default().classify(&line);
    Some((line, class))
}
