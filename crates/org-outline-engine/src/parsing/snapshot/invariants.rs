use xi_rope::Rope;

use crate::parsing::rope::span::Span;
use crate::parsing::tree::{NodeId, NodeKind, OutlineTree};

/// Checks the structural invariants of a parsed tree, panicking with context
/// on violation. Test-support only; the parser is expected to uphold these
/// for arbitrary input.
pub fn check(rope: &Rope, tree: &OutlineTree) {
    check_node(rope.len(), tree, tree.root());
}

fn check_node(buffer_len: usize, tree: &OutlineTree, id: NodeId) {
    let span = tree.span(id);
    if let Some(sp) = span {
        assert!(
            sp.start <= sp.end && sp.end <= buffer_len,
            "node span out of bounds: {sp:?} (buffer len {buffer_len})"
        );
    }

    let children = tree.children(id);
    let mut previous: Option<Span> = None;
    for &child in children {
        assert_eq!(tree.parent(child), Some(id), "child's parent link is wrong");
        let Some(child_span) = tree.span(child) else {
            continue;
        };
        if let Some(parent_span) = span {
            assert!(
                parent_span.start <= child_span.start && child_span.end <= parent_span.end,
                "child span {child_span:?} escapes parent span {parent_span:?}"
            );
        }
        if let Some(prev) = previous {
            assert!(
                prev.end <= child_span.start,
                "children overlap or are out of order: {prev:?} then {child_span:?}"
            );
        }
        previous = Some(child_span);
    }

    match tree.kind(id) {
        NodeKind::Section { level } => {
            for &child in children {
                if let NodeKind::Section { level: child_level } = tree.kind(child) {
                    assert!(
                        child_level > level,
                        "section level {child_level} nested under level {level}"
                    );
                }
            }
        }
        NodeKind::ListEntry { indent } => {
            for &child in children {
                if let NodeKind::List {
                    indent: child_indent,
                } = tree.kind(child)
                {
                    assert!(
                        child_indent > indent,
                        "list indent {child_indent} nested under entry indent {indent}"
                    );
                }
            }
        }
        NodeKind::VerbatimBlock => {
            assert!(children.is_empty(), "verbatim blocks are leaves");
        }
        _ => {}
    }

    for &child in children {
        check_node(buffer_len, tree, child);
    }
}
