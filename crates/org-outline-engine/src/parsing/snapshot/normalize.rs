use serde::Serialize;
use xi_rope::Rope;

use crate::parsing::rope::preview;
use crate::parsing::tree::{NodeId, NodeKind, OutlineTree};

/// A stable, serializable dump of a parsed tree for test assertions.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Snap {
    pub root: NodeSnap,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NodeSnap {
    pub kind: String,
    pub span: Option<(usize, usize)>,
    pub text: String,
    pub children: Vec<NodeSnap>,
}

pub fn normalize(rope: &Rope, tree: &OutlineTree) -> Snap {
    Snap {
        root: snap_node(rope, tree, tree.root()),
    }
}

fn snap_node(rope: &Rope, tree: &OutlineTree, id: NodeId) -> NodeSnap {
    let kind = match tree.kind(id) {
        NodeKind::Root => "Root".to_string(),
        NodeKind::Section { level } => format!("Section({level})"),
        NodeKind::Headline { level } => format!("Headline({level})"),
        NodeKind::List { indent } => format!("List({indent})"),
        NodeKind::ListEntry { indent } => format!("ListEntry({indent})"),
        NodeKind::ControlLine => "ControlLine".to_string(),
        NodeKind::VerbatimBlock => "VerbatimBlock".to_string(),
    };
    let span = tree.span(id);
    NodeSnap {
        kind,
        span: span.map(|sp| (sp.start, sp.end)),
        text: span.map(|sp| preview(rope, sp, 60)).unwrap_or_default(),
        children: tree
            .children(id)
            .iter()
            .map(|&child| snap_node(rope, tree, child))
            .collect(),
    }
}
