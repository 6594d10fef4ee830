use super::rope::span::Span;

/// Handle to a node in an [`OutlineTree`] arena.
///
/// Identity is the handle itself: sibling lookup and equality compare ids,
/// never structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// The closed set of node kinds.
///
/// Matching on this enum is how every consumer branches on node type; the
/// nesting invariants (section levels, list indents) live in the kind data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Top of every tree; exactly one per parse.
    Root,
    /// A headline plus its subordinate content and nested sections. The
    /// synthetic section under the root has level 0.
    Section { level: usize },
    /// The literal headline line; first child of its section.
    Headline { level: usize },
    /// Groups consecutive entries sharing one indent column.
    List { indent: usize },
    /// One list item, including continuation lines and nested sub-lists.
    ListEntry { indent: usize },
    /// A `#+KEY: value` directive line.
    ControlLine,
    /// A begin/end or colon-literal span whose interior is never
    /// reinterpreted as structure.
    VerbatimBlock,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    span: Option<Span>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed document structure tree.
///
/// Nodes live in an arena; parents own their ordered child lists, and the
/// parent link is a plain id (non-owning, used for upward span propagation
/// and sibling lookup). A tree is built fresh for every parse and discarded
/// with the issuing operation.
#[derive(Debug)]
pub struct OutlineTree {
    nodes: Vec<NodeData>,
}

impl OutlineTree {
    /// Creates a tree holding only a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                span: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new node as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// The node's extent, if any line has been folded into it or a
    /// descendant. A node that never received a line has no span.
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Folds `span` into the node's extent and propagates the extension up
    /// the parent chain, unconditionally, so an ancestor's span always spans
    /// the union of all lines folded into any descendant.
    pub fn extend_span(&mut self, id: NodeId, span: Span) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &mut self.nodes[current.0 as usize];
            match node.span.as_mut() {
                Some(existing) => existing.extend(span),
                None => node.span = Some(span),
            }
            cursor = node.parent;
        }
    }

    /// Lazy post-order traversal: every descendant is yielded before the
    /// node itself. Each call starts fresh from `from`.
    pub fn depth_first(&self, from: NodeId) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![(from, 0)],
        }
    }

    /// Finds the deepest node at or below `from` whose span contains
    /// `point` (half-open test). Children spans are disjoint and ordered, so
    /// at most one child matches at each level.
    pub fn node_at_point(&self, from: NodeId, point: usize) -> Option<NodeId> {
        if !self.span(from)?.contains(point) {
            return None;
        }
        let mut current = from;
        'descend: loop {
            for &child in self.children(current) {
                if self.span(child).is_some_and(|sp| sp.contains(point)) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// The sibling `offset` positions away among all of the node's siblings.
    pub fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        self.sibling_by(id, offset, |_| true)
    }

    /// The sibling `offset` positions away, counted within the subsequence
    /// of siblings whose kind matches `pred` (relative order preserved).
    ///
    /// Returns `None` for the root (no parent), when the node itself does
    /// not match `pred`, or when the target index is out of range.
    pub fn sibling_by(
        &self,
        id: NodeId,
        offset: isize,
        pred: impl Fn(NodeKind) -> bool,
    ) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| pred(self.kind(c)))
            .collect();
        let index = siblings.iter().position(|&c| c == id)?;
        let target = index as isize + offset;
        if target < 0 {
            return None;
        }
        siblings.get(target as usize).copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, 1)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, -1)
    }

    /// Walks up from `id` (inclusive) to the first node matching `pred`.
    pub fn ancestor_or_self(
        &self,
        id: NodeId,
        pred: impl Fn(NodeKind) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if pred(self.kind(current)) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }
}

impl Default for OutlineTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Post-order iterator over a subtree. See [`OutlineTree::depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a OutlineTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let top = self.stack.last_mut()?;
            let (id, child_index) = *top;
            let children = self.tree.children(id);
            if child_index < children.len() {
                top.1 += 1;
                self.stack.push((children[child_index], 0));
            } else {
                self.stack.pop();
                return Some(id);
            }
        }
    }
}
