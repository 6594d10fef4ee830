use super::classify::{LineClass, OutlineLineClassifier, leading_spaces};
use super::rope::lines::LineRef;
use super::rope::span::Span;
use super::tree::{NodeId, NodeKind, OutlineTree};

/// Stack depth of the permanent `[Root, Section(0)]` base.
const STACK_BASE: usize = 2;

/// Builds an [`OutlineTree`] from classified lines.
///
/// The builder walks the line list once, keeping an explicit stack of open
/// nodes (top = innermost container) plus a stack of saved lengths that act
/// as context boundaries: a sub-scope (list, verbatim block) runs against a
/// checkpoint and the stack is truncated back to it when the scope ends, so
/// a scope that consumes nothing unwinds cleanly.
pub fn build(classifier: &OutlineLineClassifier, lines: &[LineRef]) -> OutlineTree {
    let mut builder = OutlineTreeBuilder::new(classifier);
    let mut input = ParserInput::new(lines);
    builder.global_scope(&mut input);
    builder.finish()
}

struct ParserInput<'a> {
    lines: &'a [LineRef],
    index: usize,
}

impl<'a> ParserInput<'a> {
    fn new(lines: &'a [LineRef]) -> Self {
        Self { lines, index: 0 }
    }

    fn current(&self) -> Option<&'a LineRef> {
        self.lines.get(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
    }
}

struct OutlineTreeBuilder<'a> {
    classifier: &'a OutlineLineClassifier,
    tree: OutlineTree,
    stack: Vec<NodeId>,
    contexts: Vec<usize>,
}

impl<'a> OutlineTreeBuilder<'a> {
    fn new(classifier: &'a OutlineLineClassifier) -> Self {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let base_section = tree.add_node(root, NodeKind::Section { level: 0 });
        Self {
            classifier,
            tree,
            stack: vec![root, base_section],
            contexts: vec![STACK_BASE],
        }
    }

    fn finish(self) -> OutlineTree {
        self.tree
    }

    fn top(&self) -> NodeId {
        *self
            .stack
            .last()
            .expect("builder stack holds at least the root section")
    }

    fn push(&mut self, id: NodeId) {
        self.stack.push(id);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn extend_top(&mut self, span: Span) {
        let top = self.top();
        self.tree.extend_span(top, span);
    }

    fn enter_context(&mut self) -> usize {
        let mark = self.stack.len();
        self.contexts.push(mark);
        mark
    }

    fn exit_context(&mut self, mark: usize) {
        self.contexts.pop();
        self.stack.truncate(mark);
    }

    fn is_context_empty(&self) -> bool {
        self.stack.len() <= self.contexts.last().copied().unwrap_or(STACK_BASE)
    }

    fn global_scope(&mut self, input: &mut ParserInput) {
        while let Some(line) = input.current() {
            let span = line.span;
            match self.classifier.classify(&line.text) {
                LineClass::Headline { level, .. } => {
                    self.open_section(level, span);
                    input.advance();
                }
                LineClass::ListEntryStart { .. } => {
                    let mark = self.enter_context();
                    self.list_scope(input);
                    self.exit_context(mark);
                }
                LineClass::VerbatimBegin { name } => {
                    let mark = self.enter_context();
                    self.verbatim_block(input, Some(&name));
                    self.exit_context(mark);
                }
                LineClass::ColonLiteral => {
                    let mark = self.enter_context();
                    self.verbatim_block(input, None);
                    self.exit_context(mark);
                }
                LineClass::ControlLine { .. } => {
                    let control = self.tree.add_node(self.top(), NodeKind::ControlLine);
                    self.tree.extend_span(control, span);
                    input.advance();
                }
                // A stray END marker is ordinary text here.
                LineClass::VerbatimEnd { .. } | LineClass::PlainText => {
                    self.extend_top(span);
                    input.advance();
                }
            }
        }
    }

    /// Opens a section for a headline of `level`: closes every section at
    /// the same or deeper level, then nests the new one under the first
    /// shallower section (the synthetic level-0 section guarantees one).
    fn open_section(&mut self, level: usize, span: Span) {
        while !matches!(self.tree.kind(self.top()), NodeKind::Section { level: open } if open < level)
        {
            self.pop();
        }
        let section = self.tree.add_node(self.top(), NodeKind::Section { level });
        let headline = self.tree.add_node(section, NodeKind::Headline { level });
        self.push(section);
        self.tree.extend_span(headline, span);
    }

    /// Consumes a run of list lines. Entered with the current line matching
    /// a list-entry start; ends on a top-level marker (handed back), a pair
    /// of blank lines (consumed and discarded), a continuation line that
    /// escapes the context (handed back), or end of input.
    fn list_scope(&mut self, input: &mut ParserInput) {
        let mut blank_run = 0;
        while let Some(line) = input.current() {
            if line.text.starts_with('*') {
                return;
            }
            if line.text.trim().is_empty() {
                blank_run += 1;
                input.advance();
                if blank_run >= 2 {
                    return;
                }
                continue;
            }
            blank_run = 0;

            let span = line.span;
            let indent = leading_spaces(&line.text);
            if let LineClass::ListEntryStart { indent } = self.classifier.classify(&line.text) {
                // Close deeper lists and entries at the same or deeper
                // indent; an entry only swallows strictly deeper lines.
                while matches!(self.tree.kind(self.top()), NodeKind::List { indent: open } if open > indent)
                    || matches!(self.tree.kind(self.top()), NodeKind::ListEntry { indent: open } if open >= indent)
                {
                    self.pop();
                }
                if !matches!(self.tree.kind(self.top()), NodeKind::List { indent: open } if open == indent)
                {
                    let list = self.tree.add_node(self.top(), NodeKind::List { indent });
                    self.push(list);
                }
                let entry = self.tree.add_node(self.top(), NodeKind::ListEntry { indent });
                self.push(entry);
                self.tree.extend_span(entry, span);
                input.advance();
                continue;
            }

            // Continuation text: fold into the innermost entry shallower
            // than this line, or escape the list if none is open.
            while !self.is_context_empty()
                && !matches!(self.tree.kind(self.top()), NodeKind::ListEntry { indent: open } if open < indent)
            {
                self.pop();
            }
            if self.is_context_empty() {
                return;
            }
            self.extend_top(span);
            input.advance();
        }
    }

    /// Consumes a verbatim block. `name` pairs a `#+BEGIN_<NAME>` line with
    /// its END marker; `None` is a colon-literal block, which runs until the
    /// first non-colon-prefixed line and folds that terminating line into
    /// the block as well.
    ///
    /// Interior lines are folded without reclassification. An unterminated
    /// block extends to the end of the scanned region.
    fn verbatim_block(&mut self, input: &mut ParserInput, name: Option<&str>) {
        let Some(line) = input.current() else {
            return;
        };
        let block = self.tree.add_node(self.top(), NodeKind::VerbatimBlock);
        self.push(block);
        self.tree.extend_span(block, line.span);
        input.advance();

        while let Some(line) = input.current() {
            let terminated = match name {
                Some(open) => matches!(
                    self.classifier.classify(&line.text),
                    LineClass::VerbatimEnd { name: close } if close == open
                ),
                None => !matches!(
                    self.classifier.classify(&line.text),
                    LineClass::ColonLiteral
                ),
            };
            self.tree.extend_span(block, line.span);
            input.advance();
            if terminated {
                break;
            }
        }
        self.pop();
    }
}
