use std::sync::OnceLock;

use regex::Regex;

use crate::editing::swap::swap_spans;
use crate::editing::{Document, EditError, Patch};
use crate::parsing::rope::span::Span;
use crate::parsing::{LineClass, NodeKind, OutlineLineClassifier};

/// Structural editing commands.
///
/// Every command requires the single empty cursor; a command whose pattern
/// does not apply at the cursor is a no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Swap the node under the cursor (list entry, else section) with its
    /// previous sibling of the same kind.
    MoveNodeUp,
    /// Same, with the next sibling.
    MoveNodeDown,
    /// Flip the `[ ]`/`[X]` tick of the list entry line under the cursor.
    ToggleCheckbox,
    /// Rotate the status word after the line's marker: `"" → TODO → DONE`.
    CycleTodoState { forward: bool },
}

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\s+\*|\s*[-+]|\s*[0-9]*\.|\s[a-zA-Z]\.)\s+\[(.)\]")
            .expect("invalid checkbox regex")
    })
}

fn todo_status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(([-+*]|\*+)\s)(\s*\w+\b\s*|\s*)?").expect("invalid status regex")
    })
}

pub(crate) fn apply(doc: &mut Document, cmd: Cmd) -> Result<Patch, EditError> {
    match cmd {
        Cmd::MoveNodeUp => move_node(doc, true),
        Cmd::MoveNodeDown => move_node(doc, false),
        Cmd::ToggleCheckbox => toggle_checkbox(doc),
        Cmd::CycleTodoState { forward } => cycle_todo_state(doc, forward),
    }
}

fn noop(doc: &Document) -> Patch {
    Patch {
        changed: Vec::new(),
        new_selection: doc.selection(),
        version: doc.version(),
    }
}

fn toggle_checkbox(doc: &mut Document) -> Result<Patch, EditError> {
    let cursor = doc.cursor()?;
    let line_span = doc.line_span_at(cursor);
    let line = doc.substr(line_span);
    let stripped = line.trim_end_matches(['\r', '\n']);

    let Some(tick) = checkbox_re().captures(stripped).and_then(|caps| caps.get(1)) else {
        return Ok(noop(doc));
    };
    let tick_span = Span::new(line_span.start + tick.start(), line_span.start + tick.end());
    let next = match tick.as_str() {
        " " => "X",
        _ => " ",
    };
    doc.replace(tick_span, next);
    Ok(Patch {
        changed: vec![tick_span.start..tick_span.start + next.len()],
        new_selection: doc.selection(),
        version: doc.version(),
    })
}

fn cycle_todo_state(doc: &mut Document, forward: bool) -> Result<Patch, EditError> {
    const STATUS_LIST: [&str; 3] = ["", "TODO", "DONE"];

    let cursor = doc.cursor()?;
    let line_span = doc.line_span_at(cursor);
    let line = doc.substr(line_span);
    let stripped = line.trim_end_matches(['\r', '\n']);

    let Some(caps) = todo_status_re().captures(stripped) else {
        return Ok(noop(doc));
    };
    let status_start = caps.get(1).map_or(0, |marker| marker.end());
    let (status_text, status_end) = match caps.get(3) {
        Some(status) => (status.as_str(), status.end()),
        None => ("", status_start),
    };

    // An unknown word after the marker is left alone; the new status is
    // inserted in front of it.
    let (index, status_end) = match STATUS_LIST
        .iter()
        .position(|status| *status == status_text.trim())
    {
        Some(index) => (index, status_end),
        None => (0, status_start),
    };

    let step: isize = if forward { 1 } else { -1 };
    let next = STATUS_LIST[(index as isize + step).rem_euclid(STATUS_LIST.len() as isize) as usize];
    let replacement = if next.is_empty() {
        String::new()
    } else {
        format!("{next} ")
    };

    let status_span = Span::new(line_span.start + status_start, line_span.start + status_end);
    doc.replace(status_span, &replacement);
    Ok(Patch {
        changed: vec![status_span.start..status_span.start + replacement.len()],
        new_selection: doc.selection(),
        version: doc.version(),
    })
}

fn move_node(doc: &mut Document, up: bool) -> Result<Patch, EditError> {
    let cursor = doc.cursor()?;
    let line = doc.substr(doc.line_span_at(cursor));
    let on_list_entry = matches!(
        OutlineLineClassifier::default().classify(&line),
        LineClass::ListEntryStart { .. }
    );
    if on_list_entry {
        move_sibling(doc, cursor, up, |kind| {
            matches!(kind, NodeKind::ListEntry { .. })
        })
    } else {
        move_sibling(doc, cursor, up, |kind| {
            matches!(kind, NodeKind::Section { level } if level > 0)
        })
    }
}

/// Swaps the nearest enclosing node matching `kind` with its neighboring
/// sibling of the same kind. No such node or no such sibling is a no-op.
fn move_sibling(
    doc: &mut Document,
    cursor: usize,
    up: bool,
    kind: impl Fn(NodeKind) -> bool,
) -> Result<Patch, EditError> {
    let tree = doc.outline();
    let Some(hit) = tree.node_at_point(tree.root(), cursor) else {
        return Ok(noop(doc));
    };
    let Some(node) = tree.ancestor_or_self(hit, &kind) else {
        return Ok(noop(doc));
    };
    let offset = if up { -1 } else { 1 };
    let Some(other) = tree.sibling_by(node, offset, &kind) else {
        return Ok(noop(doc));
    };
    let (Some(node_span), Some(other_span)) = (tree.span(node), tree.span(other)) else {
        return Ok(noop(doc));
    };
    swap_spans(doc, node_span, other_span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_checkbox_both_ways() {
        let mut doc = Document::from_text(" - [ ] milk\n - [X] eggs\n");
        doc.set_cursor(3);
        doc.apply(Cmd::ToggleCheckbox).unwrap();
        assert_eq!(doc.text(), " - [X] milk\n - [X] eggs\n");

        doc.set_cursor(14);
        doc.apply(Cmd::ToggleCheckbox).unwrap();
        assert_eq!(doc.text(), " - [X] milk\n - [ ] eggs\n");
    }

    #[test]
    fn unknown_tick_mark_resets_to_unchecked() {
        let mut doc = Document::from_text(" - [?] odd\n");
        doc.set_cursor(0);
        doc.apply(Cmd::ToggleCheckbox).unwrap();
        assert_eq!(doc.text(), " - [ ] odd\n");
    }

    #[test]
    fn checkbox_is_noop_off_a_list_entry() {
        let mut doc = Document::from_text("plain text\n");
        doc.set_cursor(0);
        let patch = doc.apply(Cmd::ToggleCheckbox).unwrap();
        assert!(patch.changed.is_empty());
        assert_eq!(doc.text(), "plain text\n");
    }

    #[test]
    fn cycles_todo_state_forward_and_back() {
        let mut doc = Document::from_text("* headline\n");
        doc.set_cursor(0);
        doc.apply(Cmd::CycleTodoState { forward: true }).unwrap();
        assert_eq!(doc.text(), "* TODO headline\n");
        doc.apply(Cmd::CycleTodoState { forward: true }).unwrap();
        assert_eq!(doc.text(), "* DONE headline\n");
        doc.apply(Cmd::CycleTodoState { forward: true }).unwrap();
        assert_eq!(doc.text(), "* headline\n");

        doc.apply(Cmd::CycleTodoState { forward: false }).unwrap();
        assert_eq!(doc.text(), "* DONE headline\n");
    }

    #[test]
    fn cycle_todo_state_works_on_list_markers() {
        let mut doc = Document::from_text("- task one\n");
        doc.set_cursor(2);
        doc.apply(Cmd::CycleTodoState { forward: true }).unwrap();
        assert_eq!(doc.text(), "- TODO task one\n");
    }

    #[test]
    fn moves_list_entry_past_its_sibling() {
        let mut doc = Document::from_text(" - alpha\n - beta\n - gamma\n");
        doc.set_cursor(10); // inside " - beta\n"
        doc.apply(Cmd::MoveNodeUp).unwrap();
        assert_eq!(doc.text(), " - beta\n - alpha\n - gamma\n");

        // cursor traveled with the moved entry
        doc.apply(Cmd::MoveNodeDown).unwrap();
        assert_eq!(doc.text(), " - alpha\n - beta\n - gamma\n");
    }

    #[test]
    fn move_is_noop_at_the_list_boundary() {
        let mut doc = Document::from_text(" - alpha\n - beta\n");
        doc.set_cursor(0);
        let patch = doc.apply(Cmd::MoveNodeUp).unwrap();
        assert!(patch.changed.is_empty());
        assert_eq!(doc.text(), " - alpha\n - beta\n");
    }

    #[test]
    fn moves_section_with_its_subtree() {
        let mut doc = Document::from_text(
            "* One\nbody one\n* Two\nbody two\n** Two point one\n* Three\n",
        );
        doc.set_cursor(16); // on "* Two"
        doc.apply(Cmd::MoveNodeDown).unwrap();
        assert_eq!(
            doc.text(),
            "* One\nbody one\n* Three\n* Two\nbody two\n** Two point one\n"
        );
    }

    #[test]
    fn nested_entry_moves_within_its_own_list() {
        let mut doc = Document::from_text(" - parent\n   - one\n   - two\n");
        doc.set_cursor(13); // inside "   - one\n"
        doc.apply(Cmd::MoveNodeDown).unwrap();
        assert_eq!(doc.text(), " - parent\n   - two\n   - one\n");
    }

    #[test]
    fn section_move_ignores_deeper_neighbors() {
        let mut doc = Document::from_text("* A\n** A sub\n** A sub two\n");
        doc.set_cursor(0);
        // the level-1 section has no sibling section, its subsections are
        // children, not siblings
        let patch = doc.apply(Cmd::MoveNodeUp).unwrap();
        assert!(patch.changed.is_empty());
    }
}
