use org_outline_engine::editing::{
    Cmd, Document, archive, folding, navigate, project_point_after_swap, swap_spans,
};
use org_outline_engine::{NodeKind, Span};
use pretty_assertions::assert_eq;

#[test]
fn cursor_inside_first_region_travels_with_it() {
    // the documented concrete case: cursor at 1 lands at
    // 1 + (second.end - first.end) = 6
    let mut doc = Document::from_text("AAAA\nBBBB\n");
    doc.set_cursor(1);
    swap_spans(&mut doc, Span::new(0, 5), Span::new(5, 10)).unwrap();
    assert_eq!(doc.text(), "BBBB\nAAAA\n");
    assert_eq!(doc.cursor().unwrap(), 6);
}

#[test]
fn projection_is_pure_and_piecewise() {
    let first = Span::new(4, 8);
    let second = Span::new(12, 16);
    assert_eq!(project_point_after_swap(first, second, 2), 2);
    assert_eq!(project_point_after_swap(first, second, 5), 13);
    assert_eq!(project_point_after_swap(first, second, 13), 5);
    assert_eq!(project_point_after_swap(first, second, 18), 18);
}

#[test]
fn swapping_section_spans_round_trips_the_buffer() {
    let original = "* One\nbody one\n* Two\nbody of two\n";
    let mut doc = Document::from_text(original);
    doc.set_cursor(7); // inside "body one"

    let tree = doc.outline();
    let base = tree.children(tree.root())[0];
    let sections: Vec<_> = tree
        .children(base)
        .iter()
        .copied()
        .filter(|&id| matches!(tree.kind(id), NodeKind::Section { .. }))
        .collect();
    assert_eq!(sections.len(), 2);
    let first = tree.span(sections[0]).unwrap();
    let second = tree.span(sections[1]).unwrap();

    swap_spans(&mut doc, first, second).unwrap();
    assert_eq!(doc.text(), "* Two\nbody of two\n* One\nbody one\n");

    // re-parse and swap back: byte-for-byte round trip, cursor restored
    let tree = doc.outline();
    let base = tree.children(tree.root())[0];
    let sections: Vec<_> = tree
        .children(base)
        .iter()
        .copied()
        .filter(|&id| matches!(tree.kind(id), NodeKind::Section { .. }))
        .collect();
    let first = tree.span(sections[0]).unwrap();
    let second = tree.span(sections[1]).unwrap();
    swap_spans(&mut doc, first, second).unwrap();

    assert_eq!(doc.text(), original);
    assert_eq!(doc.cursor().unwrap(), 7);
}

#[test]
fn folds_inside_a_moved_section_move_with_it() {
    let mut doc = Document::from_text("* A\naaa\naaa\n* B\nbbb\n");
    doc.set_cursor(0);
    let fold = Span::new(5, 10); // strictly inside section A's span [0,12)
    doc.set_folds(vec![fold]);

    swap_spans(&mut doc, Span::new(0, 12), Span::new(12, 20)).unwrap();
    assert_eq!(doc.text(), "* B\nbbb\n* A\naaa\naaa\n");
    assert_eq!(doc.folds(), [Span::new(13, 18)].as_slice());
}

#[test]
fn move_node_command_swaps_whole_subtrees() {
    let mut doc = Document::from_text("* One\n** One sub\n* Two\n");
    doc.set_cursor(doc.text().find("* Two").unwrap());
    doc.apply(Cmd::MoveNodeUp).unwrap();
    assert_eq!(doc.text(), "* Two\n* One\n** One sub\n");
}

#[test]
fn checkbox_and_todo_commands_compose() {
    let mut doc = Document::from_text("* TODO buy\n - [ ] milk\n");
    doc.set_cursor(doc.text().find("[ ]").unwrap());
    doc.apply(Cmd::ToggleCheckbox).unwrap();
    assert_eq!(doc.text(), "* TODO buy\n - [X] milk\n");

    doc.set_cursor(0);
    doc.apply(Cmd::CycleTodoState { forward: true }).unwrap();
    assert_eq!(doc.text(), "* DONE buy\n - [X] milk\n");
}

#[test]
fn archive_extraction_then_erase_removes_the_section() {
    let mut doc = Document::from_text(
        "#+ARCHIVE: archive.org\n* Keep\n* Old task\ndetails\n* Also keep\n",
    );
    let point = doc.text().find("Old task").unwrap();
    let entry = archive::extract_archive_entry(&doc, point).unwrap();
    assert_eq!(entry.target_template, "archive.org");
    assert_eq!(entry.text, "\n* Old task\ndetails\n");

    doc.erase(entry.section);
    assert_eq!(
        doc.text(),
        "#+ARCHIVE: archive.org\n* Keep\n* Also keep\n"
    );
}

#[test]
fn following_a_heading_link_finds_the_headline() {
    let doc = Document::from_text("* Index\nsee [[Details]]\n* Details\nthe details\n");
    let point = doc.text().find("Details]]").unwrap();
    let target = navigate::resolve_link_target(&doc, point).unwrap();
    assert_eq!(target, navigate::LinkTarget::Heading("Details".to_string()));

    let tree = doc.outline();
    let offset = navigate::headline_offset_by_title(&doc, &tree, "Details").unwrap();
    assert_eq!(offset, doc.text().find("* Details").unwrap());
}

#[test]
fn visibility_cycling_returns_to_unfolded() {
    let mut doc = Document::from_text("* A\nbody a\n* B\nbody b\n");
    doc.set_cursor(0);
    folding::cycle_global_visibility(&mut doc).unwrap();
    assert!(!doc.folds().is_empty());

    folding::cycle_global_visibility(&mut doc).unwrap();
    folding::cycle_global_visibility(&mut doc).unwrap();
    assert!(doc.folds().is_empty());
}
