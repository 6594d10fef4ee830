use crate::editing::{Document, EditError};
use crate::parsing::rope::span::Span;
use crate::parsing::{LineClass, NodeId, NodeKind, OutlineLineClassifier, OutlineTree};

/// Toggles the content fold of the section whose headline is under the
/// cursor. Returns false (and does nothing) when the cursor is not on a
/// headline line or the section has no content to hide.
pub fn toggle_section_fold(doc: &mut Document) -> Result<bool, EditError> {
    let cursor = doc.cursor()?;
    let line = doc.substr(doc.line_span_at(cursor));
    if !matches!(
        OutlineLineClassifier::default().classify(&line),
        LineClass::Headline { .. }
    ) {
        return Ok(false);
    }

    let tree = doc.outline();
    let Some(hit) = tree.node_at_point(tree.root(), cursor) else {
        return Ok(false);
    };
    let Some(section) =
        tree.ancestor_or_self(hit, |kind| matches!(kind, NodeKind::Section { level } if level > 0))
    else {
        return Ok(false);
    };
    let Some(fold) = section_content_span(doc, &tree, section) else {
        return Ok(false);
    };

    if !doc.fold(fold) {
        doc.unfold(fold);
    }
    Ok(true)
}

/// Cycles whole-document visibility: everything unfolded → top-level
/// headlines folded → all headlines folded → back to unfolded.
pub fn cycle_global_visibility(doc: &mut Document) -> Result<(), EditError> {
    doc.cursor()?;

    let tree = doc.outline();
    let all = headline_spans(doc, &tree);
    if all.is_empty() {
        return Ok(());
    }

    // The first headline in the document sets the top level.
    let top_level = all[0].1;
    let top: Vec<(Span, usize)> = all
        .iter()
        .copied()
        .filter(|&(_, level)| level <= top_level)
        .collect();

    let all_folding = foldings_for_headlines(doc, &all);
    let top_folding = foldings_for_headlines(doc, &top);
    let current = doc.folds().to_vec();

    if current == all_folding {
        doc.set_folds(Vec::new());
    } else if current == top_folding {
        doc.set_folds(all_folding);
    } else {
        doc.set_folds(top_folding);
    }
    Ok(())
}

/// The content spans between consecutive headlines: each fold runs from a
/// headline's text end to just before the next headline's line start, and
/// the last one runs to the buffer end.
pub fn foldings_for_headlines(doc: &Document, headlines: &[(Span, usize)]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut previous_text_end: Option<usize> = None;
    for &(span, _) in headlines {
        if let Some(prev) = previous_text_end {
            let end = span.start.saturating_sub(1);
            if prev < end {
                result.push(Span::new(prev, end));
            }
        }
        previous_text_end = Some(headline_text_end(doc, span));
    }
    if let Some(prev) = previous_text_end
        && prev < doc.len()
    {
        result.push(Span::new(prev, doc.len()));
    }
    result
}

/// Every headline span in document order, with its level.
pub fn headline_spans(doc: &Document, tree: &OutlineTree) -> Vec<(Span, usize)> {
    let mut headlines: Vec<(Span, usize)> = tree
        .depth_first(tree.root())
        .filter_map(|id| match tree.kind(id) {
            NodeKind::Headline { level } => tree.span(id).map(|span| (span, level)),
            _ => None,
        })
        .collect();
    headlines.sort_by_key(|&(span, _)| span.start);
    headlines
}

/// The foldable content of a section: from the headline's text end (before
/// its terminator) to just before the next headline, or to the buffer end
/// for the last section.
fn section_content_span(doc: &Document, tree: &OutlineTree, section: NodeId) -> Option<Span> {
    let section_span = tree.span(section)?;
    let headline = tree
        .children(section)
        .iter()
        .copied()
        .find(|&child| matches!(tree.kind(child), NodeKind::Headline { .. }))?;
    let start = headline_text_end(doc, tree.span(headline)?);
    let end = if section_span.end >= doc.len() {
        doc.len()
    } else {
        section_span.end - 1
    };
    if start >= end {
        return None;
    }
    Some(Span::new(start, end))
}

fn headline_text_end(doc: &Document, headline: Span) -> usize {
    let line = doc.substr(headline);
    headline.start + line.trim_end_matches(['\r', '\n']).len()
}
