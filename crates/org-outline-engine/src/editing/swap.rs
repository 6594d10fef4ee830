use crate::editing::{Document, EditError, Patch};
use crate::parsing::rope::span::Span;

/// Projects a point through the exchange of `first` and `second`.
///
/// `first` must precede `second` and the spans must be disjoint. Piecewise:
/// points before `first` and after `second` are unchanged; points inside
/// either span travel with their text; points strictly between the spans
/// shift by the size difference. A point on the shared boundary of adjacent
/// spans moves with `second`.
pub fn project_point_after_swap(first: Span, second: Span, point: usize) -> usize {
    if point < first.start {
        point
    } else if second.contains(point) {
        point - second.start + first.start
    } else if first.contains(point) {
        point + second.end - first.end
    } else if first.end <= point && point < second.start {
        (point + first.len()).saturating_sub(second.len())
    } else {
        point
    }
}

/// Exchanges the text of two disjoint, line-aligned spans.
///
/// Arguments may come in either order. Both spans must begin at a line start
/// and end at a line start or the buffer end; when the second span ends at
/// an unterminated buffer end, a terminator is appended for the duration of
/// the exchange and removed afterwards.
///
/// The single empty cursor is projected through the swap, as is every fold
/// lying strictly inside either span. Folds entirely before or after the
/// swapped area are kept; folds touching a swapped boundary or lying between
/// the spans are dropped.
pub fn swap_spans(doc: &mut Document, first: Span, second: Span) -> Result<Patch, EditError> {
    if second.start < first.start {
        return swap_spans(doc, second, first);
    }

    let cursor = doc.cursor()?;
    if !first.is_disjoint(second) {
        return Err(EditError::OverlappingRegions);
    }

    if !doc.is_line_start(first.start) {
        return Err(EditError::RegionStartNotAligned("first"));
    }
    if !doc.is_line_start(first.end) && first.end != doc.len() {
        return Err(EditError::RegionEndNotAligned("first"));
    }
    if !doc.is_line_start(second.start) {
        return Err(EditError::RegionStartNotAligned("second"));
    }
    if !doc.is_line_start(second.end) && second.end != doc.len() {
        return Err(EditError::RegionEndNotAligned("second"));
    }

    // An unterminated buffer tail gets a synthetic terminator so the
    // exchange stays line-shaped; it is removed again below.
    let mut second = second;
    let mut added_terminator = false;
    if !doc.is_line_start(second.end) {
        doc.insert(doc.len(), "\n");
        second = Span::new(second.start, second.end + 1);
        added_terminator = true;
    }

    let new_cursor = project_point_after_swap(first, second, cursor);

    let mut new_folds = Vec::new();
    for &fold in doc.folds() {
        if fold.strictly_within(first) || fold.strictly_within(second) {
            new_folds.push(Span::new(
                project_point_after_swap(first, second, fold.start),
                project_point_after_swap(first, second, fold.end),
            ));
        } else if fold.end <= first.start || fold.start >= second.end {
            new_folds.push(fold);
        }
    }

    let first_text = doc.substr(first);
    let second_text = doc.substr(second);
    doc.erase(second);
    doc.insert(second.start, &first_text);
    doc.erase(first);
    doc.insert(first.start, &second_text);

    doc.set_cursor(new_cursor);

    if added_terminator {
        let len = doc.len();
        doc.erase(Span::new(len - 1, len));
    }

    doc.set_folds(new_folds);

    let len = doc.len();
    let changed = vec![
        first.start..(first.start + second_text.len()).min(len),
        second.end.saturating_sub(first_text.len())..second.end.min(len),
    ];
    Ok(Patch {
        changed,
        new_selection: doc.selection(),
        version: doc.version(),
    })
}
