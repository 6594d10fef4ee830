use crate::editing::{Document, EditError};
use crate::parsing::rope::span::Span;
use crate::parsing::{self, NodeKind};

/// Everything the host needs to archive the section under the cursor: the
/// target template from `#+ARCHIVE` (a `%s` stands for the document's file
/// name), the section text promoted to level 1, and the span to erase once
/// the text is persisted. File resolution and writing stay with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub target_template: String,
    pub text: String,
    pub section: Span,
}

const DEFAULT_ARCHIVE_TEMPLATE: &str = "%s_archive";

/// Builds the archive entry for the headline containing `point`.
pub fn extract_archive_entry(doc: &Document, point: usize) -> Result<ArchiveEntry, EditError> {
    let tree = doc.outline();

    let mut template: Option<String> = None;
    let mut headline = None;
    for id in tree.depth_first(tree.root()) {
        match tree.kind(id) {
            NodeKind::ControlLine => {
                if let Some((key, value)) = parsing::control_key_value(doc.rope(), &tree, id)
                    && key == "ARCHIVE"
                {
                    template = Some(value);
                }
            }
            NodeKind::Headline { .. } => {
                if tree.span(id).is_some_and(|span| span.contains(point)) {
                    headline = Some(id);
                }
            }
            _ => {}
        }
    }

    let headline = headline.ok_or(EditError::NotOnHeadline)?;
    let section = tree.parent(headline).ok_or(EditError::NotOnHeadline)?;
    let NodeKind::Section { level } = tree.kind(section) else {
        return Err(EditError::NotOnHeadline);
    };
    let span = tree.span(section).ok_or(EditError::NotOnHeadline)?;

    let section_text = doc.substr(span);
    let promoted = if level <= 1 {
        section_text
    } else {
        // reduce the leading headline to one star; nested lines keep theirs
        let stars = "*".repeat(level - 1);
        section_text
            .strip_prefix(stars.as_str())
            .map(str::to_string)
            .unwrap_or(section_text)
    };
    let text = format!("\n{}\n", promoted.trim_matches('\n'));

    Ok(ArchiveEntry {
        target_template: template.unwrap_or_else(|| DEFAULT_ARCHIVE_TEMPLATE.to_string()),
        text,
        section: span,
    })
}
