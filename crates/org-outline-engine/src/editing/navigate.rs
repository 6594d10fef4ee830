use std::collections::HashMap;

use crate::editing::{Document, EditError};
use crate::parsing::inline::{LinkInfo, find_links};
use crate::parsing::{self, NodeKind, OutlineTree};

/// Where a followed link leads. Opening URLs and files is the host's job;
/// the engine only classifies and resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `http:`/`https:`, to open in a browser.
    Url(String),
    /// `file:`, to open in the editor.
    File(String),
    /// `file+sys:`, to open with the system handler.
    SysFile(String),
    /// Anything else: jump to the headline with this exact title.
    Heading(String),
}

/// How many abbreviation expansions to attempt before giving up.
const EXPANSION_LIMIT: usize = 30;

/// The link whose interior the cursor is in, with spans made absolute.
pub fn link_at_point(doc: &Document, point: usize) -> Result<LinkInfo, EditError> {
    let line_span = doc.line_span_at(point);
    let line = doc.substr(line_span);
    let stripped = line.trim_end_matches(['\r', '\n']);
    let point_in_line = point - line_span.start;

    for mut link in find_links(stripped) {
        // strict interior: sitting on a bracket does not count
        if link.range.start < point_in_line && point_in_line < link.range.end {
            link.range = line_span.start + link.range.start..line_span.start + link.range.end;
            return Ok(link);
        }
    }
    Err(EditError::NotOnLink)
}

/// Collects `#+LINK: <abbrev> <replacement>` rules from the document.
/// Malformed lines are skipped; a repeated abbreviation keeps the last rule.
pub fn link_abbreviations(doc: &Document, tree: &OutlineTree) -> HashMap<String, String> {
    let mut rules = HashMap::new();
    for id in tree.depth_first(tree.root()) {
        if !matches!(tree.kind(id), NodeKind::ControlLine) {
            continue;
        }
        let Some((key, value)) = parsing::control_key_value(doc.rope(), tree, id) else {
            continue;
        };
        if key != "LINK" {
            continue;
        }
        let Some((abbreviation, replacement)) = value.trim().split_once(char::is_whitespace)
        else {
            continue;
        };
        rules.insert(abbreviation.to_string(), replacement.trim_start().to_string());
    }
    rules
}

/// Expands `schema:rest` through the abbreviation rules until no rule
/// applies, substituting `rest` for `%s` in the replacement each round.
pub fn expand_reference(
    rules: &HashMap<String, String>,
    reference: &str,
) -> Result<String, EditError> {
    let mut url = reference.to_string();
    for _ in 0..EXPANSION_LIMIT {
        let Some((schema, rest)) = url.split_once(':') else {
            return Ok(url);
        };
        match rules.get(schema) {
            Some(replacement) => url = replacement.replace("%s", rest),
            None => return Ok(url),
        }
    }
    Err(EditError::LinkExpansionLimit(reference.to_string()))
}

/// Resolves the link under the cursor to a target, applying abbreviations.
pub fn resolve_link_target(doc: &Document, point: usize) -> Result<LinkTarget, EditError> {
    let link = link_at_point(doc, point)?;
    let tree = doc.outline();
    let rules = link_abbreviations(doc, &tree);
    let url = expand_reference(&rules, &link.reference)?;

    Ok(match url.split_once(':') {
        Some(("http", _)) | Some(("https", _)) => LinkTarget::Url(url),
        Some(("file", path)) => LinkTarget::File(path.to_string()),
        Some(("file+sys", path)) => LinkTarget::SysFile(path.to_string()),
        _ => LinkTarget::Heading(url),
    })
}

/// The offset of the headline whose title equals `caption` exactly; when
/// several match, the last one in the document wins.
pub fn headline_offset_by_title(
    doc: &Document,
    tree: &OutlineTree,
    caption: &str,
) -> Option<usize> {
    let mut offset = None;
    for id in tree.depth_first(tree.root()) {
        if !matches!(tree.kind(id), NodeKind::Headline { .. }) {
            continue;
        }
        if parsing::headline_title(doc.rope(), tree, id).as_deref() == Some(caption) {
            offset = tree.span(id).map(|span| span.start);
        }
    }
    offset
}
