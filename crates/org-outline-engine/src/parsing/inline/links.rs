use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*(),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
            .expect("invalid URL regex")
    })
}

/// A link found in one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Byte range of the whole link within the scanned text.
    pub range: Range<usize>,
    /// The target: bracket contents, or the bare URL.
    pub reference: String,
    /// Display text of a `[[reference][text]]` link; bare URLs display
    /// themselves.
    pub text: Option<String>,
}

/// Scans `text` for `[[reference]]` / `[[reference][text]]` bracket links
/// and bare `http(s)` URLs, in that order. Unclosed brackets are ignored.
pub fn find_links(text: &str) -> Vec<LinkInfo> {
    let mut links = Vec::new();

    let mut processed = 0;
    while let Some(found) = text[processed..].find("[[") {
        let start = processed + found;
        let Some(found_end) = text[start..].find("]]") else {
            break;
        };
        let end = start + found_end;
        let (reference, display) = match text[start..end].find("][") {
            Some(found_sep) => {
                let sep = start + found_sep;
                (
                    text[start + 2..sep].to_string(),
                    Some(text[sep + 2..end].to_string()),
                )
            }
            None => (text[start + 2..end].to_string(), None),
        };
        links.push(LinkInfo {
            range: start..end + 2,
            reference,
            text: display,
        });
        processed = end + 2;
    }

    for url in url_re().find_iter(text) {
        links.push(LinkInfo {
            range: url.range(),
            reference: url.as_str().to_string(),
            text: Some(url.as_str().to_string()),
        });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_reference_link() {
        let links = find_links("see [[Some Header]] for details");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].reference, "Some Header");
        assert_eq!(links[0].text, None);
        assert_eq!(links[0].range, 4..19);
    }

    #[test]
    fn link_with_display_text() {
        let links = find_links("[[file:notes.org][my notes]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].reference, "file:notes.org");
        assert_eq!(links[0].text.as_deref(), Some("my notes"));
        assert_eq!(links[0].range, 0..28);
    }

    #[test]
    fn bare_url_displays_itself() {
        let links = find_links("docs at https://example.com/a?b=1 here");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].reference, "https://example.com/a?b=1");
        assert_eq!(links[0].text.as_deref(), Some("https://example.com/a?b=1"));
    }

    #[test]
    fn multiple_bracket_links_in_order() {
        let links = find_links("[[a]] and [[b][B]]");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].reference, "a");
        assert_eq!(links[1].reference, "b");
    }

    #[test]
    fn unclosed_bracket_is_ignored() {
        assert!(find_links("[[never closed").is_empty());
    }
}
