use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Headlines deeper than this classify as plain text.
pub const MAX_HEADLINE_LEVEL: usize = 30;

const DEFAULT_KEYWORDS: [&str; 2] = ["TODO", "DONE"];

fn headline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(\*+)\s+(?:([A-Za-z0-9]+)\s+)?(?:\[#([a-zA-Z])\]\s+)?(.*?)\s*(:(?:[a-zA-Z0-9_@#]+:)+)?\s*$",
        )
        .expect("invalid headline regex")
    })
}

fn list_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s+\*|\s*[-+]|\s*[0-9]+\.|\s[a-zA-Z]\.)\s+").expect("invalid list entry regex")
    })
}

fn control_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\+([A-Z_]+):\s*(.*)$").expect("invalid control line regex"))
}

fn verbatim_begin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\+BEGIN_([A-Z_]+)\b").expect("invalid begin marker regex"))
}

fn verbatim_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\+END_([A-Z_]+)\b").expect("invalid end marker regex"))
}

fn colon_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*:").expect("invalid colon literal regex"))
}

/// Classification of a single line as exactly one lexical shape.
///
/// This is the layer beneath the tree builder: each line is classified
/// independently, with no reference to surrounding context. Ranges are byte
/// offsets into the terminator-stripped line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// `** TODO [#a] title :tag:`: stars, optional keyword and priority,
    /// non-greedy title, optional trailing tag block.
    Headline {
        level: usize,
        keyword: Option<String>,
        priority: Option<char>,
        title: Range<usize>,
        tags: Vec<String>,
    },
    /// `- item`, ` * item`, `1. item`, ` a. item`; indent counts leading spaces.
    ListEntryStart { indent: usize },
    /// `#+KEY: value` directive.
    ControlLine { key: String, value: String },
    /// `#+BEGIN_<NAME>`; pairs with the END marker of the same name.
    VerbatimBegin { name: String },
    /// `#+END_<NAME>`.
    VerbatimEnd { name: String },
    /// A line whose first non-whitespace character is `:`.
    ColonLiteral,
    /// Anything else; folds into the current open container.
    PlainText,
}

/// Classifies raw line text for the tree builder.
///
/// The recognized headline keyword set is configurable; a leading token
/// outside the set is folded back into the title rather than rejected.
#[derive(Debug, Clone)]
pub struct OutlineLineClassifier {
    keywords: Vec<String>,
}

impl OutlineLineClassifier {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classifies one line. The terminator is stripped before matching; the
    /// caller keeps the line's span (terminator included) separately.
    pub fn classify(&self, raw: &str) -> LineClass {
        let line = raw.trim_end_matches(['\r', '\n']);

        if let Some(headline) = self.classify_headline(line) {
            return headline;
        }
        if list_entry_re().is_match(line) {
            return LineClass::ListEntryStart {
                indent: leading_spaces(line),
            };
        }
        if let Some(caps) = verbatim_begin_re().captures(line) {
            return LineClass::VerbatimBegin {
                name: caps[1].to_string(),
            };
        }
        if let Some(caps) = verbatim_end_re().captures(line) {
            return LineClass::VerbatimEnd {
                name: caps[1].to_string(),
            };
        }
        if colon_literal_re().is_match(line) {
            return LineClass::ColonLiteral;
        }
        if let Some(caps) = control_line_re().captures(line) {
            return LineClass::ControlLine {
                key: caps[1].to_string(),
                value: caps[2].trim_end().to_string(),
            };
        }
        LineClass::PlainText
    }

    fn classify_headline(&self, line: &str) -> Option<LineClass> {
        let caps = headline_re().captures(line)?;
        let level = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
        if level == 0 || level > MAX_HEADLINE_LEVEL {
            return None;
        }

        let word = caps.get(2);
        let recognized = word.is_some_and(|m| self.keywords.iter().any(|k| k == m.as_str()));
        let title_group = caps.get(4).expect("title group always participates");

        // An unrecognized leading token belongs to the title; the title start
        // shifts left to cover it. Priority capture applies either way.
        let title = match word {
            Some(m) if !recognized => m.start()..title_group.end(),
            _ => title_group.start()..title_group.end(),
        };
        let keyword = if recognized {
            word.map(|m| m.as_str().to_string())
        } else {
            None
        };
        let priority = caps.get(3).and_then(|m| m.as_str().chars().next());
        let tags = caps
            .get(5)
            .map(|m| {
                m.as_str()
                    .trim_matches(':')
                    .split(':')
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(LineClass::Headline {
            level,
            keyword,
            priority,
            title,
            tags,
        })
    }
}

impl Default for OutlineLineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

/// Counts leading space characters. Tabs and other whitespace do not count
/// toward list indentation.
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classify(line: &str) -> LineClass {
        OutlineLineClassifier::default().classify(line)
    }

    #[test]
    fn simple_headline_levels() {
        assert!(matches!(
            classify("* foo"),
            LineClass::Headline { level: 1, .. }
        ));
        assert!(matches!(
            classify("** foo\n"),
            LineClass::Headline { level: 2, .. }
        ));
        // no whitespace after the stars
        assert_eq!(classify("*foo"), LineClass::PlainText);
    }

    #[test]
    fn headline_title_spans() {
        let line = "** some text";
        let LineClass::Headline { title, .. } = classify(line) else {
            panic!("expected headline");
        };
        assert_eq!(&line[title], "some text");
    }

    #[rstest]
    #[case("* TODO some text", Some("TODO"), None, "some text")]
    #[case("*** DONE [#a] some text", Some("DONE"), Some('a'), "some text")]
    #[case("** UNDONE HEADLINE 5", None, None, "UNDONE HEADLINE 5")]
    #[case("** UNDONE [#a] HeAdLiNe 6", None, Some('a'), "UNDONE [#a] HeAdLiNe 6")]
    fn headline_keyword_and_priority(
        #[case] line: &str,
        #[case] keyword: Option<&str>,
        #[case] priority: Option<char>,
        #[case] title_text: &str,
    ) {
        let LineClass::Headline {
            keyword: kw,
            priority: prio,
            title,
            ..
        } = classify(line)
        else {
            panic!("expected headline: {line}");
        };
        assert_eq!(kw.as_deref(), keyword);
        assert_eq!(prio, priority);
        assert_eq!(line[title].trim_end(), title_text);
    }

    #[test]
    fn headline_tags_preserve_order_and_duplicates() {
        let LineClass::Headline { tags, .. } = classify("** foo :tag1:tag2:tag1:") else {
            panic!("expected headline");
        };
        assert_eq!(tags, vec!["tag1", "tag2", "tag1"]);
    }

    #[test]
    fn headline_deeper_than_cap_is_plain_text() {
        let stars = "*".repeat(MAX_HEADLINE_LEVEL + 1);
        assert_eq!(classify(&format!("{stars} too deep")), LineClass::PlainText);
    }

    #[rstest]
    #[case(" - item", 1)]
    #[case("- item", 0)]
    #[case("   + item", 3)]
    #[case("  12. item", 2)]
    #[case(" a. item", 1)]
    #[case(" * starred item", 1)]
    fn list_entry_indents(#[case] line: &str, #[case] indent: usize) {
        assert_eq!(classify(line), LineClass::ListEntryStart { indent });
    }

    #[test]
    fn star_at_column_zero_is_never_a_list_entry() {
        assert!(matches!(
            classify("* item"),
            LineClass::Headline { level: 1, .. }
        ));
    }

    #[test]
    fn control_lines() {
        assert_eq!(
            classify("#+ARCHIVE: foo"),
            LineClass::ControlLine {
                key: "ARCHIVE".into(),
                value: "foo".into()
            }
        );
        assert_eq!(
            classify("#+GG: once upon a time...\n"),
            LineClass::ControlLine {
                key: "GG".into(),
                value: "once upon a time...".into()
            }
        );
        // lowercase keys are not control lines
        assert_eq!(classify("#+archive: foo"), LineClass::PlainText);
    }

    #[test]
    fn verbatim_markers_pair_by_name() {
        assert_eq!(
            classify("#+BEGIN_SRC rust"),
            LineClass::VerbatimBegin { name: "SRC".into() }
        );
        assert_eq!(
            classify("#+END_EXAMPLE trailing"),
            LineClass::VerbatimEnd {
                name: "EXAMPLE".into()
            }
        );
        // case sensitive
        assert_eq!(classify("#+begin_src"), LineClass::PlainText);
    }

    #[test]
    fn colon_literal_lines() {
        assert_eq!(classify("  : literal"), LineClass::ColonLiteral);
        assert_eq!(classify(":"), LineClass::ColonLiteral);
    }
}
