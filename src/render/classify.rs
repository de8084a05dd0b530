//! Line classification rules.
//!
//! Each rule looks at a single line and either claims it or passes. The
//! [`LineClassifier`] asks its rules in order and falls back to
//! [`LineKind::Plain`], so a misfiring heuristic can only ever produce
//! plain text.

use regex::Regex;

/// Heading level assigned to inferred headers.
pub const HEADER_LEVEL: u8 = 2;

/// Default length cap for header candidates.
pub const DEFAULT_HEADER_MAX_LEN: usize = 80;

/// Title Case headers longer than this are treated as prose.
const MAX_TITLE_WORDS: usize = 12;

/// Title Case headers may carry at most this many punctuation characters.
const MAX_TITLE_PUNCTUATION: usize = 2;

/// Words that stay lower-case in Title Case.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "per", "the", "to", "via", "vs", "with",
];

/// Marker of a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMarker {
    /// Unordered bullet, rendered as `-`
    Bullet,
    /// Numbered item keeping its original token (e.g. `3.` or `2)`)
    Ordered(String),
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,
    /// Section header
    Header { level: u8, text: String },
    /// List item with its content after the marker
    ListItem { marker: ListMarker, content: String },
    /// Anything else
    Plain,
}

impl LineKind {
    /// Render a header or list item as Markdown.
    ///
    /// Blank and plain lines have no Markdown form of their own.
    pub fn to_markdown(&self) -> Option<String> {
        match self {
            LineKind::Header { level, text } => {
                Some(format!("{} {}", "#".repeat(*level as usize), text))
            }
            LineKind::ListItem { marker, content } => Some(match marker {
                ListMarker::Bullet => format!("- {}", content),
                ListMarker::Ordered(token) => format!("{} {}", token, content),
            }),
            LineKind::Blank | LineKind::Plain => None,
        }
    }
}

/// A single classification heuristic.
pub trait LineRule: Send + Sync {
    /// Classify `line`, or return `None` to defer to the next rule.
    fn classify(&self, line: &str) -> Option<LineKind>;
}

/// Whitespace-only lines.
pub struct BlankRule;

impl LineRule for BlankRule {
    fn classify(&self, line: &str) -> Option<LineKind> {
        line.trim().is_empty().then_some(LineKind::Blank)
    }
}

/// Lines that already are Markdown headings keep their level.
pub struct ExistingHeadingRule {
    pattern: Regex,
}

impl ExistingHeadingRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^(#{1,6})\s+(\S.*)$").unwrap(),
        }
    }
}

impl Default for ExistingHeadingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for ExistingHeadingRule {
    fn classify(&self, line: &str) -> Option<LineKind> {
        let caps = self.pattern.captures(line.trim())?;
        Some(LineKind::Header {
            level: caps[1].len() as u8,
            text: caps[2].trim_end().to_string(),
        })
    }
}

/// Bullet glyph followed by whitespace.
pub struct BulletRule {
    pattern: Regex,
}

impl BulletRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^[•\-*●○▪■◦]\s+(\S.*)$").unwrap(),
        }
    }
}

impl Default for BulletRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for BulletRule {
    fn classify(&self, line: &str) -> Option<LineKind> {
        let caps = self.pattern.captures(line.trim())?;
        Some(LineKind::ListItem {
            marker: ListMarker::Bullet,
            content: caps[1].trim_end().to_string(),
        })
    }
}

/// `1.` / `1)` numbered items.
pub struct OrderedRule {
    pattern: Regex,
}

impl OrderedRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^(\d+[.)])\s+(\S.*)$").unwrap(),
        }
    }
}

impl Default for OrderedRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for OrderedRule {
    fn classify(&self, line: &str) -> Option<LineKind> {
        let caps = self.pattern.captures(line.trim())?;
        Some(LineKind::ListItem {
            marker: ListMarker::Ordered(caps[1].to_string()),
            content: caps[2].trim_end().to_string(),
        })
    }
}

/// Short all-caps or Title Case lines become section headers.
pub struct HeaderRule {
    max_len: usize,
}

impl HeaderRule {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    fn is_header(&self, text: &str) -> bool {
        if text.chars().count() >= self.max_len {
            return false;
        }
        if text.contains('@') || text.to_lowercase().contains("http") {
            return false;
        }
        if text.chars().filter(|c| c.is_alphabetic()).count() < 2 {
            return false;
        }
        is_all_caps(text) || is_title_case(text)
    }
}

impl Default for HeaderRule {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_MAX_LEN)
    }
}

impl LineRule for HeaderRule {
    fn classify(&self, line: &str) -> Option<LineKind> {
        let text = line.trim();
        self.is_header(text).then(|| LineKind::Header {
            level: HEADER_LEVEL,
            text: text.to_string(),
        })
    }
}

fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

fn is_title_case(text: &str) -> bool {
    match text.chars().next() {
        Some(c) if c.is_uppercase() => {}
        _ => return false,
    }
    if text.ends_with(&['.', '!', '?', ';', ':', ','][..]) {
        return false;
    }
    let punctuation = text
        .chars()
        .filter(|c| c.is_ascii_punctuation() || is_general_punctuation(*c))
        .count();
    if punctuation > MAX_TITLE_PUNCTUATION {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > MAX_TITLE_WORDS {
        return false;
    }

    words.iter().all(|word| {
        let first = match word.chars().find(|c| c.is_alphabetic()) {
            Some(c) => c,
            // Numbers and symbols don't affect the casing test
            None => return true,
        };
        let bare: String = word
            .chars()
            .filter(|c| c.is_alphabetic())
            .collect::<String>()
            .to_lowercase();
        !first.is_lowercase() || MINOR_WORDS.contains(&bare.as_str())
    })
}

fn is_general_punctuation(c: char) -> bool {
    ('\u{2010}'..='\u{2027}').contains(&c) || ('\u{2030}'..='\u{205E}').contains(&c)
}

/// Ordered set of rules with a plain-text fallback.
pub struct LineClassifier {
    rules: Vec<Box<dyn LineRule>>,
}

impl LineClassifier {
    /// The default rule set: blank, existing heading, bullet, ordered,
    /// header.
    pub fn new(header_max_len: usize) -> Self {
        Self {
            rules: vec![
                Box::new(BlankRule),
                Box::new(ExistingHeadingRule::new()),
                Box::new(BulletRule::new()),
                Box::new(OrderedRule::new()),
                Box::new(HeaderRule::new(header_max_len)),
            ],
        }
    }

    /// A classifier with no rules besides the given ones.
    pub fn with_rules(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule, consulted after the existing ones.
    pub fn push_rule(&mut self, rule: Box<dyn LineRule>) {
        self.rules.push(rule);
    }

    /// Classify a line.
    pub fn classify(&self, line: &str) -> LineKind {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(line))
            .unwrap_or(LineKind::Plain)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_MAX_LEN)
    }
}
