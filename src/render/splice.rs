//! Hyperlink splicing.
//!
//! Replaces the text of each located link with `[text](url)` in formatted
//! Markdown, without touching text that is already inside a link.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::{CandidateLink, LinkPosition};

use super::normalize::normalize_text;

/// Outcome of splicing the links of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceReport {
    /// Text with link syntax inserted
    pub text: String,
    /// Links that were inserted
    pub spliced: usize,
    /// Links whose text could not be found
    pub unmatched: usize,
}

/// Inserts Markdown link syntax for candidate links.
pub struct LinkSplicer {
    existing_link: Regex,
    bare_url: Regex,
}

impl LinkSplicer {
    pub fn new() -> Self {
        Self {
            existing_link: Regex::new(r"\[(?:\\.|[^\]\\])*\]\([^)]*\)").unwrap(),
            bare_url: Regex::new(r#"(?:https?://|www\.)[^\s<>()\[\]]*[^\s<>()\[\].,;:!?'"]"#)
                .unwrap(),
        }
    }

    /// Splice `links` into `text`.
    ///
    /// Link text is normalized the same way page text is. Candidates at the
    /// same position with the same text and url are spliced once; the same
    /// link at different positions claims one occurrence each, in reading
    /// order. Longer link texts go first so that a shorter one cannot claim
    /// part of them. Each link replaces its first whole-word occurrence
    /// outside existing links and bare URLs; failing that, the first
    /// whitespace- and case-insensitive occurrence. Links with no occurrence
    /// are left out and logged.
    pub fn splice(&self, text: &str, links: &[CandidateLink]) -> SpliceReport {
        let mut targets: Vec<(String, &str, &LinkPosition)> = Vec::with_capacity(links.len());
        for link in links {
            let link_text = normalize_text(link.text.trim());
            let url = link.url.trim();
            if link_text.is_empty() || url.is_empty() {
                continue;
            }
            let duplicate = targets
                .iter()
                .any(|(t, u, p)| *t == link_text && *u == url && **p == link.position);
            if !duplicate {
                targets.push((link_text, url, &link.position));
            }
        }
        // Stable: equal lengths keep reading order
        targets.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let mut report = SpliceReport {
            text: text.to_string(),
            ..Default::default()
        };

        for (link_text, url, _) in &targets {
            let link_text = link_text.as_str();
            let linked = self.link_spans(&report.text);
            let urls = self.url_spans(&report.text);
            let allowed =
                |range: &Range<usize>| !overlaps(range, &linked) && !splits_url(range, &urls);

            let found = find_whole_word(&report.text, link_text, &allowed)
                .map(|range| (range, link_text.to_string()))
                .or_else(|| {
                    find_loose(&report.text, link_text, &allowed).map(|range| {
                        let label = report.text[range.clone()]
                            .split_whitespace()
                            .collect::<Vec<_>>()
                            .join(" ");
                        (range, label)
                    })
                });

            match found {
                Some((range, label)) => {
                    let markdown = format!("[{}]({})", escape_label(&label), escape_url(url));
                    report.text.replace_range(range, &markdown);
                    report.spliced += 1;
                }
                None if report
                    .text
                    .contains(&format!("[{}]({})", escape_label(link_text), escape_url(url))) =>
                {
                    // Already linked
                }
                None => {
                    log::debug!("Link text {:?} not found for {}", link_text, url);
                    report.unmatched += 1;
                }
            }
        }

        report
    }

    fn link_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.existing_link
            .find_iter(text)
            .map(|m| m.range())
            .collect()
    }

    fn url_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.bare_url.find_iter(text).map(|m| m.range()).collect()
    }
}

impl Default for LinkSplicer {
    fn default() -> Self {
        Self::new()
    }
}

/// Splice links with a default splicer.
pub fn splice_links(text: &str, links: &[CandidateLink]) -> SpliceReport {
    LinkSplicer::new().splice(text, links)
}

fn find_whole_word(
    text: &str,
    needle: &str,
    allowed: &dyn Fn(&Range<usize>) -> bool,
) -> Option<Range<usize>> {
    text.match_indices(needle)
        .map(|(start, m)| start..start + m.len())
        .find(|range| is_word_bounded(text, range) && allowed(range))
}

fn find_loose(
    text: &str,
    needle: &str,
    allowed: &dyn Fn(&Range<usize>) -> bool,
) -> Option<Range<usize>> {
    let pattern = needle
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    let found = re.find_iter(text).map(|m| m.range()).find(|range| allowed(range));
    found
}

/// A match is whole-word when the characters around it don't continue a
/// word that the match itself starts or ends with.
fn is_word_bounded(text: &str, range: &Range<usize>) -> bool {
    let matched = &text[range.clone()];
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();

    let starts_word = matched.chars().next().map(is_word_char).unwrap_or(false);
    let ends_word = matched.chars().next_back().map(is_word_char).unwrap_or(false);

    !(starts_word && before.map(is_word_char).unwrap_or(false))
        && !(ends_word && after.map(is_word_char).unwrap_or(false))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn overlaps(range: &Range<usize>, spans: &[Range<usize>]) -> bool {
    spans
        .iter()
        .any(|span| range.start < span.end && span.start < range.end)
}

/// A match may cover a whole bare URL but not part of one.
fn splits_url(range: &Range<usize>, urls: &[Range<usize>]) -> bool {
    urls.iter().any(|url| {
        range.start < url.end
            && url.start < range.end
            && !(range.start <= url.start && range.end >= url.end)
    })
}

/// Backslash-escape the brackets of a link label.
fn escape_label(label: &str) -> String {
    label.replace('[', "\\[").replace(']', "\\]")
}

/// Percent-encode the characters that would end a Markdown link target.
fn escape_url(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}
