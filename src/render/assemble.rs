//! Document assembly.

use crate::model::PageOutput;

use super::PageSeparator;

/// Join per-page Markdown in ascending page order.
///
/// Pages are sorted by number regardless of the order they finished in.
/// A failed page contributes an empty section. Only the ends of the final
/// document are trimmed; spacing at page boundaries is left as formatted.
pub fn assemble(pages: &[PageOutput], separator: PageSeparator) -> String {
    let mut ordered: Vec<&PageOutput> = pages.iter().collect();
    ordered.sort_by_key(|p| p.number);

    ordered
        .iter()
        .map(|p| p.markdown.as_str())
        .collect::<Vec<_>>()
        .join(separator.as_str())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, markdown: &str) -> PageOutput {
        PageOutput {
            number,
            markdown: markdown.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pages_sorted_by_number() {
        let pages = vec![page(3, "three"), page(1, "one"), page(2, "two")];
        assert_eq!(
            assemble(&pages, PageSeparator::BlankLine),
            "one\n\ntwo\n\nthree"
        );
    }

    #[test]
    fn test_rule_separator() {
        let pages = vec![page(1, "one"), page(2, "two")];
        assert_eq!(assemble(&pages, PageSeparator::Rule), "one\n\n---\n\ntwo");
    }

    #[test]
    fn test_only_outer_whitespace_trimmed() {
        let pages = vec![page(1, "\n  one  "), page(2, "  two\n")];
        assert_eq!(
            assemble(&pages, PageSeparator::BlankLine),
            "one  \n\n  two"
        );
    }

    #[test]
    fn test_failed_page_is_empty_section() {
        let pages = vec![page(1, "one"), PageOutput::failed(2), page(3, "three")];
        assert_eq!(
            assemble(&pages, PageSeparator::Rule),
            "one\n\n---\n\n\n\n---\n\nthree"
        );
    }

    #[test]
    fn test_no_pages() {
        assert_eq!(assemble(&[], PageSeparator::Rule), "");
    }
}
