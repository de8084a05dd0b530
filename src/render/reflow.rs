//! Paragraph reflow.
//!
//! Every extracted line is a hard break; prose is re-joined here while
//! blank-line paragraph breaks survive.

/// Join the lines of one paragraph into a single line.
///
/// Lines are separated by one space, except that a line ending in
/// `letter-` followed by one starting in lower case is joined without the
/// hyphen (`infor-` + `mation` becomes `information`).
pub fn join_paragraph<S: AsRef<str>>(lines: &[S]) -> String {
    let mut result = String::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if result.is_empty() {
            result.push_str(line);
            continue;
        }

        let starts_lowercase = line.chars().next().map(char::is_lowercase).unwrap_or(false);
        if starts_lowercase && ends_with_word_hyphen(&result) {
            result.pop();
        } else {
            result.push(' ');
        }
        result.push_str(line);
    }

    result
}

fn ends_with_word_hyphen(text: &str) -> bool {
    let mut chars = text.chars().rev();
    chars.next() == Some('-') && chars.next().map(char::is_alphabetic).unwrap_or(false)
}

/// Reflow raw text: join each blank-line delimited paragraph into one
/// line and separate paragraphs with a single blank line.
pub fn reflow(text: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(join_paragraph(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(join_paragraph(&current));
    }

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_join_with_space() {
        assert_eq!(
            join_paragraph(&["The quick brown", "fox jumps over", "the lazy dog."]),
            "The quick brown fox jumps over the lazy dog."
        );
    }

    #[test]
    fn test_dehyphenation() {
        assert_eq!(join_paragraph(&["infor-", "mation"]), "information");
        // Capitalized continuation keeps the hyphen and gets a space
        assert_eq!(join_paragraph(&["Anglo-", "Saxon"]), "Anglo- Saxon");
        // Dashes between numbers are not word hyphens
        assert_eq!(join_paragraph(&["pages 10-", "and more"]), "pages 10- and more");
    }

    #[test]
    fn test_reflow_keeps_paragraph_breaks() {
        let text = "First line\nsecond line\n\n\n\nNext paragraph\ncontinues";
        assert_eq!(
            reflow(text),
            "First line second line\n\nNext paragraph continues"
        );
    }

    #[test]
    fn test_reflow_empty() {
        assert_eq!(reflow(""), "");
        assert_eq!(reflow("\n\n  \n"), "");
    }
}
