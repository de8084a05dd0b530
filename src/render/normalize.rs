//! Unicode cleanup applied to each line before classification.

use unicode_normalization::UnicodeNormalization;

/// Typographic ligatures and their expansions.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),  // ﬀ
    ('\u{FB01}', "fi"),  // ﬁ
    ('\u{FB02}', "fl"),  // ﬂ
    ('\u{FB03}', "ffi"), // ﬃ
    ('\u{FB04}', "ffl"), // ﬄ
    ('\u{FB05}', "st"),  // ﬅ (long s + t)
    ('\u{FB06}', "st"),  // ﬆ
];

/// NFC-normalize `text`, expand ligatures and drop U+FFFD.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.nfc() {
        if c == '\u{FFFD}' {
            continue;
        }
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expansion)) => result.push_str(expansion),
            None => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligatures_expanded() {
        assert_eq!(normalize_text("e\u{FB03}cient \u{FB01}le"), "efficient file");
    }

    #[test]
    fn test_nfc_composition() {
        // e + combining acute accent
        assert_eq!(normalize_text("cafe\u{0301}"), "café");
    }

    #[test]
    fn test_replacement_char_dropped() {
        assert_eq!(normalize_text("bro\u{FFFD}ken"), "broken");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize_text("  - Item one"), "  - Item one");
    }
}
