//! Sanitization of raw course text before segmentation.

/// Opening delimiter of a pronunciation annotation.
const ANNOTATION_OPEN: char = '⟪';
/// Separator between the annotated word and its pronunciation.
const ANNOTATION_SEP: char = '⧸';
/// Closing delimiter of a pronunciation annotation.
const ANNOTATION_CLOSE: char = '⟫';

/// Strip characters that are decorative or semantically inert for speech.
///
/// This function:
/// - Removes pronunciation annotations (`⟪word⧸reading⟫`), whole when
///   well-formed, delimiters only when malformed or unterminated
/// - Removes emoji, zero-width joiners, variation selectors, combining
///   marks used for emoji composition, and musical symbols
/// - Collapses whitespace runs to a single space and trims both ends
///
/// Never fails; malformed input degrades to best-effort stripping.
pub fn sanitize_text(text: &str) -> String {
    let stripped = strip_annotations(text);

    let mut result = String::with_capacity(stripped.len());
    let mut prev_was_space = false;

    for c in stripped.chars() {
        if is_unspeakable(c) {
            continue;
        }
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result.trim().to_string()
}

/// Remove pronunciation annotations.
///
/// A well-formed `⟪…⟫` span is removed entirely. An unterminated opener is
/// dropped on its own, keeping the text that follows; stray separators and
/// closers are dropped wherever they appear.
fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(ANNOTATION_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + ANNOTATION_OPEN.len_utf8()..];
        match after_open.find(ANNOTATION_CLOSE) {
            Some(end) => rest = &after_open[end + ANNOTATION_CLOSE.len_utf8()..],
            // Unterminated: drop the delimiter, keep the content.
            None => rest = after_open,
        }
    }
    out.push_str(rest);

    out.retain(|c| c != ANNOTATION_SEP && c != ANNOTATION_CLOSE);
    out
}

/// Check if a character carries nothing a synthesizer should say aloud.
fn is_unspeakable(c: char) -> bool {
    matches!(u32::from(c),
        // Emoji blocks
        0x1F300..=0x1F5FF      // symbols and pictographs
        | 0x1F600..=0x1F64F    // emoticons
        | 0x1F680..=0x1F6FF    // transport and map symbols
        | 0x1F900..=0x1F9FF    // supplemental symbols
        | 0x1FA70..=0x1FAFF    // symbols extended-A
        | 0x2600..=0x26FF      // miscellaneous symbols
        | 0x2700..=0x27BF      // dingbats
        | 0x1F1E6..=0x1F1FF    // regional indicators (flags)
        // Emoji composition machinery
        | 0x200D               // zero-width joiner
        | 0xFE00..=0xFE0F      // variation selectors
        | 0x20D0..=0x20FF      // combining marks for symbols
        // Music notation
        | 0x1D100..=0x1D1FF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_removed_whole() {
        assert_eq!(sanitize_text("⟪汉字⧸hanzi⟫你好😀"), "你好");
    }

    #[test]
    fn test_unterminated_annotation_stripped_piecewise() {
        assert_eq!(sanitize_text("⟪汉字⧸hanzi你好"), "汉字hanzi你好");
    }

    #[test]
    fn test_stray_delimiters_removed() {
        assert_eq!(sanitize_text("a⧸b⟫c"), "abc");
    }

    #[test]
    fn test_multiple_annotations() {
        assert_eq!(sanitize_text("读⟪音⧸yin⟫和⟪义⧸yi⟫之分"), "读和之分");
    }

    #[test]
    fn test_emoji_removed() {
        assert_eq!(sanitize_text("做得好👍🎉继续"), "做得好继续");
    }

    #[test]
    fn test_zwj_sequence_removed() {
        // Family emoji: four pictographs joined by zero-width joiners.
        assert_eq!(
            sanitize_text("family \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466} here"),
            "family here"
        );
    }

    #[test]
    fn test_variation_selector_and_keycap() {
        assert_eq!(sanitize_text("one 1\u{FE0F}\u{20E3} two"), "one 1 two");
    }

    #[test]
    fn test_musical_symbols_removed() {
        assert_eq!(sanitize_text("note \u{1D11E} sign"), "note sign");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(sanitize_text("  hello \t\n  world  "), "hello world");
    }

    #[test]
    fn test_empty_and_decoration_only() {
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_text("😀🎉"), "");
        assert_eq!(sanitize_text("⟪a⧸b⟫"), "");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize_text("这是一句话。And English."), "这是一句话。And English.");
    }
}
