//! Byte-budgeted segmentation of sanitized text.
//!
//! Splitting happens at three levels: sentence terminators first, clause
//! separators for sentences that overflow the budget, and finally character
//! boundaries for clauses that still overflow. Chunks are exact substrings
//! of the input, so concatenating them reproduces it losslessly.

/// Default chunk budget in UTF-8 bytes.
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 800;

/// Sentence-ending punctuation; stays attached to the preceding segment.
const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '…', '!', '?', '.', '\n'];

/// Clause separators used when a whole sentence exceeds the budget.
const CLAUSE_SEPARATORS: &[char] = &['，', '、', '；', ',', ';'];

/// Split text into chunks whose UTF-8 byte length stays within `max_bytes`.
///
/// Deterministic and stateless. Empty or all-whitespace input yields an
/// empty list. A single character whose encoding alone exceeds the budget
/// is passed through as its own oversized chunk rather than dropped.
pub fn segment_text(text: &str, max_bytes: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let max_bytes = max_bytes.max(1);

    pack(&split_after(text, SENTENCE_TERMINATORS), max_bytes, split_clauses)
}

/// Re-split an oversized sentence on clause separators.
fn split_clauses(sentence: &str, max_bytes: usize) -> Vec<String> {
    pack(&split_after(sentence, CLAUSE_SEPARATORS), max_bytes, split_chars)
}

/// Last resort: accumulate characters up to the budget.
///
/// No character is ever split across two chunks, so a multi-byte character
/// that alone exceeds the budget still lands in exactly one chunk.
fn split_chars(clause: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for c in clause.chars() {
        if !current.is_empty() && current.len() + c.len_utf8() > max_bytes {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split `text` after every boundary character, keeping the boundary
/// attached to the preceding piece. Pieces partition the input exactly.
fn split_after<'a>(text: &'a str, boundaries: &[char]) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if boundaries.contains(&c) {
            let end = i + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

/// Greedily accumulate segments into chunks within the byte budget.
///
/// A single segment that overflows the budget on its own is handed to
/// `split_oversized` and its pieces emitted in place.
fn pack<F>(segments: &[&str], max_bytes: usize, split_oversized: F) -> Vec<String>
where
    F: Fn(&str, usize) -> Vec<String>,
{
    let mut chunks = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if segment.len() > max_bytes {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(
                split_oversized(segment, max_bytes)
                    .into_iter()
                    .filter(|piece| !piece.is_empty()),
            );
        } else if current.len() + segment.len() <= max_bytes {
            current.push_str(segment);
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.push_str(segment);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_lossless(text: &str, chunks: &[String]) {
        let joined: String = chunks.concat();
        assert_eq!(joined, text, "chunks must partition the input exactly");
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_text("", 800).is_empty());
        assert!(segment_text("   \t  ", 800).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = segment_text("你好。Hello.", 800);
        assert_eq!(chunks, vec!["你好。Hello."]);
    }

    #[test]
    fn test_sentences_packed_greedily() {
        // Each sentence is 18 bytes; two fit in 36, the third starts anew.
        let text = "这是一句话。这是一句话。这是一句话。";
        let chunks = segment_text(text, 36);
        assert_eq!(chunks, vec!["这是一句话。这是一句话。", "这是一句话。"]);
        assert_lossless(text, &chunks);
    }

    #[test]
    fn test_clause_split_for_long_sentence() {
        let text = "第一部分，第二部分，第三部分。";
        // Whole sentence is 45 bytes; each clause is 15.
        let chunks = segment_text(text, 30);
        assert_eq!(chunks, vec!["第一部分，第二部分，", "第三部分。"]);
        assert_lossless(text, &chunks);
    }

    #[test]
    fn test_char_split_for_long_clause() {
        let text = "aaaaaaaaaa";
        let chunks = segment_text(text, 4);
        assert_eq!(chunks, vec!["aaaa", "aaaa", "aa"]);
    }

    #[test]
    fn test_char_split_respects_multibyte_boundaries() {
        // Four 3-byte characters with a 7-byte budget: only two fit per chunk.
        let text = "汉字汉字";
        let chunks = segment_text(text, 7);
        assert_eq!(chunks, vec!["汉字", "汉字"]);
        for chunk in &chunks {
            assert!(chunk.len() <= 7);
        }
    }

    #[test]
    fn test_oversized_single_char_kept_whole() {
        let chunks = segment_text("好", 1);
        assert_eq!(chunks, vec!["好"]);
        assert_eq!(chunks[0].len(), 3);
    }

    #[test]
    fn test_terminator_stays_attached() {
        let chunks = segment_text("one. two.", 5);
        assert_eq!(chunks, vec!["one.", " two."]);
    }

    #[test]
    fn test_newline_is_a_terminator() {
        let chunks = segment_text("first\nsecond", 6);
        assert_eq!(chunks, vec!["first\n", "second"]);
    }

    #[test]
    fn test_mixed_cjk_scenario() {
        let text = format!(
            "这是第一句。这是第二句，包含一个很长的列举项，{}。第三句。",
            "a".repeat(300)
        );
        let chunks = segment_text(&text, 100);
        assert!(chunks.len() >= 3, "expected 3+ chunks, got {}", chunks.len());
        for chunk in &chunks {
            assert!(chunk.len() <= 100, "chunk is {} bytes", chunk.len());
        }
        assert_lossless(&text, &chunks);
    }

    #[test]
    fn test_deterministic() {
        let text = "重复调用，结果一致。Repeat calls, same result.";
        assert_eq!(segment_text(text, 20), segment_text(text, 20));
    }

    proptest! {
        #[test]
        fn prop_chunks_within_budget(
            text in "[一-龥a-zA-Z0-9 ，。、！,\\.!? ]{0,200}",
            budget in 8usize..80,
        ) {
            for chunk in segment_text(&text, budget) {
                prop_assert!(chunk.len() <= budget, "{} bytes > {}", chunk.len(), budget);
                prop_assert!(!chunk.is_empty());
            }
        }

        #[test]
        fn prop_concatenation_is_lossless(
            text in "[一-龥a-zA-Z0-9 ，。、！,\\.!? ]{0,200}",
            budget in 8usize..80,
        ) {
            let chunks = segment_text(&text, budget);
            if text.trim().is_empty() {
                prop_assert!(chunks.is_empty());
            } else {
                prop_assert_eq!(chunks.concat(), text);
            }
        }
    }
}
