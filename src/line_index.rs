//! Offset to line/character mapping for arbitrary text.
//!
//! Works on any text blob (source files, external templates, stylesheets),
//! not just Rust sources. Offsets are UTF-8 byte offsets and `character` is
//! the byte distance from the start of the line.

use serde::Serialize;

const LINE_SEPARATOR: char = '\u{2028}';
const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// A zero-based line and character pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineAndCharacter {
    pub line: usize,
    pub character: usize,
}

/// Compute the start offset of every line in `text`.
///
/// Recognizes LF, CR, CRLF (one terminator), U+2028 and U+2029. The result
/// always starts with `0` and ends with `text.len()`.
pub fn compute_line_starts_map(text: &str) -> Vec<usize> {
    let mut result = vec![0];
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\r' => {
                if let Some(&(_, '\n')) = chars.peek() {
                    chars.next();
                    result.push(idx + 2);
                } else {
                    result.push(idx + 1);
                }
            }
            '\n' => result.push(idx + 1),
            LINE_SEPARATOR | PARAGRAPH_SEPARATOR => result.push(idx + ch.len_utf8()),
            _ => {}
        }
    }

    result.push(text.len());
    result
}

/// Map an offset to its line and character using a map produced by
/// [`compute_line_starts_map`].
///
/// The trailing end-of-text entry is not treated as a line of its own, so a
/// position at (or past) the end of the text lands on the last line.
pub fn get_line_and_character_from_position(line_starts: &[usize], position: usize) -> LineAndCharacter {
    let searchable = match line_starts.len() {
        0 => return LineAndCharacter { line: 0, character: position },
        1 => line_starts,
        n => &line_starts[..n - 1],
    };

    // `searchable[0]` is always 0, so at least one start is <= position.
    let line = searchable.partition_point(|&start| start <= position).saturating_sub(1);
    LineAndCharacter {
        line,
        character: position - searchable[line],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminator_count(text: &str) -> usize {
        let mut count = 0;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    count += 1;
                }
                '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => count += 1,
                _ => {}
            }
        }
        count
    }

    #[test]
    fn test_line_starts_shape() {
        let samples = [
            "",
            "single line",
            "a\nb",
            "a\r\nb\rc\n",
            "trailing\n\n",
            "sep\u{2028}para\u{2029}end",
            "\r\r\n\n",
        ];
        for text in samples {
            let starts = compute_line_starts_map(text);
            assert_eq!(starts.len(), terminator_count(text) + 2, "text: {:?}", text);
            assert_eq!(starts[0], 0);
            assert_eq!(*starts.last().unwrap(), text.len());
        }
    }

    #[test]
    fn test_crlf_is_one_terminator() {
        assert_eq!(compute_line_starts_map("ab\r\ncd"), vec![0, 4, 6]);
    }

    #[test]
    fn test_unicode_separators_advance_by_encoded_length() {
        // U+2028 is three bytes in UTF-8.
        assert_eq!(compute_line_starts_map("a\u{2028}b"), vec![0, 4, 5]);
    }

    #[test]
    fn test_every_offset_reconstructs() {
        let text = "<div>\r\n  <span foo></span>\n\r</div>\u{2029}x";
        let starts = compute_line_starts_map(text);
        for pos in 0..=text.len() {
            let lc = get_line_and_character_from_position(&starts, pos);
            assert_eq!(starts[lc.line] + lc.character, pos);
        }
    }

    #[test]
    fn test_position_on_line_start() {
        let starts = compute_line_starts_map("one\ntwo\nthree");
        assert_eq!(
            get_line_and_character_from_position(&starts, 4),
            LineAndCharacter { line: 1, character: 0 }
        );
        assert_eq!(
            get_line_and_character_from_position(&starts, 6),
            LineAndCharacter { line: 1, character: 2 }
        );
    }

    #[test]
    fn test_position_past_end_uses_last_line() {
        let starts = compute_line_starts_map("one\ntwo");
        assert_eq!(
            get_line_and_character_from_position(&starts, 7),
            LineAndCharacter { line: 1, character: 3 }
        );
        assert_eq!(
            get_line_and_character_from_position(&starts, 40),
            LineAndCharacter { line: 1, character: 36 }
        );
    }

    #[test]
    fn test_empty_text() {
        let starts = compute_line_starts_map("");
        assert_eq!(starts, vec![0, 0]);
        assert_eq!(
            get_line_and_character_from_position(&starts, 0),
            LineAndCharacter { line: 0, character: 0 }
        );
    }
}
