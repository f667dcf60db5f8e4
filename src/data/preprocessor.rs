// ============================================================
// Layer 4 — Sentence Preprocessor
// ============================================================
// Normalises a sentence before it reaches the tokenizer:
//
//   1. Tabs, newlines, NBSP, zero-width space, BOM → plain space
//   2. Other control characters → space
//   3. Runs of spaces collapse to one, edges trimmed
//
// ZWJ / ZWNJ (U+200D / U+200C) are kept: Bengali conjuncts
// depend on them.

#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one sentence. The result never contains a newline.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control()                 => ' ',
                c                                    => c,
            };
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_control_chars_and_newlines_become_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world\r\nagain\tnow"), "hello world again now");
    }

    #[test]
    fn test_keeps_bengali_joiners() {
        let p = Preprocessor::new();
        let s = "র\u{200D}্য";
        assert_eq!(p.clean(s), s);
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean(" \u{00A0} "), "");
    }
}
