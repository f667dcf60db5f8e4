// ============================================================
// Layer 3 — Special Tokens
// ============================================================
// Both tokenizers reserve the first four ids:
//
//   0 = PAD   right-padding, ignored by the loss
//   1 = UNK   unknown piece
//   2 = BOS   first token of every target sequence
//   3 = EOS   terminates target sequences and greedy decoding

use serde::{Deserialize, Serialize};

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const BOS_ID: u32 = 2;
pub const EOS_ID: u32 = 3;

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const BOS_TOKEN: &str = "[BOS]";
pub const EOS_TOKEN: &str = "[EOS]";

/// Special tokens in id order — index i holds the token with id i.
pub const SPECIAL_TOKENS: [&str; 4] = [PAD_TOKEN, UNK_TOKEN, BOS_TOKEN, EOS_TOKEN];

/// True for PAD, UNK, BOS and EOS.
pub fn is_special(id: u32) -> bool {
    matches!(id, PAD_ID | UNK_ID | BOS_ID | EOS_ID)
}

/// True for the ids that only frame a sequence (PAD, BOS, EOS).
/// UNK carries content and is kept when detokenising.
pub fn is_framing(id: u32) -> bool {
    matches!(id, PAD_ID | BOS_ID | EOS_ID)
}

/// Which half of a sentence pair a tokenizer serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageSide {
    Source,
    Target,
}

impl LanguageSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageSide::Source => "source",
            LanguageSide::Target => "target",
        }
    }

    /// The language this side holds for a `"<source>-<target>"`
    /// pair key, after an optional reversal. Keys without a dash
    /// fall back to `<pair>.<column>`.
    pub fn language(&self, pair: &str, reverse: bool) -> String {
        let column = match (self, reverse) {
            (LanguageSide::Source, false) | (LanguageSide::Target, true) => LanguageSide::Source,
            _ => LanguageSide::Target,
        };
        match pair.split_once('-') {
            Some((source, target)) => match column {
                LanguageSide::Source => source.to_string(),
                LanguageSide::Target => target.to_string(),
            },
            None => format!("{}.{}", pair, column.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_ids_match_token_order() {
        assert_eq!(SPECIAL_TOKENS[PAD_ID as usize], PAD_TOKEN);
        assert_eq!(SPECIAL_TOKENS[UNK_ID as usize], UNK_TOKEN);
        assert_eq!(SPECIAL_TOKENS[BOS_ID as usize], BOS_TOKEN);
        assert_eq!(SPECIAL_TOKENS[EOS_ID as usize], EOS_TOKEN);
    }

    #[test]
    fn test_framing_excludes_unk() {
        assert!(is_framing(PAD_ID));
        assert!(is_framing(BOS_ID));
        assert!(is_framing(EOS_ID));
        assert!(!is_framing(UNK_ID));
        assert!(is_special(UNK_ID));
        assert!(!is_special(4));
    }

    #[test]
    fn test_language_follows_reversal() {
        let pair = "English-Bengali";
        assert_eq!(LanguageSide::Source.language(pair, false), "English");
        assert_eq!(LanguageSide::Target.language(pair, false), "Bengali");
        assert_eq!(LanguageSide::Source.language(pair, true), "Bengali");
        assert_eq!(LanguageSide::Target.language(pair, true), "English");
        assert_eq!(LanguageSide::Source.language("corpus", true), "corpus.target");
    }
}
