//! Phoneme sequences and IPA tokenization
//!
//! Alignment operates on discrete phoneme symbols, never on raw text
//! characters. Comparing IPA strings character-by-character conflates
//! spacing mismatches with genuine phonetic differences and splits
//! multi-character symbols (affricate ligatures like `t͡s`, palatalized
//! consonants like `nʲ`) in the middle, so both transcriptions are
//! tokenized here before they reach the alignment engine.

use std::fmt;

/// Ordered sequence of phoneme tokens, one token per phonetic symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonemeSequence {
    tokens: Vec<String>,
}

impl PhonemeSequence {
    /// Build a sequence from pre-segmented tokens
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokenize a raw IPA transcription into phoneme symbols.
    ///
    /// Whitespace separates symbols outright (recognizer output is usually
    /// space-separated). Within an unspaced run, a new symbol starts at each
    /// base character; combining diacritics and modifier letters attach to
    /// the preceding base, and a tie bar joins the following base character
    /// into the same symbol (`t͡s` stays one token).
    pub fn parse(raw: &str) -> Self {
        let mut tokens = Vec::new();

        for chunk in raw.split_whitespace() {
            let mut current = String::new();
            let mut pending_tie = false;

            for c in chunk.chars() {
                if current.is_empty() || pending_tie || attaches_to_base(c) {
                    pending_tie = is_tie_bar(c);
                    current.push(c);
                } else {
                    tokens.push(std::mem::take(&mut current));
                    pending_tie = false;
                    current.push(c);
                }
            }
            if !current.is_empty() {
                tokens.push(current);
            }
        }

        Self { tokens }
    }

    /// Phoneme tokens in order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of phoneme symbols
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Push one symbol onto the end of the sequence
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Append a modifier (e.g. palatalization `ʲ`) to the last symbol, if any
    pub fn amend_last(&mut self, suffix: &str) {
        if let Some(last) = self.tokens.last_mut() {
            last.push_str(suffix);
        }
    }

    /// Last symbol, if any
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }
}

impl fmt::Display for PhonemeSequence {
    /// Space-separated symbol form used on the wire and in feedback lines
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Whether `c` attaches to the preceding base character instead of
/// starting a new symbol: combining diacritics (U+0300..U+036F, includes
/// tie bars) and spacing modifier letters (U+02B0..U+02FF, includes
/// `ʲ`, `ʰ`, `ː`).
fn attaches_to_base(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{02B0}'..='\u{02FF}')
}

/// Tie bars join the NEXT base character into the current symbol
fn is_tie_bar(c: char) -> bool {
    matches!(c, '\u{0361}' | '\u{035C}')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> Vec<String> {
        PhonemeSequence::parse(raw).tokens().to_vec()
    }

    #[test]
    fn test_parse_space_separated() {
        assert_eq!(tokens("r ɪ b a"), vec!["r", "ɪ", "b", "a"]);
    }

    #[test]
    fn test_parse_unspaced_run() {
        assert_eq!(tokens("rɪba"), vec!["r", "ɪ", "b", "a"]);
    }

    #[test]
    fn test_parse_empty_and_whitespace() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \t ").is_empty());
    }

    #[test]
    fn test_modifier_attaches_to_base() {
        // palatalized n and long vowel stay single symbols
        assert_eq!(tokens("nʲa"), vec!["nʲ", "a"]);
        assert_eq!(tokens("aː b"), vec!["aː", "b"]);
    }

    #[test]
    fn test_combining_diacritic_attaches_to_base() {
        // nasalized a (U+0303 combining tilde)
        assert_eq!(tokens("a\u{0303} p"), vec!["a\u{0303}", "p"]);
    }

    #[test]
    fn test_tie_bar_joins_affricate() {
        assert_eq!(tokens("t͡sa"), vec!["t͡s", "a"]);
        assert_eq!(tokens("ʃt͡ʃɛ"), vec!["ʃ", "t͡ʃ", "ɛ"]);
    }

    #[test]
    fn test_mixed_spacing_is_equivalent() {
        assert_eq!(tokens("t͡s ɪ b a"), tokens("t͡sɪba"));
    }

    #[test]
    fn test_display_is_space_separated() {
        let seq = PhonemeSequence::parse("t͡sɪba");
        assert_eq!(seq.to_string(), "t͡s ɪ b a");
    }

    #[test]
    fn test_amend_last() {
        let mut seq = PhonemeSequence::from_tokens(["n"]);
        seq.amend_last("ʲ");
        assert_eq!(seq.tokens(), &["nʲ".to_string()]);

        // no-op on empty sequence
        let mut empty = PhonemeSequence::default();
        empty.amend_last("ʲ");
        assert!(empty.is_empty());
    }
}
