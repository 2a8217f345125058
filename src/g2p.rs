//! Grapheme-to-phoneme transliteration
//!
//! Produces the ideal (expected) phoneme sequence from reference text in
//! the target language's orthography. Deterministic and offline: the same
//! text always yields the same sequence.
//!
//! The shipped implementation covers Ukrainian, whose orthography is close
//! to phonemic, with a letter-to-IPA rule table plus the handful of
//! contextual rules that matter for scoring: iotated vowels (я/ю/є/ї) take
//! a `j` onset word-initially, after a vowel, after an apostrophe, or after
//! a soft sign, and palatalize the preceding consonant otherwise; the soft
//! sign palatalizes the preceding consonant; дж/дз form affricates.

use crate::phonemes::PhonemeSequence;

/// Maps orthographic text to a phoneme sequence for one fixed language.
///
/// Implementations are process-wide, read-only after construction, and safe
/// for repeated sequential invocation.
pub trait Transliterator: Send + Sync {
    /// ISO 639-3 code of the supported language
    fn language(&self) -> &'static str;

    /// Transliterate text into its expected phonetic transcription
    fn to_phonemes(&self, text: &str) -> PhonemeSequence;
}

/// Rule-table transliterator for Ukrainian (Cyrillic orthography)
#[derive(Debug, Default)]
pub struct UkrainianTransliterator;

impl UkrainianTransliterator {
    pub fn new() -> Self {
        Self
    }
}

/// Per-word transliteration state
struct WordState {
    /// Last emitted symbol is a consonant eligible for palatalization
    after_consonant: bool,
    /// A soft sign or apostrophe separates the next iotated vowel from the
    /// preceding consonant, forcing a `j` onset
    separated: bool,
}

impl WordState {
    fn boundary() -> Self {
        Self {
            after_consonant: false,
            separated: false,
        }
    }
}

impl Transliterator for UkrainianTransliterator {
    fn language(&self) -> &'static str {
        "ukr"
    }

    fn to_phonemes(&self, text: &str) -> PhonemeSequence {
        let mut out = PhonemeSequence::default();
        let mut state = WordState::boundary();

        let lowered = text.to_lowercase();
        let mut chars = lowered.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                // plain vowels
                'а' | 'е' | 'и' | 'і' | 'о' | 'у' => {
                    out.push(plain_vowel(c));
                    state.after_consonant = false;
                    state.separated = false;
                }

                // iotated vowels: j-onset or palatalization of the
                // preceding consonant, depending on context
                'я' | 'ю' | 'є' | 'ї' => {
                    let vowel = iotated_vowel(c);
                    // ї is always /ji/ regardless of position
                    if c != 'ї' && state.after_consonant && !state.separated {
                        out.amend_last("ʲ");
                    } else {
                        out.push("j");
                    }
                    out.push(vowel);
                    state.after_consonant = false;
                    state.separated = false;
                }

                // дж / дз affricates
                'д' => {
                    match chars.peek() {
                        Some('ж') => {
                            chars.next();
                            out.push("d\u{0361}ʒ");
                        }
                        Some('з') => {
                            chars.next();
                            out.push("d\u{0361}z");
                        }
                        _ => out.push("d"),
                    }
                    state.after_consonant = true;
                    state.separated = false;
                }

                // щ is the cluster /ʃt͡ʃ/, two symbols
                'щ' => {
                    out.push("ʃ");
                    out.push("t\u{0361}ʃ");
                    state.after_consonant = true;
                    state.separated = false;
                }

                // soft sign: palatalize the preceding consonant; a following
                // iotated vowel then takes a j onset (нья -> nʲ j a)
                'ь' => {
                    if state.after_consonant {
                        out.amend_last("ʲ");
                    }
                    state.after_consonant = false;
                    state.separated = true;
                }

                // apostrophe: hard separator before an iotated vowel
                '\'' | '\u{2019}' | '\u{02BC}' => {
                    state.separated = true;
                }

                // remaining consonants via the plain table
                _ => {
                    if let Some(symbol) = plain_consonant(c) {
                        out.push(symbol);
                        state.after_consonant = true;
                        state.separated = false;
                    } else {
                        // not Ukrainian orthography: word boundary
                        state = WordState::boundary();
                    }
                }
            }
        }

        out
    }
}

fn plain_vowel(c: char) -> &'static str {
    match c {
        'а' => "a",
        'е' => "ɛ",
        'и' => "ɪ",
        'і' => "i",
        'о' => "ɔ",
        'у' => "u",
        _ => unreachable!("caller matched vowels only"),
    }
}

/// Vowel component of an iotated letter
fn iotated_vowel(c: char) -> &'static str {
    match c {
        'я' => "a",
        'ю' => "u",
        'є' => "ɛ",
        'ї' => "i",
        _ => unreachable!("caller matched iotated vowels only"),
    }
}

fn plain_consonant(c: char) -> Option<&'static str> {
    Some(match c {
        'б' => "b",
        'в' => "ʋ",
        'г' => "ɦ",
        'ґ' => "ɡ",
        'ж' => "ʒ",
        'з' => "z",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'ф' => "f",
        'х' => "x",
        'ц' => "t\u{0361}s",
        'ч' => "t\u{0361}ʃ",
        'ш' => "ʃ",
        _ => return None,
    })
}

// ============================================================================
// Tests
// ============================================================================
