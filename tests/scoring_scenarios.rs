//! End-to-end scoring scenarios
//!
//! Exercises the alignment engine through the public API with realistic
//! IPA transcriptions, including the transliterator-to-alignment path a
//! live request takes.

use vymova_sw::alignment::score;
use vymova_sw::g2p::{Transliterator, UkrainianTransliterator};
use vymova_sw::phonemes::PhonemeSequence;
use vymova_sw::types::ErrorKind;

fn seq(raw: &str) -> PhonemeSequence {
    PhonemeSequence::parse(raw)
}

#[test]
fn perfect_attempt_scores_hundred() {
    let g2p = UkrainianTransliterator::new();
    let reference = g2p.to_phonemes("риба");
    // recognizer output matching the ideal transcription exactly
    let recognized = seq("r ɪ b a");

    let result = score(&reference, &recognized);
    assert_eq!(result.distance, 0);
    assert_eq!(result.accuracy, 100.0);
    assert!(result.errors.is_empty());
}

#[test]
fn r_l_confusion_is_one_mispronunciation() {
    let g2p = UkrainianTransliterator::new();
    let reference = g2p.to_phonemes("риба");
    let recognized = seq("l ɪ b a");

    let result = score(&reference, &recognized);
    assert_eq!(result.distance, 1);
    assert_eq!(result.accuracy, 75.0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Mispronunciation);
    assert_eq!(result.errors[0].expected, "r");
    assert_eq!(result.errors[0].actual, "l");
}

#[test]
fn dropped_onset_is_one_omission() {
    let result = score(&seq("r ɪ b a"), &seq("ɪ b a"));
    assert_eq!(result.distance, 1);
    assert_eq!(result.accuracy, 75.0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Omission);
    assert_eq!(result.errors[0].expected, "r");
    assert_eq!(result.errors[0].actual, "-");
}

#[test]
fn trailing_extra_phoneme_is_one_insertion() {
    let result = score(&seq("r ɪ b a"), &seq("r ɪ b a s"));
    assert_eq!(result.distance, 1);
    assert_eq!(result.accuracy, 80.0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Insertion);
    assert_eq!(result.errors[0].expected, "-");
    assert_eq!(result.errors[0].actual, "s");
}

#[test]
fn affricate_counts_as_single_symbol() {
    // a learner splitting the affricate t͡s into t + s is two edits against
    // the single reference symbol, not a spacing artifact
    let result = score(&seq("t͡s a"), &seq("t s a"));
    assert_eq!(result.distance, 2);
    // maxLen is 3 (t s a), so accuracy reflects token counts, not chars
    assert!((result.accuracy - ((1.0 - 2.0 / 3.0) * 100.0)).abs() < 1e-9);
}

#[test]
fn spacing_differences_do_not_affect_the_score() {
    // recognizers disagree on whitespace; tokenization makes the spaced
    // and unspaced transcriptions identical
    let result = score(&seq("rɪba"), &seq("r ɪ b a"));
    assert_eq!(result.distance, 0);
    assert_eq!(result.accuracy, 100.0);
}

#[test]
fn silent_audio_scores_zero_with_all_omissions() {
    let g2p = UkrainianTransliterator::new();
    let reference = g2p.to_phonemes("так");
    let result = score(&reference, &PhonemeSequence::default());

    assert_eq!(result.distance, reference.len());
    assert_eq!(result.accuracy, 0.0);
    assert_eq!(result.errors.len(), reference.len());
    assert!(result.errors.iter().all(|e| e.kind == ErrorKind::Omission));
}

#[test]
fn garbled_attempt_reports_errors_in_utterance_order() {
    let g2p = UkrainianTransliterator::new();
    let reference = g2p.to_phonemes("день"); // d ɛ nʲ
    let recognized = seq("t ɛ n a");

    let result = score(&reference, &recognized);
    assert_eq!(result.distance, 3);
    assert_eq!(result.errors.len(), 3);
    // the tie-break keeps the final substitution (nʲ -> a) and reports the
    // extra n as the insertion
    assert_eq!(result.errors[0].kind, ErrorKind::Mispronunciation);
    assert_eq!(result.errors[0].expected, "d");
    assert_eq!(result.errors[0].actual, "t");
    assert_eq!(result.errors[1].kind, ErrorKind::Insertion);
    assert_eq!(result.errors[1].actual, "n");
    assert_eq!(result.errors[2].kind, ErrorKind::Mispronunciation);
    assert_eq!(result.errors[2].expected, "nʲ");
    assert_eq!(result.errors[2].actual, "a");
}
