//! Phoneme alignment and scoring engine
//!
//! Computes the edit distance between the reference (ideal) and recognized
//! phoneme sequences, recovers one minimal edit script, converts the
//! distance into an accuracy percentage, and classifies each non-matching
//! edit step into a pronunciation error.
//!
//! Pure and deterministic: no side effects, and for a fixed pair of inputs
//! the same script (and therefore the same error list) is produced every
//! time. See `backtrack` for the tie-break policy that makes this so.

use crate::phonemes::PhonemeSequence;
use crate::types::{ErrorKind, PronunciationError, ABSENT};

/// One step of the minimal transformation from reference to actual.
///
/// Indices refer to positions in the reference (`ref_idx`) and actual
/// (`act_idx`) token sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Tokens match; contributes no error
    Equal { ref_idx: usize, act_idx: usize },
    /// Reference token replaced by a different actual token
    Substitute { ref_idx: usize, act_idx: usize },
    /// Reference token absent from the actual sequence
    Delete { ref_idx: usize },
    /// Actual token with no counterpart in the reference
    Insert { act_idx: usize },
}

/// Alignment outcome: distance, accuracy percentage, and classified errors
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Minimum number of substitute/delete/insert operations
    pub distance: usize,
    /// `(1 - distance / maxLen) * 100`, or 100.0 when both sequences are empty
    pub accuracy: f64,
    /// One error per non-`Equal` edit step, in script order
    pub errors: Vec<PronunciationError>,
}

/// Score a recognized phoneme sequence against the reference sequence.
pub fn score(reference: &PhonemeSequence, actual: &PhonemeSequence) -> Alignment {
    let matrix = distance_matrix(reference.tokens(), actual.tokens());
    let distance = matrix[reference.len()][actual.len()];
    let script = backtrack(&matrix, reference.tokens(), actual.tokens());
    let errors = classify(&script, reference.tokens(), actual.tokens());

    Alignment {
        distance,
        accuracy: accuracy(distance, reference.len(), actual.len()),
        errors,
    }
}

/// Accuracy percentage for a given distance and pair of sequence lengths.
///
/// Both sequences empty is a trivial perfect match by definition.
fn accuracy(distance: usize, ref_len: usize, act_len: usize) -> f64 {
    let max_len = ref_len.max(act_len);
    if max_len == 0 {
        return 100.0;
    }
    (1.0 - distance as f64 / max_len as f64) * 100.0
}

/// Unit-cost edit distance matrix over token sequences.
///
/// `matrix[i][j]` is the distance between the first `i` reference tokens and
/// the first `j` actual tokens.
fn distance_matrix(reference: &[String], actual: &[String]) -> Vec<Vec<usize>> {
    let ref_len = reference.len();
    let act_len = actual.len();

    let mut matrix = vec![vec![0usize; act_len + 1]; ref_len + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=act_len {
        matrix[0][j] = j;
    }

    for i in 1..=ref_len {
        for j in 1..=act_len {
            let cost = usize::from(reference[i - 1] != actual[j - 1]);

            matrix[i][j] = (matrix[i - 1][j] + 1) // deletion
                .min(matrix[i][j - 1] + 1) // insertion
                .min(matrix[i - 1][j - 1] + cost); // substitution / match
        }
    }

    matrix
}

/// Recover one minimal edit script from the distance matrix.
///
/// Tie-break when several minimal-cost moves reach a cell, checked in this
/// fixed order: diagonal (match/substitution) first, then deletion, then
/// insertion. The order decides which errors get reported for equal-cost
/// alternatives, so it must not change between releases.
fn backtrack(matrix: &[Vec<usize>], reference: &[String], actual: &[String]) -> Vec<EditOp> {
    let mut script = Vec::new();
    let mut i = reference.len();
    let mut j = actual.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let matched = reference[i - 1] == actual[j - 1];
            let cost = usize::from(!matched);
            if matrix[i][j] == matrix[i - 1][j - 1] + cost {
                script.push(if matched {
                    EditOp::Equal {
                        ref_idx: i - 1,
                        act_idx: j - 1,
                    }
                } else {
                    EditOp::Substitute {
                        ref_idx: i - 1,
                        act_idx: j - 1,
                    }
                });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && matrix[i][j] == matrix[i - 1][j] + 1 {
            script.push(EditOp::Delete { ref_idx: i - 1 });
            i -= 1;
            continue;
        }
        script.push(EditOp::Insert { act_idx: j - 1 });
        j -= 1;
    }

    script.reverse();
    script
}

/// Turn the edit script into pronunciation errors, in script order.
fn classify(
    script: &[EditOp],
    reference: &[String],
    actual: &[String],
) -> Vec<PronunciationError> {
    script
        .iter()
        .filter_map(|op| match *op {
            EditOp::Equal { .. } => None,
            EditOp::Substitute { ref_idx, act_idx } => Some(PronunciationError {
                expected: reference[ref_idx].clone(),
                actual: actual[act_idx].clone(),
                kind: ErrorKind::Mispronunciation,
            }),
            EditOp::Delete { ref_idx } => Some(PronunciationError {
                expected: reference[ref_idx].clone(),
                actual: ABSENT.to_string(),
                kind: ErrorKind::Omission,
            }),
            EditOp::Insert { act_idx } => Some(PronunciationError {
                expected: ABSENT.to_string(),
                actual: actual[act_idx].clone(),
                kind: ErrorKind::Insertion,
            }),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
