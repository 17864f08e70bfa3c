use crate::util::{round2, word_count};
use itertools::{EitherOrBoth, Itertools};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharOutcome {
    Untyped,
    Correct,
    Incorrect,
}

/// Final numbers for a completed session.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ScoreSummary {
    pub words_per_minute: f64,
    pub accuracy_percent: f64,
    pub correct_word_count: usize,
    pub incorrect_word_count: usize,
    pub words_typed: usize,
}

/// Classify every reference character against the typed text.
///
/// Yields one `(expected_char, outcome)` per reference character; positions
/// past the end of the typed text are `Untyped`. Recomputed in full per call,
/// which is fine for a single paragraph.
pub fn char_feedback<'a>(
    reference: &'a str,
    typed: &str,
) -> impl Iterator<Item = (char, CharOutcome)> + 'a {
    let typed: Vec<char> = typed.chars().collect();
    reference.chars().enumerate().map(move |(idx, expected)| {
        let outcome = match typed.get(idx) {
            None => CharOutcome::Untyped,
            Some(&c) if c == expected => CharOutcome::Correct,
            Some(_) => CharOutcome::Incorrect,
        };
        (expected, outcome)
    })
}

/// Word-by-word comparison of typed text against the reference.
///
/// Empty typed tokens (runs of spaces) are skipped without consuming a
/// reference position; typed words past the end of the reference count as
/// incorrect; reference words the user never reached are ignored.
pub fn word_tally(reference: &str, typed: &str) -> (usize, usize) {
    let mut correct = 0;
    let mut incorrect = 0;

    for pair in typed
        .split(' ')
        .filter(|w| !w.is_empty())
        .zip_longest(reference.split(' '))
    {
        match pair {
            EitherOrBoth::Both(typed_word, expected) => {
                if typed_word == expected {
                    correct += 1;
                } else {
                    incorrect += 1;
                }
            }
            EitherOrBoth::Left(_) => incorrect += 1,
            EitherOrBoth::Right(_) => break,
        }
    }

    (correct, incorrect)
}

/// Compute the end-of-session summary. Pure: identical inputs always
/// produce identical outputs.
///
/// Accuracy over an empty reference is reported as 0.0 rather than NaN, and
/// is deliberately not clamped at 100: typing more non-empty words than the
/// reference contains reports a ratio above 100%.
pub fn summarize(reference: &str, typed: &str, elapsed_secs: u64) -> ScoreSummary {
    let (correct_word_count, incorrect_word_count) = word_tally(reference, typed);
    let words_typed = word_count(typed);

    let words_per_minute = if elapsed_secs == 0 {
        0.0
    } else {
        round2(words_typed as f64 / elapsed_secs as f64 * 60.0)
    };

    let reference_words = word_count(reference);
    let accuracy_percent = if reference_words == 0 {
        0.0
    } else {
        round2(words_typed as f64 / reference_words as f64 * 100.0)
    };

    ScoreSummary {
        words_per_minute,
        accuracy_percent,
        correct_word_count,
        incorrect_word_count,
        words_typed,
    }
}
