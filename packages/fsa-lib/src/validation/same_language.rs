use itertools::{Itertools, repeat_n};

use crate::automaton::{Language, Letter};

/// All words over `alphabet` of length at most `max_word_length`, shortest
/// first. The empty word comes first.
pub fn words_up_to<L: Letter>(alphabet: &[L], max_word_length: usize) -> Vec<Vec<L>> {
    let mut words = vec![vec![]];

    for i in 1..=max_word_length {
        words.extend(
            repeat_n(alphabet, i)
                .multi_cartesian_product()
                .map(|word| word.into_iter().cloned().collect_vec()),
        );
    }

    words
}

/// Whether `a` and `b` share an alphabet and agree on every word of length at
/// most `max_word_length`.
pub fn same_language<L: Letter>(
    a: &impl Language<Letter = L>,
    b: &impl Language<Letter = L>,
    max_word_length: usize,
) -> bool {
    if a.alphabet() != b.alphabet() {
        return false;
    }

    words_up_to(a.alphabet(), max_word_length)
        .iter()
        .all(|word| a.accepts(word) == b.accepts(word))
}

pub fn assert_same_language<L: Letter>(
    a: &impl Language<Letter = L>,
    b: &impl Language<Letter = L>,
    max_word_length: usize,
) {
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    for word in words_up_to(a.alphabet(), max_word_length) {
        match (a.accepts(&word), b.accepts(&word)) {
            (true, false) => {
                panic!(
                    "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                    word
                );
            }
            (false, true) => {
                panic!(
                    "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                    word
                );
            }
            _ => {}
        }
    }
}

#[test]
fn test_words_up_to() {
    let words = words_up_to(&['a', 'b'], 2);
    assert_eq!(words.len(), 1 + 2 + 4);
    assert!(words[0].is_empty());
    assert_eq!(words[3], vec!['a', 'a']);
}
