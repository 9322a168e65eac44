use std::io::{self, Write};
use std::sync::Mutex;

use itertools::Itertools;
use rayon::prelude::*;

use crate::letters::{letter_char, ALPHABET};
use crate::solver::enumerate::enumerate_seeded;
use crate::solver::{Config, Puzzle, SolveError};

/// Fans the search out over the 26 seed letters and serializes the
/// emitted lines through one mutex.
///
/// Rayon's work-stealing queue dispenses the seeds; each worker runs
/// the enumerator over a private copy of the slot handles while the
/// arena is shared read-only.
pub(crate) fn solve<W: Write + Send>(
    puzzle: &Puzzle,
    config: &Config,
    out: &mut W,
) -> Result<(), SolveError> {
    if puzzle.touching.is_empty() {
        return Ok(());
    }
    let sink = Mutex::new(out);
    let failure: Mutex<Option<io::Error>> = Mutex::new(None);

    let worker = |seed: u8| {
        let mut cursors = puzzle.roots.clone();
        enumerate_seeded(
            &puzzle.arena,
            &puzzle.touching,
            &mut cursors,
            seed,
            |assignment| emit(puzzle, config, &sink, &failure, assignment),
        );
    };
    let fan_out = || (0..ALPHABET).into_par_iter().for_each(worker);
    match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(SolveError::ThreadPool)?
            .install(fan_out),
        None => fan_out(),
    }

    match failure.into_inner().expect("sink poisoned") {
        Some(error) => Err(SolveError::Io(error)),
        None => Ok(()),
    }
}

/// Reads the slot words out of a complete assignment, applies the
/// duplicate-word policy, and writes the solution as one line.
fn emit<W: Write>(
    puzzle: &Puzzle,
    config: &Config,
    sink: &Mutex<&mut W>,
    failure: &Mutex<Option<io::Error>>,
    assignment: &[u8],
) {
    let words: Vec<String> = puzzle
        .slots
        .iter()
        .map(|labels| {
            labels
                .iter()
                .map(|&label| letter_char(assignment[label as usize]))
                .collect()
        })
        .collect();
    if !config.allow_duplicate_words && !words.iter().all_unique() {
        return;
    }

    let mut out = sink.lock().expect("sink poisoned");
    if let Err(error) = writeln!(out, " {}", words.iter().join(" ")) {
        failure.lock().expect("sink poisoned").get_or_insert(error);
    }
}

#[cfg(test)]
mod test {
    use crate::dictionary::compile_words;
    use crate::solver::{Config, Puzzle, PuzzleError, MAX_LABELS};
    use crate::topology::{renumber, shape, Label};

    fn puzzle(slot_labels: &[&[Label]], words: &[&str]) -> Puzzle {
        let mut slots: Vec<Vec<Label>> = slot_labels.iter().map(|l| l.to_vec()).collect();
        let label_count = renumber(&mut slots);
        let compiled: Vec<_> = slots
            .iter()
            .map(|labels| compile_words(&shape(labels), words.iter().copied()))
            .collect();
        let slots = slots.into_iter().zip(0..).collect();
        Puzzle::assemble(slots, &compiled, label_count).unwrap()
    }

    fn lines(puzzle: &Puzzle, config: &Config) -> Vec<String> {
        let mut out = Vec::new();
        puzzle.solve(config, &mut out).unwrap();
        let mut lines: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }

    fn solved(slot_labels: &[&[Label]], words: &[&str]) -> Vec<String> {
        lines(&puzzle(slot_labels, words), &Config::default())
    }

    #[test]
    fn crossing_without_continuations_finds_nothing() {
        // No word starts with the final letter of another.
        let found = solved(&[&[0, 1, 2], &[2, 3, 4]], &["cat", "car", "bar", "bat"]);
        assert!(found.is_empty());
    }

    #[test]
    fn crossing_with_continuations() {
        let found = solved(
            &[&[0, 1, 2], &[2, 3, 4]],
            &["cat", "car", "rat", "rag", "tar", "tan"],
        );
        let mut expected = vec![
            " cat tar", " cat tan", " car rat", " car rag", " rat tar", " rat tan",
            " tar rat", " tar rag",
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn single_slot_lists_the_dictionary() {
        let found = solved(&[&[0, 1, 2]], &["foo", "bar"]);
        assert_eq!(found, vec![" bar", " foo"]);
    }

    #[test]
    fn repeated_label_accepts_palindromes_only() {
        let found = solved(&[&[0, 1, 0]], &["eve", "ada", "bob", "car"]);
        assert_eq!(found, vec![" ada", " bob", " eve"]);
    }

    #[test]
    fn duplicate_word_policy() {
        let identical = [&[0u32, 1, 2] as &[Label], &[0, 1, 2]];
        let words = ["cat", "car"];

        let allowed = lines(&puzzle(&identical, &words), &Config::default());
        assert_eq!(allowed, vec![" car car", " cat cat"]);

        let config = Config {
            allow_duplicate_words: false,
            ..Config::default()
        };
        let suppressed = lines(&puzzle(&identical, &words), &config);
        assert!(suppressed.is_empty());
    }

    #[test]
    fn disjoint_slots_cross_product() {
        let found = solved(&[&[0, 1], &[2, 3]], &["ab", "cd"]);
        assert_eq!(found, vec![" ab ab", " ab cd", " cd ab", " cd cd"]);
    }

    #[test]
    fn sparse_labels_renumber_before_solving() {
        // Same crossing as above, written with gappy label values.
        let found = solved(&[&[10, 40, 70], &[70, 80, 90]], &["cat", "tar", "tan"]);
        assert_eq!(found, vec![" cat tan", " cat tar"]);
    }

    #[test]
    fn empty_topology_yields_nothing() {
        let empty = Puzzle::assemble(Vec::new(), &[], 0).unwrap();
        let mut out = Vec::new();
        empty.solve(&Config::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn empty_dictionary_is_success_not_error() {
        let found = solved(&[&[0, 1, 2], &[2, 3, 4]], &[]);
        assert!(found.is_empty());
    }

    #[test]
    fn one_word_dictionary_yields_exactly_that_word() {
        let found = solved(&[&[0, 1, 2]], &["cat"]);
        assert_eq!(found, vec![" cat"]);
    }

    #[test]
    fn solution_set_is_independent_of_worker_count() {
        let labels = [&[0u32, 1, 2] as &[Label], &[2, 3, 4]];
        let words = ["cat", "car", "rat", "rag", "tar", "tan"];
        let p = puzzle(&labels, &words);

        let reference = lines(&p, &Config::default());
        for threads in [1, 2, 8] {
            let config = Config {
                threads: Some(threads),
                ..Config::default()
            };
            assert_eq!(lines(&p, &config), reference);
        }
        // And of repetition.
        assert_eq!(lines(&p, &Config::default()), reference);
    }

    #[test]
    fn oversize_label_count_is_rejected() {
        let labels: Vec<Label> = (0..MAX_LABELS as Label + 1).collect();
        let compiled = [compile_words(&shape(&labels), [])];
        let result = Puzzle::assemble(vec![(labels, 0)], &compiled, MAX_LABELS + 1);
        assert!(matches!(result, Err(PuzzleError::TooManyLabels(_))));
    }
}
