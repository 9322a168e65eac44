use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use smallvec::SmallVec;

/// Identifier of one letter cell. The same label in two slots means
/// those positions must spell the same letter.
pub type Label = u32;

/// A slot's normalized form: each label replaced by its rank in the
/// sorted set of the slot's distinct labels.
///
/// Two slots with equal shape accept exactly the same words and share
/// one compiled dictionary.
pub type Shape = SmallVec<[u16; 16]>;

/// One parsed topology line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    /// Labels in original order; a repeated label means the same cell
    /// occurs at several positions of the word.
    pub labels: Vec<Label>,
    /// Dictionary path, when the line named one.
    pub dictionary: Option<PathBuf>,
}

/// Errors raised while reading a topology file.
#[derive(Debug)]
pub enum TopologyError {
    /// The file could not be read.
    Io(io::Error),
    /// A non-comment line held something other than a comma-separated
    /// list of non-negative integers.
    MalformedLabel {
        /// One-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::Io(e) => write!(f, "reading topology: {e}"),
            TopologyError::MalformedLabel { line, token } => {
                write!(f, "line {line}: malformed label {token:?}")
            }
        }
    }
}

impl Error for TopologyError {}

impl From<io::Error> for TopologyError {
    fn from(e: io::Error) -> Self {
        TopologyError::Io(e)
    }
}

/// Parses a topology from a buffered reader.
///
/// Lines starting with `#` and empty lines are skipped. Every other
/// line is `labels[:dictionary_path]` with comma-separated decimal
/// labels; a malformed line aborts the parse. Line order defines the
/// slot order used in output.
pub fn parse(reader: impl BufRead) -> Result<Vec<SlotSpec>, TopologyError> {
    let mut slots = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (labels_part, dictionary) = match line.split_once(':') {
            Some((labels, path)) if !path.is_empty() => (labels, Some(PathBuf::from(path))),
            Some((labels, _)) => (labels, None),
            None => (line, None),
        };
        let mut labels = Vec::new();
        for token in labels_part.split(',') {
            let token = token.trim();
            let label = token.parse().map_err(|_| TopologyError::MalformedLabel {
                line: number + 1,
                token: token.to_string(),
            })?;
            labels.push(label);
        }
        slots.push(SlotSpec { labels, dictionary });
    }
    Ok(slots)
}

/// Parses a topology file; see [`parse`].
pub fn parse_file(path: &Path) -> Result<Vec<SlotSpec>, TopologyError> {
    parse(BufReader::new(File::open(path)?))
}

/// The slot's normalized form; see [`Shape`].
pub fn shape(labels: &[Label]) -> Shape {
    let mut distinct = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    labels
        .iter()
        .map(|label| distinct.partition_point(|&d| d < *label) as u16)
        .collect()
}

/// Renumbers the labels of all slots to the dense range `0..L`,
/// preserving their relative order, and returns `L`.
pub fn renumber(slots: &mut [Vec<Label>]) -> usize {
    let mut mapping: Vec<Label> = slots.iter().flatten().copied().collect();
    mapping.sort_unstable();
    mapping.dedup();
    for labels in slots.iter_mut() {
        for label in labels.iter_mut() {
            *label = mapping.partition_point(|&m| m < *label) as Label;
        }
    }
    mapping.len()
}

/// For each label, the slots that contain it, each listed once.
///
/// A slot advances its word-graph cursor exactly once per distinct
/// label: ascending label order visits the slot's compressed word
/// positions in order.
pub fn invert(slots: &[Vec<Label>], label_count: usize) -> Vec<Vec<usize>> {
    let mut touching = vec![Vec::new(); label_count];
    for (index, labels) in slots.iter().enumerate() {
        for &label in labels {
            let list = &mut touching[label as usize];
            // Occurrences of one slot arrive consecutively.
            if list.last() != Some(&index) {
                list.push(index);
            }
        }
    }
    touching
}
