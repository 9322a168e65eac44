use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use smallvec::{smallvec, SmallVec};
use typed_arena::Arena;

use crate::dawg::builder::TrieBuilder;
use crate::dawg::compact::{flatten, CompactNode};
use crate::letters::letter_index;
use crate::topology::{shape, Label, Shape};

/// Index of a compiled dictionary in a [`DictionaryCache`].
pub type DawgId = usize;

/// A word compressed to one letter per distinct slot label.
type CompressedWord = SmallVec<[u8; 32]>;

/// Errors raised while loading dictionaries.
#[derive(Debug)]
pub enum DictionaryError {
    /// The dictionary file could not be read.
    Io(PathBuf, io::Error),
    /// The slot named no dictionary and no default is configured.
    MissingPath,
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryError::Io(path, e) => {
                write!(f, "reading dictionary {}: {e}", path.display())
            }
            DictionaryError::MissingPath => {
                write!(f, "no dictionary given and no default configured")
            }
        }
    }
}

impl Error for DictionaryError {}

/// True if `word` repeats letters exactly where `shape` repeats labels.
fn follows_form(shape: &Shape, word: &[u8]) -> bool {
    for (i, &rank) in shape.iter().enumerate() {
        if let Some(first) = shape[..i].iter().position(|&r| r == rank) {
            if word[first] != word[i] {
                return false;
            }
        }
    }
    true
}

/// Maps `word` onto compressed positions: position `shape[i]` receives
/// letter `word[i]`. The form check guarantees repeats agree, so every
/// position is filled consistently.
fn compress(shape: &Shape, word: &[u8]) -> CompressedWord {
    let distinct = shape.iter().max().map_or(0, |&m| m as usize + 1);
    let mut out: CompressedWord = smallvec![0; distinct];
    for (i, &rank) in shape.iter().enumerate() {
        out[rank as usize] = word[i];
    }
    out
}

/// The compressed form of `word` if the slot accepts it.
///
/// A word is accepted when its length equals the shape's, it consists
/// only of `a`–`z`, and it satisfies the form constraint; everything
/// else is silently discarded.
fn accept(shape: &Shape, word: &str) -> Option<CompressedWord> {
    if word.len() != shape.len() {
        return None;
    }
    let letters: SmallVec<[u8; 32]> = word
        .bytes()
        .map(letter_index)
        .collect::<Option<SmallVec<[u8; 32]>>>()?;
    follows_form(shape, &letters).then(|| compress(shape, &letters))
}

/// Compiles the words a slot of the given shape accepts into a compact
/// word graph.
pub fn compile_words<'a>(
    shape: &Shape,
    words: impl IntoIterator<Item = &'a str>,
) -> Vec<CompactNode> {
    let arena = Arena::new();
    let mut builder = TrieBuilder::new(&arena);
    for word in words {
        if let Some(compressed) = accept(shape, word) {
            builder.insert(&compressed);
        }
    }
    flatten(builder.root(), builder.node_count())
}

/// Reads one word per line from `path` and compiles the accepted ones;
/// see [`compile_words`].
pub fn compile_file(path: &Path, shape: &Shape) -> Result<Vec<CompactNode>, DictionaryError> {
    let file = File::open(path).map_err(|e| DictionaryError::Io(path.to_path_buf(), e))?;
    let mut reader = BufReader::new(file);

    let arena = Arena::new();
    let mut builder = TrieBuilder::new(&arena);
    // Call read_line repeatedly so one string buffer serves every line.
    let mut buf = String::with_capacity(80);
    loop {
        buf.clear();
        match reader.read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => return Err(DictionaryError::Io(path.to_path_buf(), e)),
        }
        if let Some(compressed) = accept(shape, buf.trim_end()) {
            builder.insert(&compressed);
        }
    }
    Ok(flatten(builder.root(), builder.node_count()))
}

/// Compiled dictionaries, deduplicated by (path, slot shape).
///
/// Slots with the same shape reading the same path share one compiled
/// graph; repeated requests return the cached [`DawgId`].
pub struct DictionaryCache {
    default_path: Option<PathBuf>,
    entries: HashMap<(PathBuf, Shape), DawgId>,
    compiled: Vec<Vec<CompactNode>>,
}

impl DictionaryCache {
    /// Creates an empty cache; `default_path` serves slots whose
    /// topology line named no dictionary.
    pub fn new(default_path: Option<PathBuf>) -> DictionaryCache {
        DictionaryCache {
            default_path,
            entries: HashMap::new(),
            compiled: Vec::new(),
        }
    }

    /// Loads (or reuses) the dictionary for a slot with the given
    /// labels.
    pub fn load(
        &mut self,
        path: Option<&Path>,
        labels: &[Label],
    ) -> Result<DawgId, DictionaryError> {
        let path = path
            .or(self.default_path.as_deref())
            .ok_or(DictionaryError::MissingPath)?;
        let slot_shape = shape(labels);
        let key = (path.to_path_buf(), slot_shape);
        if let Some(&id) = self.entries.get(&key) {
            return Ok(id);
        }
        let nodes = compile_file(&key.0, &key.1)?;
        let id = self.compiled.len();
        self.compiled.push(nodes);
        self.entries.insert(key, id);
        Ok(id)
    }

    /// The compiled graphs, indexed by [`DawgId`].
    pub fn compiled(&self) -> &[Vec<CompactNode>] {
        &self.compiled
    }
}
