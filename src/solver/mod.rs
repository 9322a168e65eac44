use std::error::Error;
use std::fmt;
use std::io::{self, Write};

use log::info;

use crate::dawg::compact::{CompactNode, DawgArena, NodeId};
use crate::dawg::minimize::minimize;
use crate::dictionary::DawgId;
use crate::topology::{invert, Label};

mod driver;
mod enumerate;

/// Upper bound on the number of distinct labels in a topology; the
/// enumerator's stacks are sized by the label count.
pub const MAX_LABELS: usize = 32;

/// Solve-time options.
#[derive(Debug, Clone)]
pub struct Config {
    /// When false, a solution spelling the same word in two slots is
    /// dropped whole.
    pub allow_duplicate_words: bool,
    /// Worker threads; `None` uses one per core.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            allow_duplicate_words: true,
            threads: None,
        }
    }
}

/// Errors raised while assembling a puzzle.
#[derive(Debug)]
pub enum PuzzleError {
    /// The renumbered label count exceeds [`MAX_LABELS`].
    TooManyLabels(usize),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::TooManyLabels(count) => {
                write!(f, "{count} labels exceed the supported {MAX_LABELS}")
            }
        }
    }
}

impl Error for PuzzleError {}

/// Errors raised while solving.
#[derive(Debug)]
pub enum SolveError {
    /// Writing a solution line failed.
    Io(io::Error),
    /// The requested thread pool could not be built.
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Io(e) => write!(f, "writing solutions: {e}"),
            SolveError::ThreadPool(e) => write!(f, "building thread pool: {e}"),
        }
    }
}

impl Error for SolveError {}

/// A fully prepared search: the minimized shared arena plus per-slot
/// handles and the precomputed label table.
pub struct Puzzle {
    arena: DawgArena,
    roots: Vec<NodeId>,
    slots: Vec<Vec<Label>>,
    touching: Vec<Vec<usize>>,
}

impl Puzzle {
    /// Assembles a puzzle from renumbered slots and their compiled
    /// dictionaries.
    ///
    /// Each slot pairs its label sequence with an index into
    /// `compiled`; `label_count` is the dense count `renumber`
    /// returned. The compiled graphs are concatenated into one arena
    /// (self-relative offsets move as they are), minimized once, and
    /// inverted into the label table.
    pub fn assemble(
        slots: Vec<(Vec<Label>, DawgId)>,
        compiled: &[Vec<CompactNode>],
        label_count: usize,
    ) -> Result<Puzzle, PuzzleError> {
        if label_count > MAX_LABELS {
            return Err(PuzzleError::TooManyLabels(label_count));
        }
        let total = compiled.iter().map(Vec::len).sum();
        let mut nodes: Vec<CompactNode> = Vec::with_capacity(total);
        let mut bases = Vec::with_capacity(compiled.len());
        for graph in compiled {
            bases.push(NodeId(nodes.len() as u32));
            nodes.extend_from_slice(graph);
        }
        let mut roots: Vec<NodeId> = slots.iter().map(|&(_, dawg)| bases[dawg]).collect();

        let (before, after) = minimize(&mut nodes, &mut roots);
        info!("word graph: {before} nodes, {after} after compression");

        let paths: Vec<Vec<Label>> = slots.into_iter().map(|(labels, _)| labels).collect();
        let touching = invert(&paths, label_count);
        debug_assert!(touching.iter().all(|touched| !touched.is_empty()));

        Ok(Puzzle {
            arena: DawgArena::new(nodes),
            roots,
            slots: paths,
            touching,
        })
    }

    /// Number of nodes in the shared arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Enumerates every solution, writing one line per solution to
    /// `out`: a leading space, then one word per slot in slot order.
    ///
    /// Lines from different seed letters may interleave arbitrarily;
    /// each line is written atomically.
    pub fn solve<W: Write + Send>(&self, config: &Config, out: &mut W) -> Result<(), SolveError> {
        driver::solve(self, config, out)
    }
}
