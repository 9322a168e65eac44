//! # gridfill
//!
//! A coupled-[DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! enumeration engine for crossword and field-grid filling.
//!
//! A *topology* is a set of fixed-length slots whose letter positions
//! carry integer labels; the same label in two slots pins those
//! positions to the same letter. Given one dictionary per slot,
//! `gridfill` enumerates every assignment of letters to labels under
//! which every slot spells a dictionary word.
//!
//! ## Features
//!
//! - **Mask-indexed word graphs**: each node addresses its children
//!   through a 26-bit mask and a popcount, so branching on the next
//!   legal letter is constant-time
//! - **Arena-wide minimization**: isomorphic subgraphs are merged
//!   bottom-up and re-laid as one flat, cache-friendly array shared by
//!   all slots
//! - **Coupled backtracking**: the search advances one shared label at
//!   a time, pruning by intersecting the per-slot legal-letter masks
//! - **Parallel**: the top level fans out over the 26 first letters;
//!   workers share the arena read-only
//!
//! ## Quick start
//!
//! ```
//! use gridfill::dictionary::compile_words;
//! use gridfill::solver::{Config, Puzzle};
//! use gridfill::topology::{renumber, shape};
//!
//! // Two crossing three-letter slots sharing the cell labelled 2.
//! let mut slots = vec![vec![0, 1, 2], vec![2, 3, 4]];
//! let label_count = renumber(&mut slots);
//!
//! let words = ["cat", "car", "rat", "rag", "tar", "tan"];
//! let compiled: Vec<_> = slots
//!     .iter()
//!     .map(|labels| compile_words(&shape(labels), words))
//!     .collect();
//!
//! let puzzle = Puzzle::assemble(
//!     slots.into_iter().zip(0..).collect(),
//!     &compiled,
//!     label_count,
//! )
//! .unwrap();
//!
//! let mut out = Vec::new();
//! puzzle.solve(&Config::default(), &mut out).unwrap();
//! let lines: Vec<&str> = std::str::from_utf8(&out).unwrap().lines().collect();
//! assert_eq!(lines.len(), 8);
//! assert!(lines.contains(&" cat tar"));
//! ```

#![warn(missing_docs)]

/// Word-graph construction: mutable builder, compact encoding, and the
/// arena-wide minimizer.
pub mod dawg;
/// Dictionary loading: word filtering, compression, and the compiled
/// cache.
pub mod dictionary;
/// Letter indices and the 26-bit letter mask.
pub mod letters;
/// Puzzle assembly, the coupled enumerator, and the parallel driver.
pub mod solver;
/// Topology parsing and normalization.
pub mod topology;
