use std::cell::{Cell, Ref, RefCell};

use itertools::{Itertools, Position};
use typed_arena::Arena;

use crate::letters::LetterMask;

/// A node of the mutable prefix graph built while loading a dictionary.
///
/// `mask` records the legal next letters; `children` holds one node per
/// set mask bit, in letter order. At the final position of a word the
/// letter is recorded in `mask` only and no child is allocated, so a
/// node terminating an index's words keeps an empty child list while
/// its mask still names the final letters.
pub struct TrieNode<'a> {
    mask: Cell<u32>,
    children: RefCell<Vec<&'a TrieNode<'a>>>,
}

impl<'a> TrieNode<'a> {
    fn new() -> Self {
        TrieNode {
            mask: Cell::new(0),
            children: RefCell::new(Vec::new()),
        }
    }

    /// The legal-next-letter mask of this node.
    #[inline]
    pub fn mask(&self) -> LetterMask {
        LetterMask::from_bits(self.mask.get())
    }

    /// The node `letter` leads to. The letter must be present in the
    /// mask and the node must not be terminal.
    #[inline]
    pub fn child(&self, letter: u8) -> &'a TrieNode<'a> {
        self.children.borrow()[self.mask().rank(letter) as usize]
    }

    /// The children in letter order; empty for terminal nodes.
    pub fn children(&self) -> Ref<'_, Vec<&'a TrieNode<'a>>> {
        self.children.borrow()
    }
}

/// Incremental builder for one fixed-length word index.
///
/// Words are compressed letter sequences, one letter per distinct slot
/// label; every word added to a single builder must have the same
/// length, and the structure records no word boundaries. Insertion
/// order does not matter — structure sharing happens later, in the
/// arena-wide minimization pass.
pub struct TrieBuilder<'a> {
    arena: &'a Arena<TrieNode<'a>>,
    root: &'a TrieNode<'a>,
}

impl<'a> TrieBuilder<'a> {
    /// Creates a builder allocating its nodes from `arena`.
    pub fn new(arena: &'a Arena<TrieNode<'a>>) -> Self {
        TrieBuilder {
            arena,
            root: arena.alloc(TrieNode::new()),
        }
    }

    /// Adds one word, given as letter indices in `0..26`.
    pub fn insert(&mut self, word: &[u8]) {
        let mut node = self.root;
        for (position, &letter) in word.iter().with_position() {
            let last = matches!(position, Position::Last | Position::Only);
            let mask = node.mask();
            if !mask.contains(letter) {
                node.mask.set(mask.bits() | 1 << letter);
                if !last {
                    let child = self.arena.alloc(TrieNode::new());
                    // Rank over the old mask equals rank over the new
                    // one: only bits below `letter` count.
                    node.children
                        .borrow_mut()
                        .insert(mask.rank(letter) as usize, child);
                }
            }
            if !last {
                node = node.child(letter);
            }
        }
    }

    /// The root of the graph built so far.
    pub fn root(&self) -> &'a TrieNode<'a> {
        self.root
    }

    /// Number of nodes allocated so far, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}
