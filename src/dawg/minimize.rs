use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dawg::compact::{CompactNode, NodeId};

/// Signatures longer than this are never installed as canonical, which
/// bounds the table cost; long spines simply keep their storage.
const SIGNATURE_CAP: usize = 100;

type Signature = SmallVec<[u32; 32]>;

/// Merges structurally identical subgraphs of `nodes` and compacts the
/// array, rewriting `handles` in lockstep.
///
/// Children must sit at larger indices than their parents — the
/// breadth-first layout `flatten` produces — so the reverse pass always
/// sees settled children. Returns the node counts before and after
/// compaction. Running the pass on its own output removes nothing.
pub fn minimize(nodes: &mut Vec<CompactNode>, handles: &mut [NodeId]) -> (usize, usize) {
    let before = nodes.len();
    let mut canonical: HashMap<Signature, u32> = HashMap::new();
    let mut removed = vec![false; nodes.len()];
    let mut signature = Signature::new();

    for index in (0..nodes.len()).rev() {
        if removed[index] {
            continue;
        }
        signature.clear();
        if !write_signature(nodes, index, &mut signature) {
            // Over the cap: neither canonical nor mergeable.
            continue;
        }
        match canonical.get(&signature) {
            Some(&winner) => {
                let node = nodes[index];
                if node.children == 0 {
                    // Childless nodes have no storage to share; they
                    // merge transitively, when their parents do.
                    continue;
                }
                let base = index as u32 + node.children;
                let winner_base = winner + nodes[winner as usize].children;
                if base != winner_base {
                    for child in base..base + node.mask().len() {
                        removed[child as usize] = true;
                    }
                    nodes[index].children = winner_base - index as u32;
                }
            }
            None => {
                canonical.insert(signature.clone(), index as u32);
            }
        }
    }

    // Re-layout: slide survivors down with absolute child targets, then
    // remap the targets and every external handle.
    let mut relocation = vec![u32::MAX; nodes.len()];
    let mut next = 0u32;
    for index in 0..nodes.len() {
        if removed[index] {
            continue;
        }
        relocation[index] = next;
        let mut node = nodes[index];
        // Leaves point at themselves here and come back out as 0.
        node.children += index as u32;
        nodes[next as usize] = node;
        next += 1;
    }
    nodes.truncate(next as usize);
    for handle in handles.iter_mut() {
        handle.0 = relocation[handle.0 as usize];
    }
    for (index, node) in nodes.iter_mut().enumerate() {
        node.children = relocation[node.children as usize] - index as u32;
    }
    (before, nodes.len())
}

/// Appends the subgraph signature rooted at `index`: `(mask << 6) |
/// depth` for the node, then each child's signature in letter order.
///
/// Returns false once the signature exceeds [`SIGNATURE_CAP`], leaving
/// the buffer truncated.
fn write_signature(nodes: &[CompactNode], index: usize, out: &mut Signature) -> bool {
    if out.len() >= SIGNATURE_CAP {
        return false;
    }
    let node = nodes[index];
    out.push((node.mask << 6) | depth(nodes, index));
    if node.children != 0 {
        let base = index + node.children as usize;
        for child in base..base + node.mask().len() as usize {
            if !write_signature(nodes, child, out) {
                return false;
            }
        }
    }
    true
}

/// Node count along the first-child chain. Every word below a node has
/// the same length, so any chain would measure the same.
fn depth(nodes: &[CompactNode], index: usize) -> u32 {
    let mut at = index;
    let mut depth = 1;
    while nodes[at].children != 0 {
        at += nodes[at].children as usize;
        depth += 1;
    }
    depth
}
