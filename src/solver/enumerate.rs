use crate::dawg::compact::{DawgArena, NodeId};
use crate::letters::LetterMask;

/// Runs the coupled depth-first enumeration with `seed` fixed as the
/// letter of label 0.
///
/// `cursors` holds one arena handle per slot, positioned at the slot
/// roots; it is scratch space consumed by the run. Every complete
/// assignment is passed to `emit` as one letter per label. Within one
/// call, assignments appear in lexicographic stack order.
pub(crate) fn enumerate_seeded(
    arena: &DawgArena,
    touching: &[Vec<usize>],
    cursors: &mut [NodeId],
    seed: u8,
    mut emit: impl FnMut(&[u8]),
) {
    let labels = touching.len();
    if labels == 0 {
        return;
    }
    let slots = cursors.len();

    let mut stack = vec![0u8; labels];
    let mut mask_stack = vec![LetterMask::EMPTY; labels];
    // Parent snapshots, one dense labels × slots plane; only the
    // touched columns of a row are ever written or read back.
    let mut parents = vec![NodeId::default(); labels * slots];

    mask_stack[0] = combined_mask(arena, &touching[0], cursors);
    if !mask_stack[0].contains(seed) {
        return;
    }
    stack[0] = seed;
    if labels == 1 {
        emit(&stack);
        return;
    }

    descend(arena, &touching[0], cursors, &mut parents[..slots], seed);
    let mut depth = 1;
    mask_stack[1] = combined_mask(arena, &touching[1], cursors);

    // The run ends when the seed's subtree is exhausted and control
    // returns to depth 0.
    while depth > 0 {
        let remaining = mask_stack[depth].bits() >> stack[depth];
        if remaining == 0 {
            // Move up, restoring the touched cursors, then right.
            depth -= 1;
            let row = &parents[depth * slots..(depth + 1) * slots];
            for &slot in &touching[depth] {
                cursors[slot] = row[slot];
            }
            stack[depth] += 1;
            continue;
        }
        // Advance to the lowest remaining legal letter.
        stack[depth] += remaining.trailing_zeros() as u8;
        if depth + 1 == labels {
            emit(&stack);
            stack[depth] += 1;
        } else {
            let letter = stack[depth];
            descend(
                arena,
                &touching[depth],
                cursors,
                &mut parents[depth * slots..(depth + 1) * slots],
                letter,
            );
            depth += 1;
            stack[depth] = 0;
            mask_stack[depth] = combined_mask(arena, &touching[depth], cursors);
        }
    }
}

/// Saves the touched cursors into `parent_row` and steps each of them
/// to its `letter` child.
#[inline]
fn descend(
    arena: &DawgArena,
    touching_row: &[usize],
    cursors: &mut [NodeId],
    parent_row: &mut [NodeId],
    letter: u8,
) {
    for &slot in touching_row {
        parent_row[slot] = cursors[slot];
        cursors[slot] = arena.child(cursors[slot], letter);
    }
}

/// Intersection of the legal-next-letter masks of every slot touching
/// the label.
#[inline]
fn combined_mask(arena: &DawgArena, touching_row: &[usize], cursors: &[NodeId]) -> LetterMask {
    touching_row
        .iter()
        .fold(LetterMask::ALL, |mask, &slot| mask & arena.mask(cursors[slot]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dictionary::compile_words;
    use crate::topology::{invert, shape};

    fn solutions(
        slot_labels: &[&[u32]],
        words: &[&str],
        seed: u8,
    ) -> Vec<Vec<u8>> {
        let compiled: Vec<_> = slot_labels
            .iter()
            .map(|labels| compile_words(&shape(labels), words.iter().copied()))
            .collect();
        let mut nodes = Vec::new();
        let mut roots = Vec::new();
        for graph in &compiled {
            roots.push(NodeId(nodes.len() as u32));
            nodes.extend_from_slice(graph);
        }
        let arena = DawgArena::new(nodes);
        let label_count = slot_labels
            .iter()
            .flat_map(|labels| labels.iter())
            .max()
            .map_or(0, |&m| m as usize + 1);
        let paths: Vec<Vec<u32>> = slot_labels.iter().map(|l| l.to_vec()).collect();
        let touching = invert(&paths, label_count);

        let mut found = Vec::new();
        let mut cursors = roots;
        enumerate_seeded(&arena, &touching, &mut cursors, seed, |assignment| {
            found.push(assignment.to_vec())
        });
        found
    }

    #[test]
    fn seeded_run_covers_only_its_subtree() {
        // One slot over cat/car/bat; seeding with c excludes bat.
        let found = solutions(&[&[0, 1, 2]], &["cat", "car", "bat"], 2);
        assert_eq!(found, vec![vec![2, 0, 17], vec![2, 0, 19]]);
    }

    #[test]
    fn absent_seed_is_rejected_up_front() {
        let found = solutions(&[&[0, 1, 2]], &["cat"], 3);
        assert!(found.is_empty());
    }

    #[test]
    fn results_are_lexicographic_in_the_stack() {
        let found = solutions(
            &[&[0, 1]],
            &["ad", "ab", "ba", "ac"],
            0,
        );
        assert_eq!(found, vec![vec![0, 1], vec![0, 2], vec![0, 3]]);
    }

    #[test]
    fn crossing_slots_intersect_masks() {
        // Slots 0,1,2 and 2,3,4 crossing at label 2.
        let found = solutions(
            &[&[0, 1, 2], &[2, 3, 4]],
            &["cat", "tar", "tan"],
            2,
        );
        // cat crossed with tar and tan; the t of cat seeds slot 1.
        assert_eq!(found, vec![vec![2, 0, 19, 0, 13], vec![2, 0, 19, 0, 17]]);
    }

    #[test]
    fn repeated_label_consumes_one_level() {
        // Palindrome slot: label 0 appears twice.
        let found = solutions(&[&[0, 1, 0]], &["eve", "ada", "bob"], 4);
        assert_eq!(found, vec![vec![4, 21]]);
    }

    #[test]
    fn empty_root_intersection_terminates_immediately() {
        // The doubled slot accepts twin-letter words only and the
        // dictionary has none: its root mask is empty, and so is the
        // intersection at label 0.
        let found = solutions(&[&[0, 1], &[0, 0]], &["ab", "cd"], 0);
        assert!(found.is_empty());
    }

    #[test]
    fn single_label_topology_emits_the_seed() {
        assert_eq!(solutions(&[&[0]], &["a", "b"], 0), vec![vec![0]]);
        assert!(solutions(&[&[0]], &["a", "b"], 2).is_empty());
    }
}
