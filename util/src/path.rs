use std::{cmp::Reverse, collections::BinaryHeap, hash::Hash};

use crate::{HashMap, HashSet};

/// Find a shortest path from `start` to `goal` over a graph where every edge
/// costs one step.
///
/// `heuristic` estimates the remaining steps between two nodes and must
/// never overestimate for the result to be optimal. Among frontier nodes
/// with equal estimated total cost, the one discovered first is expanded
/// first, so a deterministic `neighbors` function gives a deterministic path.
///
/// Returns the path from `start` to `goal` with both endpoints included, or
/// an empty vector if `goal` can't be reached.
pub fn astar_path<T, I>(
    start: &T,
    goal: &T,
    mut neighbors: impl FnMut(&T) -> I,
    heuristic: impl Fn(&T, &T) -> usize,
) -> Vec<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    // Heap entries are (estimated total, discovery index, steps so far). The
    // discovery index points into `nodes` and breaks ties first-in,
    // first-out.
    let mut nodes = vec![start.clone()];
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((heuristic(start, goal), 0usize, 0usize)));

    let mut best: HashMap<T, usize> = HashMap::default();
    best.insert(start.clone(), 0);
    let mut parent: HashMap<T, T> = HashMap::default();
    let mut closed: HashSet<T> = HashSet::default();

    while let Some(Reverse((_, idx, steps))) = frontier.pop() {
        let node = nodes[idx].clone();

        // Stale entry that was superseded by a shorter route.
        if closed.contains(&node) {
            continue;
        }

        if &node == goal {
            return reconstruct(&parent, node);
        }
        closed.insert(node.clone());

        for n in neighbors(&node) {
            if closed.contains(&n) {
                continue;
            }

            let steps = steps + 1;
            if best.get(&n).is_some_and(|&known| known <= steps) {
                continue;
            }

            best.insert(n.clone(), steps);
            parent.insert(n.clone(), node.clone());
            frontier.push(Reverse((
                steps + heuristic(&n, goal),
                nodes.len(),
                steps,
            )));
            nodes.push(n);
        }
    }

    Vec::new()
}

fn reconstruct<T: Clone + Eq + Hash>(parent: &HashMap<T, T>, end: T) -> Vec<T> {
    let mut path = vec![end];
    while let Some(prev) = path.last().and_then(|n| parent.get(n)) {
        path.push(prev.clone());
    }
    path.reverse();
    path
}
