use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::LayoutGraph;
use super::error::LayoutError;

/// Longest-path ranks over a topological order. Ties between ready nodes
/// are broken by input order so the result never depends on hashing.
pub(super) fn compute_ranks(graph: &LayoutGraph) -> Result<Vec<usize>, LayoutError> {
    let count = graph.len();
    let mut indegree: Vec<usize> = graph.predecessors.iter().map(Vec::len).collect();
    let mut ready: BinaryHeap<Reverse<usize>> = (0..count)
        .filter(|&node| indegree[node] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &next in &graph.successors[node] {
            indegree[next] = indegree[next].saturating_sub(1);
            if indegree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < count {
        let node = cycle_member(graph, &indegree);
        return Err(LayoutError::NotADag {
            node: graph.ids[node].clone(),
        });
    }

    let mut ranks = vec![0usize; count];
    for &node in &order {
        for &next in &graph.successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
        }
    }
    Ok(ranks)
}

/// Every node left with a positive in-degree after Kahn's pass has an
/// unprocessed predecessor, so walking predecessors `count` times from any
/// of them ends on a cycle. Returns the earliest node of that cycle.
fn cycle_member(graph: &LayoutGraph, indegree: &[usize]) -> usize {
    let stuck = |node: usize| indegree[node] > 0;
    let Some(mut current) = (0..graph.len()).find(|&node| stuck(node)) else {
        return 0;
    };
    for _ in 0..graph.len() {
        match graph.predecessors[current].iter().copied().find(|&prev| stuck(prev)) {
            Some(prev) => current = prev,
            None => return current,
        }
    }
    let start = current;
    let mut earliest = current;
    loop {
        let Some(prev) = graph.predecessors[current].iter().copied().find(|&prev| stuck(prev)) else {
            return earliest;
        };
        current = prev;
        if current == start {
            return earliest;
        }
        earliest = earliest.min(current);
    }
}

/// Buckets nodes by rank in input order, then sweeps downward ordering each
/// rank by the median position of its predecessors. For a tree this sorts
/// children by their parent's position, keeping sibling order.
pub(super) fn order_rank_nodes(graph: &LayoutGraph, ranks: &[usize]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut rank_nodes: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (node, &rank) in ranks.iter().enumerate() {
        rank_nodes[rank].push(node);
    }

    let mut positions = vec![0usize; graph.len()];
    for bucket in &rank_nodes {
        for (idx, &node) in bucket.iter().enumerate() {
            positions[node] = idx;
        }
    }

    for rank in 1..rank_nodes.len() {
        if rank_nodes[rank].len() <= 1 {
            continue;
        }
        let mut keyed: Vec<(f32, usize, usize)> = rank_nodes[rank]
            .iter()
            .enumerate()
            .map(|(idx, &node)| (median_position(graph, node, idx, &positions), idx, node))
            .collect();
        keyed.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        rank_nodes[rank] = keyed.into_iter().map(|(_, _, node)| node).collect();
        for (idx, &node) in rank_nodes[rank].iter().enumerate() {
            positions[node] = idx;
        }
    }

    rank_nodes
}

fn median_position(graph: &LayoutGraph, node: usize, current: usize, positions: &[usize]) -> f32 {
    let mut values: Vec<f32> = graph.predecessors[node]
        .iter()
        .map(|&prev| positions[prev] as f32)
        .collect();
    if values.is_empty() {
        return current as f32;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}
