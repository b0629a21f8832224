use crate::config::LayoutConfig;

use super::LayoutGraph;

/// Centre points of every node box. Ranks are filled bottom-up so a parent
/// can sit over the span of its already placed children; neighbours in a
/// rank never come closer than one column step.
pub(super) fn assign_anchors(
    graph: &LayoutGraph,
    ranks: &[usize],
    rank_nodes: &[Vec<usize>],
    config: &LayoutConfig,
) -> Vec<(f32, f32)> {
    let step = config.column_step();
    let mut centers = vec![0.0f32; graph.len()];

    for bucket in rank_nodes.iter().rev() {
        let mut previous: Option<f32> = None;
        for &node in bucket {
            let desired = match children_span(graph, node, &centers) {
                Some((lo, hi)) => (lo + hi) * 0.5,
                None => previous.map_or(0.0, |prev| prev + step),
            };
            let x = match previous {
                Some(prev) => desired.max(prev + step),
                None => desired,
            };
            centers[node] = x;
            previous = Some(x);
        }
    }

    let min_center = centers.iter().copied().fold(f32::INFINITY, f32::min);
    let shift = if min_center.is_finite() { min_center } else { 0.0 };
    let half_width = config.node_width * 0.5;
    let half_height = config.node_height * 0.5;

    centers
        .iter()
        .zip(ranks)
        .map(|(&center, &rank)| {
            (
                center - shift + half_width,
                half_height + rank as f32 * config.rank_step(),
            )
        })
        .collect()
}

fn children_span(graph: &LayoutGraph, node: usize, centers: &[f32]) -> Option<(f32, f32)> {
    let mut span: Option<(f32, f32)> = None;
    for &child in &graph.successors[node] {
        let x = centers[child];
        span = Some(match span {
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
            None => (x, x),
        });
    }
    span
}
