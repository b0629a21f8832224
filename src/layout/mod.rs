mod error;
mod position;
mod ranking;

pub use error::LayoutError;

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::ir::{Edge, Graph, Node, Position};

/// Index-based adjacency over the distinct node ids, in first-seen order.
pub(crate) struct LayoutGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl LayoutGraph {
    fn from_parts(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut graph = Self {
            ids: Vec::with_capacity(nodes.len()),
            index: HashMap::with_capacity(nodes.len()),
            successors: Vec::with_capacity(nodes.len()),
            predecessors: Vec::with_capacity(nodes.len()),
        };
        for node in nodes {
            graph.insert_node(&node.id);
        }
        for edge in edges {
            let (Some(&from), Some(&to)) = (graph.index.get(&edge.source), graph.index.get(&edge.target))
            else {
                log::warn!(
                    "ignoring edge {} ({} -> {}): unknown endpoint",
                    edge.id,
                    edge.source,
                    edge.target
                );
                continue;
            };
            graph.successors[from].push(to);
            graph.predecessors[to].push(from);
        }
        graph
    }

    fn insert_node(&mut self, id: &str) {
        if self.index.contains_key(id) {
            return;
        }
        self.index.insert(id.to_string(), self.ids.len());
        self.ids.push(id.to_string());
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    #[cfg(test)]
    fn from_pairs(ids: &[&str], edges: &[(&str, &str)]) -> Self {
        let nodes: Vec<Node> = ids
            .iter()
            .map(|id| Node::new(*id, *id, crate::ir::NodeKind::Operation))
            .collect();
        let edges: Vec<Edge> = edges
            .iter()
            .map(|(from, to)| Edge::new(format!("{from}->{to}"), *from, *to))
            .collect();
        Self::from_parts(&nodes, &edges)
    }
}

/// Positions every node on a layered, top-to-bottom grid. Ids, labels and
/// edges are left untouched; incoming positions are ignored, so running the
/// layout on its own output yields the same coordinates.
pub fn compute_layout(
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<Vec<Node>, LayoutError> {
    config.validate()?;
    let graph = LayoutGraph::from_parts(nodes, edges);
    let ranks = ranking::compute_ranks(&graph)?;
    let rank_nodes = ranking::order_rank_nodes(&graph, &ranks);
    let anchors = position::assign_anchors(&graph, &ranks, &rank_nodes, config);
    log::debug!(
        "laid out {} nodes over {} ranks",
        graph.len(),
        rank_nodes.len()
    );

    let half_width = config.node_width * 0.5;
    let half_height = config.node_height * 0.5;
    Ok(nodes
        .iter()
        .map(|node| {
            let mut placed = node.clone();
            if let Some(&idx) = graph.index.get(&node.id) {
                let (x, y) = anchors[idx];
                placed.position = Position::new(x - half_width, y - half_height);
            }
            placed
        })
        .collect())
}

pub fn layout_graph(graph: Graph, config: &LayoutConfig) -> Result<Graph, LayoutError> {
    let nodes = compute_layout(&graph.nodes, &graph.edges, config)?;
    Ok(Graph {
        nodes,
        edges: graph.edges,
    })
}
