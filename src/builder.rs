use std::collections::{HashMap, HashSet};

use crate::config::GroupingConfig;
use crate::document::{Operation, PathItem, PathItemBody};
use crate::ir::{Edge, Graph, Node, NodeKind, ROOT_ID};
use crate::validate::ValidDocument;

/// Group key for paths without a usable first segment.
pub const GROUP_SENTINEL: &str = "/";

/// Paths sharing the same leading segment(s), in encounter order.
#[derive(Debug, Clone)]
pub struct PathGroup<'a> {
    pub key: String,
    pub paths: Vec<&'a PathItem>,
}

impl PathGroup<'_> {
    pub fn label(&self) -> String {
        if self.key == GROUP_SENTINEL {
            GROUP_SENTINEL.to_string()
        } else {
            format!("/{}", self.key)
        }
    }
}

pub fn group_key(path: &str, depth: usize) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .skip(1)
        .take(depth.max(1))
        .take_while(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        GROUP_SENTINEL.to_string()
    } else {
        segments.join("/")
    }
}

pub fn partition(paths: &[PathItem], depth: usize) -> Vec<PathGroup<'_>> {
    let mut groups: Vec<PathGroup<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for item in paths {
        let key = group_key(&item.path, depth);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(PathGroup {
                key,
                paths: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].paths.push(item);
    }
    groups
}

#[derive(Default)]
struct IdRegistry {
    seen: HashSet<String>,
}

impl IdRegistry {
    fn claim(&mut self, base: String) -> String {
        if self.seen.insert(base.clone()) {
            return base;
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}~{suffix}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn edge_id(source: &str, target: &str) -> String {
    format!("edge-{source}-{target}")
}

pub fn build(document: &ValidDocument, config: &GroupingConfig) -> Graph {
    let mut graph = Graph::new();
    let mut node_ids = IdRegistry::default();
    let mut edge_ids = IdRegistry::default();

    let root_id = node_ids.claim(ROOT_ID.to_string());
    graph
        .nodes
        .push(Node::new(root_id.clone(), document.title.as_str(), NodeKind::Root));

    for group in partition(&document.paths, config.depth) {
        let operations = collect_operations(&group);
        if operations.is_empty() {
            log::debug!("group {} has no operations, skipping", group.label());
            continue;
        }

        let group_id = node_ids.claim(format!("group-{}", group.key));
        graph
            .nodes
            .push(Node::new(group_id.clone(), group.label(), NodeKind::Group));

        for (base_id, operation) in operations {
            let op_id = node_ids.claim(base_id);
            graph
                .nodes
                .push(Node::new(op_id.clone(), operation.label(), NodeKind::Operation));
            let id = edge_ids.claim(edge_id(&group_id, &op_id));
            graph.edges.push(Edge::new(id, group_id.clone(), op_id));
        }

        let id = edge_ids.claim(edge_id(&root_id, &group_id));
        graph.edges.push(Edge::new(id, root_id.clone(), group_id));
    }

    log::debug!(
        "built graph with {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}

fn collect_operations(group: &PathGroup<'_>) -> Vec<(String, Operation)> {
    let mut operations = Vec::new();
    for (path_index, item) in group.paths.iter().enumerate() {
        if let PathItemBody::Malformed(kind) = &item.body {
            log::warn!("skipping path {}: expected a mapping, found a {kind}", item.path);
            continue;
        }
        for (method_index, entry) in item.entries().iter().enumerate() {
            let Some(operation) = entry.to_operation(&item.path) else {
                log::warn!(
                    "skipping `{}` under {}: not an operation object",
                    entry.key,
                    item.path
                );
                continue;
            };
            if !operation.method.is_standard() {
                log::debug!("non-standard method `{}` on {}", entry.key, item.path);
            }
            let id = format!("operation-{}-{path_index}-{method_index}", group.key);
            operations.push((id, operation));
        }
    }
    operations
}
