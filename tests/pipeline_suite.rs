use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use openapi_flow::builder::{group_key, partition};
use openapi_flow::{
    Config, Error, Graph, NodeKind, Parsed, ValidationError, build, layout_graph, parse,
    try_visualize, validate, visualize,
};

fn fixture(rel: &str) -> Result<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    std::fs::read_to_string(&path).with_context(|| format!("fixture missing: {rel}"))
}

fn assert_tree_shape(graph: &Graph, context: &str) {
    let incoming = graph.incoming_counts();
    let roots: Vec<&str> = incoming
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(roots, vec!["api"], "{context}: exactly one root expected");

    let kinds: HashMap<&str, NodeKind> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node.kind))
        .collect();
    for edge in &graph.edges {
        assert_ne!(edge.source, edge.target, "{context}: self edge {}", edge.id);
        let pair = (kinds[edge.source.as_str()], kinds[edge.target.as_str()]);
        assert!(
            matches!(
                pair,
                (NodeKind::Root, NodeKind::Group) | (NodeKind::Group, NodeKind::Operation)
            ),
            "{context}: unexpected edge kind {pair:?}"
        );
    }
    for node in &graph.nodes {
        match node.kind {
            NodeKind::Root => {}
            NodeKind::Group => {
                assert_eq!(incoming[node.id.as_str()], 1, "{context}: {}", node.id);
                assert!(graph.outgoing(&node.id).count() > 0, "{context}: empty group");
            }
            NodeKind::Operation => {
                assert_eq!(incoming[node.id.as_str()], 1, "{context}: {}", node.id);
                assert_eq!(graph.outgoing(&node.id).count(), 0, "{context}: {}", node.id);
            }
        }
    }

    let node_ids: HashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(node_ids.len(), graph.nodes.len(), "{context}: duplicate node ids");
    let edge_ids: HashSet<&str> = graph.edges.iter().map(|edge| edge.id.as_str()).collect();
    assert_eq!(edge_ids.len(), graph.edges.len(), "{context}: duplicate edge ids");
}

fn assert_no_overlaps(graph: &Graph, config: &Config, context: &str) {
    let width = config.layout.node_width;
    let height = config.layout.node_height;
    for (i, a) in graph.nodes.iter().enumerate() {
        for b in graph.nodes.iter().skip(i + 1) {
            let apart_x = (a.position.x - b.position.x).abs() >= width;
            let apart_y = (a.position.y - b.position.y).abs() >= height;
            assert!(apart_x || apart_y, "{context}: {} overlaps {}", a.id, b.id);
        }
    }
}

#[test]
fn render_all_fixtures() -> Result<()> {
    let config = Config::default();
    // (fixture, nodes, edges)
    let candidates = [("petstore.yaml", 10, 9), ("users.json", 9, 8)];

    for (rel, nodes, edges) in candidates {
        let graph = try_visualize(&fixture(rel)?, &config)?;
        assert_eq!(graph.nodes.len(), nodes, "{rel}: node count");
        assert_eq!(graph.edges.len(), edges, "{rel}: edge count");
        assert_tree_shape(&graph, rel);
        assert_no_overlaps(&graph, &config, rel);
    }
    Ok(())
}

#[test]
fn petstore_groups_and_labels() -> Result<()> {
    let graph = try_visualize(&fixture("petstore.yaml")?, &Config::default())?;
    let groups: Vec<&str> = graph
        .nodes_of_kind(NodeKind::Group)
        .map(|node| node.label.as_str())
        .collect();
    assert_eq!(groups, vec!["/pets", "/store", "/health"]);

    let pet = graph.node("operation-pets-1-1").context("path-level parameters keep index 0")?;
    assert_eq!(pet.label, "GET - /pets/{petId} : Info for a specific pet");
    let health = graph.node("operation-health-0-0").context("health check")?;
    assert_eq!(health.label, "HEAD - /health : ");
    Ok(())
}

#[test]
fn failing_fixtures_yield_empty_graphs() -> Result<()> {
    let config = Config::default();
    let missing = visualize(&fixture("missing_paths.yaml")?, &config);
    assert!(missing.graph.is_empty());
    assert_eq!(
        missing.error,
        Some(Error::Validation(ValidationError::MissingPaths))
    );

    let broken = visualize(&fixture("broken.yaml")?, &config);
    assert!(broken.graph.is_empty());
    assert!(matches!(broken.error, Some(Error::Parse(_))));
    assert!(broken.diagnostic().is_some());
    Ok(())
}

#[test]
fn scenario_single_operation() -> Result<()> {
    let graph = try_visualize(
        r#"{"info":{"title":"T"},"paths":{"/users":{"get":{"summary":"List"}}}}"#,
        &Config::default(),
    )?;
    let labels: Vec<&str> = graph.nodes.iter().map(|node| node.label.as_str()).collect();
    assert_eq!(labels, vec!["T", "/users", "GET - /users : List"]);
    assert_eq!(graph.nodes[0].id, "api");
    assert_eq!(graph.edges.len(), 2);
    Ok(())
}

#[test]
fn scenario_two_paths_one_group() -> Result<()> {
    let input = "info:\n  title: T\npaths:\n  /users:\n    get: {}\n  /users/{id}:\n    get: {}\n";
    let graph = try_visualize(input, &Config::default())?;
    assert_eq!(graph.nodes_of_kind(NodeKind::Group).count(), 1);
    assert_eq!(graph.nodes_of_kind(NodeKind::Operation).count(), 2);
    assert_eq!(graph.edges.len(), 3);
    Ok(())
}

#[test]
fn scenario_missing_paths() {
    let result = visualize(r#"{"info":{"title":"T"}}"#, &Config::default());
    assert!(result.graph.is_empty());
    assert_eq!(
        result.error,
        Some(Error::Validation(ValidationError::MissingPaths))
    );
}

#[test]
fn scenario_two_methods_one_path() -> Result<()> {
    let input = r#"{"info":{"title":"T"},"paths":{"/users":{"get":{},"post":{}}}}"#;
    let graph = try_visualize(input, &Config::default())?;
    let ops: Vec<&str> = graph
        .nodes_of_kind(NodeKind::Operation)
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(ops, vec!["operation-users-0-0", "operation-users-0-1"]);
    let again = try_visualize(input, &Config::default())?;
    assert_eq!(graph, again);
    Ok(())
}

#[test]
fn blank_input_round_trip() -> Result<()> {
    assert_eq!(parse("")?, Parsed::Empty);
    assert_eq!(parse("   ")?, Parsed::Empty);
    let result = visualize("   ", &Config::default());
    assert!(result.is_ok());
    assert!(result.graph.is_empty());
    Ok(())
}

#[test]
fn layout_is_idempotent_on_fixtures() -> Result<()> {
    let config = Config::default();
    for rel in ["petstore.yaml", "users.json"] {
        let once = try_visualize(&fixture(rel)?, &config)?;
        let twice = layout_graph(once.clone(), &config.layout)?;
        assert_eq!(once, twice, "{rel}");
    }
    Ok(())
}

#[test]
fn grouping_is_a_partition() -> Result<()> {
    let Parsed::Document(document) = parse(&fixture("users.json")?)? else {
        anyhow::bail!("fixture should not be blank");
    };
    let valid = validate(document)?;
    let groups = partition(&valid.paths, 1);

    let mut seen: HashSet<&str> = HashSet::new();
    for group in &groups {
        for item in &group.paths {
            assert_eq!(group_key(&item.path, 1), group.key);
            assert!(seen.insert(item.path.as_str()), "{} in two groups", item.path);
        }
    }
    assert_eq!(seen.len(), valid.paths.len());
    Ok(())
}

#[test]
fn deeper_grouping_splits_nested_paths() -> Result<()> {
    let mut config = Config::default();
    config.grouping.depth = 2;
    let graph = try_visualize(&fixture("users.json")?, &config)?;
    let groups: Vec<&str> = graph
        .nodes_of_kind(NodeKind::Group)
        .map(|node| node.label.as_str())
        .collect();
    assert_eq!(groups, vec!["/users", "/users/{id}", "/"]);
    assert_tree_shape(&graph, "users.json depth 2");
    assert_no_overlaps(&graph, &config, "users.json depth 2");
    Ok(())
}

#[test]
fn builder_output_is_deterministic() -> Result<()> {
    let text = fixture("petstore.yaml")?;
    let build_once = || -> Result<Graph> {
        let Parsed::Document(document) = parse(&text)? else {
            anyhow::bail!("fixture should not be blank");
        };
        Ok(build(&validate(document)?, &Config::default().grouping))
    };
    assert_eq!(build_once()?, build_once()?);
    Ok(())
}

#[test]
fn yaml_tags_and_complex_keys_degrade_locally() -> Result<()> {
    let input = "info:\n  title: Tagged\npaths:\n  /a:\n    get:\n      summary: !custom hello\n  /b:\n    get:\n      summary: plain\n    ? [x, y]\n    : {}\n  /c: !ref {post: {}}\n";
    let graph = try_visualize(input, &Config::default())?;
    let labels: Vec<&str> = graph
        .nodes_of_kind(NodeKind::Operation)
        .map(|node| node.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["GET - /a : hello", "GET - /b : plain", "POST - /c : "]
    );
    assert_tree_shape(&graph, "tagged yaml");
    Ok(())
}

#[test]
fn invalid_options_are_reported_not_laid_out() {
    let mut config = Config::default();
    config.layout.node_width = f32::NAN;
    let result = visualize(&fixture("users.json").unwrap_or_default(), &config);
    assert!(result.graph.is_empty());
    assert!(matches!(result.error, Some(Error::Config(_))));
}
