use crate::ir::Graph;
use crate::pipeline::Visualization;
use serde::Serialize;
use std::io::Write;

/// The `{nodes, edges}` model handed to the graph surface.
#[derive(Debug, Serialize)]
pub struct RenderModel {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub position: PositionDump,
}

#[derive(Debug, Serialize)]
pub struct PositionDump {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl RenderModel {
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                position: PositionDump {
                    x: node.position.x,
                    y: node.position.y,
                },
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();

        RenderModel {
            nodes,
            edges,
            diagnostic: None,
        }
    }

    pub fn from_visualization(visualization: &Visualization) -> Self {
        RenderModel {
            diagnostic: visualization.diagnostic(),
            ..Self::from_graph(&visualization.graph)
        }
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn write_render_model<W: Write>(writer: W, visualization: &Visualization) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &RenderModel::from_visualization(visualization))
}
