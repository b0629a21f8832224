use crate::builder::build;
use crate::config::Config;
use crate::error::Result;
use crate::ir::Graph;
use crate::layout::layout_graph;
use crate::parser::{Parsed, parse_with_config};
use crate::validate::validate;

/// Outcome of one recomputation: either a complete positioned graph, or an
/// empty graph together with the error that stopped the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visualization {
    pub graph: Graph,
    pub error: Option<crate::Error>,
}

impl Visualization {
    pub fn diagnostic(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Text to positioned graph. Blank input is not an error and yields an
/// empty graph. Options are checked before the text is looked at.
pub fn try_visualize(input: &str, config: &Config) -> Result<Graph> {
    config.validate()?;
    let Parsed::Document(document) = parse_with_config(input, &config.parse)? else {
        return Ok(Graph::new());
    };
    let valid = validate(document)?;
    let graph = build(&valid, &config.grouping);
    Ok(layout_graph(graph, &config.layout)?)
}

pub fn visualize(input: &str, config: &Config) -> Visualization {
    match try_visualize(input, config) {
        Ok(graph) => Visualization { graph, error: None },
        Err(err) => {
            log::warn!("could not visualize document: {err}");
            Visualization {
                graph: Graph::new(),
                error: Some(err),
            }
        }
    }
}
