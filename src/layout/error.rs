use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("graph is not a DAG: node `{node}` lies on a cycle")]
    NotADag { node: String },
    #[error("invalid layout options: {0}")]
    Config(#[from] ConfigError),
}
