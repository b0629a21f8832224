pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod pipeline;
pub mod session;
pub mod validate;

pub use builder::build;
pub use config::{Config, GroupingConfig, LayoutConfig, ParseConfig, load_config};
pub use error::{Error, Result};
pub use ir::{Edge, Graph, Node, NodeKind, Position};
pub use layout::{LayoutError, compute_layout, layout_graph};
pub use layout_dump::RenderModel;
pub use parser::{ParseError, Parsed, parse};
pub use pipeline::{Visualization, try_visualize, visualize};
pub use session::{Session, Ticket};
pub use validate::{ValidDocument, ValidationError, validate};
