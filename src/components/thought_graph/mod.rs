mod component;
mod palette;
mod render;
mod state;
mod types;

pub use component::{CANVAS_ELEMENT_ID, ThoughtGraphCanvas};
pub use state::{EdgeEmphasis, EdgeRecord, EdgeStyle, NodeStyle, NodeSummary, ThoughtGraphState};
pub use types::{GraphDocument, GraphEdge, GraphNode};
