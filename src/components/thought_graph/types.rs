use serde::{Deserialize, Serialize};

/// Default edge weight when the backend omits the field.
pub const DEFAULT_EDGE_WEIGHT: f64 = 0.3;

/// One concept extracted by the backend.
///
/// `category` stays a raw string so an exported document matches the
/// received JSON byte for byte; the palette layer decides what it means.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

/// A directed relation between two concepts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GraphEdge {
	pub from: String,
	pub to: String,
	pub relation: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
}

impl GraphEdge {
	/// Weight with the documented fallback applied.
	pub fn effective_weight(&self) -> f64 {
		self.weight.unwrap_or(DEFAULT_EDGE_WEIGHT)
	}
}

/// The full payload of one generation request. Replaced wholesale on
/// every successful request, never mutated in place.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct GraphDocument {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
	#[serde(default)]
	pub insights: Vec<String>,
}
