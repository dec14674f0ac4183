//! Client for the graph-generation backend. One POST per Generate
//! action; the caller owns the pending/disabled state of the trigger.

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::thought_graph::{GraphDocument, GraphEdge, GraphNode};

/// Development backend (the Flask server's default port).
pub const LOCAL_API_BASE: &str = "http://localhost:5050";
/// Deployed backend.
pub const HOSTED_API_BASE: &str = "https://thoughtweaver-api.onrender.com";

#[derive(Debug, Error)]
pub enum ApiError {
	/// The backend answered with an explicit error payload.
	#[error("{0}")]
	Backend(String),
	/// The request never produced a parseable response.
	#[error("could not reach the graph service: {0}")]
	Transport(String),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
	text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
	error: Option<String>,
	#[serde(default)]
	nodes: Vec<GraphNode>,
	#[serde(default)]
	edges: Vec<GraphEdge>,
	#[serde(default)]
	insights: Vec<String>,
}

/// Pick the API base once from the page's hostname: loopback hosts talk
/// to the local dev server, everything else to the hosted one.
pub fn base_for_host(hostname: &str) -> &'static str {
	match hostname {
		"localhost" | "127.0.0.1" | "[::1]" | "0.0.0.0" | "" => LOCAL_API_BASE,
		_ => HOSTED_API_BASE,
	}
}

pub fn api_base() -> &'static str {
	let hostname = web_sys::window()
		.and_then(|w| w.location().hostname().ok())
		.unwrap_or_default();
	base_for_host(&hostname)
}

/// `POST {base}/api/graph` with `{"text": ...}`. An `error` key in the
/// response short-circuits; missing graph keys come back empty.
pub async fn generate_graph(base: &str, text: &str) -> Result<GraphDocument, ApiError> {
	let response = Request::post(&format!("{base}/api/graph"))
		.json(&GenerateRequest { text })
		.map_err(|e| ApiError::Transport(e.to_string()))?
		.send()
		.await
		.map_err(|e| ApiError::Transport(e.to_string()))?;

	let body: GenerateResponse = response
		.json()
		.await
		.map_err(|e| ApiError::Transport(e.to_string()))?;

	if let Some(message) = body.error {
		return Err(ApiError::Backend(message));
	}
	Ok(GraphDocument {
		nodes: body.nodes,
		edges: body.edges,
		insights: body.insights,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loopback_hosts_use_the_dev_backend() {
		assert_eq!(base_for_host("localhost"), LOCAL_API_BASE);
		assert_eq!(base_for_host("127.0.0.1"), LOCAL_API_BASE);
		assert_eq!(base_for_host("[::1]"), LOCAL_API_BASE);
		assert_eq!(base_for_host("thoughtweaver.app"), HOSTED_API_BASE);
	}

	#[test]
	fn error_payload_is_detected() {
		let body: GenerateResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
		assert_eq!(body.error.as_deref(), Some("boom"));
		assert!(body.nodes.is_empty());
	}

	#[test]
	fn graph_payload_parses_with_missing_keys() {
		let body: GenerateResponse =
			serde_json::from_str(r#"{"nodes":[{"id":"a","label":"A","category":"habit"}]}"#)
				.unwrap();
		assert!(body.error.is_none());
		assert_eq!(body.nodes.len(), 1);
		assert!(body.edges.is_empty() && body.insights.is_empty());
	}
}
