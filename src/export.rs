//! Local downloads: the rendering canvas as a PNG, or the last pristine
//! document as pretty-printed JSON. Presentation state (highlight,
//! expansion) never leaks into the JSON export.

use log::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlCanvasElement, Url};

use crate::components::thought_graph::{CANVAS_ELEMENT_ID, GraphDocument};

pub const IMAGE_FILENAME: &str = "thoughtweaver.png";
pub const DATA_FILENAME: &str = "thoughtweaver.json";

fn trigger_download(href: &str, filename: &str) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(href);
	anchor.set_download(filename);
	anchor.click();
	Ok(())
}

/// Serialize the rendering surface to a PNG download. Quietly does
/// nothing when no surface has been mounted yet.
pub fn export_png() -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let Some(element) = document.get_element_by_id(CANVAS_ELEMENT_ID) else {
		return Ok(());
	};
	let canvas: HtmlCanvasElement = element.dyn_into()?;
	let data_url = canvas.to_data_url_with_type("image/png")?;
	info!("exporting canvas as {IMAGE_FILENAME}");
	trigger_download(&data_url, IMAGE_FILENAME)
}

/// Serialize the document exactly as received, pretty-printed with
/// 2-space indentation.
pub fn export_json(doc: &GraphDocument) -> Result<(), JsValue> {
	let json =
		serde_json::to_string_pretty(doc).map_err(|e| JsValue::from_str(&e.to_string()))?;
	let parts = js_sys::Array::of1(&JsValue::from_str(&json));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	info!("exporting document as {DATA_FILENAME}");
	let result = trigger_download(&url, DATA_FILENAME);
	let _ = Url::revoke_object_url(&url);
	result
}
