use leptos::prelude::*;
use log::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::thought_graph::{GraphDocument, NodeSummary, ThoughtGraphCanvas};
use crate::export;

const EXAMPLE_TEXT: &str = "I keep procrastinating at night, then I feel guilty and sleep \
	badly, which leaves me too tired for the gym, and my goal of getting fit keeps slipping.";

const INFO_PLACEHOLDER: &str = "Click a node to inspect its connections.";

fn notify(message: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(message);
	}
}

/// Main page: text in, graph out, plus exports and the selection panel.
#[component]
pub fn Home() -> impl IntoView {
	let (text, set_text) = signal(String::new());
	let (pending, set_pending) = signal(false);
	let (document, set_document) = signal(Option::<GraphDocument>::None);
	let (selection, set_selection) = signal(Option::<NodeSummary>::None);

	let generate = move |_| {
		let input = text.get_untracked().trim().to_string();
		if input.is_empty() {
			notify("Write down a few thoughts first.");
			return;
		}
		if pending.get_untracked() {
			return;
		}
		set_pending.set(true);
		spawn_local(async move {
			match api::generate_graph(api::api_base(), &input).await {
				Ok(doc) => set_document.set(Some(doc)),
				Err(err) => {
					warn!("generation failed: {err}");
					notify(&err.to_string());
				}
			}
			// the trigger is re-enabled on every outcome
			set_pending.set(false);
		});
	};

	let fill_example = move |_| set_text.set(EXAMPLE_TEXT.to_string());

	let on_export_png = move |_| {
		if document.with_untracked(Option::is_none) {
			return;
		}
		if let Err(err) = export::export_png() {
			warn!("png export failed: {err:?}");
		}
	};

	let on_export_json = move |_| {
		document.with_untracked(|doc| {
			let Some(doc) = doc else {
				return;
			};
			if let Err(err) = export::export_json(doc) {
				warn!("json export failed: {err:?}");
			}
		});
	};

	view! {
		<div class="app-shell">
			<header>
				<h1>"ThoughtWeaver"</h1>
				<p class="subtitle">"Turn messy thoughts into a map."</p>
			</header>

			<div class="controls">
				<textarea
					placeholder="What is on your mind?"
					prop:value=move || text.get()
					on:input=move |ev| set_text.set(event_target_value(&ev))
				></textarea>
				<div class="buttons">
					<button on:click=generate disabled=move || pending.get()>
						{move || if pending.get() { "Weaving..." } else { "Generate" }}
					</button>
					<button on:click=fill_example>"Try an example"</button>
					<button on:click=on_export_png>"Export PNG"</button>
					<button on:click=on_export_json>"Export JSON"</button>
				</div>
			</div>

			<div class="graph-panel">
				<ThoughtGraphCanvas document=document on_select=set_selection />
			</div>

			<div class="info-panel">
				{move || match selection.get() {
					None => view! { <div><p class="placeholder">{INFO_PLACEHOLDER}</p></div> }
						.into_any(),
					Some(sel) => {
						let category =
							sel.category.unwrap_or_else(|| "uncategorized".to_string());
						let neighbors = if sel.neighbor_labels.is_empty() {
							"no direct connections".to_string()
						} else {
							sel.neighbor_labels.join(", ")
						};
						view! {
							<div>
								<p>
									<strong>{sel.label}</strong>
									" ("
									{category}
									")"
								</p>
								<p>"Connected to: " {neighbors}</p>
							</div>
						}
						.into_any()
					}
				}}
			</div>

			<div class="insights-panel">
				<h2>"Insights"</h2>
				<ul>
					{move || {
						document
							.get()
							.map(|d| d.insights)
							.unwrap_or_default()
							.into_iter()
							.map(|insight| view! { <li>{insight}</li> })
							.collect_view()
					}}
				</ul>
			</div>
		</div>
	}
}
