use leptos::prelude::*;

/// 404 page for anything outside the app's single route.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Not found"</h1>
		<p>"There is nothing woven at this address."</p>
	}
}
