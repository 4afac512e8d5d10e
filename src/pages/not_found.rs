use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="load-error">
			<h1>"Page not found"</h1>
			<p class="info">
				<a href="/">"Back to the dashboard"</a>
			</p>
		</div>
	}
}
