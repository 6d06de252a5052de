//! Post-signup celebration page, shown at most once per browser.

use leptos::prelude::*;

#[component]
pub fn SummitPage() -> impl IntoView {
    // Recording the marker here, not at navigation time, means an interrupted
    // redirect still shows the celebration on the next login.
    Effect::new(move || {
        crate::util::storage::mark_summit_seen();
    });

    view! {
        <div class="summit-page">
            <h1>"Welcome to Ridgeline!"</h1>
            <p>"Your account is ready. Time to take the first step."</p>
            <a class="summit-page__continue" href="/dashboard">
                "Go to dashboard"
            </a>
        </div>
    }
}
