//! Dashboard page for returning users.

use leptos::prelude::*;

use crate::auth::flow::AuthSignals;
use crate::auth::router::ProfileQuery;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let sig = expect_context::<AuthSignals>();

    let greeting = move || match sig.profile.get() {
        ProfileQuery::Ready(Some(profile)) => format!("Welcome back, {}.", profile.display_name),
        _ => "Welcome back.".to_owned(),
    };

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        {
            crate::net::provider::clear_session();
            crate::util::storage::clear_client_session();
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/");
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = sig;
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>"Ridgeline"</h1>
                <button class="dashboard-signout" on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>
            <p class="dashboard-greeting">{greeting}</p>
        </div>
    }
}
