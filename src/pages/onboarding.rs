//! Onboarding page for users without a profile.

use leptos::prelude::*;

use crate::auth::flow::AuthSignals;
#[cfg(feature = "hydrate")]
use crate::auth::router::ProfileQuery;

#[component]
pub fn OnboardingPage() -> impl IntoView {
    let sig = expect_context::<AuthSignals>();
    let display_name = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let name = display_name.get().trim().to_owned();
        if name.is_empty() {
            info.set("Pick a display name first.".to_owned());
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_caller_profile(&name).await {
                Ok(profile) => {
                    sig.profile.set(ProfileQuery::Ready(Some(profile)));
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/summit");
                    }
                }
                Err(e) => {
                    info.set(format!("Could not create your profile: {e}"));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = sig;
        }
    };

    view! {
        <div class="onboarding-page">
            <h1>"Set up your profile"</h1>
            <form class="onboarding-form" on:submit=on_submit>
                <input
                    class="onboarding-input"
                    type="text"
                    placeholder="Display name"
                    prop:value=move || display_name.get()
                    on:input=move |ev| display_name.set(event_target_value(&ev))
                />
                <button class="onboarding-button" type="submit" disabled=move || busy.get()>
                    "Get started"
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="onboarding-message">{move || info.get()}</p>
            </Show>
        </div>
    }
}
