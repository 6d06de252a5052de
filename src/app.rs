//! Root application component with routing, context providers, and the auth
//! orchestrator.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::auth::flow::AuthSignals;
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, onboarding::OnboardingPage, summit::SummitPage,
};
use crate::state::gate::{
    GATE_LOADING_MESSAGE, GATE_STALE_SESSION_ERROR_MESSAGE, GATE_TIMEOUT_ERROR_MESSAGE, GateState,
};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the shared auth signal bundle and sets up client-side routing.
/// The orchestrator lives inside `Router` because it needs `use_navigate`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let sig = AuthSignals::new();
    provide_context(sig);

    view! {
        <Stylesheet id="leptos" href="/pkg/ridgeline.css"/>
        <Title text="Ridgeline"/>

        <Router>
            <AuthOrchestrator/>
            <GateShell>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=LoginPage/>
                    <Route path=StaticSegment("onboarding") view=OnboardingPage/>
                    <Route path=StaticSegment("summit") view=SummitPage/>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                </Routes>
            </GateShell>
        </Router>
    }
}

/// Headless component that wires up the auth engine once at startup.
#[component]
fn AuthOrchestrator() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    {
        use leptos_router::hooks::use_navigate;

        let sig = expect_context::<AuthSignals>();
        let navigate = use_navigate();

        // Capture return evidence before the single-use marker is cleared.
        let return_evidence = {
            let hash = web_sys::window()
                .and_then(|w| w.location().hash().ok())
                .unwrap_or_default();
            let evidence = crate::auth::return_detection::has_return_evidence(
                &hash,
                crate::util::storage::user_initiated_auth(),
            );
            if let Some(reason) = crate::auth::return_detection::return_evidence_reason(
                &hash,
                crate::util::storage::user_initiated_auth(),
            ) {
                leptos::logging::log!("provider return detected: {reason}");
            }
            let _ = crate::auth::return_detection::consume_authorize_marker();
            evidence
        };

        crate::auth::flow::install_stabilization_driver(sig, return_evidence);
        crate::auth::flow::install_profile_driver(sig);
        crate::auth::flow::install_gate_driver(sig);
        crate::auth::popup::install_popup_watch(sig);
        crate::auth::router::install_post_auth_router(sig, navigate);

        // Stale restored sessions are swept outside the gesture path.
        Effect::new(move || {
            let _ = sig.auth.get();
            if sig.stabilization.with_untracked(|s| s.is_settled()) {
                crate::auth::flow::sweep_stale_session(sig);
            }
        });

        crate::auth::flow::restore_provider_session(sig);
    }
}

/// Blocks the app shell behind the initialization gate.
#[component]
fn GateShell(children: ChildrenFn) -> impl IntoView {
    let sig = expect_context::<AuthSignals>();

    let on_reset = move |_| {
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
        {move || match sig.gate.get() {
            GateState::Ready => children().into_any(),
            GateState::Loading => view! {
                <div class="gate gate--loading">
                    <p>{GATE_LOADING_MESSAGE}</p>
                </div>
            }
            .into_any(),
            GateState::TimeoutError => view! {
                <div class="gate gate--error">
                    <p>{GATE_TIMEOUT_ERROR_MESSAGE}</p>
                    <button class="gate__reset" on:click=on_reset>"Start over"</button>
                </div>
            }
            .into_any(),
            GateState::StaleSessionError => view! {
                <div class="gate gate--error">
                    <p>{GATE_STALE_SESSION_ERROR_MESSAGE}</p>
                    <button class="gate__reset" on:click=on_reset>"Log in again"</button>
                </div>
            }
            .into_any(),
        }}
    }
}
