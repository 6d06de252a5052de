//! # ridgeline-client
//!
//! Leptos + WASM frontend for the Ridgeline habit-tracking application.
//!
//! The heart of this crate is the external-identity authentication
//! orchestration engine: a set of pure, timestamp-parameterized state
//! machines (`state`) plus the browser glue that drives them (`auth`,
//! `net`). The identity provider authenticates the user in a separate
//! popup window and signals completion asynchronously; this crate
//! reconciles that signal with local identity restoration, detects
//! blocked or abandoned popups, and issues exactly one routing decision
//! per attempt.
//!
//! All browser-dependent behavior is gated behind the `hydrate` feature;
//! the state machines are plain Rust and natively testable.

pub mod app;
pub mod auth;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point for client-side hydration.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
