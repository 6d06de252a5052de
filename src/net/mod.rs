//! Networking modules for the backend API and the identity provider bridge.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls to the application backend, `provider` manages
//! the identity-provider popup and session persistence, and `types` defines
//! the shared wire schema.

pub mod api;
pub mod provider;
pub mod types;
