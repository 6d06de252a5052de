//! Authentication orchestration: login flow, watchdog wiring, and the
//! one-shot post-auth routing decision.
//!
//! ARCHITECTURE
//! ============
//! The pure state machines live in `crate::state`; this module owns the
//! browser glue that drives them (timers, window/document listeners, the
//! provider bridge) plus the pure decision helpers those drivers call.

pub mod flow;
pub mod identity;
pub mod popup;
pub mod return_detection;
pub mod router;
