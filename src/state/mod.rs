//! Shared client-side auth state modules.
//!
//! DESIGN
//! ======
//! Each module owns one piece of the auth pipeline's state and is written as
//! a pure value type driven by explicit timestamps, so every transition is
//! natively testable. Browser timers and event listeners live in `crate::auth`
//! and only call into these types.
//!
//! Write ownership is strict: `stabilization` is written only by the
//! stabilization driver, `stall` only by the stall watchdog arm sites, and
//! `attempt` only by the login flow and the post-auth router's terminal
//! unlock. Everything else observes through shared signals.

pub mod attempt;
pub mod auth;
pub mod diagnostics;
pub mod gate;
pub mod stabilization;
pub mod stall;
