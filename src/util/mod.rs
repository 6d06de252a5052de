//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from auth and page
//! logic to improve reuse and testability.

pub mod platform;
pub mod storage;
pub mod time;
