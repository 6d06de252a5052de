//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! `login` owns the auth attempt UI; the three destination pages are thin,
//! with `summit` additionally recording its own one-time-seen marker.

pub mod dashboard;
pub mod login;
pub mod onboarding;
pub mod summit;
