//! Domain and session models for the booking API.
//!
//! Most domain types are shared and live in `solara-core`; this module only
//! holds what is specific to the booking surface.

pub mod session;

pub use session::{CurrentClient, session_keys};
