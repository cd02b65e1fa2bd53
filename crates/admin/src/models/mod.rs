//! Admin-only domain models.
//!
//! Shared entities (clients, professionals, catalog, appointments) live in
//! `solara-core`; this module holds what only the admin surface sees.

pub mod admin_user;
pub mod cashier;
pub mod client_note;
pub mod comanda;
pub mod expense;
pub mod session;

pub use admin_user::AdminUser;
pub use cashier::{CashMovement, CashRegister, CashRegisterSummary};
pub use client_note::ClientNote;
pub use comanda::{Comanda, ComandaItem, ComandaItemKind, ComandaSummary};
pub use expense::Expense;
pub use session::{CurrentAdmin, session_keys};
