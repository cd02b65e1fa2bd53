//! Solara Booking library.
//!
//! This crate provides the public booking API as a library, allowing it to
//! be exercised from tests and reused by the binary in `main.rs`.
//!
//! # Security
//!
//! This binary only has access to the shared salon database; it exposes the
//! public, client-facing surface (catalog, client accounts, appointments).
//! Salon management lives in the `admin` binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
