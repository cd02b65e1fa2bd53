//! Solara Admin library.
//!
//! This crate provides the admin functionality as a library, allowing it to
//! be reused by the CLI (user creation, seeding) and exercised from tests.
//!
//! # Security
//!
//! This crate contains HIGH PRIVILEGE access:
//! - Admin user management
//! - Cash register and financial reports
//! - Full write access to the salon database
//!
//! Only deploy behind the internal network; it must never share a listener
//! with the public booking binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
