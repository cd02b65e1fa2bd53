//! Business-logic services for the admin API.

pub mod auth;
