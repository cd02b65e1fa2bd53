//! Business-logic services for the booking API.

pub mod auth;
