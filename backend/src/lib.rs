//! Marketplace Backend Library
//!
//! Upload handling and route-guard decisions for the service marketplace.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod guard;
/// Shared application state
pub mod state;
pub mod upload;
