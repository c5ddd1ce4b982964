//! API module
//!
//! Contains HTTP request handlers for uploads and route-guard checks

pub mod guard;
pub mod uploads;
