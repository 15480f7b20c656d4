//! Core types for feedcal.
//!
//! This crate provides everything both feedcal binaries share:
//! - `ics` module: the calendar text codec (decode and encode)
//! - `event` module: decoded events and stored event records
//! - `store` module: the `EventStore` trait and its implementations
//! - `import` module: upserting decoded events into a store

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod import;
pub mod store;

pub use event::*;
