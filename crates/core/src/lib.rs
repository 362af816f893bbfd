//! CafeBot Core - Shared domain types.
//!
//! This crate provides the domain types used across all CafeBot components:
//! - `server` - HTTP chat service (chat engine, receipts, sessions)
//! - `cli` - Command-line tools for migrations and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, the menu catalog, carts, orders, sessions and intents

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
