//! CafeBot server library.
//!
//! This crate provides the chat service as a library, allowing it to be
//! tested and reused. The binary in `main.rs` only wires configuration,
//! logging and the HTTP listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod gemini;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod state;
