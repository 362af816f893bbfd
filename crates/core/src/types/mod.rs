//! Core types for CafeBot.
//!
//! This module provides type-safe wrappers for the ordering domain.

pub mod cart;
pub mod id;
pub mod intent;
pub mod menu;
pub mod order;
pub mod session;

pub use cart::{Cart, CartLine};
pub use id::*;
pub use intent::Intent;
pub use menu::{Menu, MenuCategory, MenuError, MenuItem};
pub use order::Order;
pub use session::{DEFAULT_CUSTOMER_NAME, DEFAULT_CUSTOMER_PHONE, Session};
