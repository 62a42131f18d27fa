//! Core types, validation and client-side state for the Roster student
//! registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! remote service is reached through the traits in [`gateway`] (client side)
//! and [`store`] (server side); every other crate depends on this one.

pub mod dashboard;
pub mod dialog;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod list;
pub mod record;
pub mod session;
pub mod store;
pub mod validate;
pub mod view;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
