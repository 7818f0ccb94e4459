//! Core types for the rendezvous store
//!
//! This crate defines the contract every coordination backend implements:
//! - Store: set / get / wait plus derived batch and counter operations
//! - derived: generic, non-atomic implementations of the derived operations
//! - Timeout: bounded or unbounded waits
//! - Error: missing-key, timeout, system and argument failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod derived;
pub mod error;
pub mod store;
pub mod timeout;

pub use derived::{decode_counter, encode_counter, COUNTER_WIDTH};
pub use error::{Error, Result};
pub use store::Store;
pub use timeout::{Timeout, DEFAULT_TIMEOUT};
