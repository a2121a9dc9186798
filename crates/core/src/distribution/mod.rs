//! Deal distribution for private tasks.
//!
//! This module provides a `DealSender` trait that proposes storage deals for
//! every CAR file of a task to its assigned storage provider, and a Lotus
//! JSON-RPC implementation.

mod lotus;
mod types;

pub use lotus::{padded_piece_size, LotusDealSender};
pub use types::*;
