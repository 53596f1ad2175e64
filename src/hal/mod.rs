//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for desktop development
//! - `packet_queue`: Bounded FIFO feeding a track-signal generator
//! - `file_store`: JSON documents in a directory

pub mod file_store;
pub mod mock;
pub mod packet_queue;

pub use file_store::*;
pub use mock::*;
pub use packet_queue::*;
