//! Engine control core for the Jove Express train on no-std platforms.
//!
//! For a runnable host build, see the `mock-train` application.
#![no_std]

extern crate alloc;

pub mod utils;
