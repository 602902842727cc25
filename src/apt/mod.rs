// src/apt/mod.rs

//! The external dpkg/apt tool surface.
//!
//! Everything aptsweep knows about a host it learns from these tools, and
//! every durable change it makes goes through them. The wire formats here
//! are dpkg's and apt's own; nothing in this crate second-guesses their
//! dependency reasoning.

pub mod autoremove;
pub mod mark;
pub mod selections;
pub mod status;
