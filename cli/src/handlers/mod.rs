//! Command handlers for the knowledge index host.

pub mod knowledge;

pub use knowledge::*;
