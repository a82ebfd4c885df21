//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every random draw made by the reference
//! generator goes through [`RandomStream`], so a fixed seed fixes the whole
//! event sequence.

mod xorshift;

pub use xorshift::RandomStream;
