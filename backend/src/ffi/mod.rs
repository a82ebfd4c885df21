//! FFI (Foreign Function Interface) module
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: the nine boundary operations plus lifecycle
//! 2. **Simple types**: primitives and C strings only
//! 3. **Owned handles**: every caller holds its own adapter, no globals
//! 4. **Safe errors**: status codes plus a retrievable message; panics are
//!    caught before they cross the boundary

pub mod c_api;

#[cfg(feature = "pyo3")]
pub mod python;
