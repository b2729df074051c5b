//! API route modules.

pub mod containers;
