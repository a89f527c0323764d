//! Agent gateway seam.

pub mod gateway;
