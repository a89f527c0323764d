//! User persistence seam.

pub mod repository;
