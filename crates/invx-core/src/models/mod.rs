//! Data models.

pub mod config;
pub mod grid;
pub mod invoice;
