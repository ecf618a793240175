//! # Study Buddy Common Library
//!
//! Shared code for the Study Buddy server and its tests:
//! - Database initialization and row models
//! - Configuration loading (CLI → ENV → TOML → compiled defaults)
//! - Password hashing for stored users
//! - Timestamp parsing and duration helpers

pub mod config;
pub mod db;
pub mod error;
pub mod password;
pub mod time;

pub use error::{Error, Result};
