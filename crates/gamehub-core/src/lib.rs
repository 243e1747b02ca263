//! # gamehub-core
//!
//! Core crate for the GameHub connector. Contains collaborator traits,
//! configuration schemas, typed identifiers, the game event model,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other GameHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
