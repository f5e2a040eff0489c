//! Somnio Core Library
//!
//! Dream similarity scoring and maintenance of the similarity relationships
//! between dreams.

pub mod config;
pub mod db;
pub mod dream;
pub mod error;
pub mod logging;
pub mod similarity;
pub mod store;
pub mod sync;
pub mod text;
