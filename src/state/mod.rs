//! State management module
//!
//! This module handles all application state, including:
//! - Shared data structures (data.rs)
//! - The filtered, paginated file listing (catalog.rs, pagination.rs)
//! - The crop rectangle of the previewed texture (clip.rs)
//! - Persistence of the file list and settings (library.rs, settings.rs)

pub mod catalog;
pub mod clip;
pub mod data;
pub mod library;
pub mod pagination;
pub mod settings;
