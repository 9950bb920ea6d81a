//! State management module
//!
//! This module handles all application state, including:
//! - The SQLite record store (store.rs)
//! - The persisted site records (data.rs)
//! - The in-memory owner of those records and its write ordering (controller.rs)
//! - The admin password gate (auth.rs)

pub mod auth;
pub mod controller;
pub mod data;
pub mod store;
