//! Core docchat library (config, backend client, identity store, shared models).

pub mod auth;
pub mod backend;
pub mod config;
pub mod logging;
pub mod models;
pub mod title;
